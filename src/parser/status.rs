use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ParseError, ParseResult};

/// Parse `git status --porcelain -b` output
///
/// The first line carries the branch; every following line is `XY path`.
pub fn parse_status(output: &str) -> ParseResult<RepositoryStatus> {
    let mut lines = output.lines();

    let branch_line = lines
        .next()
        .ok_or_else(|| ParseError::MalformedInput("status output has no branch line".to_string()))?;
    let branch = branch_line
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string();

    let mut files = BTreeMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let mut code = line.chars();
        let x = code.next().unwrap_or(' ');
        let y = code.next().unwrap_or(' ');

        let path = unquote(line.get(3..).unwrap_or_default().trim());
        let status = FileStatus::from_code(x, y);
        if status == FileStatus::default() {
            log::trace!("Status code {x}{y} for {path} maps to no flags");
        }

        files.insert(path.to_string(), status);
    }

    log::debug!("Parsed status for branch {branch}: {} files", files.len());

    Ok(RepositoryStatus { branch, files })
}

/// Strip one pair of surrounding quotes, as git adds for paths with spaces
fn unquote(path: &str) -> &str {
    if path.len() >= 2 && path.starts_with('"') && path.ends_with('"') {
        &path[1..path.len() - 1]
    } else {
        path
    }
}

/// Snapshot of the working tree as reported by porcelain status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStatus {
    pub branch: String,
    pub files: BTreeMap<String, FileStatus>,
}

impl RepositoryStatus {
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    pub fn staged_files(&self) -> Vec<&str> {
        self.paths_where(|status| status.staged)
    }

    pub fn conflicted_files(&self) -> Vec<&str> {
        self.paths_where(|status| status.conflict)
    }

    pub fn new_files(&self) -> Vec<&str> {
        self.paths_where(|status| status.is_new)
    }

    fn paths_where(&self, predicate: impl Fn(&FileStatus) -> bool) -> Vec<&str> {
        self.files
            .iter()
            .filter(|(_, status)| predicate(status))
            .map(|(path, _)| path.as_str())
            .collect()
    }
}

/// Per-file flags derived from a two-character status code
///
/// The flags are independent: `AD` is `staged` and `removed` at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    pub staged: bool,
    pub removed: bool,
    pub is_new: bool,
    pub conflict: bool,
}

impl FileStatus {
    /// Derive flags from the index (`x`) and worktree (`y`) status characters
    pub fn from_code(x: char, y: char) -> Self {
        let removed = x == 'D' || y == 'D';
        FileStatus {
            staged: x == 'A' || x == 'M',
            removed,
            is_new: (x == '?' || x == 'A') && !removed,
            conflict: x == 'U' || y == 'U',
        }
    }
}
