use regex::Regex;
use serde::{Deserialize, Serialize};
use std::iter::{Enumerate, Peekable};
use std::str::Lines;
use std::sync::LazyLock;

use crate::error::{ParseError, ParseResult};

/// `diff --git a/<path> b/<path>`; the a-path is non-greedy so a b-path containing
/// ` b/` still splits at the first separator.
static DIFF_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^diff\s--git\s\w/(.+?)\s\w/(.+)$").expect("Invalid diff header regex")
});

static OLD_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^old mode (\d+)").expect("Invalid old mode regex"));

static NEW_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^new mode (\d+)").expect("Invalid new mode regex"));

static NEW_FILE_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^new file mode (.+)$").expect("Invalid new file regex"));

static DELETED_FILE_MODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^deleted file mode (.+)$").expect("Invalid deleted file regex")
});

static SIMILARITY_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^similarity index (\d+)%").expect("Invalid similarity index regex")
});

/// Hunk range; the line counts are optional (`@@ -1 +1 @@` is valid)
static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@@ -(\d+)(,\d+)? [+](\d+)(,\d+)?").expect("Invalid hunk header regex")
});

/// Parse one or more concatenated `git diff` file blocks
///
/// A header that does not match aborts the whole parse: line numbers of every later
/// block depend on it.
pub fn parse_diff(output: &str) -> ParseResult<Vec<FileDiff>> {
    let mut cursor = LineCursor::new(output);
    let mut diffs = Vec::new();

    while let Some((number, line)) = cursor.next_line() {
        if line.trim().is_empty() {
            continue;
        }
        diffs.push(parse_file_diff(&mut cursor, number, line)?);
    }

    log::debug!("Parsed {} file diffs", diffs.len());
    Ok(diffs)
}

fn parse_file_diff(cursor: &mut LineCursor<'_>, number: usize, header: &str) -> ParseResult<FileDiff> {
    let paths = DIFF_HEADER
        .captures(header)
        .ok_or_else(|| ParseError::header(number, header))?;
    let mut diff = FileDiff::new(&paths[1], &paths[2]);

    if let Some((number, line)) = cursor.next_line_if(|line| line.starts_with("old mode")) {
        diff.a_mode = Some(capture(&OLD_MODE, number, line)?);
        let (number, line) = cursor.next_line().ok_or_else(|| {
            ParseError::MalformedInput(format!("`{line}` is not followed by a `new mode` line"))
        })?;
        diff.b_mode = Some(capture(&NEW_MODE, number, line)?);
    }

    // Mode-only change: nothing else belongs to this block
    if cursor.peek().is_none_or(is_file_header) {
        log::trace!("Mode-only diff for {}", diff.b_path);
        return Ok(diff);
    }

    classify(cursor, &mut diff)?;
    skip_markers(cursor, &mut diff);
    diff.lines = parse_hunks(cursor)?;

    Ok(diff)
}

fn classify(cursor: &mut LineCursor<'_>, diff: &mut FileDiff) -> ParseResult<()> {
    if let Some((number, line)) = cursor.next_line_if(|line| line.starts_with("new file")) {
        diff.kind = DiffKind::NewFile;
        diff.a_mode = None;
        diff.b_mode = Some(capture(&NEW_FILE_MODE, number, line)?);
    } else if let Some((number, line)) = cursor.next_line_if(|line| line.starts_with("deleted file")) {
        diff.kind = DiffKind::DeletedFile;
        diff.a_mode = Some(capture(&DELETED_FILE_MODE, number, line)?);
        diff.b_mode = None;
    } else if let Some((number, line)) =
        cursor.next_line_if(|line| SIMILARITY_INDEX.is_match(line))
    {
        let percent = capture(&SIMILARITY_INDEX, number, line)?;
        diff.kind = DiffKind::Renamed;
        diff.similarity_index = percent
            .parse::<u8>()
            .ok()
            .filter(|value| *value <= 100)
            .ok_or_else(|| ParseError::header(number, line))?;

        // `rename from` / `rename to` (or `copy` for copy detection)
        for _ in 0..2 {
            cursor.next_line_if(|line| line.starts_with("rename ") || line.starts_with("copy "));
        }
    }

    Ok(())
}

/// Consume `index`, `---` and `+++`
fn skip_markers(cursor: &mut LineCursor<'_>, diff: &mut FileDiff) {
    cursor.next_line_if(|line| line.starts_with("index "));

    for _ in 0..2 {
        if cursor.next_line_if(|line| line.starts_with("Binary files")).is_some() {
            diff.binary = true;
            return;
        }
        // Pure renames and empty new files have no markers at all
        if cursor.next_line_if(|line| !is_file_header(line)).is_none() {
            return;
        }
    }
}

fn parse_hunks(cursor: &mut LineCursor<'_>) -> ParseResult<Vec<DiffLine>> {
    let mut lines = Vec::new();
    let mut original_line: Option<u32> = None;
    let mut new_line: Option<u32> = None;

    while let Some((number, line)) = cursor.next_line_if(|line| !line.starts_with("diff")) {
        if line.starts_with("@@ ") {
            let range = HUNK_HEADER
                .captures(line)
                .ok_or_else(|| ParseError::header(number, line))?;
            original_line = Some(range[1].parse().map_err(|_| ParseError::header(number, line))?);
            new_line = Some(range[3].parse().map_err(|_| ParseError::header(number, line))?);
            lines.push(DiffLine::new(None, None, line));
        } else if line.starts_with('+') {
            lines.push(DiffLine::new(None, new_line, line));
            new_line = advance(new_line, number, line)?;
        } else if line.starts_with('-') {
            lines.push(DiffLine::new(original_line, None, line));
            original_line = advance(original_line, number, line)?;
        } else if line.starts_with('\\') {
            lines.push(DiffLine::new(None, None, line));
        } else {
            lines.push(DiffLine::new(original_line, new_line, line));
            original_line = advance(original_line, number, line)?;
            new_line = advance(new_line, number, line)?;
        }
    }

    Ok(lines)
}

/// Step a hunk line counter; a range running past `u32::MAX` is a bad hunk
fn advance(counter: Option<u32>, number: usize, line: &str) -> ParseResult<Option<u32>> {
    counter
        .map(|n| n.checked_add(1).ok_or_else(|| ParseError::header(number, line)))
        .transpose()
}

fn capture(pattern: &Regex, number: usize, line: &str) -> ParseResult<String> {
    pattern
        .captures(line)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ParseError::header(number, line))
}

fn is_file_header(line: &str) -> bool {
    line.starts_with("diff --git")
}

/// Line iterator that remembers 1-based line numbers for error reporting
struct LineCursor<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
        }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.lines.peek().map(|&(_, line)| line)
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines.next().map(|(index, line)| (index + 1, line))
    }

    fn next_line_if(&mut self, predicate: impl FnOnce(&str) -> bool) -> Option<(usize, &'a str)> {
        self.lines
            .next_if(|&(_, line)| predicate(line))
            .map(|(index, line)| (index + 1, line))
    }
}

/// What happened to the file as a whole
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    #[default]
    Modified,
    NewFile,
    DeletedFile,
    Renamed,
}

/// One `diff --git` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub a_path: String,
    pub b_path: String,
    /// `None` when the file does not exist on the old side
    pub a_mode: Option<String>,
    /// `None` when the file does not exist on the new side
    pub b_mode: Option<String>,
    pub similarity_index: u8,
    pub kind: DiffKind,
    pub binary: bool,
    pub lines: Vec<DiffLine>,
}

impl FileDiff {
    fn new(a_path: &str, b_path: &str) -> Self {
        Self {
            a_path: a_path.to_string(),
            b_path: b_path.to_string(),
            ..Self::default()
        }
    }

    pub fn new_file(&self) -> bool {
        self.kind == DiffKind::NewFile
    }

    pub fn deleted_file(&self) -> bool {
        self.kind == DiffKind::DeletedFile
    }

    pub fn renamed_file(&self) -> bool {
        self.kind == DiffKind::Renamed
    }

    /// Number of added and removed lines
    pub fn stats(&self) -> (usize, usize) {
        self.lines.iter().fold((0, 0), |(added, removed), line| match line.kind() {
            LineKind::Added => (added + 1, removed),
            LineKind::Removed => (added, removed + 1),
            _ => (added, removed),
        })
    }
}

/// A single line inside a hunk, with its position in each file version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub original_line_number: Option<u32>,
    pub new_line_number: Option<u32>,
    /// The raw line, including its `+`/`-`/` ` prefix
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    HunkHeader,
    Added,
    Removed,
    Context,
    /// `\ No newline at end of file`
    Marker,
}

impl DiffLine {
    fn new(original_line_number: Option<u32>, new_line_number: Option<u32>, text: &str) -> Self {
        Self {
            original_line_number,
            new_line_number,
            text: text.to_string(),
        }
    }

    pub fn kind(&self) -> LineKind {
        if self.text.starts_with("@@ ") {
            LineKind::HunkHeader
        } else if self.text.starts_with('\\') {
            LineKind::Marker
        } else if self.text.starts_with('+') {
            LineKind::Added
        } else if self.text.starts_with('-') {
            LineKind::Removed
        } else {
            LineKind::Context
        }
    }
}
