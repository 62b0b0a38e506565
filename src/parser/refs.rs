use serde::{Deserialize, Serialize};

use crate::error::ParseResult;

/// Length of a full SHA-1 object name in hex
const SHA1_HEX_LEN: usize = 40;

/// Parse `git branch` output
pub fn parse_branches(output: &str) -> ParseResult<Vec<Branch>> {
    let mut branches = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // Format: `* main` or `  feature-x`
        branches.push(Branch {
            name: line.get(2..).unwrap_or_default().to_string(),
            current: line.starts_with('*'),
        });
    }

    log::debug!("Parsed {} branches", branches.len());
    Ok(branches)
}

/// Parse `git tag` output
pub fn parse_tags(output: &str) -> ParseResult<Vec<String>> {
    Ok(non_empty_lines(output))
}

/// Parse `git remote` output
pub fn parse_remotes(output: &str) -> ParseResult<Vec<String>> {
    Ok(non_empty_lines(output))
}

fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `git ls-remote` output (`<sha1>\t<ref>` per line)
pub fn parse_ls_remote(output: &str) -> ParseResult<Vec<RemoteRef>> {
    let refs: Vec<RemoteRef> = output
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("From "))
        .map(|line| RemoteRef {
            sha1: line.get(..SHA1_HEX_LEN).unwrap_or(line).to_string(),
            name: line
                .get(SHA1_HEX_LEN + 1..)
                .unwrap_or_default()
                .trim()
                .to_string(),
        })
        .collect();

    Ok(refs)
}

/// Represents a branch from git branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub current: bool,
}

/// A ref advertised by a remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    pub sha1: String,
    pub name: String,
}
