pub mod commit_log;
pub mod diff;
pub mod git_config;
pub mod refs;
pub mod status;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::ParserConfig;
use crate::error::{AppError, ParseResult};

pub use commit_log::{Commit, parse_log, parse_log_with};
pub use diff::{DiffKind, DiffLine, FileDiff, LineKind, parse_diff};
pub use git_config::{parse_config, parse_config_with};
pub use refs::{Branch, RemoteRef, parse_branches, parse_ls_remote, parse_remotes, parse_tags};
pub use status::{FileStatus, RepositoryStatus, parse_status};

/// The git command output a piece of text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Status,
    Diff,
    Log,
    Config,
    Branch,
    Tag,
    Remote,
    LsRemote,
}

impl OutputKind {
    pub const ALL: [OutputKind; 8] = [
        OutputKind::Status,
        OutputKind::Diff,
        OutputKind::Log,
        OutputKind::Config,
        OutputKind::Branch,
        OutputKind::Tag,
        OutputKind::Remote,
        OutputKind::LsRemote,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputKind::Status => "status",
            OutputKind::Diff => "diff",
            OutputKind::Log => "log",
            OutputKind::Config => "config",
            OutputKind::Branch => "branch",
            OutputKind::Tag => "tag",
            OutputKind::Remote => "remote",
            OutputKind::LsRemote => "ls-remote",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| AppError::UnknownOutputKind(s.to_string()))
    }
}

/// Typed result of parsing one command's output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedOutput {
    Status(RepositoryStatus),
    Diff(Vec<FileDiff>),
    Log(Vec<Commit>),
    Config(BTreeMap<String, String>),
    Branches(Vec<Branch>),
    Names(Vec<String>),
    RemoteRefs(Vec<RemoteRef>),
}

/// Parses git output under one `ParserConfig`
///
/// The free functions in this module use the default configuration; this type is for
/// callers that loaded a config file.
#[derive(Debug, Clone, Default)]
pub struct GitOutputParser {
    config: ParserConfig,
}

impl GitOutputParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn status(&self, output: &str) -> ParseResult<RepositoryStatus> {
        parse_status(output)
    }

    pub fn diff(&self, output: &str) -> ParseResult<Vec<FileDiff>> {
        parse_diff(output)
    }

    pub fn log(&self, output: &str) -> ParseResult<Vec<Commit>> {
        parse_log_with(output, self.config.log.missing_email)
    }

    pub fn git_config(&self, output: &str) -> ParseResult<BTreeMap<String, String>> {
        parse_config_with(output, self.config.git_config.keep_full_values)
    }

    pub fn branches(&self, output: &str) -> ParseResult<Vec<Branch>> {
        parse_branches(output)
    }

    pub fn tags(&self, output: &str) -> ParseResult<Vec<String>> {
        parse_tags(output)
    }

    pub fn remotes(&self, output: &str) -> ParseResult<Vec<String>> {
        parse_remotes(output)
    }

    pub fn ls_remote(&self, output: &str) -> ParseResult<Vec<RemoteRef>> {
        parse_ls_remote(output)
    }

    /// Dispatch on `kind`
    pub fn parse_as(&self, kind: OutputKind, output: &str) -> ParseResult<ParsedOutput> {
        log::debug!("Parsing {} bytes of {kind} output", output.len());

        Ok(match kind {
            OutputKind::Status => ParsedOutput::Status(self.status(output)?),
            OutputKind::Diff => ParsedOutput::Diff(self.diff(output)?),
            OutputKind::Log => ParsedOutput::Log(self.log(output)?),
            OutputKind::Config => ParsedOutput::Config(self.git_config(output)?),
            OutputKind::Branch => ParsedOutput::Branches(self.branches(output)?),
            OutputKind::Tag => ParsedOutput::Names(self.tags(output)?),
            OutputKind::Remote => ParsedOutput::Names(self.remotes(output)?),
            OutputKind::LsRemote => ParsedOutput::RemoteRefs(self.ls_remote(output)?),
        })
    }
}
