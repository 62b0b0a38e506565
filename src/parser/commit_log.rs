use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::EmailPolicy;
use crate::error::{ParseError, ParseResult};

/// `Name <email>`
static IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^<]+)<([^>]+)>").expect("Invalid identity regex"));

/// Date layouts git emits for `--date=default`, `rfc` and `iso`
const GIT_DATE_FORMATS: &[&str] = &[
    "%a %b %e %H:%M:%S %Y %z",
    "%a %b %d %H:%M:%S %Y %z",
    "%Y-%m-%d %H:%M:%S %z",
];

/// Parse `git log --format=fuller [--parents] [--decorate]` output with lenient
/// identity handling
pub fn parse_log(output: &str) -> ParseResult<Vec<Commit>> {
    parse_log_with(output, EmailPolicy::default())
}

/// Parse log output, applying `policy` to identity lines without an `<email>`
pub fn parse_log_with(output: &str, policy: EmailPolicy) -> ParseResult<Vec<Commit>> {
    let lines: Vec<&str> = output.lines().collect();
    let mut state = LogState::CommitLine;
    let mut commits = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let lookahead = lines.get(index + 1).copied();
        let transition = state.step(index + 1, line, lookahead, policy)?;
        commits.extend(transition.finished);
        state = transition.state;
    }
    commits.extend(state.finish());

    log::debug!("Parsed {} commits", commits.len());
    Ok(commits)
}

/// Where the parser is within a commit record
///
/// The commit under construction travels inside the state, so every transition
/// hands it on explicitly and the finished commit comes out as a return value.
#[derive(Debug)]
enum LogState {
    /// Expecting `commit <sha1> ...`
    CommitLine,
    /// Reading `Author:`/`Commit:`/date headers
    HeaderLine(CommitBuilder),
    /// Reading indented message lines until the next `commit ` line
    MessageLine(CommitBuilder),
}

#[derive(Debug)]
struct Transition {
    state: LogState,
    finished: Option<Commit>,
}

impl Transition {
    fn to(state: LogState) -> Self {
        Self { state, finished: None }
    }

    fn finishing(state: LogState, builder: CommitBuilder) -> Self {
        Self {
            state,
            finished: Some(builder.build()),
        }
    }
}

impl LogState {
    fn step(
        self,
        number: usize,
        line: &str,
        lookahead: Option<&str>,
        policy: EmailPolicy,
    ) -> ParseResult<Transition> {
        match self {
            LogState::CommitLine => {
                if line.trim().is_empty() {
                    return Ok(Transition::to(LogState::CommitLine));
                }
                let builder = CommitBuilder::from_commit_line(number, line)?;
                Ok(Transition::to(LogState::HeaderLine(builder)))
            }
            LogState::HeaderLine(mut builder) => {
                if starts_commit(Some(line)) {
                    // Record without a blank line or message
                    let next = CommitBuilder::from_commit_line(number, line)?;
                    return Ok(Transition::finishing(LogState::HeaderLine(next), builder));
                }
                if line.trim().is_empty() {
                    if starts_commit(lookahead) {
                        return Ok(Transition::finishing(LogState::CommitLine, builder));
                    }
                    return Ok(Transition::to(LogState::MessageLine(builder)));
                }
                builder.apply_header(number, line, policy)?;
                Ok(Transition::to(LogState::HeaderLine(builder)))
            }
            LogState::MessageLine(mut builder) => {
                if starts_commit(lookahead) {
                    return Ok(Transition::finishing(LogState::CommitLine, builder));
                }
                builder.message.push(line.trim().to_string());
                Ok(Transition::to(LogState::MessageLine(builder)))
            }
        }
    }

    /// The commit still under construction when input ends
    fn finish(self) -> Option<Commit> {
        match self {
            LogState::CommitLine => None,
            LogState::HeaderLine(builder) | LogState::MessageLine(builder) => Some(builder.build()),
        }
    }
}

fn starts_commit(line: Option<&str>) -> bool {
    line.is_some_and(|line| line.starts_with("commit "))
}

#[derive(Debug, Default)]
struct CommitBuilder {
    commit: Commit,
    message: Vec<String>,
}

impl CommitBuilder {
    /// `commit <sha1> [<parent>...] [(<ref>, <ref>)]`
    fn from_commit_line(number: usize, line: &str) -> ParseResult<Self> {
        if !line.starts_with("commit ") {
            return Err(ParseError::header(number, line));
        }

        let (hashes, decoration) = match line.split_once('(') {
            Some((hashes, decoration)) => (hashes, Some(decoration)),
            None => (line, None),
        };

        let mut sha1s = hashes.split(' ').skip(1).filter(|sha1| !sha1.is_empty());
        let sha1 = sha1s.next().ok_or_else(|| ParseError::header(number, line))?;

        let refs = decoration
            .map(|refs| {
                let refs = refs.trim_end();
                refs.strip_suffix(')')
                    .unwrap_or(refs)
                    .split(", ")
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            commit: Commit {
                sha1: sha1.to_string(),
                parents: sha1s.map(str::to_string).collect(),
                refs,
                ..Commit::default()
            },
            message: Vec::new(),
        })
    }

    fn apply_header(&mut self, number: usize, line: &str, policy: EmailPolicy) -> ParseResult<()> {
        let commit = &mut self.commit;

        if let Some(value) = line.strip_prefix("Author: ") {
            let (name, email) = parse_identity(value, number, line, policy)?;
            commit.author_name = Some(name);
            commit.author_email = email;
        } else if let Some(value) = line.strip_prefix("Commit: ") {
            let (name, email) = parse_identity(value, number, line, policy)?;
            commit.committer_name = Some(name);
            commit.committer_email = email;
        } else if let Some(value) = line.strip_prefix("AuthorDate: ") {
            commit.author_date = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("CommitDate: ") {
            commit.commit_date = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Date: ") {
            if commit.author_date.is_none() {
                commit.author_date = Some(value.trim().to_string());
            }
        } else {
            log::trace!("Ignoring log header at line {number}: {line}");
        }

        Ok(())
    }

    fn build(self) -> Commit {
        Commit {
            message: self.message.join("\n").trim().to_string(),
            ..self.commit
        }
    }
}

fn parse_identity(
    value: &str,
    number: usize,
    line: &str,
    policy: EmailPolicy,
) -> ParseResult<(String, Option<String>)> {
    match IDENTITY.captures(value) {
        Some(caps) => Ok((caps[1].trim().to_string(), Some(caps[2].trim().to_string()))),
        None => match policy {
            EmailPolicy::Lenient => Ok((value.trim().to_string(), None)),
            EmailPolicy::Strict => Err(ParseError::author_line(number, line)),
        },
    }
}

/// One commit record from `git log`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha1: String,
    pub parents: Vec<String>,
    pub refs: Vec<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    /// Raw, as printed by git
    pub author_date: Option<String>,
    /// Raw, as printed by git
    pub commit_date: Option<String>,
    pub message: String,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Author date parsed from git's default, RFC 2822 or ISO layouts
    pub fn authored_at(&self) -> Option<DateTime<FixedOffset>> {
        self.author_date.as_deref().and_then(parse_git_date)
    }

    pub fn committed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.commit_date.as_deref().and_then(parse_git_date)
    }
}

fn parse_git_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    GIT_DATE_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
}
