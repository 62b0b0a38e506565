pub mod config;
pub mod error;
pub mod logging;
pub mod parser;

// Re-export commonly used types for convenience
pub use config::{EmailPolicy, ParserConfig};
pub use error::{AppError, AppResult, ParseError, ParseResult};
pub use parser::{
    Branch, Commit, DiffKind, DiffLine, FileDiff, FileStatus, GitOutputParser, OutputKind,
    ParsedOutput, RemoteRef, RepositoryStatus, parse_branches, parse_config, parse_diff,
    parse_log, parse_ls_remote, parse_remotes, parse_status, parse_tags,
};
