pub mod settings;

pub use settings::{ConfigError, EmailPolicy, KeyValueConfig, LogConfig, ParserConfig};
