use log::{LevelFilter, SetLoggerError};
use std::io::Write;

/// Environment variable holding an `env_logger` filter, e.g. `GITPARSE_LOG=debug`
pub const LOG_ENV: &str = "GITPARSE_LOG";

/// Install a stderr logger; `GITPARSE_LOG` overrides `default_level`
///
/// Library code only emits through the `log` facade, so this is for binaries.
pub fn init_logging(default_level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_env(LOG_ENV)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;

    log::debug!("Logging initialized with level: {default_level}");
    Ok(())
}
