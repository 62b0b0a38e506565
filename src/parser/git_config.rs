use std::collections::BTreeMap;

use crate::error::ParseResult;

/// Parse `git config --list` output
///
/// A value containing `=` is cut at its first `=`; later duplicates of a key win.
pub fn parse_config(output: &str) -> ParseResult<BTreeMap<String, String>> {
    parse_config_with(output, false)
}

/// Parse `git config --list` output, optionally keeping `=` inside values
pub fn parse_config_with(
    output: &str,
    keep_full_values: bool,
) -> ParseResult<BTreeMap<String, String>> {
    let mut config = BTreeMap::new();

    for line in output.lines().filter(|line| !line.is_empty()) {
        let (key, value) = line.split_once('=').unwrap_or((line, ""));
        let value = if keep_full_values {
            value
        } else {
            value.split('=').next().unwrap_or_default()
        };

        if let Some(previous) = config.insert(key.to_string(), value.to_string()) {
            log::trace!("Config key {key} overrides earlier value {previous}");
        }
    }

    log::debug!("Parsed {} config entries", config.len());
    Ok(config)
}
