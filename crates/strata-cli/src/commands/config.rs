//! `strata config` - inspect the effective configuration.

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.result(&get_config_value(&config, &key)?)?;
        }

        ConfigCommands::List => {
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.header("Current Configuration:")?;
            output.result(&serialised)?;
        }

        ConfigCommands::Path => {
            output.result(&AppConfig::active_path(global.config.as_ref()).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key. Strings print bare, everything else as JSON; an
/// unset optional key prints as an empty string.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };

    let root = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to read config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let mut node = &root;
    let mut segments = key.split('.').peekable();
    while let Some(segment) = segments.next() {
        match node.get(segment) {
            Some(next) => node = next,
            None if segments.peek().is_none() && is_optional(config, key) => {
                return Ok(String::new());
            }
            None => return Err(unknown()),
        }
    }

    Ok(match node {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Keys that are valid but omitted from the serialized form when unset.
fn is_optional(config: &AppConfig, key: &str) -> bool {
    match key {
        "loader.source" | "loader.search_path" => true,
        _ => key
            .strip_prefix("loader.options.")
            .is_some_and(|opt| config.loader.options.get(opt).is_none()),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::StorageOptions;

    #[test]
    fn get_known_keys() {
        let mut cfg = AppConfig::default();
        cfg.loader.source = Some("memory://site".into());
        cfg.loader.options = StorageOptions::new().with("depth", 2_i64);

        assert_eq!(get_config_value(&cfg, "loader.source").unwrap(), "memory://site");
        assert_eq!(get_config_value(&cfg, "loader.options.depth").unwrap(), "2");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "human");
    }

    #[test]
    fn unset_optional_key_is_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "loader.search_path").unwrap(), "");
        assert_eq!(get_config_value(&cfg, "loader.options.anon").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
