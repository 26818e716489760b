//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod render;
pub mod show;

use strata_adapters::FsTemplateLoader;
use strata_core::{
    domain::{SEARCH_PATH_KEY, StorageOptions},
    error::StrataError,
};
use tracing::debug;

use crate::{
    cli::SourceArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Build the template loader for a command.
///
/// `--source` wins over `loader.source` from the configuration.
pub fn build_loader(args: &SourceArgs, config: &AppConfig) -> CliResult<FsTemplateLoader> {
    let source = args
        .source
        .as_deref()
        .or(config.loader.source.as_deref())
        .ok_or(CliError::MissingSource)?;

    let options = storage_options(args, config)?;
    debug!(source, options = ?options, "building loader");

    Ok(FsTemplateLoader::new(source, options)?)
}

/// Storage options, lowest priority first: config `loader.options`, config
/// `loader.search_path`, `--option`, `--search-path`.
fn storage_options(args: &SourceArgs, config: &AppConfig) -> CliResult<StorageOptions> {
    let mut options = config.loader.options.clone();

    if let Some(search_path) = &config.loader.search_path {
        options.insert(SEARCH_PATH_KEY, search_path.as_str());
    }

    for pair in &args.options {
        let (key, value) = StorageOptions::parse_pair(pair).map_err(StrataError::from)?;
        options.insert(key, value);
    }

    if let Some(search_path) = &args.search_path {
        options.insert(SEARCH_PATH_KEY, search_path.as_str());
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::{DomainError, OptionValue};

    fn source_args(source: Option<&str>) -> SourceArgs {
        SourceArgs {
            source: source.map(str::to_string),
            ..SourceArgs::default()
        }
    }

    #[test]
    fn missing_source_everywhere() {
        let err = build_loader(&source_args(None), &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::MissingSource));
    }

    #[test]
    fn config_source_is_the_fallback() {
        let mut config = AppConfig::default();
        config.loader.source = Some("memory://site".into());

        let loader = build_loader(&source_args(None), &config).unwrap();
        assert_eq!(loader.root_path(), "site");
    }

    #[test]
    fn flag_source_wins_over_config() {
        let mut config = AppConfig::default();
        config.loader.source = Some("memory://site".into());

        let loader = build_loader(&source_args(Some("memory://flag")), &config).unwrap();
        assert_eq!(loader.root_path(), "flag");
    }

    #[test]
    fn option_layering() {
        let mut config = AppConfig::default();
        config.loader.options = StorageOptions::new().with("depth", 1_i64).with("anon", false);
        config.loader.search_path = Some("from-config".into());

        let args = SourceArgs {
            source: None,
            search_path: Some("from-flag".into()),
            options: vec!["anon=true".into()],
        };

        let options = storage_options(&args, &config).unwrap();
        assert_eq!(options.search_path(), Some("from-flag"));
        assert_eq!(options.get("anon"), Some(&OptionValue::Bool(true)));
        assert_eq!(options.get("depth"), Some(&OptionValue::Int(1)));
    }

    #[test]
    fn config_search_path_applies_without_flag() {
        let mut config = AppConfig::default();
        config.loader.search_path = Some("templates".into());

        let options = storage_options(&source_args(None), &config).unwrap();
        assert_eq!(options.search_path(), Some("templates"));
    }

    #[test]
    fn malformed_option_is_rejected() {
        let args = SourceArgs {
            options: vec!["no-equals-sign".into()],
            ..SourceArgs::default()
        };
        let err = storage_options(&args, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Core(StrataError::Domain(DomainError::InvalidOption { .. }))
        ));
        assert_eq!(err.exit_code(), 2);
    }
}
