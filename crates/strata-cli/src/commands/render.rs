//! `strata render` - render a template with variables.

use std::{fs, path::Path, sync::Arc};

use strata_adapters::MiniJinjaRenderer;
use strata_core::{application::RenderService, domain::RenderContext, error::StrataError};
use tracing::info;

use crate::{
    cli::RenderArgs,
    commands::build_loader,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let context = build_context(args.vars_file.as_deref(), &args.vars)?;

    let loader = build_loader(&args.source, &config)?;
    let renderer = MiniJinjaRenderer::new(Arc::new(loader));
    let service = RenderService::new(Box::new(renderer));

    let rendered = service.render(&args.name, &context)?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_cli_context(|| {
                    format!("Failed to create directory '{}'", parent.display())
                })?;
            }
            fs::write(path, &rendered)
                .with_cli_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(template = %args.name, out = %path.display(), "rendered");
            output.success(&format!("Rendered {} to {}", args.name, path.display()))?;
        }
        None => output.result(&rendered)?,
    }

    Ok(())
}

/// Variables from `--vars FILE` first, then each `--var KEY=VALUE`.
fn build_context(vars_file: Option<&Path>, vars: &[String]) -> CliResult<RenderContext> {
    let mut context = RenderContext::new();

    if let Some(path) = vars_file {
        let text = fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_cli_context(|| format!("'{}' is not valid JSON", path.display()))?;
        context.extend_from_json(value).map_err(StrataError::from)?;
    }

    for pair in vars {
        context.insert_pair(pair).map_err(StrataError::from)?;
    }

    Ok(context)
}
