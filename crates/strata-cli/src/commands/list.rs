//! `strata list` - print the templates a source can serve.

use std::sync::Arc;

use strata_core::application::TemplateService;

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    commands::build_loader,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let loader = build_loader(&args.source, &config)?;
    let service = TemplateService::new(Arc::new(loader));
    let names = service.list(&args.extensions)?;

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if names.is_empty() {
                output.info("No templates found")?;
                return Ok(());
            }
            output.header(&format!("Templates ({}):", names.len()))?;
            for name in &names {
                output.result(&format!("  {name}"))?;
            }
        }
        ListFormat::List => {
            for name in &names {
                output.result(name)?;
            }
        }
        ListFormat::Json => output.json(&names)?,
    }

    Ok(())
}
