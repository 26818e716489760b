//! `strata show` - print a template's source text.

use std::sync::Arc;

use serde_json::json;
use strata_core::application::TemplateService;

use crate::{
    cli::{OutputFormat, ShowArgs},
    commands::build_loader,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ShowArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let loader = build_loader(&args.source, &config)?;
    let service = TemplateService::new(Arc::new(loader));
    let template = service.source(&args.name)?;

    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "name": args.name,
            "path": template.path,
            "source": template.source,
        }))?;
    } else {
        output.result(&template.source)?;
    }

    Ok(())
}
