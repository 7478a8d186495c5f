use crate::cli_args::{OutputFormat, ScanArgs};
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use list_codes_core::{self as core, AppError, ProjectSummary};
use log;

pub fn handle_generate_command(args: &ScanArgs, quiet: bool) -> Result<()> {
    let (config, file_config) =
        load_config_for_command(args).context("Failed to load configuration")?;
    log::info!("Scanning project: {}", config.root.display());

    let format = match (args.output.format, file_config.format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => OutputFormat::from_name(name).ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "Unsupported output format '{}' in config file. Use 'markdown' or 'json'.",
                name
            ))
        })?,
        (None, None) => OutputFormat::Markdown,
    };
    let prompt_value = args.output.prompt.clone().or(file_config.prompt);

    let document = if args.output.readme_only {
        log::debug!("README-only mode.");
        let readmes = core::readme_only(&config).context("Failed to collect README files")?;
        match format {
            OutputFormat::Markdown => core::render_readme_markdown(&readmes),
            OutputFormat::Json => core::serialize_to_json(&readmes, true)
                .context("Failed to serialize README files")?,
        }
    } else {
        let summary =
            ProjectSummary::build(&config).context("Failed to build project summary")?;
        match format {
            OutputFormat::Markdown => core::render_markdown(&summary),
            OutputFormat::Json => core::serialize_summary_to_json(&summary, true)
                .context("Failed to serialize project summary")?,
        }
    };

    let document = match prompt_value {
        Some(value) => {
            let prompt = core::resolve_prompt(&value).context("Failed to resolve prompt")?;
            core::format_with_prompt(&prompt, &document)
        }
        None => document,
    };

    output::write_output(args.output.output.as_deref(), &document, quiet)
}
