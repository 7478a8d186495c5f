mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log;
use std::process;

use cli_args::{Cli, Commands, ScanArgs};
use list_codes_core::{AppError, FileConfig, ScanConfig, parse_size, parse_total_size};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose, cli_args.scan.debug);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::InvalidSize { .. }) => 1,
        Some(AppError::DataLoading(_)) => 1,
        Some(AppError::InvalidRoot { .. }) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(AppError::TikToken(_)) => 8,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8, debug: bool) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        let level = match verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        if debug {
            level.max(log::LevelFilter::Debug)
        } else {
            level
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        Some(Commands::Completion(args)) => {
            log::debug!("Executing 'completion' command...");
            commands::completion::handle_completion_command(&args, quiet)?;
        }
        None => {
            log::debug!("Executing scan...");
            commands::generate::handle_generate_command(&cli.scan, quiet)?;
        }
    }
    Ok(())
}

fn parse_size_arg(
    parse: fn(&str) -> list_codes_core::Result<Option<u64>>,
    value: &str,
    flag: &str,
) -> Result<Option<u64>> {
    parse(value).with_context(|| format!("Invalid value for {}", flag))
}

/// Builds the scan configuration: defaults, then the config file, then
/// command-line flags. Sizes are validated here, before any traversal.
pub fn load_config_for_command(args: &ScanArgs) -> Result<(ScanConfig, FileConfig)> {
    let mut config = ScanConfig::new(&args.project_config.folder)
        .context("Failed to determine project root")?;

    let config_path = FileConfig::resolve_config_path(
        &config.root,
        args.project_config.config.as_deref(),
        args.project_config.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let file_config = match &config_path {
        Some(path) => FileConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => FileConfig::default(),
    };
    config
        .apply_file_config(&file_config)
        .context("Invalid value in config file")?;

    log::trace!("Applying CLI overrides to config...");
    if let Some(depth) = args.limits.max_depth {
        config.max_depth = depth;
    }
    if let Some(size) = &args.limits.max_file_size {
        if let Some(bytes) = parse_size_arg(parse_size, size, "--max-file-size")? {
            config.max_file_size = bytes;
        }
    }
    if let Some(size) = &args.limits.max_total_size {
        config.max_total_size = parse_size_arg(parse_total_size, size, "--max-total-size")?;
    }

    let filters = &args.filters;
    if filters.disable_builtin_excludes {
        config.set_builtin_excludes(false);
    }
    for name in &filters.exclude_name {
        config.add_exclude_name(name);
    }
    for raw in &filters.include {
        config.add_include(raw);
    }
    for raw in &filters.exclude {
        config.add_exclude(raw);
    }
    if filters.include_tests {
        config.include_tests = true;
    }
    if filters.disable_gitignore {
        config.use_gitignore = false;
    }
    if filters.no_deps {
        config.collect_dependency_files = false;
    }

    log::debug!("Effective scan config: {:?}", config);
    Ok((config, file_config))
}
