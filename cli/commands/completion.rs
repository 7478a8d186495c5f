use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use colored::*;
use list_codes_core::AppError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli_args::{Cli, CompletionArgs};

fn default_save_dir(shell: Shell) -> Result<PathBuf> {
    let dir = match shell {
        Shell::Fish => dirs::config_dir().map(|p| p.join("fish").join("completions")),
        Shell::Bash => dirs::data_local_dir().map(|p| p.join("bash-completion").join("completions")),
        Shell::Zsh => dirs::data_local_dir().map(|p| p.join("zsh").join("site-functions")),
        Shell::Elvish => dirs::config_dir().map(|p| p.join("elvish").join("lib")),
        _ => anyhow::bail!(AppError::InvalidArgument(format!(
            "Default save location not known for shell: {}",
            shell
        ))),
    };
    dir.ok_or_else(|| anyhow::anyhow!("Could not determine standard completion directory."))
}

fn completion_file_name(shell: Shell, bin_name: &str) -> String {
    match shell {
        Shell::Fish => format!("{}.fish", bin_name),
        Shell::Zsh => format!("_{}", bin_name),
        Shell::Elvish => format!("{}.elv", bin_name),
        _ => bin_name.to_string(),
    }
}

pub fn handle_completion_command(args: &CompletionArgs, quiet: bool) -> Result<()> {
    let shell = args.shell;
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    if !args.save {
        generate(shell, &mut command, bin_name, &mut io::stdout());
        return Ok(());
    }

    let save_dir = default_save_dir(shell)?;
    let save_path = save_dir.join(completion_file_name(shell, &bin_name));

    if save_path.exists() {
        if quiet {
            anyhow::bail!(
                "Target file '{}' exists. Overwrite prevented in quiet mode.",
                save_path.display()
            );
        }
        print!(
            "{} Completion file already exists at '{}'. Overwrite? [{}/{}] ",
            "⚠️".yellow(),
            save_path.display().to_string().cyan(),
            "y".green(),
            "N".red()
        );
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut response = String::new();
        io::stdin()
            .read_line(&mut response)
            .context("Failed to read user input")?;
        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Save cancelled.");
            return Ok(());
        }
    }

    fs::create_dir_all(&save_dir)
        .with_context(|| format!("Failed to create directory {}", save_dir.display()))?;
    let mut file = File::create(&save_path)
        .with_context(|| format!("Failed to create file {}", save_path.display()))?;
    generate(shell, &mut command, bin_name, &mut file);

    if !quiet {
        println!(
            "{} {} completions saved to: {}",
            "✅".green(),
            shell.to_string().cyan(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}
