use anyhow::{Context, Result};
use colored::*;
use list_codes_core::AppError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Writes the document to `output_path`, or to stdout when none is given.
pub fn write_output(output_path: Option<&Path>, content: &str, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            write_to_file(path, content)?;
            if !quiet {
                println!(
                    "{} Output saved to: {}",
                    "✅".green(),
                    path.display().to_string().blue()
                );
            }
        }
        None => write_to_stdout(content)?,
    }
    Ok(())
}

fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file = File::create(path).map_err(|source| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
