use crate::context::{ProjectSummary, ScanStats};
use crate::detect::DetectedLanguages;
use crate::error::{AppError, Result};
use crate::gather::CollectedFile;
use byte_unit::{Byte, UnitType};
use log;
use once_cell::sync::Lazy;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

static PREDEFINED_PROMPTS: Lazy<std::result::Result<BTreeMap<String, String>, String>> =
    Lazy::new(|| {
        let yaml_content =
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/prompts.yaml"));
        serde_yml::from_str(yaml_content).map_err(|e| e.to_string())
    });

/// Prompt templates compiled into the binary, by name.
pub fn get_predefined_prompts() -> Result<&'static BTreeMap<String, String>> {
    PREDEFINED_PROMPTS.as_ref().map_err(|e| {
        AppError::DataLoading(format!("Failed to parse embedded data/prompts.yaml: {}", e))
    })
}

/// Turns a `--prompt` value into prompt text: a template name, a path to a
/// file holding the prompt, or the prompt itself.
pub fn resolve_prompt(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(
            "Prompt must not be empty.".to_string(),
        ));
    }
    if let Some(template) = get_predefined_prompts()?.get(trimmed) {
        log::debug!("Using predefined prompt template '{}'", trimmed);
        return Ok(template.trim().to_string());
    }

    let expanded = shellexpand::tilde(trimmed);
    let path = Path::new(expanded.as_ref());
    if path.is_file() {
        log::debug!("Reading prompt from file: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| AppError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        return Ok(content.trim().to_string());
    }

    log::debug!("Using prompt text given on the command line.");
    Ok(trimmed.to_string())
}

pub fn format_with_prompt(prompt: &str, content: &str) -> String {
    format!("{}\n\n{}", prompt, content)
}

fn format_size(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{:.2}", adjusted)
}

/// `1234567` -> `1,234,567`.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn render_languages(languages: &DetectedLanguages) -> String {
    let mut out = String::from("## Detected Languages\n\n");
    if !languages.primary.is_empty() {
        for lang in &languages.primary {
            out.push_str(&format!("- {}\n", lang));
        }
    } else if !languages.fallback_counts.is_empty() {
        out.push_str("No project signature found; languages by file extension:\n\n");
        for (lang, count) in &languages.fallback_counts {
            out.push_str(&format!("- {}: {} file(s)\n", lang, count));
        }
    } else {
        out.push_str("_No languages detected._\n");
    }
    out
}

fn render_stats(stats: &ScanStats) -> String {
    let mut out = format!(
        "**File Statistics**: {} total across {} file(s) (per-file limit: {})",
        format_size(stats.total_bytes),
        stats.file_count,
        format_size(stats.max_file_size)
    );
    if !stats.skipped.is_empty() {
        out.push_str(&format!(
            ", {} file(s) skipped for exceeding the per-file limit",
            stats.skipped.len()
        ));
    }
    out.push('\n');
    out.push_str(&format!(
        "**Token Estimate**: ~{} tokens (as a rule of thumb, 100 tokens are roughly 75 words)\n",
        format_number(stats.estimated_tokens)
    ));

    if !stats.skipped.is_empty() {
        out.push_str("\n**Skipped Files**:\n\n");
        for skipped in &stats.skipped {
            out.push_str(&format!(
                "- `{}` ({})\n",
                skipped.path,
                format_size(skipped.size)
            ));
        }
    }

    if stats.limit_hit {
        let budget = stats.max_total_size.map(format_size).unwrap_or_default();
        out.push_str(&format!(
            "\n**Size Limit Reached**: collection stopped at {} of the {} total size limit; \
             remaining files were not included.\n",
            format_size(stats.total_bytes),
            budget
        ));
    }
    out
}

/// Renders the full document: structure, languages, dependency files and
/// sources, always in that order.
pub fn render_markdown(summary: &ProjectSummary) -> String {
    log::debug!("Rendering Markdown output...");
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        "## Project Structure\n\n```text\n{}```\n",
        summary.tree.render()
    ));
    parts.push(render_languages(&summary.languages));

    if !summary.dependency_files.is_empty() {
        let mut section = String::from("## Dependency and Configuration Files\n");
        for file in &summary.dependency_files {
            section.push('\n');
            section.push_str(&file.to_markdown(3));
        }
        parts.push(section);
    }

    let mut section = String::from("## Source Code Files\n\n");
    section.push_str(&render_stats(&summary.stats));
    if summary.sources.is_empty() {
        section.push_str("\n_No source files collected._\n");
    }
    parts.push(section);

    for (language, files) in &summary.sources {
        let mut lang_section = format!("### {}\n", language);
        for file in files {
            lang_section.push('\n');
            lang_section.push_str(&file.to_markdown(4));
        }
        parts.push(lang_section);
    }

    parts.join("\n")
}

pub fn render_readme_markdown(files: &[CollectedFile]) -> String {
    if files.is_empty() {
        return "# Project README Files\n\nNo README.md files found in the project.\n".to_string();
    }
    let blocks: Vec<String> = files.iter().map(|file| file.to_markdown(3)).collect();
    format!("# Project README Files\n\n{}", blocks.join("\n"))
}

#[cfg(feature = "serde_support")]
pub fn serialize_to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(AppError::JsonSerialize)
    } else {
        serde_json::to_string(value).map_err(AppError::JsonSerialize)
    }
}

#[cfg(feature = "serde_support")]
pub fn serialize_summary_to_json(summary: &ProjectSummary, pretty: bool) -> Result<String> {
    serialize_to_json(summary, pretty)
}
