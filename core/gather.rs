use crate::classify::{is_asset_file, is_test_file};
use crate::config::ScanConfig;
use crate::filter::{PathFilter, is_file_entry, walk_filtered};
use crate::languages::{code_fence_tag, dependency_files_for, language_for_file};
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::DirEntry;

const README_FILE_NAME: &str = "readme.md";

/// One file whose content made it into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct CollectedFile {
    /// `/`-separated path relative to the scan root.
    pub path: String,
    pub language: String,
    pub size: u64,
    pub content: String,
}

impl CollectedFile {
    /// Heading with the file path followed by the fenced content.
    pub fn to_markdown(&self, heading_level: usize) -> String {
        let content = self.content.strip_suffix('\n').unwrap_or(&self.content);
        format!(
            "{} {}\n\n```{}\n{}\n```\n",
            "#".repeat(heading_level),
            self.path,
            code_fence_tag(&self.language),
            content
        )
    }
}

/// A file left out because it exceeded the per-file size cap.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct SkippedFile {
    pub path: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyCollection {
    pub files: Vec<CollectedFile>,
    /// Absolute paths of every matched dependency file, emitted or skipped,
    /// kept out of the source pass.
    pub claimed: BTreeSet<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceCollection {
    pub files: BTreeMap<String, Vec<CollectedFile>>,
    pub total_bytes: u64,
    pub skipped: Vec<SkippedFile>,
    /// The total size budget stopped the walk before it finished.
    pub limit_hit: bool,
}

impl SourceCollection {
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn read_content(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            log::warn!("Could not read file '{}': {}", path.display(), e);
            None
        }
    }
}

fn file_size(entry: &DirEntry) -> Option<u64> {
    let metadata = if entry.path_is_symlink() {
        fs::metadata(entry.path()).map_err(|e| e.to_string())
    } else {
        entry.metadata().map_err(|e| e.to_string())
    };
    match metadata {
        Ok(metadata) => Some(metadata.len()),
        Err(e) => {
            log::warn!(
                "Could not get file info for '{}': {}",
                entry.path().display(),
                e
            );
            None
        }
    }
}

fn is_hidden_test(config: &ScanConfig, path: &Path) -> bool {
    if config.include_tests {
        return false;
    }
    let relative = path.strip_prefix(&config.root).unwrap_or(path);
    is_test_file(relative)
}

/// Collects the manifest and lock files belonging to `languages`. Each file
/// appears once, sorted by path. These files are bound by the per-file cap
/// but never count against the total budget.
pub fn collect_dependency_files(
    config: &ScanConfig,
    filter: &PathFilter,
    languages: &[String],
) -> DependencyCollection {
    let wanted: BTreeSet<&str> = languages
        .iter()
        .flat_map(|lang| dependency_files_for(lang).iter().copied())
        .collect();
    let mut collection = DependencyCollection::default();
    if wanted.is_empty() {
        log::debug!("No dependency files to look for.");
        return collection;
    }
    log::debug!(
        "Collecting dependency and configuration files ({} name(s))...",
        wanted.len()
    );

    for entry in walk_filtered(&config.root, filter) {
        if !is_file_entry(&entry) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !wanted.contains(name.as_ref()) || is_hidden_test(config, entry.path()) {
            continue;
        }
        let Some(size) = file_size(&entry) else {
            continue;
        };
        let display = config.display_path(entry.path());
        collection.claimed.insert(entry.path().to_path_buf());
        if size > config.max_file_size {
            log::debug!(
                "Skipping dependency file '{}' due to size ({} bytes > {} bytes)",
                display,
                size,
                config.max_file_size
            );
            collection.skipped.push(SkippedFile {
                path: display,
                size,
            });
            continue;
        }
        let Some(content) = read_content(entry.path()) else {
            continue;
        };

        let language = language_for_file(&name)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_lowercase());
        log::trace!("Dependency file: {}", display);
        collection.files.push(CollectedFile {
            path: display,
            language,
            size,
            content,
        });
    }

    collection.files.sort_by(|a, b| a.path.cmp(&b.path));
    log::info!(
        "Collected {} dependency file(s).",
        collection.files.len()
    );
    collection
}

/// Collects source files into per-language buckets.
///
/// The walk is sorted by file name, so when the total budget runs out the
/// collected prefix is the same on every run. Files over the per-file cap are
/// recorded as skipped; files never reached after the budget stops the walk
/// are not recorded at all.
pub fn collect_source_files(
    config: &ScanConfig,
    filter: &PathFilter,
    claimed: &BTreeSet<PathBuf>,
) -> SourceCollection {
    log::debug!("Processing source files...");
    let mut collection = SourceCollection::default();

    for entry in walk_filtered(&config.root, filter) {
        if !is_file_entry(&entry) {
            continue;
        }
        let path = entry.path();
        if claimed.contains(path) || is_asset_file(path) || is_hidden_test(config, path) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let Some(language) = language_for_file(&name) else {
            log::trace!("No language for '{}', skipping.", path.display());
            continue;
        };
        let Some(size) = file_size(&entry) else {
            continue;
        };

        let display = config.display_path(path);
        if size > config.max_file_size {
            log::debug!(
                "Skipping file '{}' due to size ({} bytes > {} bytes)",
                display,
                size,
                config.max_file_size
            );
            collection.skipped.push(SkippedFile {
                path: display,
                size,
            });
            continue;
        }
        if let Some(budget) = config.max_total_size.filter(|&b| b > 0) {
            if collection.total_bytes + size > budget {
                log::info!(
                    "Total size limit of {} bytes reached at '{}'; stopping collection.",
                    budget,
                    display
                );
                collection.limit_hit = true;
                break;
            }
        }

        let Some(content) = read_content(path) else {
            continue;
        };
        collection.total_bytes += size;
        collection
            .files
            .entry(language.to_string())
            .or_default()
            .push(CollectedFile {
                path: display,
                language: language.to_string(),
                size,
                content,
            });
    }

    for files in collection.files.values_mut() {
        files.sort_by(|a, b| a.path.cmp(&b.path));
    }
    log::info!(
        "Collected {} source file(s), {} bytes, {} skipped.",
        collection.file_count(),
        collection.total_bytes,
        collection.skipped.len()
    );
    collection
}

/// Every `README.md` (any case) kept by the filter, sorted by path.
pub fn collect_readme_files(config: &ScanConfig, filter: &PathFilter) -> Vec<CollectedFile> {
    log::debug!("Searching for README.md files...");
    let mut readmes = Vec::new();
    for entry in walk_filtered(&config.root, filter) {
        if !is_file_entry(&entry)
            || entry.file_name().to_string_lossy().to_lowercase() != README_FILE_NAME
        {
            continue;
        }
        let Some(content) = read_content(entry.path()) else {
            continue;
        };
        readmes.push(CollectedFile {
            path: config.display_path(entry.path()),
            language: "Markdown".to_string(),
            size: content.len() as u64,
            content,
        });
    }
    readmes.sort_by(|a, b| a.path.cmp(&b.path));
    log::debug!("Found {} README.md file(s).", readmes.len());
    readmes
}
