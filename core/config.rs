use crate::error::{AppError, Result};
use crate::languages::DEFAULT_EXCLUDE_NAMES;
use byte_unit::{Byte, Unit};
use log;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".list-codes";
pub const DEFAULT_CONFIG_FILENAME: &str = "list-codes.toml";
pub const DEFAULT_MAX_DEPTH: usize = 7;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Everything one scan needs to know. Built once, then passed by reference to
/// every phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub root: PathBuf,
    /// Deepest tree level whose directories still list their children.
    /// `0` means unlimited.
    pub max_depth: usize,
    pub max_file_size: u64,
    pub max_total_size: Option<u64>,
    pub include_paths: Vec<PathBuf>,
    pub exclude_names: BTreeSet<String>,
    pub exclude_paths: Vec<PathBuf>,
    pub include_tests: bool,
    pub use_gitignore: bool,
    pub collect_dependency_files: bool,
}

impl ScanConfig {
    pub fn new(root: &Path) -> Result<Self> {
        let expanded = PathBuf::from(shellexpand::tilde(&root.to_string_lossy()).as_ref());
        let root = expanded
            .canonicalize()
            .map_err(|e| AppError::InvalidRoot {
                path: expanded.clone(),
                source: e,
            })?;
        if !root.is_dir() {
            return Err(AppError::InvalidRoot {
                path: root,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "project root is not a directory",
                ),
            });
        }
        log::debug!("Project root resolved to: {}", root.display());

        Ok(Self {
            root,
            max_depth: DEFAULT_MAX_DEPTH,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_total_size: None,
            include_paths: Vec::new(),
            exclude_names: DEFAULT_EXCLUDE_NAMES.iter().map(|s| s.to_string()).collect(),
            exclude_paths: Vec::new(),
            include_tests: false,
            use_gitignore: true,
            collect_dependency_files: true,
        })
    }

    /// Base name of the root directory, used as the tree label.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Expands `~`, anchors relative paths at the root and canonicalizes the
    /// result when it exists.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            self.root.join(expanded)
        };
        joined.canonicalize().unwrap_or_else(|_| {
            std::path::absolute(&joined).unwrap_or(joined)
        })
    }

    pub fn add_include(&mut self, raw: &str) {
        let path = self.resolve_path(raw);
        log::debug!("Include path: {}", path.display());
        if !self.include_paths.contains(&path) {
            self.include_paths.push(path);
        }
    }

    pub fn add_exclude(&mut self, raw: &str) {
        let path = self.resolve_path(raw);
        log::debug!("Exclude path: {}", path.display());
        if !self.exclude_paths.contains(&path) {
            self.exclude_paths.push(path);
        }
    }

    pub fn add_exclude_name(&mut self, name: &str) {
        self.exclude_names.insert(name.to_string());
    }

    /// Adds or removes the built-in excluded names (`node_modules`, `target`...).
    pub fn set_builtin_excludes(&mut self, enabled: bool) {
        for name in DEFAULT_EXCLUDE_NAMES {
            if enabled {
                self.exclude_names.insert(name.to_string());
            } else {
                self.exclude_names.remove(*name);
            }
        }
    }

    /// `/`-separated path of `path` relative to the root.
    pub fn display_path(&self, path: &Path) -> String {
        let relative = pathdiff::diff_paths(path, &self.root).unwrap_or_else(|| path.to_path_buf());
        relative.to_string_lossy().replace('\\', "/")
    }

    /// Layers a parsed config file over the current values.
    pub fn apply_file_config(&mut self, file: &FileConfig) -> Result<()> {
        if let Some(depth) = file.max_depth {
            self.max_depth = depth;
        }
        if let Some(size) = &file.max_file_size {
            if let Some(bytes) = parse_size(size)? {
                self.max_file_size = bytes;
            }
        }
        if let Some(size) = &file.max_total_size {
            self.max_total_size = parse_total_size(size)?;
        }
        if let Some(enabled) = file.enable_builtin_excludes {
            self.set_builtin_excludes(enabled);
        }
        for name in &file.exclude_names {
            self.add_exclude_name(name);
        }
        for raw in &file.include {
            self.add_include(raw);
        }
        for raw in &file.exclude {
            self.add_exclude(raw);
        }
        if let Some(include_tests) = file.include_tests {
            self.include_tests = include_tests;
        }
        if let Some(use_gitignore) = file.use_gitignore {
            self.use_gitignore = use_gitignore;
        }
        if let Some(dependency_files) = file.dependency_files {
            self.collect_dependency_files = dependency_files;
        }
        Ok(())
    }
}

/// Parses a human size such as `500`, `10kb`, `1.5 m` or `2G` into bytes.
/// Units are binary and case-insensitive. An empty string means "no limit".
pub fn parse_size(input: &str) -> Result<Option<u64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = |reason: &str| AppError::InvalidSize {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let split_at = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split_at);
    if number.is_empty() {
        return Err(invalid("expected a number"));
    }
    let value: f64 = number
        .parse()
        .map_err(|_| invalid("expected a number"))?;

    let unit = match unit.trim_start().to_ascii_lowercase().as_str() {
        "" | "b" => Unit::B,
        "k" | "kb" => Unit::KiB,
        "m" | "mb" => Unit::MiB,
        "g" | "gb" => Unit::GiB,
        _ => return Err(invalid("unknown unit, use b, k, kb, m, mb, g or gb")),
    };

    let bytes = Byte::from_f64_with_unit(value, unit).ok_or_else(|| invalid("size out of range"))?;
    log::trace!("Parsed size '{}' as {} bytes", input, bytes.as_u64());
    Ok(Some(bytes.as_u64()))
}

/// Parses the total budget. `0` means unlimited, like an empty value.
pub fn parse_total_size(input: &str) -> Result<Option<u64>> {
    Ok(parse_size(input)?.filter(|&bytes| bytes > 0))
}

/// Optional settings read from `list-codes.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub max_file_size: Option<String>,
    #[serde(default)]
    pub max_total_size: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub exclude_names: Vec<String>,
    #[serde(default)]
    pub include_tests: Option<bool>,
    #[serde(default)]
    pub use_gitignore: Option<bool>,
    #[serde(default)]
    pub enable_builtin_excludes: Option<bool>,
    #[serde(default)]
    pub dependency_files: Option<bool>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl FileConfig {
    /// Picks the config file to load: `None` when loading is disabled or the
    /// default file is absent. An explicitly named file must exist.
    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&str>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let expanded = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                let path = if expanded.is_absolute() {
                    expanded
                } else {
                    std::env::current_dir()?.join(expanded)
                };
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = project_root
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<FileConfig>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }
}
