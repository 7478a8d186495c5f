use crate::config::ScanConfig;
use crate::gitignore::GitignoreTree;
use log;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// The single skip/keep decision shared by every traversal of a scan.
///
/// Precedence, first match wins:
/// 1. excluded name, or a path at or below an excluded path: skip
/// 2. covered by an include path: keep (dotfiles and ignored files too)
/// 3. dotfile: skip
/// 4. matched by a `.gitignore`: skip
/// 5. anything else: keep
///
/// Include paths add to what is kept rather than restricting the scan, so
/// ordinary files outside every include are still kept.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include_paths: Vec<PathBuf>,
    exclude_names: BTreeSet<String>,
    exclude_paths: Vec<PathBuf>,
    gitignore: Option<GitignoreTree>,
}

impl PathFilter {
    pub fn new(
        include_paths: Vec<PathBuf>,
        exclude_names: BTreeSet<String>,
        exclude_paths: Vec<PathBuf>,
        gitignore: Option<GitignoreTree>,
    ) -> Self {
        Self {
            include_paths,
            exclude_names,
            exclude_paths,
            gitignore,
        }
    }

    pub fn from_config(config: &ScanConfig, gitignore: Option<GitignoreTree>) -> Self {
        Self::new(
            config.include_paths.clone(),
            config.exclude_names.clone(),
            config.exclude_paths.clone(),
            gitignore,
        )
    }

    /// Decides whether `path` (named `name`) is left out. Never touches the
    /// filesystem, so the answer depends only on the arguments and `self`.
    pub fn should_skip(&self, path: &Path, name: &str, is_dir: bool) -> bool {
        let abs_path = absolute(path);

        if self.exclude_names.contains(name) {
            log::trace!("Skipping excluded name '{}': {}", name, abs_path.display());
            return true;
        }
        if self
            .exclude_paths
            .iter()
            .any(|excluded| abs_path.starts_with(excluded))
        {
            log::trace!("Skipping excluded path: {}", abs_path.display());
            return true;
        }

        if self.is_included(&abs_path) {
            log::trace!("Keeping included path: {}", abs_path.display());
            return false;
        }

        if name.starts_with('.') && name != "." && name != ".." {
            log::trace!("Skipping dotfile: {}", abs_path.display());
            return true;
        }

        if let Some(gitignore) = &self.gitignore {
            if gitignore.is_match(&abs_path, is_dir) {
                log::trace!("Skipping gitignored path: {}", abs_path.display());
                return true;
            }
        }

        false
    }

    pub fn should_skip_entry(&self, entry: &DirEntry) -> bool {
        self.should_skip(
            entry.path(),
            &entry.file_name().to_string_lossy(),
            entry.file_type().is_dir(),
        )
    }

    fn is_included(&self, abs_path: &Path) -> bool {
        self.include_paths.iter().any(|include| {
            abs_path.starts_with(include) || include.starts_with(abs_path)
        })
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// A regular file, or a symlink that resolves to one. Linked directories are
/// never descended.
pub fn is_file_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Sorted depth-first walk below `root` that never descends into entries the
/// filter skips. The root itself is always yielded. Walk errors are logged
/// and dropped.
pub fn walk_filtered<'a>(
    root: &'a Path,
    filter: &'a PathFilter,
) -> impl Iterator<Item = DirEntry> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| entry.depth() == 0 || !filter.should_skip_entry(entry))
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Error accessing path during walk: {}", e);
                None
            }
        })
}
