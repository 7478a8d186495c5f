use crate::error::Result;
use ignore::gitignore::Gitignore;
use log;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Every `.gitignore` below a root, keyed by the directory that holds it.
#[derive(Debug, Clone)]
pub struct GitignoreTree {
    root: PathBuf,
    rules: BTreeMap<PathBuf, Gitignore>,
}

impl GitignoreTree {
    /// Walks the whole subtree once and compiles each `.gitignore` found.
    pub fn build(root: &Path) -> Result<Self> {
        log::debug!("Loading .gitignore files under {}", root.display());
        let mut rules = BTreeMap::new();

        for entry_result in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error accessing path while loading .gitignore files: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != GITIGNORE_FILE_NAME {
                continue;
            }
            let Some(dir) = entry.path().parent() else {
                continue;
            };

            let (gitignore, err) = Gitignore::new(entry.path());
            if let Some(e) = err {
                log::warn!(
                    "Could not fully load .gitignore at {}: {}",
                    entry.path().display(),
                    e
                );
            }
            log::trace!(
                "Loaded {} rule(s) from {}",
                gitignore.len(),
                entry.path().display()
            );
            rules.insert(dir.to_path_buf(), gitignore);
        }

        log::debug!("Loaded {} .gitignore file(s).", rules.len());
        Ok(Self {
            root: root.to_path_buf(),
            rules,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `path` is ignored. The nearest `.gitignore` with an opinion on
    /// the path (ignore or `!` whitelist) decides; farther files are only
    /// consulted when nearer ones say nothing.
    pub fn is_match(&self, path: &Path, is_dir: bool) -> bool {
        if path == self.root || !path.starts_with(&self.root) {
            return false;
        }
        let Some(parent) = path.parent() else {
            return false;
        };

        for dir in parent
            .ancestors()
            .take_while(|dir| dir.starts_with(&self.root))
        {
            let Some(gitignore) = self.rules.get(dir) else {
                continue;
            };
            let matched = gitignore.matched_path_or_any_parents(path, is_dir);
            if matched.is_ignore() {
                log::trace!(
                    "Ignored by {}/{}: {}",
                    dir.display(),
                    GITIGNORE_FILE_NAME,
                    path.display()
                );
                return true;
            }
            if matched.is_whitelist() {
                log::trace!(
                    "Re-included by {}/{}: {}",
                    dir.display(),
                    GITIGNORE_FILE_NAME,
                    path.display()
                );
                return false;
            }
        }
        false
    }
}
