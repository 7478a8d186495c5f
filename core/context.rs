use crate::config::ScanConfig;
use crate::detect::{DetectedLanguages, detect_languages};
use crate::error::{AppError, Result};
use crate::filter::PathFilter;
use crate::gather::{
    self, CollectedFile, SkippedFile, collect_dependency_files, collect_source_files,
};
use crate::gitignore::GitignoreTree;
use crate::tree::{TreeNode, build_tree};
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "camelCase"))]
pub struct ScanStats {
    pub total_bytes: u64,
    pub file_count: usize,
    pub skipped: Vec<SkippedFile>,
    pub limit_hit: bool,
    pub max_file_size: u64,
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub max_total_size: Option<u64>,
    pub estimated_tokens: usize,
}

/// Structured result of one scan. Markdown and JSON are both renderings of
/// this value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "camelCase"))]
pub struct ProjectSummary {
    pub project_name: String,
    pub tree: TreeNode,
    pub languages: DetectedLanguages,
    pub dependency_files: Vec<CollectedFile>,
    pub sources: BTreeMap<String, Vec<CollectedFile>>,
    pub stats: ScanStats,
}

/// The filter every phase of a scan shares. Loads `.gitignore` files when the
/// config asks for them.
pub fn build_filter(config: &ScanConfig) -> Result<PathFilter> {
    let gitignore = if config.use_gitignore {
        Some(GitignoreTree::build(&config.root)?)
    } else {
        log::debug!(".gitignore handling disabled.");
        None
    };
    Ok(PathFilter::from_config(config, gitignore))
}

impl ProjectSummary {
    pub fn build(config: &ScanConfig) -> Result<Self> {
        log::debug!("Building project summary for {}", config.root.display());
        let filter = build_filter(config)?;

        let tree = build_tree(config, &filter);
        let languages = detect_languages(config, &filter);

        let dependencies = if config.collect_dependency_files {
            collect_dependency_files(config, &filter, &languages.effective_languages())
        } else {
            log::debug!("Dependency file collection disabled.");
            gather::DependencyCollection::default()
        };
        let sources = collect_source_files(config, &filter, &dependencies.claimed);

        let estimated_tokens = estimate_tokens(
            sources
                .files
                .values()
                .flatten()
                .map(|file| file.content.as_str()),
        )?;

        let mut skipped: Vec<SkippedFile> = dependencies
            .skipped
            .into_iter()
            .chain(sources.skipped.iter().cloned())
            .collect();
        skipped.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = ScanStats {
            total_bytes: sources.total_bytes,
            file_count: sources.file_count(),
            skipped,
            limit_hit: sources.limit_hit,
            max_file_size: config.max_file_size,
            max_total_size: config.max_total_size,
            estimated_tokens,
        };

        log::debug!("Project summary built successfully.");
        Ok(Self {
            project_name: config.root_name(),
            tree,
            languages,
            dependency_files: dependencies.files,
            sources: sources.files,
            stats,
        })
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Only the README files of the project.
pub fn readme_only(config: &ScanConfig) -> Result<Vec<CollectedFile>> {
    let filter = build_filter(config)?;
    Ok(gather::collect_readme_files(config, &filter))
}

/// Token count of the given texts under the `cl100k_base` encoding.
pub fn estimate_tokens<'a>(texts: impl IntoIterator<Item = &'a str>) -> Result<usize> {
    let texts: Vec<&str> = texts.into_iter().filter(|t| !t.is_empty()).collect();
    if texts.is_empty() {
        return Ok(0);
    }
    let bpe = tiktoken_rs::cl100k_base().map_err(|e| AppError::TikToken(e.to_string()))?;
    let count: usize = texts
        .iter()
        .map(|text| bpe.encode_ordinary(text).len())
        .sum();
    log::trace!("Estimated {} tokens over {} text(s)", count, texts.len());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn summary_of_small_project() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "go.mod", "module example.com/app\n");
        write_file(dir.path(), "main.go", "package main\n\nfunc main() {}\n");
        write_file(dir.path(), "main_test.go", "package main\n");
        write_file(dir.path(), ".gitignore", "*.log\n");
        write_file(dir.path(), "debug.log", "noise");
        let config = ScanConfig::new(dir.path()).unwrap();

        let summary = ProjectSummary::build(&config).unwrap();
        assert_eq!(summary.languages.primary, vec!["Go"]);
        assert_eq!(summary.dependency_files.len(), 1);
        assert_eq!(summary.dependency_files[0].path, "go.mod");
        assert_eq!(summary.sources["Go"].len(), 1);
        assert_eq!(summary.sources["Go"][0].path, "main.go");
        assert_eq!(summary.stats.file_count, 1);
        assert!(summary.stats.estimated_tokens > 0);
        assert!(!summary.stats.limit_hit);
        let tree = summary.tree.render();
        assert!(!tree.contains("debug.log"));
        assert!(!tree.contains("main_test.go"));
    }

    #[test]
    fn gitignore_can_be_disabled() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), ".gitignore", "generated.py\n");
        write_file(dir.path(), "generated.py", "x = 1\n");
        let mut config = ScanConfig::new(dir.path()).unwrap();

        let summary = ProjectSummary::build(&config).unwrap();
        assert!(!summary.has_sources());

        config.use_gitignore = false;
        let summary = ProjectSummary::build(&config).unwrap();
        assert_eq!(summary.sources["Python"][0].path, "generated.py");
    }

    #[test]
    fn empty_project_has_empty_summary() {
        let dir = tempdir().unwrap();
        let config = ScanConfig::new(dir.path()).unwrap();
        let summary = ProjectSummary::build(&config).unwrap();
        assert!(summary.tree.children.is_empty());
        assert!(summary.languages.is_empty());
        assert!(summary.dependency_files.is_empty());
        assert!(!summary.has_sources());
        assert_eq!(summary.stats.estimated_tokens, 0);
    }

    #[test]
    fn readme_only_collects_readmes() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "README.md", "# Title\n");
        write_file(dir.path(), "main.go", "package main\n");
        let config = ScanConfig::new(dir.path()).unwrap();

        let readmes = readme_only(&config).unwrap();
        assert_eq!(readmes.len(), 1);
        assert_eq!(readmes[0].content, "# Title\n");
    }

    #[test]
    fn token_estimate_of_nothing_is_zero() {
        assert_eq!(estimate_tokens(Vec::<&str>::new()).unwrap(), 0);
        assert_eq!(estimate_tokens(["", ""]).unwrap(), 0);
        assert!(estimate_tokens(["fn main() {}"]).unwrap() > 0);
    }
}
