use crate::classify::is_test_file;
use crate::config::ScanConfig;
use crate::filter::{PathFilter, is_file_entry, walk_filtered};
use crate::languages::{dotted_extension, language_for_file, signature_languages};
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Languages found in a project. `primary` comes from project signatures
/// (`go.mod`, `Cargo.toml`...); `fallback_counts` is only filled when no
/// signature was found at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct DetectedLanguages {
    pub primary: Vec<String>,
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub fallback_counts: BTreeMap<String, usize>,
}

impl DetectedLanguages {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.fallback_counts.is_empty()
    }

    /// Signature languages when there are any, otherwise every language seen
    /// while counting extensions, alphabetically.
    pub fn effective_languages(&self) -> Vec<String> {
        if !self.primary.is_empty() {
            return self.primary.clone();
        }
        self.fallback_counts.keys().cloned().collect()
    }
}

pub fn detect_languages(config: &ScanConfig, filter: &PathFilter) -> DetectedLanguages {
    log::debug!("Detecting project languages...");
    let mut signatures: BTreeSet<&'static str> = BTreeSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for entry in walk_filtered(&config.root, filter) {
        if entry.depth() == 0 {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let is_file = is_file_entry(&entry);

        let by_name = signature_languages(&name);
        let by_ext = dotted_extension(&name)
            .filter(|_| is_file)
            .map(|ext| signature_languages(&ext))
            .unwrap_or(&[]);
        for lang in by_name.iter().chain(by_ext) {
            if signatures.insert(*lang) {
                log::trace!("Signature '{}' indicates {}", name, lang);
            }
        }
        if !is_file {
            continue;
        }

        let relative = entry.path().strip_prefix(&config.root).unwrap_or(entry.path());
        if is_test_file(relative) {
            continue;
        }
        if let Some(lang) = language_for_file(&name) {
            *counts.entry(lang.to_string()).or_insert(0) += 1;
        }
    }

    if !signatures.is_empty() {
        let primary: Vec<String> = signatures.into_iter().map(String::from).collect();
        log::info!("Detected languages from signatures: {}", primary.join(", "));
        return DetectedLanguages {
            primary,
            fallback_counts: BTreeMap::new(),
        };
    }

    log::info!(
        "No project signature found; {} language(s) counted by extension.",
        counts.len()
    );
    DetectedLanguages {
        primary: Vec::new(),
        fallback_counts: counts,
    }
}
