pub mod classify;
pub mod config;
pub mod context;
pub mod detect;
pub mod error;
pub mod filter;
pub mod gather;
pub mod gitignore;
pub mod languages;
pub mod output_formats;
pub mod tree;

pub use classify::{is_asset_file, is_test_file};
pub use config::{FileConfig, ScanConfig, parse_size, parse_total_size};
pub use context::{ProjectSummary, ScanStats, build_filter, estimate_tokens, readme_only};
pub use detect::{DetectedLanguages, detect_languages};
pub use error::{AppError, Result};
pub use filter::PathFilter;
pub use gather::{
    CollectedFile, DependencyCollection, SkippedFile, SourceCollection, collect_dependency_files,
    collect_readme_files, collect_source_files,
};
pub use gitignore::GitignoreTree;
pub use output_formats::{
    format_with_prompt, get_predefined_prompts, render_markdown, render_readme_markdown,
    resolve_prompt,
};
#[cfg(feature = "serde_support")]
pub use output_formats::{serialize_summary_to_json, serialize_to_json};
pub use tree::{NodeKind, TreeNode, build_tree};
