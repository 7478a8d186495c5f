use crate::languages::{
    ASSET_EXTENSIONS, TEST_DIR_NAMES, TEST_FILE_SUFFIXES, TEST_KEYWORDS, dotted_extension,
};
use log;
use std::path::Path;

/// Reports whether `path` looks like test code.
///
/// Pass paths relative to the scan root: every directory segment is checked
/// against the test directory names, so an absolute path would let the
/// location of the project on disk influence the result.
pub fn is_test_file(path: &Path) -> bool {
    let normalized = path.to_string_lossy().replace('\\', "/").to_lowercase();
    let mut segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let Some(file_name) = segments.pop() else {
        return false;
    };

    if let Some(dir) = segments.iter().find(|seg| TEST_DIR_NAMES.contains(seg)) {
        log::trace!("Test file (directory '{}'): {}", dir, path.display());
        return true;
    }

    if let Some(suffix) = TEST_FILE_SUFFIXES
        .iter()
        .find(|suffix| file_name.ends_with(&suffix.to_lowercase()))
    {
        log::trace!("Test file (suffix '{}'): {}", suffix, path.display());
        return true;
    }

    let base_name = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };
    if let Some(keyword) = TEST_KEYWORDS
        .iter()
        .find(|kw| base_name_has_keyword(base_name, kw))
    {
        log::trace!("Test file (keyword '{}'): {}", keyword, path.display());
        return true;
    }

    false
}

fn base_name_has_keyword(base_name: &str, keyword: &str) -> bool {
    base_name.starts_with(keyword)
        || base_name.ends_with(keyword)
        || base_name.contains(&format!("_{keyword}_"))
        || base_name.contains(&format!("-{keyword}-"))
}

pub fn is_asset_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| dotted_extension(&name.to_string_lossy()))
        .is_some_and(|ext| ASSET_EXTENSIONS.contains(&ext.as_str()))
}
