use crate::classify::is_test_file;
use crate::config::ScanConfig;
use crate::filter::PathFilter;
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::fs;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const VERTICAL: &str = "│   ";
const SPACE: &str = "    ";
const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "lowercase"))]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct TreeNode {
    pub name: String,
    #[cfg_attr(feature = "serde_support", serde(rename = "type"))]
    pub kind: NodeKind,
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<TreeNode>,
    /// Set on directories cut off by the depth limit that still had visible
    /// content.
    #[cfg_attr(feature = "serde_support", serde(skip_serializing_if = "is_false"))]
    pub truncated: bool,
}

#[cfg(feature = "serde_support")]
fn is_false(value: &bool) -> bool {
    !*value
}

impl TreeNode {
    fn directory(name: String) -> Self {
        Self {
            name,
            kind: NodeKind::Directory,
            children: Vec::new(),
            truncated: false,
        }
    }

    fn file(name: String) -> Self {
        Self {
            name,
            kind: NodeKind::File,
            children: Vec::new(),
            truncated: false,
        }
    }

    /// Renders the tree with box-drawing connectors. The root is labelled
    /// `. (<name>)`; every line ends with a newline.
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(4096);
        output.push_str(&format!(". ({})\n", self.name));
        render_children(&mut output, self, "");
        output
    }
}

fn render_children(output: &mut String, node: &TreeNode, prefix: &str) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        output.push_str(prefix);
        output.push_str(if is_last { LAST_BRANCH } else { BRANCH });
        output.push_str(&child.name);
        output.push('\n');

        let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { VERTICAL });
        if child.truncated {
            output.push_str(&child_prefix);
            output.push_str(LAST_BRANCH);
            output.push_str(TRUNCATION_MARKER);
            output.push('\n');
        } else {
            render_children(output, child, &child_prefix);
        }
    }
}

/// Builds the filtered directory tree below the scan root.
///
/// Entries directly under the root are level 0. A directory at level `d`
/// lists its children while `d < max_depth`; at `d == max_depth` it is marked
/// truncated instead, provided something visible lies below it. A
/// `max_depth` of 0 means no limit.
pub fn build_tree(config: &ScanConfig, filter: &PathFilter) -> TreeNode {
    log::debug!(
        "Generating directory structure (max depth {})...",
        config.max_depth
    );
    let mut root = TreeNode::directory(config.root_name());
    root.children = collect_children(config, filter, &config.root, 0);
    log::debug!("Directory structure generation complete.");
    root
}

fn collect_children(
    config: &ScanConfig,
    filter: &PathFilter,
    dir: &Path,
    level: usize,
) -> Vec<TreeNode> {
    let mut nodes = Vec::new();
    for (name, is_dir) in visible_entries(config, filter, dir) {
        let path = dir.join(&name);
        if !is_dir {
            nodes.push(TreeNode::file(name));
            continue;
        }

        let mut node = TreeNode::directory(name);
        if config.max_depth == 0 || level < config.max_depth {
            node.children = collect_children(config, filter, &path, level + 1);
        } else {
            node.truncated = !visible_entries(config, filter, &path).is_empty();
            if node.truncated {
                log::trace!("Truncating tree at {}", path.display());
            }
        }
        nodes.push(node);
    }
    nodes
}

/// Names of the entries of `dir` that survive the filter (and, for files,
/// the test classifier), sorted case-insensitively.
fn visible_entries(config: &ScanConfig, filter: &PathFilter, dir: &Path) -> Vec<(String, bool)> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            log::warn!("Could not list directory '{}': {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut entries: Vec<(String, bool)> = Vec::new();
    for entry_result in read_dir {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error reading entry in '{}': {}", dir.display(), e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        let path = entry.path();

        if filter.should_skip(&path, &name, is_dir) {
            continue;
        }
        if !is_dir && !config.include_tests {
            let relative = path.strip_prefix(&config.root).unwrap_or(&path);
            if is_test_file(relative) {
                log::trace!("Hiding test file from tree: {}", path.display());
                continue;
            }
        }
        entries.push((name, is_dir));
    }

    entries.sort_by(|(a, _), (b, _)| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn deep_project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "root.go", "package main");
        write_file(dir.path(), "level1/file1.go", "package level1");
        write_file(dir.path(), "level1/level2/file2.go", "package level2");
        write_file(dir.path(), "level1/level2/level3/file3.go", "package level3");
        write_file(
            dir.path(),
            "level1/level2/level3/level4/file4.go",
            "package level4",
        );
        dir
    }

    fn render(config: &ScanConfig) -> String {
        let filter = PathFilter::from_config(config, None);
        build_tree(config, &filter).render()
    }

    #[test]
    fn unlimited_depth_shows_everything() {
        let dir = deep_project();
        let mut config = ScanConfig::new(dir.path()).unwrap();
        config.max_depth = 0;

        let output = render(&config);
        for name in ["root.go", "file1.go", "file2.go", "file3.go", "file4.go"] {
            assert!(output.contains(name), "missing {name}:\n{output}");
        }
        assert!(!output.contains("..."));
    }

    #[test]
    fn depth_one_truncates_below_first_level() {
        let dir = deep_project();
        let mut config = ScanConfig::new(dir.path()).unwrap();
        config.max_depth = 1;

        let output = render(&config);
        let root_name = config.root_name();
        let expected = format!(
            ". ({root_name})\n\
             ├── level1\n\
             │   ├── file1.go\n\
             │   └── level2\n\
             │       └── ...\n\
             └── root.go\n"
        );
        assert_eq!(output, expected);
        assert!(!output.contains("file2.go"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_renders_empty() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        write_file(dir.path(), "a.go", "package a");
        write_file(dir.path(), "locked/hidden.go", "package hidden");
        write_file(dir.path(), "z.go", "package z");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let config = ScanConfig::new(dir.path()).unwrap();
        let output = render(&config);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let root_name = config.root_name();
        assert_eq!(
            output,
            format!(". ({root_name})\n├── a.go\n├── locked\n└── z.go\n")
        );
    }

    #[test]
    fn depth_two_shows_second_level_files() {
        let dir = deep_project();
        let mut config = ScanConfig::new(dir.path()).unwrap();
        config.max_depth = 2;

        let output = render(&config);
        assert!(output.contains("file2.go"));
        assert!(output.contains("level3"));
        assert!(!output.contains("file3.go"));
        assert!(output.contains("..."));
    }

    #[test]
    fn no_marker_for_directories_with_only_hidden_content() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "pkg/inner/.hidden", "");
        write_file(dir.path(), "pkg/inner/util_test.go", "");
        let mut config = ScanConfig::new(dir.path()).unwrap();
        config.max_depth = 1;

        let output = render(&config);
        assert!(output.contains("inner"));
        assert!(!output.contains("..."));
    }

    #[test]
    fn children_sorted_case_insensitively() {
        let dir = tempdir().unwrap();
        for name in ["b.go", "A.go", "c.go", "a_dir/x.go"] {
            write_file(dir.path(), name, "");
        }
        let config = ScanConfig::new(dir.path()).unwrap();
        let filter = PathFilter::from_config(&config, None);
        let tree = build_tree(&config, &filter);

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A.go", "a_dir", "b.go", "c.go"]);
    }

    #[test]
    fn hides_tests_unless_requested() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "main.go", "");
        write_file(dir.path(), "main_test.go", "");

        let mut config = ScanConfig::new(dir.path()).unwrap();
        assert!(!render(&config).contains("main_test.go"));

        config.include_tests = true;
        assert!(render(&config).contains("main_test.go"));
    }

    #[test]
    fn excluded_and_dotfiles_are_hidden() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "node_modules/pkg/index.js", "");
        write_file(dir.path(), ".git/config", "");
        write_file(dir.path(), "src/app.js", "");
        let config = ScanConfig::new(dir.path()).unwrap();

        let output = render(&config);
        assert!(output.contains("app.js"));
        assert!(!output.contains("node_modules"));
        assert!(!output.contains(".git"));
    }
}
