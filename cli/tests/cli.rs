use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{TempDir, tempdir};

fn list_codes(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_list-codes"))
        .args(args)
        .output()
        .expect("failed to run list-codes")
}

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn go_project() -> TempDir {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "go.mod", "module example.com/app\n");
    write_file(dir.path(), "main.go", "package main\n\nfunc main() {}\n");
    write_file(dir.path(), "main_test.go", "package main\n");
    write_file(dir.path(), "internal/db/db.go", "package db\n");
    write_file(dir.path(), "README.md", "# App\n");
    dir
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn prints_markdown_to_stdout() {
    let dir = go_project();
    let output = list_codes(&["-f", dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");

    let stdout = stdout_of(&output);
    assert!(stdout.contains("## Project Structure"));
    assert!(stdout.contains("- Go\n"));
    assert!(stdout.contains("### go.mod"));
    assert!(stdout.contains("#### main.go"));
    assert!(stdout.contains("#### internal/db/db.go"));
    assert!(!stdout.contains("main_test.go"));
}

#[test]
fn output_is_identical_across_runs() {
    let dir = go_project();
    let folder = dir.path().to_str().unwrap();
    let first = list_codes(&["-f", folder]);
    let second = list_codes(&["-f", folder]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn writes_to_output_file() {
    let dir = go_project();
    let out_dir = tempdir().unwrap();
    let out_path = out_dir.path().join("nested/context.md");

    let output = list_codes(&[
        "-q",
        "-f",
        dir.path().to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");
    assert!(output.stdout.is_empty());

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("#### main.go"));
}

#[test]
fn include_tests_flag() {
    let dir = go_project();
    let output = list_codes(&["-f", dir.path().to_str().unwrap(), "--include-tests"]);
    assert!(stdout_of(&output).contains("#### main_test.go"));
}

#[test]
fn malformed_size_fails_before_scanning() {
    let dir = go_project();
    let output = list_codes(&[
        "-f",
        dir.path().to_str().unwrap(),
        "--max-total-size",
        "lots",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn missing_folder_is_an_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let output = list_codes(&["-f", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn total_size_limit_is_reported() {
    let dir = go_project();
    let output = list_codes(&[
        "-f",
        dir.path().to_str().unwrap(),
        "--max-total-size",
        "12",
    ]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("**Size Limit Reached**"));
}

#[test]
fn zero_total_size_means_unlimited() {
    let dir = go_project();
    let output = list_codes(&["-f", dir.path().to_str().unwrap(), "--max-total-size", "0"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = stdout_of(&output);
    assert!(!stdout.contains("**Size Limit Reached**"));
    assert!(stdout.contains("#### main.go"));
    assert!(stdout.contains("#### internal/db/db.go"));
}

#[test]
fn json_output_keeps_manifest_out_of_sources() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "package.json", "{\"name\": \"web\"}\n");
    write_file(dir.path(), "settings.json", "{}\n");
    write_file(dir.path(), "index.js", "console.log('hi');\n");

    let output = list_codes(&["-f", dir.path().to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "{output:?}");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["languages"]["primary"][0], "Javascript");
    assert_eq!(value["dependencyFiles"][0]["path"], "package.json");
    let json_sources: Vec<&str> = value["sources"]["JSON"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(json_sources, vec!["settings.json"]);
}

#[test]
fn readme_only_mode() {
    let dir = go_project();
    let output = list_codes(&["-f", dir.path().to_str().unwrap(), "--readme-only"]);
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("# Project README Files"));
    assert!(stdout.contains("### README.md"));
    assert!(!stdout.contains("main.go"));
}

#[test]
fn prompt_is_prepended() {
    let dir = go_project();
    let output = list_codes(&[
        "-f",
        dir.path().to_str().unwrap(),
        "-p",
        "Summarize this project.",
    ]);
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Summarize this project.\n\n## Project Structure"));
}

#[test]
fn config_file_is_applied_and_can_be_disabled() {
    let dir = go_project();
    write_file(
        dir.path(),
        ".list-codes/list-codes.toml",
        "include_tests = true\n",
    );
    let folder = dir.path().to_str().unwrap();

    let with_config = stdout_of(&list_codes(&["-f", folder]));
    assert!(with_config.contains("#### main_test.go"));

    let without_config = stdout_of(&list_codes(&["-f", folder, "--no-config"]));
    assert!(!without_config.contains("main_test.go"));
}

#[test]
fn invalid_config_file_fails() {
    let dir = go_project();
    write_file(dir.path(), ".list-codes/list-codes.toml", "unknown_key = 1\n");
    let output = list_codes(&["-f", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn prints_completion_script() {
    let output = list_codes(&["completion", "bash"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("list-codes"));
}
