//! Static lookup data: languages, project signatures, dependency manifests,
//! test naming conventions, asset extensions and default exclusions.
//!
//! Tables are ordered slices so that lookups stay deterministic when two
//! languages claim the same extension: the earlier entry wins.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Language name -> extensions (leading `.`) or exact filenames.
pub static EXTENSIONS: &[(&str, &[&str])] = &[
    ("Python", &[".py", ".pyw"]),
    ("Ruby", &[".rb", ".rbw"]),
    ("Javascript", &[".js", ".jsx", ".mjs", ".cjs"]),
    ("Typescript", &[".ts", ".tsx", ".mts", ".cts"]),
    ("Go", &[".go"]),
    ("Swift", &[".swift"]),
    ("Kotlin", &[".kt", ".kts"]),
    ("Rust", &[".rs"]),
    ("SQL", &[".sql"]),
    (
        "HTML",
        &[
            ".html", ".htm", ".rhtml", ".erb", ".haml", ".slim", ".hbs", ".handlebars",
            ".mustache", ".hjs", ".ejs", ".pug", ".jade", ".njk", ".nunjucks", ".twig",
            ".liquid", ".tmpl", ".tpl", ".gohtml", ".djhtml", ".jinja", ".jinja2", ".j2",
            ".cshtml", ".vbhtml", ".jsp", ".jspx", ".aspx", ".ascx", ".master", ".eex",
            ".heex", ".leex", ".ftl", ".vm", ".dust", ".eta", ".vash",
        ],
    ),
    ("CSS", &[".css", ".scss", ".sass", ".less", ".styl"]),
    ("Lua", &[".lua"]),
    ("C", &[".c", ".h"]),
    (
        "C++",
        &[".cpp", ".hpp", ".cxx", ".hxx", ".cc", ".hh", ".c++", ".h++"],
    ),
    ("Java", &[".java"]),
    ("PHP", &[".php", ".phtml", ".php3", ".php4", ".php5"]),
    ("C#", &[".cs", ".csx"]),
    ("F#", &[".fs", ".fsi", ".fsx"]),
    ("VB.NET", &[".vb"]),
    ("Scala", &[".scala", ".sc"]),
    ("Clojure", &[".clj", ".cljs", ".cljc"]),
    ("Haskell", &[".hs", ".lhs"]),
    ("Erlang", &[".erl", ".hrl"]),
    ("Elixir", &[".ex", ".exs"]),
    ("Dart", &[".dart"]),
    ("R", &[".r"]),
    ("Perl", &[".pl", ".pm", ".perl"]),
    ("Objective-C", &[".m", ".mm"]),
    ("Pascal", &[".pas", ".pp"]),
    ("Fortran", &[".f", ".f90", ".f95", ".f03", ".f08"]),
    ("COBOL", &[".cob", ".cbl"]),
    ("Ada", &[".ada", ".adb", ".ads"]),
    ("Lisp", &[".lisp", ".lsp", ".cl"]),
    ("Scheme", &[".scm", ".ss"]),
    ("Prolog", &[".pro"]),
    ("Julia", &[".jl"]),
    ("Zig", &[".zig"]),
    ("D", &[".d"]),
    ("Nim", &[".nim"]),
    ("Crystal", &[".cr"]),
    ("Groovy", &[".groovy", ".gvy"]),
    ("PowerShell", &[".ps1", ".psm1", ".psd1"]),
    ("Bash", &[".bash"]),
    ("Zsh", &[".zsh"]),
    ("Fish", &[".fish"]),
    ("Tcl", &[".tcl"]),
    ("Vim", &[".vim"]),
    ("Emacs Lisp", &[".el"]),
    ("Protobuf/Buf", &[".proto"]),
    ("Markdown", &[".md"]),
    ("MDX", &[".mdx"]),
    ("Vue", &[".vue"]),
    ("Svelte", &[".svelte"]),
    ("Solidity", &[".sol"]),
    ("YAML", &[".yaml", ".yml"]),
    ("JSON", &[".json"]),
    ("XML", &[".xml", ".xsd", ".xsl"]),
    ("Shell", &[".sh"]),
    ("Dockerfile", &["Dockerfile"]),
    ("TOML", &[".toml"]),
    ("Gradle", &[".gradle"]),
    ("INI", &[".ini", ".cfg"]),
    ("Properties", &[".properties"]),
    ("Makefile", &["Makefile", "makefile", ".mk"]),
    ("CMake", &[".cmake", "CMakeLists.txt"]),
    ("Terraform", &[".tf", ".tfvars"]),
    ("HCL", &[".hcl"]),
    ("GraphQL", &[".graphql", ".gql"]),
    ("Jupyter", &[".ipynb"]),
    ("LaTeX", &[".tex", ".latex"]),
    ("Regex", &[".regex"]),
    ("Diff", &[".diff", ".patch"]),
    ("Log", &[".log"]),
    ("CSV", &[".csv"]),
    ("TSV", &[".tsv"]),
    ("WebAssembly", &[".wat", ".wasm"]),
    ("Assembly", &[".asm", ".s"]),
];

/// Files or extensions whose presence strongly indicates a project language.
pub static PROJECT_SIGNATURES: &[(&str, &[&str])] = &[
    ("Go", &["go.mod"]),
    ("Ruby", &["Gemfile"]),
    ("Javascript", &["package.json", "node_modules"]),
    ("Typescript", &["tsconfig.json"]),
    (
        "Python",
        &["requirements.txt", "setup.py", "pyproject.toml", "Pipfile"],
    ),
    ("Rust", &["Cargo.toml"]),
    ("SQL", &[".sql"]),
    (
        "HTML",
        &[
            ".html", ".htm", ".rhtml", ".erb", ".haml", ".slim", ".hbs", ".handlebars",
            ".mustache", ".hjs", ".ejs", ".pug", ".jade", ".njk", ".nunjucks", ".twig",
            ".liquid", ".tmpl", ".tpl", ".gohtml", ".djhtml", ".jinja", ".jinja2", ".j2",
            ".cshtml", ".vbhtml", ".jsp", ".jspx", ".eex", ".heex", ".leex", ".dust",
            ".eta", ".vash",
        ],
    ),
    ("CSS", &[".css", ".scss", ".sass"]),
    ("Lua", &[".lua"]),
    ("C", &[".c"]),
    (
        "C++",
        &[".cpp", ".hpp", ".cxx", ".hxx", ".cc", ".hh", ".h"],
    ),
    ("Java", &["build.gradle", "settings.gradle", "pom.xml"]),
    ("PHP", &["composer.json"]),
    ("C#", &[".csproj", ".sln", "project.json"]),
    ("F#", &[".fsproj"]),
    ("VB.NET", &[".vbproj"]),
    ("Scala", &["build.sbt"]),
    ("Clojure", &["project.clj", "deps.edn"]),
    ("Haskell", &[".cabal", "stack.yaml"]),
    ("Erlang", &["rebar.config"]),
    ("Elixir", &["mix.exs"]),
    ("Dart", &["pubspec.yaml"]),
    ("R", &["DESCRIPTION"]),
    ("Julia", &["Project.toml"]),
    ("Swift", &["Package.swift"]),
    ("Kotlin", &["build.gradle.kts"]),
    ("Groovy", &["build.gradle"]),
    ("CMake", &["CMakeLists.txt"]),
    ("Terraform", &["main.tf"]),
    ("Protobuf/Buf", &[".proto", "buf.yaml"]),
    ("Markdown", &["README.md"]),
    ("MDX", &[".mdx"]),
    ("Vue", &[".vue"]),
    ("Svelte", &[".svelte"]),
    (
        "Solidity",
        &[
            "hardhat.config.js",
            "hardhat.config.ts",
            "truffle-config.js",
            "foundry.toml",
        ],
    ),
];

/// Manifest and lock files collected into the dependency section.
pub static DEPENDENCY_FILES: &[(&str, &[&str])] = &[
    ("Go", &["go.mod", "go.sum"]),
    (
        "Javascript",
        &[
            "package.json",
            "package-lock.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "bun.lockb",
        ],
    ),
    (
        "Typescript",
        &["package.json", "tsconfig.json", "package-lock.json", "yarn.lock"],
    ),
    (
        "Python",
        &[
            "requirements.txt",
            "Pipfile",
            "Pipfile.lock",
            "pyproject.toml",
            "poetry.lock",
        ],
    ),
    ("Ruby", &["Gemfile", "Gemfile.lock"]),
    ("Java", &["build.gradle", "settings.gradle", "pom.xml"]),
    ("Kotlin", &["build.gradle.kts", "settings.gradle.kts"]),
    ("Rust", &["Cargo.toml", "Cargo.lock"]),
    ("PHP", &["composer.json", "composer.lock"]),
    ("Elixir", &["mix.exs", "mix.lock"]),
    ("Dart", &["pubspec.yaml", "pubspec.lock"]),
    ("Swift", &["Package.swift", "Package.resolved"]),
    ("Scala", &["build.sbt"]),
    ("Haskell", &["stack.yaml", "cabal.project"]),
    ("Clojure", &["project.clj", "deps.edn"]),
    ("Erlang", &["rebar.config", "rebar.lock"]),
    ("C#", &["packages.config", "Directory.Packages.props"]),
];

/// Directory and file names skipped by default, wherever they occur.
pub static DEFAULT_EXCLUDE_NAMES: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "build",
    "dist",
    "__pycache__",
    "env",
    "venv",
    "assets",
    "static",
    "images",
    "media",
    "uploads",
];

/// Keywords matched against the start or end of a file's base name.
pub static TEST_KEYWORDS: &[&str] = &[
    "test",
    "spec",
    "e2e",
    "benchmark",
    "bench",
    "mock",
    "fixture",
];

/// Directory segment names that mark everything below them as test code.
pub static TEST_DIR_NAMES: &[&str] = &[
    "test",
    "tests",
    "spec",
    "specs",
    "__tests__",
    "__test__",
    "fixtures",
    "mocks",
    "e2e",
    "integration",
    "unit",
];

/// Filename suffixes of per-language test conventions.
pub static TEST_FILE_SUFFIXES: &[&str] = &[
    "_test.go",
    "_spec.rb",
    ".test.js",
    ".spec.js",
    ".test.jsx",
    ".spec.jsx",
    ".test.ts",
    ".spec.ts",
    ".test.tsx",
    ".spec.tsx",
    ".test.py",
    ".spec.py",
    "Test.java",
    "Tests.java",
    "IT.java",
    ".test.php",
    ".spec.php",
    "_test.rb",
    ".test.cs",
    ".spec.cs",
    "Test.cs",
    "Tests.cs",
    ".test.cpp",
    ".spec.cpp",
    ".test.c",
    ".spec.c",
    ".test.rs",
    ".spec.rs",
    ".test.kt",
    ".spec.kt",
    "Test.kt",
    ".test.swift",
    ".spec.swift",
    "Test.swift",
    ".t.sol",
    ".test.sol",
    ".spec.sol",
];

pub static ASSET_EXTENSIONS: &[&str] = &[
    // images
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".tiff", ".webp", ".avif", ".heic", ".svg",
    // fonts
    ".woff", ".woff2", ".ttf", ".otf", ".eot",
    // audio
    ".mp3", ".wav", ".ogg", ".aac", ".flac", ".m4a",
    // video
    ".mp4", ".avi", ".mov", ".webm", ".mkv", ".wmv",
    // archives
    ".zip", ".tar", ".gz", ".rar", ".7z", ".bz2",
    // documents
    ".pdf", ".docx", ".xlsx", ".pptx",
    // executables
    ".exe", ".dmg", ".deb", ".rpm",
];

static EXTENSION_TO_LANGUAGE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (lang, entries) in EXTENSIONS {
        for entry in entries.iter().filter(|e| e.starts_with('.')) {
            map.entry(entry.to_lowercase()).or_insert(*lang);
        }
    }
    map
});

static FILENAME_TO_LANGUAGE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (lang, entries) in EXTENSIONS {
        for entry in entries.iter().filter(|e| !e.starts_with('.')) {
            map.entry(*entry).or_insert(*lang);
        }
    }
    map
});

static SIGNATURE_TO_LANGUAGES: Lazy<HashMap<&'static str, Vec<&'static str>>> =
    Lazy::new(|| {
        let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for (lang, signatures) in PROJECT_SIGNATURES {
            for sig in signatures.iter() {
                let langs = map.entry(*sig).or_default();
                if !langs.contains(lang) {
                    langs.push(*lang);
                }
            }
        }
        map
    });

/// Lowercased extension of `name` with its leading dot, e.g. `.rs`.
pub fn dotted_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Detects the language of a file from its exact name or its extension.
pub fn language_for_file(file_name: &str) -> Option<&'static str> {
    if let Some(lang) = FILENAME_TO_LANGUAGE.get(file_name) {
        return Some(lang);
    }
    let ext = dotted_extension(file_name)?;
    EXTENSION_TO_LANGUAGE.get(&ext).copied()
}

pub fn extensions_for_language(language: &str) -> Option<&'static [&'static str]> {
    EXTENSIONS
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, exts)| *exts)
}

/// Languages signalled by an exact filename or dotted extension.
pub fn signature_languages(name_or_ext: &str) -> &'static [&'static str] {
    SIGNATURE_TO_LANGUAGES
        .get(name_or_ext)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn dependency_files_for(language: &str) -> &'static [&'static str] {
    DEPENDENCY_FILES
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, files)| *files)
        .unwrap_or(&[])
}

/// Info string used on a fenced code block for `language`.
pub fn code_fence_tag(language: &str) -> String {
    language.to_lowercase().replace('/', "").replace('+', "p")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_language_by_extension_and_name() {
        assert_eq!(language_for_file("script.py"), Some("Python"));
        assert_eq!(language_for_file("app.js"), Some("Javascript"));
        assert_eq!(language_for_file("main.go"), Some("Go"));
        assert_eq!(language_for_file("Dockerfile"), Some("Dockerfile"));
        assert_eq!(language_for_file("makefile"), Some("Makefile"));
        assert_eq!(language_for_file("CMakeLists.txt"), Some("CMake"));
        assert_eq!(language_for_file("INDEX.HTML"), Some("HTML"));
        assert_eq!(language_for_file("analysis.R"), Some("R"));
        assert_eq!(language_for_file("document.xyz"), None);
        assert_eq!(language_for_file("README"), None);
        assert_eq!(language_for_file("archive.tar.gz"), None);
    }

    #[test]
    fn shared_extensions_resolve_to_first_table_entry() {
        assert_eq!(language_for_file("header.h"), Some("C"));
        assert_eq!(language_for_file("script.pl"), Some("Perl"));
        assert_eq!(language_for_file("view.m"), Some("Objective-C"));
    }

    #[test]
    fn reverse_lookup_lists_extensions() {
        let rust = extensions_for_language("Rust").unwrap();
        assert_eq!(rust, &[".rs"]);
        assert!(extensions_for_language("Typescript").unwrap().contains(&".tsx"));
        assert!(extensions_for_language("Klingon").is_none());
    }

    #[test]
    fn signatures_can_map_to_several_languages() {
        assert_eq!(signature_languages("go.mod"), &["Go"]);
        let gradle = signature_languages("build.gradle");
        assert!(gradle.contains(&"Java"));
        assert!(gradle.contains(&"Groovy"));
        assert!(signature_languages("main.go").is_empty());
    }

    #[test]
    fn dependency_tables_match_known_manifests() {
        assert_eq!(dependency_files_for("Go"), &["go.mod", "go.sum"]);
        assert_eq!(dependency_files_for("Rust"), &["Cargo.toml", "Cargo.lock"]);
        assert_eq!(dependency_files_for("Javascript").len(), 5);
        assert!(dependency_files_for("Markdown").is_empty());
    }

    #[test]
    fn fence_tags_are_normalized() {
        assert_eq!(code_fence_tag("C++"), "cpp");
        assert_eq!(code_fence_tag("Protobuf/Buf"), "protobufbuf");
        assert_eq!(code_fence_tag("Go"), "go");
    }
}
