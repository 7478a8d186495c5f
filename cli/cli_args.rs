use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        short = 'f',
        long,
        default_value = ".",
        help = "Project directory to scan.",
        value_name = "PATH",
        help_heading = "Project Setup"
    )]
    pub folder: PathBuf,

    #[arg(
        long,
        help = "Path of the TOML config file (default: <folder>/.list-codes/list-codes.toml).",
        value_name = "FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Do not load any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOpts {
    #[arg(
        short = 'i',
        long = "include",
        help = "Always keep this path, even if it is a dotfile or gitignored (repeatable).",
        value_name = "PATH",
        help_heading = "Filtering"
    )]
    pub include: Vec<String>,

    #[arg(
        short = 'e',
        long = "exclude",
        help = "Skip this path, relative to the folder (repeatable).",
        value_name = "PATH",
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(
        long = "exclude-name",
        help = "Skip every file or directory with this name (repeatable).",
        value_name = "NAME",
        help_heading = "Filtering"
    )]
    pub exclude_name: Vec<String>,

    #[arg(
        long,
        help = "Do not skip node_modules, vendor, target and the other built-in names.",
        help_heading = "Filtering"
    )]
    pub disable_builtin_excludes: bool,

    #[arg(long, help = "Ignore .gitignore files.", help_heading = "Filtering")]
    pub disable_gitignore: bool,

    #[arg(long, help = "Include test files.", help_heading = "Filtering")]
    pub include_tests: bool,

    #[arg(
        long,
        help = "Do not collect dependency and configuration files.",
        help_heading = "Filtering"
    )]
    pub no_deps: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LimitOpts {
    #[arg(
        long,
        help = "Maximum depth of the directory tree (0 = unlimited) [default: 7].",
        value_name = "N",
        help_heading = "Limits"
    )]
    pub max_depth: Option<usize>,

    #[arg(
        long,
        help = "Skip files larger than this, e.g. 500k, 1m [default: 1m].",
        value_name = "SIZE",
        help_heading = "Limits"
    )]
    pub max_file_size: Option<String>,

    #[arg(
        long,
        help = "Stop collecting once sources would exceed this total, e.g. 10m.",
        value_name = "SIZE",
        help_heading = "Limits"
    )]
    pub max_total_size: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOpts {
    #[arg(
        short = 'o',
        long,
        help = "Write the result to this file instead of stdout.",
        value_name = "FILE",
        help_heading = "Output"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        help = "Output format [default: markdown].",
        value_name = "FORMAT",
        help_heading = "Output"
    )]
    pub format: Option<OutputFormat>,

    #[arg(
        short = 'p',
        long,
        help = "Prepend a prompt: a template name, a file path, or literal text.",
        value_name = "PROMPT",
        help_heading = "Output"
    )]
    pub prompt: Option<String>,

    #[arg(
        long,
        help = "Only collect README.md files.",
        help_heading = "Output"
    )]
    pub readme_only: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,
    #[clap(flatten)]
    pub limits: LimitOpts,
    #[clap(flatten)]
    pub output: OutputOpts,

    #[arg(long, help = "Show debug output (same as -vvv).")]
    pub debug: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "list-codes",
    author,
    version,
    about = "Summarize a project's structure and source code as one Markdown document.",
    long_about = "list-codes scans a project directory, detects its languages, filters out \ntests, assets, ignored and oversized files, and prints the directory tree \nand source files as Markdown, ready to hand to a language model.",
    after_help = "EXAMPLES:\n  list-codes -f ./my-project -o context.md\n  list-codes --include .env --exclude docs --max-total-size 2m\n  list-codes -p review --format json\n  list-codes completion zsh --save",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[clap(flatten)]
    pub scan: ScanArgs,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv, -vvv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence all log output."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Generate shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(value_enum, value_name = "SHELL", help = "Shell to generate completions for.")]
    pub shell: Shell,

    #[arg(
        long,
        help = "Save the script to the shell's standard completion directory instead of printing it."
    )]
    pub save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_scan_flags() {
        let cli = Cli::try_parse_from([
            "list-codes",
            "-f",
            "proj",
            "-i",
            ".env",
            "--include",
            "src",
            "-e",
            "docs",
            "--exclude-name",
            "gen",
            "--max-depth",
            "3",
            "--max-total-size",
            "2m",
            "--format",
            "json",
            "--no-deps",
            "-vv",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.scan.project_config.folder, PathBuf::from("proj"));
        assert_eq!(cli.scan.filters.include, vec![".env", "src"]);
        assert_eq!(cli.scan.filters.exclude, vec!["docs"]);
        assert_eq!(cli.scan.filters.exclude_name, vec!["gen"]);
        assert_eq!(cli.scan.limits.max_depth, Some(3));
        assert_eq!(cli.scan.limits.max_total_size.as_deref(), Some("2m"));
        assert_eq!(cli.scan.output.format, Some(OutputFormat::Json));
        assert!(cli.scan.filters.no_deps);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parses_completion_subcommand() {
        let cli = Cli::try_parse_from(["list-codes", "completion", "zsh", "--save"]).unwrap();
        match cli.command {
            Some(Commands::Completion(args)) => {
                assert_eq!(args.shell, Shell::Zsh);
                assert!(args.save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flags_conflict() {
        assert!(Cli::try_parse_from(["list-codes", "--config", "a.toml", "--no-config"]).is_err());
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("markdown"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}
