//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "apilint",
    version,
    about = "Ruleset-driven linter for OpenAPI and AsyncAPI documents",
    long_about = "apilint evaluates JSON/YAML API descriptions against a declarative ruleset of JSONPath selectors and built-in functions.\n\nConfiguration precedence: CLI > apilint.toml > defaults.",
    after_help = "Examples:\n  apilint lint --ruleset rules.yaml apis/*.yaml\n  apilint lint --output json\n  apilint ruleset rules.yaml\n  apilint functions",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current apilint version.")]
    Version,
    /// Lint documents against a ruleset
    #[command(
        about = "Lint API documents",
        long_about = "Evaluate every document matched by the given globs against the ruleset. Diagnostics at or above fail_on (default: error) and rule errors fail the run.",
        after_help = "Examples:\n  apilint lint --ruleset rules.yaml petstore.yaml\n  apilint lint --ruleset rules.json 'apis/**/*.json' --output json"
    )]
    Lint {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Path to the ruleset (JSON or YAML)")]
        ruleset: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Log rule evaluation to stderr")]
        verbose: bool,
        #[arg(help = "Document paths or globs, relative to the repository root")]
        documents: Vec<String>,
    },
    /// Validate a ruleset without linting anything
    #[command(
        about = "Validate a ruleset",
        long_about = "Run the structural ruleset checks and report every problem found."
    )]
    Ruleset {
        #[arg(help = "Path to the ruleset (JSON or YAML)")]
        path: String,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// List built-in functions
    #[command(about = "List built-in functions")]
    Functions {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
