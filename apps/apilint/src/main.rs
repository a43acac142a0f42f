//! apilint CLI binary entry point.
//! Delegates to the library for ruleset loading and linting and prints results.

use apilint::cli::{Cli, Commands};
use apilint::{config, output, runner, validator};
use clap::Parser;
use std::fs;
use std::process::exit;

fn init_tracing(verbose: bool) {
    let default = if verbose { "apilint=debug" } else { "off" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn fail_setup(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", output::error_prefix(), message);
    exit(2);
}

fn main() {
    let cli = Cli::parse();
    let verbose = matches!(cli.cmd, Commands::Lint { verbose: true, .. });
    init_tracing(verbose);

    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Functions { output } => {
            output::print_functions(output.as_deref().unwrap_or("human"));
        }
        Commands::Ruleset { path, output } => {
            let text = match fs::read_to_string(&path) {
                Ok(s) => s,
                Err(e) => fail_setup(format!("cannot read ruleset {}: {}", path, e)),
            };
            let res = match validator::validate_ruleset(&text) {
                Ok(r) => r,
                Err(e) => fail_setup(e),
            };
            output::print_ruleset_validation(&res, output.as_deref().unwrap_or("human"));
            if !res.passed {
                exit(1);
            }
        }
        Commands::Lint {
            repo_root,
            ruleset,
            output,
            verbose: _,
            documents,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                ruleset.as_deref(),
                output.as_deref(),
                &documents,
            );
            let Some(ruleset_path) = eff.ruleset.as_deref() else {
                fail_setup("Ruleset is not configured. Pass --ruleset or add apilint.toml.");
            };
            if eff.documents.is_empty() {
                fail_setup("No documents given. Pass paths/globs or set documents in apilint.toml.");
            }
            if config::load_config(&eff.repo_root).is_none() && eff.output != "json" {
                eprintln!(
                    "{} No apilint.toml found; using defaults.",
                    output::note_prefix()
                );
            }
            let rs = match runner::read_ruleset(&eff.repo_root.join(ruleset_path)) {
                Ok(rs) => rs,
                Err(apilint::error::Error::InvalidRuleset(errors)) => {
                    let res = validator::RulesetValidation {
                        passed: false,
                        errors: errors.0,
                    };
                    output::print_ruleset_validation(&res, &eff.output);
                    exit(2);
                }
                Err(e) => fail_setup(e),
            };
            let files = runner::expand_documents(&eff.repo_root, &eff.documents);
            if files.is_empty() {
                fail_setup(format!(
                    "No documents matched: [{}]",
                    eff.documents.join(", ")
                ));
            }
            let report = runner::run_lint(&eff.repo_root, &rs, &files);
            output::print_lint(&report, &eff.output);
            if report.fails(eff.fail_on) {
                exit(1);
            }
        }
    }
}
