//! File-level lint runner used by the CLI.
//!
//! Expands document globs relative to the repository root, lints each file
//! in parallel and folds the per-file reports into a single `Report`.

use crate::document::Document;
use crate::error::Error;
use crate::lint::lint;
use crate::models::{FileRuleError, Issue, Report};
use crate::ruleset::Ruleset;
use crate::validator::load_ruleset;
use glob::glob;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read and build the ruleset at `path`.
pub fn read_ruleset(path: &Path) -> Result<Ruleset, Error> {
    let text = fs::read_to_string(path)?;
    load_ruleset(&text)
}

/// Expand glob `patterns` relative to `root` into a sorted, de-duplicated file list.
pub fn expand_documents(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pat in patterns {
        let abs = if Path::new(pat).is_absolute() {
            PathBuf::from(pat)
        } else {
            root.join(pat)
        };
        let pattern = abs.to_string_lossy().to_string();
        match glob(&pattern) {
            Ok(paths) => files.extend(paths.flatten().filter(|p| p.is_file())),
            Err(e) => warn!(pattern = %pat, error = %e, "invalid document pattern"),
        }
    }
    files.sort();
    files.dedup();
    files
}

fn display_path(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

fn load_issue(file: String, message: String) -> Issue {
    Issue {
        file,
        rule: "load-document".into(),
        severity: "error".into(),
        path: "$".into(),
        message,
    }
}

/// Lint every file against `ruleset`.
pub fn run_lint(root: &Path, ruleset: &Ruleset, files: &[PathBuf]) -> Report {
    let per_file: Vec<(Vec<Issue>, Vec<FileRuleError>)> = files
        .par_iter()
        .map(|path| {
            let file = display_path(root, path);
            let text = match fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => return (vec![load_issue(file, e.to_string())], Vec::new()),
            };
            let document = match Document::parse(&text) {
                Ok(d) => d,
                Err(e) => return (vec![load_issue(file, e.to_string())], Vec::new()),
            };
            let report = match lint(&document, ruleset) {
                Ok(r) => r,
                Err(e) => return (vec![load_issue(file, e.to_string())], Vec::new()),
            };
            let issues = report
                .diagnostics()
                .map(|d| Issue {
                    file: file.clone(),
                    rule: d.rule.clone(),
                    severity: d.severity.to_string(),
                    path: d.path.clone(),
                    message: d.message.clone(),
                })
                .collect();
            let errors = report
                .rule_errors
                .iter()
                .map(|e| FileRuleError {
                    file: file.clone(),
                    rule: e.rule.clone(),
                    message: e.message.clone(),
                })
                .collect();
            (issues, errors)
        })
        .collect();

    let mut report = Report::default();
    for (issues, errors) in per_file {
        report.issues.extend(issues);
        report.rule_errors.extend(errors);
    }
    // Stable: keeps rule and match order within a file
    report.issues.sort_by(|a, b| a.file.cmp(&b.file));
    report.tally(files.len());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RULESET: &str = r#"{
        "rules": {
            "info-title": {
                "given": "$.info",
                "then": {"field": "title", "function": "truthy"}
            },
            "info-version": {
                "given": "$.info",
                "severity": "warn",
                "then": {"field": "version", "function": "defined"}
            }
        }
    }"#;

    #[test]
    fn test_run_lint_over_globbed_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("apis")).unwrap();
        fs::write(root.join("apis/a.yaml"), "info:\n  title: ''\n").unwrap();
        fs::write(root.join("apis/b.json"), r#"{"info": {"title": "B", "version": "1"}}"#).unwrap();
        fs::write(root.join("apis/broken.json"), "{").unwrap();
        let rules = root.join("rules.json");
        fs::write(&rules, RULESET).unwrap();

        let ruleset = read_ruleset(&rules).unwrap();
        let files = expand_documents(
            root,
            &["apis/*.yaml".to_string(), "apis/*.json".to_string()],
        );
        assert_eq!(files.len(), 3);

        let report = run_lint(root, &ruleset, &files);
        let seen: Vec<(&str, &str)> = report
            .issues
            .iter()
            .map(|i| (i.file.as_str(), i.rule.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("apis/a.yaml", "info-title"),
                ("apis/a.yaml", "info-version"),
                ("apis/broken.json", "load-document"),
            ]
        );
        assert_eq!(report.summary.errors, 2);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.files, 3);
    }

    #[test]
    fn test_read_ruleset_rejects_invalid() {
        let dir = tempdir().unwrap();
        let rules = dir.path().join("rules.yaml");
        fs::write(&rules, "rules:\n  r:\n    given: $\n").unwrap();
        assert!(matches!(read_ruleset(&rules), Err(Error::InvalidRuleset(_))));
        assert!(matches!(
            read_ruleset(&dir.path().join("missing.yaml")),
            Err(Error::Io(_))
        ));
    }
}
