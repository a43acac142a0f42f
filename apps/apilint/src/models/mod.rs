//! Report models shared by the runner and the printers.

use crate::ruleset::Severity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A single diagnostic with its file and location.
pub struct Issue {
    pub file: String,
    pub rule: String,
    pub severity: String,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A rule that stopped evaluating on one file.
pub struct FileRuleError {
    pub file: String,
    pub rule: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Aggregated counts used by printers and exit codes.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub hints: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Lint results across every linted file.
pub struct Report {
    pub issues: Vec<Issue>,
    #[serde(rename = "ruleErrors")]
    pub rule_errors: Vec<FileRuleError>,
    pub summary: Summary,
}

impl Report {
    /// Recount the summary from `issues`.
    pub fn tally(&mut self, files: usize) {
        let mut summary = Summary {
            files,
            ..Default::default()
        };
        for is in &self.issues {
            match is.severity.as_str() {
                "error" => summary.errors += 1,
                "warn" => summary.warnings += 1,
                "info" => summary.infos += 1,
                _ => summary.hints += 1,
            }
        }
        self.summary = summary;
    }

    /// Whether the run should exit non-zero: any rule error, or any issue
    /// at or above `fail_on`. `off` never fails on issues.
    pub fn fails(&self, fail_on: Severity) -> bool {
        if !self.rule_errors.is_empty() {
            return true;
        }
        if fail_on == Severity::Off {
            return false;
        }
        self.issues.iter().any(|is| {
            Severity::parse(&is.severity).map_or(true, |s| s.rank() >= fail_on.rank())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: &str) -> Issue {
        Issue {
            file: "a.yaml".into(),
            rule: "r".into(),
            severity: severity.into(),
            path: "[info]".into(),
            message: "m".into(),
        }
    }

    #[test]
    fn test_tally_counts_by_severity() {
        let mut report = Report {
            issues: vec![issue("error"), issue("warn"), issue("warn"), issue("hint")],
            ..Default::default()
        };
        report.tally(3);
        assert_eq!(
            report.summary,
            Summary {
                errors: 1,
                warnings: 2,
                infos: 0,
                hints: 1,
                files: 3
            }
        );
    }

    #[test]
    fn test_fails_respects_threshold() {
        let report = Report {
            issues: vec![issue("warn")],
            ..Default::default()
        };
        assert!(!report.fails(Severity::Error));
        assert!(report.fails(Severity::Warn));
        assert!(report.fails(Severity::Hint));
        assert!(!report.fails(Severity::Off));

        let mut with_errors = Report::default();
        with_errors.rule_errors.push(FileRuleError {
            file: "a.yaml".into(),
            rule: "r".into(),
            message: "m".into(),
        });
        assert!(with_errors.fails(Severity::Off));
    }
}
