//! Configuration discovery and effective settings resolution.
//!
//! apilint reads `apilint.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `ruleset`: none (must be given)
//! - `documents`: none (must be given)
//! - `output`: `human`
//! - `fail_on`: `error`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::ruleset::Severity;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILES: [&str; 3] = ["apilint.toml", "apilint.yaml", "apilint.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `apilint.toml|yaml`.
pub struct ApilintConfig {
    pub ruleset: Option<String>,
    pub documents: Option<Vec<String>>,
    pub output: Option<String>,
    /// Lowest severity that fails the run: error|warn|info|hint.
    pub fail_on: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub ruleset: Option<String>,
    pub documents: Vec<String>,
    pub output: String,
    pub fail_on: Severity,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when an `apilint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ApilintConfig` from the first config file present under `root`.
pub fn load_config(root: &Path) -> Option<ApilintConfig> {
    for name in CONFIG_FILES {
        let p = root.join(name);
        if !p.exists() {
            continue;
        }
        let s = fs::read_to_string(&p).ok()?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<ApilintConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<ApilintConfig>(&s).map_err(|e| e.to_string())
        };
        return match parsed {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!(file = %p.display(), error = %e, "ignoring unreadable config");
                None
            }
        };
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_ruleset: Option<&str>,
    cli_output: Option<&str>,
    cli_documents: &[String],
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let ruleset = cli_ruleset.map(|s| s.to_string()).or(cfg.ruleset);
    let documents = if cli_documents.is_empty() {
        cfg.documents.unwrap_or_default()
    } else {
        cli_documents.to_vec()
    };
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let fail_on = cfg
        .fail_on
        .as_deref()
        .and_then(|s| match Severity::parse(s) {
            Some(sev) => Some(sev),
            None => {
                warn!(value = %s, "unknown fail_on severity, using error");
                None
            }
        })
        .unwrap_or(Severity::Error);

    Effective {
        repo_root,
        ruleset,
        documents,
        output,
        fail_on,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("apilint.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
ruleset = "rules/api.yaml"
documents = ["apis/**/*.yaml"]
output = "json"
fail_on = "warn"
    "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, &[]);
        assert_eq!(eff.ruleset.as_deref(), Some("rules/api.yaml"));
        assert_eq!(eff.documents, vec!["apis/**/*.yaml".to_string()]);
        assert_eq!(eff.output, "json");
        assert_eq!(eff.fail_on, Severity::Warn);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("apilint.yaml"), "ruleset: rules.json\n").unwrap();

        let eff = resolve_effective(root.to_str(), None, None, &[]);
        assert_eq!(eff.ruleset.as_deref(), Some("rules.json"));
        assert!(eff.documents.is_empty());
        assert_eq!(eff.output, "human");
        assert_eq!(eff.fail_on, Severity::Error);
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("apilint.toml"),
            "ruleset = \"a.yaml\"\ndocuments = [\"x.yaml\"]\noutput = \"json\"\n",
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("b.yaml"),
            Some("human"),
            &["y.yaml".to_string()],
        );
        assert_eq!(eff.ruleset.as_deref(), Some("b.yaml"));
        assert_eq!(eff.documents, vec!["y.yaml".to_string()]);
        assert_eq!(eff.output, "human");
    }

    #[test]
    fn test_detect_repo_root_walks_up() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("apilint.yml"), "output: human\n").unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root.to_path_buf());
    }

    #[test]
    fn test_bad_config_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("apilint.toml"), "ruleset = [").unwrap();
        assert!(load_config(dir.path()).is_none());
    }
}
