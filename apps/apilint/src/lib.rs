//! apilint core library.
//!
//! This crate lints OpenAPI/AsyncAPI-style documents (JSON or YAML) against
//! a declarative ruleset: JSONPath `given` selectors, per-field `then`
//! clauses bound to built-in functions, format scoping and aliases.
//!
//! High-level modules:
//! - `content`: JSON/YAML detection and parsing into a `serde_json::Value`.
//! - `ruleset`: Rule model, aliases, formats and structural validation.
//! - `functions`: Built-in lint functions and their option checks.
//! - `lint`: The evaluation engine producing `LintResult`s.
//! - `validator`: Text-in entry points (`validate_document`, `validate_ruleset`).
//! - `path`, `selector`, `target`, `message`: Paths, JSONPath, targets, templates.
//! - `cli`, `config`, `runner`, `models`, `output`: The command-line surface.
pub mod cli;
pub mod config;
pub mod content;
pub mod document;
pub mod error;
pub mod functions;
pub mod lint;
pub mod message;
pub mod models;
pub mod output;
pub mod path;
pub mod ruleset;
pub mod runner;
pub mod selector;
pub mod target;
pub mod validator;
