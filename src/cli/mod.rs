//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Parse | Checklist to task JSON | `parse tasks.md` |
//! | Inference | Dependency edges | `infer tasks.md`, `infer parsed.json` |
//! | Graph | Views over inferred edges | `ready`, `blocked`, `order` |
//! | Structure | Planning document checks | `check proposal.md`, `hook` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Exit Codes
//!
//! `0` success, `1` operational failure, `2` blocking document problems.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! taskdeps --verbose infer tasks.md
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod parse_cmd;
mod infer_cmd;
mod graph_cmd;
mod check_cmd;

pub use app::{run, Cli, Commands, InferenceArgs, EXIT_BLOCKED};
pub use output::{Output, OutputFormat};
