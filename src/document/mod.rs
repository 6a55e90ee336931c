//! # Documents
//!
//! Reading and checking planning documents.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `parser` | Checklist text -> sections and tasks, with errors and warnings |
//! | `format` | Structural checks for `proposal.md`, `tasks.md`, `design.md` |
//! | `input` | Loading from disk/stdin and the JSON interchange form |
//!
//! Parsing never fails: problems land in [`ParseResult::errors`] (blocking)
//! and [`ParseResult::warnings`] (advisory).
//!
//! [`ParseResult::errors`]: crate::domain::ParseResult
//! [`ParseResult::warnings`]: crate::domain::ParseResult

mod parser;
mod format;
mod input;

pub use parser::{parse_document, parse_tasks_md, validate_dependencies};
pub use format::{
    check_document, validate_design, validate_proposal, validate_tasks, DocumentKind, FormatReport,
};
pub use input::{
    parse_json_document, read_file, to_json_document, InputError, Source, STDIN_MARKER,
};
