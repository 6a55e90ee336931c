//! taskdeps - Task graphs from planning checklists
//!
//! Parses a `tasks.md` style checklist into numbered sections and tasks, then
//! infers which tasks block which using several independent heuristics with
//! confidence scores. High-confidence edges can be applied automatically; the
//! rest are flagged for review.

pub mod domain;
pub mod document;
pub mod inference;
pub mod storage;
pub mod cli;

pub use domain::{Complexity, InferredDependency, ParseResult, Section, Task, TaskKey};
pub use document::{parse_document, parse_tasks_md, validate_dependencies};
pub use inference::{infer, InferenceEngine, InferenceResult, DEFAULT_THRESHOLD};
