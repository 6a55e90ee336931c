//! Domain models for taskdeps
//!
//! Contains the core data types without any I/O concerns.

mod id;
mod task;
mod dependency;
mod graph;

pub use id::{sort_key, subsection_key, TaskKey};
pub use task::{Complexity, ParseResult, Section, Task};
pub use dependency::InferredDependency;
pub use graph::{DependencyGraph, GraphError};
