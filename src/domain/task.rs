//! Task domain model
//!
//! Tasks are the checklist items of a planning document. They are grouped into
//! numbered sections and carry optional routing annotations (files, explicit
//! dependencies, agent, complexity).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::TaskKey;

/// Estimated complexity of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    /// Returns all valid complexity values
    pub fn all() -> &'static [Complexity] {
        &[Complexity::Low, Complexity::Medium, Complexity::High]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Complexity::Low),
            "medium" => Ok(Complexity::Medium),
            "high" => Ok(Complexity::High),
            _ => Err(format!("Invalid complexity: {}", s)),
        }
    }
}

/// A checklist item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier as written (e.g., `1.1.2a`)
    pub id: String,

    /// Text between the identifier and the first annotation
    #[serde(default)]
    pub description: String,

    /// Referenced file paths
    #[serde(default)]
    pub files: Vec<String>,

    /// Explicitly declared dependencies (raw IDs, validated separately)
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Preferred agent for this task
    #[serde(default)]
    pub agent_type: Option<String>,

    #[serde(default)]
    pub complexity: Complexity,

    /// Whether the checkbox is ticked
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a new open task with no annotations
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            files: Vec::new(),
            depends_on: Vec::new(),
            agent_type: None,
            complexity: Complexity::default(),
            completed: false,
        }
    }

    /// Returns the comparable key for this task's identifier
    pub fn key(&self) -> TaskKey {
        TaskKey::parse(&self.id)
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// A numbered section of the document (`## 1. Setup`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub number: u64,
    pub name: String,

    /// Tasks in document order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Section {
    pub fn new(number: u64, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// Outcome of parsing a task document
///
/// When `errors` is non-empty the sections may be partially populated and must
/// not be treated as actionable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(default)]
    pub sections: Vec<Section>,

    /// Blocking problems
    #[serde(default)]
    pub errors: Vec<String>,

    /// Advisory problems
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ParseResult {
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self {
            sections,
            ..Self::default()
        }
    }

    /// Returns true if no blocking errors were recorded
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over all tasks in document order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.iter().flat_map(|s| s.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|s| s.tasks.len()).sum()
    }

    /// Finds a task by its raw identifier
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id == id)
    }
}
