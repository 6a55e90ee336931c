//! Inferred dependency edges

use serde::{Deserialize, Serialize};

/// A candidate edge: `from_task` depends on (is blocked by) `to_task`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InferredDependency {
    #[serde(rename = "from")]
    pub from_task: String,

    #[serde(rename = "to")]
    pub to_task: String,

    /// Certainty in `0..=100`
    pub confidence: u8,

    /// Human-readable provenance
    pub reason: String,
}

impl InferredDependency {
    pub fn new(
        from_task: impl Into<String>,
        to_task: impl Into<String>,
        confidence: u8,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            from_task: from_task.into(),
            to_task: to_task.into(),
            confidence: confidence.min(100),
            reason: reason.into(),
        }
    }

    /// Returns the ordered pair identifying this edge
    pub fn pair(&self) -> (&str, &str) {
        (&self.from_task, &self.to_task)
    }
}
