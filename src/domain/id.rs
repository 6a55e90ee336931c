//! Hierarchical task identifiers
//!
//! ID Format:
//! - Two-level: `1.1`, `1.2`
//! - Three-level: `1.1.1`, `1.2.3`
//! - Letter-suffixed for insertions: `1.1.2a`, `1.1.2b`
//!
//! Parsing is lenient: a dot-separated segment contributes its leading run of
//! digits and is skipped entirely when it has none. Only the last segment may
//! carry the letter suffix.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Comparable key for a task identifier
///
/// Ordering compares the numeric parts lexicographically (a strict prefix sorts
/// first), then the suffix, where no suffix sorts before any letter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TaskKey {
    /// The identifier as written in the document
    raw: String,
    /// Numeric parts (e.g., `[1, 1, 2]` for `1.1.2a`)
    parts: Vec<u64>,
    /// Trailing lowercase letter of the last segment
    suffix: Option<char>,
}

impl TaskKey {
    /// Parses a raw identifier, never failing
    pub fn parse(raw: &str) -> Self {
        let segments: Vec<&str> = raw.split('.').collect();
        let last = segments.len().saturating_sub(1);
        let mut parts = Vec::with_capacity(segments.len());
        let mut suffix = None;

        for (i, segment) in segments.iter().enumerate() {
            let digits = leading_digits(segment);
            let Ok(value) = digits.parse::<u64>() else {
                continue;
            };
            parts.push(value);

            if i == last {
                let mut rest = segment[digits.len()..].chars();
                if let (Some(c), None) = (rest.next(), rest.next()) {
                    if c.is_ascii_lowercase() {
                        suffix = Some(c);
                    }
                }
            }
        }

        Self {
            raw: raw.to_string(),
            parts,
            suffix,
        }
    }

    /// Returns the identifier as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the numeric parts
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Returns the letter suffix, if any
    pub fn suffix(&self) -> Option<char> {
        self.suffix
    }

    /// Returns the subsection key
    ///
    /// - `1.1.2` -> `"1.1"`
    /// - `1.1.2a` -> `"1.1"`
    /// - `1.2` -> `"1"`
    pub fn subsection_key(&self) -> String {
        match self.parts.len() {
            0 => String::new(),
            1 => self.parts[0].to_string(),
            n => join_parts(&self.parts[..n - 1]),
        }
    }

    /// Returns true if this key belongs to a subsection with siblings
    ///
    /// Single-part identifiers have no parent group.
    pub fn has_subsection(&self) -> bool {
        self.parts.len() >= 2
    }
}

fn leading_digits(segment: &str) -> &str {
    let end = segment
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(segment.len());
    &segment[..end]
}

fn join_parts(parts: &[u64]) -> String {
    parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns the sortable key for a raw identifier
pub fn sort_key(raw: &str) -> TaskKey {
    TaskKey::parse(raw)
}

/// Returns the subsection key for a raw identifier
pub fn subsection_key(raw: &str) -> String {
    TaskKey::parse(raw).subsection_key()
}

impl PartialEq for TaskKey {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts && self.suffix == other.suffix
    }
}

impl Eq for TaskKey {}

impl Hash for TaskKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
        self.suffix.hash(state);
    }
}

impl Ord for TaskKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

impl PartialOrd for TaskKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for TaskKey {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TaskKey> for String {
    fn from(key: TaskKey) -> Self {
        key.raw
    }
}
