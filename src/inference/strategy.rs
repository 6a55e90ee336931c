//! Inference strategies
//!
//! Each strategy is an independent, pure function of the parsed document that
//! proposes candidate edges with a fixed confidence. Strategies never see each
//! other's output; the engine pools and merges them.
//!
//! | Strategy | Confidence | Signal |
//! |----------|-----------:|--------|
//! | [`SubsectionOrder`] | 90 | Consecutive IDs in the same subsection |
//! | [`FileStem`] | 85 | Tasks touching files with the same stem |
//! | [`KeywordCategories`] | 50 | Description categories (mutation needs schema, ...) |
//! | [`SectionOrder`] | 25 | First task of a section after last task of the previous |

use std::collections::HashMap;
use std::hash::Hash;

use super::rules::KeywordRules;
use crate::domain::{InferredDependency, ParseResult, Section, Task, TaskKey};

pub const SUBSECTION_CONFIDENCE: u8 = 90;
pub const FILE_STEM_CONFIDENCE: u8 = 85;
pub const KEYWORD_CONFIDENCE: u8 = 50;
pub const SECTION_CONFIDENCE: u8 = 25;

/// Extensions stripped when computing a file stem
pub const STEM_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "vue", "py", "go"];

/// A task with its identifier parsed once
#[derive(Debug, Clone)]
pub struct TaskEntry<'a> {
    pub task: &'a Task,
    pub key: TaskKey,
}

/// Flattened view of a parsed document shared by all strategies
#[derive(Debug, Clone)]
pub struct TaskSet<'a> {
    sections: &'a [Section],
    entries: Vec<TaskEntry<'a>>,
}

impl<'a> TaskSet<'a> {
    pub fn new(parsed: &'a ParseResult) -> Self {
        Self::from_sections(&parsed.sections)
    }

    pub fn from_sections(sections: &'a [Section]) -> Self {
        let entries = sections
            .iter()
            .flat_map(|s| s.tasks.iter())
            .map(|task| TaskEntry {
                task,
                key: task.key(),
            })
            .collect();

        Self { sections, entries }
    }

    /// Tasks in document order
    pub fn entries(&self) -> &[TaskEntry<'a>] {
        &self.entries
    }

    pub fn sections(&self) -> &'a [Section] {
        self.sections
    }
}

/// A source of candidate dependency edges
pub trait InferenceStrategy {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Proposes candidate edges for the whole document
    fn infer(&self, tasks: &TaskSet<'_>) -> Vec<InferredDependency>;
}

/// Groups items by key, keeping groups and members in first-seen order
fn ordered_groups<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Vec<(K, Vec<V>)>
where
    K: Eq + Hash + Clone,
{
    let mut groups: Vec<(K, Vec<V>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for (key, value) in items {
        match index.get(&key) {
            Some(&i) => groups[i].1.push(value),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![value]));
            }
        }
    }

    groups
}

/// Stable sort of entries by identifier
fn sort_entries(entries: &mut [&TaskEntry<'_>]) {
    entries.sort_by(|a, b| a.key.cmp(&b.key));
}

/// Each task depends on its predecessor within the same subsection
#[derive(Debug, Clone, Copy)]
pub struct SubsectionOrder {
    pub confidence: u8,
}

impl Default for SubsectionOrder {
    fn default() -> Self {
        Self {
            confidence: SUBSECTION_CONFIDENCE,
        }
    }
}

impl InferenceStrategy for SubsectionOrder {
    fn name(&self) -> &'static str {
        "subsection"
    }

    fn infer(&self, tasks: &TaskSet<'_>) -> Vec<InferredDependency> {
        let groups = ordered_groups(
            tasks
                .entries()
                .iter()
                .filter(|e| e.key.has_subsection())
                .map(|e| (e.key.subsection_key(), e)),
        );

        let mut deps = Vec::new();
        for (subsection, mut members) in groups {
            if members.len() < 2 {
                continue;
            }
            sort_entries(&mut members);

            for pair in members.windows(2) {
                deps.push(InferredDependency::new(
                    &pair[1].task.id,
                    &pair[0].task.id,
                    self.confidence,
                    format!("subsection order: sequential within {}", subsection),
                ));
            }
        }
        deps
    }
}

/// Returns the lowercase, extension-stripped basename of a path
pub fn extract_stem(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let name = match name.rsplit_once('.') {
        Some((stem, ext)) if STEM_EXTENSIONS.contains(&ext) => stem,
        _ => name,
    };
    name.to_lowercase()
}

/// Later tasks depend on every earlier task touching a file with the same stem
#[derive(Debug, Clone, Copy)]
pub struct FileStem {
    pub confidence: u8,
}

impl Default for FileStem {
    fn default() -> Self {
        Self {
            confidence: FILE_STEM_CONFIDENCE,
        }
    }
}

impl InferenceStrategy for FileStem {
    fn name(&self) -> &'static str {
        "file_stem"
    }

    fn infer(&self, tasks: &TaskSet<'_>) -> Vec<InferredDependency> {
        let groups = ordered_groups(tasks.entries().iter().enumerate().flat_map(|(i, e)| {
            e.task
                .files
                .iter()
                .map(move |file| (extract_stem(file), (i, e)))
        }));

        let mut deps = Vec::new();
        for (stem, members) in groups {
            // A task listing two files with one stem still counts once
            let mut seen = Vec::with_capacity(members.len());
            let mut distinct: Vec<&TaskEntry<'_>> = Vec::with_capacity(members.len());
            for (i, entry) in members {
                if !seen.contains(&i) {
                    seen.push(i);
                    distinct.push(entry);
                }
            }

            if distinct.len() < 2 {
                continue;
            }
            sort_entries(&mut distinct);

            for (i, later) in distinct.iter().enumerate().skip(1) {
                for earlier in &distinct[..i] {
                    deps.push(InferredDependency::new(
                        &later.task.id,
                        &earlier.task.id,
                        self.confidence,
                        format!("file pattern: shared stem '{}'", stem),
                    ));
                }
            }
        }
        deps
    }
}

/// Tasks depend on earlier tasks in the categories their own category requires
#[derive(Debug, Clone, Copy)]
pub struct KeywordCategories {
    pub confidence: u8,
    pub rules: KeywordRules,
}

impl Default for KeywordCategories {
    fn default() -> Self {
        Self {
            confidence: KEYWORD_CONFIDENCE,
            rules: KeywordRules::default(),
        }
    }
}

impl InferenceStrategy for KeywordCategories {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn infer(&self, tasks: &TaskSet<'_>) -> Vec<InferredDependency> {
        let classified: Vec<_> = tasks
            .entries()
            .iter()
            .map(|e| (e, self.rules.classify(&e.task.description)))
            .collect();

        let mut by_category = HashMap::new();
        for (entry, categories) in &classified {
            for category in categories {
                by_category
                    .entry(*category)
                    .or_insert_with(Vec::new)
                    .push(*entry);
            }
        }

        let mut deps = Vec::new();
        for (entry, categories) in &classified {
            for &category in categories {
                for &required in self.rules.required(category) {
                    let Some(candidates) = by_category.get(&required) else {
                        continue;
                    };
                    for other in candidates {
                        if other.task.id != entry.task.id && other.key < entry.key {
                            deps.push(InferredDependency::new(
                                &entry.task.id,
                                &other.task.id,
                                self.confidence,
                                format!(
                                    "keyword: '{}' typically depends on '{}'",
                                    category, required
                                ),
                            ));
                        }
                    }
                }
            }
        }
        deps
    }
}

/// First task of each section depends on the last task of the previous one
#[derive(Debug, Clone, Copy)]
pub struct SectionOrder {
    pub confidence: u8,
}

impl Default for SectionOrder {
    fn default() -> Self {
        Self {
            confidence: SECTION_CONFIDENCE,
        }
    }
}

impl InferenceStrategy for SectionOrder {
    fn name(&self) -> &'static str {
        "section"
    }

    fn infer(&self, tasks: &TaskSet<'_>) -> Vec<InferredDependency> {
        tasks
            .sections()
            .windows(2)
            .filter_map(|pair| {
                let (prev, current) = (&pair[0], &pair[1]);
                let prev_last = prev.tasks.last()?;
                let current_first = current.tasks.first()?;
                Some(InferredDependency::new(
                    &current_first.id,
                    &prev_last.id,
                    self.confidence,
                    format!(
                        "section order: section {} after section {}",
                        current.number, prev.number
                    ),
                ))
            })
            .collect()
    }
}

/// The four built-in strategies, strongest signal first
pub fn default_strategies() -> Vec<Box<dyn InferenceStrategy>> {
    vec![
        Box::new(SubsectionOrder::default()),
        Box::new(FileStem::default()),
        Box::new(KeywordCategories::default()),
        Box::new(SectionOrder::default()),
    ]
}
