//! Pooling, deduplication and thresholding of candidate edges

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::strategy::{default_strategies, InferenceStrategy, TaskSet};
use crate::domain::{InferredDependency, ParseResult};

/// Default confidence needed for an edge to be applied automatically
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Inferred edges split by confidence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Edges at or above the threshold
    pub auto_apply: Vec<InferredDependency>,

    /// Edges below the threshold
    pub pending_review: Vec<InferredDependency>,
}

impl InferenceResult {
    pub fn len(&self) -> usize {
        self.auto_apply.len() + self.pending_review.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All edges, auto-applied first
    pub fn edges(&self) -> impl Iterator<Item = &InferredDependency> {
        self.auto_apply.iter().chain(self.pending_review.iter())
    }
}

/// Candidate edges produced by one strategy
#[derive(Debug, Clone)]
pub struct StrategyOutput {
    pub strategy: &'static str,
    pub edges: Vec<InferredDependency>,
}

/// Keeps one edge per ordered `(from, to)` pair
///
/// The highest confidence wins; on a tie the first-seen edge stays. Output
/// order is the first-seen order of each pair.
pub fn merge(candidates: impl IntoIterator<Item = InferredDependency>) -> Vec<InferredDependency> {
    let mut merged: Vec<InferredDependency> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for dep in candidates {
        let key = (dep.from_task.clone(), dep.to_task.clone());
        match index.get(&key) {
            Some(&i) => {
                if dep.confidence > merged[i].confidence {
                    merged[i] = dep;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(dep);
            }
        }
    }

    merged
}

/// Splits edges at `threshold`, preserving order within each bucket
pub fn categorize(edges: Vec<InferredDependency>, threshold: u8) -> InferenceResult {
    let (auto_apply, pending_review): (Vec<_>, Vec<_>) = edges
        .into_iter()
        .partition(|dep| dep.confidence >= threshold);

    InferenceResult {
        auto_apply,
        pending_review,
    }
}

/// Runs a fixed list of strategies and merges their output
pub struct InferenceEngine {
    threshold: u8,
    strategies: Vec<Box<dyn InferenceStrategy>>,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl InferenceEngine {
    /// Creates an engine with the built-in strategies
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
            strategies: default_strategies(),
        }
    }

    /// Replaces the strategy list
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn InferenceStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs every strategy independently, in list order
    pub fn candidates(&self, parsed: &ParseResult) -> Vec<StrategyOutput> {
        let tasks = TaskSet::new(parsed);
        self.strategies
            .iter()
            .map(|strategy| StrategyOutput {
                strategy: strategy.name(),
                edges: strategy.infer(&tasks),
            })
            .collect()
    }

    /// Merges strategy output and applies the threshold
    pub fn resolve(&self, outputs: Vec<StrategyOutput>) -> InferenceResult {
        let merged = merge(outputs.into_iter().flat_map(|o| o.edges));
        categorize(merged, self.threshold)
    }

    pub fn infer(&self, parsed: &ParseResult) -> InferenceResult {
        self.resolve(self.candidates(parsed))
    }
}

/// Infers dependencies with the built-in strategies
pub fn infer(parsed: &ParseResult, threshold: u8) -> InferenceResult {
    InferenceEngine::new(threshold).infer(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;
    use crate::domain::{Section, Task};
    use crate::inference::strategy::{SectionOrder, SUBSECTION_CONFIDENCE};
    use proptest::prelude::*;

    fn dep(from: &str, to: &str, confidence: u8, reason: &str) -> InferredDependency {
        InferredDependency::new(from, to, confidence, reason)
    }

    fn find<'a>(edges: &'a [InferredDependency], from: &str, to: &str) -> Option<&'a InferredDependency> {
        edges.iter().find(|d| d.from_task == from && d.to_task == to)
    }

    #[test]
    fn merge_keeps_highest_confidence() {
        let merged = merge(vec![
            dep("1.2", "1.1", 50, "keyword"),
            dep("1.3", "1.2", 25, "section"),
            dep("1.2", "1.1", 90, "subsection"),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], dep("1.2", "1.1", 90, "subsection"));
        assert_eq!(merged[1].from_task, "1.3");
    }

    #[test]
    fn merge_keeps_first_on_tie() {
        let merged = merge(vec![dep("1.2", "1.1", 85, "first"), dep("1.2", "1.1", 85, "second")]);
        assert_eq!(merged, vec![dep("1.2", "1.1", 85, "first")]);
    }

    #[test]
    fn merge_treats_pairs_as_ordered() {
        let merged = merge(vec![dep("1.2", "1.1", 50, "a"), dep("1.1", "1.2", 50, "b")]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn categorize_uses_inclusive_threshold() {
        let result = categorize(
            vec![dep("a", "b", 70, "x"), dep("c", "d", 69, "y")],
            70,
        );

        assert_eq!(result.auto_apply, vec![dep("a", "b", 70, "x")]);
        assert_eq!(result.pending_review, vec![dep("c", "d", 69, "y")]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn setup_scenario_keeps_subsection_edge() {
        let parsed = parse_document(
            "## 1. Setup\n\
             - [ ] 1.1 Add schema (files: schema.ts)\n\
             - [ ] 1.2 Add mutation (files: mutation.ts) (depends: 1.1)\n",
        );
        let engine = InferenceEngine::default();
        let outputs = engine.candidates(&parsed);

        let keyword = outputs.iter().find(|o| o.strategy == "keyword").unwrap();
        assert_eq!(find(&keyword.edges, "1.2", "1.1").unwrap().confidence, 50);

        let result = engine.resolve(outputs);
        assert_eq!(
            result.auto_apply,
            vec![dep("1.2", "1.1", 90, "subsection order: sequential within 1")]
        );
        assert!(result.pending_review.is_empty());
    }

    #[test]
    fn declared_dependencies_are_not_injected() {
        let parsed = ParseResult::from_sections(vec![Section::new(1, "One").with_tasks(vec![
            Task::new("1.1", "alpha"),
            Task::new("1.2.1", "beta").with_depends_on(["1.1"]),
        ])]);

        assert!(infer(&parsed, 70).is_empty());
    }

    #[test]
    fn dangling_edges_pass_through() {
        let parsed = ParseResult::from_sections(vec![
            Section::new(1, "One").with_tasks(vec![Task::new("1.1", "a")]),
            Section::new(2, "Two").with_tasks(vec![Task::new("9.9", "b")]),
        ]);
        let result = infer(&parsed, 0);

        assert_eq!(result.auto_apply.len(), 1);
        assert_eq!(result.auto_apply[0].from_task, "9.9");
    }

    #[test]
    fn custom_strategy_list() {
        let parsed = ParseResult::from_sections(vec![
            Section::new(1, "One").with_tasks(vec![Task::new("1.1", "a"), Task::new("1.2", "b")]),
            Section::new(2, "Two").with_tasks(vec![Task::new("2.1", "c")]),
        ]);
        let engine =
            InferenceEngine::new(20).with_strategies(vec![Box::new(SectionOrder::default())]);

        assert_eq!(engine.strategy_names(), vec!["section"]);
        let result = engine.infer(&parsed);
        assert_eq!(result.auto_apply.len(), 1);
        assert_eq!(result.auto_apply[0].reason, "section order: section 2 after section 1");
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(InferenceEngine::new(250).threshold(), 100);
    }

    fn arb_edges() -> impl Strategy<Value = Vec<InferredDependency>> {
        prop::collection::vec((0u8..5, 0u8..5, 0u8..=100, 0u8..3), 0..40).prop_map(|raw| {
            raw.into_iter()
                .map(|(a, b, c, r)| dep(&format!("1.{}", a), &format!("1.{}", b), c, &format!("r{}", r)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(edges in arb_edges()) {
            let once = merge(edges);
            let twice = merge(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merge_leaves_unique_pairs(edges in arb_edges()) {
            let merged = merge(edges.clone());
            for d in &merged {
                let best = edges
                    .iter()
                    .filter(|e| e.pair() == d.pair())
                    .map(|e| e.confidence)
                    .max()
                    .unwrap();
                prop_assert_eq!(d.confidence, best);
                prop_assert_eq!(merged.iter().filter(|e| e.pair() == d.pair()).count(), 1);
            }
        }

        #[test]
        fn auto_apply_is_monotonic(edges in arb_edges(), t1 in 0u8..=100, t2 in 0u8..=100) {
            let (low, high) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let merged = merge(edges);
            let loose = categorize(merged.clone(), low);
            let strict = categorize(merged, high);

            for d in &strict.auto_apply {
                prop_assert!(loose.auto_apply.contains(d));
            }
        }

        #[test]
        fn subsection_edges_join_only_neighbours(
            ids in prop::collection::btree_set(1u32..60, 2..12)
                .prop_map(|s| s.into_iter().collect::<Vec<_>>())
                .prop_shuffle()
        ) {
            let tasks: Vec<Task> = ids
                .iter()
                .map(|n| Task::new(format!("1.1.{}", n), "noop"))
                .collect();
            let parsed = ParseResult::from_sections(vec![Section::new(1, "One").with_tasks(tasks)]);
            let result = infer(&parsed, 70);

            let mut sorted = ids.clone();
            sorted.sort();
            for a in &sorted {
                for b in &sorted {
                    let from = format!("1.1.{}", b);
                    let to = format!("1.1.{}", a);
                    let adjacent = sorted.windows(2).any(|w| w[0] == *a && w[1] == *b);
                    let edge = find(&result.auto_apply, &from, &to)
                        .filter(|d| d.confidence == SUBSECTION_CONFIDENCE);
                    prop_assert_eq!(edge.is_some(), adjacent);
                }
            }
        }
    }
}
