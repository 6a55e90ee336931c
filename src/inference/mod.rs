//! # Dependency Inference
//!
//! Derives a dependency graph from a parsed checklist using independent
//! heuristics, each with a fixed confidence:
//!
//! 1. Subsection order (90)
//! 2. Shared file stems (85)
//! 3. Keyword categories (50)
//! 4. Section order (25)
//!
//! Candidates are pooled, reduced to one edge per ordered pair (highest
//! confidence wins) and split into `auto_apply` / `pending_review` at a
//! threshold. Declared `depends_on` annotations are not part of the output;
//! they are validated by the parser and reported separately.
//!
//! The engine has no error conditions: edges may reference tasks that do not
//! exist, which is left for the consumer to detect.

mod rules;
mod strategy;
mod engine;

pub use crate::domain::InferredDependency;
pub use rules::{Category, KeywordRules, KEYWORDS, REQUIRES};
pub use strategy::{
    default_strategies, extract_stem, FileStem, InferenceStrategy, KeywordCategories,
    SectionOrder, SubsectionOrder, TaskEntry, TaskSet, FILE_STEM_CONFIDENCE, KEYWORD_CONFIDENCE,
    SECTION_CONFIDENCE, STEM_EXTENSIONS, SUBSECTION_CONFIDENCE,
};
pub use engine::{
    categorize, infer, merge, InferenceEngine, InferenceResult, StrategyOutput, DEFAULT_THRESHOLD,
};
