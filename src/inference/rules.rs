//! Keyword classification tables
//!
//! Two declarative tables drive the keyword strategy: which substrings put a
//! description into a category, and which categories a category conventionally
//! depends on. Matching logic lives in [`KeywordRules`]; the data lives here.

use std::fmt;

use serde::Serialize;

/// Development category of a task description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Schema,
    Type,
    Mutation,
    Query,
    Component,
    Test,
    Api,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Schema => "schema",
            Category::Type => "type",
            Category::Mutation => "mutation",
            Category::Query => "query",
            Category::Component => "component",
            Category::Test => "test",
            Category::Api => "api",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category -> trigger substrings, in evaluation order
pub const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Schema, &["schema", "model", "table", "entity"]),
    (Category::Type, &["type", "interface", "typedef"]),
    (Category::Mutation, &["mutation", "create", "update", "delete", "write"]),
    (Category::Query, &["query", "read", "fetch", "get", "list"]),
    (Category::Component, &["component", "view", "page", "ui"]),
    (Category::Test, &["test", "spec", "coverage"]),
    (Category::Api, &["api", "endpoint", "route", "handler"]),
];

/// Category -> categories it depends on
///
/// `Test` is listed with no requirements; `Schema` and `Type` have no entry.
pub const REQUIRES: &[(Category, &[Category])] = &[
    (Category::Mutation, &[Category::Schema, Category::Type]),
    (Category::Query, &[Category::Schema, Category::Type]),
    (
        Category::Component,
        &[Category::Type, Category::Query, Category::Mutation],
    ),
    (Category::Test, &[]),
    (Category::Api, &[Category::Schema, Category::Type]),
];

/// Classification and requirement tables used together
#[derive(Debug, Clone, Copy)]
pub struct KeywordRules {
    keywords: &'static [(Category, &'static [&'static str])],
    requires: &'static [(Category, &'static [Category])],
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self::new(KEYWORDS, REQUIRES)
    }
}

impl KeywordRules {
    pub fn new(
        keywords: &'static [(Category, &'static [&'static str])],
        requires: &'static [(Category, &'static [Category])],
    ) -> Self {
        Self { keywords, requires }
    }

    /// Returns the categories whose triggers occur in `description`
    ///
    /// Matching is a case-insensitive substring test, so `ui` also matches
    /// `build`.
    pub fn classify(&self, description: &str) -> Vec<Category> {
        let lower = description.to_lowercase();
        self.keywords
            .iter()
            .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(category, _)| *category)
            .collect()
    }

    /// Returns the categories `category` conventionally depends on
    pub fn required(&self, category: Category) -> &'static [Category] {
        self.requires
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, required)| *required)
            .unwrap_or(&[])
    }
}
