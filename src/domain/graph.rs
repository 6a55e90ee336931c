//! Dependency graph over parsed tasks
//!
//! Turns inferred edges into a queryable graph: which tasks are ready, which
//! are blocked, and a blockers-first ordering. Cycles are reported, never
//! resolved. Uses petgraph for graph operations.

use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

use super::task::Task;
use super::dependency::InferredDependency;
use super::id::sort_key;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Adding dependency would create a cycle: {0} -> {1}")]
    CycleDetected(String, String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Self-dependency not allowed: {0}")]
    SelfDependency(String),
}

/// A dependency graph keyed by raw task ID
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Edge direction is blocker -> dependent
    graph: DiGraph<String, ()>,

    node_map: HashMap<String, NodeIndex>,

    /// Node insertion order, for stable listings
    order: Vec<String>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph, keeping every edge that can be added
    ///
    /// Rejected edges are returned in input order instead of stopping at the
    /// first one.
    pub fn build<'a>(
        tasks: impl IntoIterator<Item = &'a Task>,
        edges: impl IntoIterator<Item = &'a InferredDependency>,
    ) -> (Self, Vec<GraphError>) {
        let mut graph = Self::new();

        for task in tasks {
            graph.add_task(&task.id);
        }

        let errors = edges
            .into_iter()
            .filter_map(|edge| graph.add_dependency(&edge.from_task, &edge.to_task).err())
            .collect();

        (graph, errors)
    }

    /// Adds a task to the graph
    pub fn add_task(&mut self, task_id: &str) {
        if !self.node_map.contains_key(task_id) {
            let idx = self.graph.add_node(task_id.to_string());
            self.node_map.insert(task_id.to_string(), idx);
            self.order.push(task_id.to_string());
        }
    }

    /// Adds a dependency edge: `task` depends on `depends_on`
    pub fn add_dependency(&mut self, task: &str, depends_on: &str) -> Result<(), GraphError> {
        if task == depends_on {
            return Err(GraphError::SelfDependency(task.to_string()));
        }

        let task_idx = *self
            .node_map
            .get(task)
            .ok_or_else(|| GraphError::TaskNotFound(task.to_string()))?;

        let dep_idx = *self
            .node_map
            .get(depends_on)
            .ok_or_else(|| GraphError::TaskNotFound(depends_on.to_string()))?;

        if self.graph.find_edge(dep_idx, task_idx).is_some() {
            return Ok(());
        }

        let edge = self.graph.add_edge(dep_idx, task_idx, ());

        if is_cyclic_directed(&self.graph) {
            self.graph.remove_edge(edge);
            return Err(GraphError::CycleDetected(
                task.to_string(),
                depends_on.to_string(),
            ));
        }

        Ok(())
    }

    /// Returns incomplete tasks whose blockers are all completed
    pub fn ready_tasks(&self, completed: &HashMap<String, bool>) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| !is_done(completed, id))
            .filter(|id| {
                self.dependencies(id)
                    .iter()
                    .all(|dep| is_done(completed, dep))
            })
            .cloned()
            .collect()
    }

    /// Returns incomplete tasks with their incomplete blockers
    pub fn blocked_tasks(&self, completed: &HashMap<String, bool>) -> Vec<(String, Vec<String>)> {
        self.order
            .iter()
            .filter(|id| !is_done(completed, id))
            .filter_map(|id| {
                let blockers: Vec<String> = self
                    .dependencies(id)
                    .into_iter()
                    .filter(|dep| !is_done(completed, dep))
                    .collect();
                (!blockers.is_empty()).then(|| (id.clone(), blockers))
            })
            .collect()
    }

    /// Returns the direct dependencies of a task, sorted by ID
    pub fn dependencies(&self, task_id: &str) -> Vec<String> {
        self.neighbors(task_id, petgraph::Direction::Incoming)
    }

    /// Returns the direct dependents of a task (tasks that depend on it)
    pub fn dependents(&self, task_id: &str) -> Vec<String> {
        self.neighbors(task_id, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, task_id: &str, direction: petgraph::Direction) -> Vec<String> {
        let Some(&idx) = self.node_map.get(task_id) else {
            return vec![];
        };

        let mut ids: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        ids.sort_by_key(|id| sort_key(id));
        ids
    }

    /// Returns all tasks in topological order (blockers before dependents)
    pub fn topological_order(&self) -> Result<Vec<String>, GraphError> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .filter_map(|idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(cycle) => {
                let id = self
                    .graph
                    .node_weight(cycle.node_id())
                    .cloned()
                    .unwrap_or_default();
                Err(GraphError::CycleDetected(id.clone(), id))
            }
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.node_map.contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn is_done(completed: &HashMap<String, bool>, id: &str) -> bool {
    completed.get(id).copied().unwrap_or(false)
}
