//! Reverse dependency index over one request batch.
//!
//! A counting pass, not a traversal: cycles, self references and ids that
//! are not in the batch are stored as plain edges and never followed.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    // dependency id -> ids of tasks that list it
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(task_id, dependencies)` pairs.
    pub fn build<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut g = Self::new();
        for (task_id, deps) in tasks {
            for dep in deps {
                g.add_edge(task_id, dep);
            }
        }
        g
    }

    /// Record that `task_id` depends on `dependency`.
    pub fn add_edge(&mut self, task_id: &str, dependency: &str) {
        self.dependents
            .entry(dependency.to_string())
            .or_default()
            .push(task_id.to_string());
    }

    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// In-degree of `id` in the reverse graph.
    pub fn dependency_level(&self, id: &str) -> usize {
        self.dependents_of(id).len()
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(Vec::len).sum()
    }
}
