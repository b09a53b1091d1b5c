use std::collections::{BTreeSet, VecDeque};

use super::QueryKey;

/// Declared dependencies between cached key prefixes.
#[derive(Debug, Clone, Default)]
pub struct InvalidationGraph {
    edges: Vec<(QueryKey, QueryKey)>,
}

impl InvalidationGraph {
    /// Creates a graph without edges.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges for the admin console: role and group changes ripple into the
    /// matrix, the group tree and the dashboard counters.
    #[must_use]
    pub fn admin_defaults() -> Self {
        Self::new()
            .with_edge(QueryKey::roles(), QueryKey::permission_matrix())
            .with_edge(QueryKey::roles(), QueryKey::iam_stats())
            .with_edge(QueryKey::groups(), QueryKey::group_tree())
            .with_edge(QueryKey::groups(), QueryKey::permission_matrix())
            .with_edge(QueryKey::groups(), QueryKey::iam_stats())
    }

    /// Declares that keys under `dependent` derive from keys under `source`.
    #[must_use]
    pub fn with_edge(mut self, source: QueryKey, dependent: QueryKey) -> Self {
        if !self
            .edges
            .iter()
            .any(|(existing_source, existing_dependent)| {
                existing_source == &source && existing_dependent == &dependent
            })
        {
            self.edges.push((source, dependent));
        }
        self
    }

    /// Returns `key` followed by every transitively dependent prefix, each once.
    ///
    /// An edge fires when the invalidated key falls under its source prefix.
    #[must_use]
    pub fn closure(&self, key: &QueryKey) -> Vec<QueryKey> {
        let mut ordered = Vec::new();
        let mut seen = BTreeSet::new();
        let mut pending = VecDeque::from([key.clone()]);

        while let Some(current) = pending.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }

            for (source, dependent) in &self.edges {
                if current.starts_with(source) && !seen.contains(dependent) {
                    pending.push_back(dependent.clone());
                }
            }
            ordered.push(current);
        }

        ordered
    }
}
