//! Group hierarchy nodes and structural checks.
//!
//! Inherited permissions are computed upstream; the client only verifies that
//! the ancestry data it renders is self-consistent.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Permission, RoleRef};

/// Tree node in the group hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Stable group identifier.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent group identifier for nested groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Ancestor identifiers from the root down to the parent.
    #[serde(default)]
    pub path: Vec<String>,
    /// Nesting depth; equals `path.len()`.
    #[serde(default)]
    pub depth: usize,
    /// Members including those inherited from child groups.
    #[serde(default)]
    pub member_count: u64,
    /// Roles granted to the group.
    #[serde(default)]
    pub roles: Vec<RoleRef>,
    /// Permissions granted directly.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Permissions inherited from ancestors.
    #[serde(default)]
    pub inherited_permissions: Vec<Permission>,
    /// Nested groups, when the tree endpoint expands them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Group>,
}

/// One structural inconsistency found in a group tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyViolation {
    /// `depth` differs from the ancestor path length.
    DepthMismatch {
        /// Offending group.
        group_id: String,
        /// Reported depth.
        depth: usize,
        /// Ancestor path length.
        path_len: usize,
    },
    /// `parent_id` does not match the enclosing node or the last path entry.
    ParentMismatch {
        /// Offending group.
        group_id: String,
        /// Parent implied by the tree structure.
        expected: Option<String>,
        /// Parent reported by the node.
        actual: Option<String>,
    },
    /// Ancestor path differs from the parent's path plus the parent id.
    PathMismatch {
        /// Offending group.
        group_id: String,
    },
    /// A group lists itself among its ancestors.
    SelfAncestor {
        /// Offending group.
        group_id: String,
    },
}

impl Display for HierarchyViolation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepthMismatch {
                group_id,
                depth,
                path_len,
            } => write!(
                formatter,
                "group '{group_id}' has depth {depth} but {path_len} ancestors"
            ),
            Self::ParentMismatch {
                group_id,
                expected,
                actual,
            } => write!(
                formatter,
                "group '{group_id}' reports parent {} but belongs under {}",
                actual.as_deref().unwrap_or("<none>"),
                expected.as_deref().unwrap_or("<none>")
            ),
            Self::PathMismatch { group_id } => {
                write!(formatter, "group '{group_id}' has an inconsistent ancestor path")
            }
            Self::SelfAncestor { group_id } => {
                write!(formatter, "group '{group_id}' lists itself as an ancestor")
            }
        }
    }
}

impl Group {
    /// Returns this node and all descendants in depth-first order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Group> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }

        nodes
    }

    /// Finds a node by identifier in this subtree.
    #[must_use]
    pub fn find(&self, group_id: &str) -> Option<&Group> {
        self.flatten().into_iter().find(|node| node.id == group_id)
    }

    /// Returns direct and inherited permission identifiers.
    #[must_use]
    pub fn effective_permission_ids(&self) -> BTreeSet<&str> {
        self.permissions
            .iter()
            .chain(self.inherited_permissions.iter())
            .map(|permission| permission.id.as_str())
            .collect()
    }

    /// Checks ancestry invariants over a forest returned by the tree endpoint.
    ///
    /// Top-level nodes may be subtree roots: when they report a parent, their
    /// path must end with it.
    #[must_use]
    pub fn check_hierarchy(roots: &[Group]) -> Vec<HierarchyViolation> {
        let mut violations = Vec::new();
        for root in roots {
            let expected_parent = root.path.last().cloned();
            if root.parent_id != expected_parent {
                violations.push(HierarchyViolation::ParentMismatch {
                    group_id: root.id.clone(),
                    expected: expected_parent,
                    actual: root.parent_id.clone(),
                });
            }
            root.check_node(&mut violations);
        }

        violations
    }

    fn check_node(&self, violations: &mut Vec<HierarchyViolation>) {
        if self.depth != self.path.len() {
            violations.push(HierarchyViolation::DepthMismatch {
                group_id: self.id.clone(),
                depth: self.depth,
                path_len: self.path.len(),
            });
        }

        if self.path.iter().any(|ancestor| ancestor == &self.id) {
            violations.push(HierarchyViolation::SelfAncestor {
                group_id: self.id.clone(),
            });
        }

        for child in &self.children {
            if child.parent_id.as_deref() != Some(self.id.as_str()) {
                violations.push(HierarchyViolation::ParentMismatch {
                    group_id: child.id.clone(),
                    expected: Some(self.id.clone()),
                    actual: child.parent_id.clone(),
                });
            }

            let path_matches = child.path.len() == self.path.len() + 1
                && child.path.starts_with(&self.path)
                && child.path.last() == Some(&self.id);
            if !path_matches {
                violations.push(HierarchyViolation::PathMismatch {
                    group_id: child.id.clone(),
                });
            }

            child.check_node(violations);
        }
    }
}
