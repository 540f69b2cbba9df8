// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server namespace model and path resolution.
//!
//! The endpoint browses the server namespace once at startup into a
//! [`Branch`] tree, then resolves the configured slash-delimited path against
//! it to decide which leaves to register.
//!
//! Resolution walks one segment at a time. Branches match first; a leaf may
//! only satisfy the final segment. A failed segment produces a diagnostic
//! listing every child of the branch being searched, branches before leaves,
//! each group sorted case-insensitively.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DaError, DaResult};

// =============================================================================
// Namespace Nodes
// =============================================================================

/// A readable item in the server namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    /// Display name within the parent branch.
    pub name: String,
    /// Fully-qualified item ID used for registration and reads.
    pub item_id: String,
}

impl Leaf {
    /// Creates a leaf.
    pub fn new(name: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_id: item_id.into(),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[T]{}", self.name)
    }
}

/// A branch in the server namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Display name within the parent branch.
    pub name: String,
    /// Child branches.
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Child leaves.
    #[serde(default)]
    pub leaves: Vec<Leaf>,
}

impl Branch {
    /// Creates an empty branch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branches: Vec::new(),
            leaves: Vec::new(),
        }
    }

    /// Adds a child branch.
    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    /// Adds a child leaf.
    pub fn with_leaf(mut self, leaf: Leaf) -> Self {
        self.leaves.push(leaf);
        self
    }

    /// Finds a child branch by exact name.
    pub fn find_branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// Finds a child leaf by exact name.
    pub fn find_leaf(&self, name: &str) -> Option<&Leaf> {
        self.leaves.iter().find(|l| l.name == name)
    }

    /// Collects every leaf under this branch, depth-first.
    ///
    /// The branch's own leaves come first, then each child branch's leaves
    /// recursively.
    pub fn collect_leaves(&self) -> Vec<&Leaf> {
        let mut leaves: Vec<&Leaf> = self.leaves.iter().collect();
        for branch in &self.branches {
            leaves.extend(branch.collect_leaves());
        }
        leaves
    }

    /// Renders the child listing used in resolution diagnostics.
    ///
    /// One child per line: `[B]` branches first, then `[T]` leaves, each
    /// group sorted case-insensitively.
    pub fn child_listing(&self) -> String {
        let mut branches: Vec<&str> = self.branches.iter().map(|b| b.name.as_str()).collect();
        branches.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));

        let mut leaves: Vec<&str> = self.leaves.iter().map(|l| l.name.as_str()).collect();
        leaves.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));

        branches
            .iter()
            .map(|name| format!("[B]{}", name))
            .chain(leaves.iter().map(|name| format!("[T]{}", name)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[B]{}", self.name)
    }
}

// =============================================================================
// Path Resolution
// =============================================================================

/// Outcome of resolving a path against the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The path addressed a single item.
    Leaf(&'a Leaf),
    /// The path addressed a branch; every leaf under it is in scope.
    Subtree(&'a Branch),
}

/// Resolves a slash-delimited path against the namespace root.
///
/// Empty segments (leading, trailing, or doubled slashes) are skipped, so an
/// empty or all-slash path resolves to the root subtree.
///
/// # Examples
///
/// ```
/// use dabridge_opcda::browse::{resolve, Branch, Leaf, Resolution};
///
/// let root = Branch::new("")
///     .with_branch(Branch::new("A").with_leaf(Leaf::new("x", "A/x")));
///
/// match resolve(&root, "A/x").unwrap() {
///     Resolution::Leaf(leaf) => assert_eq!(leaf.item_id, "A/x"),
///     Resolution::Subtree(_) => unreachable!(),
/// }
/// ```
pub fn resolve<'a>(root: &'a Branch, path: &str) -> DaResult<Resolution<'a>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut current = root;
    for (index, segment) in segments.iter().enumerate() {
        if let Some(branch) = current.find_branch(segment) {
            current = branch;
            continue;
        }

        // a leaf may only satisfy the final segment
        let last = index + 1 == segments.len();
        if last {
            if let Some(leaf) = current.find_leaf(segment) {
                return Ok(Resolution::Leaf(leaf));
            }
        }

        return Err(DaError::path_not_found(*segment, current.child_listing()));
    }

    Ok(Resolution::Subtree(current))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_root() -> Branch {
        Branch::new("")
            .with_branch(
                Branch::new("A")
                    .with_branch(Branch::new("inner").with_leaf(Leaf::new("deep", "A/inner/deep")))
                    .with_leaf(Leaf::new("x", "A/x")),
            )
            .with_branch(Branch::new("b2").with_leaf(Leaf::new("y", "b2/y")))
            .with_leaf(Leaf::new("top", "top"))
    }

    #[test]
    fn test_resolve_branch_then_leaf() {
        let root = sample_root();
        match resolve(&root, "A/x").unwrap() {
            Resolution::Leaf(leaf) => assert_eq!(leaf.item_id, "A/x"),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_prefers_branch_over_leaf() {
        // a branch and a leaf share the name "A"; the branch wins
        let root = Branch::new("")
            .with_branch(Branch::new("A").with_leaf(Leaf::new("x", "A/x")))
            .with_leaf(Leaf::new("A", "A"));

        match resolve(&root, "A").unwrap() {
            Resolution::Subtree(branch) => assert_eq!(branch.name, "A"),
            other => panic!("expected subtree, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_leaf_only_matches_last_segment() {
        // "x" is a leaf, so "A/x/deep" must fail at "x"
        let root = sample_root();
        let error = resolve(&root, "A/x/deep").unwrap_err();
        match error {
            DaError::PathSegmentNotFound { segment, .. } => assert_eq!(segment, "x"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_path_is_root_subtree() {
        let root = sample_root();
        for path in ["", "/", "//"] {
            match resolve(&root, path).unwrap() {
                Resolution::Subtree(branch) => assert_eq!(branch.name, ""),
                other => panic!("expected root subtree, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_resolve_skips_empty_segments() {
        let root = sample_root();
        match resolve(&root, "/A//x/").unwrap() {
            Resolution::Leaf(leaf) => assert_eq!(leaf.item_id, "A/x"),
            other => panic!("expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_failure_lists_sorted_candidates() {
        let root = sample_root();
        let error = resolve(&root, "missing").unwrap_err();

        match error {
            DaError::PathSegmentNotFound { segment, candidates } => {
                assert_eq!(segment, "missing");
                // branches first, case-insensitive order, then leaves
                assert_eq!(candidates, "[B]A\n[B]b2\n[T]top");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_collect_leaves_depth_first() {
        let root = sample_root();
        let ids: Vec<&str> = root
            .collect_leaves()
            .iter()
            .map(|l| l.item_id.as_str())
            .collect();

        assert_eq!(ids, vec!["top", "A/x", "A/inner/deep", "b2/y"]);
    }
}
