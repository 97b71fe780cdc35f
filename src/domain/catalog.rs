//! Ordered course catalog backed by an unbalanced binary search tree.
//!
//! Each node exclusively owns its children. Keys compare as raw identifier
//! text: smaller keys go left, equal or greater keys go right. Duplicate
//! identifiers are therefore kept as right descendants; `search` returns the
//! shallowest match on the path from the root.
//!
//! Shape depends only on insertion order. Pre-sorted input degenerates into
//! a list, so every full walk over the tree is iterative and the shape
//! rendering is depth-capped.

use std::cmp::Ordering;
use std::collections::HashSet;

use termtree::Tree;
use tracing::{debug, instrument, trace};

use crate::domain::course::{CourseRecord, DroppedPrerequisite};

/// Deepest level drawn by [`CatalogTree::shape`].
pub const SHAPE_DEPTH_LIMIT: usize = 64;

type Link = Option<Box<TreeNode>>;

#[derive(Debug)]
struct TreeNode {
    record: CourseRecord,
    left: Link,
    right: Link,
}

impl TreeNode {
    fn new(record: CourseRecord) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }
}

/// Binary search tree of course records keyed by identifier.
#[derive(Debug, Default)]
pub struct CatalogTree {
    root: Link,
}

impl CatalogTree {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// True iff nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a record with a single top-down walk. Never fails.
    #[instrument(level = "trace", skip(self, record), fields(identifier = %record.identifier))]
    pub fn insert(&mut self, record: CourseRecord) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if record.identifier < node.record.identifier {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(TreeNode::new(record)));
    }

    /// Look up a course by exact identifier.
    pub fn search(&self, identifier: &str) -> Option<&CourseRecord> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match identifier.cmp(node.record.identifier.as_str()) {
                Ordering::Equal => return Some(&node.record),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Records in ascending identifier order. Each call starts a fresh walk.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }

    /// Number of records, duplicates included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut pending: Vec<(&TreeNode, usize)> =
            self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, depth)) = pending.pop() {
            height = height.max(depth);
            pending.extend(node.left.as_deref().map(|n| (n, depth + 1)));
            pending.extend(node.right.as_deref().map(|n| (n, depth + 1)));
        }
        height
    }

    /// Drop every prerequisite that does not name a course in this catalog.
    ///
    /// Runs in two passes: the first snapshots every identifier present
    /// (duplicates included), the second filters each record's prerequisite
    /// list against that snapshot, keeping the surviving entries in their
    /// original order. Must run after all inserts of a load; re-running it on
    /// an unchanged tree removes nothing.
    ///
    /// Returns the removed references in ascending course order.
    #[instrument(level = "debug", skip(self))]
    pub fn validate_prerequisites(&mut self) -> Vec<DroppedPrerequisite> {
        let universe: HashSet<String> = self.iter().map(|r| r.identifier.clone()).collect();
        debug!("validate_prerequisites: {} known identifiers", universe.len());

        let mut dropped = Vec::new();
        self.for_each_record_mut(|record| {
            let declared = std::mem::take(&mut record.prerequisites);
            let (kept, missing): (Vec<String>, Vec<String>) =
                declared.into_iter().partition(|p| universe.contains(p));
            record.prerequisites = kept;

            for prerequisite in missing {
                trace!("dropping {} from {}", prerequisite, record.identifier);
                dropped.push(DroppedPrerequisite {
                    course: record.identifier.clone(),
                    prerequisite,
                });
            }
        });

        debug!("validate_prerequisites: dropped {}", dropped.len());
        dropped
    }

    /// Render the tree's actual shape (not the sorted listing).
    ///
    /// Children are prefixed with `<` (left) or `>` (right). Levels below
    /// [`SHAPE_DEPTH_LIMIT`] collapse into a single `… (N more)` line, so the
    /// rendering of a degenerate tree stays bounded.
    pub fn shape(&self) -> Tree<String> {
        fn build(node: &TreeNode, label: String, depth: usize) -> Tree<String> {
            let mut tree = Tree::new(label);
            for (marker, child) in [("<", node.left.as_deref()), (">", node.right.as_deref())] {
                let Some(child) = child else {
                    continue;
                };
                let subtree = if depth + 1 < SHAPE_DEPTH_LIMIT {
                    build(child, format!("{marker} {}", child.record.identifier), depth + 1)
                } else {
                    Tree::new(format!("{marker} … ({} more)", Iter::new(Some(child)).count()))
                };
                tree.push(subtree);
            }
            tree
        }

        match self.root.as_deref() {
            Some(root) => build(root, root.record.identifier.clone(), 0),
            None => Tree::new("(empty)".to_string()),
        }
    }

    /// In-order mutable walk. Identifiers stay untouched; only the closure
    /// sees the record, and validation only rewrites prerequisites.
    fn for_each_record_mut(&mut self, mut visit: impl FnMut(&mut CourseRecord)) {
        let mut stack: Vec<(&mut CourseRecord, Option<&mut TreeNode>)> = Vec::new();
        let mut current = self.root.as_deref_mut();
        loop {
            while let Some(node) = current {
                let TreeNode {
                    record,
                    left,
                    right,
                } = node;
                stack.push((record, right.as_deref_mut()));
                current = left.as_deref_mut();
            }
            let Some((record, right)) = stack.pop() else {
                break;
            };
            visit(record);
            current = right;
        }
    }
}

impl Drop for CatalogTree {
    fn drop(&mut self) {
        let mut pending: Vec<Box<TreeNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl Extend<CourseRecord> for CatalogTree {
    fn extend<I: IntoIterator<Item = CourseRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

impl FromIterator<CourseRecord> for CatalogTree {
    fn from_iter<I: IntoIterator<Item = CourseRecord>>(records: I) -> Self {
        let mut tree = Self::new();
        tree.extend(records);
        tree
    }
}

impl<'a> IntoIterator for &'a CatalogTree {
    type Item = &'a CourseRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy in-order iterator over a [`CatalogTree`].
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a TreeNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut node: Option<&'a TreeNode>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CourseRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        Some(&node.record)
    }
}
