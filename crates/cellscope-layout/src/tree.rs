#![forbid(unsafe_code)]

//! Recursive split-tree layout.
//!
//! A [`Layout`] is a binary tree stored as a flat, possibly-sparse array
//! with implicit heap indexing: the root lives at index 0 and the children
//! of node `i` at `2i+1` and `2i+2`. Leaves hold a [`View`]; split nodes
//! hold only fractional sizing units. Node indices are part of the operation
//! contract: callers address split and delete targets by index, and the
//! renderer enumerates leaves in index order, so the array-position scheme
//! is load-bearing rather than an implementation detail.
//!
//! Operations on anything but a populated leaf are silent no-ops; the
//! contract has no error channel.

use std::fmt;

use cellscope_core::{View, trace};
use serde::{Deserialize, Serialize};

/// Orientation of a split.
///
/// Vertical divides a pane into two side-by-side columns; horizontal into
/// two stacked rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Vertical,
    Horizontal,
}

/// One node of the split tree.
///
/// `width` and `height` are fractional units: denominators relative to the
/// full workspace, so 2 means "half of the workspace along that axis". The
/// `parent` field is redundant bookkeeping for upward traversal and must
/// agree with the node's array position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Container {
    /// Internal node: subdivided, no view payload.
    Split {
        parent: Option<usize>,
        width: u32,
        height: u32,
    },
    /// Leaf node: holds the pane's view.
    View {
        parent: Option<usize>,
        width: u32,
        height: u32,
        view: View,
    },
}

impl Container {
    /// Index of the parent node, `None` at the root.
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        match self {
            Self::Split { parent, .. } | Self::View { parent, .. } => *parent,
        }
    }

    /// Fractional width unit.
    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            Self::Split { width, .. } | Self::View { width, .. } => *width,
        }
    }

    /// Fractional height unit.
    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            Self::Split { height, .. } | Self::View { height, .. } => *height,
        }
    }

    /// True for leaf nodes.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::View { .. })
    }

    /// The leaf's view, `None` on split nodes.
    #[must_use]
    pub const fn view(&self) -> Option<&View> {
        match self {
            Self::View { view, .. } => Some(view),
            Self::Split { .. } => None,
        }
    }
}

/// A recursively-splittable workspace.
///
/// Carries the workspace pixel dimensions alongside the tree; they start at
/// zero and are recorded by an external resize observer via
/// [`Layout::resized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    nodes: Vec<Option<Container>>,
    width: u16,
    height: u16,
}

impl Layout {
    /// A single root leaf with an empty view and unit sizing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Container::View {
                parent: None,
                width: 1,
                height: 1,
                view: View::Empty,
            })],
            width: 0,
            height: 0,
        }
    }

    /// Recorded workspace width in pixels.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Recorded workspace height in pixels.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Length of the backing array, including empty slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the backing array holds no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index`, if populated. Out-of-range indices read as
    /// empty.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Container> {
        self.nodes.get(index).and_then(|slot| slot.as_ref())
    }

    /// True when `index` addresses a populated leaf.
    #[must_use]
    pub fn is_leaf(&self, index: usize) -> bool {
        self.node(index).is_some_and(Container::is_leaf)
    }

    /// All populated leaves in ascending index order.
    pub fn leaves(&self) -> impl Iterator<Item = (usize, &Container)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|node| (index, node)))
            .filter(|(_, node)| node.is_leaf())
    }

    /// Number of populated leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Record new workspace pixel dimensions.
    #[must_use]
    pub fn resized(&self, width: u16, height: u16) -> Self {
        let mut next = self.clone();
        next.width = width;
        next.height = height;
        next
    }

    /// Divide the leaf at `which` into two equal side-by-side columns.
    ///
    /// The leaf becomes a split node and drops its view; two empty leaves
    /// appear at `2*which+1` and `2*which+2` with doubled width units.
    /// No-op when `which` is not a populated leaf.
    #[must_use]
    pub fn vertical_split(&self, which: usize) -> Self {
        self.split_leaf(which, SplitAxis::Vertical)
    }

    /// Divide the leaf at `which` into two equal stacked rows.
    ///
    /// Symmetric to [`Layout::vertical_split`], doubling the height units.
    #[must_use]
    pub fn horizontal_split(&self, which: usize) -> Self {
        self.split_leaf(which, SplitAxis::Horizontal)
    }

    /// Close the pane at `which`.
    ///
    /// On the root leaf this resets the view to empty without changing the
    /// tree shape. Otherwise the parent becomes an empty leaf again and the
    /// subtrees under both of its children are discarded, sibling contents
    /// included. No-op when `which` is not a populated leaf.
    #[must_use]
    pub fn delete_view(&self, which: usize) -> Self {
        let Some(Container::View { parent, .. }) = self.node(which) else {
            return self.clone();
        };

        match *parent {
            None => {
                let mut next = self.clone();
                if let Some(Container::View { view, .. }) = &mut next.nodes[which] {
                    *view = View::Empty;
                }
                trace!(which, "reset root pane to an empty view");
                next
            }
            Some(parent) => {
                let Some(Container::Split {
                    parent: grandparent,
                    width,
                    height,
                }) = self.node(parent)
                else {
                    // Corrupt parent link; leave the layout untouched.
                    return self.clone();
                };
                let (grandparent, width, height) = (*grandparent, *width, *height);

                let mut next = self.clone();
                next.clear_subtree(2 * parent + 1);
                next.clear_subtree(2 * parent + 2);
                next.nodes[parent] = Some(Container::View {
                    parent: grandparent,
                    width,
                    height,
                    view: View::Empty,
                });
                trace!(which, parent, "merged sibling panes back into their parent");
                next
            }
        }
    }

    /// The orientation of the split at `index`, recovered from the
    /// children's units. `None` when `index` is not a populated split node.
    #[must_use]
    pub fn split_axis(&self, index: usize) -> Option<SplitAxis> {
        let node = self.node(index)?;
        if node.is_leaf() {
            return None;
        }
        let child = self.node(2 * index + 1)?;
        if child.width() == node.width().saturating_mul(2) {
            Some(SplitAxis::Vertical)
        } else {
            Some(SplitAxis::Horizontal)
        }
    }

    /// Check structural invariants.
    ///
    /// Operations preserve these by construction; this is for deserialized
    /// or hand-assembled layouts.
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.node(0) else {
            return Err(TreeError::MissingRoot);
        };
        if root.parent().is_some() {
            return Err(TreeError::RootHasParent);
        }

        for (index, slot) in self.nodes.iter().enumerate() {
            let Some(node) = slot else { continue };

            if index > 0 {
                let expected = (index - 1) / 2;
                if node.parent() != Some(expected) {
                    return Err(TreeError::ParentMismatch {
                        index,
                        expected,
                        found: node.parent(),
                    });
                }
                match self.node(expected) {
                    Some(parent) if !parent.is_leaf() => {}
                    _ => return Err(TreeError::Orphan { index }),
                }
            }

            let first = 2 * index + 1;
            let second = 2 * index + 2;
            if node.is_leaf() {
                for child in [first, second] {
                    if self.node(child).is_some() {
                        return Err(TreeError::LeafHasChildren { leaf: index, child });
                    }
                }
            } else {
                let (Some(a), Some(b)) = (self.node(first), self.node(second)) else {
                    return Err(TreeError::MissingChild { split: index });
                };
                let vertical =
                    a.width() == node.width().saturating_mul(2) && a.height() == node.height();
                let horizontal =
                    a.height() == node.height().saturating_mul(2) && a.width() == node.width();
                let children_agree = a.width() == b.width() && a.height() == b.height();
                if !(children_agree && (vertical || horizontal)) {
                    return Err(TreeError::UnitMismatch { split: index });
                }
            }
        }
        Ok(())
    }

    /// Deterministic structural hash of the full tree state.
    ///
    /// Intended for operation logs and replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            for byte in value.to_le_bytes() {
                mix(hash, byte);
            }
        }

        fn mix_parent(hash: &mut u64, parent: Option<usize>) {
            match parent {
                Some(index) => {
                    mix(hash, 1);
                    mix_u64(hash, index as u64);
                }
                None => mix(hash, 0),
            }
        }

        fn mix_view(hash: &mut u64, view: &View) {
            match view {
                View::Empty => mix(hash, 0),
                View::Scatter { project, dataset } => {
                    mix(hash, 1);
                    mix_u64(hash, project.len() as u64);
                    for byte in project.as_bytes() {
                        mix(hash, *byte);
                    }
                    mix_u64(hash, u64::from(*dataset));
                }
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_u64(&mut hash, u64::from(self.width));
        mix_u64(&mut hash, u64::from(self.height));
        mix_u64(&mut hash, self.nodes.len() as u64);
        for slot in &self.nodes {
            match slot {
                None => mix(&mut hash, 0),
                Some(node) => {
                    mix(&mut hash, if node.is_leaf() { 1 } else { 2 });
                    mix_parent(&mut hash, node.parent());
                    mix_u64(&mut hash, u64::from(node.width()));
                    mix_u64(&mut hash, u64::from(node.height()));
                    if let Some(view) = node.view() {
                        mix_view(&mut hash, view);
                    }
                }
            }
        }
        hash
    }

    fn split_leaf(&self, which: usize, axis: SplitAxis) -> Self {
        let Some(Container::View {
            parent,
            width,
            height,
            ..
        }) = self.node(which)
        else {
            return self.clone();
        };
        let (parent, width, height) = (*parent, *width, *height);

        let (child_width, child_height) = match axis {
            SplitAxis::Vertical => (width.saturating_mul(2), height),
            SplitAxis::Horizontal => (width, height.saturating_mul(2)),
        };
        let first = 2 * which + 1;
        let second = 2 * which + 2;

        let mut next = self.clone();
        if next.nodes.len() <= second {
            next.nodes.resize(second + 1, None);
        }
        next.nodes[which] = Some(Container::Split {
            parent,
            width,
            height,
        });
        for child in [first, second] {
            next.nodes[child] = Some(Container::View {
                parent: Some(which),
                width: child_width,
                height: child_height,
                view: View::Empty,
            });
        }
        trace!(which, ?axis, first, second, "split pane");
        next
    }

    fn clear_subtree(&mut self, index: usize) {
        let mut stack = vec![index];
        while let Some(i) = stack.pop() {
            if i >= self.nodes.len() {
                continue;
            }
            if self.nodes[i].take().is_some() {
                stack.push(2 * i + 1);
                stack.push(2 * i + 2);
            }
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from split-tree invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// Index 0 is not populated.
    MissingRoot,
    /// The root carries a parent link.
    RootHasParent,
    /// A node's parent field disagrees with its array position.
    ParentMismatch {
        index: usize,
        expected: usize,
        found: Option<usize>,
    },
    /// A populated node is not connected to the root through a split.
    Orphan { index: usize },
    /// A split node is missing a child.
    MissingChild { split: usize },
    /// A leaf has populated child slots.
    LeafHasChildren { leaf: usize, child: usize },
    /// A split's children units do not halve the parent along one axis.
    UnitMismatch { split: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "layout has no root node"),
            Self::RootHasParent => write!(f, "root node carries a parent link"),
            Self::ParentMismatch {
                index,
                expected,
                found,
            } => write!(
                f,
                "node {index} records parent {found:?}, position implies {expected}"
            ),
            Self::Orphan { index } => {
                write!(f, "node {index} is not reachable through a populated split")
            }
            Self::MissingChild { split } => {
                write!(f, "split node {split} is missing a child")
            }
            Self::LeafHasChildren { leaf, child } => {
                write!(f, "leaf {leaf} has a populated child slot {child}")
            }
            Self::UnitMismatch { split } => {
                write!(f, "children of split {split} do not halve it along one axis")
            }
        }
    }
}

impl std::error::Error for TreeError {}
