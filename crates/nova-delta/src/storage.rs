use std::collections::HashMap;

use crate::{DeltaNode, ElementHandle};

/// Number of children from which lookups go through a hash index instead of a
/// linear scan.
pub const NEED_CHILD_INDEX: usize = 3;

/// Affected children of a delta node.
///
/// Most nodes have one or two children, so they stay in a plain vector. Once a
/// node reaches [`NEED_CHILD_INDEX`] children it is promoted to carry an
/// element → position index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChildStorage {
    Linear(Vec<DeltaNode>),
    Indexed {
        children: Vec<DeltaNode>,
        index: HashMap<ElementHandle, usize>,
    },
}

impl Default for ChildStorage {
    fn default() -> Self {
        ChildStorage::Linear(Vec::new())
    }
}

impl ChildStorage {
    pub(crate) fn as_slice(&self) -> &[DeltaNode] {
        match self {
            ChildStorage::Linear(children) | ChildStorage::Indexed { children, .. } => children,
        }
    }

    pub(crate) fn is_indexed(&self) -> bool {
        matches!(self, ChildStorage::Indexed { .. })
    }

    pub(crate) fn position(&self, element: &ElementHandle) -> Option<usize> {
        match self {
            ChildStorage::Linear(children) => {
                children.iter().position(|child| child.element() == element)
            }
            ChildStorage::Indexed { index, .. } => index.get(element).copied(),
        }
    }

    pub(crate) fn get_mut(&mut self, position: usize) -> Option<&mut DeltaNode> {
        match self {
            ChildStorage::Linear(children) | ChildStorage::Indexed { children, .. } => {
                children.get_mut(position)
            }
        }
    }

    pub(crate) fn push(&mut self, child: DeltaNode) {
        match self {
            ChildStorage::Indexed { children, index } => {
                index.insert(child.element().clone(), children.len());
                children.push(child);
            }
            ChildStorage::Linear(children) => {
                children.push(child);
                if children.len() >= NEED_CHILD_INDEX {
                    let children = std::mem::take(children);
                    *self = Self::indexed(children);
                }
            }
        }
    }

    /// Replaces the child at `position`. The replacement must have the same key.
    pub(crate) fn replace(&mut self, position: usize, child: DeltaNode) {
        debug_assert_eq!(self.as_slice()[position].element(), child.element());
        if let Some(slot) = self.get_mut(position) {
            *slot = child;
        }
    }

    pub(crate) fn remove(&mut self, position: usize) -> DeltaNode {
        match self {
            ChildStorage::Linear(children) => children.remove(position),
            ChildStorage::Indexed { children, index } => {
                let removed = children.remove(position);
                index.remove(removed.element());
                for slot in index.values_mut() {
                    if *slot > position {
                        *slot -= 1;
                    }
                }
                if children.len() < NEED_CHILD_INDEX {
                    let children = std::mem::take(children);
                    *self = ChildStorage::Linear(children);
                }
                removed
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = ChildStorage::default();
    }

    pub(crate) fn into_vec(self) -> Vec<DeltaNode> {
        match self {
            ChildStorage::Linear(children) | ChildStorage::Indexed { children, .. } => children,
        }
    }

    fn indexed(children: Vec<DeltaNode>) -> Self {
        let index = children
            .iter()
            .enumerate()
            .map(|(position, child)| (child.element().clone(), position))
            .collect();
        ChildStorage::Indexed { children, index }
    }
}
