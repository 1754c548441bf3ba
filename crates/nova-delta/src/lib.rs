//! Java element deltas for Nova's incremental model.
//!
//! A [`DeltaNode`] tree accumulates every change detected during one build
//! cycle (classpath changes, resource changes, structural additions and
//! removals) so listeners can consume them in a single pass:
//!
//! - [`DeltaNode::insert`] records a leaf delta and synthesizes the changed
//!   ancestors between the leaf and the tree root.
//! - [`DeltaNode::merge_child`] folds overlapping deltas for the same element
//!   (added then removed cancels out, removed then added becomes changed, ...).
//! - Queries ([`DeltaNode::find`], [`DeltaNode::children_of_kind`],
//!   [`DeltaNode::debug_string`]) are read-only and never recompute anything.
//!
//! Trees are not synchronized. One worker mutates a tree through `&mut` during
//! the cycle; afterwards it is shared read-only.

mod element;
mod flags;
mod node;
mod resource;
mod storage;

pub use element::{ElementHandle, ElementKind};
pub use flags::{ChangeFlags, ChangeKind};
pub use node::DeltaNode;
pub use resource::{AttributeDelta, ResourceDelta, ResourceDeltaKind};
pub use storage::NEED_CHILD_INDEX;
