use std::fmt::Write as _;

use crate::storage::ChildStorage;
use crate::{AttributeDelta, ChangeFlags, ChangeKind, ElementHandle, ResourceDelta};

/// One node of a Java element delta tree.
///
/// A tree is accumulated over a single build cycle: it is created around the
/// element being tracked (usually the model root), receives leaf deltas through
/// [`DeltaNode::insert`], and is then handed to listeners read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaNode {
    element: ElementHandle,
    kind: ChangeKind,
    flags: ChangeFlags,
    moved_from: Option<ElementHandle>,
    moved_to: Option<ElementHandle>,
    children: ChildStorage,
    resource_deltas: Vec<ResourceDelta>,
    attribute_deltas: Vec<AttributeDelta>,
}

impl DeltaNode {
    /// An empty delta rooted at `element`.
    pub fn new(element: ElementHandle) -> Self {
        Self {
            element,
            kind: ChangeKind::None,
            flags: ChangeFlags::empty(),
            moved_from: None,
            moved_to: None,
            children: ChildStorage::default(),
            resource_deltas: Vec::new(),
            attribute_deltas: Vec::new(),
        }
    }

    pub fn leaf(element: ElementHandle, kind: ChangeKind, flags: ChangeFlags) -> Self {
        Self {
            kind,
            flags,
            ..Self::new(element)
        }
    }

    pub fn with_attribute_deltas(mut self, deltas: Vec<AttributeDelta>) -> Self {
        self.attribute_deltas = deltas;
        self
    }

    pub fn with_resource_deltas(mut self, deltas: Vec<ResourceDelta>) -> Self {
        self.resource_deltas = deltas;
        self
    }

    pub fn element(&self) -> &ElementHandle {
        &self.element
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn flags(&self) -> ChangeFlags {
        self.flags
    }

    pub fn moved_from(&self) -> Option<&ElementHandle> {
        self.moved_from.as_ref()
    }

    pub fn moved_to(&self) -> Option<&ElementHandle> {
        self.moved_to.as_ref()
    }

    pub fn resource_deltas(&self) -> &[ResourceDelta] {
        &self.resource_deltas
    }

    pub fn attribute_deltas(&self) -> &[AttributeDelta] {
        &self.attribute_deltas
    }

    pub fn affected_children(&self) -> &[DeltaNode] {
        self.children.as_slice()
    }

    pub fn children_of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &DeltaNode> {
        self.affected_children()
            .iter()
            .filter(move |child| child.kind == kind)
    }

    pub fn added_children(&self) -> Vec<&DeltaNode> {
        self.children_of_kind(ChangeKind::Added).collect()
    }

    pub fn removed_children(&self) -> Vec<&DeltaNode> {
        self.children_of_kind(ChangeKind::Removed).collect()
    }

    pub fn changed_children(&self) -> Vec<&DeltaNode> {
        self.children_of_kind(ChangeKind::Changed).collect()
    }

    /// Whether child lookups currently go through the hash index.
    pub fn has_child_index(&self) -> bool {
        self.children.is_indexed()
    }

    /// True when nothing at all has been recorded on this node.
    pub fn is_empty(&self) -> bool {
        self.kind == ChangeKind::None
            && self.flags.is_empty()
            && self.children.as_slice().is_empty()
            && self.resource_deltas.is_empty()
            && self.attribute_deltas.is_empty()
            && self.moved_from.is_none()
            && self.moved_to.is_none()
    }

    /// Returns the delta for `element`, searching this node and its descendants.
    pub fn find(&self, element: &ElementHandle) -> Option<&DeltaNode> {
        if &self.element == element {
            return Some(self);
        }
        if let Some(position) = self.children.position(element) {
            return self.children.as_slice().get(position);
        }
        self.affected_children()
            .iter()
            .find_map(|child| child.find(element))
    }

    /// Records `leaf` in this tree, synthesizing changed ancestors between the
    /// leaf's element and this node's element.
    ///
    /// When the leaf targets this node's own element, its kind, flags, move
    /// handles and attribute deltas replace the ones recorded here. Its
    /// resource deltas replace the recorded ones when non-empty.
    pub fn insert(&mut self, mut leaf: DeltaNode) {
        if leaf.element.kind().is_fine_grained() {
            leaf.flags |= ChangeFlags::FINE_GRAINED;
        }

        if leaf.element == self.element {
            self.kind = leaf.kind;
            self.flags = leaf.flags;
            self.moved_from = leaf.moved_from;
            self.moved_to = leaf.moved_to;
            self.attribute_deltas = leaf.attribute_deltas;
            if !leaf.resource_deltas.is_empty() {
                self.resource_deltas = leaf.resource_deltas;
            }
            return;
        }

        let subtree = match self.ancestors_below(&leaf.element) {
            Some(ancestors) => ancestors.into_iter().fold(leaf, |child, ancestor| {
                let mut node = DeltaNode::new(ancestor);
                node.merge_child(child);
                node
            }),
            None => {
                tracing::debug!(
                    target: "nova.delta",
                    root = ?self.element,
                    element = ?leaf.element,
                    "element is not below the delta root; attaching it directly"
                );
                leaf
            }
        };
        self.merge_child(subtree);
    }

    /// Ancestors of `element` strictly between it and this node's element,
    /// nearest first. `None` when `element` does not live below this node.
    fn ancestors_below(&self, element: &ElementHandle) -> Option<Vec<ElementHandle>> {
        let mut ancestors = Vec::new();
        for ancestor in element.ancestors() {
            if ancestor == &self.element {
                return Some(ancestors);
            }
            ancestors.push(ancestor.clone());
        }
        None
    }

    /// Folds `incoming` into the affected children of this node.
    pub fn merge_child(&mut self, mut incoming: DeltaNode) {
        match self.kind {
            ChangeKind::Added | ChangeKind::Removed => return,
            ChangeKind::Changed => self.flags |= ChangeFlags::CHILDREN,
            ChangeKind::None => {
                self.kind = ChangeKind::Changed;
                self.flags |= ChangeFlags::CHILDREN;
            }
        }

        let Some(position) = self.children.position(&incoming.element) else {
            self.children.push(incoming);
            return;
        };
        let Some(existing) = self.children.get_mut(position) else {
            return;
        };

        match (existing.kind, incoming.kind) {
            // Added then added/changed is still added.
            (ChangeKind::Added, ChangeKind::Added | ChangeKind::Changed | ChangeKind::None) => {}
            // Added then removed cancels out.
            (ChangeKind::Added, ChangeKind::Removed) => {
                self.children.remove(position);
                tracing::trace!(
                    target: "nova.delta",
                    element = ?incoming.element,
                    "added and removed in the same cycle"
                );
            }
            // Removed then added is a change.
            (ChangeKind::Removed, ChangeKind::Added) => {
                incoming.kind = ChangeKind::Changed;
                self.children.replace(position, incoming);
            }
            (ChangeKind::Removed, _) => {}
            (ChangeKind::Changed, ChangeKind::Added | ChangeKind::Removed) => {
                self.children.replace(position, incoming);
            }
            (ChangeKind::Changed, ChangeKind::Changed | ChangeKind::None) => {
                existing.absorb(incoming);
            }
            // Nothing known about the existing child: the incoming delta wins
            // but keeps what was already flagged.
            (ChangeKind::None, _) => {
                incoming.flags |= existing.flags;
                self.children.replace(position, incoming);
            }
        }
    }

    fn absorb(&mut self, incoming: DeltaNode) {
        let DeltaNode {
            mut flags,
            moved_from,
            moved_to,
            children,
            resource_deltas,
            attribute_deltas,
            ..
        } = incoming;

        for child in children.into_vec() {
            self.merge_child(child);
        }

        // A coarse resource-level CONTENT must not overwrite a fine-grained record.
        if self.flags.contains(ChangeFlags::FINE_GRAINED)
            && !flags.contains(ChangeFlags::FINE_GRAINED)
        {
            flags.remove(ChangeFlags::CONTENT);
        }
        self.flags |= flags;

        // Resource deltas are attached last, in a single pass.
        if !resource_deltas.is_empty() {
            self.resource_deltas = resource_deltas;
        }
        self.attribute_deltas.extend(attribute_deltas);
        if moved_from.is_some() {
            self.moved_from = moved_from;
        }
        if moved_to.is_some() {
            self.moved_to = moved_to;
        }
    }

    /// Removes the affected child for `element`, if any.
    pub fn remove_child(&mut self, element: &ElementHandle) -> Option<DeltaNode> {
        let position = self.children.position(element)?;
        Some(self.children.remove(position))
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn added(&mut self, element: ElementHandle) {
        self.added_with_flags(element, ChangeFlags::empty());
    }

    pub fn added_with_flags(&mut self, element: ElementHandle, flags: ChangeFlags) {
        self.insert(DeltaNode::leaf(element, ChangeKind::Added, flags));
    }

    pub fn removed(&mut self, element: ElementHandle) {
        self.removed_with_flags(element, ChangeFlags::empty());
    }

    pub fn removed_with_flags(&mut self, element: ElementHandle, flags: ChangeFlags) {
        self.insert(DeltaNode::leaf(element, ChangeKind::Removed, flags));
    }

    pub fn changed(&mut self, element: ElementHandle, flags: ChangeFlags) {
        self.insert(DeltaNode::leaf(element, ChangeKind::Changed, flags));
    }

    pub fn content_changed(&mut self, element: ElementHandle) {
        self.changed(element, ChangeFlags::CONTENT);
    }

    pub fn opened(&mut self, element: ElementHandle) {
        self.changed(element, ChangeFlags::OPENED);
    }

    pub fn closed(&mut self, element: ElementHandle) {
        self.changed(element, ChangeFlags::CLOSED);
    }

    pub fn source_attached(&mut self, element: ElementHandle) {
        self.changed(element, ChangeFlags::SOURCE_ATTACHED);
    }

    pub fn source_detached(&mut self, element: ElementHandle) {
        self.changed(element, ChangeFlags::SOURCE_DETACHED);
    }

    pub fn changed_ast(&mut self, element: ElementHandle) {
        self.changed(element, ChangeFlags::AST_AFFECTED);
    }

    /// Marks this node as computed at compilation-unit granularity or finer.
    pub fn fine_grained(&mut self) {
        self.flags |= ChangeFlags::FINE_GRAINED;
    }

    /// `from` was moved to `to`: records a removal of `from`.
    pub fn moved_from_to(&mut self, from: ElementHandle, to: ElementHandle) {
        let mut leaf = DeltaNode::leaf(from, ChangeKind::Removed, ChangeFlags::MOVED_TO);
        leaf.moved_to = Some(to);
        self.insert(leaf);
    }

    /// `to` was moved here from `from`: records an addition of `to`.
    pub fn moved_to_from(&mut self, to: ElementHandle, from: ElementHandle) {
        let mut leaf = DeltaNode::leaf(to, ChangeKind::Added, ChangeFlags::MOVED_FROM);
        leaf.moved_from = Some(from);
        self.insert(leaf);
    }

    /// Attaches a raw resource delta to this node.
    pub fn add_resource_delta(&mut self, delta: ResourceDelta) {
        match self.kind {
            ChangeKind::Added | ChangeKind::Removed => return,
            ChangeKind::Changed => self.flags |= ChangeFlags::CONTENT,
            ChangeKind::None => {
                self.kind = ChangeKind::Changed;
                self.flags |= ChangeFlags::CONTENT;
            }
        }
        self.resource_deltas.push(delta);
    }

    /// Indented dump of this subtree, one node per line, starting at `depth`
    /// tabs.
    pub fn debug_string(&self, depth: usize) -> String {
        let mut out = String::new();
        self.write_debug(&mut out, depth);
        out
    }

    fn write_debug(&self, out: &mut String, depth: usize) {
        push_indent(out, depth);
        let _ = write!(out, "{}[{}]: {{", self.element, self.kind.marker());
        self.write_flags(out);
        out.push('}');

        for child in self.affected_children() {
            out.push('\n');
            child.write_debug(out, depth + 1);
        }
        for delta in &self.resource_deltas {
            out.push('\n');
            push_indent(out, depth + 1);
            let _ = write!(out, "{delta}");
        }
        for delta in &self.attribute_deltas {
            out.push('\n');
            push_indent(out, depth + 1);
            let _ = write!(out, "{delta}");
        }
    }

    fn write_flags(&self, out: &mut String) {
        for (i, (flag, label)) in self.flags.labels().enumerate() {
            if i > 0 {
                out.push_str(" | ");
            }
            out.push_str(label);
            let counterpart = if flag == ChangeFlags::MOVED_FROM {
                self.moved_from.as_ref()
            } else if flag == ChangeFlags::MOVED_TO {
                self.moved_to.as_ref()
            } else {
                None
            };
            if let Some(handle) = counterpart {
                let _ = write!(out, "({handle})");
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat('\t').take(depth));
}
