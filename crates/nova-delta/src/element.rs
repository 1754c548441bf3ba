use std::fmt;
use std::sync::Arc;

/// Granularity of a Java model element, coarsest first.
///
/// The ordering is significant: everything at or after
/// [`ElementKind::CompilationUnit`] is considered fine-grained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    JavaModel,
    JavaProject,
    PackageFragmentRoot,
    PackageFragment,
    CompilationUnit,
    ClassFile,
    Type,
    Field,
    Method,
    Initializer,
    PackageDeclaration,
    ImportContainer,
    ImportDeclaration,
    TypeParameter,
    Annotation,
}

impl ElementKind {
    pub fn is_fine_grained(self) -> bool {
        self >= ElementKind::CompilationUnit
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct HandleData {
    kind: ElementKind,
    name: Box<str>,
    parent: Option<ElementHandle>,
}

/// Identifier of a Java model element.
///
/// Handles compare by kind, name *and* parent chain, so two jars with the same
/// path referenced from different projects are different elements.
#[derive(Clone, Eq, Hash)]
pub struct ElementHandle(Arc<HandleData>);

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl ElementHandle {
    /// The root of every element tree.
    pub fn model() -> Self {
        Self(Arc::new(HandleData {
            kind: ElementKind::JavaModel,
            name: "Java Model".into(),
            parent: None,
        }))
    }

    /// A project directly under the model root.
    pub fn project(name: impl Into<Box<str>>) -> Self {
        Self::model().child(ElementKind::JavaProject, name)
    }

    pub fn child(&self, kind: ElementKind, name: impl Into<Box<str>>) -> Self {
        Self(Arc::new(HandleData {
            kind,
            name: name.into(),
            parent: Some(self.clone()),
        }))
    }

    pub fn kind(&self) -> ElementKind {
        self.0.kind
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&ElementHandle> {
        self.0.parent.as_ref()
    }

    /// Ancestors of this handle, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &ElementHandle> {
        std::iter::successors(self.parent(), |handle| handle.parent())
    }

    /// Closest enclosing element of `kind`, including `self`.
    pub fn ancestor_of_kind(&self, kind: ElementKind) -> Option<&ElementHandle> {
        std::iter::once(self)
            .chain(self.ancestors())
            .find(|handle| handle.kind() == kind)
    }

    pub fn is_ancestor_of(&self, other: &ElementHandle) -> bool {
        other.ancestors().any(|ancestor| ancestor == self)
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({}", self.kind(), self.name())?;
        if let Some(parent) = self.parent().filter(|p| p.kind() != ElementKind::JavaModel) {
            write!(f, " in {}", parent.name())?;
        }
        f.write_str(")")
    }
}
