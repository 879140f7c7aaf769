//! Exactly-once traversal of patch subtrees.
//!
//! The audit after a generation run needs to see every declared override. [`traverse`]
//! walks a subtree pre-order and hands each descendant to a visitor as a [`PatchRef`].
//! Within a level the order is the node's own map order, i.e. table declaration order:
//!
//! - [`ApiPatch`]: every type (recursively), then every function (with its parameters)
//! - [`TypePatch`]: fields, then nested types (recursively), then COM methods (with their
//!   parameters)
//! - [`FuncPatch`]: parameters
//!
//! The root itself is not visited. The traversal does not interpret apply counts.

use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::patch::{ApiPatch, FieldPatch, FuncPatch, ParamPatch, Patch, TypePatch};

/// Kind of a visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, strum::Display)]
pub enum PatchKind {
    /// Plain type override
    Type,
    /// COM interface override
    ComType,
    /// Function or COM method override
    Func,
    /// Field override
    Field,
    /// Parameter override
    Param,
}

/// Borrowed handle to any node below an API root.
#[derive(Debug, Clone, Copy)]
pub enum PatchRef<'a> {
    /// A type node (plain or COM)
    Type(&'a TypePatch),
    /// A function or COM method node
    Func(&'a FuncPatch),
    /// A field node
    Field(&'a FieldPatch),
    /// A parameter node
    Param(&'a ParamPatch),
}

impl<'a> PatchRef<'a> {
    /// The node as a trait object, for counter access.
    #[must_use]
    pub fn as_patch(&self) -> &'a dyn Patch {
        match *self {
            PatchRef::Type(patch) => patch,
            PatchRef::Func(patch) => patch,
            PatchRef::Field(patch) => patch,
            PatchRef::Param(patch) => patch,
        }
    }

    /// Kind of the node; COM-built types report [`PatchKind::ComType`].
    #[must_use]
    pub fn kind(&self) -> PatchKind {
        match self {
            PatchRef::Type(patch) if patch.is_com() => PatchKind::ComType,
            PatchRef::Type(_) => PatchKind::Type,
            PatchRef::Func(_) => PatchKind::Func,
            PatchRef::Field(_) => PatchKind::Field,
            PatchRef::Param(_) => PatchKind::Param,
        }
    }

    /// Name of the patched entity.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.as_patch().name()
    }

    /// Number of times the override was applied.
    #[must_use]
    pub fn apply_count(&self) -> u32 {
        self.as_patch().apply_count()
    }
}

impl fmt::Display for PatchRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchRef::Type(patch) => fmt::Display::fmt(patch, f),
            PatchRef::Func(patch) => fmt::Display::fmt(patch, f),
            PatchRef::Field(patch) => fmt::Display::fmt(patch, f),
            PatchRef::Param(patch) => fmt::Display::fmt(patch, f),
        }
    }
}

/// A node whose descendants can be walked.
pub trait Traverse {
    /// Visits every descendant exactly once.
    ///
    /// `path` holds the qualified name of the node being walked (its own name already
    /// pushed). The visitor receives the path including the visited node's name.
    fn walk<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visitor: &mut dyn FnMut(&[&'a str], PatchRef<'a>),
    );

    /// Name this node contributes to qualified paths; empty for nameless roots.
    fn path_segment(&self) -> &str;
}

fn visit<'a>(
    path: &mut Vec<&'a str>,
    node: PatchRef<'a>,
    visitor: &mut dyn FnMut(&[&'a str], PatchRef<'a>),
) {
    path.push(node.name());
    visitor(path.as_slice(), node);
    match node {
        PatchRef::Type(patch) => patch.walk(path, visitor),
        PatchRef::Func(patch) => patch.walk(path, visitor),
        PatchRef::Field(_) | PatchRef::Param(_) => {}
    }
    path.pop();
}

impl Traverse for ApiPatch {
    fn walk<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visitor: &mut dyn FnMut(&[&'a str], PatchRef<'a>),
    ) {
        for patch in self.types().values() {
            visit(path, PatchRef::Type(patch), visitor);
        }

        for patch in self.funcs().values() {
            visit(path, PatchRef::Func(patch), visitor);
        }
    }

    fn path_segment(&self) -> &str {
        self.name()
    }
}

impl Traverse for TypePatch {
    fn walk<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visitor: &mut dyn FnMut(&[&'a str], PatchRef<'a>),
    ) {
        for patch in self.fields().values() {
            visit(path, PatchRef::Field(patch), visitor);
        }

        for patch in self.nested_types().values() {
            visit(path, PatchRef::Type(patch), visitor);
        }

        for patch in self.methods().values() {
            visit(path, PatchRef::Func(patch), visitor);
        }
    }

    fn path_segment(&self) -> &str {
        self.name()
    }
}

impl Traverse for FuncPatch {
    fn walk<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visitor: &mut dyn FnMut(&[&'a str], PatchRef<'a>),
    ) {
        for patch in self.params().values() {
            visit(path, PatchRef::Param(patch), visitor);
        }
    }

    fn path_segment(&self) -> &str {
        self.name()
    }
}

/// Calls `visitor` once for every descendant of `root`.
///
/// # Examples
///
/// ```rust
/// use metapatch::prelude::*;
///
/// let tree = build_patch_tree(&PatchTable::known())?;
/// let mut unused = Vec::new();
/// traverse(&tree, |patch| {
///     if patch.apply_count() == 0 {
///         unused.push(patch.to_string());
///     }
/// });
/// assert_eq!(unused, ["Type 'IUIAutomation6'"]);
/// # Ok::<(), metapatch::Error>(())
/// ```
pub fn traverse<'a, T>(root: &'a T, mut visitor: impl FnMut(PatchRef<'a>))
where
    T: Traverse + ?Sized,
{
    let mut path = Vec::new();
    root.walk(&mut path, &mut |_: &[&'a str], patch: PatchRef<'a>| visitor(patch));
}

/// Like [`traverse`], additionally passing the qualified path of each node.
///
/// The path starts with the root's own name (if it has one) and ends with the visited
/// node's name, e.g. `["Gdi", "BITMAPINFO", "bmiColors"]`.
pub fn traverse_with_path<'a, T>(root: &'a T, mut visitor: impl FnMut(&[&'a str], PatchRef<'a>))
where
    T: Traverse + ?Sized,
{
    let mut path = Vec::new();
    let segment = root.path_segment();
    if !segment.is_empty() {
        path.push(segment);
    }
    root.walk(&mut path, &mut visitor);
}
