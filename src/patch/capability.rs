//! Capability views over nodes that own type or function child maps.
//!
//! Generic code often needs "the type overrides of whatever this is" without caring
//! whether it holds an [`ApiPatch`] or a [`ComTypePatch`]. The two capabilities are
//! independent:
//!
//! | Node | [`TypePatchMap`] | [`FuncPatchMap`] |
//! |---|---|---|
//! | [`ApiPatch`] | yes | yes |
//! | [`TypePatch`] | no | no |
//! | [`ComTypePatch`] | no | yes |
//!
//! Plain types expose fields and nested types through their own accessors instead.
//! Where a capability is missing, `<dyn TypePatchMap>::none()` / `<dyn FuncPatchMap>::none()`
//! provide a view over the shared empty map so callers never special-case absence.

use crate::patch::{ApiPatch, ComTypePatch, FuncPatch, PatchMap, TypePatch};

/// Read access to a name → [`TypePatch`] map.
pub trait TypePatchMap {
    /// The type map.
    fn type_map(&self) -> &PatchMap<TypePatch>;

    /// Looks up a type override, falling back to [`TypePatch::empty`].
    fn type_patch(&self, name: &str) -> &TypePatch {
        self.type_map().get_or(name, TypePatch::empty())
    }
}

/// Read access to a name → [`FuncPatch`] map.
pub trait FuncPatchMap {
    /// The function map.
    fn func_map(&self) -> &PatchMap<FuncPatch>;

    /// Looks up a function override, falling back to [`FuncPatch::empty`].
    fn func_patch(&self, name: &str) -> &FuncPatch {
        self.func_map().get_or(name, FuncPatch::empty())
    }
}

/// The "no type children" capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypePatches;

impl TypePatchMap for NoTypePatches {
    fn type_map(&self) -> &PatchMap<TypePatch> {
        PatchMap::<TypePatch>::empty()
    }
}

/// The "no function children" capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFuncPatches;

impl FuncPatchMap for NoFuncPatches {
    fn func_map(&self) -> &PatchMap<FuncPatch> {
        PatchMap::<FuncPatch>::empty()
    }
}

impl dyn TypePatchMap {
    /// Capability view for nodes without type children.
    #[must_use]
    pub fn none() -> &'static dyn TypePatchMap {
        &NoTypePatches
    }
}

impl dyn FuncPatchMap {
    /// Capability view for nodes without function children.
    #[must_use]
    pub fn none() -> &'static dyn FuncPatchMap {
        &NoFuncPatches
    }
}

impl TypePatchMap for ApiPatch {
    fn type_map(&self) -> &PatchMap<TypePatch> {
        self.types()
    }
}

impl FuncPatchMap for ApiPatch {
    fn func_map(&self) -> &PatchMap<FuncPatch> {
        self.funcs()
    }
}

impl FuncPatchMap for ComTypePatch<'_> {
    fn func_map(&self) -> &PatchMap<FuncPatch> {
        self.methods()
    }
}
