//! # metapatch Prelude
//!
//! Quick access to the types and traits needed to build, query and audit a patch tree.
//! The capability and [`Patch`] traits are included so their methods resolve without
//! further imports.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all metapatch operations
pub use crate::Error;

/// The result type used throughout metapatch
pub use crate::Result;

// ================================================================================================
// Authoring
// ================================================================================================

/// Override records and the table that groups them
pub use crate::patch::{FieldOverride, FuncOverride, ParamOverride, PatchTable, TypeOverride};

// ================================================================================================
// Patch Tree
// ================================================================================================

/// Tree construction and the nodes it produces
pub use crate::patch::{
    build_patch_tree, ApiPatch, ComTypePatch, FieldPatch, FuncPatch, ParamPatch, PatchTree,
    TypePatch,
};

/// Lookup and capability access
pub use crate::patch::{lookup, FuncPatchMap, Patch, PatchMap, TypePatchMap};

/// Traversal
pub use crate::patch::{traverse, traverse_with_path, PatchKind, PatchRef, Traverse};

// ================================================================================================
// Audit
// ================================================================================================

/// Stale patch detection
pub use crate::audit::{audit, AuditConfig, AuditPolicy, AuditReport, StalePatch};
