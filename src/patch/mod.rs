//! The patch tree: targeted overrides on top of upstream metadata.
//!
//! Upstream metadata is produced by a third party and has known defects (wrong field
//! types, spuriously present members, missing `const` / optional annotations). Instead of
//! editing that source, the generator consults a tree of patch nodes built from a
//! declarative [`PatchTable`] and applies whatever override it finds.
//!
//! # Key Components
//!
//! - [`PatchTable`] and the override records - what a maintainer authors
//! - [`build_patch_tree`] / [`PatchTree`] - compiles the table into nodes keyed by name
//! - [`ApiPatch`], [`TypePatch`], [`ComTypePatch`], [`FuncPatch`], [`FieldPatch`],
//!   [`ParamPatch`] - the nodes
//! - [`lookup`] / [`PatchMap`] - name lookup that never fails, returning empty sentinels
//! - [`TypePatchMap`] / [`FuncPatchMap`] - capability views over nodes with child maps
//! - [`traverse`] - exactly-once visitation used by [`crate::audit`]
//!
//! # Lifecycle
//!
//! The tree is built once at startup and is immutable afterwards, except for the
//! per-node [`ApplyCounter`]. The emitter looks up a node for every entity it processes,
//! and calls [`Patch::mark_applied`] when it actually applies an override's effect.
//! After generation an audit walks the tree and reports nodes whose count is still zero.
//!
//! # Empty Sentinels
//!
//! Patches are rare exceptions, so the overwhelming majority of lookups miss. Misses
//! return a shared `static` sentinel per node kind (e.g. [`TypePatch::empty`]) and nodes
//! without declared children hand out shared empty maps. Nothing is allocated for the
//! unpatched case and "is this the empty case" is an identity check
//! ([`TypePatch::is_empty_sentinel`]).
//!
//! # Examples
//!
//! ```rust
//! use metapatch::prelude::*;
//!
//! let tree = build_patch_tree(&PatchTable::known())?;
//!
//! let api = tree.api("WindowsAccessibility");
//! let patch = api.type_patch("IUIAutomation6");
//! assert!(patch.apply_remove());
//!
//! assert!(api.type_patch("IUIAutomation5").is_empty_sentinel());
//! # Ok::<(), metapatch::Error>(())
//! ```

mod builder;
mod capability;
mod config;
mod map;
mod node;
mod visit;

use std::sync::atomic::{AtomicU32, Ordering};

pub use builder::{build_patch_tree, PatchTree};
pub use capability::{FuncPatchMap, NoFuncPatches, NoTypePatches, TypePatchMap};
pub use config::{FieldOverride, FuncOverride, ParamOverride, PatchTable, TypeOverride};
pub use map::{lookup, PatchMap};
pub use node::{ApiPatch, ComTypePatch, FieldPatch, FuncPatch, ParamPatch, TypePatch};
pub use visit::{traverse, traverse_with_path, PatchKind, PatchRef, Traverse};

/// Usage counter attached to every patch node.
///
/// The only mutable state of the tree. It is bumped through a shared reference, which
/// lets the sentinels be plain `static` items. The count is a statistic for the audit
/// and never synchronises anything, hence relaxed ordering.
#[derive(Debug, Default)]
pub struct ApplyCounter(AtomicU32);

impl ApplyCounter {
    /// Creates a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Records one application.
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of recorded applications.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Behaviour shared by every node of the patch tree.
pub trait Patch {
    /// The node's usage counter.
    fn counter(&self) -> &ApplyCounter;

    /// Name of the patched entity; empty for sentinels.
    fn name(&self) -> &str;

    /// Records that the override's effect was applied to the generated output.
    ///
    /// Call this when the override changed something, not merely on lookup. Nodes
    /// without an override (the shared sentinels) ignore the call, so their count stays
    /// zero.
    fn mark_applied(&self) {
        self.counter().increment();
    }

    /// Number of times the override was applied.
    fn apply_count(&self) -> u32 {
        self.counter().get()
    }

    /// Returns `true` if the override was applied at least once.
    fn is_applied(&self) -> bool {
        self.apply_count() > 0
    }
}
