// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # metapatch
//!
//! The override layer of a metadata-driven binding generator. Upstream API metadata
//! (modules, types, functions, fields, parameters, nested types) is produced by a third
//! party and periodically updated; `metapatch` lets the generator apply small, targeted
//! corrections to it without touching the upstream source, and tells you when a
//! correction has become obsolete.
//!
//! ## Features
//!
//! - **📋 Declarative overrides** - A flat [`PatchTable`] authored as plain data
//! - **🌳 Name-keyed patch tree** - Compiled once at startup, duplicates rejected
//! - **🪶 Allocation-free misses** - Unpatched lookups return shared `static` sentinels
//! - **🧩 COM-aware** - Interface overrides carry methods, and plain overrides for
//!   interfaces are reported as consistency errors
//! - **🔍 Stale patch audit** - Every override counts its applications; the audit lists
//!   the ones that never matched
//!
//! ## Quick Start
//!
//! ```rust
//! use metapatch::prelude::*;
//!
//! // Startup: compile the override table
//! let tree = build_patch_tree(&PatchTable::known())?;
//!
//! // Generation: consult the tree for every entity
//! for name in ["IUIAutomation5", "IUIAutomation6"] {
//!     let patch = tree.api("WindowsAccessibility").type_patch(name);
//!     if patch.apply_remove() {
//!         continue;
//!     }
//!     // ... emit the type ...
//! }
//!
//! // Afterwards: make sure every override was still needed
//! let report = audit(&tree, &AuditConfig::strict())?;
//! assert!(report.is_clean());
//! # Ok::<(), metapatch::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`patch`] - Override records, the patch tree, lookup, capabilities and traversal
//! - [`audit`] - Post-generation detection of stale overrides
//! - [`Error`] and [`Result`] - Authoring and consistency errors
//!
//! ## Threading
//!
//! The tree is built once and read afterwards. Apply counters are atomic, so the tree
//! is `Sync` and can be shared across worker threads that emit distinct modules.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use metapatch::prelude::*;
///
/// let tree = build_patch_tree(&PatchTable::new())?;
/// assert!(tree.api("Gdi").type_patch("RECT").is_empty_sentinel());
/// # Ok::<(), metapatch::Error>(())
/// ```
pub mod prelude;

/// The patch tree and everything needed to author, build, query and walk it.
pub mod patch;

/// Detection of overrides that were never applied.
pub mod audit;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `metapatch` Error type
///
/// Covers authoring errors raised while building the tree, consistency errors raised
/// while emitting, and the audit's failure on stale patches.
pub use error::Error;

pub use audit::{audit, AuditConfig, AuditPolicy, AuditReport, StalePatch};
pub use patch::{
    build_patch_tree, lookup, traverse, traverse_with_path, ApiPatch, ApplyCounter,
    ComTypePatch, FieldOverride, FieldPatch, FuncOverride, FuncPatch, FuncPatchMap,
    ParamOverride, ParamPatch, Patch, PatchKind, PatchMap, PatchRef, PatchTable, PatchTree,
    Traverse, TypeOverride, TypePatch, TypePatchMap,
};
