//! Stale patch detection.
//!
//! Patches compensate for upstream defects. Once upstream fixes a defect the matching
//! override stops matching anything, and should be deleted. After a full generation run,
//! [`audit`] walks the [`PatchTree`] and reports every node whose apply count is still
//! zero, then acts on the configured [`AuditPolicy`].
//!
//! # Examples
//!
//! ```rust
//! use metapatch::prelude::*;
//!
//! let tree = build_patch_tree(&PatchTable::known())?;
//!
//! // ... generation run; the emitter never met IUIAutomation6 ...
//!
//! let report = audit(&tree, &AuditConfig::default())?;
//! assert_eq!(report.stale().len(), 1);
//! assert_eq!(report.stale()[0].path, "WindowsAccessibility.IUIAutomation6");
//!
//! assert!(audit(&tree, &AuditConfig::strict()).is_err());
//! # Ok::<(), metapatch::Error>(())
//! ```

mod config;

use std::fmt;

use strum::IntoEnumIterator;
use tracing::{error, info, warn};

pub use config::{AuditConfig, AuditPolicy};

use crate::{
    patch::{traverse_with_path, Patch, PatchKind, PatchRef, PatchTree},
    Error, Result,
};

/// An override that was declared but never applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalePatch {
    /// Module the override belongs to
    pub api: String,
    /// Kind of the node
    pub kind: PatchKind,
    /// Dotted qualified name, e.g. `Gdi.BITMAPINFO.bmiColors`
    pub path: String,
}

impl fmt::Display for StalePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} patch '{}' was never applied", self.kind, self.path)
    }
}

/// Result of an audit pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    visited: usize,
    stale: Vec<StalePatch>,
}

impl AuditReport {
    /// Number of nodes inspected.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Stale patches in traversal order.
    #[must_use]
    pub fn stale(&self) -> &[StalePatch] {
        &self.stale
    }

    /// Returns `true` if every inspected override was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
    }

    /// Stale patch counts per node kind, for every kind.
    #[must_use]
    pub fn count_by_kind(&self) -> Vec<(PatchKind, usize)> {
        PatchKind::iter()
            .map(|kind| {
                let count = self.stale.iter().filter(|stale| stale.kind == kind).count();
                (kind, count)
            })
            .collect()
    }
}

/// Audits `tree` for overrides that were never applied.
///
/// # Errors
/// Returns [`Error::StalePatches`] if stale patches were found and the policy is
/// [`AuditPolicy::Fail`].
pub fn audit(tree: &PatchTree, config: &AuditConfig) -> Result<AuditReport> {
    let mut report = AuditReport::default();

    for (api_name, api) in tree.apis().iter() {
        let mut inspect = |path: &[&str], patch: PatchRef<'_>| {
            report.visited += 1;
            if patch.apply_count() == 0 {
                report.stale.push(StalePatch {
                    api: api_name.to_string(),
                    kind: patch.kind(),
                    path: path.join("."),
                });
            }
        };

        for ty in api.types().values() {
            inspect(&[api_name, ty.name()], PatchRef::Type(ty));
            traverse_with_path(ty, |path, patch| {
                let mut qualified = Vec::with_capacity(path.len() + 1);
                qualified.push(api_name);
                qualified.extend_from_slice(path);
                inspect(&qualified, patch);
            });
        }

        if config.include_funcs {
            for func in api.funcs().values() {
                inspect(&[api_name, func.name()], PatchRef::Func(func));
                traverse_with_path(func, |path, patch| {
                    let mut qualified = Vec::with_capacity(path.len() + 1);
                    qualified.push(api_name);
                    qualified.extend_from_slice(path);
                    inspect(&qualified, patch);
                });
            }
        }
    }

    match config.policy {
        AuditPolicy::Ignore => {}
        AuditPolicy::Warn => {
            for stale in &report.stale {
                warn!(api = %stale.api, kind = %stale.kind, "{}", stale);
            }
        }
        AuditPolicy::Fail => {
            for stale in &report.stale {
                error!(api = %stale.api, kind = %stale.kind, "{}", stale);
            }
            if !report.is_clean() {
                return Err(Error::StalePatches(report.stale.len()));
            }
        }
    }

    if report.is_clean() && config.policy != AuditPolicy::Ignore {
        info!(visited = report.visited, "all patches were applied");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        patch::{
            build_patch_tree, FieldOverride, FuncOverride, FuncPatchMap, ParamOverride,
            PatchTable, TypeOverride, TypePatchMap,
        },
        test::init_tracing,
    };

    fn table() -> PatchTable {
        PatchTable::new()
            .with_func(
                FuncOverride::new("Kernel", "ReadFile")
                    .param(ParamOverride::new("lpBuffer").optional()),
            )
            .with_type(
                TypeOverride::new("Gdi", "BITMAPINFO")
                    .field(FieldOverride::new("bmiColors").with_type("RGBQUAD*")),
            )
    }

    #[test]
    fn test_audit_reports_everything_unapplied() {
        init_tracing();
        let tree = build_patch_tree(&table()).unwrap();

        let report = audit(&tree, &AuditConfig::default()).unwrap();
        assert_eq!(report.visited(), tree.node_count());
        let paths: Vec<_> = report.stale().iter().map(|s| s.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "Kernel.ReadFile",
                "Kernel.ReadFile.lpBuffer",
                "Gdi.BITMAPINFO",
                "Gdi.BITMAPINFO.bmiColors"
            ]
        );
    }

    #[test]
    fn test_audit_clean_after_application() {
        init_tracing();
        let tree = build_patch_tree(&table()).unwrap();

        let func = tree.api("Kernel").func_patch("ReadFile");
        func.mark_applied();
        assert!(func.param("lpBuffer").apply_optional(false));

        let ty = tree.api("Gdi").type_patch("BITMAPINFO");
        ty.mark_applied();
        assert_eq!(ty.field("bmiColors").apply_type("RGBQUAD"), "RGBQUAD*");

        let report = audit(&tree, &AuditConfig::strict()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.visited(), 4);
    }

    #[test]
    fn test_audit_strict_fails() {
        init_tracing();
        let tree = build_patch_tree(&table()).unwrap();
        tree.api("Kernel").func_patch("ReadFile").mark_applied();

        assert_eq!(
            audit(&tree, &AuditConfig::strict()).unwrap_err(),
            Error::StalePatches(3)
        );
    }

    #[test]
    fn test_audit_types_only() {
        init_tracing();
        let tree = build_patch_tree(&table()).unwrap();

        let report = audit(&tree, &AuditConfig::types_only()).unwrap();
        assert_eq!(report.visited(), 2);
        assert!(report.stale().iter().all(|s| s.api == "Gdi"));
    }

    #[test]
    fn test_audit_ignore_still_reports() {
        let tree = build_patch_tree(&table()).unwrap();

        let report = audit(&tree, &AuditConfig::disabled()).unwrap();
        assert_eq!(report.visited(), 4);
        assert_eq!(report.stale().len(), 4);
    }

    #[test]
    fn test_count_by_kind() {
        let tree = build_patch_tree(&table()).unwrap();
        let report = audit(&tree, &AuditConfig::disabled()).unwrap();

        let counts = report.count_by_kind();
        assert_eq!(counts.len(), 5);
        assert!(counts.contains(&(PatchKind::Type, 1)));
        assert!(counts.contains(&(PatchKind::Field, 1)));
        assert!(counts.contains(&(PatchKind::ComType, 0)));
        assert!(counts.contains(&(PatchKind::Func, 1)));
        assert!(counts.contains(&(PatchKind::Param, 1)));
    }

    #[test]
    fn test_stale_patch_display() {
        let stale = StalePatch {
            api: "Gdi".into(),
            kind: PatchKind::Field,
            path: "Gdi.BITMAPINFO.bmiColors".into(),
        };
        assert_eq!(
            stale.to_string(),
            "Field patch 'Gdi.BITMAPINFO.bmiColors' was never applied"
        );
    }
}
