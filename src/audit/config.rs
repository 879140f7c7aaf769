//! Audit configuration
//!
//! Decides how stale patches (overrides that were never applied during a full
//! generation run) are treated, and which parts of the tree are inspected.

/// What to do with stale patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditPolicy {
    /// Collect the report, log nothing, never fail
    Ignore,
    /// Log a warning per stale patch
    #[default]
    Warn,
    /// Log an error per stale patch and fail the audit
    Fail,
}

/// Configuration for the post-generation patch audit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditConfig {
    /// Treatment of stale patches
    pub policy: AuditPolicy,

    /// Inspect free function overrides (and their parameters)
    /// Disable when the generator does not emit functions, or they would all be reported
    pub include_funcs: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            policy: AuditPolicy::Warn,
            include_funcs: true,
        }
    }
}

impl AuditConfig {
    /// Creates a configuration that logs nothing and never fails
    ///
    /// The returned report is still complete.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            policy: AuditPolicy::Ignore,
            include_funcs: true,
        }
    }

    /// Creates a configuration that fails the run on any stale patch
    ///
    /// Suitable for CI: a stale patch means upstream fixed the defect and the override
    /// must be deleted.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            policy: AuditPolicy::Fail,
            include_funcs: true,
        }
    }

    /// Creates a warning configuration that only inspects type overrides
    #[must_use]
    pub fn types_only() -> Self {
        Self {
            policy: AuditPolicy::Warn,
            include_funcs: false,
        }
    }
}
