#![allow(unused_macros)]

/// Helper macro for declaring the process-wide empty sentinel of a patch node kind
///
/// Expands to a `static` built from a `const fn` constructor and an accessor that hands
/// out the `'static` reference. Every unpatched lookup returns this exact instance, so
/// callers can test for the empty case with [`std::ptr::eq`].
///
/// ```rust, ignore
///  empty_sentinel!(EMPTY_FIELD, FieldPatch, FieldPatch::absent());
///  assert!(std::ptr::eq(lookup(None, "x", FieldPatch::empty()), FieldPatch::empty()));
/// ```
macro_rules! empty_sentinel {
    ($static_name:ident, $ty:ty, $init:expr) => {
        static $static_name: $ty = $init;

        impl $ty {
            /// Returns the shared empty sentinel for this node kind.
            #[must_use]
            pub fn empty() -> &'static $ty {
                &$static_name
            }

            /// Returns `true` if `self` is the shared empty sentinel (identity, not content).
            #[must_use]
            pub fn is_empty_sentinel(&self) -> bool {
                std::ptr::eq(self, &$static_name)
            }
        }
    };
}

/// Helper macro for implementing the shared [`crate::patch::Patch`] plumbing on a node
///
/// ```rust, ignore
///  impl_patch!(FieldPatch, "Field");
/// ```
macro_rules! impl_patch {
    ($ty:ty, $label:literal) => {
        impl crate::patch::Patch for $ty {
            fn counter(&self) -> &crate::patch::ApplyCounter {
                &self.apply_count
            }

            fn name(&self) -> &str {
                self.config().name.as_str()
            }

            fn mark_applied(&self) {
                if !self.is_empty() {
                    self.counter().increment();
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, " '{}'"), self.config().name)
            }
        }
    };
}
