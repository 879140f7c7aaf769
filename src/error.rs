use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into two groups that differ in *when* they surface:
///
/// ## Authoring Errors (build-time)
/// - [`Error::DuplicatePatch`] - The same name was declared twice at one nesting level
/// - [`Error::Malformed`] - The override table itself is inconsistent (empty names, an
///   interface override that also declares fields, ...)
///
/// Both are raised by [`crate::build_patch_tree`] before any binding is emitted.
///
/// ## Consistency Errors (emission-time)
/// - [`Error::ComTypeMismatch`] - A plain type override was found for an entity that the
///   generator classified as a COM interface
///
/// ## Audit Errors
/// - [`Error::StalePatches`] - The audit found overrides that never matched anything and its
///   policy is [`crate::audit::AuditPolicy::Fail`]
///
/// # Examples
///
/// ```rust
/// use metapatch::{build_patch_tree, Error, PatchTable, TypeOverride};
///
/// let table = PatchTable::new()
///     .with_type(TypeOverride::new("Foo", "Bar"))
///     .with_type(TypeOverride::new("Foo", "Bar"));
///
/// match build_patch_tree(&table) {
///     Err(Error::DuplicatePatch { scope, name }) => {
///         assert_eq!(scope, "Foo");
///         assert_eq!(name, "Bar");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A name was declared more than once within the same parent.
    ///
    /// Overrides are keyed by name at every level of the tree, so a second declaration
    /// would silently replace the first one. The build refuses instead.
    ///
    /// # Fields
    ///
    /// * `scope` - Qualified name of the parent (e.g. `Foo` or `Foo.Bar`)
    /// * `name` - The duplicated name
    #[error("Duplicate patch '{name}' in '{scope}'")]
    DuplicatePatch {
        /// Qualified name of the parent the duplicate was declared in
        scope: String,
        /// The name that was declared twice
        name: String,
    },

    /// The override table is malformed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A COM type is being patched as a non-COM type.
    ///
    /// The generator determined that `api`.`name` is an interface, but the declared
    /// override targets fields or nested types (or is otherwise a plain type override).
    /// Continuing would either apply a miscategorized patch or drop it silently.
    #[error("A COM type is being patched as a non-COM type - {api}.{name}")]
    ComTypeMismatch {
        /// Module the offending override belongs to
        api: String,
        /// Name of the offending type
        name: String,
    },

    /// Overrides were declared but never applied during a generation run.
    ///
    /// The associated value is the number of stale overrides found by the audit.
    #[error("{0} patch(es) were never applied")]
    StalePatches(usize),
}
