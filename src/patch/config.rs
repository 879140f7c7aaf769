//! Override records and the declarative override table.
//!
//! Records are plain data authored by a maintainer. Each one names an upstream metadata
//! entity by `(api, name)` and describes the correction to apply to it. They carry no
//! runtime state; the usage counters live on the patch nodes built from them.
//!
//! # Key Components
//!
//! - [`ParamOverride`] - Adds `optional` / `const` annotations to a function parameter
//! - [`FieldOverride`] - Replaces the type of a struct field
//! - [`FuncOverride`] - Groups parameter overrides of one function (or COM method)
//! - [`TypeOverride`] - Removes a type, or groups field / nested type / method overrides
//! - [`PatchTable`] - The flat table the tree builder consumes
//!
//! # Examples
//!
//! ```rust
//! use metapatch::{FieldOverride, PatchTable, TypeOverride};
//!
//! let table = PatchTable::new()
//!     .with_type(TypeOverride::new("WindowsAccessibility", "IUIAutomation6").remove())
//!     .with_type(
//!         TypeOverride::new("Gdi", "BITMAPINFO")
//!             .field(FieldOverride::new("bmiColors").with_type("RGBQUAD*")),
//!     );
//! assert_eq!(table.types().len(), 2);
//! ```

/// Override for a single function or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamOverride {
    /// Parameter name as it appears in the upstream metadata
    pub name: String,
    /// Mark the parameter optional (nullable pointer)
    pub optional: bool,
    /// Mark the pointee `const`
    pub is_const: bool,
}

impl ParamOverride {
    pub(crate) const EMPTY: ParamOverride = ParamOverride {
        name: String::new(),
        optional: false,
        is_const: false,
    };

    /// Creates a parameter override that changes nothing yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the parameter as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the parameter as pointing to `const` data.
    #[must_use]
    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }
}

/// Override for a single struct field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOverride {
    /// Field name as it appears in the upstream metadata
    pub name: String,
    /// Replacement type name; `None` leaves the upstream type as-is
    pub type_name: Option<String>,
}

impl FieldOverride {
    pub(crate) const EMPTY: FieldOverride = FieldOverride {
        name: String::new(),
        type_name: None,
    };

    /// Creates a field override that keeps the upstream type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
        }
    }

    /// Replaces the field's type with `type_name`.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

/// Override for a function, or for a method of a COM interface.
///
/// For free functions `api` names the owning module. For methods declared inside a
/// [`TypeOverride`] the interface's module is authoritative and `api` is informational.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FuncOverride {
    /// Owning API / module name
    pub api: String,
    /// Function name
    pub name: String,
    /// Parameter overrides, in declaration order
    pub params: Vec<ParamOverride>,
}

impl FuncOverride {
    pub(crate) const EMPTY: FuncOverride = FuncOverride {
        api: String::new(),
        name: String::new(),
        params: Vec::new(),
    };

    /// Creates a function override without parameter overrides.
    pub fn new(api: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter override.
    #[must_use]
    pub fn param(mut self, param: ParamOverride) -> Self {
        self.params.push(param);
        self
    }
}

/// Override for a type (struct, enum, interface, ...).
///
/// `fields` and `nested_types` stay `None` unless declared, which lets the tree builder
/// reuse the shared empty maps. A present `methods` list (even an empty one) marks the
/// target as a COM interface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeOverride {
    /// Owning API / module name
    pub api: String,
    /// Type name
    pub name: String,
    /// Drop the entity from the generated output entirely
    pub remove: bool,
    /// Field overrides, if any were declared
    pub fields: Option<Vec<FieldOverride>>,
    /// Nested type overrides, if any were declared
    pub nested_types: Option<Vec<TypeOverride>>,
    /// Method overrides; presence marks the type as a COM interface
    pub methods: Option<Vec<FuncOverride>>,
}

impl TypeOverride {
    pub(crate) const EMPTY: TypeOverride = TypeOverride {
        api: String::new(),
        name: String::new(),
        remove: false,
        fields: None,
        nested_types: None,
        methods: None,
    };

    /// Creates a type override that changes nothing yet.
    pub fn new(api: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Requests removal of the type from the generated output.
    #[must_use]
    pub fn remove(mut self) -> Self {
        self.remove = true;
        self
    }

    /// Appends a field override.
    #[must_use]
    pub fn field(mut self, field: FieldOverride) -> Self {
        self.fields.get_or_insert_with(Vec::new).push(field);
        self
    }

    /// Appends a nested type override.
    #[must_use]
    pub fn nested(mut self, nested: TypeOverride) -> Self {
        self.nested_types.get_or_insert_with(Vec::new).push(nested);
        self
    }

    /// Marks the type as a COM interface without any method overrides.
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.methods.get_or_insert_with(Vec::new);
        self
    }

    /// Appends a COM method override (implies [`TypeOverride::interface`]).
    #[must_use]
    pub fn method(mut self, method: FuncOverride) -> Self {
        self.methods.get_or_insert_with(Vec::new).push(method);
        self
    }

    /// Returns `true` if this override targets a COM interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.methods.is_some()
    }
}

/// The flat, declarative override table.
///
/// Authored once in source, compiled into a [`crate::PatchTree`] at startup. Order is
/// significant: it becomes the traversal order of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchTable {
    funcs: Vec<FuncOverride>,
    types: Vec<TypeOverride>,
}

impl PatchTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from pre-assembled record lists.
    #[must_use]
    pub fn from_parts(funcs: Vec<FuncOverride>, types: Vec<TypeOverride>) -> Self {
        Self { funcs, types }
    }

    /// The overrides for upstream defects that are currently known to exist.
    ///
    /// Each entry should reference the upstream issue it works around, so it can be
    /// deleted once the audit reports it as stale.
    #[must_use]
    pub fn known() -> Self {
        Self::new()
            // https://github.com/microsoft/win32metadata/issues/127
            .with_type(TypeOverride::new("WindowsAccessibility", "IUIAutomation6").remove())
    }

    /// Appends a function override.
    #[must_use]
    pub fn with_func(mut self, func: FuncOverride) -> Self {
        self.funcs.push(func);
        self
    }

    /// Appends a type override.
    #[must_use]
    pub fn with_type(mut self, ty: TypeOverride) -> Self {
        self.types.push(ty);
        self
    }

    /// Function overrides in declaration order.
    #[must_use]
    pub fn funcs(&self) -> &[FuncOverride] {
        &self.funcs
    }

    /// Type overrides in declaration order.
    #[must_use]
    pub fn types(&self) -> &[TypeOverride] {
        &self.types
    }

    /// Returns `true` if the table declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty() && self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_override_builders() {
        let ty = TypeOverride::new("Gdi", "BITMAPINFO")
            .field(FieldOverride::new("bmiColors").with_type("RGBQUAD*"))
            .field(FieldOverride::new("bmiHeader"));

        assert_eq!(ty.api, "Gdi");
        assert!(!ty.remove);
        assert!(!ty.is_interface());
        assert!(ty.nested_types.is_none());

        let fields = ty.fields.as_ref().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].type_name.as_deref(), Some("RGBQUAD*"));
        assert_eq!(fields[1].type_name, None);
    }

    #[test]
    fn test_interface_marker() {
        let plain = TypeOverride::new("Com", "IUnknown");
        assert!(!plain.is_interface());

        let marked = plain.clone().interface();
        assert!(marked.is_interface());
        assert_eq!(marked.methods.as_deref(), Some(&[][..]));

        let with_method = plain.method(
            FuncOverride::new("Com", "QueryInterface").param(ParamOverride::new("ppv").optional()),
        );
        assert!(with_method.is_interface());
        assert!(with_method.methods.unwrap()[0].params[0].optional);
    }

    #[test]
    fn test_param_flags() {
        let p = ParamOverride::new("lpBuffer").optional().constant();
        assert!(p.optional);
        assert!(p.is_const);
        assert_eq!(
            ParamOverride::new("x"),
            ParamOverride {
                name: "x".into(),
                ..ParamOverride::EMPTY
            }
        );
    }

    #[test]
    fn test_known_table() {
        let known = PatchTable::known();
        assert!(known.funcs().is_empty());
        assert_eq!(known.types().len(), 1);
        assert_eq!(known.types()[0].name, "IUIAutomation6");
        assert!(known.types()[0].remove);
    }

    #[test]
    fn test_table_preserves_order() {
        let table = PatchTable::new()
            .with_type(TypeOverride::new("A", "Z"))
            .with_type(TypeOverride::new("A", "B"))
            .with_func(FuncOverride::new("A", "F"));

        let names: Vec<_> = table.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Z", "B"]);
        assert!(!table.is_empty());
        assert!(PatchTable::new().is_empty());
    }
}
