//! Patch tree nodes.
//!
//! Every node wraps an optional override record (`None` is the explicit "no override"
//! tag used by sentinels) plus optional child maps. Accessors never expose the `Option`:
//! absent records read as an empty default record and absent maps read as the shared
//! empty map of their kind.

use std::ops::Deref;

use crate::{
    patch::{
        ApplyCounter, FieldOverride, FuncOverride, ParamOverride, Patch, PatchMap, TypeOverride,
    },
    Error, Result,
};

static EMPTY_TYPE_MAP: PatchMap<TypePatch> = PatchMap::new();
static EMPTY_FUNC_MAP: PatchMap<FuncPatch> = PatchMap::new();
static EMPTY_FIELD_MAP: PatchMap<FieldPatch> = PatchMap::new();
static EMPTY_PARAM_MAP: PatchMap<ParamPatch> = PatchMap::new();

static EMPTY_TYPE_CONFIG: TypeOverride = TypeOverride::EMPTY;
static EMPTY_FUNC_CONFIG: FuncOverride = FuncOverride::EMPTY;
static EMPTY_FIELD_CONFIG: FieldOverride = FieldOverride::EMPTY;
static EMPTY_PARAM_CONFIG: ParamOverride = ParamOverride::EMPTY;

static EMPTY_COM_TYPE: TypePatch = TypePatch::absent();

empty_sentinel!(EMPTY_API, ApiPatch, ApiPatch::absent());
empty_sentinel!(EMPTY_TYPE, TypePatch, TypePatch::absent());
empty_sentinel!(EMPTY_FUNC, FuncPatch, FuncPatch::absent());
empty_sentinel!(EMPTY_FIELD, FieldPatch, FieldPatch::absent());
empty_sentinel!(EMPTY_PARAM, ParamPatch, ParamPatch::absent());

impl PatchMap<TypePatch> {
    /// The shared empty type map.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_TYPE_MAP
    }
}

impl PatchMap<FuncPatch> {
    /// The shared empty function map.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_FUNC_MAP
    }
}

impl PatchMap<FieldPatch> {
    /// The shared empty field map.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_FIELD_MAP
    }
}

impl PatchMap<ParamPatch> {
    /// The shared empty parameter map.
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_PARAM_MAP
    }
}

/// Leaf node overriding a function or method parameter.
#[derive(Debug)]
pub struct ParamPatch {
    config: Option<ParamOverride>,
    apply_count: ApplyCounter,
}

impl ParamPatch {
    /// Wraps a parameter override.
    #[must_use]
    pub fn new(config: ParamOverride) -> Self {
        Self {
            config: Some(config),
            apply_count: ApplyCounter::new(),
        }
    }

    const fn absent() -> Self {
        Self {
            config: None,
            apply_count: ApplyCounter::new(),
        }
    }

    /// The override record; the empty default for the sentinel.
    #[must_use]
    pub fn config(&self) -> &ParamOverride {
        self.config.as_ref().unwrap_or(&EMPTY_PARAM_CONFIG)
    }

    /// Returns `true` if no override was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
    }

    /// Applies the `optional` annotation on top of the upstream value.
    ///
    /// Counts as an application only if the upstream value changes.
    pub fn apply_optional(&self, upstream: bool) -> bool {
        if self.config().optional && !upstream {
            self.mark_applied();
            return true;
        }
        upstream
    }

    /// Applies the `const` annotation on top of the upstream value.
    ///
    /// Counts as an application only if the upstream value changes.
    pub fn apply_const(&self, upstream: bool) -> bool {
        if self.config().is_const && !upstream {
            self.mark_applied();
            return true;
        }
        upstream
    }
}

impl_patch!(ParamPatch, "Parameter");

/// Leaf node overriding a struct field.
#[derive(Debug)]
pub struct FieldPatch {
    config: Option<FieldOverride>,
    apply_count: ApplyCounter,
}

impl FieldPatch {
    /// Wraps a field override.
    #[must_use]
    pub fn new(config: FieldOverride) -> Self {
        Self {
            config: Some(config),
            apply_count: ApplyCounter::new(),
        }
    }

    const fn absent() -> Self {
        Self {
            config: None,
            apply_count: ApplyCounter::new(),
        }
    }

    /// The override record; the empty default for the sentinel.
    #[must_use]
    pub fn config(&self) -> &FieldOverride {
        self.config.as_ref().unwrap_or(&EMPTY_FIELD_CONFIG)
    }

    /// Returns `true` if no override was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
    }

    /// Returns the field type to emit: the replacement if one is declared, else `upstream`.
    ///
    /// Counts as an application only if the replacement differs from `upstream`.
    pub fn apply_type<'a>(&'a self, upstream: &'a str) -> &'a str {
        match self.config().type_name.as_deref() {
            Some(replacement) if replacement != upstream => {
                self.mark_applied();
                replacement
            }
            _ => upstream,
        }
    }
}

impl_patch!(FieldPatch, "Field");

/// Node overriding a function or COM method, owning its parameter overrides.
#[derive(Debug)]
pub struct FuncPatch {
    config: Option<FuncOverride>,
    params: Option<PatchMap<ParamPatch>>,
    apply_count: ApplyCounter,
}

impl FuncPatch {
    /// Wraps a function override and its parameter nodes.
    #[must_use]
    pub fn new(config: FuncOverride, params: PatchMap<ParamPatch>) -> Self {
        Self {
            config: Some(config),
            params: Some(params),
            apply_count: ApplyCounter::new(),
        }
    }

    const fn absent() -> Self {
        Self {
            config: None,
            params: None,
            apply_count: ApplyCounter::new(),
        }
    }

    /// The override record; the empty default for the sentinel.
    #[must_use]
    pub fn config(&self) -> &FuncOverride {
        self.config.as_ref().unwrap_or(&EMPTY_FUNC_CONFIG)
    }

    /// Returns `true` if no override was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
    }

    /// Parameter overrides, or the shared empty map.
    #[must_use]
    pub fn params(&self) -> &PatchMap<ParamPatch> {
        self.params.as_ref().unwrap_or(&EMPTY_PARAM_MAP)
    }

    /// Looks up a parameter override, falling back to [`ParamPatch::empty`].
    #[must_use]
    pub fn param(&self, name: &str) -> &ParamPatch {
        self.params().get_or(name, ParamPatch::empty())
    }
}

impl_patch!(FuncPatch, "Function");

/// Node overriding a type.
///
/// A plain type owns field and nested type overrides. A type built from an interface
/// override owns method overrides instead and is reached through
/// [`TypePatch::as_com_patch`].
#[derive(Debug)]
pub struct TypePatch {
    config: Option<TypeOverride>,
    fields: Option<PatchMap<FieldPatch>>,
    nested_types: Option<PatchMap<TypePatch>>,
    methods: Option<PatchMap<FuncPatch>>,
    apply_count: ApplyCounter,
}

impl TypePatch {
    /// Wraps a plain type override.
    ///
    /// `None` maps are served as the shared empty maps.
    #[must_use]
    pub fn new(
        config: TypeOverride,
        fields: Option<PatchMap<FieldPatch>>,
        nested_types: Option<PatchMap<TypePatch>>,
    ) -> Self {
        Self {
            config: Some(config),
            fields,
            nested_types,
            methods: None,
            apply_count: ApplyCounter::new(),
        }
    }

    /// Wraps a COM interface override and its method nodes.
    #[must_use]
    pub fn new_com(config: TypeOverride, methods: PatchMap<FuncPatch>) -> Self {
        Self {
            config: Some(config),
            fields: None,
            nested_types: None,
            methods: Some(methods),
            apply_count: ApplyCounter::new(),
        }
    }

    const fn absent() -> Self {
        Self {
            config: None,
            fields: None,
            nested_types: None,
            methods: None,
            apply_count: ApplyCounter::new(),
        }
    }

    /// The override record; the empty default for the sentinel.
    #[must_use]
    pub fn config(&self) -> &TypeOverride {
        self.config.as_ref().unwrap_or(&EMPTY_TYPE_CONFIG)
    }

    /// Returns `true` if no override was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.config.is_none()
    }

    /// Returns `true` if this node was built from an interface override.
    #[must_use]
    pub fn is_com(&self) -> bool {
        self.methods.is_some()
    }

    /// Field overrides, or the shared empty map.
    #[must_use]
    pub fn fields(&self) -> &PatchMap<FieldPatch> {
        self.fields.as_ref().unwrap_or(&EMPTY_FIELD_MAP)
    }

    /// Nested type overrides, or the shared empty map.
    #[must_use]
    pub fn nested_types(&self) -> &PatchMap<TypePatch> {
        self.nested_types.as_ref().unwrap_or(&EMPTY_TYPE_MAP)
    }

    /// Looks up a field override, falling back to [`FieldPatch::empty`].
    #[must_use]
    pub fn field(&self, name: &str) -> &FieldPatch {
        self.fields().get_or(name, FieldPatch::empty())
    }

    /// Looks up a nested type override, falling back to [`TypePatch::empty`].
    #[must_use]
    pub fn nested_type(&self, name: &str) -> &TypePatch {
        self.nested_types().get_or(name, TypePatch::empty())
    }

    pub(crate) fn methods(&self) -> &PatchMap<FuncPatch> {
        self.methods.as_ref().unwrap_or(&EMPTY_FUNC_MAP)
    }

    /// Returns `true` if the type should be dropped from the output, counting the
    /// application.
    pub fn apply_remove(&self) -> bool {
        if self.config().remove {
            self.mark_applied();
            return true;
        }
        false
    }

    /// Widens this node to its COM interface form.
    ///
    /// Nodes without an override (the plain and the COM sentinel) widen to
    /// [`ComTypePatch::empty`], and a node built from an interface override widens to a
    /// view over itself. Widening is idempotent.
    ///
    /// # Errors
    /// Returns [`Error::ComTypeMismatch`] for any other node: a plain type override was
    /// declared for an entity the generator has classified as an interface.
    pub fn as_com_patch(&self) -> Result<ComTypePatch<'_>> {
        if self.is_empty() {
            return Ok(ComTypePatch::empty());
        }

        if self.is_com() {
            return Ok(ComTypePatch { inner: self });
        }

        let config = self.config();
        Err(Error::ComTypeMismatch {
            api: config.api.clone(),
            name: config.name.clone(),
        })
    }
}

impl_patch!(TypePatch, "Type");

/// A [`TypePatch`] known to describe a COM interface.
///
/// Interfaces expose methods rather than fields, so this view adds access to method
/// overrides through [`crate::FuncPatchMap`]. Field and nested type access is inherited
/// through `Deref`, and is always empty.
#[derive(Debug, Clone, Copy)]
pub struct ComTypePatch<'a> {
    inner: &'a TypePatch,
}

impl ComTypePatch<'static> {
    /// The shared empty COM sentinel.
    #[must_use]
    pub fn empty() -> Self {
        ComTypePatch {
            inner: &EMPTY_COM_TYPE,
        }
    }
}

impl<'a> ComTypePatch<'a> {
    /// Returns `true` if this is the shared empty COM sentinel.
    #[must_use]
    pub fn is_empty_sentinel(&self) -> bool {
        std::ptr::eq(self.inner, &EMPTY_COM_TYPE)
    }

    /// The underlying type node.
    #[must_use]
    pub fn as_type_patch(&self) -> &'a TypePatch {
        self.inner
    }

    /// Method overrides, or the shared empty map.
    #[must_use]
    pub fn methods(&self) -> &'a PatchMap<FuncPatch> {
        self.inner.methods()
    }

    /// Looks up a method override, falling back to [`FuncPatch::empty`].
    #[must_use]
    pub fn method(&self, name: &str) -> &'a FuncPatch {
        self.inner.methods().get_or(name, FuncPatch::empty())
    }
}

impl Deref for ComTypePatch<'_> {
    type Target = TypePatch;

    fn deref(&self) -> &Self::Target {
        self.inner
    }
}

/// Root node of one API module, owning its type and function overrides.
#[derive(Debug)]
pub struct ApiPatch {
    name: String,
    types: Option<PatchMap<TypePatch>>,
    funcs: Option<PatchMap<FuncPatch>>,
    apply_count: ApplyCounter,
}

impl ApiPatch {
    /// Creates an API node without overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Some(PatchMap::new()),
            funcs: Some(PatchMap::new()),
            apply_count: ApplyCounter::new(),
        }
    }

    const fn absent() -> Self {
        Self {
            name: String::new(),
            types: None,
            funcs: None,
            apply_count: ApplyCounter::new(),
        }
    }

    /// Type overrides, or the shared empty map.
    #[must_use]
    pub fn types(&self) -> &PatchMap<TypePatch> {
        self.types.as_ref().unwrap_or(&EMPTY_TYPE_MAP)
    }

    /// Function overrides, or the shared empty map.
    #[must_use]
    pub fn funcs(&self) -> &PatchMap<FuncPatch> {
        self.funcs.as_ref().unwrap_or(&EMPTY_FUNC_MAP)
    }

    /// Returns `true` if the module declares no overrides at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types().is_empty() && self.funcs().is_empty()
    }

    pub(crate) fn types_mut(&mut self) -> &mut PatchMap<TypePatch> {
        self.types.get_or_insert_with(PatchMap::new)
    }

    pub(crate) fn funcs_mut(&mut self) -> &mut PatchMap<FuncPatch> {
        self.funcs.get_or_insert_with(PatchMap::new)
    }
}

impl Patch for ApiPatch {
    fn counter(&self) -> &ApplyCounter {
        &self.apply_count
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mark_applied(&self) {
        if !self.is_empty_sentinel() {
            self.apply_count.increment();
        }
    }
}

impl std::fmt::Display for ApiPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Api '{}'", self.name)
    }
}
