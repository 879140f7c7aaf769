//! Compiles the flat [`PatchTable`] into the nested [`PatchTree`].
//!
//! Records are processed in declaration order, functions first, then types. Module roots
//! ([`ApiPatch`]) are created on first reference. Within each parent, names must be
//! unique; a duplicate is an authoring error and fails the whole build, as do empty
//! names and interface overrides that also declare fields or nested types.

use tracing::debug;

use crate::{
    patch::{
        ApiPatch, FieldPatch, FuncOverride, FuncPatch, ParamPatch, PatchMap, PatchRef,
        PatchTable, Traverse, TypeOverride, TypePatch,
    },
    Result,
};

/// The compiled patch tree: one [`ApiPatch`] per module named in the table.
#[derive(Debug, Default)]
pub struct PatchTree {
    apis: PatchMap<ApiPatch>,
    node_count: usize,
}

impl PatchTree {
    /// Returns the module's patch root, or [`ApiPatch::empty`] if it has no overrides.
    #[must_use]
    pub fn api(&self, name: &str) -> &ApiPatch {
        self.apis.get_or(name, ApiPatch::empty())
    }

    /// All module roots, in order of first reference.
    #[must_use]
    pub fn apis(&self) -> &PatchMap<ApiPatch> {
        &self.apis
    }

    /// Number of patch nodes below the module roots.
    ///
    /// A full [`crate::traverse`] of the tree visits exactly this many nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns `true` if the tree holds no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }
}

impl Traverse for PatchTree {
    fn walk<'a>(
        &'a self,
        path: &mut Vec<&'a str>,
        visitor: &mut dyn FnMut(&[&'a str], PatchRef<'a>),
    ) {
        for (name, api) in self.apis.iter() {
            path.push(name);
            api.walk(path, visitor);
            path.pop();
        }
    }

    fn path_segment(&self) -> &str {
        ""
    }
}

/// Builds the patch tree for `table`.
///
/// # Errors
/// Returns [`crate::Error::DuplicatePatch`] if a name repeats within one parent, and
/// [`crate::Error::Malformed`] for empty names or interface overrides that also declare
/// fields or nested types.
///
/// # Examples
///
/// ```rust
/// use metapatch::prelude::*;
///
/// let table = PatchTable::new()
///     .with_type(TypeOverride::new("WindowsAccessibility", "IUIAutomation6").remove());
/// let tree = build_patch_tree(&table)?;
///
/// let api = tree.api("WindowsAccessibility");
/// assert!(api.type_patch("IUIAutomation6").config().remove);
/// assert!(api.type_patch("IUIAutomation5").is_empty_sentinel());
/// assert!(tree.api("Gdi").is_empty_sentinel());
/// # Ok::<(), metapatch::Error>(())
/// ```
pub fn build_patch_tree(table: &PatchTable) -> Result<PatchTree> {
    let mut builder = TreeBuilder::default();

    for func in table.funcs() {
        require_name(&func.api, "function module")?;
        let patch = builder.func_patch(&func.api, func)?;
        builder
            .api(&func.api)
            .funcs_mut()
            .insert(&func.api, func.name.as_str(), patch)?;
    }

    for ty in table.types() {
        require_name(&ty.api, "type module")?;
        let patch = builder.type_patch(&ty.api, ty)?;
        builder
            .api(&ty.api)
            .types_mut()
            .insert(&ty.api, ty.name.as_str(), patch)?;
    }

    debug!(
        modules = builder.apis.len(),
        nodes = builder.node_count,
        "built patch tree"
    );

    Ok(PatchTree {
        apis: builder.apis,
        node_count: builder.node_count,
    })
}

fn require_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(malformed_error!("Empty {} name in patch table", what));
    }
    Ok(())
}

#[derive(Default)]
struct TreeBuilder {
    apis: PatchMap<ApiPatch>,
    node_count: usize,
}

impl TreeBuilder {
    fn api(&mut self, name: &str) -> &mut ApiPatch {
        self.apis.get_or_insert_with(name, || ApiPatch::new(name))
    }

    fn func_patch(&mut self, scope: &str, func: &FuncOverride) -> Result<FuncPatch> {
        require_name(&func.name, "function")?;
        let qualified = format!("{}.{}", scope, func.name);

        let mut params = PatchMap::new();
        for param in &func.params {
            require_name(&param.name, "parameter")?;
            params.insert(&qualified, param.name.as_str(), ParamPatch::new(param.clone()))?;
            self.node_count += 1;
        }

        self.node_count += 1;
        Ok(FuncPatch::new(func.clone(), params))
    }

    fn type_patch(&mut self, scope: &str, ty: &TypeOverride) -> Result<TypePatch> {
        require_name(&ty.name, "type")?;
        let qualified = format!("{}.{}", scope, ty.name);

        if let Some(methods) = &ty.methods {
            if ty.fields.is_some() || ty.nested_types.is_some() {
                return Err(malformed_error!(
                    "Interface override '{}' declares fields or nested types",
                    qualified
                ));
            }

            let mut method_map = PatchMap::new();
            for method in methods {
                let patch = self.func_patch(&qualified, method)?;
                method_map.insert(&qualified, method.name.as_str(), patch)?;
            }

            self.node_count += 1;
            return Ok(TypePatch::new_com(ty.clone(), method_map));
        }

        let fields = match &ty.fields {
            Some(fields) => {
                let mut field_map = PatchMap::new();
                for field in fields {
                    require_name(&field.name, "field")?;
                    field_map.insert(
                        &qualified,
                        field.name.as_str(),
                        FieldPatch::new(field.clone()),
                    )?;
                    self.node_count += 1;
                }
                Some(field_map)
            }
            None => None,
        };

        let nested_types = match &ty.nested_types {
            Some(nested_types) => {
                let mut nested_map = PatchMap::new();
                for nested in nested_types {
                    let patch = self.type_patch(&qualified, nested)?;
                    nested_map.insert(&qualified, nested.name.as_str(), patch)?;
                }
                Some(nested_map)
            }
            None => None,
        };

        self.node_count += 1;
        Ok(TypePatch::new(ty.clone(), fields, nested_types))
    }
}
