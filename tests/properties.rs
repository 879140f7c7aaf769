//! Property tests for the build / lookup / traverse contracts.

use std::collections::BTreeSet;

use metapatch::prelude::*;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,11}"
}

fn unique_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(name(), 0..max).prop_map(|set| set.into_iter().collect())
}

fn field_overrides() -> impl Strategy<Value = Option<Vec<FieldOverride>>> {
    prop::option::of(unique_names(4).prop_flat_map(|names| {
        let count = names.len();
        (Just(names), prop::collection::vec(prop::option::of(name()), count)).prop_map(
            |(names, types)| {
                names
                    .into_iter()
                    .zip(types)
                    .map(|(name, ty)| FieldOverride {
                        name,
                        type_name: ty,
                    })
                    .collect()
            },
        )
    }))
}

fn type_override(api: String, name: String) -> impl Strategy<Value = TypeOverride> {
    (any::<bool>(), field_overrides(), unique_names(3)).prop_map(
        move |(remove, fields, nested)| TypeOverride {
            api: api.clone(),
            name: name.clone(),
            remove,
            fields,
            nested_types: if nested.is_empty() {
                None
            } else {
                Some(
                    nested
                        .into_iter()
                        .map(|n| TypeOverride::new(api.clone(), n))
                        .collect(),
                )
            },
            methods: None,
        },
    )
}

fn func_override(api: String, name: String) -> impl Strategy<Value = FuncOverride> {
    (unique_names(4), any::<bool>()).prop_map(move |(params, optional)| FuncOverride {
        api: api.clone(),
        name: name.clone(),
        params: params
            .into_iter()
            .map(|p| ParamOverride {
                name: p,
                optional,
                is_const: !optional,
            })
            .collect(),
    })
}

/// Tables with unique names at every level, spread over a few modules.
fn patch_table() -> impl Strategy<Value = PatchTable> {
    let apis = ["Gdi", "Com", "Kernel"];
    let types = prop::collection::btree_set((0..apis.len(), name()), 0..8).prop_flat_map(
        move |keys| {
            keys.into_iter()
                .map(|(api, name)| type_override(apis[api].to_string(), name))
                .collect::<Vec<_>>()
        },
    );
    let funcs = prop::collection::btree_set((0..apis.len(), name()), 0..6).prop_flat_map(
        move |keys| {
            keys.into_iter()
                .map(|(api, name)| func_override(apis[api].to_string(), name))
                .collect::<Vec<_>>()
        },
    );
    (funcs, types).prop_map(|(funcs, types)| PatchTable::from_parts(funcs, types))
}

proptest! {
    #[test]
    fn lookup_returns_declared_records(table in patch_table()) {
        let tree = build_patch_tree(&table).unwrap();

        for ty in table.types() {
            let patch = tree.api(&ty.api).type_patch(&ty.name);
            prop_assert_eq!(patch.config(), ty);
            for field in ty.fields.iter().flatten() {
                prop_assert_eq!(patch.field(&field.name).config(), field);
            }
            for nested in ty.nested_types.iter().flatten() {
                prop_assert_eq!(patch.nested_type(&nested.name).config(), nested);
            }
        }

        for func in table.funcs() {
            let patch = tree.api(&func.api).func_patch(&func.name);
            prop_assert_eq!(patch.config(), func);
            for param in &func.params {
                prop_assert_eq!(patch.param(&param.name).config(), param);
            }
        }
    }

    #[test]
    fn missing_names_return_sentinels(table in patch_table(), probe in name()) {
        let tree = build_patch_tree(&table).unwrap();
        let declared: BTreeSet<_> = table
            .types()
            .iter()
            .map(|t| (t.api.as_str(), t.name.as_str()))
            .collect();
        let declared_funcs: BTreeSet<_> = table
            .funcs()
            .iter()
            .map(|f| (f.api.as_str(), f.name.as_str()))
            .collect();

        for api in ["Gdi", "Com", "Kernel", "Unknown"] {
            let api_patch = tree.api(api);
            if !declared.contains(&(api, probe.as_str())) {
                prop_assert!(std::ptr::eq(api_patch.type_patch(&probe), TypePatch::empty()));
            }
            if !declared_funcs.contains(&(api, probe.as_str())) {
                prop_assert!(std::ptr::eq(api_patch.func_patch(&probe), FuncPatch::empty()));
            }
        }
        prop_assert!(tree.api("Unknown").is_empty_sentinel());
    }

    #[test]
    fn traversal_visits_every_node_once(table in patch_table()) {
        let tree = build_patch_tree(&table).unwrap();

        let mut seen = Vec::new();
        traverse(&tree, |patch| {
            seen.push(patch.as_patch() as *const dyn Patch as *const () as usize);
        });
        prop_assert_eq!(seen.len(), tree.node_count());

        let distinct: BTreeSet<_> = seen.iter().collect();
        prop_assert_eq!(distinct.len(), seen.len());
    }

    #[test]
    fn audit_flags_exactly_the_unapplied(table in patch_table(), mask in any::<u64>()) {
        let tree = build_patch_tree(&table).unwrap();

        let mut index = 0u32;
        let mut expected = 0;
        traverse(&tree, |patch| {
            if mask & (1 << (index % 64)) != 0 {
                patch.as_patch().mark_applied();
            } else {
                expected += 1;
            }
            index += 1;
        });

        let config = AuditConfig { policy: AuditPolicy::Ignore, include_funcs: true };
        let report = audit(&tree, &config).unwrap();
        prop_assert_eq!(report.visited(), tree.node_count());
        prop_assert_eq!(report.stale().len(), expected);
    }

    #[test]
    fn duplicate_type_fails(api in name(), ty in name()) {
        let table = PatchTable::new()
            .with_type(TypeOverride::new(api.clone(), ty.clone()))
            .with_type(TypeOverride::new(api.clone(), ty.clone()).remove());

        prop_assert_eq!(
            build_patch_tree(&table).unwrap_err(),
            Error::DuplicatePatch { scope: api, name: ty }
        );
    }
}
