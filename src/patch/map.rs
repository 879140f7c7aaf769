//! Name-keyed, insertion-ordered child maps of the patch tree.
//!
//! [`PatchMap`] keeps entries in a `Vec` so iteration follows declaration order, with a
//! `BTreeMap` index for name lookup. Both containers have `const` constructors, which
//! makes the empty map usable in `static` sentinels without any lazy initialisation.
//!
//! [`lookup`] is the uniform "get with default" policy every call site uses: a missing
//! map or a missing key both yield the supplied default, never an `Option`.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Insertion-ordered map from override name to patch node.
#[derive(Debug)]
pub struct PatchMap<V> {
    entries: Vec<(String, V)>,
    index: BTreeMap<String, usize>,
}

impl<V> PatchMap<V> {
    /// Creates an empty map without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Inserts `value` under `name`, refusing to overwrite an existing entry.
    ///
    /// # Arguments
    /// * `scope` - Qualified name of the owning node, used in the error message
    /// * `name` - Key of the new entry
    /// * `value` - Patch node to store
    ///
    /// # Errors
    /// Returns [`Error::DuplicatePatch`] if `name` is already present.
    pub fn insert(&mut self, scope: &str, name: impl Into<String>, value: V) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(Error::DuplicatePatch {
                scope: scope.to_string(),
                name,
            });
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        Ok(())
    }

    /// Returns the entry for `name`, inserting the result of `init` first if absent.
    pub fn get_or_insert_with(&mut self, name: &str, init: impl FnOnce() -> V) -> &mut V {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(name.to_string(), slot);
                self.entries.push((name.to_string(), init()));
                slot
            }
        };

        &mut self.entries[slot].1
    }

    /// Returns the entry for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    /// Returns the entry for `name`, or `default` if absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a V) -> &'a V {
        self.get(name).unwrap_or(default)
    }

    /// Returns `true` if an entry named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, node)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates names in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates nodes in insertion order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<V> Default for PatchMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Looks `name` up in an optional map, falling back to `default`.
///
/// This is the one lookup policy of the patch layer: if the map is present and contains
/// the key its value is returned, otherwise `default` (usually the empty sentinel of the
/// node kind, e.g. [`crate::TypePatch::empty`]). Callers can then apply the result
/// unconditionally.
///
/// # Examples
///
/// ```rust
/// use metapatch::{lookup, PatchMap, TypePatch};
///
/// let none: Option<&PatchMap<TypePatch>> = None;
/// let found = lookup(none, "IUnknown", TypePatch::empty());
/// assert!(found.is_empty_sentinel());
/// ```
#[must_use]
pub fn lookup<'a, V>(map: Option<&'a PatchMap<V>>, name: &str, default: &'a V) -> &'a V {
    match map.and_then(|map| map.get(name)) {
        Some(value) => value,
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = PatchMap::new();
        map.insert("Api", "b", 2).unwrap();
        map.insert("Api", "a", 1).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map.get("c"), None);
        assert!(map.contains("a"));
        assert!(!map.is_empty());
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut map = PatchMap::new();
        for name in ["zeta", "alpha", "mid"] {
            map.insert("Api", name, name.len()).unwrap();
        }

        assert_eq!(map.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [4, 5, 3]);
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let mut map = PatchMap::new();
        map.insert("Foo", "Bar", ()).unwrap();

        let err = map.insert("Foo", "Bar", ()).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicatePatch {
                scope: "Foo".into(),
                name: "Bar".into()
            }
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_get_or_insert_with_reuses_entry() {
        let mut map: PatchMap<Vec<u32>> = PatchMap::new();
        map.get_or_insert_with("x", Vec::new).push(1);
        map.get_or_insert_with("x", || unreachable!()).push(2);
        map.get_or_insert_with("y", Vec::new).push(3);

        assert_eq!(map.get("x"), Some(&vec![1, 2]));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["x", "y"]);
    }

    #[test]
    fn test_lookup_defaults() {
        let fallback = 0;
        let mut map = PatchMap::new();
        map.insert("Api", "hit", 7).unwrap();

        assert_eq!(*lookup(Some(&map), "hit", &fallback), 7);
        assert!(std::ptr::eq(lookup(Some(&map), "miss", &fallback), &fallback));
        assert!(std::ptr::eq(lookup(None, "hit", &fallback), &fallback));
        assert!(std::ptr::eq(map.get_or("miss", &fallback), &fallback));
    }
}
