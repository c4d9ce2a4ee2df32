//! Shallow record diffing.
//!
//! Used by list item setters to decide which sub-parts of a DOM item need
//! updating when the item value changes.

use std::hash::Hash;

use indexmap::IndexMap;

/// Compare two records key by key and report, for every key of
/// `new_object`, whether it changed.
///
/// A key missing from `old_object` (or a missing `old_object` altogether)
/// counts as changed. When `custom_compare` is given it decides the changed
/// flag, receiving `(new, old)` and returning true for "changed".
pub fn get_diffs<K, V>(
    new_object: &IndexMap<K, V>,
    old_object: Option<&IndexMap<K, V>>,
    custom_compare: Option<&dyn Fn(&V, &V) -> bool>,
) -> IndexMap<K, bool>
where
    K: Clone + Hash + Eq,
    V: PartialEq,
{
    let mut result = IndexMap::with_capacity(new_object.len());

    for (key, value) in new_object {
        let changed = match old_object.and_then(|old| old.get(key)) {
            Some(old_value) => match custom_compare {
                Some(compare) => compare(value, old_value),
                None => value != old_value,
            },
            None => true,
        };
        result.insert(key.clone(), changed);
    }

    result
}
