use std::collections::BTreeMap;

/// A set of facts keyed by name.
///
/// Presence of a key means the condition holds. The stored integer is an auxiliary magnitude and
/// is never compared during planning. A `BTreeMap` keeps iteration order stable so plans and
/// traces are reproducible run to run.
pub type FactMap = BTreeMap<String, i32>;

/// Returns `true` when every key of `condition` is present in `state`.
///
/// Values are ignored on both sides.
pub fn satisfies(state: &FactMap, condition: &FactMap) -> bool {
    condition.keys().all(|key| state.contains_key(key))
}

/// Merge `effects` into `state`, inserting only keys that are not already present.
///
/// Existing facts keep their value, so facts only accumulate along a search branch.
/// Returns the number of keys inserted.
pub fn merge_effects(state: &mut FactMap, effects: &FactMap) -> usize {
    let mut inserted = 0;
    for (key, value) in effects {
        if !state.contains_key(key) {
            state.insert(key.clone(), *value);
            inserted += 1;
        }
    }
    inserted
}

/// Build a `FactMap` from `(key, value)` pairs.
///
/// Later duplicates overwrite earlier ones.
pub fn facts<K, I>(pairs: I) -> FactMap
where
    K: Into<String>,
    I: IntoIterator<Item = (K, i32)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
