use goap_core::{facts, merge_effects, satisfies, ActionKind, ActionTemplate, FactMap};
use proptest::prelude::*;

fn guarded() -> ActionTemplate {
    ActionTemplate::new("open_door", ActionKind::UseObject)
        .with_precondition("atDoor", 1)
        .with_precondition("hasKey", 1)
        .with_effect("doorOpen", 1)
}

#[test]
fn preconditions_check_presence_not_value() {
    let action = guarded();

    assert!(action.is_achievable_given(&facts([("atDoor", 1), ("hasKey", 1)])));
    // Values differ from the declared ones; only presence matters.
    assert!(action.is_achievable_given(&facts([("atDoor", 0), ("hasKey", 42)])));
    // Extra unrelated facts are fine.
    assert!(action.is_achievable_given(&facts([
        ("atDoor", 1),
        ("hasKey", 1),
        ("raining", 1),
    ])));
}

#[test]
fn missing_one_precondition_blocks() {
    let action = guarded();
    assert!(!action.is_achievable_given(&facts([("atDoor", 1)])));
    assert!(!action.is_achievable_given(&facts([("hasKey", 1), ("raining", 1)])));
}

#[test]
fn no_preconditions_always_achievable() {
    let action = ActionTemplate::new("wander", ActionKind::GoTo);
    assert!(action.is_achievable_given(&FactMap::new()));
}

#[test]
fn effect_merge_is_additive_only() {
    let mut state = facts([("a", 1)]);
    merge_effects(&mut state, &facts([("a", 99), ("b", 2)]));
    assert_eq!(state, facts([("a", 1), ("b", 2)]));
}

fn fact_map() -> impl Strategy<Value = FactMap> {
    prop::collection::btree_map("[a-e]", -3i32..3, 0..5)
}

proptest! {
    #[test]
    fn gating_matches_key_subset(pre in fact_map(), state in fact_map()) {
        let mut action = ActionTemplate::new("a", ActionKind::Animate);
        action.preconditions = pre.clone();

        let expected = pre.keys().all(|k| state.contains_key(k));
        prop_assert_eq!(action.is_achievable_given(&state), expected);
    }

    #[test]
    fn merge_keeps_existing_values(state in fact_map(), effects in fact_map()) {
        let mut merged = state.clone();
        merge_effects(&mut merged, &effects);

        for (k, v) in &state {
            prop_assert_eq!(merged.get(k), Some(v));
        }
        for (k, v) in &effects {
            if !state.contains_key(k) {
                prop_assert_eq!(merged.get(k), Some(v));
            }
        }
        prop_assert!(satisfies(&merged, &effects));
    }
}
