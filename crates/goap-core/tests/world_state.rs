use goap_core::{facts, WorldState, WorldStateError};

#[test]
fn add_rejects_existing_fact() {
    let mut world = WorldState::new();
    world.add("inRoomB", 1).unwrap();

    assert_eq!(
        world.add("inRoomB", 5),
        Err(WorldStateError::FactExists("inRoomB".to_string()))
    );
    assert_eq!(world.get("inRoomB"), Some(1));
}

#[test]
fn set_upserts() {
    let mut world = WorldState::new();
    world.set("seePlayer", 0);
    world.set("seePlayer", 3);

    assert!(world.has("seePlayer"));
    assert_eq!(world.get("seePlayer"), Some(3));
    assert_eq!(world.len(), 1);
}

#[test]
fn modify_accumulates_and_removes_at_zero() {
    let mut world = WorldState::from_facts(facts([("ammo", 2)]));

    world.modify("ammo", 3);
    assert_eq!(world.get("ammo"), Some(5));

    world.modify("ammo", -5);
    assert!(!world.has("ammo"));

    // Absent keys are not created.
    world.modify("ammo", 4);
    assert!(!world.has("ammo"));
}

#[test]
fn remove_returns_previous_value() {
    let mut world = WorldState::from_facts(facts([("doorOpen", 1)]));
    assert_eq!(world.remove("doorOpen"), Some(1));
    assert_eq!(world.remove("doorOpen"), None);
    assert!(world.is_empty());
}

#[test]
fn revision_moves_only_on_effective_change() {
    let mut world = WorldState::new();
    let r0 = world.revision();

    world.set("a", 1);
    let r1 = world.revision();
    assert!(r1 > r0);

    world.set("a", 1);
    assert_eq!(world.revision(), r1);

    assert_eq!(world.remove("missing"), None);
    world.modify("missing", 1);
    assert_eq!(world.revision(), r1);

    let _ = world.add("a", 2);
    assert_eq!(world.revision(), r1);

    world.remove("a");
    assert!(world.revision() > r1);
}

#[test]
fn apply_effects_never_overwrites() {
    let mut world = WorldState::from_facts(facts([("a", 1)]));
    let inserted = world.apply_effects(&facts([("a", 99), ("b", 2)]));

    assert_eq!(inserted, 1);
    assert_eq!(world.facts(), &facts([("a", 1), ("b", 2)]));
}

#[test]
fn snapshot_is_detached() {
    let mut world = WorldState::from_facts(facts([("a", 1)]));
    let snapshot = world.snapshot();
    world.set("b", 1);

    assert_eq!(snapshot.len(), 1);
    assert_eq!(world.len(), 2);
}
