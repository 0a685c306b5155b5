use std::path::Path;

use goap_agent::AgentStep;
use goap_core::AgentId;
use goap_sim::{ConfigError, ScenarioConfig, Simulation, Vec2};

fn guard_scenario() -> ScenarioConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/guard.yaml");
    ScenarioConfig::load(&path).unwrap()
}

#[test]
fn guard_drops_patrol_to_raise_alarm() {
    let mut sim = Simulation::from_config(&guard_scenario()).unwrap();

    sim.run(Some(30));
    let guard = &sim.agent("guard").unwrap().agent;
    assert_eq!(guard.current_goal_name(), Some("patrol"));
    assert_eq!(guard.current_action().map(|a| a.name()), Some("patrol"));

    let report = sim.tick();
    assert_eq!(report.tick, 30);
    assert_eq!(report.events_applied, 1);
    assert_eq!(report.steps[0], (AgentId(1), AgentStep::ActionStarted));

    let guard = &sim.agent("guard").unwrap().agent;
    assert_eq!(guard.current_goal_name(), Some("respondToPlayer"));
    assert_eq!(guard.current_action().map(|a| a.name()), Some("go_to_alarm"));
    let trace = sim.trace("guard").unwrap();
    assert_eq!(trace.count("goap.action.preempt"), 1);

    sim.run(Some(120));

    assert_eq!(sim.world().get("respondToPlayer"), Some(1));
    assert_eq!(sim.entities().by_name("alarm").unwrap().uses, 1);

    let guard = &sim.agent("guard").unwrap().agent;
    assert!(guard.goals().iter().all(|g| g.name != "respondToPlayer"));
    assert_eq!(guard.current_goal_name(), Some("patrol"));
    assert_eq!(sim.trace("guard").unwrap().count("goap.goal.removed"), 1);
}

#[test]
fn villager_greets_once_then_rests_on_the_bench() {
    let mut sim = Simulation::from_config(&guard_scenario()).unwrap();
    sim.run(Some(60));

    let villager = sim.agent("villager").unwrap();
    assert!(villager.agent.goals().iter().all(|g| g.name != "greet"));
    assert_eq!(villager.agent.current_goal_name(), Some("rest"));
    assert_eq!(villager.body.position(), Vec2::new(8.0, -2.0));

    let trace = sim.trace("villager").unwrap();
    let started: Vec<&str> = trace
        .with_tag("goap.action.start")
        .filter_map(|e| e.label.as_deref())
        .collect();
    assert_eq!(&started[..3], ["wave", "go_to_bench", "idle"]);
}

#[test]
fn runs_are_reproducible() {
    let config = guard_scenario();
    let mut first = Simulation::from_config(&config).unwrap();
    let mut second = Simulation::from_config(&config).unwrap();

    assert_eq!(first.run(Some(200)), second.run(Some(200)));
    for (a, b) in first.agents().iter().zip(second.agents()) {
        assert_eq!(a.body.position(), b.body.position());
        assert_eq!(a.body.heading_degrees(), b.body.heading_degrees());
    }
    assert_eq!(first.trace("villager"), second.trace("villager"));
}

#[test]
fn run_without_limit_stops_at_max_ticks() {
    let mut config = guard_scenario();
    config.sim.max_ticks = 12;
    let mut sim = Simulation::from_config(&config).unwrap();

    let reports = sim.run(None);
    assert_eq!(reports.len(), 12);
    assert_eq!(sim.tick_index(), 12);
    assert!(sim.run(None).is_empty());
}

const EVENTS: &str = r#"
world: { ammo: 2, door: 1 }
entities:
  - { name: lamp, tag: light, position: [1.0, 0.0] }
events:
  - { at_tick: 1, op: add, key: door, value: 9 }
  - { at_tick: 1, op: modify, key: ammo, delta: -2 }
  - { at_tick: 2, op: disable, entity: lamp }
  - { at_tick: 2, op: set, key: alarm, value: 3 }
  - { at_tick: 4, op: remove, key: alarm }
"#;

#[test]
fn events_apply_on_their_tick() {
    let config = ScenarioConfig::from_yaml_str(EVENTS).unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();

    assert_eq!(sim.tick().events_applied, 0);

    assert_eq!(sim.tick().events_applied, 2);
    assert_eq!(sim.world().get("door"), Some(1));
    assert!(!sim.world().has("ammo"));

    assert_eq!(sim.tick().events_applied, 2);
    assert!(!sim.entities().by_name("lamp").unwrap().active);
    assert_eq!(sim.world().get("alarm"), Some(3));

    sim.tick();
    sim.tick();
    assert!(!sim.world().has("alarm"));
}

#[test]
fn external_world_changes_reach_agents() {
    let mut sim = Simulation::from_config(&guard_scenario()).unwrap();
    sim.run(Some(5));

    sim.world_mut().set("seePlayer", 1);
    sim.tick();

    let guard = &sim.agent("guard").unwrap().agent;
    assert_eq!(guard.current_goal_name(), Some("respondToPlayer"));
}

#[test]
fn build_fails_on_invalid_config() {
    let mut config = guard_scenario();
    config.agents[0].goal_set = "missing".to_string();

    let err = Simulation::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownGoalSet { .. }));
}
