mod common;

use common::{ctx, scripted, template, Recorder, Scripted};
use goap_agent::{Agent, AgentConfig, AgentStep};
use goap_core::{AgentId, Goal, WorldState};
use goap_tools::{TraceLog, TRACE_LOG};

/// Guard with a standing patrol goal and a reactive "respond to the player" goal that is only
/// plannable once `seePlayer` holds.
fn guard() -> Agent<Recorder> {
    let actions = vec![
        scripted(
            template("walk_route").with_effect("patrol", 1),
            Scripted::never_completes(),
        ),
        scripted(
            template("chase_player")
                .with_precondition("seePlayer", 1)
                .with_effect("respondToPlayer", 1),
            Scripted::never_completes(),
        ),
    ];
    let mut agent = Agent::new(AgentId(1), "guard", actions);
    agent.add_goal(Goal::persistent("patrol", 1)).unwrap();
    agent.add_goal(Goal::once("respondToPlayer", 10)).unwrap();
    agent.blackboard.set(TRACE_LOG, TraceLog::default());
    agent
}

#[test]
fn plans_for_best_plannable_goal_then_starts_it() {
    let mut agent = guard();
    let mut world = WorldState::new();
    let mut host = Recorder::default();

    assert_eq!(agent.tick(&ctx(0), &mut world, &mut host), AgentStep::Planned);
    assert_eq!(agent.current_goal_name(), Some("patrol"));
    assert_eq!(agent.queued_actions(), Some(vec!["walk_route"]));

    assert_eq!(agent.tick(&ctx(1), &mut world, &mut host), AgentStep::ActionStarted);
    assert!(agent.current_action().unwrap().is_running());

    assert_eq!(agent.tick(&ctx(2), &mut world, &mut host), AgentStep::Executing);
    assert_eq!(host.log, vec!["pre:walk_route", "during:walk_route"]);
}

#[test]
fn new_fact_preempts_standing_goal() {
    let mut agent = guard();
    let mut world = WorldState::new();
    let mut host = Recorder::default();

    for tick in 0..3 {
        agent.tick(&ctx(tick), &mut world, &mut host);
    }
    assert_eq!(agent.current_goal_name(), Some("patrol"));
    assert_eq!(host.posts_of("walk_route"), 0);

    world.set("seePlayer", 1);

    // Validation switches goals, then the same tick starts the new plan.
    assert_eq!(agent.tick(&ctx(3), &mut world, &mut host), AgentStep::ActionStarted);
    assert_eq!(agent.current_goal_name(), Some("respondToPlayer"));
    assert_eq!(agent.current_action().map(|a| a.name()), Some("chase_player"));
    assert_eq!(host.posts_of("walk_route"), 1);
    assert!(!agent.actions()[0].is_running());

    for tick in 4..10 {
        assert_eq!(agent.tick(&ctx(tick), &mut world, &mut host), AgentStep::Executing);
    }
    assert_eq!(host.posts_of("walk_route"), 1);

    let log = agent.blackboard.get(TRACE_LOG).unwrap();
    assert_eq!(log.count("goap.action.preempt"), 1);
    assert_eq!(log.count("goap.goal.switch"), 1);
}

#[test]
fn assert_fact_validates_immediately() {
    let mut agent = guard();
    let mut world = WorldState::new();
    let mut host = Recorder::default();

    for tick in 0..2 {
        agent.tick(&ctx(tick), &mut world, &mut host);
    }
    assert!(agent.assert_fact(&ctx(2), &mut world, &mut host, "seePlayer", 1));
    assert_eq!(agent.current_goal_name(), Some("respondToPlayer"));
    assert_eq!(host.posts_of("walk_route"), 1);

    // The revision was already consumed; the next tick must not validate (or preempt) again.
    assert_eq!(agent.tick(&ctx(3), &mut world, &mut host), AgentStep::ActionStarted);
    assert_eq!(host.posts_of("walk_route"), 1);
}

#[test]
fn unrelated_world_change_keeps_current_action() {
    let mut agent = guard();
    let mut world = WorldState::new();
    let mut host = Recorder::default();

    for tick in 0..3 {
        agent.tick(&ctx(tick), &mut world, &mut host);
    }
    world.set("raining", 1);

    assert_eq!(agent.tick(&ctx(3), &mut world, &mut host), AgentStep::Executing);
    assert_eq!(agent.current_goal_name(), Some("patrol"));
    assert_eq!(host.posts_of("walk_route"), 0);
}

#[test]
fn validation_can_be_disabled() {
    let mut agent = guard().with_config(AgentConfig {
        validate_on_world_change: false,
        ..AgentConfig::default()
    });
    let mut world = WorldState::new();
    let mut host = Recorder::default();

    for tick in 0..3 {
        agent.tick(&ctx(tick), &mut world, &mut host);
    }
    world.set("seePlayer", 1);
    assert_eq!(agent.tick(&ctx(3), &mut world, &mut host), AgentStep::Executing);
    assert_eq!(agent.current_goal_name(), Some("patrol"));

    assert!(agent.validate(&ctx(4), &mut world, &mut host));
    assert_eq!(agent.current_goal_name(), Some("respondToPlayer"));
    assert_eq!(host.posts_of("walk_route"), 1);
}

#[test]
fn start_failure_discards_plan_and_replans() {
    let actions = vec![
        scripted(template("open_door").with_effect("doorOpen", 1), Scripted::refuses_to_start()),
        scripted(
            template("walk_through")
                .with_precondition("doorOpen", 1)
                .with_effect("inRoomB", 1),
            Scripted::never_completes(),
        ),
    ];
    let mut agent = Agent::new(AgentId(2), "visitor", actions);
    agent.add_goal(Goal::persistent("inRoomB", 3)).unwrap();

    let mut world = WorldState::new();
    let mut host = Recorder::default();

    assert_eq!(agent.tick(&ctx(0), &mut world, &mut host), AgentStep::Planned);
    assert_eq!(agent.queued_actions(), Some(vec!["open_door", "walk_through"]));

    assert_eq!(agent.tick(&ctx(1), &mut world, &mut host), AgentStep::StartFailed);
    assert!(!agent.has_plan());
    assert!(agent.is_idle());
    assert!(!agent.actions()[0].is_running());

    // The rest of the plan was not attempted; the next tick plans again.
    assert_eq!(agent.tick(&ctx(2), &mut world, &mut host), AgentStep::Planned);
    assert_eq!(host.log, vec!["pre:open_door"]);
}

#[test]
fn completion_waits_for_duration() {
    let actions = vec![scripted(
        template("search").with_effect("searched", 1).with_duration(0.5),
        Scripted::new(0),
    )];
    let mut agent = Agent::new(AgentId(3), "searcher", actions);
    agent.add_goal(Goal::once("searched", 1)).unwrap();

    let mut world = WorldState::new();
    let mut host = Recorder::default();

    let steps: Vec<AgentStep> = (0..5)
        .map(|tick| agent.tick(&ctx(tick), &mut world, &mut host))
        .collect();

    // dt is 0.25s, so the 0.5s completion delay spans two further ticks.
    assert_eq!(
        steps,
        vec![
            AgentStep::Planned,
            AgentStep::ActionStarted,
            AgentStep::CompletionPending,
            AgentStep::CompletionPending,
            AgentStep::ActionCompleted,
        ]
    );
    assert_eq!(host.posts_of("search"), 1);
    assert!(!agent.actions()[0].is_running());
}

#[test]
fn committed_effects_land_in_world_on_completion_only() {
    let actions = vec![
        scripted(
            template("raise_alarm")
                .with_effect("alarmRaised", 1)
                .committing_effects(),
            Scripted::new(0),
        ),
        scripted(
            template("hold_position")
                .with_effect("holding", 1)
                .committing_effects(),
            Scripted::never_completes(),
        ),
    ];
    let mut agent = Agent::new(AgentId(4), "sentry", actions);
    agent.add_goal(Goal::once("alarmRaised", 5)).unwrap();
    agent.add_goal(Goal::persistent("holding", 1)).unwrap();

    let mut world = WorldState::new();
    let mut host = Recorder::default();

    agent.tick(&ctx(0), &mut world, &mut host);
    agent.tick(&ctx(1), &mut world, &mut host);
    assert_eq!(agent.tick(&ctx(2), &mut world, &mut host), AgentStep::ActionCompleted);
    assert_eq!(world.get("alarmRaised"), Some(1));

    // The non-persistent goal retires and the standing goal takes over.
    assert_eq!(agent.tick(&ctx(3), &mut world, &mut host), AgentStep::PlanCompleted);
    assert_eq!(agent.current_goal_name(), Some("holding"));
    assert_eq!(agent.tick(&ctx(4), &mut world, &mut host), AgentStep::ActionStarted);

    // Preempting `hold_position` must not commit its effect.
    agent.add_goal(Goal::once("investigate", 9)).unwrap();
    world.set("investigate", 1);
    agent.tick(&ctx(5), &mut world, &mut host);
    assert_eq!(host.posts_of("hold_position"), 1);
    assert!(!world.has("holding"));
}

#[test]
fn idles_until_world_makes_a_goal_plannable() {
    let actions = vec![scripted(
        template("chase_player")
            .with_precondition("seePlayer", 1)
            .with_effect("respondToPlayer", 1),
        Scripted::never_completes(),
    )];
    let mut agent = Agent::new(AgentId(5), "hunter", actions);
    agent.add_goal(Goal::once("respondToPlayer", 10)).unwrap();

    let mut world = WorldState::new();
    let mut host = Recorder::default();

    assert_eq!(agent.tick(&ctx(0), &mut world, &mut host), AgentStep::NoPlan);
    assert_eq!(agent.tick(&ctx(1), &mut world, &mut host), AgentStep::NoPlan);
    assert!(agent.is_idle());
    assert_eq!(agent.current_goal_name(), None);

    world.set("seePlayer", 1);
    assert_eq!(agent.tick(&ctx(2), &mut world, &mut host), AgentStep::ActionStarted);
    assert_eq!(agent.current_goal_name(), Some("respondToPlayer"));
}
