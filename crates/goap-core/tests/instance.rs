use std::sync::Arc;

use goap_core::{
    ActionCx, ActionInstance, ActionKind, ActionTemplate, AgentEnv, AgentId, Behavior, Blackboard,
    EntityId, TickContext, WorldState,
};

/// Host is just a call log.
type Log = Vec<String>;

struct Gate {
    open: bool,
}

impl Behavior<Log> for Gate {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, Log>) -> bool {
        cx.host.push(format!("pre running={}", cx.run.running));
        self.open
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, Log>) -> bool {
        cx.host.push(format!("post running={}", cx.run.running));
        true
    }

    fn is_complete(&mut self, _cx: &mut ActionCx<'_, Log>) -> bool {
        true
    }
}

fn instance(open: bool) -> ActionInstance<Log> {
    let template = ActionTemplate::new("gate", ActionKind::UseObject).with_effect("through", 1);
    ActionInstance::new(Arc::new(template), Box::new(Gate { open }))
}

#[test]
fn lifecycle_drives_running_flag() {
    let tick = TickContext::new(0, 0.1, 1);
    let mut world = WorldState::new();
    let mut blackboard = Blackboard::new();
    let mut log = Log::new();
    let mut action = instance(true);

    let mut env = AgentEnv {
        tick: &tick,
        agent: AgentId(1),
        world: &mut world,
        blackboard: &mut blackboard,
        host: &mut log,
    };
    assert!(action.pre_action(&mut env));
    assert!(action.is_running());
    assert!(action.is_complete(&mut env));
    assert!(action.post_action(&mut env));
    assert!(!action.is_running());

    assert_eq!(log, vec!["pre running=true", "post running=false"]);
}

#[test]
fn refused_start_leaves_instance_idle() {
    let tick = TickContext::new(0, 0.1, 1);
    let mut world = WorldState::new();
    let mut blackboard = Blackboard::new();
    let mut log = Log::new();
    let mut action = instance(false);
    action.set_target(Some(EntityId(4)));

    let mut env = AgentEnv {
        tick: &tick,
        agent: AgentId(1),
        world: &mut world,
        blackboard: &mut blackboard,
        host: &mut log,
    };
    assert!(!action.pre_action(&mut env));
    assert!(!action.is_running());
    assert_eq!(action.target(), Some(EntityId(4)));
    assert_eq!(action.name(), "gate");
}
