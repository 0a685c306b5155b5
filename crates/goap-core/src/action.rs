use std::fmt;
use std::sync::Arc;

use crate::fact::{satisfies, FactMap};
use crate::{AgentId, Blackboard, EntityId, TickContext, WorldState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Behavior class of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionKind {
    /// Moves the agent somewhere (go-to, patrol).
    GoTo,
    /// Plays an animation in place (idle, emotes).
    Animate,
    /// Interacts with an object in the world (buttons, doors).
    UseObject,
}

/// Immutable, shareable description of an action: what it needs, what it provides, what it costs.
///
/// Templates are authored once and shared between agents behind an `Arc`. Anything that changes
/// while an action runs lives on [`ActionInstance`] instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionTemplate {
    pub name: String,
    pub kind: ActionKind,
    #[cfg_attr(feature = "serde", serde(default = "default_cost"))]
    pub cost: f32,
    /// Seconds between completion being detected and `post_action` running.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub preconditions: FactMap,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: FactMap,
    /// Lookup key used by movement actions when no explicit target was assigned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_tag: Option<String>,
    /// Write `effects` into the world (no-overwrite merge) when the action completes normally.
    #[cfg_attr(feature = "serde", serde(default))]
    pub commit_effects: bool,
}

#[cfg(feature = "serde")]
fn default_cost() -> f32 {
    1.0
}

impl ActionTemplate {
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cost: 1.0,
            duration: 0.0,
            preconditions: FactMap::new(),
            effects: FactMap::new(),
            target_tag: None,
            commit_effects: false,
        }
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_precondition(mut self, key: impl Into<String>, value: i32) -> Self {
        self.preconditions.insert(key.into(), value);
        self
    }

    pub fn with_effect(mut self, key: impl Into<String>, value: i32) -> Self {
        self.effects.insert(key.into(), value);
        self
    }

    pub fn with_target_tag(mut self, tag: impl Into<String>) -> Self {
        self.target_tag = Some(tag.into());
        self
    }

    pub fn committing_effects(mut self) -> Self {
        self.commit_effects = true;
        self
    }

    /// `true` when every precondition key is present in `state`. Values are not compared.
    pub fn is_achievable_given(&self, state: &FactMap) -> bool {
        satisfies(state, &self.preconditions)
    }
}

/// Per-agent execution state of one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRun {
    pub running: bool,
    pub target: Option<EntityId>,
}

/// Everything an agent hands to its actions on a lifecycle call.
pub struct AgentEnv<'a, H> {
    pub tick: &'a TickContext,
    pub agent: AgentId,
    pub world: &'a mut WorldState,
    pub blackboard: &'a mut Blackboard,
    pub host: &'a mut H,
}

/// Context passed to [`Behavior`] lifecycle methods.
///
/// `host` is the agent's body in the surrounding simulation (movement, animation). `run` is the
/// instance's own execution state; behaviors set `run.target` and may inspect `run.running`.
pub struct ActionCx<'a, H> {
    pub tick: &'a TickContext,
    pub agent: AgentId,
    pub world: &'a mut WorldState,
    pub blackboard: &'a mut Blackboard,
    pub host: &'a mut H,
    pub template: &'a ActionTemplate,
    pub run: &'a mut ActionRun,
}

/// Concrete action behavior: three lifecycle phases plus a completion predicate.
///
/// Lifecycle driven by the agent loop:
/// `pre_action` once on dequeue, `during_action` every tick until `is_complete` returns `true`,
/// then `post_action` once after the template's `duration` has elapsed. `post_action` may also
/// be called early when the agent switches goals; it must leave the behavior ready for the next
/// run either way.
pub trait Behavior<H> {
    /// Session-wide eligibility gate checked before planning.
    fn is_achievable(&self) -> bool {
        true
    }

    /// Set up the run. Returning `false` aborts the rest of the agent's plan.
    fn pre_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool;

    fn during_action(&mut self, _cx: &mut ActionCx<'_, H>) -> bool {
        true
    }

    /// Tear down and reset per-run flags.
    fn post_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool;

    fn is_complete(&mut self, cx: &mut ActionCx<'_, H>) -> bool;
}

/// An agent's own copy of an action: a shared template plus private behavior and run state.
pub struct ActionInstance<H> {
    template: Arc<ActionTemplate>,
    behavior: Box<dyn Behavior<H>>,
    run: ActionRun,
}

impl<H> ActionInstance<H> {
    pub fn new(template: Arc<ActionTemplate>, behavior: Box<dyn Behavior<H>>) -> Self {
        Self {
            template,
            behavior,
            run: ActionRun::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn template(&self) -> &ActionTemplate {
        &self.template
    }

    pub fn shared_template(&self) -> Arc<ActionTemplate> {
        Arc::clone(&self.template)
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    pub fn target(&self) -> Option<EntityId> {
        self.run.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.run.target = target;
    }

    pub fn is_achievable(&self) -> bool {
        self.behavior.is_achievable()
    }

    pub fn is_achievable_given(&self, state: &FactMap) -> bool {
        self.template.is_achievable_given(state)
    }

    /// Marks the instance running and starts it. On `false` the instance is back to idle.
    pub fn pre_action(&mut self, env: &mut AgentEnv<'_, H>) -> bool {
        self.run.running = true;
        let (behavior, mut cx) = self.split(env);
        let started = behavior.pre_action(&mut cx);
        if !started {
            self.run.running = false;
        }
        started
    }

    pub fn during_action(&mut self, env: &mut AgentEnv<'_, H>) -> bool {
        let (behavior, mut cx) = self.split(env);
        behavior.during_action(&mut cx)
    }

    pub fn is_complete(&mut self, env: &mut AgentEnv<'_, H>) -> bool {
        let (behavior, mut cx) = self.split(env);
        behavior.is_complete(&mut cx)
    }

    /// Clears `running` and tears the run down.
    pub fn post_action(&mut self, env: &mut AgentEnv<'_, H>) -> bool {
        self.run.running = false;
        let (behavior, mut cx) = self.split(env);
        behavior.post_action(&mut cx)
    }

    fn split<'s>(
        &'s mut self,
        env: &'s mut AgentEnv<'_, H>,
    ) -> (&'s mut dyn Behavior<H>, ActionCx<'s, H>) {
        let cx = ActionCx {
            tick: env.tick,
            agent: env.agent,
            world: &mut *env.world,
            blackboard: &mut *env.blackboard,
            host: &mut *env.host,
            template: &self.template,
            run: &mut self.run,
        };
        (&mut *self.behavior, cx)
    }
}

impl<H> fmt::Debug for ActionInstance<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInstance")
            .field("name", &self.template.name)
            .field("kind", &self.template.kind)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}
