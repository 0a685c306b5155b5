use std::collections::VecDeque;

use goap_core::{
    ActionInstance, AgentEnv, AgentId, Blackboard, Goal, GoalSet, TickContext, WorldState,
};
use goap_planner::{Plan, Planner};
use goap_tools::{emit as trace_emit, TraceEvent};

use crate::{AgentConfig, AgentError};

/// What an agent did on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStep {
    /// The running action was not complete; `during_action` ran.
    Executing,
    /// The running action is complete and waiting out its `duration`.
    CompletionPending,
    /// `post_action` ran for the current action.
    ActionCompleted,
    /// A goal was selected and its plan queued.
    Planned,
    /// No goal could be planned for.
    NoPlan,
    /// The queued plan ran out; the goal was retired or re-planned.
    PlanCompleted,
    /// The next queued action started.
    ActionStarted,
    /// The next queued action refused to start; the plan was dropped.
    StartFailed,
    /// Nothing to do.
    Idle,
}

/// The winning goal of a planning pass and its plan.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalPlan {
    pub goal: String,
    pub plan: Plan,
}

/// A planning agent.
///
/// Per tick the agent does exactly one of: continue its running action, plan, retire a finished
/// plan, or start the next queued action. Validation (re-planning across all goals, preempting
/// the running action if a different goal wins) is event-driven and happens before that step
/// when the world changed.
pub struct Agent<H> {
    id: AgentId,
    name: String,
    actions: Vec<ActionInstance<H>>,
    /// Ordered by importance, highest first; equal importance keeps insertion order.
    goals: Vec<Goal>,
    current_goal: Option<String>,
    action_queue: Option<VecDeque<usize>>,
    current_action: Option<usize>,
    completion_timer: Option<f32>,
    seen_revision: Option<u64>,
    planner: Planner,
    config: AgentConfig,
    pub blackboard: Blackboard,
}

impl<H> Agent<H> {
    pub fn new(id: AgentId, name: impl Into<String>, actions: Vec<ActionInstance<H>>) -> Self {
        let name = name.into();
        if actions.is_empty() {
            tracing::warn!(
                agent = %id,
                name = %name,
                "agent has no available actions; it cannot act"
            );
        }
        let config = AgentConfig::default();
        Self {
            id,
            name,
            actions,
            goals: Vec::new(),
            current_goal: None,
            action_queue: None,
            current_action: None,
            completion_timer: None,
            seen_revision: None,
            planner: Planner::new().with_config(config.planner),
            config,
            blackboard: Blackboard::new(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.planner = Planner::new().with_config(config.planner);
        self.config = config;
        self
    }

    /// Adopt every enabled goal of `set`.
    pub fn with_goal_set(mut self, set: &GoalSet) -> Result<Self, AgentError> {
        for goal in set.enabled() {
            self.add_goal(goal.clone())?;
        }
        if self.goals.is_empty() {
            tracing::warn!(agent = %self.id, name = %self.name, "agent has no goals assigned");
        }
        Ok(self)
    }

    pub fn add_goal(&mut self, goal: Goal) -> Result<(), AgentError> {
        if self.goals.iter().any(|g| g.name == goal.name) {
            return Err(AgentError::DuplicateGoal(goal.name));
        }
        let at = self
            .goals
            .iter()
            .position(|g| g.importance < goal.importance)
            .unwrap_or(self.goals.len());
        self.goals.insert(at, goal);
        Ok(())
    }

    /// Drop a goal. The running plan, if it serves this goal, keeps going until the next
    /// validation or plan completion.
    pub fn remove_goal(&mut self, name: &str) -> Result<Goal, AgentError> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| AgentError::UnknownGoal(name.to_string()))?;
        Ok(self.goals.remove(pos))
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn actions(&self) -> &[ActionInstance<H>] {
        &self.actions
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut ActionInstance<H>> {
        self.actions.get_mut(index)
    }

    pub fn current_goal(&self) -> Option<&Goal> {
        let name = self.current_goal.as_deref()?;
        self.goals.iter().find(|g| g.name == name)
    }

    pub fn current_goal_name(&self) -> Option<&str> {
        self.current_goal.as_deref()
    }

    pub fn current_action(&self) -> Option<&ActionInstance<H>> {
        self.current_action.and_then(|i| self.actions.get(i))
    }

    /// Names of the actions still queued, next first. `None` when there is no plan.
    pub fn queued_actions(&self) -> Option<Vec<&str>> {
        let queue = self.action_queue.as_ref()?;
        Some(queue.iter().map(|&i| self.actions[i].name()).collect())
    }

    pub fn has_plan(&self) -> bool {
        self.action_queue.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.action_queue.is_none() && !self.current_action().is_some_and(|a| a.is_running())
    }

    /// Plan for a single goal without touching the agent's execution state.
    pub fn plan_goal(&self, goal: &str, world: &WorldState) -> Result<Option<Plan>, AgentError> {
        let goal = self
            .goals
            .iter()
            .find(|g| g.name == goal)
            .ok_or_else(|| AgentError::UnknownGoal(goal.to_string()))?;
        Ok(self
            .planner
            .plan(&self.actions, &goal.condition(), world.facts()))
    }

    /// Plan across goals in priority order and return the first that succeeds.
    pub fn find_plan(&mut self, tick: u64, world: &WorldState) -> Option<GoalPlan> {
        for goal in self.goals.iter().filter(|g| g.enabled) {
            trace_emit(
                &mut self.blackboard,
                TraceEvent::new(tick, "goap.plan.call")
                    .with_label(goal.name.clone())
                    .with_a(goal.importance.max(0) as u64),
            );
            let plan = self
                .planner
                .plan(&self.actions, &goal.condition(), world.facts());
            match plan {
                Some(plan) => {
                    trace_emit(
                        &mut self.blackboard,
                        TraceEvent::new(tick, "goap.plan.result")
                            .with_label(goal.name.clone())
                            .with_a(plan.len() as u64),
                    );
                    return Some(GoalPlan {
                        goal: goal.name.clone(),
                        plan,
                    });
                }
                None => trace_emit(
                    &mut self.blackboard,
                    TraceEvent::new(tick, "goap.plan.none").with_label(goal.name.clone()),
                ),
            }
        }
        None
    }

    /// Advance the agent by one tick.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut WorldState, host: &mut H) -> AgentStep {
        if self.config.validate_on_world_change {
            let revision = world.revision();
            let previous = self.seen_revision.replace(revision);
            if previous.is_some_and(|seen| seen != revision) {
                self.validate(ctx, world, host);
            }
        }

        if let Some(idx) = self.current_action {
            if self.actions[idx].is_running() {
                return self.step_current(idx, ctx, world, host);
            }
        }

        match self.action_queue.as_ref().map(VecDeque::len) {
            None => self.plan(ctx, world),
            Some(0) if self.goals.is_empty() => AgentStep::Idle,
            Some(0) => self.complete_plan(ctx, world, host),
            Some(_) => self.dequeue_next(ctx, world, host),
        }
    }

    /// Re-plan across all goals. If a different goal than the current one wins, the running
    /// action is force-completed and the new plan replaces the old queue.
    ///
    /// Returns `true` when the agent switched goals.
    pub fn validate(&mut self, ctx: &TickContext, world: &mut WorldState, host: &mut H) -> bool {
        let Some(found) = self.find_plan(ctx.tick, world) else {
            return false;
        };
        if self.current_goal.as_deref() == Some(found.goal.as_str()) {
            return false;
        }
        self.switch_to(found, ctx, world, host);
        true
    }

    /// Preempt whatever is running and install `found` as the active goal and plan.
    fn switch_to(
        &mut self,
        found: GoalPlan,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
    ) {
        if let Some(idx) = self.current_action {
            if self.actions[idx].is_running() || self.completion_timer.is_some() {
                trace_emit(
                    &mut self.blackboard,
                    TraceEvent::new(ctx.tick, "goap.action.preempt")
                        .with_label(self.actions[idx].name().to_string())
                        .with_a(idx as u64),
                );
                self.complete_action(idx, ctx, world, host, false);
            }
        }

        tracing::info!(
            agent = %self.id,
            from = self.current_goal.as_deref().unwrap_or("<none>"),
            to = %found.goal,
            steps = found.plan.len(),
            "switching goal"
        );
        let importance = self
            .goals
            .iter()
            .find(|g| g.name == found.goal)
            .map(|g| g.importance.max(0) as u64)
            .unwrap_or(0);
        trace_emit(
            &mut self.blackboard,
            TraceEvent::new(ctx.tick, "goap.goal.switch")
                .with_label(found.goal.clone())
                .with_a(importance)
                .with_b(found.plan.len() as u64),
        );
        self.current_goal = Some(found.goal);
        self.action_queue = Some(found.plan.steps.into());
    }

    /// Set a fact in the world and validate immediately.
    pub fn assert_fact(
        &mut self,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
        key: impl Into<String>,
        value: i32,
    ) -> bool {
        world.set(key, value);
        self.seen_revision = Some(world.revision());
        self.validate(ctx, world, host)
    }

    fn plan(&mut self, ctx: &TickContext, world: &WorldState) -> AgentStep {
        match self.find_plan(ctx.tick, world) {
            Some(found) => {
                tracing::debug!(
                    agent = %self.id,
                    goal = %found.goal,
                    "plan: {}",
                    found.plan.describe(&self.actions)
                );
                self.current_goal = Some(found.goal);
                self.action_queue = Some(found.plan.steps.into());
                AgentStep::Planned
            }
            None => {
                self.current_goal = None;
                AgentStep::NoPlan
            }
        }
    }

    fn complete_plan(
        &mut self,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
    ) -> AgentStep {
        let finished = self.current_goal.take();
        if let Some(name) = finished.as_deref() {
            if let Some(pos) = self.goals.iter().position(|g| g.name == name) {
                if !self.goals[pos].persistent {
                    let goal = self.goals.remove(pos);
                    tracing::info!(agent = %self.id, goal = %goal.name, "goal achieved; retired");
                    trace_emit(
                        &mut self.blackboard,
                        TraceEvent::new(ctx.tick, "goap.goal.removed").with_label(goal.name),
                    );
                }
            }
        }

        // Nothing is running here. If no plan is found the next tick plans from scratch.
        self.action_queue = None;
        match self.find_plan(ctx.tick, world) {
            Some(found) if finished.as_deref() == Some(found.goal.as_str()) => {
                tracing::debug!(agent = %self.id, goal = %found.goal, "goal re-planned");
                self.current_goal = Some(found.goal);
                self.action_queue = Some(found.plan.steps.into());
            }
            Some(found) => self.switch_to(found, ctx, world, host),
            None => {}
        }
        AgentStep::PlanCompleted
    }

    fn dequeue_next(
        &mut self,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
    ) -> AgentStep {
        let Some(idx) = self.action_queue.as_mut().and_then(VecDeque::pop_front) else {
            return AgentStep::Idle;
        };
        self.current_action = Some(idx);
        self.completion_timer = None;

        let started = self.with_action(idx, ctx, world, host, |action, env| action.pre_action(env));
        let name = self.actions[idx].name().to_string();
        if started {
            tracing::debug!(agent = %self.id, action = %name, "action started");
            trace_emit(
                &mut self.blackboard,
                TraceEvent::new(ctx.tick, "goap.action.start")
                    .with_label(name)
                    .with_a(idx as u64),
            );
            AgentStep::ActionStarted
        } else {
            tracing::info!(agent = %self.id, action = %name, "action failed to start; dropping plan");
            trace_emit(
                &mut self.blackboard,
                TraceEvent::new(ctx.tick, "goap.action.start_failed")
                    .with_label(name)
                    .with_a(idx as u64),
            );
            self.action_queue = None;
            AgentStep::StartFailed
        }
    }

    fn step_current(
        &mut self,
        idx: usize,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
    ) -> AgentStep {
        if let Some(remaining) = self.completion_timer.as_mut() {
            *remaining -= ctx.dt_seconds;
            if *remaining <= 0.0 {
                self.complete_action(idx, ctx, world, host, true);
                return AgentStep::ActionCompleted;
            }
            return AgentStep::CompletionPending;
        }

        if self.with_action(idx, ctx, world, host, |action, env| action.is_complete(env)) {
            let duration = self.actions[idx].template().duration;
            if duration <= 0.0 {
                self.complete_action(idx, ctx, world, host, true);
                return AgentStep::ActionCompleted;
            }
            self.completion_timer = Some(duration);
            return AgentStep::CompletionPending;
        }

        self.with_action(idx, ctx, world, host, |action, env| action.during_action(env));
        AgentStep::Executing
    }

    /// Run `post_action` and reset the completion timer. `commit` is `false` for preemption,
    /// which never writes effects.
    fn complete_action(
        &mut self,
        idx: usize,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
        commit: bool,
    ) {
        self.completion_timer = None;
        self.with_action(idx, ctx, world, host, |action, env| action.post_action(env));

        let template = self.actions[idx].shared_template();
        if commit && template.commit_effects {
            world.apply_effects(&template.effects);
        }
        trace_emit(
            &mut self.blackboard,
            TraceEvent::new(ctx.tick, "goap.action.complete")
                .with_label(template.name.clone())
                .with_a(idx as u64)
                .with_b(u64::from(commit)),
        );
    }

    fn with_action<R>(
        &mut self,
        idx: usize,
        ctx: &TickContext,
        world: &mut WorldState,
        host: &mut H,
        f: impl FnOnce(&mut ActionInstance<H>, &mut AgentEnv<'_, H>) -> R,
    ) -> R {
        let mut env = AgentEnv {
            tick: ctx,
            agent: self.id,
            world,
            blackboard: &mut self.blackboard,
            host,
        };
        f(&mut self.actions[idx], &mut env)
    }
}

impl<H> std::fmt::Debug for Agent<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("goals", &self.goals)
            .field("current_goal", &self.current_goal)
            .field("action_queue", &self.action_queue)
            .field("current_action", &self.current_action)
            .finish_non_exhaustive()
    }
}
