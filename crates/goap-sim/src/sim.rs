use std::cell::Ref;
use std::collections::BTreeMap;
use std::sync::Arc;

use goap_agent::{instantiate, Agent, AgentStep, BehaviorParams};
use goap_core::{ActionTemplate, AgentId, EntityId, TickContext, WorldState};
use goap_tools::{TraceLog, TRACE_LOG};

use crate::{
    ConfigError, EntityTable, KinematicBody, ScenarioConfig, SharedEntities, WorldChange,
};

/// An agent and the body it drives.
#[derive(Debug)]
pub struct SimAgent {
    pub agent: Agent<KinematicBody>,
    pub body: KinematicBody,
}

/// What happened during one simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events_applied: usize,
    pub steps: Vec<(AgentId, AgentStep)>,
}

/// Entity references are resolved to ids once, at build time.
#[derive(Debug, Clone)]
enum ResolvedChange {
    World(WorldChange),
    Activate(EntityId, bool),
}

#[derive(Debug, Clone)]
struct ScheduledEvent {
    at_tick: u64,
    change: ResolvedChange,
}

/// Fixed-step, single-threaded run over one [`WorldState`].
///
/// Each tick first applies the events scheduled for it, then ticks every agent in ascending id
/// order, moving its body right after. Two runs of the same scenario produce the same history.
#[derive(Debug)]
pub struct Simulation {
    ctx: TickContext,
    world: WorldState,
    entities: SharedEntities,
    agents: Vec<SimAgent>,
    events: Vec<ScheduledEvent>,
    next_event: usize,
    max_ticks: u64,
}

impl Simulation {
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut table = EntityTable::new();
        for entity in &config.entities {
            table.insert(
                entity.name.clone(),
                entity.tag.clone(),
                entity.position,
                entity.active,
            );
        }
        let entity_id = |table: &EntityTable, name: &str, context: String| {
            table.id_of(name).ok_or_else(|| ConfigError::UnknownEntity {
                context,
                entity: name.to_string(),
            })
        };

        // Templates are shared between every agent of a type.
        let mut archetypes: BTreeMap<&str, Vec<(Arc<ActionTemplate>, &BehaviorParams)>> =
            BTreeMap::new();
        for agent_type in &config.agent_types {
            let actions = agent_type
                .actions
                .iter()
                .map(|a| (Arc::new(a.template()), &a.behavior))
                .collect();
            archetypes.insert(agent_type.name.as_str(), actions);
        }

        let entities = table.shared();
        let mut agents = Vec::with_capacity(config.agents.len());
        for (index, spawn) in config.agents.iter().enumerate() {
            let id = AgentId(index as u64 + 1);
            let unknown_type = || ConfigError::UnknownAgentType {
                agent: spawn.name.clone(),
                agent_type: spawn.agent_type.clone(),
            };
            let agent_type = config.agent_type(&spawn.agent_type).ok_or_else(unknown_type)?;
            let archetype = archetypes
                .get(spawn.agent_type.as_str())
                .ok_or_else(unknown_type)?;
            let goal_set = config
                .goal_set(&spawn.goal_set)
                .ok_or_else(|| ConfigError::UnknownGoalSet {
                    agent: spawn.name.clone(),
                    goal_set: spawn.goal_set.clone(),
                })?
                .goal_set();

            let actions = archetype
                .iter()
                .map(|(template, params)| instantiate(Arc::clone(template), params))
                .collect();
            let mut agent = Agent::new(id, spawn.name.clone(), actions)
                .with_config(agent_type.agent)
                .with_goal_set(&goal_set)?;
            agent.blackboard.set(TRACE_LOG, TraceLog::default());

            let waypoints = {
                let table = entities.borrow();
                spawn
                    .waypoints
                    .iter()
                    .map(|w| entity_id(&*table, w, format!("agent `{}`", spawn.name)))
                    .collect::<Result<Vec<_>, _>>()?
            };
            let body = KinematicBody::new(entities.clone(), spawn.position)
                .with_speed(spawn.speed)
                .with_stopping_distance(spawn.stopping_distance)
                .with_waypoints(waypoints);

            agents.push(SimAgent { agent, body });
        }

        let mut events = Vec::with_capacity(config.events.len());
        {
            let table = entities.borrow();
            for event in &config.events {
                let context = || format!("event at tick {}", event.at_tick);
                let change = match &event.change {
                    WorldChange::Enable { entity } => {
                        ResolvedChange::Activate(entity_id(&*table, entity, context())?, true)
                    }
                    WorldChange::Disable { entity } => {
                        ResolvedChange::Activate(entity_id(&*table, entity, context())?, false)
                    }
                    other => ResolvedChange::World(other.clone()),
                };
                events.push(ScheduledEvent {
                    at_tick: event.at_tick,
                    change,
                });
            }
        }
        events.sort_by_key(|e| e.at_tick);

        tracing::info!(
            scenario = config.name.as_deref().unwrap_or("<unnamed>"),
            agents = agents.len(),
            entities = entities.borrow().len(),
            events = events.len(),
            "simulation built"
        );

        Ok(Self {
            ctx: TickContext::new(0, config.sim.dt_seconds, config.sim.seed),
            world: WorldState::from_facts(config.world.clone()),
            entities,
            agents,
            events,
            next_event: 0,
            max_ticks: config.sim.max_ticks,
        })
    }

    /// Tick about to run.
    pub fn tick_index(&self) -> u64 {
        self.ctx.tick
    }

    pub fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// External systems may change facts between ticks; agents notice on their next tick.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn entities(&self) -> Ref<'_, EntityTable> {
        self.entities.borrow()
    }

    pub fn agents(&self) -> &[SimAgent] {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Option<&SimAgent> {
        self.agents.iter().find(|a| a.agent.name() == name)
    }

    pub fn agent_mut(&mut self, name: &str) -> Option<&mut SimAgent> {
        self.agents.iter_mut().find(|a| a.agent.name() == name)
    }

    pub fn trace(&self, name: &str) -> Option<&TraceLog> {
        self.agent(name)?.agent.blackboard.get(TRACE_LOG)
    }

    pub fn tick(&mut self) -> TickReport {
        let tick = self.ctx.tick;
        let events_applied = self.apply_due_events();

        let mut steps = Vec::with_capacity(self.agents.len());
        for sim_agent in &mut self.agents {
            let step = sim_agent
                .agent
                .tick(&self.ctx, &mut self.world, &mut sim_agent.body);
            sim_agent.body.step(self.ctx.dt_seconds);
            tracing::trace!(tick, agent = %sim_agent.agent.id(), ?step, "agent ticked");
            steps.push((sim_agent.agent.id(), step));
        }

        self.ctx = self.ctx.next();
        TickReport {
            tick,
            events_applied,
            steps,
        }
    }

    /// Run `ticks` ticks, or up to the scenario's `max_ticks` when `None`.
    pub fn run(&mut self, ticks: Option<u64>) -> Vec<TickReport> {
        let ticks = ticks.unwrap_or_else(|| self.max_ticks.saturating_sub(self.ctx.tick));
        (0..ticks).map(|_| self.tick()).collect()
    }

    fn apply_due_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.get(self.next_event) {
            if event.at_tick > self.ctx.tick {
                break;
            }
            let change = event.change.clone();
            self.next_event += 1;
            self.apply(change);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, change: ResolvedChange) {
        let tick = self.ctx.tick;
        match change {
            ResolvedChange::World(WorldChange::Set { key, value }) => {
                tracing::debug!(tick, %key, value, "event: set fact");
                self.world.set(key, value);
            }
            ResolvedChange::World(WorldChange::Add { key, value }) => {
                if let Err(err) = self.world.add(key, value) {
                    tracing::warn!(tick, error = %err, "event: add skipped");
                }
            }
            ResolvedChange::World(WorldChange::Modify { key, delta }) => {
                tracing::debug!(tick, %key, delta, "event: modify fact");
                self.world.modify(&key, delta);
            }
            ResolvedChange::World(WorldChange::Remove { key }) => {
                tracing::debug!(tick, %key, "event: remove fact");
                self.world.remove(&key);
            }
            ResolvedChange::World(WorldChange::Enable { .. } | WorldChange::Disable { .. }) => {}
            ResolvedChange::Activate(entity, active) => {
                tracing::debug!(tick, %entity, active, "event: entity toggled");
                self.entities.borrow_mut().set_active(entity, active);
            }
        }
    }
}
