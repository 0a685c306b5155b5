//! Scenario files.

use std::collections::BTreeSet;
use std::path::Path;

use goap_agent::{AgentConfig, BehaviorParams};
use goap_core::{ActionTemplate, FactMap, Goal, GoalSet};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Vec2};

/// A complete simulation setup, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: Option<String>,

    /// Facts present before the first tick.
    pub world: FactMap,

    pub entities: Vec<EntityConfig>,

    pub agent_types: Vec<AgentTypeConfig>,

    pub goal_sets: Vec<GoalSetConfig>,

    pub agents: Vec<AgentSpawnConfig>,

    pub events: Vec<EventConfig>,

    pub sim: SimConfig,
}

/// Something in the level an agent can walk to or use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub position: Vec2,

    #[serde(default = "default_true")]
    pub active: bool,
}

/// An archetype: the actions every agent of this type gets its own instance of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTypeConfig {
    pub name: String,

    #[serde(default)]
    pub actions: Vec<ActionConfig>,

    #[serde(default)]
    pub agent: AgentConfig,
}

/// One action template plus the built-in behavior that executes it.
///
/// ```yaml
/// - name: go_to_button
///   behavior: go_to
///   target_tag: button
///   effects: { atButton: 1 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    pub name: String,

    #[serde(default = "default_cost")]
    pub cost: f32,

    #[serde(default)]
    pub duration: f32,

    #[serde(default)]
    pub preconditions: FactMap,

    #[serde(default)]
    pub effects: FactMap,

    #[serde(default)]
    pub target_tag: Option<String>,

    #[serde(default)]
    pub commit_effects: bool,

    #[serde(flatten)]
    pub behavior: BehaviorParams,
}

impl ActionConfig {
    /// The shareable template; its kind follows from the behavior.
    pub fn template(&self) -> ActionTemplate {
        ActionTemplate {
            name: self.name.clone(),
            kind: self.behavior.kind(),
            cost: self.cost,
            duration: self.duration,
            preconditions: self.preconditions.clone(),
            effects: self.effects.clone(),
            target_tag: self.target_tag.clone(),
            commit_effects: self.commit_effects,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSetConfig {
    pub name: String,

    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl GoalSetConfig {
    pub fn goal_set(&self) -> GoalSet {
        GoalSet::new(self.goals.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpawnConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub agent_type: String,

    pub goal_set: String,

    #[serde(default)]
    pub position: Vec2,

    /// Units per second.
    #[serde(default = "default_speed")]
    pub speed: f32,

    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,

    /// Entity names, in patrol order.
    #[serde(default)]
    pub waypoints: Vec<String>,
}

/// A world mutation applied at the start of tick `at_tick`, before any agent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub at_tick: u64,

    #[serde(flatten)]
    pub change: WorldChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WorldChange {
    Set {
        key: String,
        #[serde(default = "default_fact_value")]
        value: i32,
    },
    Add {
        key: String,
        #[serde(default = "default_fact_value")]
        value: i32,
    },
    Modify {
        key: String,
        delta: i32,
    },
    Remove {
        key: String,
    },
    Enable {
        entity: String,
    },
    Disable {
        entity: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt_seconds: f32,
    pub seed: u64,
    pub max_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_seconds: 0.1,
            seed: 0,
            max_ticks: 600,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: None,
            world: FactMap::new(),
            entities: Vec::new(),
            agent_types: Vec::new(),
            goal_sets: Vec::new(),
            agents: Vec::new(),
            events: Vec::new(),
            sim: SimConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_cost() -> f32 {
    1.0
}
fn default_speed() -> f32 {
    3.5
}
fn default_stopping_distance() -> f32 {
    0.5
}
fn default_fact_value() -> i32 {
    1
}

impl ScenarioConfig {
    /// Load and validate a scenario from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            agents = config.agents.len(),
            entities = config.entities.len(),
            "loaded scenario"
        );
        Ok(config)
    }

    /// Parse and validate a scenario.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn agent_type(&self, name: &str) -> Option<&AgentTypeConfig> {
        self.agent_types.iter().find(|t| t.name == name)
    }

    pub fn goal_set(&self, name: &str) -> Option<&GoalSetConfig> {
        self.goal_sets.iter().find(|g| g.name == name)
    }

    pub fn entity(&self, name: &str) -> Option<&EntityConfig> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Check names are unique and every cross-reference resolves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sim.dt_seconds.is_nan() || self.sim.dt_seconds <= 0.0 {
            return Err(ConfigError::InvalidTimestep(self.sim.dt_seconds));
        }

        unique("entity", self.entities.iter().map(|e| e.name.as_str()))?;
        unique("agent type", self.agent_types.iter().map(|t| t.name.as_str()))?;
        unique("goal set", self.goal_sets.iter().map(|g| g.name.as_str()))?;
        unique("agent", self.agents.iter().map(|a| a.name.as_str()))?;
        for agent_type in &self.agent_types {
            unique("action", agent_type.actions.iter().map(|a| a.name.as_str()))?;
        }
        for set in &self.goal_sets {
            unique("goal", set.goals.iter().map(|g| g.name.as_str()))?;
        }

        for agent in &self.agents {
            if self.agent_type(&agent.agent_type).is_none() {
                return Err(ConfigError::UnknownAgentType {
                    agent: agent.name.clone(),
                    agent_type: agent.agent_type.clone(),
                });
            }
            if self.goal_set(&agent.goal_set).is_none() {
                return Err(ConfigError::UnknownGoalSet {
                    agent: agent.name.clone(),
                    goal_set: agent.goal_set.clone(),
                });
            }
            for waypoint in &agent.waypoints {
                self.require_entity(waypoint, || format!("agent `{}`", agent.name))?;
            }
        }

        for event in &self.events {
            if let WorldChange::Enable { entity } | WorldChange::Disable { entity } = &event.change
            {
                self.require_entity(entity, || format!("event at tick {}", event.at_tick))?;
            }
        }
        Ok(())
    }

    fn require_entity(
        &self,
        name: &str,
        context: impl FnOnce() -> String,
    ) -> Result<(), ConfigError> {
        if self.entity(name).is_some() {
            return Ok(());
        }
        Err(ConfigError::UnknownEntity {
            context: context(),
            entity: name.to_string(),
        })
    }
}

fn unique<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
