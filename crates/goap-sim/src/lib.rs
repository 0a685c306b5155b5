//! Scenario-driven host simulation for GOAP agents.
//!
//! A scenario file describes the initial world facts, the entities agents can walk to or use,
//! agent archetypes with their actions, goal sets, the agents themselves and a schedule of world
//! events. [`Simulation`] turns that into a deterministic fixed-step run.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod body;
pub mod config;
pub mod error;
pub mod math;
pub mod sim;

pub use body::{Entity, EntityTable, KinematicBody, SharedEntities};
pub use config::{
    ActionConfig, AgentSpawnConfig, AgentTypeConfig, EntityConfig, EventConfig, GoalSetConfig,
    ScenarioConfig, SimConfig, WorldChange,
};
pub use error::ConfigError;
pub use math::Vec2;
pub use sim::{SimAgent, Simulation, TickReport};
