//! World-state facts, action templates and goals for deterministic GOAP agents.
//!
//! This crate holds the data model shared by the planner and the agent loop. It does not plan
//! and it does not drive agents; see `goap-planner` and `goap-agent`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod blackboard;
pub mod error;
pub mod fact;
pub mod goal;
pub mod ids;
pub mod rng;
pub mod tick;
pub mod world;

pub use action::{
    ActionCx, ActionInstance, ActionKind, ActionRun, ActionTemplate, AgentEnv, Behavior,
};
pub use blackboard::{BbKey, Blackboard};
pub use error::WorldStateError;
pub use fact::{facts, merge_effects, satisfies, FactMap};
pub use goal::{Goal, GoalSet};
pub use ids::{AgentId, EntityId};
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use world::WorldState;
