//! GOAP agent execution loop: goal selection, plan execution, preemption.
//!
//! An [`Agent`] owns its action instances and goals, plans against a shared
//! [`goap_core::WorldState`], and drives one action at a time through its lifecycle, advancing
//! once per simulation tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod behaviors;
pub mod config;
pub mod error;
pub mod host;

pub use agent::{Agent, AgentStep, GoalPlan};
pub use behaviors::{instantiate, BehaviorParams};
pub use config::AgentConfig;
pub use error::AgentError;
pub use host::{Animator, Host, Interactor, Locomotion};
