use goap_planner::PlannerConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Re-validate the plan at the start of a tick whenever the world revision moved since the
    /// agent last looked. With this off, validation only happens through
    /// [`crate::Agent::validate`] and [`crate::Agent::assert_fact`].
    pub validate_on_world_change: bool,

    pub planner: PlannerConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            validate_on_world_change: true,
            planner: PlannerConfig::default(),
        }
    }
}
