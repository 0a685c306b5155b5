use std::path::PathBuf;

use goap_agent::AgentError;
use thiserror::Error;

/// Problems loading or instantiating a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("duplicate {kind} `{name}`")]
    Duplicate { kind: &'static str, name: String },

    #[error("agent `{agent}` uses unknown agent type `{agent_type}`")]
    UnknownAgentType { agent: String, agent_type: String },

    #[error("agent `{agent}` uses unknown goal set `{goal_set}`")]
    UnknownGoalSet { agent: String, goal_set: String },

    #[error("{context} refers to unknown entity `{entity}`")]
    UnknownEntity { context: String, entity: String },

    #[error("sim.dt_seconds must be positive (got {0})")]
    InvalidTimestep(f32),

    #[error(transparent)]
    Agent(#[from] AgentError),
}
