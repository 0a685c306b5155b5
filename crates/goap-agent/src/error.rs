use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("agent already has a goal named `{0}`")]
    DuplicateGoal(String),

    #[error("agent has no goal named `{0}`")]
    UnknownGoal(String),
}
