use thiserror::Error;

/// Errors raised by the shared world-state store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldStateError {
    #[error("fact `{0}` already exists")]
    FactExists(String),
}
