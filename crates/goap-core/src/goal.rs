use crate::fact::FactMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named desired fact with an importance weight.
///
/// The goal's planner target is the single fact `{name: importance}`: it is met once a fact with
/// the goal's name is present in the state.
///
/// Non-persistent goals are dropped from an agent once a plan for them runs to completion;
/// persistent goals stay and are re-pursued indefinitely.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Goal {
    pub name: String,
    pub importance: i32,
    pub persistent: bool,
    pub enabled: bool,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            name: "goal".to_string(),
            importance: 1,
            persistent: true,
            enabled: true,
        }
    }
}

impl Goal {
    pub fn new(name: impl Into<String>, importance: i32, persistent: bool) -> Self {
        Self {
            name: name.into(),
            importance,
            persistent,
            enabled: true,
        }
    }

    pub fn persistent(name: impl Into<String>, importance: i32) -> Self {
        Self::new(name, importance, true)
    }

    pub fn once(name: impl Into<String>, importance: i32) -> Self {
        Self::new(name, importance, false)
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Planner target condition.
    pub fn condition(&self) -> FactMap {
        let mut condition = FactMap::new();
        condition.insert(self.name.clone(), self.importance);
        condition
    }
}

/// Designer-authored collection of goals handed to agents at spawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalSet {
    pub goals: Vec<Goal>,
}

impl GoalSet {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.enabled)
    }
}
