use crate::fact::{merge_effects, FactMap};
use crate::WorldStateError;

/// Canonical fact table shared by every agent in a simulation.
///
/// Build one per simulation and pass it down explicitly. Readers borrow `&WorldState`, writers
/// borrow `&mut WorldState`, so the single-writer discipline is checked by the compiler rather
/// than by convention.
///
/// Every mutation that changes the table bumps [`WorldState::revision`]. Agents compare it
/// against the revision they last saw to decide whether to re-validate their plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldState {
    facts: FactMap,
    revision: u64,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_facts(facts: FactMap) -> Self {
        Self { facts, revision: 0 }
    }

    /// Live fact table. The planner copies this into its root node.
    pub fn facts(&self) -> &FactMap {
        &self.facts
    }

    /// Owned copy of the table, for sharing read-only across planning calls.
    pub fn snapshot(&self) -> FactMap {
        self.facts.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn has(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.facts.get(key).copied()
    }

    /// Insert a new fact. Fails if the key is already present.
    pub fn add(&mut self, key: impl Into<String>, value: i32) -> Result<(), WorldStateError> {
        let key = key.into();
        if self.facts.contains_key(&key) {
            return Err(WorldStateError::FactExists(key));
        }
        self.facts.insert(key, value);
        self.bump();
        Ok(())
    }

    /// Insert or overwrite a fact.
    pub fn set(&mut self, key: impl Into<String>, value: i32) {
        let key = key.into();
        if self.facts.get(&key) == Some(&value) {
            return;
        }
        self.facts.insert(key, value);
        self.bump();
    }

    /// Add `delta` to an existing fact, removing it when the result drops to zero or below.
    ///
    /// Absent keys are left untouched.
    pub fn modify(&mut self, key: &str, delta: i32) {
        let Some(value) = self.facts.get_mut(key) else {
            return;
        };
        if delta == 0 && *value > 0 {
            return;
        }
        *value = value.saturating_add(delta);
        if *value <= 0 {
            self.facts.remove(key);
        }
        self.bump();
    }

    pub fn remove(&mut self, key: &str) -> Option<i32> {
        let removed = self.facts.remove(key);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    /// Apply action effects with the planner's no-overwrite rule: only absent keys are inserted.
    pub fn apply_effects(&mut self, effects: &FactMap) -> usize {
        let inserted = merge_effects(&mut self.facts, effects);
        if inserted > 0 {
            self.bump();
        }
        inserted
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
