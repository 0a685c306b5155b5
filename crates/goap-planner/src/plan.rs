use std::sync::Arc;

use goap_core::{ActionInstance, ActionTemplate, FactMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the planner needs to know about an action.
pub trait PlanAction {
    fn name(&self) -> &str;

    fn cost(&self) -> f32;

    /// Static eligibility, checked once per planning call before the search starts.
    fn is_achievable(&self) -> bool {
        true
    }

    fn is_achievable_given(&self, state: &FactMap) -> bool;

    fn effects(&self) -> &FactMap;
}

impl PlanAction for ActionTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn is_achievable_given(&self, state: &FactMap) -> bool {
        ActionTemplate::is_achievable_given(self, state)
    }

    fn effects(&self) -> &FactMap {
        &self.effects
    }
}

impl PlanAction for Arc<ActionTemplate> {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost(&self) -> f32 {
        self.cost
    }

    fn is_achievable_given(&self, state: &FactMap) -> bool {
        ActionTemplate::is_achievable_given(self, state)
    }

    fn effects(&self) -> &FactMap {
        &self.effects
    }
}

impl<H> PlanAction for ActionInstance<H> {
    fn name(&self) -> &str {
        ActionInstance::name(self)
    }

    fn cost(&self) -> f32 {
        self.template().cost
    }

    fn is_achievable(&self) -> bool {
        ActionInstance::is_achievable(self)
    }

    fn is_achievable_given(&self, state: &FactMap) -> bool {
        ActionInstance::is_achievable_given(self, state)
    }

    fn effects(&self) -> &FactMap {
        &self.template().effects
    }
}

/// An ordered sequence of actions, as indices into the slice that was planned over.
///
/// An empty plan is a success: the goal already held in the starting state.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    pub steps: Vec<usize>,
    pub cost: f32,
}

impl Plan {
    pub fn new(steps: Vec<usize>, cost: f32) -> Self {
        Self { steps, cost }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the planned actions, root to goal.
    pub fn names<'a, A: PlanAction>(&self, actions: &'a [A]) -> Vec<&'a str> {
        self.steps
            .iter()
            .filter_map(|&i| actions.get(i).map(PlanAction::name))
            .collect()
    }

    /// `"a -> b -> c"`, or `"<empty>"`.
    pub fn describe<A: PlanAction>(&self, actions: &[A]) -> String {
        if self.steps.is_empty() {
            return "<empty>".to_string();
        }
        self.names(actions).join(" -> ")
    }
}
