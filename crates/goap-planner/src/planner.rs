use goap_core::{merge_effects, satisfies, FactMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Plan, PlanAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Upper bound on search nodes per call. `None` searches the whole space, which is finite
    /// because an action never repeats within a branch.
    pub max_nodes: Option<usize>,
}

/// Counters from one planning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub nodes: usize,
    pub leaves: usize,
    /// The node budget ran out before the search space was exhausted.
    pub truncated: bool,
}

/// Forward-chaining planner.
///
/// Every call searches from scratch; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

struct Node {
    parent: Option<usize>,
    cost: f32,
    state: FactMap,
    action: Option<usize>,
}

struct Frame {
    node: usize,
    remaining: Vec<usize>,
    cursor: usize,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> PlannerConfig {
        self.config
    }

    /// Cheapest action sequence taking `world` to a state where every key of `goal` is present.
    ///
    /// `Some(empty)` if `world` already satisfies `goal`; `None` if no sequence does.
    pub fn plan<A: PlanAction>(
        &self,
        actions: &[A],
        goal: &FactMap,
        world: &FactMap,
    ) -> Option<Plan> {
        self.plan_with_stats(actions, goal, world).0
    }

    pub fn plan_with_stats<A: PlanAction>(
        &self,
        actions: &[A],
        goal: &FactMap,
        world: &FactMap,
    ) -> (Option<Plan>, PlanStats) {
        let goal_name = goal.keys().next().map(String::as_str).unwrap_or("<none>");
        let mut stats = PlanStats::default();

        let achievable: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_achievable())
            .map(|(i, _)| i)
            .collect();

        let mut arena = vec![Node {
            parent: None,
            cost: 0.0,
            state: world.clone(),
            action: None,
        }];
        stats.nodes = 1;

        if satisfies(&arena[0].state, goal) {
            tracing::debug!(goal = goal_name, "goal already satisfied; empty plan");
            return (Some(Plan::empty()), stats);
        }

        // Pre-order depth-first expansion. Each frame walks the actions still unused on its
        // branch; leaves are collected in discovery order.
        let mut leaves: Vec<usize> = Vec::new();
        let mut stack = vec![Frame {
            node: 0,
            remaining: achievable,
            cursor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&action_idx) = frame.remaining.get(frame.cursor) else {
                stack.pop();
                continue;
            };
            frame.cursor += 1;

            let parent = frame.node;
            let action = &actions[action_idx];
            if !action.is_achievable_given(&arena[parent].state) {
                continue;
            }

            if let Some(max) = self.config.max_nodes {
                if arena.len() >= max {
                    stats.truncated = true;
                    break;
                }
            }

            let mut state = arena[parent].state.clone();
            merge_effects(&mut state, action.effects());
            let reached = satisfies(&state, goal);
            let remaining: Vec<usize> = if reached {
                Vec::new()
            } else {
                frame
                    .remaining
                    .iter()
                    .copied()
                    .filter(|&i| i != action_idx)
                    .collect()
            };

            arena.push(Node {
                parent: Some(parent),
                cost: arena[parent].cost + action.cost(),
                state,
                action: Some(action_idx),
            });
            let child = arena.len() - 1;

            if reached {
                leaves.push(child);
            } else {
                stack.push(Frame {
                    node: child,
                    remaining,
                    cursor: 0,
                });
            }
        }

        stats.nodes = arena.len();
        stats.leaves = leaves.len();

        // Strict `<`: on equal cost the first leaf found wins.
        let mut cheapest: Option<usize> = None;
        for &leaf in &leaves {
            match cheapest {
                Some(best) if arena[leaf].cost >= arena[best].cost => {}
                _ => cheapest = Some(leaf),
            }
        }

        let Some(leaf) = cheapest else {
            tracing::debug!(
                goal = goal_name,
                nodes = stats.nodes,
                truncated = stats.truncated,
                "no plan found"
            );
            return (None, stats);
        };

        let mut steps = Vec::new();
        let mut cursor = Some(leaf);
        while let Some(idx) = cursor {
            let node = &arena[idx];
            if let Some(action) = node.action {
                steps.push(action);
            }
            cursor = node.parent;
        }
        steps.reverse();

        let plan = Plan::new(steps, arena[leaf].cost);
        tracing::debug!(
            goal = goal_name,
            cost = plan.cost,
            nodes = stats.nodes,
            "plan: {}",
            plan.describe(actions)
        );
        (Some(plan), stats)
    }
}
