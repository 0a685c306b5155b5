//! Forward-chaining GOAP planner producing least-cost action sequences.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod plan;
pub mod planner;

pub use plan::{Plan, PlanAction};
pub use planner::{PlanStats, Planner, PlannerConfig};
