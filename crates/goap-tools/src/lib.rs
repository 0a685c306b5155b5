//! Deterministic trace events for GOAP agents.
//!
//! Planner calls, goal switches and action lifecycle transitions are recorded as small events on
//! the agent's blackboard so tooling can replay what an agent decided and when.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{emit, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK};
