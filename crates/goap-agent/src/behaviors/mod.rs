//! Built-in behaviors and the authoring-data factory that turns templates into instances.

mod animate;
mod goto;
mod patrol;
mod use_object;

use std::sync::Arc;

use goap_core::{ActionInstance, ActionKind, ActionTemplate, Behavior};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Host;

pub use animate::{Animate, Idle};
pub use goto::GoTo;
pub use patrol::{PatrolWaypoints, WAYPOINT_CURSOR};
pub use use_object::UseObject;

/// Authoring parameters selecting and configuring a built-in behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "behavior", rename_all = "snake_case"))]
pub enum BehaviorParams {
    GoTo,
    PatrolWaypoints,
    Animate {
        clip: String,
        seconds: f32,
    },
    Idle {
        #[cfg_attr(feature = "serde", serde(default = "default_idle_seconds"))]
        idle_seconds: f32,
        #[cfg_attr(feature = "serde", serde(default = "default_time_between_looks"))]
        time_between_looks: f32,
        #[cfg_attr(feature = "serde", serde(default = "default_min_angle"))]
        min_angle: f32,
        #[cfg_attr(feature = "serde", serde(default = "default_max_angle"))]
        max_angle: f32,
    },
    UseObject,
    UseButton,
}

#[cfg(feature = "serde")]
fn default_idle_seconds() -> f32 {
    Idle::DEFAULT.idle_seconds
}

#[cfg(feature = "serde")]
fn default_time_between_looks() -> f32 {
    Idle::DEFAULT.time_between_looks
}

#[cfg(feature = "serde")]
fn default_min_angle() -> f32 {
    Idle::DEFAULT.min_angle
}

#[cfg(feature = "serde")]
fn default_max_angle() -> f32 {
    Idle::DEFAULT.max_angle
}

impl BehaviorParams {
    /// Behavior class this parameter set belongs to.
    pub fn kind(&self) -> ActionKind {
        match self {
            BehaviorParams::GoTo | BehaviorParams::PatrolWaypoints => ActionKind::GoTo,
            BehaviorParams::Animate { .. } | BehaviorParams::Idle { .. } => ActionKind::Animate,
            BehaviorParams::UseObject | BehaviorParams::UseButton => ActionKind::UseObject,
        }
    }

    pub fn build<H: Host>(&self) -> Box<dyn Behavior<H>> {
        match self {
            BehaviorParams::GoTo => Box::new(GoTo::default()),
            BehaviorParams::PatrolWaypoints => Box::new(PatrolWaypoints::default()),
            BehaviorParams::Animate { clip, seconds } => {
                Box::new(Animate::new(clip.clone(), *seconds))
            }
            BehaviorParams::Idle {
                idle_seconds,
                time_between_looks,
                min_angle,
                max_angle,
            } => Box::new(Idle::new(
                *idle_seconds,
                *time_between_looks,
                *min_angle,
                *max_angle,
            )),
            BehaviorParams::UseObject => Box::new(UseObject::default()),
            BehaviorParams::UseButton => Box::new(UseObject::immediate()),
        }
    }
}

/// Give an agent its own instance of a shared template.
pub fn instantiate<H: Host>(
    template: Arc<ActionTemplate>,
    params: &BehaviorParams,
) -> ActionInstance<H> {
    if template.kind != params.kind() {
        tracing::warn!(
            action = %template.name,
            template_kind = ?template.kind,
            behavior_kind = ?params.kind(),
            "action kind does not match its behavior"
        );
    }
    ActionInstance::new(template, params.build())
}
