//! Capabilities the surrounding simulation provides to built-in behaviors.
//!
//! The agent loop itself needs none of these; only the behaviors in [`crate::behaviors`] do.

use goap_core::EntityId;

/// Path-following movement.
pub trait Locomotion {
    fn find_with_tag(&self, tag: &str) -> Option<EntityId>;

    fn is_active(&self, entity: EntityId) -> bool;

    /// Start moving toward `entity`. Returns `false` if it cannot be reached.
    fn set_destination(&mut self, entity: EntityId) -> bool;

    fn has_path(&self) -> bool;

    fn path_pending(&self) -> bool;

    fn remaining_distance(&self) -> f32;

    fn stopping_distance(&self) -> f32;

    /// Patrol route assigned to this body, in visiting order.
    fn waypoints(&self) -> Vec<EntityId>;
}

pub trait Animator {
    fn play(&mut self, clip: &str);

    fn stop(&mut self);

    /// Turn to face `yaw_degrees` relative to the current heading.
    fn look_toward(&mut self, yaw_degrees: f32);
}

pub trait Interactor {
    /// Use `entity`. Returns `true` once the interaction has happened.
    fn interact(&mut self, entity: EntityId) -> bool;
}

/// Everything the built-in behaviors need.
pub trait Host: Locomotion + Animator + Interactor + 'static {}

impl<T> Host for T where T: Locomotion + Animator + Interactor + 'static {}
