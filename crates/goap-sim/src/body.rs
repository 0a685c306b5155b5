use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use goap_agent::{Animator, Interactor, Locomotion};
use goap_core::EntityId;

use crate::Vec2;

/// How far past its stopping distance a body can reach to use something.
const INTERACT_SLACK: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub tag: Option<String>,
    pub position: Vec2,
    pub active: bool,
    /// Successful interactions so far.
    pub uses: u32,
}

/// Every entity in the level, keyed by id. Ids are handed out in insertion order from 1.
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: BTreeMap<EntityId, Entity>,
    by_name: BTreeMap<String, EntityId>,
}

/// The table is shared by every body in a simulation, which runs on one thread.
pub type SharedEntities = Rc<RefCell<EntityTable>>;

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedEntities {
        Rc::new(RefCell::new(self))
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        tag: Option<String>,
        position: Vec2,
        active: bool,
    ) -> EntityId {
        let id = EntityId(self.entities.len() as u64 + 1);
        let name = name.into();
        self.by_name.insert(name.clone(), id);
        self.entities.insert(
            id,
            Entity {
                id,
                name,
                tag,
                position,
                active,
                uses: 0,
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Entity> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Lowest-id active entity carrying `tag`.
    pub fn find_with_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.active && e.tag.as_deref() == Some(tag))
            .map(|e| e.id)
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.active)
    }

    /// Returns `false` if there is no such entity.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.active = active;
                true
            }
            None => false,
        }
    }

    fn record_use(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.uses += 1;
        }
    }
}

/// A point that walks in straight lines toward entities in a shared [`EntityTable`].
///
/// Paths are resolved instantly, so `path_pending` is always `false`. Movement happens in
/// [`KinematicBody::step`], which the simulation calls after the agent's tick.
#[derive(Debug)]
pub struct KinematicBody {
    entities: SharedEntities,
    position: Vec2,
    speed: f32,
    stopping_distance: f32,
    destination: Option<EntityId>,
    waypoints: Vec<EntityId>,
    clip: Option<String>,
    heading_degrees: f32,
}

impl KinematicBody {
    pub fn new(entities: SharedEntities, position: Vec2) -> Self {
        Self {
            entities,
            position,
            speed: 3.5,
            stopping_distance: 0.5,
            destination: None,
            waypoints: Vec::new(),
            clip: None,
            heading_degrees: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.stopping_distance = distance;
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<EntityId>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn destination(&self) -> Option<EntityId> {
        self.destination
    }

    /// Clip currently playing, if any.
    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }

    /// Advance toward the destination by `speed * dt_seconds`.
    pub fn step(&mut self, dt_seconds: f32) {
        let Some(target) = self.destination_position() else {
            return;
        };
        let stride = self.speed.max(0.0) * dt_seconds.max(0.0);
        self.position = self.position.move_towards(target, stride);
    }

    fn destination_position(&self) -> Option<Vec2> {
        let id = self.destination?;
        self.entities.borrow().get(id).map(|e| e.position)
    }
}

impl Locomotion for KinematicBody {
    fn find_with_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities.borrow().find_with_tag(tag)
    }

    fn is_active(&self, entity: EntityId) -> bool {
        self.entities.borrow().is_active(entity)
    }

    fn set_destination(&mut self, entity: EntityId) -> bool {
        if !self.is_active(entity) {
            return false;
        }
        self.destination = Some(entity);
        true
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        self.destination_position()
            .map_or(0.0, |target| self.position.distance(target))
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn waypoints(&self) -> Vec<EntityId> {
        self.waypoints.clone()
    }
}

impl Animator for KinematicBody {
    fn play(&mut self, clip: &str) {
        self.clip = Some(clip.to_string());
    }

    fn stop(&mut self) {
        self.clip = None;
    }

    fn look_toward(&mut self, yaw_degrees: f32) {
        self.heading_degrees = (self.heading_degrees + yaw_degrees).rem_euclid(360.0);
    }
}

impl Interactor for KinematicBody {
    fn interact(&mut self, entity: EntityId) -> bool {
        let mut entities = self.entities.borrow_mut();
        let Some(target) = entities.get(entity) else {
            return false;
        };
        let reach = self.stopping_distance + INTERACT_SLACK;
        if !target.active || self.position.distance(target.position) > reach {
            return false;
        }
        entities.record_use(entity);
        true
    }
}
