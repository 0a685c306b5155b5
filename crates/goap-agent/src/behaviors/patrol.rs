use goap_core::{ActionCx, BbKey, Behavior, EntityId};

use super::goto::{arrived, move_to};
use crate::Locomotion;

/// Index of the next waypoint to visit, kept on the agent's blackboard.
pub const WAYPOINT_CURSOR: BbKey<usize> = BbKey::new(0x9A7E_0000_0000_0001);

/// Visit the body's active waypoints in order, then complete.
///
/// Inactive waypoints are left out of the route when the patrol starts. One that goes inactive
/// while the patrol is under way is skipped in favor of the next active one.
#[derive(Debug, Clone, Default)]
pub struct PatrolWaypoints {
    route: Vec<EntityId>,
    advanced: bool,
}

impl PatrolWaypoints {
    /// First active waypoint at or after the cursor. Moves the cursor onto it, or past the end
    /// of the route when there is none.
    fn next_waypoint<H: Locomotion>(&self, cx: &mut ActionCx<'_, H>) -> Option<EntityId> {
        let cursor = cx.blackboard.get_or_insert_with(WAYPOINT_CURSOR, || 0);
        let start = *cursor;
        let found = self
            .route
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, w)| cx.host.is_active(**w));
        match found {
            Some((index, &waypoint)) => {
                if index != start {
                    tracing::debug!(
                        agent = %cx.agent,
                        skipped = index - start,
                        "skipping inactive waypoints"
                    );
                }
                *cursor = index;
                Some(waypoint)
            }
            None => {
                *cursor = self.route.len();
                None
            }
        }
    }

    fn cursor<H>(cx: &ActionCx<'_, H>) -> usize {
        cx.blackboard.get(WAYPOINT_CURSOR).copied().unwrap_or(0)
    }
}

impl<H: Locomotion> Behavior<H> for PatrolWaypoints {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.route = cx
            .host
            .waypoints()
            .into_iter()
            .filter(|&w| cx.host.is_active(w))
            .collect();
        self.advanced = false;

        if self.route.is_empty() {
            tracing::warn!(agent = %cx.agent, "no active waypoints; cannot patrol");
            return false;
        }

        cx.run.target = self.next_waypoint(cx);
        let target = cx.run.target;
        move_to(cx, target)
    }

    fn during_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        if let Some(target) = cx.run.target {
            if !cx.host.is_active(target) {
                cx.run.target = self.next_waypoint(cx);
                let next = cx.run.target;
                move_to(cx, next);
                return true;
            }
        }

        if arrived(&*cx.host) {
            if !self.advanced {
                self.advanced = true;
                *cx.blackboard.get_or_insert_with(WAYPOINT_CURSOR, || 0) += 1;
                cx.run.target = self.next_waypoint(cx);
            }
        } else {
            self.advanced = false;
        }

        let target = cx.run.target;
        if target.is_some() {
            move_to(cx, target);
        }
        true
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        cx.blackboard.set(WAYPOINT_CURSOR, 0);
        cx.run.target = None;
        self.route.clear();
        self.advanced = false;
        true
    }

    fn is_complete(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        Self::cursor(cx) >= self.route.len()
    }
}
