use goap_core::{ActionCx, Behavior, EntityId};

use crate::Locomotion;

/// Walk to the action's target.
///
/// The target is the one already assigned to the instance, or else the first active entity
/// carrying the template's `target_tag`. A target found through the tag only lasts for one run,
/// so the next run looks the tag up again. No target means the action cannot start.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoTo {
    from_tag: bool,
}

impl<H: Locomotion> Behavior<H> for GoTo {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        release_tag_target(cx, &mut self.from_tag);
        let target = resolve_target(cx, &mut self.from_tag);
        let moving = move_to(cx, target);
        if !moving {
            release_tag_target(cx, &mut self.from_tag);
        }
        moving
    }

    fn during_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        if let Some(target) = cx.run.target {
            if self.from_tag && !cx.host.is_active(target) {
                release_tag_target(cx, &mut self.from_tag);
            }
        }
        let target = resolve_target(cx, &mut self.from_tag);
        move_to(cx, target);
        true
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        release_tag_target(cx, &mut self.from_tag);
        true
    }

    fn is_complete(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        arrived(&*cx.host)
    }
}

/// Current target, falling back to a tag lookup. Sets `from_tag` when the lookup supplied it.
pub(crate) fn resolve_target<H: Locomotion>(
    cx: &mut ActionCx<'_, H>,
    from_tag: &mut bool,
) -> Option<EntityId> {
    if cx.run.target.is_none() {
        if let Some(tag) = cx.template.target_tag.as_deref() {
            cx.run.target = cx.host.find_with_tag(tag);
            *from_tag = cx.run.target.is_some();
        }
    }
    cx.run.target
}

/// Drop a target that came from the tag lookup. Explicitly assigned targets stay.
pub(crate) fn release_tag_target<H>(cx: &mut ActionCx<'_, H>, from_tag: &mut bool) {
    if *from_tag {
        cx.run.target = None;
        *from_tag = false;
    }
}

/// Point the body at `target`. `false` if there is none or it is unreachable.
pub(crate) fn move_to<H: Locomotion>(cx: &mut ActionCx<'_, H>, target: Option<EntityId>) -> bool {
    match target {
        Some(target) => cx.host.set_destination(target),
        None => false,
    }
}

pub(crate) fn arrived<H: Locomotion>(host: &H) -> bool {
    host.has_path() && !host.path_pending() && host.remaining_distance() < host.stopping_distance()
}
