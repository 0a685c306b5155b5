use goap_core::{ActionCx, Behavior};

use super::goto::{release_tag_target, resolve_target};
use crate::{Interactor, Locomotion};

/// Use the action's target (a switch, a door panel).
///
/// By default the interaction is retried every tick until the host reports it happened.
/// [`UseObject::immediate`] interacts once on start and fails the action if that does not work.
/// Targets found through the template's tag are looked up afresh on every run.
#[derive(Debug, Clone, Default)]
pub struct UseObject {
    immediate: bool,
    used: bool,
    from_tag: bool,
}

impl UseObject {
    pub fn immediate() -> Self {
        Self {
            immediate: true,
            ..Self::default()
        }
    }
}

impl<H: Locomotion + Interactor> Behavior<H> for UseObject {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.used = false;
        release_tag_target(cx, &mut self.from_tag);
        let Some(target) = resolve_target(cx, &mut self.from_tag) else {
            tracing::warn!(agent = %cx.agent, action = %cx.template.name, "nothing to use");
            return false;
        };
        if self.immediate {
            self.used = cx.host.interact(target);
            if !self.used {
                release_tag_target(cx, &mut self.from_tag);
            }
            return self.used;
        }
        true
    }

    fn during_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        if !self.used {
            if let Some(target) = cx.run.target {
                self.used = cx.host.interact(target);
            }
        }
        true
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.used = false;
        release_tag_target(cx, &mut self.from_tag);
        true
    }

    fn is_complete(&mut self, _cx: &mut ActionCx<'_, H>) -> bool {
        self.used
    }
}
