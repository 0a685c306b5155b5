#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use goap_core::{ActionCx, ActionInstance, ActionKind, ActionTemplate, Behavior, TickContext};

/// Records every lifecycle call it sees.
#[derive(Debug, Default)]
pub struct Recorder {
    pub log: Vec<String>,
    pub posts: BTreeMap<String, u32>,
}

impl Recorder {
    pub fn posts_of(&self, action: &str) -> u32 {
        self.posts.get(action).copied().unwrap_or(0)
    }
}

/// Completes after being polled `complete_after` times while running.
pub struct Scripted {
    pub complete_after: u32,
    pub start_ok: bool,
    polls: u32,
}

impl Scripted {
    pub fn new(complete_after: u32) -> Self {
        Self {
            complete_after,
            start_ok: true,
            polls: 0,
        }
    }

    pub fn never_completes() -> Self {
        Self::new(u32::MAX)
    }

    pub fn refuses_to_start() -> Self {
        Self {
            start_ok: false,
            ..Self::new(0)
        }
    }
}

impl Behavior<Recorder> for Scripted {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, Recorder>) -> bool {
        self.polls = 0;
        cx.host.log.push(format!("pre:{}", cx.template.name));
        self.start_ok
    }

    fn during_action(&mut self, cx: &mut ActionCx<'_, Recorder>) -> bool {
        self.polls = self.polls.saturating_add(1);
        cx.host.log.push(format!("during:{}", cx.template.name));
        true
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, Recorder>) -> bool {
        self.polls = 0;
        cx.host.log.push(format!("post:{}", cx.template.name));
        *cx.host.posts.entry(cx.template.name.clone()).or_default() += 1;
        true
    }

    fn is_complete(&mut self, _cx: &mut ActionCx<'_, Recorder>) -> bool {
        self.polls >= self.complete_after
    }
}

pub fn template(name: &str) -> ActionTemplate {
    ActionTemplate::new(name, ActionKind::Animate)
}

pub fn scripted(template: ActionTemplate, behavior: Scripted) -> ActionInstance<Recorder> {
    ActionInstance::new(Arc::new(template), Box::new(behavior))
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.25, 42)
}
