use goap_core::{ActionCx, Behavior, DeterministicRng};

use crate::Animator;

/// Play a clip in place for a fixed amount of running time.
#[derive(Debug, Clone)]
pub struct Animate {
    clip: String,
    clip_seconds: f32,
    elapsed: f32,
    done: bool,
}

impl Animate {
    pub fn new(clip: impl Into<String>, clip_seconds: f32) -> Self {
        Self {
            clip: clip.into(),
            clip_seconds,
            elapsed: 0.0,
            done: false,
        }
    }
}

impl<H: Animator> Behavior<H> for Animate {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.elapsed = 0.0;
        self.done = false;
        cx.host.play(&self.clip);
        true
    }

    fn during_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.elapsed += cx.tick.dt_seconds;
        if self.elapsed >= self.clip_seconds {
            self.done = true;
        }
        true
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        cx.host.stop();
        self.elapsed = 0.0;
        self.done = false;
        true
    }

    fn is_complete(&mut self, _cx: &mut ActionCx<'_, H>) -> bool {
        self.done
    }
}

const LOOK_STREAM: u64 = 0x1D1E;

/// Stand around looking in random directions.
///
/// Every `time_between_looks` seconds the body turns by a yaw drawn from
/// `[min_angle, max_angle)`; after `idle_seconds` the action completes.
#[derive(Debug, Clone)]
pub struct Idle {
    pub idle_seconds: f32,
    pub time_between_looks: f32,
    pub min_angle: f32,
    pub max_angle: f32,
    elapsed: f32,
    since_look: f32,
    looks: u64,
    done: bool,
}

impl Idle {
    pub const DEFAULT: Idle = Idle {
        idle_seconds: 3.0,
        time_between_looks: 1.5,
        min_angle: 45.0,
        max_angle: 180.0,
        elapsed: 0.0,
        since_look: 0.0,
        looks: 0,
        done: false,
    };

    pub fn new(idle_seconds: f32, time_between_looks: f32, min_angle: f32, max_angle: f32) -> Self {
        Self {
            idle_seconds,
            time_between_looks,
            min_angle,
            max_angle,
            ..Self::DEFAULT
        }
    }

    fn look<H: Animator>(&mut self, cx: &mut ActionCx<'_, H>) {
        let mut rng = cx.tick.rng_for_agent(cx.agent, LOOK_STREAM ^ self.looks);
        let yaw = rng.range_f32(self.min_angle, self.max_angle);
        cx.host.look_toward(yaw);
        self.looks = self.looks.wrapping_add(1);
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.since_look = 0.0;
        self.done = false;
    }
}

impl Default for Idle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<H: Animator> Behavior<H> for Idle {
    fn pre_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.reset();
        cx.host.play("idle");
        self.look(cx);
        true
    }

    fn during_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        self.elapsed += cx.tick.dt_seconds;
        self.since_look += cx.tick.dt_seconds;

        if self.since_look >= self.time_between_looks {
            self.since_look = 0.0;
            self.look(cx);
        }
        if self.elapsed > self.idle_seconds {
            cx.host.stop();
            self.done = true;
        }
        true
    }

    fn post_action(&mut self, cx: &mut ActionCx<'_, H>) -> bool {
        cx.host.stop();
        self.reset();
        true
    }

    fn is_complete(&mut self, _cx: &mut ActionCx<'_, H>) -> bool {
        self.done
    }
}
