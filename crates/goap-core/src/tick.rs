use crate::{rng, AgentId, SplitMix64};

/// Per-tick inputs shared by every agent in a simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            seed,
        }
    }

    /// Context for the following tick with the same step size and seed.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick + 1,
            ..self
        }
    }

    /// RNG stream derived from the simulation seed, the agent and a caller-chosen stream id.
    ///
    /// The same `(seed, agent, stream, tick)` always yields the same sequence.
    pub fn rng_for_agent(&self, agent: AgentId, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
