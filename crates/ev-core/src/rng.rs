//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! Each evacuee owns an independent `SmallRng` seeded by
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! so an agent's schedule jitter, building picks, and response delay depend
//! only on the run seed and its own id, never on activation order.  The
//! model-level [`SimRng`] drives the per-tick shuffle and setup-time draws.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Shared sampling helpers for both wrappers.
macro_rules! sampling_helpers {
    ($name:ident) => {
        impl $name {
            /// Expose the inner `SmallRng` for `rand` distribution types.
            #[inline]
            pub fn inner(&mut self) -> &mut SmallRng {
                &mut self.0
            }

            #[inline]
            pub fn gen_range<T, R>(&mut self, range: R) -> T
            where
                T: rand::distributions::uniform::SampleUniform,
                R: rand::distributions::uniform::SampleRange<T>,
            {
                self.0.gen_range(range)
            }

            /// `true` with probability `p` (clamped to [0, 1]).
            #[inline]
            pub fn gen_bool(&mut self, p: f64) -> bool {
                self.0.gen_bool(p.clamp(0.0, 1.0))
            }

            /// Draw from `Normal(mean, std_dev)`.  A negative or NaN
            /// deviation degenerates to `mean`.
            pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
                match Normal::new(mean, std_dev) {
                    Ok(dist) => dist.sample(&mut self.0),
                    Err(_)   => mean,
                }
            }

            /// Index drawn proportionally to `weights`.  `None` when the
            /// slice is empty or every weight is zero.
            pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
                WeightedIndex::new(weights)
                    .ok()
                    .map(|dist| dist.sample(&mut self.0))
            }

            #[inline]
            pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
                use rand::seq::SliceRandom;
                slice.choose(&mut self.0)
            }

            #[inline]
            pub fn shuffle<T>(&mut self, slice: &mut [T]) {
                use rand::seq::SliceRandom;
                slice.shuffle(&mut self.0);
            }
        }
    };
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed from the run's global seed and an agent id.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ u64::from(agent.0).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }
}

sampling_helpers!(AgentRng);

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Model-level RNG: activation-order shuffle and population setup.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream, e.g. one for setup and one for the
    /// tick loop, so adding setup draws does not perturb the run.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

sampling_helpers!(SimRng);
