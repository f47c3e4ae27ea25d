//! Deterministic per-actor and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each actor gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (actor_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive actor IDs uniformly across the seed space.
//! This means:
//!
//! - Actors never share RNG state (no ordering dependency between them).
//! - Actors spawned later in the run (by a `Flow`) get seeds independent of
//!   how many actors already exist — runs are reproducible regardless of
//!   spawn order.
//! - All RNG calls for a given actor are local to that actor; the two-pass
//!   tick loop in `mtsim-provider` never needs to serialize RNG access.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ActorId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── ActorRng ─────────────────────────────────────────────────────────────────

/// Per-actor deterministic RNG.
///
/// Every place the simulation draws randomness for one specific actor (cut-in
/// Bernoulli, random depart offset/speed) goes through this type so that the
/// fixed, documented draw order required for determinism is centered here
/// rather than scattered across call sites.
pub struct ActorRng(SmallRng);

impl ActorRng {
    /// Seed deterministically from the run's global seed and an actor ID.
    pub fn new(global_seed: u64, actor: ActorId) -> Self {
        let seed = global_seed ^ actor.0.wrapping_mul(MIXING_CONSTANT);
        ActorRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
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

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Sample a normal-ish speed factor: `N(mean, dev)` approximated via the
    /// sum of two uniforms (Irwin-Hall), floored at 0.1 as the original
    /// implementation does to avoid near-zero or negative speed factors.
    pub fn gen_speed_factor(&mut self, mean: f64, dev: f64) -> f64 {
        if dev <= 0.0 {
            return mean.max(0.1);
        }
        let u1 = self.0.gen_range(-1.0f64..1.0);
        let u2 = self.0.gen_range(-1.0f64..1.0);
        (mean + dev * 0.5 * (u1 + u2)).max(0.1)
    }

    /// Choose a random element from a non-empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ───────────────────────────────────────────────────────────────────

/// Process-local RNG seeded once by the host at `setup`, used for operations
/// not tied to one specific actor (spawn-accept ordering, teleport retries).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

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

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
