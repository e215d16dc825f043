//! Seeded dice for damage rolls, dodge checks, and reward tables.
//!
//! Every roll is a pure function of a seed, so a battle replays identically
//! from its session seed and roll counter. Callers derive per-roll seeds with
//! [`compute_seed`].

use crate::state::DamageRange;

/// Deterministic random source.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }

    /// Uniform integer damage inside `range`.
    fn roll_damage(&self, seed: u64, range: DamageRange) -> u32 {
        self.range(seed, range.min, range.max)
    }

    /// True with probability `percent`/100. `0` never passes, `100` always does.
    fn chance(&self, seed: u64, percent: u32) -> bool {
        percent > 0 && self.roll_d100(seed) <= percent
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
///
/// Stateless; the caller supplies the state as the seed each time.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Purpose tag mixed into a roll seed so two rolls in one step never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollContext {
    PlayerDamage = 0,
    EnemyDamage = 1,
    Dodge = 2,
    Reward = 3,
}

/// Derive the seed for one roll.
///
/// * `session_seed` - fixed at battle creation
/// * `nonce` - battle roll counter, bumped after every roll
/// * `slot` - team or enemy slot doing the rolling
/// * `context` - what the roll is for
pub fn compute_seed(session_seed: u64, nonce: u64, slot: u32, context: RollContext) -> u64 {
    // SplitMix64 / FxHash style mixing constants
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (slot as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_inside_bounds() {
        let rng = PcgRng;
        for nonce in 0..500 {
            let seed = compute_seed(42, nonce, 0, RollContext::PlayerDamage);
            let value = rng.roll_damage(seed, DamageRange::new(10, 15));
            assert!((10..=15).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        assert_eq!(PcgRng.range(7, 10, 10), 10);
        assert_eq!(PcgRng.range(7, 12, 3), 12);
    }

    #[test]
    fn full_width_range_does_not_overflow() {
        for seed in 0..50 {
            let value = PcgRng.range(seed, 0, u32::MAX);
            assert_eq!(value, PcgRng.next_u32(seed));
        }
        assert!(PcgRng.range(3, 1, u32::MAX) >= 1);
    }

    #[test]
    fn chance_edges() {
        let rng = PcgRng;
        for seed in 0..200 {
            assert!(!rng.chance(seed, 0));
            assert!(rng.chance(seed, 100));
        }
    }

    #[test]
    fn contexts_produce_distinct_seeds() {
        let a = compute_seed(1, 1, 0, RollContext::PlayerDamage);
        let b = compute_seed(1, 1, 0, RollContext::Dodge);
        assert_ne!(a, b);
    }
}
