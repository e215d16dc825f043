//! Timed-reaction meter.
//!
//! A bar fills one cell per tick. The player must stop it in the last two
//! cells, or inside the success window that closes shortly after the bar is
//! full.

/// Timing of one reaction stage, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionSpec {
    pub duration_ms: u64,
    pub tick_ms: u64,
    /// Trailing span before `duration_ms` where a signal always succeeds.
    pub window_ms: u64,
}

impl ReactionSpec {
    pub const DEFAULT_DURATION_MS: u64 = 10_000;
    pub const DEFAULT_TICK_MS: u64 = 1_000;
    pub const DEFAULT_WINDOW_MS: u64 = 1_000;

    /// Number of cells in the meter.
    pub fn bar_len(&self) -> u64 {
        self.duration_ms.div_ceil(self.tick_ms.max(1)).max(1)
    }

    /// Filled cells after `elapsed_ms`, between 1 and [`Self::bar_len`].
    pub fn step_at(&self, elapsed_ms: u64) -> u64 {
        elapsed_ms
            .div_ceil(self.tick_ms.max(1))
            .clamp(1, self.bar_len())
    }
}

impl Default for ReactionSpec {
    fn default() -> Self {
        Self {
            duration_ms: Self::DEFAULT_DURATION_MS,
            tick_ms: Self::DEFAULT_TICK_MS,
            window_ms: Self::DEFAULT_WINDOW_MS,
        }
    }
}

/// Result of the player's signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionVerdict {
    Success,
    TooEarly,
    TooLate,
}

/// Judges a signal that arrived `elapsed_ms` after the meter started.
pub fn judge_reaction(spec: &ReactionSpec, elapsed_ms: u64, grace_ms: u64) -> ReactionVerdict {
    if elapsed_ms > spec.duration_ms + grace_ms {
        return ReactionVerdict::TooLate;
    }
    let in_last_cells = spec.step_at(elapsed_ms) + 1 >= spec.bar_len();
    let in_window = elapsed_ms >= spec.duration_ms.saturating_sub(spec.window_ms);
    if in_last_cells || in_window {
        ReactionVerdict::Success
    } else {
        ReactionVerdict::TooEarly
    }
}
