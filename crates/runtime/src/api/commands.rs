//! Player input and terminal reasons.
use std::fmt;

use game_core::BattleAction;

/// One player choice, routed to the session that owns the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Dismiss a narrative screen.
    Continue,
    /// Stop the reaction meter.
    Signal,
    /// Act in the current fight.
    Act(BattleAction),
    /// Claim the reward screen.
    Claim,
}

impl PlayerCommand {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Signal => "signal",
            Self::Act(_) => "act",
            Self::Claim => "claim",
        }
    }
}

/// Why a session ended in defeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefeatReason {
    TeamDefeated,
    TurnTimeout,
    IdleTimeout,
    /// The reaction meter ran out without a signal.
    ReactionTimeout,
    /// The player signalled before the meter was in range.
    MissedReaction,
}

impl DefeatReason {
    pub const fn is_timeout(self) -> bool {
        matches!(
            self,
            Self::TurnTimeout | Self::IdleTimeout | Self::ReactionTimeout
        )
    }
}

impl fmt::Display for DefeatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DefeatReason::TeamDefeated => "team defeated",
            DefeatReason::TurnTimeout => "timeout: turn",
            DefeatReason::IdleTimeout => "timeout: idle",
            DefeatReason::ReactionTimeout => "timeout: reaction",
            DefeatReason::MissedReaction => "missed reaction",
        };
        write!(f, "{}", label)
    }
}
