//! Stage director: a cursor over an episode script.
//!
//! The director decides which stage is active and materializes fight rosters.
//! It never resolves turns; the runtime hands fights to
//! [`crate::engine::TurnResolver`] and reports back when a stage is done.

use crate::config::BattleConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::reward::RewardTable;
use crate::state::{BattleState, FightOutcome};
use crate::stats::scale_enemy;

use super::{Difficulty, EpisodeScript, ReactionSpec, Stage, StageKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DirectorError {
    #[error("expected a {expected} stage but the episode is on a {actual} stage")]
    WrongStage {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("the fight is still in progress")]
    FightInProgress,

    #[error("the episode is already complete")]
    EpisodeComplete,
}

impl GameError for DirectorError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongStage { .. } => "DIRECTOR_WRONG_STAGE",
            Self::FightInProgress => "DIRECTOR_FIGHT_IN_PROGRESS",
            Self::EpisodeComplete => "DIRECTOR_EPISODE_COMPLETE",
        }
    }
}

/// How the active stage should be presented after [`StageDirector::enter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageView {
    Narrative,
    TimedReaction(ReactionSpec),
    /// `fresh` is true only on the call that spawned the roster.
    Fight { fresh: bool },
    Reward,
    /// Past the last stage; the episode is won.
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageDirector {
    script: EpisodeScript,
    difficulty: Difficulty,
    index: usize,
    /// Stages entered so far.
    phase: u32,
    entered: bool,
    cleared_rewards: Vec<RewardTable>,
}

impl StageDirector {
    pub fn new(script: EpisodeScript, difficulty: Difficulty) -> Self {
        Self {
            script,
            difficulty,
            index: 0,
            phase: 0,
            entered: false,
            cleared_rewards: Vec::new(),
        }
    }

    pub fn script(&self) -> &EpisodeScript {
        &self.script
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn stage_index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn current(&self) -> Option<&Stage> {
        self.script.stages.get(self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.script.stages.len()
    }

    /// Enters the active stage.
    ///
    /// Re-entering the same stage (a re-render) is a no-op for state: fight
    /// rosters are spawned and difficulty-scaled only on the first call.
    pub fn enter(&mut self, state: &mut BattleState, config: &BattleConfig) -> StageView {
        let first_entry = !self.entered;
        let difficulty = self.difficulty;
        let Some(stage) = self.script.stages.get(self.index) else {
            return StageView::Complete;
        };

        if first_entry {
            self.entered = true;
            self.phase += 1;
        }

        match &stage.kind {
            StageKind::Narrative => StageView::Narrative,
            StageKind::TimedReaction(spec) => StageView::TimedReaction(*spec),
            StageKind::Reward => StageView::Reward,
            StageKind::Fight { enemies, .. } => {
                if first_entry {
                    let roster = enemies
                        .iter()
                        .map(|template| scale_enemy(template, difficulty, config))
                        .collect();
                    state.begin_fight(roster);
                }
                StageView::Fight { fresh: first_entry }
            }
        }
    }

    fn expect(&self, expected: &'static str) -> Result<&Stage, DirectorError> {
        let stage = self.current().ok_or(DirectorError::EpisodeComplete)?;
        if stage.kind.label() != expected {
            return Err(DirectorError::WrongStage {
                expected,
                actual: stage.kind.label(),
            });
        }
        Ok(stage)
    }

    fn advance(&mut self) {
        self.index += 1;
        self.entered = false;
    }

    /// The player dismissed a narrative stage.
    pub fn continue_narrative(&mut self) -> Result<(), DirectorError> {
        self.expect("narrative")?;
        self.advance();
        Ok(())
    }

    /// The player stopped the reaction meter in time.
    pub fn reaction_succeeded(&mut self) -> Result<(), DirectorError> {
        self.expect("timed-reaction")?;
        self.advance();
        Ok(())
    }

    /// Leaves a fight once its roster is cleared, banking its reward table.
    pub fn complete_fight(&mut self, state: &BattleState) -> Result<(), DirectorError> {
        let stage = self.expect("fight")?;
        if state.outcome() != Some(FightOutcome::EnemiesCleared) {
            return Err(DirectorError::FightInProgress);
        }
        let banked = match &stage.kind {
            StageKind::Fight {
                rewards: Some(table),
                ..
            } => Some(table.clone()),
            _ => None,
        };
        self.cleared_rewards.extend(banked);
        self.advance();
        Ok(())
    }

    /// The player claimed the reward screen.
    pub fn claim(&mut self) -> Result<(), DirectorError> {
        self.expect("reward")?;
        self.advance();
        Ok(())
    }

    /// Every table a victory should roll: the episode's own, then each
    /// cleared fight's, in order.
    pub fn victory_tables(&self) -> Vec<&RewardTable> {
        std::iter::once(&self.script.rewards)
            .chain(self.cleared_rewards.iter())
            .collect()
    }
}
