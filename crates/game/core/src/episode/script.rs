//! Authored episode content.

use crate::reward::RewardTable;
use crate::state::DamageRange;

use super::ReactionSpec;

/// Difficulty tier chosen by the player. Scales enemies and gates rewards.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Stars recorded for clearing an episode at this tier.
    pub const fn stars(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

/// What the player sees when a stage is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Presentation {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpecialTemplate {
    pub name: String,
    pub range: DamageRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub opening: bool,
}

/// Unscaled enemy stats as written in the script.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub health: u32,
    pub attack: DamageRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: Option<EnemySpecialTemplate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageKind {
    /// Flavor text; waits for the player to continue.
    Narrative,
    TimedReaction(ReactionSpec),
    Fight {
        enemies: Vec<EnemyTemplate>,
        #[cfg_attr(feature = "serde", serde(default))]
        rewards: Option<RewardTable>,
    },
    /// Terminal screen; claiming it wins the episode.
    Reward,
}

impl StageKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::TimedReaction(_) => "timed-reaction",
            Self::Fight { .. } => "fight",
            Self::Reward => "reward",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stage {
    pub presentation: Presentation,
    pub kind: StageKind,
}

/// One episode's ordered stage list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeScript {
    pub number: u32,
    pub title: String,
    /// Granted on victory and previewed on narrative stages.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: RewardTable,
    pub stages: Vec<Stage>,
}
