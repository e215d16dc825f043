//! Reward tables attached to episodes and fight stages.

use crate::env::{RngOracle, RollContext, compute_seed};
use crate::episode::Difficulty;

/// Treasure chest tier, lowest first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ChestRank {
    C,
    B,
    A,
    S,
}

impl ChestRank {
    const LADDER: [Self; 4] = [Self::C, Self::B, Self::A, Self::S];

    /// Rank for a zero-based bracket index; anything past the top is `S`.
    pub fn for_bracket(bracket: u32) -> Self {
        Self::LADDER
            .get(bracket as usize)
            .copied()
            .unwrap_or(Self::S)
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::C => None,
            Self::B => Some(Self::C),
            Self::A => Some(Self::B),
            Self::S => Some(Self::A),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardKind {
    Currency { min: u32, max: u32 },
    Chest { rank: ChestRank, min: u32, max: u32 },
    ResetToken { amount: u32 },
    Card { card_id: String },
    Blueprint { name: String, amount: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardEntry {
    pub kind: RewardKind,
    /// Lowest difficulty at which the entry is eligible.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_difficulty: Difficulty,
    #[cfg_attr(feature = "serde", serde(default = "RewardEntry::certain"))]
    pub chance_percent: u32,
}

impl RewardEntry {
    pub fn always(kind: RewardKind) -> Self {
        Self {
            kind,
            min_difficulty: Difficulty::Easy,
            chance_percent: Self::certain(),
        }
    }

    pub fn with_chance(mut self, percent: u32) -> Self {
        self.chance_percent = percent;
        self
    }

    pub fn from_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.min_difficulty = difficulty;
        self
    }

    const fn certain() -> u32 {
        100
    }

    pub fn eligible(&self, difficulty: Difficulty) -> bool {
        difficulty >= self.min_difficulty
    }
}

/// A concrete reward after rolling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Grant {
    Currency(u64),
    Chest { rank: ChestRank, amount: u32 },
    ResetTokens(u32),
    Card(String),
    Blueprint { name: String, amount: u32 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTable {
    #[cfg_attr(feature = "serde", serde(default))]
    pub entries: Vec<RewardEntry>,
}

impl RewardTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries a player at `difficulty` could receive, for narrative previews.
    pub fn preview(&self, difficulty: Difficulty) -> impl Iterator<Item = &RewardEntry> {
        self.entries.iter().filter(move |e| e.eligible(difficulty))
    }

    /// Rolls every eligible entry. Each entry draws from its own seed, so
    /// adding an entry never shifts the rolls of the ones before it.
    pub fn roll(&self, difficulty: Difficulty, rng: &dyn RngOracle, seed: u64) -> Vec<Grant> {
        let mut grants = Vec::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            if !entry.eligible(difficulty) {
                continue;
            }
            let nonce = idx as u64;
            if !rng.chance(compute_seed(seed, nonce, 0, RollContext::Reward), entry.chance_percent) {
                continue;
            }
            let amount_seed = compute_seed(seed, nonce, 1, RollContext::Reward);
            let grant = match &entry.kind {
                RewardKind::Currency { min, max } => {
                    Grant::Currency(u64::from(rng.range(amount_seed, *min, *max)))
                }
                RewardKind::Chest { rank, min, max } => Grant::Chest {
                    rank: *rank,
                    amount: rng.range(amount_seed, *min, *max),
                },
                RewardKind::ResetToken { amount } => Grant::ResetTokens(*amount),
                RewardKind::Card { card_id } => Grant::Card(card_id.clone()),
                RewardKind::Blueprint { name, amount } => Grant::Blueprint {
                    name: name.clone(),
                    amount: *amount,
                },
            };
            grants.push(grant);
        }
        grants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    fn table() -> RewardTable {
        RewardTable {
            entries: vec![
                RewardEntry::always(RewardKind::Currency { min: 50, max: 80 }),
                RewardEntry::always(RewardKind::Chest {
                    rank: ChestRank::B,
                    min: 1,
                    max: 1,
                })
                .from_difficulty(Difficulty::Hard),
                RewardEntry::always(RewardKind::ResetToken { amount: 1 }).with_chance(0),
                RewardEntry::always(RewardKind::Card {
                    card_id: "koby".into(),
                }),
            ],
        }
    }

    #[test]
    fn difficulty_gates_entries() {
        assert_eq!(table().preview(Difficulty::Medium).count(), 3);
        assert_eq!(table().preview(Difficulty::Hard).count(), 4);

        let grants = table().roll(Difficulty::Easy, &PcgRng, 99);
        assert_eq!(grants.len(), 2);
        assert!(matches!(grants[0], Grant::Currency(50..=80)));
        assert_eq!(grants[1], Grant::Card("koby".into()));
    }

    #[test]
    fn rolls_are_deterministic() {
        let a = table().roll(Difficulty::Hard, &PcgRng, 1234);
        let b = table().roll(Difficulty::Hard, &PcgRng, 1234);
        assert_eq!(a, b);
        assert!(a.contains(&Grant::Chest {
            rank: ChestRank::B,
            amount: 1
        }));
    }

    #[test]
    fn chest_ladder() {
        assert_eq!(ChestRank::for_bracket(0), ChestRank::C);
        assert_eq!(ChestRank::for_bracket(3), ChestRank::S);
        assert_eq!(ChestRank::for_bracket(9), ChestRank::S);
        assert_eq!(ChestRank::C.previous(), None);
        assert_eq!("s".parse::<ChestRank>().unwrap(), ChestRank::S);
    }
}
