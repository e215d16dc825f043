//! Shape of the persisted per-owner document.
//!
//! The battle runtime reads a record at episode start and writes it back once
//! when a session settles. Everything here is plain data; the reward rules that
//! mutate it live in [`crate::rewards`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use game_core::{
    ChestRank, Difficulty, HealItem, Progress, Supplies, TeamMember, TeamSpec,
};

/// Progress on one owned card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardProgress {
    pub count: u32,
    pub level: u32,
    pub xp: u32,
}

impl CardProgress {
    pub fn progress(&self) -> Progress {
        Progress::new(self.level, self.xp)
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.level = progress.level;
        self.xp = progress.xp;
    }
}

/// One owned piece of gear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearItem {
    pub level: u32,
    #[serde(default)]
    pub equipped_to: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChestCounts {
    pub c: u32,
    pub b: u32,
    pub a: u32,
    pub s: u32,
}

impl ChestCounts {
    pub fn get(&self, rank: ChestRank) -> u32 {
        match rank {
            ChestRank::C => self.c,
            ChestRank::B => self.b,
            ChestRank::A => self.a,
            ChestRank::S => self.s,
        }
    }

    fn slot(&mut self, rank: ChestRank) -> &mut u32 {
        match rank {
            ChestRank::C => &mut self.c,
            ChestRank::B => &mut self.b,
            ChestRank::A => &mut self.a,
            ChestRank::S => &mut self.s,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatRecord {
    pub at: DateTime<Utc>,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeProgress {
    /// Highest episode the owner may start.
    pub highest_unlocked: u32,
    /// Difficulty used when a start request does not name one.
    pub difficulty: Difficulty,
    /// Best stars per episode number.
    pub stars: BTreeMap<u32, u8>,
    /// `ep{number}_{difficulty}` keys whose completion XP was already paid.
    pub xp_awarded: BTreeSet<String>,
    pub last_defeat: Option<DefeatRecord>,
    /// Last session whose outcome was committed.
    pub last_settled: Option<Uuid>,
}

impl Default for EpisodeProgress {
    fn default() -> Self {
        Self {
            highest_unlocked: 1,
            difficulty: Difficulty::Easy,
            stars: BTreeMap::new(),
            xp_awarded: BTreeSet::new(),
            last_defeat: None,
            last_settled: None,
        }
    }
}

impl EpisodeProgress {
    pub fn xp_key(episode: u32, difficulty: Difficulty) -> String {
        format!("ep{episode}_{difficulty}")
    }
}

/// Everything the store keeps about one owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub owner: String,
    #[serde(default)]
    pub currency: u64,
    #[serde(default)]
    pub reset_tokens: u32,
    #[serde(default)]
    pub chests: ChestCounts,
    /// Consumables by display name, e.g. `"sea king meat"`.
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
    #[serde(default)]
    pub cards: BTreeMap<String, CardProgress>,
    /// Card ids in slot order.
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(default = "default_user_progress")]
    pub user: Progress,
    #[serde(default)]
    pub gear: BTreeMap<String, GearItem>,
    #[serde(default)]
    pub blueprints: BTreeMap<String, u32>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub episodes: EpisodeProgress,
}

fn default_user_progress() -> Progress {
    Progress::new(1, 0)
}

impl PlayerRecord {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            currency: 0,
            reset_tokens: 0,
            chests: ChestCounts::default(),
            items: BTreeMap::new(),
            cards: BTreeMap::new(),
            team: Vec::new(),
            user: default_user_progress(),
            gear: BTreeMap::new(),
            blueprints: BTreeMap::new(),
            banner: None,
            episodes: EpisodeProgress::default(),
        }
    }

    pub fn owns_card(&self, card_id: &str) -> bool {
        self.cards.get(card_id).is_some_and(|c| c.count > 0)
    }

    pub fn add_chests(&mut self, rank: ChestRank, amount: u32) {
        let slot = self.chests.slot(rank);
        *slot = slot.saturating_add(amount);
    }

    /// The team roster as builder input. Cards missing from the record are
    /// treated as level 0.
    pub fn team_spec(&self) -> TeamSpec {
        let members = self
            .team
            .iter()
            .map(|card_id| {
                let level = self.cards.get(card_id).map_or(0, |c| c.level);
                let member = TeamMember::new(card_id.clone(), level);
                match self
                    .gear
                    .iter()
                    .find(|(_, item)| item.equipped_to.as_deref() == Some(card_id.as_str()))
                {
                    Some((gear_id, item)) => member.with_gear(gear_id.clone(), item.level.max(1)),
                    None => member,
                }
            })
            .collect();
        TeamSpec {
            members,
            banner: self.banner.clone(),
        }
    }

    /// Heal item stock. Unrecognized item names are ignored.
    pub fn supplies(&self) -> Supplies {
        let mut supplies = Supplies::new();
        for (name, count) in &self.items {
            if let Ok(item) = name.parse::<HealItem>() {
                supplies.set(item, *count);
            }
        }
        supplies
    }

    /// Removes one unit of `item`. Returns false when none was stocked.
    pub fn consume_item(&mut self, item: HealItem) -> bool {
        match self.items.get_mut(item.as_ref()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}
