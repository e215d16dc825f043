use crate::state::DamageRange;

/// Read-only registry of collectible cards, gear, and team banners.
pub trait CatalogOracle: Send + Sync {
    fn card(&self, id: &str) -> Option<CardDefinition>;

    fn gear(&self, id: &str) -> Option<GearDefinition>;

    fn banner(&self, id: &str) -> Option<BannerDefinition>;
}

/// Combat archetype of a card. Healing items favor Support and non-Support
/// cards asymmetrically.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::EnumString, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum CardRole {
    #[default]
    Attack,
    Defense,
    Support,
}

/// Star ratings in the three haki schools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HakiProfile {
    pub armament: u8,
    pub observation: u8,
    pub conqueror: u8,
}

impl HakiProfile {
    pub const fn new(armament: u8, observation: u8, conqueror: u8) -> Self {
        Self {
            armament,
            observation,
            conqueror,
        }
    }

    pub const fn has_armament(&self) -> bool {
        self.armament > 0
    }

    pub const fn has_observation(&self) -> bool {
        self.observation > 0
    }

    pub const fn has_conqueror(&self) -> bool {
        self.conqueror > 0
    }
}

/// Team-wide percentage boosts a card grants while it is in the roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TeamBoost {
    pub atk: u32,
    pub hp: u32,
    pub special: u32,
}

impl TeamBoost {
    pub fn is_empty(&self) -> bool {
        self.atk == 0 && self.hp == 0 && self.special == 0
    }
}

impl core::ops::Add for TeamBoost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            atk: self.atk + rhs.atk,
            hp: self.hp + rhs.hp,
            special: self.special + rhs.special,
        }
    }
}

impl core::iter::Sum for TeamBoost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, b| acc + b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialDefinition {
    pub name: String,
    pub range: DamageRange,
}

/// Base stats and metadata for a collectible card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: CardRole,
    pub health: u32,
    pub attack: DamageRange,
    pub power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub special: Option<SpecialDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boost: TeamBoost,
    #[cfg_attr(feature = "serde", serde(default))]
    pub haki: HakiProfile,
    /// Gear id this card can draw a bonus from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub signature_gear: Option<String>,
}

/// Flat stat bonus carried by a piece of gear before level scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GearBoost {
    pub atk: u32,
    pub hp: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boost: GearBoost,
    /// Cards bonded to this gear, in catalog order. Only cards after the
    /// first entry receive the signature bonus.
    #[cfg_attr(feature = "serde", serde(default))]
    pub signature_cards: Vec<String>,
}

impl GearDefinition {
    /// True when `card_id` is bonded to this gear but is not its first bond.
    pub fn grants_signature_bonus(&self, card_id: &str) -> bool {
        self.signature_cards
            .iter()
            .position(|id| id == card_id)
            .is_some_and(|idx| idx > 0)
    }
}

/// A team banner whose roster receives a flat percentage passive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BannerDefinition {
    pub id: String,
    pub name: String,
    pub roster: Vec<String>,
}

impl BannerDefinition {
    pub fn covers(&self, card_id: &str) -> bool {
        self.roster.iter().any(|id| id == card_id)
    }
}
