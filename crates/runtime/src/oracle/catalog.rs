//! [`game_core::CatalogOracle`] backed by in-memory maps.
use std::collections::HashMap;

use game_content::CatalogData;
use game_core::{BannerDefinition, CardDefinition, CatalogOracle, GearDefinition};

/// CatalogOracle implementation with static card, gear, and banner definitions
#[derive(Debug, Default)]
pub struct CatalogOracleImpl {
    cards: HashMap<String, CardDefinition>,
    gear: HashMap<String, GearDefinition>,
    banners: HashMap<String, BannerDefinition>,
}

impl CatalogOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: &CatalogData) -> Self {
        let mut oracle = Self::new();
        for card in &data.cards {
            oracle.add_card(card.clone());
        }
        for gear in &data.gear {
            oracle.add_gear(gear.clone());
        }
        for banner in &data.banners {
            oracle.add_banner(banner.clone());
        }
        oracle
    }

    pub fn add_card(&mut self, def: CardDefinition) {
        self.cards.insert(def.id.clone(), def);
    }

    pub fn add_gear(&mut self, def: GearDefinition) {
        self.gear.insert(def.id.clone(), def);
    }

    pub fn add_banner(&mut self, def: BannerDefinition) {
        self.banners.insert(def.id.clone(), def);
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

impl CatalogOracle for CatalogOracleImpl {
    fn card(&self, id: &str) -> Option<CardDefinition> {
        self.cards.get(id).cloned()
    }

    fn gear(&self, id: &str) -> Option<GearDefinition> {
        self.gear.get(id).cloned()
    }

    fn banner(&self, id: &str) -> Option<BannerDefinition> {
        self.banners.get(id).cloned()
    }
}
