//! Card, gear, and banner catalog loader.

use std::collections::HashSet;
use std::path::Path;

use game_core::{BannerDefinition, CardDefinition, GearDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    pub cards: Vec<CardDefinition>,
    #[serde(default)]
    pub gear: Vec<GearDefinition>,
    #[serde(default)]
    pub banners: Vec<BannerDefinition>,
}

impl CatalogData {
    pub fn card(&self, id: &str) -> Option<&CardDefinition> {
        self.cards.iter().find(|c| c.id == id)
    }
}

/// Loader for the catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<CatalogData> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and checks a catalog: ids are unique per kind, attack ranges are
    /// ordered, and every card's signature gear exists.
    pub fn parse(content: &str) -> LoadResult<CatalogData> {
        let data: CatalogData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        unique_ids("card", data.cards.iter().map(|c| c.id.as_str()))?;
        unique_ids("gear", data.gear.iter().map(|g| g.id.as_str()))?;
        unique_ids("banner", data.banners.iter().map(|b| b.id.as_str()))?;

        for card in &data.cards {
            if card.attack.min > card.attack.max {
                anyhow::bail!(
                    "Card '{}' has an inverted attack range {}-{}",
                    card.id,
                    card.attack.min,
                    card.attack.max
                );
            }
            if let Some(gear_id) = &card.signature_gear
                && !data.gear.iter().any(|g| &g.id == gear_id)
            {
                anyhow::bail!("Card '{}' names unknown gear '{}'", card.id, gear_id);
            }
        }

        Ok(data)
    }
}

fn unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", kind, id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"(
        cards: [
            (id: "luffy", name: "Luffy", health: 100, attack: (min: 10, max: 20), power: 20,
             signature_gear: Some("straw_hat")),
            (id: "nami", name: "Nami", role: Support, health: 80, attack: (min: 5, max: 10), power: 10),
        ],
        gear: [(id: "straw_hat", name: "Straw Hat", boost: (atk: 10), signature_cards: ["shanks", "luffy"])],
    )"#;

    #[test]
    fn parses_defaults() {
        let data = CatalogLoader::parse(SMALL).unwrap();
        assert_eq!(data.cards.len(), 2);
        assert!(data.banners.is_empty());
        let nami = data.card("nami").unwrap();
        assert_eq!(nami.role, game_core::CardRole::Support);
        assert!(nami.haki.armament == 0 && nami.special.is_none());
        assert!(data.gear[0].grants_signature_bonus("luffy"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"(cards: [
            (id: "a", name: "A", health: 1, attack: (min: 1, max: 1), power: 1),
            (id: "a", name: "B", health: 1, attack: (min: 1, max: 1), power: 1),
        ])"#;
        let err = CatalogLoader::parse(text).unwrap_err();
        assert!(err.to_string().contains("Duplicate card id 'a'"));
    }

    #[test]
    fn rejects_dangling_gear() {
        let text = r#"(cards: [
            (id: "a", name: "A", health: 1, attack: (min: 1, max: 1), power: 1, signature_gear: Some("nope")),
        ])"#;
        assert!(CatalogLoader::parse(text).is_err());
    }
}
