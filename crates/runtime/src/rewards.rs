//! Settles finished sessions into the player record.
//!
//! Both outcomes read the record once, apply every change in memory, and
//! commit a single upsert. The read and the upsert share one bounded retry. A record already stamped with the session id is
//! left untouched, so settling twice is harmless.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use game_core::reward::level_up_grants;
use game_core::{Difficulty, Grant, RollContext, compute_seed};

use crate::api::{DefeatReason, Result};
use crate::config::RuntimeConfig;
use crate::oracle::OracleManager;
use crate::repository::{
    CardProgress, DefeatRecord, EpisodeProgress, PlayerRecord, PlayerRepository, RepositoryError,
};
use crate::session::Session;

/// What a victory paid out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VictorySummary {
    pub episode: u32,
    pub difficulty: Difficulty,
    /// Rolled table rewards, in table order.
    pub grants: Vec<Grant>,
    /// Card rewards the player already owned, paid as experience instead.
    pub converted: Vec<String>,
    /// First-clear experience; zero on repeat clears.
    pub episode_xp: u32,
    pub levels_gained: u32,
    pub level_up_grants: Vec<Grant>,
    pub stars: u8,
    /// Episode newly unlocked by this clear.
    pub unlocked: Option<u32>,
    /// True when the record had already been settled for this session.
    pub replayed: bool,
}

pub struct RewardResolver {
    repository: Arc<dyn PlayerRepository>,
    oracles: OracleManager,
    retry_attempts: u32,
    retry_backoff: std::time::Duration,
}

impl RewardResolver {
    pub fn new(
        repository: Arc<dyn PlayerRepository>,
        oracles: OracleManager,
        config: &RuntimeConfig,
    ) -> Self {
        Self {
            repository,
            oracles,
            retry_attempts: config.store_retry_attempts.max(1),
            retry_backoff: config.store_retry_backoff,
        }
    }

    pub async fn settle_victory(&self, session: &Session) -> Result<VictorySummary> {
        let mut record = self.load(&session.owner).await?;
        if record.episodes.last_settled == Some(session.id.as_uuid()) {
            return Ok(VictorySummary {
                episode: session.episode,
                difficulty: session.difficulty(),
                replayed: true,
                ..VictorySummary::default()
            });
        }

        let summary = self.apply_victory(&mut record, session);
        record.episodes.last_settled = Some(session.id.as_uuid());
        self.commit(&record).await?;

        info!(
            session = %session.id,
            owner = %session.owner,
            episode = session.episode,
            grants = summary.grants.len(),
            levels = summary.levels_gained,
            "Victory settled"
        );
        Ok(summary)
    }

    pub async fn settle_defeat(&self, session: &Session, reason: DefeatReason) -> Result<()> {
        let mut record = self.load(&session.owner).await?;
        if record.episodes.last_settled == Some(session.id.as_uuid()) {
            return Ok(());
        }

        record.episodes.last_defeat = Some(DefeatRecord {
            at: Utc::now(),
            reason: reason.to_string(),
        });
        record.episodes.last_settled = Some(session.id.as_uuid());
        self.commit(&record).await?;

        info!(session = %session.id, owner = %session.owner, %reason, "Defeat recorded");
        Ok(())
    }

    /// Applies every victory reward to `record` in memory.
    fn apply_victory(&self, record: &mut PlayerRecord, session: &Session) -> VictorySummary {
        let config = self.oracles.config();
        let rng = self.oracles.rng();
        let difficulty = session.difficulty();
        let seed = session.battle.seed;

        let mut summary = VictorySummary {
            episode: session.episode,
            difficulty,
            ..VictorySummary::default()
        };

        for (idx, table) in session.director.victory_tables().into_iter().enumerate() {
            let table_seed = compute_seed(seed, idx as u64, 3, RollContext::Reward);
            summary.grants.extend(table.roll(difficulty, rng, table_seed));
        }
        for grant in &summary.grants {
            if let Some(card) = apply_grant(record, grant, config.duplicate_card_xp, config.xp_per_level) {
                summary.converted.push(card);
            }
        }

        let key = EpisodeProgress::xp_key(session.episode, difficulty);
        if record.episodes.xp_awarded.insert(key) {
            let xp = *config.episode_xp.get(difficulty);
            summary.episode_xp = xp;

            let from = record.user.level;
            summary.levels_gained = record.user.gain(xp, config.xp_per_level);
            for card_id in session.battle.team.iter().map(|c| &c.card_id) {
                let card = record.cards.entry(card_id.clone()).or_insert_with(|| CardProgress {
                    count: 1,
                    level: 0,
                    xp: 0,
                });
                let mut progress = card.progress();
                progress.gain(xp, config.xp_per_level);
                card.set_progress(progress);
            }

            if summary.levels_gained > 0 {
                let level_seed = compute_seed(seed, u64::from(from), 4, RollContext::Reward);
                summary.level_up_grants =
                    level_up_grants(from, record.user.level, config, rng, level_seed);
                for grant in &summary.level_up_grants {
                    apply_grant(record, grant, config.duplicate_card_xp, config.xp_per_level);
                }
            }
        }

        let progress = &mut record.episodes;
        let stars = difficulty.stars();
        let best = progress.stars.entry(session.episode).or_insert(0);
        *best = (*best).max(stars);
        summary.stars = *best;

        let next = session.episode + 1;
        if session.episode == progress.highest_unlocked
            && next <= self.oracles.episodes().last_episode()
        {
            progress.highest_unlocked = next;
            summary.unlocked = Some(next);
        }

        summary
    }

    async fn load(&self, owner: &str) -> std::result::Result<PlayerRecord, RepositoryError> {
        self.with_retry(owner, "read", || self.repository.find_or_default(owner))
            .await
    }

    async fn commit(&self, record: &PlayerRecord) -> std::result::Result<(), RepositoryError> {
        self.with_retry(&record.owner, "upsert", || self.repository.upsert(record))
            .await
    }

    /// Runs a store call up to `retry_attempts` times with linear backoff.
    /// The last failure is surfaced.
    async fn with_retry<T, F, Fut>(
        &self,
        owner: &str,
        operation: &'static str,
        mut call: F,
    ) -> std::result::Result<T, RepositoryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, RepositoryError>>,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.retry_attempts => {
                    warn!(%owner, operation, attempt, %error, "Player record store call failed; retrying");
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Adds one grant to the record. Returns the card id when a card reward was
/// converted to experience because the player already owns it.
fn apply_grant(
    record: &mut PlayerRecord,
    grant: &Grant,
    duplicate_xp: u32,
    xp_per_level: u32,
) -> Option<String> {
    match grant {
        Grant::Currency(amount) => record.currency = record.currency.saturating_add(*amount),
        Grant::Chest { rank, amount } => record.add_chests(*rank, *amount),
        Grant::ResetTokens(amount) => {
            record.reset_tokens = record.reset_tokens.saturating_add(*amount)
        }
        Grant::Blueprint { name, amount } => {
            let count = record.blueprints.entry(name.clone()).or_insert(0);
            *count = count.saturating_add(*amount);
        }
        Grant::Card(card_id) => {
            if record.owns_card(card_id) {
                if let Some(card) = record.cards.get_mut(card_id) {
                    let mut progress = card.progress();
                    progress.gain(duplicate_xp, xp_per_level);
                    card.set_progress(progress);
                }
                return Some(card_id.clone());
            }
            record.cards.insert(
                card_id.clone(),
                CardProgress {
                    count: 1,
                    level: 0,
                    xp: 0,
                },
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::ChestRank;

    #[test]
    fn owned_card_converts_to_experience() {
        let mut record = PlayerRecord::new("owner");
        record.cards.insert(
            "koby".into(),
            CardProgress {
                count: 1,
                level: 1,
                xp: 50,
            },
        );

        let converted = apply_grant(&mut record, &Grant::Card("koby".into()), 100, 100);
        assert_eq!(converted.as_deref(), Some("koby"));
        let koby = &record.cards["koby"];
        assert_eq!((koby.count, koby.level, koby.xp), (1, 2, 50));

        assert_eq!(apply_grant(&mut record, &Grant::Card("rika".into()), 100, 100), None);
        assert_eq!(record.cards["rika"].count, 1);
    }

    #[test]
    fn grants_accumulate() {
        let mut record = PlayerRecord::new("owner");
        apply_grant(&mut record, &Grant::Currency(70), 100, 100);
        apply_grant(&mut record, &Grant::Currency(30), 100, 100);
        apply_grant(
            &mut record,
            &Grant::Chest {
                rank: ChestRank::B,
                amount: 2,
            },
            100,
            100,
        );
        apply_grant(&mut record, &Grant::ResetTokens(1), 100, 100);
        apply_grant(
            &mut record,
            &Grant::Blueprint {
                name: "Going Merry".into(),
                amount: 1,
            },
            100,
            100,
        );

        assert_eq!(record.currency, 100);
        assert_eq!(record.chests.get(ChestRank::B), 2);
        assert_eq!(record.reset_tokens, 1);
        assert_eq!(record.blueprints["Going Merry"], 1);
    }
}
