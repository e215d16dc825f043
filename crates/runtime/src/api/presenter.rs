//! Presentation port.
//!
//! Session workers describe each screen as a [`Rendering`] and hand it to a
//! [`Presenter`]. Delivery failures are reported back to the worker, which
//! falls back to a plain [`Rendering::Notice`] and keeps running.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use game_core::{
    BattleConfig, BattleState, CombatantFlags, CombatantSnapshot, EnemySnapshot, FightOutcome,
    HealItem, RewardEntry, Technique, TurnEvent,
};

use super::commands::DefeatReason;
use crate::rewards::VictorySummary;
use crate::session::SessionId;

#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("presentation channel closed")]
    Closed,

    #[error("presentation rejected: {0}")]
    Rejected(String),
}

/// A technique the actor could use right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechniqueOption {
    pub actor: usize,
    pub label: &'static str,
    pub cost: u8,
}

/// Everything the player needs to choose an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnMenu {
    pub turn: u32,
    /// Team slots that may act.
    pub selectable: Vec<usize>,
    pub team: Vec<CombatantSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub techniques: Vec<TechniqueOption>,
    pub supplies: Vec<(HealItem, u32)>,
    pub deadline: Duration,
}

impl TurnMenu {
    pub fn from_state(state: &BattleState, config: &BattleConfig, deadline: Duration) -> Self {
        let selectable = state.selectable();
        let techniques = selectable
            .iter()
            .flat_map(|&slot| technique_options(slot, &state.team[slot], config))
            .collect();
        Self {
            turn: state.turn,
            selectable,
            team: state.team.clone(),
            enemies: state.enemies.clone(),
            techniques,
            supplies: state
                .supplies
                .available()
                .map(|item| (item, state.supplies.count(item)))
                .collect(),
            deadline,
        }
    }
}

fn technique_options(
    slot: usize,
    unit: &CombatantSnapshot,
    config: &BattleConfig,
) -> Vec<TechniqueOption> {
    if unit.flags.contains(CombatantFlags::USED_TECHNIQUE) {
        return Vec::new();
    }
    let mut known = Vec::new();
    if unit.haki.has_observation() {
        known.push(Technique::Foresight);
    }
    if unit.haki.has_armament() {
        known.push(Technique::Guard { ally: slot });
    }
    if unit.haki.has_conqueror() {
        known.push(Technique::Execute { target: None });
        known.push(Technique::Overwhelm);
    }
    known
        .into_iter()
        .map(|t| TechniqueOption {
            actor: slot,
            label: t.label(),
            cost: t.cost(&config.techniques),
        })
        .filter(|option| option.cost <= unit.stamina)
        .collect()
}

/// One screen for the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendering {
    Narrative {
        title: String,
        description: String,
        image: Option<String>,
        /// Episode rewards the player is eligible for.
        rewards: Vec<RewardEntry>,
    },
    ReactionMeter {
        title: String,
        step: u64,
        bar_len: u64,
    },
    TurnMenu(TurnMenu),
    ActionReport {
        events: Vec<TurnEvent>,
        outcome: Option<FightOutcome>,
    },
    RewardScreen {
        title: String,
        description: String,
    },
    Victory(VictorySummary),
    Defeat {
        reason: DefeatReason,
    },
    Notice(String),
}

impl Rendering {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Narrative { .. } => "narrative",
            Self::ReactionMeter { .. } => "reaction-meter",
            Self::TurnMenu(_) => "turn-menu",
            Self::ActionReport { .. } => "action-report",
            Self::RewardScreen { .. } => "reward-screen",
            Self::Victory(_) => "victory",
            Self::Defeat { .. } => "defeat",
            Self::Notice(_) => "notice",
        }
    }
}

/// Delivers renderings to wherever the player is looking.
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn render(
        &self,
        session: SessionId,
        owner: &str,
        rendering: Rendering,
    ) -> Result<(), PresentationError>;
}

/// A rendering tagged with its destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presented {
    pub session: SessionId,
    pub owner: String,
    pub rendering: Rendering,
}

/// Forwards renderings over an unbounded channel. Used by tests and by
/// frontends that poll.
#[derive(Clone)]
pub struct ChannelPresenter {
    tx: mpsc::UnboundedSender<Presented>,
}

impl ChannelPresenter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Presented>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Presenter for ChannelPresenter {
    async fn render(
        &self,
        session: SessionId,
        owner: &str,
        rendering: Rendering,
    ) -> Result<(), PresentationError> {
        self.tx
            .send(Presented {
                session,
                owner: owner.to_string(),
                rendering,
            })
            .map_err(|_| PresentationError::Closed)
    }
}

/// Writes every rendering to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter;

#[async_trait]
impl Presenter for LogPresenter {
    async fn render(
        &self,
        session: SessionId,
        owner: &str,
        rendering: Rendering,
    ) -> Result<(), PresentationError> {
        tracing::info!(session = %session, owner, kind = rendering.kind(), ?rendering, "render");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{DamageRange, HakiProfile, Supplies};

    fn unit(name: &str, stamina: u8, haki: HakiProfile) -> CombatantSnapshot {
        CombatantSnapshot {
            card_id: name.to_lowercase(),
            name: name.into(),
            role: Default::default(),
            level: 1,
            health: 100,
            max_health: 100,
            stamina,
            attack: DamageRange::new(5, 10),
            power: 10,
            special: None,
            haki,
            dodge_percent: 0,
            flags: CombatantFlags::empty(),
        }
    }

    #[test]
    fn menu_lists_affordable_techniques_for_selectable_units() {
        let state = BattleState::new(
            vec![
                unit("Zoro", 1, HakiProfile::new(1, 1, 0)),
                unit("Luffy", 0, HakiProfile::new(0, 0, 2)),
            ],
            1,
            Supplies::new().with(HealItem::Fish, 2),
        );
        let menu = TurnMenu::from_state(&state, &BattleConfig::default(), Duration::from_secs(45));

        assert_eq!(menu.selectable, vec![0]);
        // guard costs 2; only foresight fits in one stamina
        assert_eq!(
            menu.techniques,
            vec![TechniqueOption {
                actor: 0,
                label: "Foresight",
                cost: 1
            }]
        );
        assert_eq!(menu.supplies, vec![(HealItem::Fish, 2)]);
    }

    #[tokio::test]
    async fn channel_presenter_reports_closed_receiver() {
        let (presenter, rx) = ChannelPresenter::new();
        drop(rx);
        let result = presenter
            .render(SessionId::new(), "owner", Rendering::Notice("hi".into()))
            .await;
        assert!(matches!(result, Err(PresentationError::Closed)));
    }
}
