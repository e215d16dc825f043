#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use game_core::{
    BattleConfig, CardDefinition, CardRole, DamageRange, EnemyTemplate, EpisodeScript, HakiProfile,
    ReactionSpec, RewardEntry, RewardKind, RewardTable, Stage, StageKind, TeamBoost,
    episode::Presentation,
};
use runtime::{
    BattleRuntime, CardProgress, CatalogOracleImpl, ChannelPresenter, EpisodeOracleImpl,
    InMemoryPlayerRepository, OracleManager, PlayerRecord, Presented, Presenter, Rendering,
    RuntimeConfig,
};
use tokio::sync::mpsc::UnboundedReceiver;

pub const OWNER: &str = "luffy-player";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn card(id: &str, health: u32, attack: u32) -> CardDefinition {
    CardDefinition {
        id: id.into(),
        name: id.to_uppercase(),
        role: CardRole::Attack,
        health,
        attack: DamageRange::fixed(attack),
        power: attack,
        special: None,
        boost: TeamBoost::default(),
        haki: HakiProfile::default(),
        signature_gear: None,
    }
}

pub fn enemy(id: &str, health: u32, attack: u32) -> EnemyTemplate {
    EnemyTemplate {
        id: id.into(),
        name: id.to_uppercase(),
        health,
        attack: DamageRange::fixed(attack),
        power: None,
        special: None,
    }
}

pub fn stage(title: &str, kind: StageKind) -> Stage {
    Stage {
        presentation: Presentation {
            title: title.into(),
            ..Presentation::default()
        },
        kind,
    }
}

pub fn fight(enemies: Vec<EnemyTemplate>) -> StageKind {
    StageKind::Fight {
        enemies,
        rewards: None,
    }
}

/// A reaction meter with three one-second cells and a half-second window.
pub fn short_reaction() -> StageKind {
    StageKind::TimedReaction(ReactionSpec {
        duration_ms: 3_000,
        tick_ms: 1_000,
        window_ms: 500,
    })
}

pub fn episode(number: u32, rewards: RewardTable, stages: Vec<Stage>) -> EpisodeScript {
    EpisodeScript {
        number,
        title: format!("Episode {number}"),
        rewards,
        stages,
    }
}

/// 100 currency and a Koby card on every clear.
pub fn standard_rewards() -> RewardTable {
    RewardTable {
        entries: vec![
            RewardEntry::always(RewardKind::Currency { min: 100, max: 100 }),
            RewardEntry::always(RewardKind::Card {
                card_id: "koby".into(),
            }),
        ],
    }
}

pub fn oracles(episodes: Vec<EpisodeScript>) -> OracleManager {
    let mut catalog = CatalogOracleImpl::new();
    catalog.add_card(card("luffy", 1_000, 50));
    catalog.add_card(card("koby", 200, 10));
    OracleManager::new(catalog, EpisodeOracleImpl::new(episodes), BattleConfig::default())
}

/// An owner with Luffy on the team and a little food.
pub fn veteran() -> PlayerRecord {
    let mut record = PlayerRecord::new(OWNER);
    record.team = vec!["luffy".into()];
    record.cards.insert(
        "luffy".into(),
        CardProgress {
            count: 1,
            level: 1,
            xp: 0,
        },
    );
    record.items.insert("meat".into(), 1);
    record
}

pub struct Harness {
    pub runtime: BattleRuntime,
    pub repository: Arc<InMemoryPlayerRepository>,
    pub renders: UnboundedReceiver<Presented>,
}

pub fn harness(episodes: Vec<EpisodeScript>, records: Vec<PlayerRecord>) -> Harness {
    harness_with(episodes, records, RuntimeConfig::default())
}

pub fn harness_with(
    episodes: Vec<EpisodeScript>,
    records: Vec<PlayerRecord>,
    config: RuntimeConfig,
) -> Harness {
    init_tracing();
    let repository = Arc::new(InMemoryPlayerRepository::with_records(records));
    let (presenter, renders) = ChannelPresenter::new();
    let runtime = BattleRuntime::builder()
        .config(config)
        .oracles(oracles(episodes))
        .repository(repository.clone())
        .presenter(Arc::new(presenter) as Arc<dyn Presenter>)
        .build()
        .expect("runtime builds");
    Harness {
        runtime,
        repository,
        renders,
    }
}

/// Next rendering matching `pred`, skipping the rest.
pub async fn expect_render(
    rx: &mut UnboundedReceiver<Presented>,
    pred: impl Fn(&Rendering) -> bool,
) -> Rendering {
    let wait = async {
        loop {
            let presented = rx.recv().await.expect("presenter channel open");
            if pred(&presented.rendering) {
                return presented.rendering;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(3_600), wait)
        .await
        .expect("rendering arrived")
}

/// Waits until the owner's session has been removed from the registry.
pub async fn wait_for_close(runtime: &BattleRuntime, owner: &str) {
    while runtime.active_session(owner).is_some() {
        tokio::task::yield_now().await;
    }
}
