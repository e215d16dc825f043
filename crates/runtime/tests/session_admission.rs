//! Start checks, ownership routing, and settlement bookkeeping.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use game_core::{
    BattleState, Difficulty, Grant, Progress, RewardTable, StageDirector, StageKind, Supplies,
    build_team,
};
use runtime::{
    DefeatRecord, InMemoryPlayerRepository, PlayerCommand, PlayerRecord, PlayerRepository,
    RepositoryError, RewardResolver, RuntimeConfig, RuntimeError, Session, SessionId,
};

use common::*;

fn story(number: u32) -> game_core::EpisodeScript {
    episode(
        number,
        standard_rewards(),
        vec![
            stage("Prologue", StageKind::Narrative),
            stage("Treasure", StageKind::Reward),
        ],
    )
}

fn defeated_seconds_ago(secs: i64) -> runtime::PlayerRecord {
    let mut record = veteran();
    record.episodes.last_defeat = Some(DefeatRecord {
        at: Utc::now() - chrono::Duration::seconds(secs),
        reason: "team defeated".into(),
    });
    record
}

#[tokio::test]
async fn one_battle_per_owner() {
    let h = harness(vec![story(1)], vec![veteran()]);

    let id = h.runtime.start_episode(OWNER, 1, None).await.unwrap();
    let err = h.runtime.start_episode(OWNER, 1, None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::BattleInProgress));
    assert_eq!(h.runtime.active_session(OWNER), Some(id));
    assert_eq!(h.runtime.registry().len(), 1);
}

#[tokio::test]
async fn recent_defeat_blocks_a_restart() {
    let h = harness(vec![story(1)], vec![defeated_seconds_ago(60)]);

    let err = h.runtime.start_episode(OWNER, 1, None).await.unwrap_err();
    let RuntimeError::CooldownActive { remaining_secs } = err else {
        panic!("expected cooldown, got {err:?}");
    };
    assert!((235..=240).contains(&remaining_secs), "{remaining_secs}");
    assert!(h.runtime.registry().is_empty());
}

#[tokio::test]
async fn cooldown_lapses() {
    let h = harness(vec![story(1)], vec![defeated_seconds_ago(301)]);
    assert!(h.runtime.start_episode(OWNER, 1, None).await.is_ok());
}

#[tokio::test]
async fn locked_and_unknown_episodes_are_refused() {
    let mut far_along = veteran();
    far_along.episodes.highest_unlocked = 4;
    let h = harness(vec![story(1), story(2)], vec![far_along]);

    let err = h.runtime.start_episode(OWNER, 5, None).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::EpisodeLocked {
            requested: 5,
            unlocked: 4
        }
    ));

    let err = h.runtime.start_episode(OWNER, 3, None).await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownEpisode(3)));
    assert!(h.runtime.registry().is_empty());
}

#[tokio::test]
async fn commands_route_only_to_the_owner() {
    let h = harness(vec![story(1)], vec![veteran()]);
    let id = h.runtime.start_episode(OWNER, 1, None).await.unwrap();

    let err = h
        .runtime
        .dispatch(id, "buggy", PlayerCommand::Continue)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NotSessionOwner));

    let err = h
        .runtime
        .dispatch(SessionId::new(), OWNER, PlayerCommand::Continue)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound));

    // a fight action is out of place on a narrative screen
    let err = h
        .runtime
        .dispatch(
            id,
            OWNER,
            PlayerCommand::Act(game_core::BattleAction::Attack {
                actor: 0,
                target: None,
            }),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Director(_)));

    let view = h.runtime.view(id, OWNER).await.unwrap();
    assert_eq!(view.stage, Some("narrative"));
    assert_eq!(view.owner, OWNER);
}

#[tokio::test]
async fn difficulty_defaults_to_the_stored_preference() {
    let mut record = veteran();
    record.episodes.difficulty = Difficulty::Hard;
    let h = harness(vec![story(1)], vec![record]);

    let id = h.runtime.start_episode(OWNER, 1, None).await.unwrap();
    assert_eq!(h.runtime.view(id, OWNER).await.unwrap().difficulty, Difficulty::Hard);
}

#[tokio::test]
async fn shutdown_cancels_without_settling() {
    let h = harness(vec![story(1)], vec![veteran()]);
    h.runtime.start_episode(OWNER, 1, None).await.unwrap();

    let repository = Arc::clone(&h.repository);
    h.runtime.shutdown().await.unwrap();

    let stored = repository.find(OWNER).await.unwrap().unwrap();
    assert!(stored.episodes.last_settled.is_none());
    assert!(stored.episodes.last_defeat.is_none());
}

#[tokio::test]
async fn settling_twice_changes_nothing() {
    let h = harness(vec![story(1), story(2)], vec![veteran()]);
    let repository: Arc<dyn PlayerRepository> = h.repository.clone();
    let resolver = RewardResolver::new(
        repository,
        oracles(vec![story(1), story(2)]),
        &RuntimeConfig::default(),
    );
    let session = Session::new(
        SessionId::new(),
        OWNER,
        StageDirector::new(story(1), Difficulty::Easy),
        BattleState::new(Vec::new(), 7, Supplies::new()),
    );

    let first = resolver.settle_victory(&session).await.unwrap();
    assert!(!first.replayed);
    assert_eq!(first.episode_xp, 10);
    let after_first = h.repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(after_first.currency, 100);
    assert_eq!(after_first.cards["koby"].count, 1);

    let second = resolver.settle_victory(&session).await.unwrap();
    assert!(second.replayed);
    assert!(second.grants.is_empty());
    let after_second = h.repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(after_second, after_first);

    // a defeat for the same session is ignored too
    resolver
        .settle_defeat(&session, runtime::DefeatReason::IdleTimeout)
        .await
        .unwrap();
    let after_defeat = h.repository.find(OWNER).await.unwrap().unwrap();
    assert!(after_defeat.episodes.last_defeat.is_none());
}

#[tokio::test]
async fn empty_reward_table_still_records_the_clear() {
    let mut bare = story(1);
    bare.rewards = RewardTable::default();
    let h = harness(vec![bare.clone()], vec![veteran()]);
    let resolver = RewardResolver::new(
        h.repository.clone(),
        oracles(vec![bare.clone()]),
        &RuntimeConfig::default(),
    );
    let session = Session::new(
        SessionId::new(),
        OWNER,
        StageDirector::new(bare, Difficulty::Medium),
        BattleState::new(Vec::new(), 3, Supplies::new()),
    );

    let summary = resolver.settle_victory(&session).await.unwrap();
    assert!(summary.grants.is_empty());
    assert_eq!(summary.stars, 2);
    assert_eq!(summary.unlocked, None, "no later episode to open");
}

#[tokio::test]
async fn first_clear_levels_the_user_and_team_once() {
    let mut record = veteran();
    record.user = Progress::new(1, 95);
    let h = harness(vec![story(1), story(2)], vec![record.clone()]);
    let manager = oracles(vec![story(1), story(2)]);
    let team = build_team(&record.team_spec(), manager.catalog(), manager.config()).unwrap();
    let resolver = RewardResolver::new(h.repository.clone(), manager, &RuntimeConfig::default());
    let session = Session::new(
        SessionId::new(),
        OWNER,
        StageDirector::new(story(1), Difficulty::Easy),
        BattleState::new(team, 11, Supplies::new()),
    );

    let summary = resolver.settle_victory(&session).await.unwrap();
    assert_eq!(summary.episode_xp, 10);
    assert_eq!(summary.levels_gained, 1);
    assert!(summary.level_up_grants.contains(&Grant::Currency(100)));

    let stored = h.repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(stored.user, Progress::new(2, 5));
    // 100 from the episode table, 2 × 50 for reaching level 2
    assert_eq!(stored.currency, 200);
    let chests = summary
        .level_up_grants
        .iter()
        .filter(|g| matches!(g, Grant::Chest { .. }))
        .count() as u32;
    assert_eq!(stored.chests.c + stored.chests.b + stored.chests.a + stored.chests.s, chests);
    assert_eq!((stored.cards["luffy"].level, stored.cards["luffy"].xp), (1, 10));
    // a newly pulled card starts unlevelled
    assert_eq!(stored.cards["koby"].level, 0);

    // the same tier cleared again in a new session pays no completion xp
    let rerun = Session::new(
        SessionId::new(),
        OWNER,
        StageDirector::new(story(1), Difficulty::Easy),
        session.battle.clone(),
    );
    let again = resolver.settle_victory(&rerun).await.unwrap();
    assert_eq!(again.episode_xp, 0);
    assert_eq!(again.levels_gained, 0);
    let after = h.repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(after.user, Progress::new(2, 5));
    assert_eq!(after.cards["luffy"].xp, 10);
}

/// Fails the first `failures` reads, then delegates.
struct FlakyReads {
    inner: InMemoryPlayerRepository,
    failures: AtomicU32,
}

#[async_trait]
impl PlayerRepository for FlakyReads {
    async fn find(&self, owner: &str) -> runtime::repository::Result<Option<PlayerRecord>> {
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(RepositoryError::Unavailable("connection reset".into()));
        }
        self.inner.find(owner).await
    }

    async fn upsert(&self, record: &PlayerRecord) -> runtime::repository::Result<()> {
        self.inner.upsert(record).await
    }
}

fn flaky(failures: u32) -> Arc<FlakyReads> {
    Arc::new(FlakyReads {
        inner: InMemoryPlayerRepository::with_records([veteran()]),
        failures: AtomicU32::new(failures),
    })
}

fn narrative_session() -> Session {
    Session::new(
        SessionId::new(),
        OWNER,
        StageDirector::new(story(1), Difficulty::Easy),
        BattleState::new(Vec::new(), 5, Supplies::new()),
    )
}

#[tokio::test(start_paused = true)]
async fn transient_read_failures_are_retried() {
    init_tracing();
    let repository = flaky(2);
    let resolver = RewardResolver::new(
        repository.clone(),
        oracles(vec![story(1)]),
        &RuntimeConfig::default(),
    );

    resolver
        .settle_defeat(&narrative_session(), runtime::DefeatReason::IdleTimeout)
        .await
        .unwrap();
    let stored = repository.inner.find(OWNER).await.unwrap().unwrap();
    assert!(stored.episodes.last_defeat.is_some());
}

#[tokio::test(start_paused = true)]
async fn persistent_read_failure_surfaces() {
    let repository = flaky(u32::MAX);
    let resolver = RewardResolver::new(
        repository.clone(),
        oracles(vec![story(1)]),
        &RuntimeConfig::default(),
    );

    let err = resolver.settle_victory(&narrative_session()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Store(_)), "{err:?}");
    assert!(repository.inner.find(OWNER).await.unwrap().unwrap().episodes.last_settled.is_none());
}
