//! End-to-end session flows driven on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_core::{BattleAction, HealItem, RewardTable, StageKind, TurnEvent};
use runtime::{
    BattleRuntime, CardProgress, DefeatReason, InMemoryPlayerRepository, PlayerCommand,
    PlayerRepository, PresentationError, Presented, Presenter, Rendering, RuntimeError, SessionId,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

use common::*;

fn first_episode() -> game_core::EpisodeScript {
    episode(
        1,
        standard_rewards(),
        vec![
            stage("Romance Dawn", StageKind::Narrative),
            stage("Alvida", fight(vec![enemy("alvida", 10, 5)])),
            stage("Treasure", StageKind::Reward),
        ],
    )
}

fn reaction_episode() -> game_core::EpisodeScript {
    episode(
        1,
        RewardTable::default(),
        vec![
            stage("Dodge the ball", short_reaction()),
            stage("Made it", StageKind::Reward),
        ],
    )
}

fn long_fight_episode() -> game_core::EpisodeScript {
    episode(
        1,
        RewardTable::default(),
        vec![stage("Marines", fight(vec![enemy("marine", 5_000, 10)]))],
    )
}

fn sequel() -> game_core::EpisodeScript {
    episode(
        2,
        RewardTable::default(),
        vec![stage("Orange Town", StageKind::Narrative)],
    )
}

fn attack() -> PlayerCommand {
    PlayerCommand::Act(BattleAction::Attack {
        actor: 0,
        target: None,
    })
}

async fn start(runtime: &BattleRuntime) -> SessionId {
    runtime
        .start_episode(OWNER, 1, None)
        .await
        .expect("episode starts")
}

#[tokio::test(start_paused = true)]
async fn victory_pays_rewards_and_unlocks_next_episode() {
    let mut record = veteran();
    record.cards.insert(
        "koby".into(),
        CardProgress {
            count: 1,
            level: 1,
            xp: 0,
        },
    );
    let Harness {
        runtime,
        repository,
        mut renders,
    } = harness(vec![first_episode(), sequel()], vec![record]);

    let id = start(&runtime).await;
    let narrative = expect_render(&mut renders, |r| matches!(r, Rendering::Narrative { .. })).await;
    let Rendering::Narrative { title, rewards, .. } = narrative else {
        unreachable!()
    };
    assert_eq!(title, "Romance Dawn");
    assert_eq!(rewards.len(), 2, "narrative previews the episode rewards");

    runtime
        .dispatch(id, OWNER, PlayerCommand::Continue)
        .await
        .unwrap();
    expect_render(&mut renders, |r| matches!(r, Rendering::TurnMenu(_))).await;

    runtime.dispatch(id, OWNER, attack()).await.unwrap();
    expect_render(&mut renders, |r| matches!(r, Rendering::RewardScreen { .. })).await;

    runtime.dispatch(id, OWNER, PlayerCommand::Claim).await.unwrap();
    let Rendering::Victory(summary) =
        expect_render(&mut renders, |r| matches!(r, Rendering::Victory(_))).await
    else {
        unreachable!()
    };
    assert!(!summary.replayed);
    assert_eq!(summary.converted, vec!["koby".to_string()]);
    assert_eq!(summary.stars, 1);
    assert_eq!(summary.unlocked, Some(2));

    wait_for_close(&runtime, OWNER).await;
    let stored = repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(stored.currency, 100);
    assert_eq!(stored.cards["koby"].count, 1, "duplicate card became experience");
    assert_eq!(stored.episodes.highest_unlocked, 2);
    assert_eq!(stored.episodes.stars.get(&1), Some(&1));
    assert!(stored.episodes.xp_awarded.contains("ep1_easy"));
    assert_eq!(stored.episodes.last_settled, Some(id.as_uuid()));
    assert!(stored.episodes.last_defeat.is_none());
}

#[tokio::test(start_paused = true)]
async fn unanswered_meter_times_out() {
    let Harness {
        runtime,
        repository,
        mut renders,
    } = harness(vec![reaction_episode()], vec![veteran()]);

    let started = Instant::now();
    start(&runtime).await;

    let mut steps = Vec::new();
    let reason = loop {
        let presented = renders.recv().await.expect("presenter open");
        match presented.rendering {
            Rendering::ReactionMeter { step, bar_len, .. } => {
                assert_eq!(bar_len, 3);
                steps.push(step);
            }
            Rendering::Defeat { reason } => break reason,
            other => panic!("unexpected rendering: {other:?}"),
        }
    };
    assert_eq!(reason, DefeatReason::ReactionTimeout);
    assert_eq!(steps, vec![1, 2, 3]);
    assert!(started.elapsed() >= Duration::from_millis(3_500));

    wait_for_close(&runtime, OWNER).await;
    assert!(runtime.registry().is_empty());
    let stored = repository.find(OWNER).await.unwrap().unwrap();
    let defeat = stored.episodes.last_defeat.expect("defeat recorded");
    assert_eq!(defeat.reason, "timeout: reaction");
}

#[tokio::test(start_paused = true)]
async fn early_signal_misses_the_reaction() {
    let Harness {
        runtime,
        mut renders,
        ..
    } = harness(vec![reaction_episode()], vec![veteran()]);

    let id = start(&runtime).await;
    expect_render(&mut renders, |r| matches!(r, Rendering::ReactionMeter { .. })).await;
    runtime
        .dispatch(id, OWNER, PlayerCommand::Signal)
        .await
        .unwrap();

    let rendering = expect_render(&mut renders, |r| matches!(r, Rendering::Defeat { .. })).await;
    assert_eq!(
        rendering,
        Rendering::Defeat {
            reason: DefeatReason::MissedReaction
        }
    );
}

#[tokio::test(start_paused = true)]
async fn signal_near_the_end_advances_the_episode() {
    let Harness {
        runtime,
        mut renders,
        ..
    } = harness(vec![reaction_episode()], vec![veteran()]);

    let id = start(&runtime).await;
    expect_render(&mut renders, |r| matches!(r, Rendering::ReactionMeter { .. })).await;
    tokio::time::sleep(Duration::from_millis(2_600)).await;
    runtime
        .dispatch(id, OWNER, PlayerCommand::Signal)
        .await
        .unwrap();

    expect_render(&mut renders, |r| matches!(r, Rendering::RewardScreen { .. })).await;
    let view = runtime.view(id, OWNER).await.unwrap();
    assert_eq!(view.stage, Some("reward"));

    // a second signal has no meter to stop
    let err = runtime
        .dispatch(id, OWNER, PlayerCommand::Signal)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnexpectedCommand));
}

#[tokio::test(start_paused = true)]
async fn idle_turn_menu_ends_in_turn_timeout() {
    let Harness {
        runtime,
        repository,
        mut renders,
    } = harness(vec![long_fight_episode()], vec![veteran()]);

    let started = Instant::now();
    start(&runtime).await;
    expect_render(&mut renders, |r| matches!(r, Rendering::TurnMenu(_))).await;

    let rendering = expect_render(&mut renders, |r| matches!(r, Rendering::Defeat { .. })).await;
    assert_eq!(
        rendering,
        Rendering::Defeat {
            reason: DefeatReason::TurnTimeout
        }
    );
    assert!(started.elapsed() >= Duration::from_secs(45));

    wait_for_close(&runtime, OWNER).await;
    let stored = repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(stored.episodes.last_defeat.unwrap().reason, "timeout: turn");
}

#[tokio::test(start_paused = true)]
async fn enemies_answer_after_the_counter_delay() {
    let Harness {
        runtime,
        mut renders,
        ..
    } = harness(vec![long_fight_episode()], vec![veteran()]);

    let id = start(&runtime).await;
    expect_render(&mut renders, |r| matches!(r, Rendering::TurnMenu(_))).await;

    runtime.dispatch(id, OWNER, attack()).await.unwrap();
    let acted = Instant::now();
    let Rendering::ActionReport { events, outcome } =
        expect_render(&mut renders, |r| matches!(r, Rendering::ActionReport { .. })).await
    else {
        unreachable!()
    };
    assert!(outcome.is_none());
    assert!(matches!(events[0], TurnEvent::PlayerHit { damage: 50, .. }));

    // no second action while the enemies are winding up
    let err = runtime.dispatch(id, OWNER, attack()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnexpectedCommand));

    let Rendering::ActionReport { events, .. } =
        expect_render(&mut renders, |r| matches!(r, Rendering::ActionReport { .. })).await
    else {
        unreachable!()
    };
    assert!(acted.elapsed() >= Duration::from_secs(2));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, TurnEvent::EnemyHit { .. } | TurnEvent::Dodged { .. }))
    );
    expect_render(&mut renders, |r| matches!(r, Rendering::TurnMenu(_))).await;

    let view = runtime.view(id, OWNER).await.unwrap();
    assert_eq!(view.battle.turn, 1);
}

#[tokio::test(start_paused = true)]
async fn healing_decrements_stored_supplies() {
    let Harness {
        runtime,
        repository,
        mut renders,
    } = harness(vec![long_fight_episode()], vec![veteran()]);

    let id = start(&runtime).await;
    expect_render(&mut renders, |r| matches!(r, Rendering::TurnMenu(_))).await;

    runtime
        .dispatch(
            id,
            OWNER,
            PlayerCommand::Act(BattleAction::Heal {
                item: HealItem::Meat,
                target: 0,
            }),
        )
        .await
        .unwrap();

    let stored = repository.find(OWNER).await.unwrap().unwrap();
    assert_eq!(stored.items["meat"], 0);
    let view = runtime.view(id, OWNER).await.unwrap();
    assert_eq!(view.battle.supplies.count(HealItem::Meat), 0);
}

/// Forwards everything except turn menus, which it refuses to draw.
struct NoMenus(mpsc::UnboundedSender<Presented>);

#[async_trait]
impl Presenter for NoMenus {
    async fn render(
        &self,
        session: SessionId,
        owner: &str,
        rendering: Rendering,
    ) -> Result<(), PresentationError> {
        if matches!(rendering, Rendering::TurnMenu(_)) {
            return Err(PresentationError::Rejected("menus are disabled".into()));
        }
        self.0
            .send(Presented {
                session,
                owner: owner.to_string(),
                rendering,
            })
            .map_err(|_| PresentationError::Closed)
    }
}

#[tokio::test(start_paused = true)]
async fn failed_rendering_falls_back_to_notice() {
    init_tracing();
    let (tx, mut renders) = mpsc::unbounded_channel();
    let runtime = BattleRuntime::builder()
        .oracles(oracles(vec![long_fight_episode()]))
        .repository(Arc::new(InMemoryPlayerRepository::with_records([veteran()])))
        .presenter(Arc::new(NoMenus(tx)))
        .build()
        .unwrap();

    start(&runtime).await;
    let notice = expect_render(&mut renders, |r| matches!(r, Rendering::Notice(_))).await;
    assert_eq!(
        notice,
        Rendering::Notice("Could not display the turn-menu screen.".into())
    );
    assert!(runtime.active_session(OWNER).is_some(), "session keeps running");
}
