//! Session worker that owns one [`Session`] exclusively.
//!
//! Player commands, deadlines, the reaction meter, and the delayed enemy
//! counter are all polled from one `select!` loop, so nothing else ever
//! mutates the battle.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Sleep, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use game_core::{
    BattleAction, DirectorError, FightOutcome, HealItem, ReactionVerdict, StageKind, StageView,
    TurnEvent, TurnResolver, judge_reaction,
};

use super::SessionContext;
use super::timeout::{self, DeadlineKind, ReactionMeter, TimeoutSupervisor};
use crate::api::{DefeatReason, PlayerCommand, Rendering, Result, RuntimeError, TurnMenu};
use crate::repository::RepositoryError;
use crate::session::{Session, SessionView};

/// Commands that can be sent to a session worker
pub enum Command {
    /// A player choice; the reply carries acceptance or the rejection reason.
    Player {
        command: PlayerCommand,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the session (read-only).
    Query { reply: oneshot::Sender<SessionView> },
}

enum Finish {
    Victory,
    Defeat(DefeatReason),
}

pub(crate) struct SessionWorker {
    session: Session,
    ctx: Arc<SessionContext>,
    command_rx: mpsc::Receiver<Command>,
    cancel: CancellationToken,
    deadline: TimeoutSupervisor,
    reaction: Option<ReactionMeter>,
    /// Pause before the enemies answer a turn-ending action.
    counter: Option<Pin<Box<Sleep>>>,
}

impl SessionWorker {
    pub(crate) fn new(
        session: Session,
        ctx: Arc<SessionContext>,
        command_rx: mpsc::Receiver<Command>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session,
            ctx,
            command_rx,
            cancel,
            deadline: TimeoutSupervisor::default(),
            reaction: None,
            counter: None,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        info!(
            session = %self.session.id,
            owner = %self.session.owner,
            episode = self.session.episode,
            difficulty = %self.session.difficulty(),
            "Session started"
        );
        self.show_stage().await;

        while !self.session.phase.is_terminated() {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(session = %self.session.id, "Session cancelled");
                    break;
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                kind = self.deadline.expired() => self.on_deadline(kind).await,
                step = timeout::next_step(&mut self.reaction) => self.on_reaction_step(step).await,
                _ = timeout::elapse(&mut self.counter) => self.on_enemy_counter().await,
            }
        }

        debug!(session = %self.session.id, phase = ?self.session.phase, "Session worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Player { command, reply } => {
                let result = self.apply_command(command).await;
                if let Err(error) = &result {
                    debug!(
                        session = %self.session.id,
                        command = command.label(),
                        %error,
                        "Command rejected"
                    );
                }
                let _ = reply.send(result);
            }
            Command::Query { reply } => {
                let _ = reply.send(self.session.view());
            }
        }
    }

    async fn apply_command(&mut self, command: PlayerCommand) -> Result<()> {
        if !self.session.phase.is_active() {
            return Err(RuntimeError::ConcurrencyGuardTripped);
        }
        match command {
            PlayerCommand::Continue => {
                self.session.director.continue_narrative()?;
                self.deadline.disarm();
                self.show_stage().await;
            }
            PlayerCommand::Claim => {
                self.session.director.claim()?;
                self.deadline.disarm();
                self.show_stage().await;
            }
            PlayerCommand::Signal => self.signal().await?,
            PlayerCommand::Act(action) => self.act(action).await?,
        }
        Ok(())
    }

    // ===== stages =====

    async fn show_stage(&mut self) {
        let view = self
            .session
            .director
            .enter(&mut self.session.battle, self.ctx.oracles.config());
        let presentation = self
            .session
            .director
            .current()
            .map(|stage| stage.presentation.clone())
            .unwrap_or_default();
        debug!(
            session = %self.session.id,
            stage = self.session.director.stage_index(),
            ?view,
            "Stage entered"
        );

        match view {
            StageView::Narrative => {
                self.deadline
                    .arm(DeadlineKind::Idle, self.ctx.config.idle_timeout);
                let rewards = self
                    .session
                    .director
                    .script()
                    .rewards
                    .preview(self.session.difficulty())
                    .cloned()
                    .collect();
                self.render(Rendering::Narrative {
                    title: presentation.title,
                    description: presentation.description,
                    image: presentation.image,
                    rewards,
                })
                .await;
            }
            StageView::TimedReaction(spec) => {
                let grace = self.ctx.oracles.config().reaction_grace_ms;
                self.deadline.arm(
                    DeadlineKind::Reaction,
                    Duration::from_millis(spec.duration_ms.saturating_add(grace)),
                );
                self.reaction = Some(ReactionMeter::start(spec));
                self.render(Rendering::ReactionMeter {
                    title: presentation.title,
                    step: 1,
                    bar_len: spec.bar_len(),
                })
                .await;
            }
            StageView::Fight { fresh } => {
                if fresh {
                    info!(
                        session = %self.session.id,
                        enemies = self.session.battle.enemies.len(),
                        "Fight started"
                    );
                }
                self.show_turn_menu().await;
            }
            StageView::Reward => {
                self.deadline
                    .arm(DeadlineKind::Idle, self.ctx.config.idle_timeout);
                self.render(Rendering::RewardScreen {
                    title: presentation.title,
                    description: presentation.description,
                })
                .await;
            }
            StageView::Complete => self.finish(Finish::Victory).await,
        }
    }

    async fn on_reaction_step(&mut self, step: u64) {
        let Some(meter) = self.reaction.as_ref() else {
            return;
        };
        let bar_len = meter.spec.bar_len();
        let title = self
            .session
            .director
            .current()
            .map(|stage| stage.presentation.title.clone())
            .unwrap_or_default();
        self.render(Rendering::ReactionMeter {
            title,
            step,
            bar_len,
        })
        .await;
    }

    async fn signal(&mut self) -> Result<()> {
        let Some(meter) = self.reaction.take() else {
            return Err(RuntimeError::UnexpectedCommand);
        };
        self.deadline.disarm();

        let elapsed_ms = meter.elapsed_ms();
        let grace = self.ctx.oracles.config().reaction_grace_ms;
        let verdict = judge_reaction(&meter.spec, elapsed_ms, grace);
        debug!(session = %self.session.id, elapsed_ms, ?verdict, "Reaction judged");

        match verdict {
            ReactionVerdict::Success => {
                self.session.director.reaction_succeeded()?;
                self.show_stage().await;
            }
            ReactionVerdict::TooEarly => {
                self.finish(Finish::Defeat(DefeatReason::MissedReaction))
                    .await
            }
            ReactionVerdict::TooLate => {
                self.finish(Finish::Defeat(DefeatReason::ReactionTimeout))
                    .await
            }
        }
        Ok(())
    }

    // ===== fights =====

    async fn show_turn_menu(&mut self) {
        loop {
            let stalemate = TurnResolver::new(
                &mut self.session.battle,
                self.ctx.oracles.rng(),
                self.ctx.oracles.config(),
            )
            .resolve_stalemate();
            let Some(report) = stalemate else {
                break;
            };
            info!(
                session = %self.session.id,
                turn = self.session.battle.turn,
                "No teammate can act; enemies attack unopposed"
            );
            let outcome = report.outcome;
            self.render(Rendering::ActionReport {
                events: report.events,
                outcome,
            })
            .await;
            if outcome == Some(FightOutcome::TeamDefeated) {
                self.finish(Finish::Defeat(DefeatReason::TeamDefeated))
                    .await;
                return;
            }
        }

        let deadline = self.ctx.config.turn_timeout;
        self.deadline.arm(DeadlineKind::Turn, deadline);
        let menu = TurnMenu::from_state(&self.session.battle, self.ctx.oracles.config(), deadline);
        self.render(Rendering::TurnMenu(menu)).await;
    }

    async fn act(&mut self, action: BattleAction) -> Result<()> {
        match self.session.director.current().map(|stage| &stage.kind) {
            Some(StageKind::Fight { .. }) => {}
            Some(kind) => {
                return Err(DirectorError::WrongStage {
                    expected: "fight",
                    actual: kind.label(),
                }
                .into());
            }
            None => return Err(DirectorError::EpisodeComplete.into()),
        }
        if self.counter.is_some() {
            return Err(RuntimeError::UnexpectedCommand);
        }

        let events = TurnResolver::new(
            &mut self.session.battle,
            self.ctx.oracles.rng(),
            self.ctx.oracles.config(),
        )
        .apply_player_action(action)?;
        debug!(
            session = %self.session.id,
            turn = self.session.battle.turn,
            ?action,
            "Player action resolved"
        );

        for event in &events {
            if let TurnEvent::Healed { item, .. } = event {
                self.consume_stock(*item).await;
            }
        }

        let outcome = self.session.battle.outcome();
        self.render(Rendering::ActionReport { events, outcome })
            .await;

        if outcome.is_some() {
            TurnResolver::new(
                &mut self.session.battle,
                self.ctx.oracles.rng(),
                self.ctx.oracles.config(),
            )
            .end_turn();
            self.resolve_fight().await;
        } else if action.ends_turn() {
            self.deadline.disarm();
            self.counter = Some(Box::pin(sleep(self.ctx.config.enemy_delay)));
        } else {
            self.show_turn_menu().await;
        }
        Ok(())
    }

    async fn on_enemy_counter(&mut self) {
        let mut resolver = TurnResolver::new(
            &mut self.session.battle,
            self.ctx.oracles.rng(),
            self.ctx.oracles.config(),
        );
        let events = resolver.enemy_response();
        resolver.end_turn();

        let outcome = self.session.battle.outcome();
        self.render(Rendering::ActionReport { events, outcome })
            .await;
        self.resolve_fight().await;
    }

    /// Leaves the fight when it is decided, otherwise offers the next turn.
    async fn resolve_fight(&mut self) {
        match self.session.battle.outcome() {
            Some(FightOutcome::EnemiesCleared) => {
                match self.session.director.complete_fight(&self.session.battle) {
                    Ok(()) => {
                        info!(session = %self.session.id, "Fight cleared");
                        self.show_stage().await;
                    }
                    Err(error) => {
                        warn!(session = %self.session.id, %error, "Fight could not be completed")
                    }
                }
            }
            Some(FightOutcome::TeamDefeated) => {
                self.finish(Finish::Defeat(DefeatReason::TeamDefeated))
                    .await
            }
            None => self.show_turn_menu().await,
        }
    }

    /// Mirrors a heal into the stored inventory. Failures are logged only;
    /// the session supply has already been decremented.
    async fn consume_stock(&self, item: HealItem) {
        let repository = &self.ctx.repository;
        let owner = self.session.owner.as_str();
        let result = async {
            let mut record = repository.find_or_default(owner).await?;
            if record.consume_item(item) {
                repository.upsert(&record).await?;
            }
            Ok::<_, RepositoryError>(())
        }
        .await;

        if let Err(error) = result {
            warn!(
                session = %self.session.id,
                owner,
                %item,
                %error,
                "Inventory decrement failed; continuing"
            );
        }
    }

    // ===== termination =====

    async fn on_deadline(&mut self, kind: DeadlineKind) {
        let reason = match kind {
            DeadlineKind::Turn => DefeatReason::TurnTimeout,
            DeadlineKind::Idle => DefeatReason::IdleTimeout,
            DeadlineKind::Reaction => DefeatReason::ReactionTimeout,
        };
        info!(session = %self.session.id, ?kind, "Deadline expired");
        self.finish(Finish::Defeat(reason)).await;
    }

    /// Settles the session once, renders the result, and removes the session
    /// from the registry whatever the store said.
    async fn finish(&mut self, finish: Finish) {
        if let Err(error) = self.session.phase.begin_resolution() {
            debug!(session = %self.session.id, %error, "Settlement skipped");
            return;
        }
        self.deadline.disarm();
        self.reaction = None;
        self.counter = None;

        let rendering = match finish {
            Finish::Victory => self
                .ctx
                .rewards
                .settle_victory(&self.session)
                .await
                .map(Rendering::Victory),
            Finish::Defeat(reason) => self
                .ctx
                .rewards
                .settle_defeat(&self.session, reason)
                .await
                .map(|()| Rendering::Defeat { reason }),
        };

        match rendering {
            Ok(rendering) => self.render(rendering).await,
            Err(error) => {
                error!(
                    session = %self.session.id,
                    owner = %self.session.owner,
                    %error,
                    "Settlement failed"
                );
                self.render(Rendering::Notice(format!(
                    "The battle result could not be saved: {error}"
                )))
                .await;
            }
        }

        self.session.phase.terminate();
        self.ctx.registry.delete(self.session.id);
        info!(session = %self.session.id, owner = %self.session.owner, "Session closed");
    }

    async fn render(&self, rendering: Rendering) {
        let kind = rendering.kind();
        let presenter = &self.ctx.presenter;
        let Err(error) = presenter
            .render(self.session.id, &self.session.owner, rendering)
            .await
        else {
            return;
        };

        warn!(session = %self.session.id, kind, %error, "Rendering failed; sending plain notice");
        let notice = Rendering::Notice(format!("Could not display the {kind} screen."));
        if let Err(error) = presenter
            .render(self.session.id, &self.session.owner, notice)
            .await
        {
            error!(session = %self.session.id, %error, "Notice delivery failed");
        }
    }
}
