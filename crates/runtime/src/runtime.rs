//! High-level battle orchestrator.
//!
//! The runtime validates start requests, assembles each battle from the
//! player record and static content, and spawns one worker per session.
//! Player input is routed back to the right worker through the registry.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

use game_core::{BattleState, Difficulty, StageDirector, build_team};

use crate::api::{
    LogPresenter, PlayerCommand, Presenter, Result, RuntimeError, SessionHandle,
};
use crate::config::RuntimeConfig;
use crate::oracle::OracleManager;
use crate::registry::SessionRegistry;
use crate::repository::{InMemoryPlayerRepository, PlayerRecord, PlayerRepository};
use crate::rewards::RewardResolver;
use crate::session::{Session, SessionId, SessionView};
use crate::workers::{SessionContext, SessionWorker};

/// Entry point for starting battles and routing player commands.
///
/// Design: the runtime owns the worker tasks; every live battle is reachable
/// through the injected [`SessionRegistry`].
pub struct BattleRuntime {
    ctx: Arc<SessionContext>,
    workers: Mutex<JoinSet<()>>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.ctx.registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.ctx.config
    }

    /// Starts an episode for `owner`.
    ///
    /// Rejects the request when the owner already has a live battle, is on a
    /// defeat cooldown, or has not unlocked the episode. `difficulty` falls
    /// back to the owner's stored preference.
    pub async fn start_episode(
        &self,
        owner: &str,
        episode: u32,
        difficulty: Option<Difficulty>,
    ) -> Result<SessionId> {
        if self.ctx.registry.for_owner(owner).is_some() {
            return Err(RuntimeError::BattleInProgress);
        }

        let record = self.ctx.repository.find_or_default(owner).await?;
        self.check_cooldown(&record)?;
        if episode > record.episodes.highest_unlocked {
            return Err(RuntimeError::EpisodeLocked {
                requested: episode,
                unlocked: record.episodes.highest_unlocked,
            });
        }
        let script = self
            .ctx
            .oracles
            .episodes()
            .episode(episode)
            .ok_or(RuntimeError::UnknownEpisode(episode))?;
        let difficulty = difficulty.unwrap_or(record.episodes.difficulty);

        let team = build_team(
            &record.team_spec(),
            self.ctx.oracles.catalog(),
            self.ctx.oracles.config(),
        )?;
        let battle = BattleState::new(team, rand::random(), record.supplies());

        let id = self.ctx.registry.create(owner)?;
        let (command_tx, command_rx) = mpsc::channel(self.ctx.config.command_buffer_size.max(1));
        let cancel = CancellationToken::new();
        self.ctx
            .registry
            .attach(SessionHandle::new(id, owner, command_tx, cancel.clone()));

        let session = Session::new(id, owner, StageDirector::new(script, difficulty), battle);
        let worker = SessionWorker::new(session, Arc::clone(&self.ctx), command_rx, cancel);
        self.spawn(worker);

        info!(session = %id, owner, episode, %difficulty, "Battle requested");
        Ok(id)
    }

    fn check_cooldown(&self, record: &PlayerRecord) -> Result<()> {
        let Some(defeat) = &record.episodes.last_defeat else {
            return Ok(());
        };
        let cooldown = chrono::Duration::from_std(self.ctx.config.defeat_cooldown)
            .unwrap_or(chrono::Duration::MAX);
        let ready_at = defeat.at.checked_add_signed(cooldown).unwrap_or(defeat.at);
        let remaining = ready_at.signed_duration_since(Utc::now());
        if remaining > chrono::Duration::zero() {
            // round up so "0s" is never reported while still blocked
            let remaining_secs = (remaining.num_milliseconds() as u64).div_ceil(1_000);
            return Err(RuntimeError::CooldownActive { remaining_secs });
        }
        Ok(())
    }

    fn spawn(&self, worker: SessionWorker) {
        let mut workers = match self.workers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // reap finished sessions so the set does not grow without bound
        while workers.try_join_next().is_some() {}
        workers.spawn(worker.run());
    }

    /// Routes a player command to the session's worker.
    pub async fn dispatch(
        &self,
        session: SessionId,
        owner: &str,
        command: PlayerCommand,
    ) -> Result<()> {
        let handle = self.handle_for(session, owner)?;
        handle.send(command).await
    }

    /// Read-only snapshot of a live session.
    pub async fn view(&self, session: SessionId, owner: &str) -> Result<SessionView> {
        self.handle_for(session, owner)?.view().await
    }

    /// The owner's live session, if any.
    pub fn active_session(&self, owner: &str) -> Option<SessionId> {
        self.ctx.registry.for_owner(owner)
    }

    fn handle_for(&self, session: SessionId, owner: &str) -> Result<SessionHandle> {
        let handle = self
            .ctx
            .registry
            .get(session)
            .ok_or(RuntimeError::SessionNotFound)?;
        if handle.owner() != owner {
            return Err(RuntimeError::NotSessionOwner);
        }
        Ok(handle)
    }

    /// Cancels every live session without settling it and waits for the
    /// workers to exit.
    pub async fn shutdown(self) -> Result<()> {
        for id in self.ctx.registry.ids() {
            self.ctx.registry.delete(id);
        }

        let mut workers = match self.workers.into_inner() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        while let Some(joined) = workers.join_next().await {
            joined.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn PlayerRepository>>,
    presenter: Option<Arc<dyn Presenter>>,
    registry: Option<Arc<SessionRegistry>>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            repository: None,
            presenter: None,
            registry: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Content oracles. Without them the builder loads `config.data_dir`, or
    /// the compiled-in content when no directory is set.
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Player record store (default: in-memory)
    pub fn repository(mut self, repository: Arc<dyn PlayerRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Presentation port (default: log only)
    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Share a registry with other components.
    pub fn registry(mut self, registry: Arc<SessionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<BattleRuntime> {
        let oracles = match self.oracles {
            Some(oracles) => oracles,
            None => {
                let loaded = match &self.config.data_dir {
                    Some(dir) => OracleManager::from_dir(dir.clone()),
                    None => OracleManager::builtin(),
                };
                loaded.map_err(|e| RuntimeError::Content(format!("{e:#}")))?
            }
        };
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryPlayerRepository::new()));
        let presenter = self.presenter.unwrap_or_else(|| Arc::new(LogPresenter));
        let registry = self.registry.unwrap_or_default();
        let rewards = RewardResolver::new(Arc::clone(&repository), oracles.clone(), &self.config);

        Ok(BattleRuntime {
            ctx: Arc::new(SessionContext {
                oracles,
                repository,
                presenter,
                registry,
                rewards,
                config: self.config,
            }),
            workers: Mutex::new(JoinSet::new()),
        })
    }
}
