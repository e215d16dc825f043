//! Cloneable façade for one session worker.
//!
//! [`SessionHandle`] hides the channel plumbing. The registry stores one per
//! live session; [`crate::BattleRuntime::dispatch`] looks it up and forwards
//! the player's command.
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::commands::PlayerCommand;
use super::errors::{Result, RuntimeError};
use crate::session::{SessionId, SessionView};
use crate::workers::Command;

#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    owner: Arc<str>,
    command_tx: mpsc::Sender<Command>,
    cancel: CancellationToken,
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        owner: &str,
        command_tx: mpsc::Sender<Command>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            owner: Arc::from(owner),
            command_tx,
            cancel,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Send a player command and wait for the worker to accept or reject it.
    pub async fn send(&self, command: PlayerCommand) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Player {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Query the live session (read-only snapshot).
    pub async fn view(&self) -> Result<SessionView> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Query { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Stop the worker without settling the session.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
