//! Worker tasks that back the runtime orchestration.
//!
//! Each live battle runs in its own [`SessionWorker`]; the timeout module
//! supplies the deadlines and meter ticks it selects over.

mod session;
mod timeout;

use std::sync::Arc;

use crate::api::Presenter;
use crate::config::RuntimeConfig;
use crate::oracle::OracleManager;
use crate::registry::SessionRegistry;
use crate::repository::PlayerRepository;
use crate::rewards::RewardResolver;

pub use session::Command;
pub(crate) use session::SessionWorker;

/// Services shared by every session worker.
pub(crate) struct SessionContext {
    pub(crate) oracles: OracleManager,
    pub(crate) repository: Arc<dyn PlayerRepository>,
    pub(crate) presenter: Arc<dyn Presenter>,
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) rewards: RewardResolver,
    pub(crate) config: RuntimeConfig,
}
