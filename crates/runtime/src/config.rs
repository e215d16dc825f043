//! Runtime tuning: timers, cooldowns, and store retry policy.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration shared across the orchestrator and session workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Deadline for each turn menu.
    pub turn_timeout: Duration,
    /// Deadline for narrative and reward screens.
    pub idle_timeout: Duration,
    /// Pause between the player's action and the enemy counter.
    pub enemy_delay: Duration,
    /// How long a defeat blocks starting another episode.
    pub defeat_cooldown: Duration,
    pub store_retry_attempts: u32,
    pub store_retry_backoff: Duration,
    pub command_buffer_size: usize,
    /// Content directory; the compiled-in content is used when unset.
    pub data_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(45);
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_ENEMY_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_DEFEAT_COOLDOWN: Duration = Duration::from_secs(5 * 60);

    /// Build from `BATTLE_*` environment variables, falling back to defaults
    /// for anything unset or unparsable.
    ///
    /// | Variable | Unit |
    /// |----------|------|
    /// | `BATTLE_TURN_TIMEOUT_SECS` | seconds |
    /// | `BATTLE_IDLE_TIMEOUT_SECS` | seconds |
    /// | `BATTLE_ENEMY_DELAY_MS` | milliseconds |
    /// | `BATTLE_DEFEAT_COOLDOWN_SECS` | seconds |
    /// | `BATTLE_STORE_RETRY_ATTEMPTS` | count |
    /// | `BATTLE_STORE_RETRY_BACKOFF_MS` | milliseconds |
    /// | `BATTLE_COMMAND_BUFFER` | messages |
    /// | `BATTLE_DATA_DIR` | path |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            turn_timeout: read_env("BATTLE_TURN_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.turn_timeout),
            idle_timeout: read_env("BATTLE_IDLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
            enemy_delay: read_env("BATTLE_ENEMY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.enemy_delay),
            defeat_cooldown: read_env("BATTLE_DEFEAT_COOLDOWN_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.defeat_cooldown),
            store_retry_attempts: read_env("BATTLE_STORE_RETRY_ATTEMPTS")
                .unwrap_or(defaults.store_retry_attempts),
            store_retry_backoff: read_env("BATTLE_STORE_RETRY_BACKOFF_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_retry_backoff),
            command_buffer_size: read_env("BATTLE_COMMAND_BUFFER")
                .unwrap_or(defaults.command_buffer_size),
            data_dir: env::var_os("BATTLE_DATA_DIR").map(PathBuf::from),
        }
    }

    /// Loads a `.env` file if present, then reads the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Self::DEFAULT_TURN_TIMEOUT,
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
            enemy_delay: Self::DEFAULT_ENEMY_DELAY,
            defeat_cooldown: Self::DEFAULT_DEFEAT_COOLDOWN,
            store_retry_attempts: 3,
            store_retry_backoff: Duration::from_millis(200),
            command_buffer_size: 32,
            data_dir: None,
        }
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
