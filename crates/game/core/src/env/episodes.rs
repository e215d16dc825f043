use crate::episode::EpisodeScript;

/// Read-only access to authored episode scripts.
pub trait EpisodeOracle: Send + Sync {
    fn episode(&self, number: u32) -> Option<EpisodeScript>;

    /// Highest episode number with a script.
    fn last_episode(&self) -> u32;
}
