//! Combat arithmetic shared by the turn resolver.
//!
//! These helpers are pure and never touch RNG; the resolver supplies rolls.

use crate::config::BattleConfig;
use crate::state::CombatantSnapshot;

/// Team slot the enemies focus: the living combatant with the highest power,
/// lowest slot on ties.
pub fn focus_fire_target(team: &[CombatantSnapshot]) -> Option<usize> {
    team.iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        // max_by_key keeps the last maximum, so reverse to prefer the lowest slot
        .rev()
        .max_by_key(|(_, c)| c.power)
        .map(|(idx, _)| idx)
}

/// Health restored by a heal of `percent` on a combatant with `max_health`,
/// before capping at missing health.
pub fn heal_amount(max_health: u32, percent: u32) -> u32 {
    ((u64::from(max_health) * u64::from(percent)) / 100) as u32
}

/// Highest health percentage at which an enemy can be executed.
pub fn execute_threshold(conqueror_stars: u8, config: &BattleConfig) -> u32 {
    (u32::from(conqueror_stars) * config.execute_percent_per_star).min(config.execute_cap_percent)
}

/// Whether an enemy with `health`/`max_health` is inside `threshold` percent.
pub fn within_threshold(health: u32, max_health: u32, threshold: u32) -> bool {
    u64::from(health) * 100 <= u64::from(max_health) * u64::from(threshold)
}

/// Area damage dealt to one enemy by an overwhelm. Always at least one point.
pub fn overwhelm_damage(max_health: u32, conqueror_stars: u8, config: &BattleConfig) -> u32 {
    let percent = u32::from(conqueror_stars) * config.overwhelm_percent_per_star;
    heal_amount(max_health, percent).max(1)
}
