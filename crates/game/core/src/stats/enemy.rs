use crate::config::BattleConfig;
use crate::episode::{Difficulty, EnemyTemplate};
use crate::state::{DamageRange, EnemySnapshot, EnemySpecial};

use super::pipeline::round_to_five;

fn scaled(value: u32, multiplier: f64) -> u32 {
    let value = round_to_five(f64::from(value) * multiplier);
    if value <= 0.0 { 0 } else { value as u32 }
}

/// Like [`scaled`], but a nonzero stat never snaps down to zero.
fn scaled_nonzero(value: u32, multiplier: f64) -> u32 {
    let scaled = scaled(value, multiplier);
    if value > 0 { scaled.max(1) } else { scaled }
}

fn scaled_range(range: DamageRange, multiplier: f64) -> DamageRange {
    let min = scaled_nonzero(range.min, multiplier);
    DamageRange::new(min, scaled_nonzero(range.max, multiplier).max(min))
}

/// Materializes an enemy from its script template at a difficulty tier.
///
/// Health, attack range, power and the special range are multiplied by the
/// tier's multiplier and snapped to the nearest five. Attack, power and special
/// values that start above zero stay at least 1 after snapping, so a weak
/// template such as 1-2 still hits. Power defaults to the top of the attack
/// range when the template omits it.
pub fn scale_enemy(
    template: &EnemyTemplate,
    difficulty: Difficulty,
    config: &BattleConfig,
) -> EnemySnapshot {
    let multiplier = config.difficulty_multiplier(difficulty);
    let health = scaled(template.health, multiplier);
    let attack = scaled_range(template.attack, multiplier);
    let power = scaled_nonzero(template.power.unwrap_or(template.attack.max), multiplier);

    EnemySnapshot {
        id: template.id.clone(),
        name: template.name.clone(),
        health,
        max_health: health,
        attack,
        power,
        special: template.special.as_ref().map(|s| EnemySpecial {
            name: s.name.clone(),
            range: scaled_range(s.range, multiplier),
            opening: s.opening,
        }),
        engaged: false,
    }
}
