use super::DamageRange;

/// An enemy's signature move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySpecial {
    pub name: String,
    pub range: DamageRange,
    /// Fired in place of the enemy's first basic hit of the fight.
    pub opening: bool,
}

/// An enemy materialized for the current fight stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySnapshot {
    pub id: String,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub attack: DamageRange,
    pub power: u32,
    pub special: Option<EnemySpecial>,
    /// Set once the enemy has attacked at least once this fight.
    pub engaged: bool,
}

impl EnemySnapshot {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }

    /// Percentage of max health remaining, rounded down.
    pub fn health_percent(&self) -> u32 {
        if self.max_health == 0 {
            return 0;
        }
        ((u64::from(self.health) * 100) / u64::from(self.max_health)) as u32
    }

    /// The special to open with, if this is the enemy's first swing.
    pub fn opening_special(&self) -> Option<&EnemySpecial> {
        if self.engaged {
            return None;
        }
        self.special.as_ref().filter(|s| s.opening)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::enemy;
    use super::*;

    #[test]
    fn opening_special_only_before_first_attack() {
        let mut e = enemy("Buggy", 100, DamageRange::new(5, 10));
        e.special = Some(EnemySpecial {
            name: "Buggy Ball".into(),
            range: DamageRange::new(20, 25),
            opening: true,
        });
        assert!(e.opening_special().is_some());
        e.engaged = true;
        assert!(e.opening_special().is_none());
    }

    #[test]
    fn health_percent_rounds_down() {
        let mut e = enemy("Morgan", 200, DamageRange::fixed(5));
        e.take_damage(181);
        assert_eq!(e.health_percent(), 9);
    }
}
