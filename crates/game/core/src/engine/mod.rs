//! Turn resolver.
//!
//! [`TurnResolver`] is the only code that mutates a [`BattleState`] during a
//! fight. A full turn is three steps, which the runtime may run with a delay
//! between them:
//!
//! ```text
//! apply_player_action → enemy_response → end_turn
//! ```
//!
//! [`TurnResolver::resolve_turn`] runs all three back to back. Techniques stop
//! after the first step because they keep the turn open.

mod report;
mod validate;

pub use report::{TurnEvent, TurnReport};

use crate::action::{ActionError, BattleAction, Technique};
use crate::combat;
use crate::config::BattleConfig;
use crate::env::{RngOracle, RollContext};
use crate::state::{BattleState, CombatantFlags, HealItem};

/// Applies player actions and enemy responses to one battle.
pub struct TurnResolver<'a> {
    state: &'a mut BattleState,
    rng: &'a dyn RngOracle,
    config: &'a BattleConfig,
}

impl<'a> TurnResolver<'a> {
    pub fn new(state: &'a mut BattleState, rng: &'a dyn RngOracle, config: &'a BattleConfig) -> Self {
        Self { state, rng, config }
    }

    /// Validates and applies one player action.
    ///
    /// Does not run the enemy response; see [`Self::resolve_turn`].
    pub fn apply_player_action(
        &mut self,
        action: BattleAction,
    ) -> Result<Vec<TurnEvent>, ActionError> {
        match action {
            BattleAction::Attack { actor, target } => self.attack(actor, target, false),
            BattleAction::Special { actor, target } => self.attack(actor, target, true),
            BattleAction::Heal { item, target } => self.heal(item, target),
            BattleAction::Technique { actor, technique } => self.technique(actor, technique),
        }
    }

    fn attack(
        &mut self,
        actor: usize,
        target: Option<usize>,
        special: bool,
    ) -> Result<Vec<TurnEvent>, ActionError> {
        let unit = validate::actor(self.state, actor)?;
        if special {
            validate::special(unit, self.config)?;
        } else {
            validate::stamina(unit, self.config.basic_attack_cost)?;
        }
        let target = validate::enemy_target(self.state, target)?;

        let (range, special_name) = match (&unit.special, special) {
            (Some(s), true) => (s.range, Some(s.name.clone())),
            _ => (unit.attack, None),
        };
        let seed = self.state.next_seed(actor, RollContext::PlayerDamage);
        let damage = self.rng.roll_damage(seed, range);

        let unit = &mut self.state.team[actor];
        if special {
            unit.drain(self.config.special_cost);
            unit.flags |= CombatantFlags::USED_SPECIAL | CombatantFlags::SKIP_NEXT_TURN_PENDING;
        } else {
            unit.drain(self.config.basic_attack_cost);
        }
        unit.flags |= CombatantFlags::ATTACKED_LAST_TURN;

        let enemy = &mut self.state.enemies[target];
        let dealt = enemy.take_damage(damage);

        Ok(vec![TurnEvent::PlayerHit {
            actor,
            target,
            damage: dealt,
            special: special_name,
            defeated: !enemy.is_alive(),
        }])
    }

    fn heal(&mut self, item: HealItem, target: usize) -> Result<Vec<TurnEvent>, ActionError> {
        let unit = validate::combatant(self.state, target)?;
        if !unit.is_alive() {
            return Err(ActionError::CombatantDown {
                name: unit.name.clone(),
            });
        }
        if self.state.supplies.count(item) == 0 {
            return Err(ActionError::OutOfStock { item });
        }

        self.state.supplies.consume(item);
        let unit = &mut self.state.team[target];
        let percent = item.heal_percent(unit.is_support());
        let amount = unit.restore(combat::heal_amount(unit.max_health, percent));

        let penalty = self.config.heal_stamina_penalty;
        let mut drained = Vec::new();
        for (idx, mate) in self.state.team.iter_mut().enumerate() {
            if idx != target && mate.is_alive() {
                mate.drain(penalty);
                drained.push(idx);
            }
        }

        Ok(vec![TurnEvent::Healed {
            item,
            target,
            amount,
            drained,
        }])
    }

    fn technique(
        &mut self,
        actor: usize,
        technique: Technique,
    ) -> Result<Vec<TurnEvent>, ActionError> {
        let unit = validate::actor(self.state, actor)?;
        validate::technique(self.state, unit, technique, self.config)?;
        let haki = unit.haki;

        // resolve the execute target before paying for it
        let execute_target = match technique {
            Technique::Execute { target } => {
                let target = validate::enemy_target(self.state, target)?;
                let enemy = &self.state.enemies[target];
                let threshold = combat::execute_threshold(haki.conqueror, self.config);
                if !combat::within_threshold(enemy.health, enemy.max_health, threshold) {
                    return Err(ActionError::AboveExecuteThreshold {
                        enemy: enemy.name.clone(),
                        health_percent: enemy.health_percent(),
                        threshold,
                    });
                }
                Some(target)
            }
            _ => None,
        };

        let cost = technique.cost(&self.config.techniques);
        let unit = &mut self.state.team[actor];
        unit.drain(cost);
        unit.flags |= CombatantFlags::USED_TECHNIQUE;

        let mut events = vec![TurnEvent::TechniqueUsed { actor, technique }];
        match technique {
            Technique::Foresight => {
                unit.flags |= CombatantFlags::GUARANTEED_DODGE_PENDING;
            }
            Technique::Guard { ally } => {
                self.state.guard = Some(ally);
            }
            Technique::Execute { .. } => {
                unit.flags |= CombatantFlags::ATTACKED_LAST_TURN;
                if let Some(target) = execute_target {
                    let enemy = &mut self.state.enemies[target];
                    let health = enemy.health;
                    enemy.take_damage(health);
                    events.push(TurnEvent::Executed { actor, target });
                }
            }
            Technique::Overwhelm => {
                unit.flags |= CombatantFlags::ATTACKED_LAST_TURN;
                let hits = self
                    .state
                    .enemies
                    .iter_mut()
                    .enumerate()
                    .filter(|(_, e)| e.is_alive())
                    .map(|(idx, enemy)| {
                        let damage =
                            combat::overwhelm_damage(enemy.max_health, haki.conqueror, self.config);
                        (idx, enemy.take_damage(damage))
                    })
                    .collect();
                events.push(TurnEvent::Overwhelmed { actor, hits });
            }
        }
        Ok(events)
    }

    /// Every living enemy swings once at the focus-fire target.
    ///
    /// A pending guard intercepts the first hit; a pending guaranteed dodge on
    /// the target negates exactly one hit; otherwise observation dodge rolls.
    pub fn enemy_response(&mut self) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        let attackers: Vec<usize> = self.state.living_enemies().map(|(idx, _)| idx).collect();

        for enemy_idx in attackers {
            let Some(target) = combat::focus_fire_target(&self.state.team) else {
                break;
            };

            let enemy = &mut self.state.enemies[enemy_idx];
            let (range, special) = match enemy.opening_special() {
                Some(s) => (s.range, Some(s.name.clone())),
                None => (enemy.attack, None),
            };
            enemy.engaged = true;

            if let Some(ally) = self.state.guard.take() {
                if self.state.team.get(ally).is_some_and(|c| c.is_alive()) {
                    events.push(TurnEvent::Guarded {
                        enemy: enemy_idx,
                        intended: target,
                        ally,
                    });
                    continue;
                }
            }

            let unit = &mut self.state.team[target];
            if unit.flags.contains(CombatantFlags::GUARANTEED_DODGE_PENDING) {
                unit.flags.remove(CombatantFlags::GUARANTEED_DODGE_PENDING);
                events.push(TurnEvent::Dodged {
                    enemy: enemy_idx,
                    target,
                    guaranteed: true,
                });
                continue;
            }

            let dodge_percent = unit.dodge_percent;
            if dodge_percent > 0 {
                let seed = self.state.next_seed(target, RollContext::Dodge);
                if self.rng.chance(seed, dodge_percent) {
                    events.push(TurnEvent::Dodged {
                        enemy: enemy_idx,
                        target,
                        guaranteed: false,
                    });
                    continue;
                }
            }

            let seed = self.state.next_seed(enemy_idx, RollContext::EnemyDamage);
            let damage = self.rng.roll_damage(seed, range);
            let unit = &mut self.state.team[target];
            let dealt = unit.take_damage(damage);
            events.push(TurnEvent::EnemyHit {
                enemy: enemy_idx,
                target,
                damage: dealt,
                special,
            });
            if !unit.is_alive() {
                events.push(TurnEvent::TeammateDown { slot: target });
            }
        }

        events
    }

    /// End-of-turn bookkeeping.
    ///
    /// Forced skips rotate (last turn's skip clears, a pending one activates),
    /// units that did not attack regain stamina, per-turn flags reset, and the
    /// fallen are pinned at zero stamina.
    pub fn end_turn(&mut self) {
        let cap = self.config.max_stamina;
        for unit in &mut self.state.team {
            unit.flags.remove(CombatantFlags::SKIP_THIS_TURN);
            if unit.flags.contains(CombatantFlags::SKIP_NEXT_TURN_PENDING) {
                unit.flags.remove(CombatantFlags::SKIP_NEXT_TURN_PENDING);
                unit.flags.insert(CombatantFlags::SKIP_THIS_TURN);
            }
            if !unit.flags.contains(CombatantFlags::ATTACKED_LAST_TURN) {
                unit.regain(1, cap);
            }
            unit.flags
                .remove(CombatantFlags::ATTACKED_LAST_TURN | CombatantFlags::USED_TECHNIQUE);
            if !unit.is_alive() {
                unit.stamina = 0;
            }
            unit.stamina = unit.stamina.min(cap);
        }
        self.state.turn += 1;
        self.state.refresh_life_index();
    }

    /// Applies an action and, when it ends the turn, the enemy response and
    /// bookkeeping.
    pub fn resolve_turn(&mut self, action: BattleAction) -> Result<TurnReport, ActionError> {
        let mut events = self.apply_player_action(action)?;

        if !action.ends_turn() && self.state.outcome().is_none() {
            return Ok(TurnReport {
                events,
                outcome: None,
                turn_ended: false,
            });
        }

        if self.state.outcome().is_none() {
            events.extend(self.enemy_response());
        }
        self.end_turn();

        Ok(TurnReport {
            events,
            outcome: self.state.outcome(),
            turn_ended: true,
        })
    }

    /// When the fight is undecided but no teammate can act, the enemies get a
    /// free response and the turn rolls over.
    pub fn resolve_stalemate(&mut self) -> Option<TurnReport> {
        if self.state.outcome().is_some() || self.state.any_can_act() {
            return None;
        }

        let mut events = vec![TurnEvent::Stalemate];
        events.extend(self.enemy_response());
        self.end_turn();

        Some(TurnReport {
            events,
            outcome: self.state.outcome(),
            turn_ended: true,
        })
    }
}
