//! Round resolution: initiative, sequential actions, stamina recovery.
//!
//! The resolver only ever touches health and stamina. Progression fields are
//! the orchestrator's business.

use super::math::*;
use super::types::{ActionOutcome, Decision, Side};
use crate::core::constants::*;
use crate::fighter::{ActionType, Fighter};
use rand::Rng;

/// Result of resolving one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub first_actor: Side,
    pub f1_outcome: ActionOutcome,
    pub f2_outcome: ActionOutcome,
}

/// Resolves both fighters' actions for a round.
///
/// The initiative winner's action resolves completely before the other
/// fighter acts, and a fighter knocked out by the first action does not act.
/// Both fighters then recover stamina regardless of what happened.
pub fn resolve_round<R: Rng + ?Sized>(
    f1: &mut Fighter,
    d1: Decision,
    f2: &mut Fighter,
    d2: Decision,
    rng: &mut R,
) -> RoundOutcome {
    let first_actor = roll_initiative(f1, f2, rng);

    let (f1_outcome, f2_outcome) = match first_actor {
        Side::Fighter1 => {
            let first = execute_action(f1, f2, d1, rng);
            let second = if f2.is_alive() {
                execute_action(f2, f1, d2, rng)
            } else {
                ActionOutcome::NoAction
            };
            (first, second)
        }
        Side::Fighter2 => {
            let first = execute_action(f2, f1, d2, rng);
            let second = if f1.is_alive() {
                execute_action(f1, f2, d1, rng)
            } else {
                ActionOutcome::NoAction
            };
            (second, first)
        }
    };

    f1.recover_stamina(ROUND_STAMINA_RECOVERY);
    f2.recover_stamina(ROUND_STAMINA_RECOVERY);

    RoundOutcome {
        first_actor,
        f1_outcome,
        f2_outcome,
    }
}

/// Applies a single fighter's action against the opponent.
pub fn execute_action<R: Rng + ?Sized>(
    actor: &mut Fighter,
    target: &mut Fighter,
    decision: Decision,
    rng: &mut R,
) -> ActionOutcome {
    match decision.action_type {
        ActionType::Attack => {
            if !actor.use_stamina(ATTACK_STAMINA_COST) {
                return ActionOutcome::Exhausted;
            }
            let hit_chance = calculate_hit_chance(actor, target);
            strike(actor, target, decision, hit_chance, NORMAL_ACTION_MULTIPLIER, rng)
        }
        ActionType::Defend => {
            if !actor.use_stamina(DEFEND_STAMINA_COST) {
                return ActionOutcome::Winded;
            }
            let before = actor.health;
            actor.heal(roll_defend_heal(rng));
            ActionOutcome::Defended {
                heal: actor.health - before,
            }
        }
        ActionType::Special => {
            if !actor.use_stamina(SPECIAL_STAMINA_COST) {
                return ActionOutcome::Exhausted;
            }
            let hit_chance = calculate_special_hit_chance(actor, target);
            strike(actor, target, decision, hit_chance, SPECIAL_ACTION_MULTIPLIER, rng)
        }
    }
}

fn strike<R: Rng + ?Sized>(
    actor: &Fighter,
    target: &mut Fighter,
    decision: Decision,
    hit_chance: f64,
    multiplier: f64,
    rng: &mut R,
) -> ActionOutcome {
    if !roll_hit(hit_chance, rng) {
        return ActionOutcome::Miss;
    }
    let damage = roll_damage(actor, decision.mv, multiplier, rng);
    target.take_damage(damage);
    ActionOutcome::Hit { damage }
}
