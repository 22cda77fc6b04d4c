//! Batch runner: the real battle engine, many seeds, one report.

use super::config::SimConfig;
use super::report::{BattleRecord, SimReport};
use crate::ai::DecisionPolicy;
use crate::combat::{BattleEngine, BattleResult, Finish};
use crate::config::BattleConfig;
use crate::error::{GladiatorError, Result};
use crate::fighter::Fighter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Runs `config.num_battles` battles between the two templates.
///
/// Battles always use the rule-based policy so a seeded run is reproducible.
pub fn run_simulation(
    config: &SimConfig,
    f1_template: &Fighter,
    f2_template: &Fighter,
) -> Result<SimReport> {
    if f1_template.fighter_id == f2_template.fighter_id {
        return Err(GladiatorError::SelfBattle);
    }
    f1_template.validate()?;
    f2_template.validate()?;

    let engine = BattleEngine::new(
        DecisionPolicy::rule_based(),
        BattleConfig {
            max_rounds: config.max_rounds,
        },
    );

    let mut f1 = f1_template.clone();
    let mut f2 = f2_template.clone();
    let mut records = Vec::with_capacity(config.num_battles as usize);

    for battle_idx in 0..config.num_battles {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(battle_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        if !config.carry_progression {
            f1 = f1_template.clone();
            f2 = f2_template.clone();
        }

        let result = engine.simulate_battle(&mut f1, &mut f2, &mut rng)?;
        let record = record_battle(&result, &f1, &f2);

        if config.verbosity >= 2 {
            println!(
                "Battle {}/{} - {} in {} rounds ({} HP vs {} HP)",
                battle_idx + 1,
                config.num_battles,
                record.outcome.as_str(),
                record.rounds,
                record.f1_final_health,
                record.f2_final_health
            );
        }
        records.push(record);
    }

    Ok(SimReport::from_battles(
        &f1.name,
        &f2.name,
        records,
        [f1.level, f2.level],
    ))
}

/// Final health is the last logged round's, before any level-up restore.
fn record_battle(result: &BattleResult, f1: &Fighter, f2: &Fighter) -> BattleRecord {
    let (f1_final_health, f2_final_health) = result
        .last_entry()
        .map_or((f1.health, f2.health), |last| (last.f1_health, last.f2_health));
    BattleRecord {
        outcome: result.outcome,
        knockout: matches!(result.finish, Finish::Knockout | Finish::DoubleKnockout),
        rounds: result.rounds,
        f1_final_health,
        f2_final_health,
    }
}
