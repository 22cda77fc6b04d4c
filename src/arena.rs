//! Caller-facing arena service: creation, battles by id, training, rankings.

use crate::ai::{Commentator, DecisionPolicy, FighterGenerator, GeminiOracle, TextOracle};
use crate::combat::{BattleEngine, BattleOutcome, BattleResult, CornerStats, Side};
use crate::config::GladiatorConfig;
use crate::core::constants::*;
use crate::error::{GladiatorError, Result};
use crate::fighter::{training_dummy_profile, Fighter};
use crate::storage::FighterStore;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Post-battle snapshot of one participant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FighterSummary {
    pub health: u32,
    pub wins: u32,
    pub losses: u32,
    pub level: u32,
    pub exp_gained: u32,
}

impl FighterSummary {
    fn after(fighter: &Fighter, exp_gained: u32) -> Self {
        Self {
            health: fighter.health,
            wins: fighter.wins,
            losses: fighter.losses,
            level: fighter.level,
            exp_gained,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaBattle {
    pub result: BattleResult,
    pub winner_name: Option<String>,
    pub commentary: String,
    /// Both fighters after progression, in call order.
    pub fighters: [Fighter; 2],
    /// Capacities before any level-up, for rendering the log.
    pub corners: [CornerStats; 2],
    pub summaries: [FighterSummary; 2],
    /// Whether each fighter was persisted after the battle.
    pub saved: [bool; 2],
}

impl ArenaBattle {
    pub fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Fighter1 => &self.fighters[0],
            Side::Fighter2 => &self.fighters[1],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionResult {
    Victory,
    Defeat,
    Draw,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingSession {
    pub session: u32,
    pub result: SessionResult,
    pub rounds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub fighter: Fighter,
    pub sessions: Vec<TrainingSession>,
    pub wins: u32,
    pub bonus_exp: u32,
    pub leveled_up: bool,
    pub new_level: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalStats {
    pub total_fighters: usize,
    pub total_battles: u32,
    pub highest_level: u32,
    pub best_win_rate: f64,
}

pub struct Arena {
    store: FighterStore,
    engine: BattleEngine,
    generator: FighterGenerator,
    commentator: Commentator,
}

impl Arena {
    pub fn new(
        store: FighterStore,
        engine: BattleEngine,
        generator: FighterGenerator,
        commentator: Commentator,
    ) -> Self {
        Self {
            store,
            engine,
            generator,
            commentator,
        }
    }

    /// Arena that never calls out to an oracle.
    pub fn rule_based(store: FighterStore) -> Self {
        Self::new(
            store,
            BattleEngine::rule_based(),
            FighterGenerator::rule_based(),
            Commentator::rule_based(),
        )
    }

    /// Wires every component to the same oracle when one is configured.
    pub fn with_oracle(
        store: FighterStore,
        oracle: Arc<dyn TextOracle>,
        config: &GladiatorConfig,
    ) -> Self {
        Self::new(
            store,
            BattleEngine::new(DecisionPolicy::with_oracle(oracle.clone()), config.battle_config()),
            FighterGenerator::with_oracle(oracle.clone()),
            Commentator::with_oracle(oracle),
        )
    }

    pub fn from_config(config: &GladiatorConfig) -> Result<Self> {
        let store = FighterStore::from_config(config)?;
        match GeminiOracle::from_config(config) {
            Some(oracle) => {
                tracing::info!(model = %config.oracle_model, "oracle enabled");
                Ok(Self::with_oracle(store, Arc::new(oracle), config))
            }
            None => {
                tracing::info!("no oracle key configured, using rule-based play");
                Ok(Self::new(
                    store,
                    BattleEngine::new(DecisionPolicy::rule_based(), config.battle_config()),
                    FighterGenerator::rule_based(),
                    Commentator::rule_based(),
                ))
            }
        }
    }

    pub fn store(&self) -> &FighterStore {
        &self.store
    }

    pub fn create_fighter<R: Rng>(&self, prompt: &str, rng: &mut R) -> Result<Fighter> {
        let prompt = prompt.trim();
        if prompt.chars().count() < MIN_PROMPT_LEN {
            return Err(GladiatorError::InvalidPrompt(format!(
                "must be at least {} characters long",
                MIN_PROMPT_LEN
            )));
        }
        let fighter = Fighter::from_profile(self.generator.generate(prompt, rng));
        self.store.save_fighter(&fighter)?;
        tracing::info!(id = %fighter.fighter_id, name = %fighter.name, "fighter created");
        Ok(fighter)
    }

    pub fn battle<R: Rng>(&self, id1: &str, id2: &str, rng: &mut R) -> Result<ArenaBattle> {
        if id1 == id2 {
            return Err(GladiatorError::SelfBattle);
        }
        let mut f1 = self.store.load_fighter(id1)?;
        let mut f2 = self.store.load_fighter(id2)?;
        let corners = [CornerStats::from(&f1), CornerStats::from(&f2)];

        let result = self.engine.simulate_battle(&mut f1, &mut f2, rng)?;
        let commentary = self.commentator.commentate(&result.log);
        let saved = [self.save_quietly(&f1), self.save_quietly(&f2)];

        let winner_name = match result.outcome.winner() {
            Some(Side::Fighter1) => Some(f1.name.clone()),
            Some(Side::Fighter2) => Some(f2.name.clone()),
            None => None,
        };
        let summaries = [
            FighterSummary::after(&f1, exp_for(result.outcome, Side::Fighter1)),
            FighterSummary::after(&f2, exp_for(result.outcome, Side::Fighter2)),
        ];

        Ok(ArenaBattle {
            result,
            winner_name,
            commentary,
            fighters: [f1, f2],
            corners,
            summaries,
            saved,
        })
    }

    fn save_quietly(&self, fighter: &Fighter) -> bool {
        match self.store.save_fighter(fighter) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(id = %fighter.fighter_id, "failed to save fighter: {}", e);
                false
            }
        }
    }

    /// Spars against fresh training dummies, then grants a bonus per win.
    pub fn train<R: Rng>(&self, id: &str, rng: &mut R) -> Result<TrainingReport> {
        let mut fighter = self.store.load_fighter(id)?;
        let original_level = fighter.level;
        let mut sessions = Vec::with_capacity(TRAINING_SESSIONS as usize);
        let mut wins = 0;

        for session in 1..=TRAINING_SESSIONS {
            let (profile, power, technique) = training_dummy_profile();
            let mut dummy = Fighter::with_stats(profile, power, technique);
            let sparring = self.engine.simulate_battle(&mut fighter, &mut dummy, rng)?;
            let result = match sparring.outcome {
                BattleOutcome::Fighter1 => {
                    wins += 1;
                    SessionResult::Victory
                }
                BattleOutcome::Fighter2 => SessionResult::Defeat,
                BattleOutcome::Draw => SessionResult::Draw,
            };
            sessions.push(TrainingSession {
                session,
                result,
                rounds: sparring.rounds,
            });
        }

        let bonus_exp = wins * TRAINING_WIN_BONUS_XP;
        fighter.add_experience(bonus_exp);
        self.store.save_fighter(&fighter)?;

        tracing::info!(id = %fighter.fighter_id, wins, bonus_exp, "training complete");

        Ok(TrainingReport {
            leveled_up: fighter.level > original_level,
            new_level: fighter.level,
            fighter,
            sessions,
            wins,
            bonus_exp,
        })
    }

    /// Fighters by wins, then win rate, best first.
    pub fn rankings(&self) -> Result<Vec<Fighter>> {
        let mut fighters = self.store.list_fighters()?;
        fighters.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.win_rate().total_cmp(&a.win_rate()))
        });
        Ok(fighters)
    }

    pub fn global_stats(&self) -> Result<GlobalStats> {
        let fighters = self.store.list_fighters()?;
        if fighters.is_empty() {
            return Ok(GlobalStats::default());
        }
        let appearances: u32 = fighters.iter().map(|f| f.total_battles()).sum();
        let best_win_rate = fighters
            .iter()
            .map(|f| f.win_rate())
            .fold(0.0_f64, f64::max);
        Ok(GlobalStats {
            total_fighters: fighters.len(),
            total_battles: appearances / 2,
            highest_level: fighters.iter().map(|f| f.level).max().unwrap_or(0),
            best_win_rate: (best_win_rate * 10.0).round() / 10.0,
        })
    }
}

/// Experience granted by the battle record alone.
fn exp_for(outcome: BattleOutcome, side: Side) -> u32 {
    match outcome.winner() {
        None => DRAW_XP,
        Some(winner) if winner == side => WIN_XP,
        Some(_) => LOSS_XP,
    }
}
