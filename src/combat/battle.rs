//! Battle orchestration: the round loop, winner determination, and progression.
//!
//! All battle-scoped state lives in a [`BattleSession`] created per call, so a
//! single [`BattleEngine`] can run any number of battles.

use super::resolver::resolve_round;
use super::types::*;
use crate::ai::{DecisionContext, DecisionPolicy};
use crate::config::BattleConfig;
use crate::error::{GladiatorError, Result};
use crate::fighter::{Fighter, Move};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    NotStarted,
    InRound(u32),
    Resolved(BattleOutcome),
}

/// Per-call battle state threaded through the round loop.
#[derive(Debug, Clone)]
pub struct BattleSession {
    pub phase: BattlePhase,
    pub round: u32,
    pub last_f1_move: Option<Move>,
    pub last_f2_move: Option<Move>,
    pub log: Vec<RoundLogEntry>,
}

impl Default for BattleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleSession {
    pub fn new() -> Self {
        Self {
            phase: BattlePhase::NotStarted,
            round: 0,
            last_f1_move: None,
            last_f2_move: None,
            log: Vec::new(),
        }
    }

    pub fn begin_round(&mut self) -> u32 {
        self.round += 1;
        self.phase = BattlePhase::InRound(self.round);
        self.round
    }

    /// Context for `side`, which sees only the other side's previous move.
    pub fn context_for(&self, side: Side) -> DecisionContext {
        let last_opponent_move = match side {
            Side::Fighter1 => self.last_f2_move,
            Side::Fighter2 => self.last_f1_move,
        };
        DecisionContext {
            round: self.round,
            last_opponent_move,
        }
    }

    pub fn record(&mut self, entry: RoundLogEntry) {
        self.last_f1_move = Some(entry.f1_move);
        self.last_f2_move = Some(entry.f2_move);
        self.log.push(entry);
    }

    pub fn resolve(&mut self, outcome: BattleOutcome) {
        self.phase = BattlePhase::Resolved(outcome);
    }
}

/// Runs battles between two fighters using a decision policy.
#[derive(Default)]
pub struct BattleEngine {
    policy: DecisionPolicy,
    config: BattleConfig,
}

impl BattleEngine {
    pub fn new(policy: DecisionPolicy, config: BattleConfig) -> Self {
        Self { policy, config }
    }

    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Runs a full battle, mutating both fighters in place.
    ///
    /// Both fighters are reset to full health and stamina first. Progression
    /// (record and experience) is applied once the battle resolves.
    ///
    /// # Errors
    /// `SelfBattle` when both fighters share an id, `InvalidFighter` when
    /// either fails validation, and `Config` for a zero round cap. Nothing is
    /// mutated when an error is returned.
    pub fn simulate_battle<R: Rng>(
        &self,
        f1: &mut Fighter,
        f2: &mut Fighter,
        rng: &mut R,
    ) -> Result<BattleResult> {
        if f1.fighter_id == f2.fighter_id {
            return Err(GladiatorError::SelfBattle);
        }
        if self.config.max_rounds == 0 {
            return Err(GladiatorError::Config("max_rounds must be at least 1".into()));
        }
        f1.validate()?;
        f2.validate()?;

        f1.reset_for_battle();
        f2.reset_for_battle();
        let mut session = BattleSession::new();

        tracing::info!(fighter1 = %f1.name, fighter2 = %f2.name, "battle start");

        while session.round < self.config.max_rounds {
            let round = session.begin_round();

            let d1 = self
                .policy
                .decide(f1, f2, &session.context_for(Side::Fighter1), rng);
            let d2 = self
                .policy
                .decide(f2, f1, &session.context_for(Side::Fighter2), rng);

            let outcome = resolve_round(f1, d1, f2, d2, rng);
            let knockout = !f1.is_alive() || !f2.is_alive();

            tracing::debug!(
                round,
                f1_action = %d1.action_type,
                f1_move = %d1.mv,
                f2_action = %d2.action_type,
                f2_move = %d2.mv,
                f1_health = f1.health,
                f2_health = f2.health,
                "round resolved"
            );

            session.record(RoundLogEntry {
                round,
                fighter1_name: f1.name.clone(),
                fighter2_name: f2.name.clone(),
                f1_action_type: d1.action_type,
                f1_move: d1.mv,
                f2_action_type: d2.action_type,
                f2_move: d2.mv,
                f1_health: f1.health,
                f2_health: f2.health,
                result: if knockout {
                    RoundResult::Knockout
                } else {
                    RoundResult::RoundComplete
                },
                first_actor: outcome.first_actor,
                f1_outcome: outcome.f1_outcome,
                f2_outcome: outcome.f2_outcome,
                f1_stamina: f1.stamina,
                f2_stamina: f2.stamina,
            });

            if knockout {
                break;
            }
        }

        let (outcome, finish) = determine_winner(f1, f2);
        session.resolve(outcome);
        let levels = apply_progression(f1, f2, outcome);

        tracing::info!(
            outcome = outcome.as_str(),
            rounds = session.round,
            f1_levels = levels[0],
            f2_levels = levels[1],
            "battle end"
        );

        Ok(BattleResult {
            outcome,
            finish,
            rounds: session.round,
            log: session.log,
        })
    }
}

/// Decides the outcome from the fighters' final health.
pub fn determine_winner(f1: &Fighter, f2: &Fighter) -> (BattleOutcome, Finish) {
    match (f1.is_alive(), f2.is_alive()) {
        (false, false) => (BattleOutcome::Draw, Finish::DoubleKnockout),
        (true, false) => (BattleOutcome::Fighter1, Finish::Knockout),
        (false, true) => (BattleOutcome::Fighter2, Finish::Knockout),
        (true, true) => match f1.health.cmp(&f2.health) {
            std::cmp::Ordering::Greater => (BattleOutcome::Fighter1, Finish::Decision),
            std::cmp::Ordering::Less => (BattleOutcome::Fighter2, Finish::Decision),
            std::cmp::Ordering::Equal => (BattleOutcome::Draw, Finish::DecisionDraw),
        },
    }
}

/// Records the result on both fighters. Returns levels gained per side.
pub fn apply_progression(f1: &mut Fighter, f2: &mut Fighter, outcome: BattleOutcome) -> [u32; 2] {
    match outcome {
        BattleOutcome::Fighter1 => [f1.record_win(), f2.record_loss()],
        BattleOutcome::Fighter2 => [f1.record_loss(), f2.record_win()],
        BattleOutcome::Draw => [f1.record_draw(), f2.record_draw()],
    }
}
