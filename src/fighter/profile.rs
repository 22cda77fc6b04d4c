use super::moves::{Move, ReactionSpeed};
use crate::core::constants::{TRAINING_DUMMY_POWER, TRAINING_DUMMY_TECHNIQUE};
use serde::{Deserialize, Serialize};

/// Personality and style produced by fighter generation.
///
/// The free-text fields are opaque to combat; only the oracle prompt reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FighterProfile {
    pub name: String,
    pub personality: String,
    pub backstory: String,
    pub preferred_moves: Vec<Move>,
    pub aggression_level: f64,
    pub defense_bias: f64,
    pub reaction_speed: ReactionSpeed,
    pub special_trait: String,
}

impl FighterProfile {
    /// A neutral profile with the given name.
    pub fn balanced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            personality: "Balanced fighter".to_string(),
            backstory: String::new(),
            preferred_moves: vec![Move::Punch, Move::Kick, Move::Block, Move::Feint],
            aggression_level: 0.5,
            defense_bias: 0.5,
            reaction_speed: ReactionSpeed::Medium,
            special_trait: "Balanced warrior".to_string(),
        }
    }

    /// Clamps both biases into [0, 1] and drops duplicate moves.
    pub fn normalize(&mut self) {
        self.aggression_level = clamp_unit(self.aggression_level);
        self.defense_bias = clamp_unit(self.defense_bias);
        let mut seen = Vec::with_capacity(self.preferred_moves.len());
        self.preferred_moves.retain(|m| {
            if seen.contains(m) {
                false
            } else {
                seen.push(*m);
                true
            }
        });
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Sparring partner used by training sessions: (profile, power, technique).
pub fn training_dummy_profile() -> (FighterProfile, u32, u32) {
    let profile = FighterProfile {
        name: "Training Dummy".to_string(),
        personality: "Basic sparring partner".to_string(),
        backstory: "A practice opponent".to_string(),
        preferred_moves: vec![Move::Punch, Move::Block],
        aggression_level: 0.5,
        defense_bias: 0.5,
        reaction_speed: ReactionSpeed::Medium,
        special_trait: "None".to_string(),
    };
    (profile, TRAINING_DUMMY_POWER, TRAINING_DUMMY_TECHNIQUE)
}
