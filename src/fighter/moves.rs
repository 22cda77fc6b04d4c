use crate::core::constants::DEFAULT_MOVE_MODIFIER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed move vocabulary. Anything outside it never reaches combat math.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Punch,
    Kick,
    Grapple,
    Counter,
    Feint,
    PressurePoint,
    Sweep,
    Throw,
    Block,
    Dodge,
}

pub const NUM_MOVES: usize = 10;

impl Move {
    pub fn all() -> [Move; NUM_MOVES] {
        [
            Move::Punch,
            Move::Kick,
            Move::Grapple,
            Move::Counter,
            Move::Feint,
            Move::PressurePoint,
            Move::Sweep,
            Move::Throw,
            Move::Block,
            Move::Dodge,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Punch => "punch",
            Move::Kick => "kick",
            Move::Grapple => "grapple",
            Move::Counter => "counter",
            Move::Feint => "feint",
            Move::PressurePoint => "pressure_point",
            Move::Sweep => "sweep",
            Move::Throw => "throw",
            Move::Block => "block",
            Move::Dodge => "dodge",
        }
    }

    /// Human-readable form ("pressure point").
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Per-move damage modifier. Moves without their own entry use 0.8.
    pub fn damage_modifier(&self) -> f64 {
        match self {
            Move::Punch => 0.8,
            Move::Kick => 1.0,
            Move::Sweep => 0.7,
            Move::Throw => 1.2,
            Move::Grapple => 1.1,
            Move::PressurePoint => 0.9,
            Move::Counter | Move::Feint | Move::Block | Move::Dodge => DEFAULT_MOVE_MODIFIER,
        }
    }

    pub fn is_attack_move(&self) -> bool {
        matches!(self, Move::Punch | Move::Kick | Move::Sweep | Move::Throw)
    }

    pub fn is_defense_move(&self) -> bool {
        matches!(self, Move::Block | Move::Dodge | Move::Counter)
    }

    pub fn is_special_move(&self) -> bool {
        matches!(self, Move::Feint | Move::Grapple | Move::PressurePoint)
    }

    /// Strikes the read-the-opponent heuristic answers with a counter.
    pub fn is_counterable(&self) -> bool {
        matches!(self, Move::Punch | Move::Kick)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Move::all()
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| format!("unknown move '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Attack,
    Defend,
    Special,
}

impl ActionType {
    pub fn all() -> [ActionType; 3] {
        [ActionType::Attack, ActionType::Defend, ActionType::Special]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Attack => "attack",
            ActionType::Defend => "defend",
            ActionType::Special => "special",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attack" => Ok(ActionType::Attack),
            "defend" => Ok(ActionType::Defend),
            "special" => Ok(ActionType::Special),
            other => Err(format!("unknown action type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReactionSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl ReactionSpeed {
    /// Initiative tier before jitter.
    pub fn speed_value(&self) -> f64 {
        match self {
            ReactionSpeed::Fast => 3.0,
            ReactionSpeed::Medium => 2.0,
            ReactionSpeed::Slow => 1.0,
        }
    }

    /// Flat hit-chance bonus for the attacker.
    pub fn hit_bonus(&self) -> f64 {
        match self {
            ReactionSpeed::Fast => 0.10,
            ReactionSpeed::Medium => 0.05,
            ReactionSpeed::Slow => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionSpeed::Slow => "slow",
            ReactionSpeed::Medium => "medium",
            ReactionSpeed::Fast => "fast",
        }
    }
}

impl fmt::Display for ReactionSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Ok(ReactionSpeed::Slow),
            "medium" => Ok(ReactionSpeed::Medium),
            "fast" => Ok(ReactionSpeed::Fast),
            other => Err(format!("unknown reaction speed '{}'", other)),
        }
    }
}
