use crate::fighter::{ActionType, Fighter, Move};
use serde::{Deserialize, Serialize};

/// One of the two participants, in the order they were passed to the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Fighter1,
    Fighter2,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::Fighter1 => Side::Fighter2,
            Side::Fighter2 => Side::Fighter1,
        }
    }
}

/// A fighter's chosen action for one round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub action_type: ActionType,
    #[serde(rename = "move")]
    pub mv: Move,
}

impl Decision {
    pub fn new(action_type: ActionType, mv: Move) -> Self {
        Self { action_type, mv }
    }
}

/// What one fighter's action actually did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Attack or special connected.
    Hit { damage: u32 },
    /// Attack or special paid for but missed.
    Miss,
    /// Not enough stamina to attack.
    Exhausted,
    /// Defensive stance restored health.
    Defended { heal: u32 },
    /// Not enough stamina to defend.
    Winded,
    /// Knocked out before acting.
    NoAction,
}

impl ActionOutcome {
    pub fn damage(&self) -> u32 {
        match self {
            ActionOutcome::Hit { damage } => *damage,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundResult {
    RoundComplete,
    Knockout,
}

/// One row of the append-only battle log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundLogEntry {
    pub round: u32,
    pub fighter1_name: String,
    pub fighter2_name: String,
    pub f1_action_type: ActionType,
    pub f1_move: Move,
    pub f2_action_type: ActionType,
    pub f2_move: Move,
    pub f1_health: u32,
    pub f2_health: u32,
    pub result: RoundResult,
    pub first_actor: Side,
    pub f1_outcome: ActionOutcome,
    pub f2_outcome: ActionOutcome,
    pub f1_stamina: u32,
    pub f2_stamina: u32,
}

impl RoundLogEntry {
    pub fn decision(&self, side: Side) -> Decision {
        match side {
            Side::Fighter1 => Decision::new(self.f1_action_type, self.f1_move),
            Side::Fighter2 => Decision::new(self.f2_action_type, self.f2_move),
        }
    }

    pub fn outcome(&self, side: Side) -> ActionOutcome {
        match side {
            Side::Fighter1 => self.f1_outcome,
            Side::Fighter2 => self.f2_outcome,
        }
    }

    pub fn health(&self, side: Side) -> u32 {
        match side {
            Side::Fighter1 => self.f1_health,
            Side::Fighter2 => self.f2_health,
        }
    }

    pub fn stamina(&self, side: Side) -> u32 {
        match side {
            Side::Fighter1 => self.f1_stamina,
            Side::Fighter2 => self.f2_stamina,
        }
    }

    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::Fighter1 => &self.fighter1_name,
            Side::Fighter2 => &self.fighter2_name,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Fighter1,
    Fighter2,
    Draw,
}

impl BattleOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            BattleOutcome::Fighter1 => Some(Side::Fighter1),
            BattleOutcome::Fighter2 => Some(Side::Fighter2),
            BattleOutcome::Draw => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BattleOutcome::Fighter1 => "fighter1",
            BattleOutcome::Fighter2 => "fighter2",
            BattleOutcome::Draw => "draw",
        }
    }
}

/// How the battle ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Knockout,
    DoubleKnockout,
    Decision,
    DecisionDraw,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub finish: Finish,
    pub rounds: u32,
    pub log: Vec<RoundLogEntry>,
}

impl BattleResult {
    pub fn last_entry(&self) -> Option<&RoundLogEntry> {
        self.log.last()
    }
}

/// A fighter's name and capacities as they stood when the battle began.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CornerStats {
    pub name: String,
    pub max_health: u32,
    pub max_stamina: u32,
}

impl From<&Fighter> for CornerStats {
    fn from(fighter: &Fighter) -> Self {
        Self {
            name: fighter.name.clone(),
            max_health: fighter.max_health,
            max_stamina: fighter.max_stamina,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_like_api() {
        assert_eq!(
            serde_json::to_string(&BattleOutcome::Fighter1).unwrap(),
            "\"fighter1\""
        );
        assert_eq!(serde_json::to_string(&BattleOutcome::Draw).unwrap(), "\"draw\"");
    }

    #[test]
    fn test_action_outcome_tagged() {
        let json = serde_json::to_string(&ActionOutcome::Hit { damage: 12 }).unwrap();
        assert_eq!(json, r#"{"kind":"hit","damage":12}"#);
        let json = serde_json::to_string(&ActionOutcome::NoAction).unwrap();
        assert_eq!(json, r#"{"kind":"no_action"}"#);
    }

    #[test]
    fn test_decision_uses_move_key() {
        let json = serde_json::to_string(&Decision::new(ActionType::Attack, Move::Kick)).unwrap();
        assert_eq!(json, r#"{"action_type":"attack","move":"kick"}"#);
    }

    #[test]
    fn test_winner_side() {
        assert_eq!(BattleOutcome::Fighter2.winner(), Some(Side::Fighter2));
        assert_eq!(BattleOutcome::Draw.winner(), None);
        assert_eq!(Side::Fighter1.other(), Side::Fighter2);
    }
}
