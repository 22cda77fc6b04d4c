//! Combat math, round resolution, and battle orchestration.

pub mod battle;
pub mod math;
pub mod resolver;
pub mod types;

pub use battle::{apply_progression, determine_winner, BattleEngine, BattlePhase, BattleSession};
pub use resolver::{execute_action, resolve_round, RoundOutcome};
pub use types::*;
