//! Gladiators - AI-driven arena fighter battles.
//!
//! Fighters are generated from free-text prompts, persisted as JSON, and
//! fight turn-based battles resolved by a seeded combat engine. A text oracle
//! can steer generation, decisions and commentary; every path also works
//! rule-based and offline.

pub mod ai;
pub mod arena;
pub mod build_info;
pub mod combat;
pub mod config;
pub mod core;
pub mod error;
pub mod fighter;
pub mod simulator;
pub mod storage;
pub mod ui;

pub use arena::{
    Arena, ArenaBattle, FighterSummary, GlobalStats, SessionResult, TrainingReport,
    TrainingSession,
};
pub use combat::{
    BattleEngine, BattleOutcome, BattleResult, CornerStats, Finish, RoundLogEntry, Side,
};
pub use config::{BattleConfig, GladiatorConfig};
pub use error::{GladiatorError, Result};
pub use fighter::{ActionType, Fighter, FighterProfile, Move, ReactionSpeed};
pub use storage::FighterStore;
