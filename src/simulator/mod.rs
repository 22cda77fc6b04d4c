//! Monte Carlo battle simulator.
//!
//! Runs thousands of seeded head-to-head battles through the real battle
//! engine to compare fighter builds:
//! - Win/draw split and knockout rate
//! - Battle length distribution
//! - Level growth when progression carries over

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{BattleRecord, SimReport};
pub use runner::run_simulation;
