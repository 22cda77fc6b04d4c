//! Simulation configuration.

use crate::core::constants::MAX_ROUNDS;

/// Configuration for a batch of head-to-head battles.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of battles to run
    pub num_battles: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Round cap per battle
    pub max_rounds: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per battle)
    pub verbosity: u8,

    /// Keep levels and records between battles instead of fresh copies
    pub carry_progression: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_battles: 1000,
            seed: None,
            max_rounds: MAX_ROUNDS,
            verbosity: 1,
            carry_progression: false,
        }
    }
}

impl SimConfig {
    /// Small batch for a quick balance check
    pub fn quick() -> Self {
        Self {
            num_battles: 100,
            ..Default::default()
        }
    }

    /// Long career where both fighters level up as they go
    pub fn long_run(num_battles: u32) -> Self {
        Self {
            num_battles,
            carry_progression: true,
            ..Default::default()
        }
    }
}
