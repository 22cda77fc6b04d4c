use super::moves::{Move, ReactionSpeed};
use super::profile::FighterProfile;
use crate::core::constants::*;
use crate::error::{GladiatorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A persistent arena fighter: identity, personality, combat stats and record.
///
/// Invariant: `health <= max_health` and `stamina <= max_stamina` after every
/// mutation. All mutators below preserve it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fighter {
    pub fighter_id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,

    // Personality
    pub personality: String,
    pub backstory: String,
    pub preferred_moves: Vec<Move>,
    pub aggression_level: f64,
    pub defense_bias: f64,
    pub reaction_speed: ReactionSpeed,
    pub special_trait: String,

    // Combat stats
    pub health: u32,
    pub max_health: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub power: u32,
    pub technique: u32,

    // Progression
    pub level: u32,
    pub experience: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Fighter {
    /// Creates a level 1 fighter with base stats and a fresh id.
    pub fn from_profile(profile: FighterProfile) -> Self {
        Self::with_stats(profile, BASE_POWER, BASE_TECHNIQUE)
    }

    pub fn with_stats(mut profile: FighterProfile, power: u32, technique: u32) -> Self {
        profile.normalize();
        Self {
            fighter_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            name: profile.name,
            personality: profile.personality,
            backstory: profile.backstory,
            preferred_moves: profile.preferred_moves,
            aggression_level: profile.aggression_level,
            defense_bias: profile.defense_bias,
            reaction_speed: profile.reaction_speed,
            special_trait: profile.special_trait,
            health: BASE_HEALTH,
            max_health: BASE_HEALTH,
            stamina: BASE_STAMINA,
            max_stamina: BASE_STAMINA,
            power,
            technique,
            level: 1,
            experience: 0,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    /// Checks the stat ranges combat relies on.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(GladiatorError::InvalidFighter(reason));
        if self.max_health == 0 || self.max_stamina == 0 {
            return fail(format!("{}: max health and stamina must be positive", self.name));
        }
        if self.health > self.max_health {
            return fail(format!("{}: health exceeds max health", self.name));
        }
        if self.stamina > self.max_stamina {
            return fail(format!("{}: stamina exceeds max stamina", self.name));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.aggression_level) || !unit.contains(&self.defense_bias) {
            return fail(format!("{}: aggression and defense must be within [0, 1]", self.name));
        }
        if self.level == 0 {
            return fail(format!("{}: level must be at least 1", self.name));
        }
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies damage, flooring health at 0. Returns whether the fighter is still standing.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.is_alive()
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Spends stamina if enough is available. Leaves stamina untouched on failure.
    pub fn use_stamina(&mut self, amount: u32) -> bool {
        if self.stamina >= amount {
            self.stamina -= amount;
            true
        } else {
            false
        }
    }

    pub fn recover_stamina(&mut self, amount: u32) {
        self.stamina = self.stamina.saturating_add(amount).min(self.max_stamina);
    }

    pub fn reset_for_battle(&mut self) {
        self.health = self.max_health;
        self.stamina = self.max_stamina;
    }

    /// Experience needed to leave the current level.
    pub fn xp_for_next_level(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// Adds experience and processes level-ups. Returns the number of levels gained.
    ///
    /// The threshold is recomputed after every level-up, so one large grant
    /// can cascade through several levels.
    pub fn add_experience(&mut self, exp: u32) -> u32 {
        self.experience = self.experience.saturating_add(exp);
        let mut levelups = 0;
        loop {
            let needed = self.xp_for_next_level();
            if self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level_up();
            levelups += 1;
        }
        levelups
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.max_health += LEVEL_UP_HEALTH;
        self.max_stamina += LEVEL_UP_STAMINA;
        self.power += LEVEL_UP_POWER;
        self.technique += LEVEL_UP_TECHNIQUE;
        self.health = self.max_health;
        self.stamina = self.max_stamina;
    }

    pub fn record_win(&mut self) -> u32 {
        self.wins += 1;
        self.add_experience(WIN_XP)
    }

    pub fn record_loss(&mut self) -> u32 {
        self.losses += 1;
        self.add_experience(LOSS_XP)
    }

    pub fn record_draw(&mut self) -> u32 {
        self.draws += 1;
        self.add_experience(DRAW_XP)
    }

    pub fn total_battles(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Win percentage in [0, 100]; 0 before the first battle.
    pub fn win_rate(&self) -> f64 {
        let total = self.total_battles();
        if total == 0 {
            return 0.0;
        }
        self.wins as f64 / total as f64 * 100.0
    }

    pub fn health_ratio(&self) -> f64 {
        ratio(self.health, self.max_health)
    }

    pub fn stamina_ratio(&self) -> f64 {
        ratio(self.stamina, self.max_stamina)
    }
}

fn ratio(current: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        current as f64 / max as f64
    }
}

impl fmt::Display for Fighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Lvl {}) - {}W/{}L/{}D - Win Rate: {:.1}%",
            self.name,
            self.level,
            self.wins,
            self.losses,
            self.draws,
            self.win_rate()
        )
    }
}
