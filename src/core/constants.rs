// Battle pacing
pub const MAX_ROUNDS: u32 = 30;
pub const ROUND_STAMINA_RECOVERY: u32 = 10;

// Action stamina costs
pub const ATTACK_STAMINA_COST: u32 = 15;
pub const DEFEND_STAMINA_COST: u32 = 5;
pub const SPECIAL_STAMINA_COST: u32 = 25;

// Defensive stance self-heal range (inclusive)
pub const DEFEND_HEAL_MIN: u32 = 2;
pub const DEFEND_HEAL_MAX: u32 = 5;

// Damage model: max(MIN_DAMAGE, (power*POWER + technique*TECHNIQUE) * move * action * variance)
pub const DAMAGE_POWER_FACTOR: f64 = 0.3;
pub const DAMAGE_TECHNIQUE_FACTOR: f64 = 0.2;
pub const DAMAGE_VARIANCE_MIN: f64 = 0.8;
pub const DAMAGE_VARIANCE_MAX: f64 = 1.2;
pub const MIN_DAMAGE: u32 = 5;
pub const NORMAL_ACTION_MULTIPLIER: f64 = 1.0;
pub const SPECIAL_ACTION_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_MOVE_MODIFIER: f64 = 0.8;

// Hit chance model
pub const BASE_HIT_CHANCE: f64 = 0.7;
pub const HIT_TECHNIQUE_FACTOR: f64 = 0.2;
pub const HIT_DEFENSE_PENALTY: f64 = 0.15;
pub const MIN_HIT_CHANCE: f64 = 0.3;
pub const MAX_HIT_CHANCE: f64 = 0.95;
pub const SPECIAL_HIT_FACTOR: f64 = 0.8;

// Rule-based decision weights
pub const SPECIAL_BASE_WEIGHT: f64 = 0.2;
pub const LOW_HEALTH_RATIO: f64 = 0.3;
pub const LOW_HEALTH_DEFEND_BOOST: f64 = 1.5;
pub const HIGH_HEALTH_RATIO: f64 = 0.7;
pub const OPPONENT_HURT_RATIO: f64 = 0.5;
pub const PRESS_ADVANTAGE_ATTACK_BOOST: f64 = 1.3;
pub const LOW_STAMINA_RATIO: f64 = 0.3;
pub const LOW_STAMINA_DEFEND_BOOST: f64 = 1.4;
pub const LOW_STAMINA_ATTACK_DAMPEN: f64 = 0.7;

// Progression
pub const XP_PER_LEVEL: u32 = 100;
pub const WIN_XP: u32 = 100;
pub const LOSS_XP: u32 = 25;
pub const DRAW_XP: u32 = 50;
pub const LEVEL_UP_HEALTH: u32 = 10;
pub const LEVEL_UP_STAMINA: u32 = 5;
pub const LEVEL_UP_POWER: u32 = 3;
pub const LEVEL_UP_TECHNIQUE: u32 = 3;

// Fresh fighter stats
pub const BASE_HEALTH: u32 = 100;
pub const BASE_STAMINA: u32 = 100;
pub const BASE_POWER: u32 = 50;
pub const BASE_TECHNIQUE: u32 = 50;

// Training
pub const TRAINING_SESSIONS: u32 = 3;
pub const TRAINING_WIN_BONUS_XP: u32 = 30;
pub const TRAINING_DUMMY_POWER: u32 = 30;
pub const TRAINING_DUMMY_TECHNIQUE: u32 = 30;

// Fighter generation
pub const MAX_PREFERRED_MOVES: usize = 5;
pub const RANDOM_PREFERRED_MOVES: usize = 4;
pub const MIN_PROMPT_LEN: usize = 10;

// Commentary
pub const TURNING_POINT_MIN_DROP: u32 = 15;
pub const AGGRESSION_RATIO: f64 = 1.4;
pub const DEFENSIVE_SHARE: f64 = 0.35;
pub const MOMENTUM_SHIFT_THRESHOLD: u32 = 3;
pub const CLOSE_FINISH_MARGIN: u32 = 15;
