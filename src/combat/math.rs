//! Hit, damage, and initiative math shared by the resolver and simulator.
//!
//! The roll-free functions are pure; the `roll_*` helpers draw from the
//! caller's generator so a seeded RNG reproduces a battle exactly.

use super::types::Side;
use crate::core::constants::*;
use crate::fighter::{Fighter, Move};
use rand::Rng;

/// Initiative score: speed tier plus uniform [0, 1) jitter.
pub fn speed_score<R: Rng + ?Sized>(fighter: &Fighter, rng: &mut R) -> f64 {
    fighter.reaction_speed.speed_value() + rng.gen::<f64>()
}

/// Decides who acts first this round. Exact ties go to fighter 1.
pub fn roll_initiative<R: Rng + ?Sized>(f1: &Fighter, f2: &Fighter, rng: &mut R) -> Side {
    let f1_score = speed_score(f1, rng);
    let f2_score = speed_score(f2, rng);
    if f1_score >= f2_score {
        Side::Fighter1
    } else {
        Side::Fighter2
    }
}

/// Probability that a normal attack lands, clamped to [0.30, 0.95].
pub fn calculate_hit_chance(attacker: &Fighter, defender: &Fighter) -> f64 {
    let technique_bonus = (attacker.technique as f64 / 100.0) * HIT_TECHNIQUE_FACTOR;
    let defense_penalty = defender.defense_bias * HIT_DEFENSE_PENALTY;
    let speed_bonus = attacker.reaction_speed.hit_bonus();

    let chance = BASE_HIT_CHANCE + technique_bonus - defense_penalty + speed_bonus;
    chance.clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}

/// Specials trade accuracy for damage.
pub fn calculate_special_hit_chance(attacker: &Fighter, defender: &Fighter) -> f64 {
    calculate_hit_chance(attacker, defender) * SPECIAL_HIT_FACTOR
}

/// Damage for a landed hit with an explicit variance factor.
///
/// Never below `MIN_DAMAGE`.
pub fn calculate_damage(
    attacker: &Fighter,
    mv: Move,
    action_multiplier: f64,
    variance: f64,
) -> u32 {
    let base = attacker.power as f64 * DAMAGE_POWER_FACTOR
        + attacker.technique as f64 * DAMAGE_TECHNIQUE_FACTOR;
    let raw = (base * mv.damage_modifier() * action_multiplier * variance).floor();
    if raw.is_finite() && raw > MIN_DAMAGE as f64 {
        raw as u32
    } else {
        MIN_DAMAGE
    }
}

/// Rolls variance in [0.8, 1.2] and computes damage.
pub fn roll_damage<R: Rng + ?Sized>(
    attacker: &Fighter,
    mv: Move,
    action_multiplier: f64,
    rng: &mut R,
) -> u32 {
    let variance = rng.gen_range(DAMAGE_VARIANCE_MIN..=DAMAGE_VARIANCE_MAX);
    calculate_damage(attacker, mv, action_multiplier, variance)
}

/// Bernoulli trial against a hit chance.
pub fn roll_hit<R: Rng + ?Sized>(hit_chance: f64, rng: &mut R) -> bool {
    rng.gen::<f64>() < hit_chance
}

/// Self-heal for a successful defensive stance.
pub fn roll_defend_heal<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(DEFEND_HEAL_MIN..=DEFEND_HEAL_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::{FighterProfile, ReactionSpeed};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(power: u32, technique: u32, speed: ReactionSpeed, defense: f64) -> Fighter {
        let mut profile = FighterProfile::balanced("Math");
        profile.reaction_speed = speed;
        profile.defense_bias = defense;
        Fighter::with_stats(profile, power, technique)
    }

    #[test]
    fn test_damage_formula() {
        let f = fighter(50, 50, ReactionSpeed::Medium, 0.5);
        // (15 + 10) * 1.0 * 1.0 * 1.0
        assert_eq!(calculate_damage(&f, Move::Kick, 1.0, 1.0), 25);
        // (15 + 10) * 0.8
        assert_eq!(calculate_damage(&f, Move::Punch, 1.0, 1.0), 20);
        // Special: 25 * 1.5 = 37.5 floors to 37
        assert_eq!(calculate_damage(&f, Move::Kick, 1.5, 1.0), 37);
    }

    #[test]
    fn test_damage_floor() {
        let weak = fighter(0, 0, ReactionSpeed::Slow, 0.0);
        assert_eq!(calculate_damage(&weak, Move::Sweep, 1.0, 0.8), 5);
        let tiny = fighter(10, 5, ReactionSpeed::Slow, 0.0);
        // (3 + 1) * 0.7 * 0.8 = 2.24
        assert_eq!(calculate_damage(&tiny, Move::Sweep, 1.0, 0.8), 5);
    }

    #[test]
    fn test_hit_chance_formula() {
        let attacker = fighter(50, 50, ReactionSpeed::Medium, 0.5);
        let defender = fighter(50, 50, ReactionSpeed::Medium, 0.5);
        // 0.7 + 0.1 - 0.075 + 0.05
        let chance = calculate_hit_chance(&attacker, &defender);
        assert!((chance - 0.775).abs() < 1e-9);
        let special = calculate_special_hit_chance(&attacker, &defender);
        assert!((special - 0.62).abs() < 1e-9);
    }

    #[test]
    fn test_hit_chance_clamped_high() {
        let attacker = fighter(50, 500, ReactionSpeed::Fast, 0.0);
        let defender = fighter(50, 50, ReactionSpeed::Slow, 0.0);
        assert_eq!(calculate_hit_chance(&attacker, &defender), 0.95);
    }

    #[test]
    fn test_hit_chance_never_below_floor() {
        let attacker = fighter(50, 0, ReactionSpeed::Slow, 0.0);
        let defender = fighter(50, 50, ReactionSpeed::Slow, 1.0);
        // 0.7 - 0.15 = 0.55, still above the floor
        assert!((calculate_hit_chance(&attacker, &defender) - 0.55).abs() < 1e-9);
        assert!(calculate_hit_chance(&attacker, &defender) >= 0.3);
    }

    #[test]
    fn test_roll_hit_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(roll_hit(1.0, &mut rng));
            assert!(!roll_hit(0.0, &mut rng));
        }
    }

    #[test]
    fn test_roll_defend_heal_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let heal = roll_defend_heal(&mut rng);
            assert!((2..=5).contains(&heal));
        }
    }

    #[test]
    fn test_roll_damage_within_variance_band() {
        let f = fighter(50, 50, ReactionSpeed::Medium, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let dmg = roll_damage(&f, Move::Kick, 1.0, &mut rng);
            assert!((20..=30).contains(&dmg), "damage {} outside band", dmg);
        }
    }

    #[test]
    fn test_fast_fighter_usually_wins_initiative() {
        let fast = fighter(50, 50, ReactionSpeed::Fast, 0.5);
        let slow = fighter(50, 50, ReactionSpeed::Slow, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        // Tier gap of 2 exceeds the jitter range, so fast always acts first.
        for _ in 0..100 {
            assert_eq!(roll_initiative(&fast, &slow, &mut rng), Side::Fighter1);
            assert_eq!(roll_initiative(&slow, &fast, &mut rng), Side::Fighter2);
        }
    }

    #[test]
    fn test_equal_tiers_split_initiative() {
        let a = fighter(50, 50, ReactionSpeed::Medium, 0.5);
        let b = fighter(50, 50, ReactionSpeed::Medium, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let firsts = (0..400)
            .filter(|_| roll_initiative(&a, &b, &mut rng) == Side::Fighter1)
            .count();
        assert!(firsts > 100 && firsts < 300, "got {}", firsts);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::fighter::{FighterProfile, ReactionSpeed};
    use proptest::prelude::*;

    fn speed_strategy() -> impl Strategy<Value = ReactionSpeed> {
        prop_oneof![
            Just(ReactionSpeed::Slow),
            Just(ReactionSpeed::Medium),
            Just(ReactionSpeed::Fast)
        ]
    }

    fn move_strategy() -> impl Strategy<Value = Move> {
        (0usize..Move::all().len()).prop_map(|i| Move::all()[i])
    }

    proptest! {
        #[test]
        fn damage_never_below_floor(
            power in 0u32..400,
            technique in 0u32..400,
            mv in move_strategy(),
            special in any::<bool>(),
            variance in 0.8f64..=1.2,
        ) {
            let f = Fighter::with_stats(FighterProfile::balanced("P"), power, technique);
            let multiplier = if special { 1.5 } else { 1.0 };
            prop_assert!(calculate_damage(&f, mv, multiplier, variance) >= 5);
        }

        #[test]
        fn hit_chance_within_bounds(
            technique in 0u32..1000,
            defense in 0.0f64..=1.0,
            attacker_speed in speed_strategy(),
        ) {
            let mut a = FighterProfile::balanced("A");
            a.reaction_speed = attacker_speed;
            let mut d = FighterProfile::balanced("D");
            d.defense_bias = defense;
            let attacker = Fighter::with_stats(a, 50, technique);
            let defender = Fighter::from_profile(d);
            let chance = calculate_hit_chance(&attacker, &defender);
            prop_assert!((0.30..=0.95).contains(&chance));
        }
    }
}
