//! Post-battle commentary.

use super::oracle::TextOracle;
use crate::combat::{RoundLogEntry, Side};
use crate::core::constants::*;
use crate::fighter::ActionType;
use std::sync::Arc;

const RULE: &str = "============================================================";
const BRIEF_BATTLE: &str = "The battle was too brief to analyze.";

/// Produces commentary from the oracle when available, else from rules.
#[derive(Clone, Default)]
pub struct Commentator {
    oracle: Option<Arc<dyn TextOracle>>,
}

impl Commentator {
    pub fn rule_based() -> Self {
        Self { oracle: None }
    }

    pub fn with_oracle(oracle: Arc<dyn TextOracle>) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    pub fn commentate(&self, log: &[RoundLogEntry]) -> String {
        let Some(stats) = BattleStats::from_log(log) else {
            return BRIEF_BATTLE.to_string();
        };
        if let Some(oracle) = &self.oracle {
            match oracle.generate(&stats.oracle_prompt()) {
                Ok(text) => return framed(text.trim()),
                Err(e) => tracing::warn!("commentary fell back to rules: {}", e),
            }
        }
        rule_based_commentary(log)
    }
}

fn framed(body: &str) -> String {
    format!("\n{RULE}\nBATTLE COMMENTARY\n{RULE}\n\n{body}\n\n{RULE}")
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SideStats {
    attacks: u32,
    defends: u32,
    specials: u32,
    damage_dealt: u32,
    damage_taken: u32,
    final_health: u32,
}

struct BattleStats<'a> {
    rounds: u32,
    f1_name: &'a str,
    f2_name: &'a str,
    opening: &'a RoundLogEntry,
    f1: SideStats,
    f2: SideStats,
}

impl<'a> BattleStats<'a> {
    /// `None` for an empty log.
    fn from_log(log: &'a [RoundLogEntry]) -> Option<Self> {
        let (first, last) = (log.first()?, log.last()?);
        let mut f1 = SideStats::default();
        let mut f2 = SideStats::default();
        for entry in log {
            tally(&mut f1, entry, Side::Fighter1);
            tally(&mut f2, entry, Side::Fighter2);
        }
        f1.final_health = last.f1_health;
        f2.final_health = last.f2_health;
        Some(Self {
            rounds: log.len() as u32,
            f1_name: &first.fighter1_name,
            f2_name: &first.fighter2_name,
            opening: first,
            f1,
            f2,
        })
    }

    fn leader_name(&self) -> &'a str {
        match self.f1.final_health.cmp(&self.f2.final_health) {
            std::cmp::Ordering::Greater => self.f1_name,
            std::cmp::Ordering::Less => self.f2_name,
            std::cmp::Ordering::Equal => "Neither fighter",
        }
    }

    fn oracle_prompt(&self) -> String {
        format!(
            "You are an enthusiastic sports commentator analyzing an epic \
             gladiatorial combat match.\n\
             \n\
             Battle Statistics:\n\
             - Total Rounds: {}\n\
             - {}: {} attacks, final health {}\n\
             - {}: {} attacks, final health {}\n\
             - Winner: {}\n\
             \n\
             Generate exciting battle commentary with the following structure:\n\
             1. Opening Hook (2-3 sentences about the battle's intensity)\n\
             2. Fighting Style Analysis (compare their approaches)\n\
             3. Key Turning Points (dramatic moments)\n\
             4. Final Verdict (celebrate the winner and honor both fighters)\n\
             \n\
             Keep it under 500 words.\n",
            self.rounds,
            self.f1_name,
            self.f1.attacks,
            self.f1.final_health,
            self.f2_name,
            self.f2.attacks,
            self.f2.final_health,
            self.leader_name(),
        )
    }
}

fn tally(stats: &mut SideStats, entry: &RoundLogEntry, side: Side) {
    match entry.decision(side).action_type {
        ActionType::Attack => stats.attacks += 1,
        ActionType::Defend => stats.defends += 1,
        ActionType::Special => stats.specials += 1,
    }
    stats.damage_dealt += entry.outcome(side).damage();
    stats.damage_taken += entry.outcome(side.other()).damage();
}

/// Largest damage either fighter took in one round, with its round number.
fn turning_point(log: &[RoundLogEntry]) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32)> = None;
    for entry in log {
        let damage = entry.f1_outcome.damage().max(entry.f2_outcome.damage());
        if best.map_or(true, |(_, d)| damage > d) {
            best = Some((entry.round, damage));
        }
    }
    best.filter(|(_, d)| *d > TURNING_POINT_MIN_DROP)
}

fn momentum_shifts(log: &[RoundLogEntry]) -> u32 {
    let mut shifts = 0;
    let mut leader: Option<Side> = None;
    for entry in log {
        let current = if entry.f1_health > entry.f2_health {
            Side::Fighter1
        } else {
            Side::Fighter2
        };
        if leader.is_some_and(|l| l != current) {
            shifts += 1;
        }
        leader = Some(current);
    }
    shifts
}

fn style_lines(lines: &mut Vec<String>, name: &str, mine: u32, theirs: u32) {
    lines.push(format!(
        "   {} was relentlessly aggressive, pressing forward with {} attacks!",
        name, mine
    ));
    if theirs > 0 {
        let higher = (mine as f64 / theirs as f64 * 100.0 - 100.0) as i64;
        lines.push(format!(
            "      Their offensive output was {}% higher than their opponent.",
            higher
        ));
    } else {
        lines.push("      Their opponent never threw a single attack.".to_string());
    }
}

/// Deterministic commentary built from the log alone.
pub fn rule_based_commentary(log: &[RoundLogEntry]) -> String {
    let Some(stats) = BattleStats::from_log(log) else {
        return BRIEF_BATTLE.to_string();
    };
    let (f1, f2) = (stats.f1, stats.f2);
    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        "BATTLE COMMENTARY".to_string(),
        RULE.to_string(),
        String::new(),
    ];

    lines.push(format!(
        "What a clash! {} and {} entered the arena...",
        stats.f1_name, stats.f2_name
    ));
    lines.push(format!(
        "   This epic confrontation lasted {} intense rounds.",
        stats.rounds
    ));

    lines.push(String::new());
    lines.push("OPENING ROUNDS:".to_string());
    let first = stats.opening;
    let (open1, open2) = (first.f1_action_type, first.f2_action_type);
    if open1 == ActionType::Attack && open2 == ActionType::Attack {
        lines.push(
            "   Both fighters came out swinging! An aggressive start from both sides.".to_string(),
        );
    } else if open1 == ActionType::Defend || open2 == ActionType::Defend {
        lines.push("   A cautious beginning as both fighters sized each other up.".to_string());
    } else {
        lines.push("   No feeling-out process here, the specials came out early.".to_string());
    }

    if let Some((round, damage)) = turning_point(log) {
        lines.push(String::new());
        lines.push(format!("TURNING POINT - ROUND {}:", round));
        lines.push(format!(
            "   Devastating blow! {} damage dealt in a single exchange!",
            damage
        ));
    }

    lines.push(String::new());
    lines.push("FIGHTING STYLES:".to_string());
    if f1.attacks as f64 > f2.attacks as f64 * AGGRESSION_RATIO {
        style_lines(&mut lines, stats.f1_name, f1.attacks, f2.attacks);
    } else if f2.attacks as f64 > f1.attacks as f64 * AGGRESSION_RATIO {
        style_lines(&mut lines, stats.f2_name, f2.attacks, f1.attacks);
    } else {
        lines.push(format!(
            "   Both fighters showed balanced aggression ({} vs {} attacks)",
            f1.attacks, f2.attacks
        ));
        lines.push("      A tactical chess match of offense and defense!".to_string());
    }

    let defensive_floor = stats.rounds as f64 * DEFENSIVE_SHARE;
    for (name, side) in [(stats.f1_name, f1), (stats.f2_name, f2)] {
        if side.defends as f64 > defensive_floor {
            lines.push(String::new());
            lines.push(format!(
                "   {} played the long game with {} defensive maneuvers",
                name, side.defends
            ));
            lines.push(
                "      Patient and calculated, waiting for the perfect opening...".to_string(),
            );
        }
    }

    if f1.specials > 0 || f2.specials > 0 {
        lines.push(String::new());
        lines.push("SPECIAL TECHNIQUES:".to_string());
        for (name, side) in [(stats.f1_name, f1), (stats.f2_name, f2)] {
            if side.specials > 0 {
                lines.push(format!(
                    "   {} unleashed {} devastating special move(s)!",
                    name, side.specials
                ));
            }
        }
    }

    lines.push(String::new());
    lines.push("DAMAGE STATISTICS:".to_string());
    for (name, side) in [(stats.f1_name, f1), (stats.f2_name, f2)] {
        lines.push(format!(
            "   {}: {} damage dealt, {} taken",
            name, side.damage_dealt, side.damage_taken
        ));
        if side.attacks > 0 {
            lines.push(format!(
                "      Efficiency: {:.1} damage per attack",
                side.damage_dealt as f64 / side.attacks as f64
            ));
        }
    }

    let shifts = momentum_shifts(log);
    if shifts > MOMENTUM_SHIFT_THRESHOLD {
        lines.push(String::new());
        lines.push(format!(
            "The momentum shifted {} times - a truly back-and-forth battle!",
            shifts
        ));
    }

    lines.push(String::new());
    lines.push("FINAL VERDICT:".to_string());
    let verdict = if f1.final_health > f2.final_health * 2 {
        format!("   Dominant victory for {}! A masterclass performance.", stats.f1_name)
    } else if f2.final_health > f1.final_health * 2 {
        format!("   Dominant victory for {}! A masterclass performance.", stats.f2_name)
    } else if f1.final_health.abs_diff(f2.final_health) < CLOSE_FINISH_MARGIN {
        "   Incredibly close battle! The outcome could have gone either way.".to_string()
    } else {
        "   Hard-fought victory! Both warriors gave their all in the arena.".to_string()
    };
    lines.push(verdict);

    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::oracle::OracleError;
    use crate::combat::{ActionOutcome, RoundResult};
    use crate::fighter::Move;

    fn entry(
        round: u32,
        f1: (ActionType, ActionOutcome, u32),
        f2: (ActionType, ActionOutcome, u32),
    ) -> RoundLogEntry {
        RoundLogEntry {
            round,
            fighter1_name: "Ash".into(),
            fighter2_name: "Brick".into(),
            f1_action_type: f1.0,
            f1_move: Move::Punch,
            f2_action_type: f2.0,
            f2_move: Move::Block,
            f1_health: f1.2,
            f2_health: f2.2,
            result: RoundResult::RoundComplete,
            first_actor: Side::Fighter1,
            f1_outcome: f1.1,
            f2_outcome: f2.1,
            f1_stamina: 90,
            f2_stamina: 90,
        }
    }

    fn one_sided_log() -> Vec<RoundLogEntry> {
        vec![
            entry(
                1,
                (ActionType::Attack, ActionOutcome::Hit { damage: 20 }, 100),
                (ActionType::Defend, ActionOutcome::Defended { heal: 0 }, 80),
            ),
            entry(
                2,
                (ActionType::Attack, ActionOutcome::Hit { damage: 22 }, 100),
                (ActionType::Defend, ActionOutcome::Defended { heal: 3 }, 61),
            ),
            entry(
                3,
                (ActionType::Special, ActionOutcome::Hit { damage: 33 }, 100),
                (ActionType::Attack, ActionOutcome::Miss, 28),
            ),
        ]
    }

    #[test]
    fn test_empty_log() {
        assert_eq!(rule_based_commentary(&[]), "The battle was too brief to analyze.");
        assert_eq!(Commentator::rule_based().commentate(&[]), BRIEF_BATTLE);
        assert!(BattleStats::from_log(&[]).is_none());
    }

    #[test]
    fn test_single_round_stats() {
        let log = vec![entry(
            1,
            (ActionType::Attack, ActionOutcome::Hit { damage: 20 }, 100),
            (ActionType::Attack, ActionOutcome::Miss, 80),
        )];
        let stats = BattleStats::from_log(&log).unwrap();
        assert_eq!(stats.rounds, 1);
        assert_eq!((stats.f1.final_health, stats.f2.final_health), (100, 80));
        assert_eq!(stats.opening.round, 1);
        assert!(rule_based_commentary(&log).contains("came out swinging"));
    }

    #[test]
    fn test_one_sided_commentary() {
        let text = rule_based_commentary(&one_sided_log());
        assert!(text.contains("Ash and Brick entered the arena"));
        assert!(text.contains("lasted 3 intense rounds"));
        assert!(text.contains("cautious beginning"));
        assert!(text.contains("TURNING POINT - ROUND 3:"));
        assert!(text.contains("33 damage dealt in a single exchange"));
        assert!(text.contains("Ash was relentlessly aggressive, pressing forward with 2 attacks!"));
        assert!(text.contains("100% higher"));
        assert!(text.contains("Brick played the long game with 2 defensive maneuvers"));
        assert!(text.contains("Ash unleashed 1 devastating special move(s)!"));
        assert!(text.contains("Ash: 75 damage dealt, 0 taken"));
        assert!(text.contains("Efficiency: 37.5 damage per attack"));
        assert!(text.contains("Dominant victory for Ash!"));
    }

    #[test]
    fn test_opponent_without_attacks() {
        let log = vec![entry(
            1,
            (ActionType::Attack, ActionOutcome::Miss, 100),
            (ActionType::Defend, ActionOutcome::Defended { heal: 0 }, 100),
        )];
        let text = rule_based_commentary(&log);
        assert!(text.contains("never threw a single attack"));
        assert!(!text.contains("TURNING POINT"));
        assert!(text.contains("Incredibly close battle!"));
    }

    #[test]
    fn test_momentum_shifts_counted() {
        let swing = |round, f1_hp, f2_hp| {
            entry(
                round,
                (ActionType::Attack, ActionOutcome::Miss, f1_hp),
                (ActionType::Attack, ActionOutcome::Miss, f2_hp),
            )
        };
        let log = vec![
            swing(1, 90, 80),
            swing(2, 70, 75),
            swing(3, 70, 60),
            swing(4, 50, 55),
            swing(5, 50, 45),
        ];
        assert_eq!(momentum_shifts(&log), 4);
        let text = rule_based_commentary(&log);
        assert!(text.contains("The momentum shifted 4 times"));
        assert!(text.contains("Both fighters came out swinging!"));
    }

    struct CannedOracle(Result<String, OracleError>);

    impl TextOracle for CannedOracle {
        fn generate(&self, prompt: &str) -> Result<String, OracleError> {
            assert!(prompt.contains("Total Rounds: 3"));
            self.0.clone()
        }
    }

    #[test]
    fn test_oracle_commentary_framed() {
        let oracle = CannedOracle(Ok("  What a fight!  ".into()));
        let commentator = Commentator::with_oracle(Arc::new(oracle));
        let text = commentator.commentate(&one_sided_log());
        assert!(text.contains("BATTLE COMMENTARY"));
        assert!(text.contains("\nWhat a fight!\n"));
    }

    #[test]
    fn test_oracle_failure_uses_rules() {
        let oracle = CannedOracle(Err(OracleError::EmptyResponse));
        let commentator = Commentator::with_oracle(Arc::new(oracle));
        let text = commentator.commentate(&one_sided_log());
        assert_eq!(text, rule_based_commentary(&one_sided_log()));
    }
}
