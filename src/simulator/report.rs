//! Simulation report generation.

use crate::combat::BattleOutcome;
use serde::Serialize;
use std::collections::BTreeMap;

/// What the report keeps from each battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRecord {
    pub outcome: BattleOutcome,
    pub knockout: bool,
    pub rounds: u32,
    pub f1_final_health: u32,
    pub f2_final_health: u32,
}

/// Aggregated results from a batch of battles.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub fighter1_name: String,
    pub fighter2_name: String,
    pub num_battles: u32,

    // Outcomes
    pub f1_wins: u32,
    pub f2_wins: u32,
    pub draws: u32,
    pub knockout_rate: f64,

    // Averages
    pub avg_rounds: f64,
    pub avg_f1_final_health: f64,
    pub avg_f2_final_health: f64,

    // Distribution data
    pub round_distribution: BTreeMap<u32, u32>,

    /// Levels after the last battle
    pub final_levels: [u32; 2],
}

impl SimReport {
    pub fn from_battles(
        fighter1_name: &str,
        fighter2_name: &str,
        battles: Vec<BattleRecord>,
        final_levels: [u32; 2],
    ) -> Self {
        let num_battles = battles.len() as u32;
        let denom = num_battles.max(1) as f64;

        let count = |outcome: BattleOutcome| {
            battles.iter().filter(|b| b.outcome == outcome).count() as u32
        };
        let f1_wins = count(BattleOutcome::Fighter1);
        let f2_wins = count(BattleOutcome::Fighter2);
        let draws = count(BattleOutcome::Draw);

        let knockouts = battles.iter().filter(|b| b.knockout).count() as f64;
        let avg_rounds = battles.iter().map(|b| b.rounds as f64).sum::<f64>() / denom;
        let mean = |value: fn(&BattleRecord) -> u32| {
            battles.iter().map(|b| value(b) as f64).sum::<f64>() / denom
        };
        let avg_f1_final_health = mean(|b| b.f1_final_health);
        let avg_f2_final_health = mean(|b| b.f2_final_health);

        let mut round_distribution = BTreeMap::new();
        for battle in &battles {
            *round_distribution.entry(battle.rounds).or_insert(0) += 1;
        }

        Self {
            fighter1_name: fighter1_name.to_string(),
            fighter2_name: fighter2_name.to_string(),
            num_battles,
            f1_wins,
            f2_wins,
            draws,
            knockout_rate: knockouts / denom,
            avg_rounds,
            avg_f1_final_health,
            avg_f2_final_health,
            round_distribution,
            final_levels,
        }
    }

    fn pct(&self, n: u32) -> f64 {
        n as f64 / self.num_battles.max(1) as f64 * 100.0
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "{} vs {}: {} battles\n\n",
            self.fighter1_name, self.fighter2_name, self.num_battles
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  {:<20} {:>5} ({:>5.1}%)\n",
            self.fighter1_name,
            self.f1_wins,
            self.pct(self.f1_wins)
        ));
        report.push_str(&format!(
            "  {:<20} {:>5} ({:>5.1}%)\n",
            self.fighter2_name,
            self.f2_wins,
            self.pct(self.f2_wins)
        ));
        report.push_str(&format!(
            "  {:<20} {:>5} ({:>5.1}%)\n",
            "Draws",
            self.draws,
            self.pct(self.draws)
        ));
        report.push_str(&format!(
            "  Knockout Rate:       {:.1}%\n\n",
            self.knockout_rate * 100.0
        ));

        report.push_str("── PACING ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Rounds:          {:.1}\n", self.avg_rounds));
        report.push_str(&format!(
            "  Avg Final Health:    {:.1} / {:.1}\n",
            self.avg_f1_final_health, self.avg_f2_final_health
        ));
        report.push_str(&format!(
            "  Final Levels:        {} / {}\n\n",
            self.final_levels[0], self.final_levels[1]
        ));

        report.push_str("── ROUND DISTRIBUTION ───────────────────────────────────────────\n");
        for (rounds, count) in &self.round_distribution {
            let pct = self.pct(*count);
            let bar: String = "█".repeat((pct / 2.0) as usize);
            report.push_str(&format!("  {:2} rounds: {:>5.1}% {}\n", rounds, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let gap = (self.pct(self.f1_wins) - self.pct(self.f2_wins)).abs();
        let rating = if gap < 10.0 {
            "EVEN - Neither fighter dominates"
        } else if gap < 30.0 {
            "FAVOURED - One fighter holds an edge"
        } else {
            "LOPSIDED - One fighter dominates"
        };
        report.push_str(&format!("  Win Gap:     {:.1} points\n", gap));
        report.push_str(&format!("  Rating:      {}\n", rating));
        if self.knockout_rate < 0.5 && self.num_battles > 0 {
            report.push_str("  ⚠️  Most battles go the distance - damage too low?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: BattleOutcome, knockout: bool, rounds: u32) -> BattleRecord {
        BattleRecord {
            outcome,
            knockout,
            rounds,
            f1_final_health: if outcome == BattleOutcome::Fighter2 { 0 } else { 40 },
            f2_final_health: if outcome == BattleOutcome::Fighter1 { 0 } else { 20 },
        }
    }

    #[test]
    fn test_report_generation() {
        let battles = vec![
            record(BattleOutcome::Fighter1, true, 6),
            record(BattleOutcome::Fighter1, true, 8),
            record(BattleOutcome::Fighter2, true, 6),
            record(BattleOutcome::Draw, false, 30),
        ];
        let report = SimReport::from_battles("Red", "Blue", battles, [1, 1]);
        assert_eq!(report.num_battles, 4);
        assert_eq!((report.f1_wins, report.f2_wins, report.draws), (2, 1, 1));
        assert!((report.knockout_rate - 0.75).abs() < 1e-9);
        assert!((report.avg_rounds - 12.5).abs() < 1e-9);
        assert_eq!(report.round_distribution.get(&6), Some(&2));
        assert!((report.avg_f1_final_health - 30.0).abs() < 1e-9);

        let text = report.to_text();
        assert!(text.contains("Red vs Blue: 4 battles"));
        assert!(text.contains("Knockout Rate:       75.0%"));
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_battles("Red", "Blue", Vec::new(), [1, 1]);
        assert_eq!(report.avg_rounds, 0.0);
        assert!(report.to_text().contains("0 battles"));
        assert!(report.to_json().contains("\"num_battles\": 0"));
    }
}
