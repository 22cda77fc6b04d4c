//! Terminal rendering of a battle log.

use crate::combat::{
    ActionOutcome, BattleOutcome, BattleResult, CornerStats, Decision, Finish, RoundLogEntry,
    RoundResult, Side,
};
use crate::fighter::ActionType;
use crossterm::style::{Color, Stylize};

const BAR_WIDTH: usize = 20;
const BANNER_WIDTH: usize = 60;

/// A 20-cell gauge of `█` filled and `░` empty cells.
pub fn bar(current: u32, max: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((current.min(max) as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn health_color(current: u32, max: u32) -> Color {
    let ratio = if max == 0 { 0.0 } else { current as f64 / max as f64 };
    if ratio > 0.66 {
        Color::Green
    } else if ratio > 0.33 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn status_line(name: &str, health: u32, stamina: u32, corner: &CornerStats) -> String {
    format!(
        "  {:<20} HP {} {:>3}/{:<3}  ST {} {:>3}/{:<3}",
        name,
        bar(health, corner.max_health).with(health_color(health, corner.max_health)),
        health,
        corner.max_health,
        bar(stamina, corner.max_stamina).cyan(),
        stamina,
        corner.max_stamina
    )
}

fn action_line(name: &str, decision: Decision, outcome: ActionOutcome) -> String {
    let mv = decision.mv.display_name();
    match outcome {
        ActionOutcome::Hit { damage } if decision.action_type == ActionType::Special => {
            format!("{} unleashes {}! {} damage", name, mv.to_uppercase(), damage)
                .magenta()
                .to_string()
        }
        ActionOutcome::Hit { damage } => {
            format!("{} strikes with {} for {} damage", name, mv, damage)
                .red()
                .to_string()
        }
        ActionOutcome::Miss => format!("{} attempts {} but misses", name, mv).yellow().to_string(),
        ActionOutcome::Defended { heal } => format!("{} braces with {} (+{} HP)", name, mv, heal)
            .green()
            .to_string(),
        ActionOutcome::Exhausted => format!("{} is too exhausted to attack", name)
            .dark_grey()
            .to_string(),
        ActionOutcome::Winded => format!("{} is too winded to defend", name)
            .dark_grey()
            .to_string(),
        ActionOutcome::NoAction => format!("{} is down and cannot act", name)
            .dark_grey()
            .to_string(),
    }
}

fn corner(corners: &[CornerStats; 2], side: Side) -> &CornerStats {
    match side {
        Side::Fighter1 => &corners[0],
        Side::Fighter2 => &corners[1],
    }
}

/// One round: both actions in the order they happened, then both gauges.
pub fn render_round(entry: &RoundLogEntry, corners: &[CornerStats; 2]) -> String {
    let mut out = String::new();
    out.push_str(&format!("── Round {} ──", entry.round).bold().to_string());
    out.push('\n');

    for side in [entry.first_actor, entry.first_actor.other()] {
        out.push_str("  ");
        out.push_str(&action_line(entry.name(side), entry.decision(side), entry.outcome(side)));
        out.push('\n');
    }

    for side in [Side::Fighter1, Side::Fighter2] {
        out.push_str(&status_line(
            entry.name(side),
            entry.health(side),
            entry.stamina(side),
            corner(corners, side),
        ));
        out.push('\n');
    }

    if entry.result == RoundResult::Knockout {
        out.push_str(&"  KNOCKOUT!".red().bold().to_string());
        out.push('\n');
    }
    out
}

fn finish_line(result: &BattleResult, corners: &[CornerStats; 2]) -> String {
    let winner = result.outcome.winner().map(|side| corner(corners, side).name.as_str());
    match (result.finish, winner) {
        (Finish::Knockout, Some(name)) => {
            format!("{} WINS by knockout in {} rounds", name, result.rounds)
        }
        (Finish::Decision, Some(name)) => {
            format!("{} WINS on points after {} rounds", name, result.rounds)
        }
        (Finish::DoubleKnockout, _) => format!("DOUBLE KNOCKOUT after {} rounds", result.rounds),
        _ => format!("DRAW after {} rounds", result.rounds),
    }
}

/// The whole battle, framed by an opening and a closing banner.
pub fn render_battle(result: &BattleResult, corners: &[CornerStats; 2]) -> String {
    let rule = "═".repeat(BANNER_WIDTH);
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(
        &format!("  {} VS {}", corners[0].name, corners[1].name)
            .bold()
            .to_string(),
    );
    out.push('\n');
    out.push_str(&rule);
    out.push_str("\n\n");

    for entry in &result.log {
        out.push_str(&render_round(entry, corners));
        out.push('\n');
    }

    let banner_color = match result.outcome {
        BattleOutcome::Draw => Color::Yellow,
        _ => Color::Green,
    };
    out.push_str(&rule);
    out.push('\n');
    out.push_str(
        &format!("  {}", finish_line(result, corners))
            .with(banner_color)
            .bold()
            .to_string(),
    );
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fighter::Move;

    fn corners() -> [CornerStats; 2] {
        [
            CornerStats {
                name: "Ash".into(),
                max_health: 100,
                max_stamina: 100,
            },
            CornerStats {
                name: "Briar".into(),
                max_health: 100,
                max_stamina: 100,
            },
        ]
    }

    fn entry(round: u32, f1_outcome: ActionOutcome, f2_outcome: ActionOutcome) -> RoundLogEntry {
        RoundLogEntry {
            round,
            fighter1_name: "Ash".into(),
            fighter2_name: "Briar".into(),
            f1_action_type: ActionType::Special,
            f1_move: Move::PressurePoint,
            f2_action_type: ActionType::Defend,
            f2_move: Move::Block,
            f1_health: 100,
            f2_health: 50,
            result: RoundResult::RoundComplete,
            first_actor: Side::Fighter2,
            f1_outcome,
            f2_outcome,
            f1_stamina: 75,
            f2_stamina: 0,
        }
    }

    #[test]
    fn test_bar_cells() {
        assert_eq!(bar(100, 100), "█".repeat(20));
        assert_eq!(bar(0, 100), "░".repeat(20));
        assert_eq!(bar(50, 100), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(bar(5, 0), "░".repeat(20));
        assert_eq!(bar(150, 100).chars().count(), 20);
    }

    #[test]
    fn test_health_color_thresholds() {
        assert_eq!(health_color(100, 100), Color::Green);
        assert_eq!(health_color(50, 100), Color::Yellow);
        assert_eq!(health_color(10, 100), Color::Red);
    }

    #[test]
    fn test_round_lists_actions_in_order() {
        let e = entry(3, ActionOutcome::Hit { damage: 18 }, ActionOutcome::Defended { heal: 3 });
        let text = render_round(&e, &corners());
        assert!(text.contains("Round 3"));
        let defend = text.find("Briar braces with block (+3 HP)").unwrap();
        let special = text.find("Ash unleashes PRESSURE POINT! 18 damage").unwrap();
        assert!(defend < special);
        assert!(text.contains(&format!("{}{}", "█".repeat(10), "░".repeat(10))));
        assert!(!text.contains("KNOCKOUT"));
    }

    #[test]
    fn test_round_exhaustion_and_knockout() {
        let mut e = entry(9, ActionOutcome::Exhausted, ActionOutcome::NoAction);
        e.result = RoundResult::Knockout;
        let text = render_round(&e, &corners());
        assert!(text.contains("Ash is too exhausted to attack"));
        assert!(text.contains("Briar is down and cannot act"));
        assert!(text.contains("KNOCKOUT!"));
    }

    #[test]
    fn test_battle_banner() {
        let result = BattleResult {
            outcome: BattleOutcome::Fighter1,
            finish: Finish::Knockout,
            rounds: 1,
            log: vec![entry(1, ActionOutcome::Hit { damage: 50 }, ActionOutcome::Miss)],
        };
        let text = render_battle(&result, &corners());
        assert!(text.contains("Ash VS Briar"));
        assert!(text.contains("Ash WINS by knockout in 1 rounds"));

        let draw = BattleResult {
            outcome: BattleOutcome::Draw,
            finish: Finish::DecisionDraw,
            rounds: 30,
            log: Vec::new(),
        };
        assert!(render_battle(&draw, &corners()).contains("DRAW after 30 rounds"));
    }
}
