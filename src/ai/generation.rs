//! Turns a free-text description into a [`FighterProfile`].

use super::oracle::{extract_json_block, OracleError, TextOracle};
use crate::core::constants::{MAX_PREFERRED_MOVES, RANDOM_PREFERRED_MOVES};
use crate::fighter::{FighterProfile, Move, ReactionSpeed};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Deserialize;
use std::sync::Arc;

const CALM_NAMES: [&str; 4] = ["Serenity Fist", "Zen Warrior", "Still Waters", "Patient Dragon"];
const FIERCE_NAMES: [&str; 4] = ["Iron Fury", "Storm Breaker", "Raging Titan", "Savage Force"];
const ROBOT_NAMES: [&str; 4] = ["Mech-Alpha", "Combat Unit X", "Binary Fist", "Cyber Gladiator"];
const MARTIAL_NAMES: [&str; 4] = ["Shadow Dragon", "Master Flow", "Iron Lotus", "Silent Thunder"];
const GENERIC_NAMES: [&str; 4] = [
    "The Challenger",
    "Unknown Fighter",
    "Arena Warrior",
    "Battle Spirit",
];

const AGGRESSIVE_WORDS: [&str; 6] = [
    "aggressive",
    "offensive",
    "attack",
    "fierce",
    "brutal",
    "relentless",
];
const PASSIVE_WORDS: [&str; 5] = ["patient", "defensive", "careful", "cautious", "wait"];
const DEFENSIVE_WORDS: [&str; 6] = ["defensive", "block", "counter", "guard", "protect", "patient"];
const OFFENSIVE_WORDS: [&str; 4] = ["attack", "strike", "assault", "rush"];
const FAST_WORDS: [&str; 5] = ["fast", "quick", "rapid", "lightning", "swift"];
const SLOW_WORDS: [&str; 4] = ["slow", "deliberate", "patient", "calculated"];

/// Profile generator: oracle first when configured, keyword rules otherwise.
#[derive(Clone, Default)]
pub struct FighterGenerator {
    oracle: Option<Arc<dyn TextOracle>>,
}

impl FighterGenerator {
    pub fn rule_based() -> Self {
        Self { oracle: None }
    }

    pub fn with_oracle(oracle: Arc<dyn TextOracle>) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    pub fn generate(&self, prompt: &str, rng: &mut dyn RngCore) -> FighterProfile {
        if let Some(oracle) = &self.oracle {
            match oracle_profile(oracle.as_ref(), prompt, rng) {
                Ok(profile) => {
                    tracing::info!(name = %profile.name, "oracle generated fighter");
                    return profile;
                }
                Err(e) => {
                    tracing::warn!("fighter generation fell back to rules: {}", e);
                }
            }
        }
        rule_based_profile(prompt, rng)
    }
}

#[derive(Deserialize)]
struct OracleProfile {
    name: Option<String>,
    personality: Option<String>,
    backstory: Option<String>,
    preferred_moves: Option<Vec<String>>,
    aggression_level: Option<f64>,
    defense_bias: Option<f64>,
    reaction_speed: Option<String>,
    special_trait: Option<String>,
}

fn profile_prompt(prompt: &str) -> String {
    let vocabulary = Move::all()
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Based on this fighter description, generate a detailed fighter profile in JSON format:\n\
         \"{prompt}\"\n\
         \n\
         Return a JSON object with these exact fields:\n\
         {{\n\
         \"name\": \"creative fighter name based on description\",\n\
         \"personality\": \"brief personality description (max 50 words)\",\n\
         \"backstory\": \"compelling 2-3 sentence backstory\",\n\
         \"preferred_moves\": [\"3-5 moves from: {vocabulary}\"],\n\
         \"aggression_level\": 0.5,\n\
         \"defense_bias\": 0.5,\n\
         \"reaction_speed\": \"fast/medium/slow\",\n\
         \"special_trait\": \"unique fighting trait or ability\"\n\
         }}\n\
         \n\
         aggression_level runs from 0.0 (defensive) to 1.0 (aggressive); \
         defense_bias from 0.0 (offensive) to 1.0 (defensive).\n",
    )
}

fn oracle_profile(
    oracle: &dyn TextOracle,
    prompt: &str,
    rng: &mut dyn RngCore,
) -> Result<FighterProfile, OracleError> {
    let text = oracle.generate(&profile_prompt(prompt))?;
    let raw: OracleProfile = serde_json::from_str(extract_json_block(&text))
        .map_err(|e| OracleError::Malformed(e.to_string()))?;

    let mut moves: Vec<Move> = raw
        .preferred_moves
        .unwrap_or_default()
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    if moves.is_empty() {
        moves = random_moves(rng);
    }
    moves.truncate(MAX_PREFERRED_MOVES);

    let mut profile = FighterProfile {
        name: raw.name.unwrap_or_else(|| extract_name(prompt, rng)),
        personality: raw.personality.unwrap_or_else(|| "Mysterious warrior".to_string()),
        backstory: raw.backstory.unwrap_or_else(|| backstory(prompt)),
        preferred_moves: moves,
        aggression_level: raw.aggression_level.unwrap_or(0.5),
        defense_bias: raw.defense_bias.unwrap_or(0.5),
        reaction_speed: raw
            .reaction_speed
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        special_trait: raw
            .special_trait
            .unwrap_or_else(|| "Adaptive combat style".to_string()),
    };
    profile.normalize();
    Ok(profile)
}

/// Keyword-driven profile generation. Never fails.
pub fn rule_based_profile(prompt: &str, rng: &mut dyn RngCore) -> FighterProfile {
    let lower = prompt.to_lowercase();
    let personality = personality(&lower);
    let mut profile = FighterProfile {
        name: extract_name(prompt, rng),
        special_trait: special_trait(&lower),
        personality,
        backstory: backstory(prompt),
        preferred_moves: preferred_moves(&lower, rng),
        aggression_level: keyword_bias(&lower, &AGGRESSIVE_WORDS, &PASSIVE_WORDS),
        defense_bias: keyword_bias(&lower, &DEFENSIVE_WORDS, &OFFENSIVE_WORDS),
        reaction_speed: reaction_speed(&lower),
    };
    profile.normalize();
    profile
}

fn backstory(prompt: &str) -> String {
    format!("Born from the vision: '{}'", prompt)
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn count_matches(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| text.contains(*w)).count()
}

/// Leading `[A-Z][a-z]+` run of a token, plus whether the token ended there.
fn capitalized_word(token: &str) -> Option<(&str, bool)> {
    let mut chars = token.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let end = chars
        .find(|(_, c)| !c.is_ascii_lowercase())
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    if end < 2 {
        return None;
    }
    Some((&token[..end], end == token.len()))
}

/// Finds "named X", "name X" or "called X" with X one or two capitalised words.
fn name_from_prompt(prompt: &str) -> Option<String> {
    let tokens: Vec<&str> = prompt.split_whitespace().collect();
    for markers in [&["named", "name"][..], &["called"][..]] {
        for (i, token) in tokens.iter().enumerate() {
            if !markers.iter().any(|m| token.ends_with(m)) {
                continue;
            }
            let Some((first, whole)) = tokens.get(i + 1).and_then(|t| capitalized_word(t)) else {
                continue;
            };
            let mut name = first.to_string();
            if whole {
                if let Some((second, _)) = tokens.get(i + 2).and_then(|t| capitalized_word(t)) {
                    name.push(' ');
                    name.push_str(second);
                }
            }
            return Some(name);
        }
    }
    None
}

pub fn extract_name(prompt: &str, rng: &mut dyn RngCore) -> String {
    if let Some(name) = name_from_prompt(prompt) {
        return name;
    }
    let lower = prompt.to_lowercase();
    let pool = if contains_any(&lower, &["patient", "calm", "zen", "serene"]) {
        &CALM_NAMES
    } else if contains_any(&lower, &["aggressive", "fierce", "brutal"]) {
        &FIERCE_NAMES
    } else if contains_any(&lower, &["robot", "machine", "android"]) {
        &ROBOT_NAMES
    } else if contains_any(&lower, &["bruce lee", "martial", "master"]) {
        &MARTIAL_NAMES
    } else {
        &GENERIC_NAMES
    };
    pool.choose(rng).copied().unwrap_or("Arena Warrior").to_string()
}

/// Maps competing keyword counts to a bias in [0.2, 0.9].
pub fn keyword_bias(text: &str, raise: &[&str], lower: &[&str]) -> f64 {
    let up = count_matches(text, raise);
    let down = count_matches(text, lower);
    if up > down {
        (0.6 + up as f64 * 0.1).min(0.9)
    } else if down > up {
        (0.4 - down as f64 * 0.1).max(0.2)
    } else {
        0.5
    }
}

pub fn reaction_speed(text: &str) -> ReactionSpeed {
    if contains_any(text, &FAST_WORDS) {
        ReactionSpeed::Fast
    } else if contains_any(text, &SLOW_WORDS) {
        ReactionSpeed::Slow
    } else {
        ReactionSpeed::Medium
    }
}

fn random_moves(rng: &mut dyn RngCore) -> Vec<Move> {
    Move::all()
        .choose_multiple(rng, RANDOM_PREFERRED_MOVES)
        .copied()
        .collect()
}

pub fn preferred_moves(text: &str, rng: &mut dyn RngCore) -> Vec<Move> {
    let mut moves = Vec::new();
    if contains_any(text, &["counter", "defensive", "patient"]) {
        moves.extend([Move::Counter, Move::Block, Move::Dodge]);
    }
    if contains_any(text, &["grapple", "wrestle", "throw"]) {
        moves.extend([Move::Grapple, Move::Throw]);
    }
    if contains_any(text, &["strike", "punch", "hit"]) {
        moves.extend([Move::Punch, Move::Kick]);
    }
    if contains_any(text, &["pressure point", "precise", "tactical"]) {
        moves.push(Move::PressurePoint);
    }
    if contains_any(text, &["feint", "deceive", "trick"]) {
        moves.push(Move::Feint);
    }
    if text.contains("sweep") {
        moves.push(Move::Sweep);
    }

    if moves.is_empty() {
        return random_moves(rng);
    }

    let mut unique = Vec::with_capacity(MAX_PREFERRED_MOVES);
    for mv in moves {
        if !unique.contains(&mv) && unique.len() < MAX_PREFERRED_MOVES {
            unique.push(mv);
        }
    }
    unique
}

pub fn personality(text: &str) -> String {
    let groups: [(&[&str], &str); 5] = [
        (&["patient", "calm", "zen"], "patient and calculated"),
        (&["aggressive", "fierce"], "fierce and relentless"),
        (&["strategic", "tactical", "smart"], "highly strategic"),
        (&["defensive", "cautious"], "cautious defender"),
        (&["adaptive", "learn"], "adaptive learner"),
    ];
    let mut traits: Vec<&str> = groups
        .iter()
        .filter(|(words, _)| contains_any(text, words))
        .map(|(_, t)| *t)
        .take(3)
        .collect();
    if traits.is_empty() {
        traits = vec!["balanced fighter", "versatile combatant"];
    }
    capitalize(&traits.join(", "))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn special_trait(text: &str) -> String {
    let line = if contains_any(text, &["predict", "read", "anticipate"]) {
        "Predictive defense: tries to read the opponent's moves"
    } else if contains_any(text, &["counter", "wait"]) {
        "Perfect counter: excels at punishing opponent mistakes"
    } else if contains_any(text, &["adapt", "learn", "study"]) {
        "Adaptive combat: learns opponent patterns during battle"
    } else if contains_any(text, &["aggressive", "relentless"]) {
        "Berserker mode: grows stronger as health decreases"
    } else if contains_any(text, &["robot", "machine"]) {
        "Machine precision: consistent and calculated strikes"
    } else {
        "Balanced warrior: adapts strategy to match the situation"
    };
    line.to_string()
}
