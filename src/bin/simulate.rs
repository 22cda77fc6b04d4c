//! Battle balance simulator CLI.
//!
//! Runs Monte Carlo head-to-head battles between two generated fighters.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                        # 1000 battles, default fighters
//!   cargo run --bin simulate -- -n 200 --seed 42    # Reproducible run
//!   cargo run --bin simulate -- --f1 "a zen monk who dodges everything"

use gladiators::ai::rule_based_profile;
use gladiators::simulator::{run_simulation, SimConfig};
use gladiators::Fighter;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_F1_PROMPT: &str = "an aggressive brawler who loves to strike";
const DEFAULT_F2_PROMPT: &str = "a patient defensive fighter who waits to counter";

struct Options {
    config: SimConfig,
    f1_prompt: String,
    f2_prompt: String,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    let config = &options.config;

    // Templates come from a fixed seed so the same prompts give the same fighters
    let mut template_rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(0));
    let f1 = Fighter::from_profile(rule_based_profile(&options.f1_prompt, &mut template_rng));
    let f2 = Fighter::from_profile(rule_based_profile(&options.f2_prompt, &mut template_rng));

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              GLADIATORS BATTLE SIMULATOR                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Battles:        {}", config.num_battles);
    println!("  Max Rounds:     {}", config.max_rounds);
    println!("  Progression:    {}", if config.carry_progression { "carried" } else { "fresh" });
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    for fighter in [&f1, &f2] {
        println!(
            "  {} - aggression {:.2}, defense {:.2}, {} reactions",
            fighter.name,
            fighter.aggression_level,
            fighter.defense_bias,
            fighter.reaction_speed.as_str()
        );
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(config, &f1, &f2) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if options.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut config = SimConfig::default();
    let mut f1_prompt = DEFAULT_F1_PROMPT.to_string();
    let mut f2_prompt = DEFAULT_F2_PROMPT.to_string();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--battles" => {
                if i + 1 < args.len() {
                    config.num_battles = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-r" | "--rounds" => {
                if i + 1 < args.len() {
                    config.max_rounds = args[i + 1].parse().unwrap_or(config.max_rounds);
                    i += 1;
                }
            }
            "--f1" => {
                if i + 1 < args.len() {
                    f1_prompt = args[i + 1].clone();
                    i += 1;
                }
            }
            "--f2" => {
                if i + 1 < args.len() {
                    f2_prompt = args[i + 1].clone();
                    i += 1;
                }
            }
            "--carry" => {
                config.carry_progression = true;
            }
            "--json" => {
                json = true;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--quick" => {
                config = SimConfig {
                    seed: config.seed,
                    ..SimConfig::quick()
                };
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    Options {
        config,
        f1_prompt,
        f2_prompt,
        json,
    }
}

fn print_help() {
    println!("Gladiators Battle Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --battles <N>   Number of battles (default: 1000)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -r, --rounds <R>    Round cap per battle (default: 30)");
    println!("        --f1 <PROMPT>   Description for the first fighter");
    println!("        --f2 <PROMPT>   Description for the second fighter");
    println!("        --carry         Keep levels between battles");
    println!("        --quick         Quick check (100 battles)");
    println!("        --json          Also save a JSON report");
    println!("    -v, --verbose       Print every battle");
    println!("    -h, --help          Show this help");
}
