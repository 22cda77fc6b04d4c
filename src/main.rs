use gladiators::ui::{render_battle, render_round};
use gladiators::{build_info, Arena, Fighter, GladiatorConfig, Result, SessionResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const WATCH_DELAY: Duration = Duration::from_millis(700);

enum Command {
    Create(String),
    List,
    Show(String),
    Delete(String),
    Search(String),
    Battle {
        id1: String,
        id2: String,
        seed: Option<u64>,
        watch: bool,
    },
    Train {
        id: String,
        seed: Option<u64>,
    },
    Rankings,
    Stats,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--version" | "-v" => {
            println!(
                "gladiators {} ({})",
                build_info::BUILD_DATE,
                build_info::BUILD_COMMIT
            );
            std::process::exit(0);
        }
        "--help" | "-h" => {
            print_help();
            std::process::exit(0);
        }
        _ => {}
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_command(&args[1..]) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("Run 'gladiators --help' for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_command(args: &[String]) -> std::result::Result<Command, String> {
    let positional = |idx: usize, what: &str| {
        args.get(idx)
            .filter(|a| !a.starts_with("--"))
            .cloned()
            .ok_or_else(|| format!("Missing {} for '{}'", what, args[0]))
    };

    let command = match args[0].as_str() {
        "create" => Command::Create(args[1..].join(" ")),
        "list" => Command::List,
        "show" => Command::Show(positional(1, "fighter id")?),
        "delete" => Command::Delete(positional(1, "fighter id")?),
        "search" => Command::Search(positional(1, "query")?),
        "battle" => {
            let (seed, watch) = parse_flags(&args[3.min(args.len())..])?;
            Command::Battle {
                id1: positional(1, "first fighter id")?,
                id2: positional(2, "second fighter id")?,
                seed,
                watch,
            }
        }
        "train" => {
            let (seed, _) = parse_flags(&args[2.min(args.len())..])?;
            Command::Train {
                id: positional(1, "fighter id")?,
                seed,
            }
        }
        "rankings" => Command::Rankings,
        "stats" => Command::Stats,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(command)
}

fn parse_flags(args: &[String]) -> std::result::Result<(Option<u64>, bool), String> {
    let mut seed = None;
    let mut watch = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" | "-s" => {
                let value = args.get(i + 1).ok_or("Missing value for --seed")?;
                seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid seed '{}'", value))?,
                );
                i += 1;
            }
            "--watch" | "-w" => watch = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok((seed, watch))
}

fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn run(command: Command) -> Result<()> {
    let config = GladiatorConfig::from_env()?;
    let arena = Arena::from_config(&config)?;

    match command {
        Command::Create(prompt) => {
            let fighter = arena.create_fighter(&prompt, &mut rng_for(None))?;
            println!("Created fighter:\n");
            print_fighter(&fighter);
        }
        Command::List => {
            let fighters = arena.store().list_fighters()?;
            if fighters.is_empty() {
                println!("No fighters yet. Create one with 'gladiators create \"<prompt>\"'.");
            }
            for fighter in fighters {
                println!("{}  {}", fighter.fighter_id, fighter);
            }
        }
        Command::Show(id) => print_fighter(&arena.store().load_fighter(&id)?),
        Command::Delete(id) => {
            arena.store().delete_fighter(&id)?;
            println!("Deleted fighter {}", id);
        }
        Command::Search(query) => {
            let matches = arena.store().search_fighters(&query)?;
            println!("{} fighter(s) matching '{}'", matches.len(), query);
            for fighter in matches {
                println!("{}  {}", fighter.fighter_id, fighter);
            }
        }
        Command::Battle { id1, id2, seed, watch } => {
            let battle = arena.battle(&id1, &id2, &mut rng_for(seed))?;
            if watch {
                for entry in &battle.result.log {
                    println!("{}", render_round(entry, &battle.corners));
                    std::thread::sleep(WATCH_DELAY);
                }
                match &battle.winner_name {
                    Some(name) => println!("{} is victorious!\n", name),
                    None => println!("The battle ends in a draw.\n"),
                }
            } else {
                println!("{}", render_battle(&battle.result, &battle.corners));
            }
            println!("{}", battle.commentary);
            println!();
            for (fighter, summary) in battle.fighters.iter().zip(battle.summaries.iter()) {
                println!(
                    "{}: +{} xp, level {}, record {}W/{}L",
                    fighter.name, summary.exp_gained, summary.level, summary.wins, summary.losses
                );
            }
            if battle.saved.iter().any(|saved| !saved) {
                eprintln!("Warning: battle results could not be saved for every fighter");
            }
        }
        Command::Train { id, seed } => {
            let report = arena.train(&id, &mut rng_for(seed))?;
            println!("Training session for {}\n", report.fighter.name);
            for session in &report.sessions {
                let result = match session.result {
                    SessionResult::Victory => "Victory",
                    SessionResult::Defeat => "Defeat",
                    SessionResult::Draw => "Draw",
                };
                println!("  Session {}: {} in {} rounds", session.session, result, session.rounds);
            }
            println!("\nWins: {}/{}", report.wins, report.sessions.len());
            println!("Bonus experience: {}", report.bonus_exp);
            if report.leveled_up {
                println!("LEVEL UP! Now level {}", report.new_level);
            }
        }
        Command::Rankings => {
            let fighters = arena.rankings()?;
            if fighters.is_empty() {
                println!("No fighters ranked yet.");
            }
            for (rank, fighter) in fighters.iter().enumerate() {
                println!("{:>3}. {}", rank + 1, fighter);
            }
        }
        Command::Stats => {
            let stats = arena.global_stats()?;
            println!("Fighters:       {}", stats.total_fighters);
            println!("Battles fought: {}", stats.total_battles);
            println!("Highest level:  {}", stats.highest_level);
            println!("Best win rate:  {:.1}%", stats.best_win_rate);
        }
    }

    Ok(())
}

fn print_fighter(fighter: &Fighter) {
    let moves: Vec<String> = fighter.preferred_moves.iter().map(|m| m.display_name()).collect();
    println!("{}", fighter);
    println!("  Id:          {}", fighter.fighter_id);
    println!("  Personality: {}", fighter.personality);
    println!("  Backstory:   {}", fighter.backstory);
    println!("  Trait:       {}", fighter.special_trait);
    println!("  Moves:       {}", moves.join(", "));
    println!(
        "  Aggression:  {:.2}   Defense: {:.2}   Reaction: {}",
        fighter.aggression_level,
        fighter.defense_bias,
        fighter.reaction_speed.as_str()
    );
    println!(
        "  HP {}  Stamina {}  Power {}  Technique {}  Xp {}",
        fighter.max_health,
        fighter.max_stamina,
        fighter.power,
        fighter.technique,
        fighter.experience
    );
}

fn print_help() {
    println!("Gladiators - AI-driven arena fighter battles\n");
    println!("Usage: gladiators <command> [args]\n");
    println!("Commands:");
    println!("  create \"<prompt>\"                      Generate a fighter from a description");
    println!("  list                                   List all fighters");
    println!("  show <id>                              Show a fighter's details");
    println!("  delete <id>                            Delete a fighter");
    println!("  search <query>                         Find fighters by name");
    println!("  battle <id1> <id2> [--seed N] [--watch] Fight two fighters");
    println!("  train <id> [--seed N]                  Spar against training dummies");
    println!("  rankings                               Fighters by wins and win rate");
    println!("  stats                                  Arena-wide statistics");
    println!("  --version                              Show version information");
    println!("  --help                                 Show this help message");
    println!();
    println!("Environment:");
    println!("  GOOGLE_GEMINI_API_KEY  Enables the text oracle (rule-based play otherwise)");
    println!("  RUST_LOG               Log filter (default: info)");
}
