//! Cricket match CLI
//!
//! Simulates matches from JSON requests, writes sample requests and prints
//! win probability estimates part-way through a match.

mod demo;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

use cricket_core::api::{match_from_request, simulate_match, MatchRequest, MatchResponse};
use cricket_core::engine::win_predictor::{monte_carlo, predict};
use cricket_core::stats::{persist_completed_match, JsonFileStatsStore};
use cricket_core::{AutoDriver, ConditionModifiers, EngineConfig, Match};

#[derive(Parser)]
#[command(name = "cricket")]
#[command(about = "Ball-by-ball limited-overs cricket simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full match from a JSON request
    Simulate {
        /// Match request JSON file
        #[arg(long)]
        request: PathBuf,

        /// Engine config (.json, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the request seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full response JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Merge player stats into career records under this directory
        #[arg(long)]
        stats_dir: Option<PathBuf>,
    },

    /// Write a randomised sample request
    SampleRequest {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value = "1")]
        seed: u64,

        #[arg(long)]
        overs: Option<u32>,
    },

    /// Play part of a match and print both win probability estimates
    Predict {
        #[arg(long)]
        request: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Deliveries to bowl before predicting
        #[arg(long, default_value = "60")]
        balls: u32,

        /// Monte Carlo completions
        #[arg(long, default_value = "500")]
        simulations: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { request, config, seed, out, stats_dir } => {
            let config = load_config(config.as_deref())?;
            let mut request = read_request(&request)?;
            if let Some(seed) = seed {
                request.seed = seed;
            }

            let done = simulate_match(&request, &config)?;
            print_scorecard(&done);

            if let Some(dir) = stats_dir {
                let mut store = JsonFileStatsStore::new(&dir);
                let report = persist_completed_match(&mut store, &done, &config.persistence)?;
                println!("Career stats: {} updated, {} failed ({})", report.updated.len(), report.failed.len(), dir.display());
                for failure in &report.failed {
                    eprintln!("  {} after {} attempt(s): {}", failure.player_id, failure.attempts, failure.error);
                }
            }

            let response = serde_json::to_string_pretty(&MatchResponse::from_match(&done, request.seed))?;
            match out {
                Some(path) => {
                    std::fs::write(&path, response).with_context(|| format!("writing {}", path.display()))?;
                    println!("Response written to {}", path.display());
                }
                None => println!("{response}"),
            }
        }

        Commands::SampleRequest { out, seed, overs } => {
            let request = demo::sample_request(seed, overs);
            std::fs::write(&out, serde_json::to_string_pretty(&request)?)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Sample request written to {}", out.display());
        }

        Commands::Predict { request, config, balls, simulations } => {
            let config = load_config(config.as_deref())?;
            let request = read_request(&request)?;
            let m = match_from_request(&request, &config)?;
            let conditions = request
                .conditions
                .map(|c| ConditionModifiers::from_conditions(c.pitch, c.weather));
            let driver = AutoDriver::from_config(&config, conditions);

            let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
            let m = driver.play_balls(&m, balls, &mut rng)?;
            print_state(&m);

            match predict(&m) {
                Some(p) => println!("Logistic:    {} {:.1}%  {} {:.1}%", m.home.name, p.home * 100.0, m.away.name, p.away * 100.0),
                None => println!("Logistic:    no estimate before the first ball"),
            }
            let mc = monte_carlo(&m, &driver, simulations, request.seed.wrapping_add(1))?;
            println!(
                "Monte Carlo: {} {:.1}%  {} {:.1}%  shared {:.1}% ({} runs)",
                m.home.name,
                mc.home * 100.0,
                m.away.name,
                mc.away * 100.0,
                mc.shared * 100.0,
                mc.simulations
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn read_request(path: &Path) -> Result<MatchRequest> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    log::debug!("Read {} bytes from {:?}", raw.len(), path);
    serde_json::from_str(&raw).with_context(|| format!("parsing request {}", path.display()))
}

/// Display name for a team id, falling back to the id itself.
fn team_label<'a>(m: &'a Match, team_id: &'a str) -> &'a str {
    m.side_of_team(team_id).map_or(team_id, |side| m.team_name(side))
}

fn print_state(m: &Match) {
    for innings in [&m.first_innings, &m.second_innings].into_iter().flatten() {
        let name = team_label(m, &innings.batting_team);
        match innings.runs_required() {
            Some(required) if !innings.completed => println!(
                "{name}: {}  need {} from {} balls",
                innings.score_line(),
                required,
                innings.balls_remaining()
            ),
            _ => println!("{name}: {}", innings.score_line()),
        }
    }
}

fn print_scorecard(m: &Match) {
    println!("{} v {} ({} overs)", m.home.name, m.away.name, m.overs);
    for innings in [&m.first_innings, &m.second_innings].into_iter().flatten() {
        println!();
        println!("{}  {}", team_label(m, &innings.batting_team), innings.score_line());
        for p in &innings.batting_order {
            let how = match (&p.stats.dismissal, p.stats.is_out) {
                (Some(d), true) => d.as_str(),
                _ => "not out",
            };
            println!("  {:<22} {:<24} {:>3} ({})", p.name, how, p.stats.runs, p.stats.balls_faced);
        }
        println!(
            "  Extras {} (w {}, nb {}, b {}, lb {})",
            innings.extras.total(),
            innings.extras.wides,
            innings.extras.no_balls,
            innings.extras.byes,
            innings.extras.leg_byes
        );
        for p in &innings.bowling_card {
            println!(
                "  {:<22} {}-{}-{}-{}",
                p.name,
                cricket_core::models::overs_string(p.stats.legal_balls_bowled),
                p.stats.maidens,
                p.stats.runs_conceded,
                p.stats.wickets
            );
        }
    }
    for so in &m.super_overs {
        println!("Super Over {}: {}", so.round, so.margin_text);
    }
    println!();
    println!("{}", m.result.as_deref().unwrap_or("No result"));
    if let Some(id) = &m.man_of_the_match {
        let name = m.all_players_latest().into_iter().find(|p| &p.id == id).map(|p| p.name);
        println!("Player of the match: {}", name.as_deref().unwrap_or(id));
    }
}
