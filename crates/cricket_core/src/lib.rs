//! # cricket_core - Deterministic Limited-Overs Cricket Simulation Engine
//!
//! Ball-by-ball simulation of a two-innings limited-overs match, from the
//! toss through a possible Super Over.
//!
//! ## Features
//! - Seeded, reproducible deliveries (same seed = same match)
//! - Skill, phase and condition weighted outcomes with extras and free hits
//! - Bowler quotas, strike rotation, partnerships and fall of wickets
//! - Impact player substitution and Super Over tie-breaks
//! - Win probability estimates and career stats persistence
//! - JSON API for driving the engine from other hosts

#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod stats;

// Re-export main API functions
pub use api::{simulate_match, simulate_match_json, simulate_match_json_with_config, MatchRequest, MatchResponse};
pub use config::EngineConfig;
pub use error::{CricketError, MatchError, Result, SelectionError, SetupError, StoreError};

pub use engine::{AutoDriver, ConditionModifiers, OutcomeModel, Pitch, Weather};
pub use models::{BallEvent, Innings, Match, MatchOutcome, MatchStatus, Outcome, Player, TeamSetup, TeamSide};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub use api::SCHEMA_VERSION;
