use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::driver::AutoDriver;
use crate::engine::outcome::{ConditionModifiers, Pitch, Weather};
use crate::engine::super_over::SuperOverOutcome;
use crate::error::{CricketError, Result};
use crate::models::match_state::{Match, MatchOutcome, MatchStatus};
use crate::models::player::{PerformanceHistory, Player, PlayerId, PlayerRole};
use crate::models::team_setup::TeamSetup;
use crate::stats::updated_histories;

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Overrides the configured format
    #[serde(default)]
    pub overs: Option<u32>,
    pub home_team: TeamData,
    pub away_team: TeamData,
    #[serde(default)]
    pub conditions: Option<ConditionsData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamData {
    pub id: String,
    pub name: String,
    pub players: Vec<PlayerData>,
    #[serde(default)]
    pub impact_players: Vec<PlayerData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: PlayerRole,
    pub batting: u8,
    pub bowling: u8,
    #[serde(default)]
    pub overseas: bool,
    #[serde(default)]
    pub history: Option<PerformanceHistory>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConditionsData {
    #[serde(default)]
    pub pitch: Pitch,
    #[serde(default)]
    pub weather: Weather,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub seed: u64,
    pub status: MatchStatus,
    pub outcome: Option<MatchOutcome>,
    pub result: Option<String>,
    pub first_innings: Option<String>,
    pub second_innings: Option<String>,
    pub man_of_the_match: Option<PlayerId>,
    pub super_overs: Vec<SuperOverOutcome>,
    /// Players with this match folded into their form and history, ready
    /// for the next request. Empty until the match is completed.
    pub players: Vec<Player>,
    /// Full match record, ball by ball
    pub record: Match,
}

impl MatchResponse {
    pub fn from_match(m: &Match, seed: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            seed,
            status: m.status,
            outcome: m.outcome,
            result: m.result.clone(),
            first_innings: m.first_innings.as_ref().map(|i| i.score_line()),
            second_innings: m.second_innings.as_ref().map(|i| i.score_line()),
            man_of_the_match: m.man_of_the_match.clone(),
            super_overs: m.super_overs.clone(),
            players: updated_histories(m).unwrap_or_default(),
            record: m.clone(),
        }
    }
}

impl From<PlayerData> for Player {
    fn from(data: PlayerData) -> Self {
        let mut player = Player::new(data.id, data.name, data.batting, data.bowling).with_role(data.role);
        if data.overseas {
            player = player.overseas();
        }
        if let Some(history) = data.history {
            player = player.with_history(history);
        }
        player
    }
}

fn convert_team(data: TeamData) -> Result<TeamSetup> {
    let xi = data.players.into_iter().map(Player::from).collect();
    let reserves = data.impact_players.into_iter().map(Player::from).collect();
    Ok(TeamSetup::new(data.id, data.name, xi, reserves)?)
}

/// Build the match described by `request`, not yet started.
pub fn match_from_request(request: &MatchRequest, config: &EngineConfig) -> Result<Match> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(CricketError::UnsupportedSchema(request.schema_version));
    }
    let overs = request.overs.unwrap_or(config.rules.overs);
    let home = convert_team(request.home_team.clone())?;
    let away = convert_team(request.away_team.clone())?;
    Ok(Match::new(home, away, overs)?)
}

/// Play a whole match from a typed request.
pub fn simulate_match(request: &MatchRequest, config: &EngineConfig) -> Result<Match> {
    config.validate()?;
    let m = match_from_request(request, config)?;
    let conditions = request
        .conditions
        .map(|c| ConditionModifiers::from_conditions(c.pitch, c.weather));
    let driver = AutoDriver::from_config(config, conditions);
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let done = driver.play_match(&m, &mut rng)?;
    log::info!(
        "{} v {}: {}",
        done.home.name,
        done.away.name,
        done.result.as_deref().unwrap_or("no result")
    );
    Ok(done)
}

/// Simulate a complete match from a JSON request with the default T20 config.
///
/// Same request and seed give the same innings, ball for ball.
pub fn simulate_match_json(request_json: &str) -> Result<String> {
    simulate_match_json_with_config(request_json, &EngineConfig::default())
}

pub fn simulate_match_json_with_config(request_json: &str, config: &EngineConfig) -> Result<String> {
    let request: MatchRequest = serde_json::from_str(request_json)
        .map_err(|e| CricketError::InvalidRequest(format!("Invalid JSON request: {e}")))?;
    let done = simulate_match(&request, config)?;
    Ok(serde_json::to_string(&MatchResponse::from_match(&done, request.seed))?)
}
