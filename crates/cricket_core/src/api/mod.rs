pub mod json_api;

pub use json_api::{
    match_from_request, simulate_match, simulate_match_json, simulate_match_json_with_config,
    ConditionsData, MatchRequest, MatchResponse, PlayerData, TeamData, SCHEMA_VERSION,
};
