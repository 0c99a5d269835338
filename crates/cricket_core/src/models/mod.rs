pub mod ball;
pub mod innings;
pub mod match_state;
pub mod player;
pub mod team_setup;

pub use ball::{BallEvent, ExtraKind, Outcome, NO_BALL_PENALTY};
pub use innings::{
    BatsmanShare, Extras, FallOfWicket, Innings, InningsState, MatchPhase, Partnership,
    BALLS_PER_OVER, DEFAULT_WICKET_LIMIT,
};
pub use match_state::{
    CurrentInnings, Margin, Match, MatchOutcome, MatchStatus, Toss, TossDecision,
};
pub use player::{
    overs_notation, overs_string, MatchCounters, PerformanceHistory, Player, PlayerId, PlayerRole,
};
pub use team_setup::{
    project_latest, Substitution, TeamSetup, TeamSide, MAX_IMPACT_PLAYERS, MAX_OVERSEAS_IN_XI,
    PLAYING_XI_SIZE,
};
