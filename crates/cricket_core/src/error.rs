use thiserror::Error;

use crate::engine::rotation::Ineligibility;
use crate::models::innings::InningsState;
use crate::models::match_state::MatchStatus;
use crate::models::player::PlayerId;

/// Rejected selections. Surfaced to the driver with a readable reason, never
/// silently applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Bowler {0} is not in the bowling XI")]
    BowlerNotInXi(PlayerId),

    #[error("Bowler {id} cannot bowl the next over: {reason}")]
    BowlerIneligible { id: PlayerId, reason: Ineligibility },

    #[error("Batsman {0} is not in the batting XI")]
    BatsmanNotInXi(PlayerId),

    #[error("Batsman {0} is already out")]
    BatsmanAlreadyOut(PlayerId),

    #[error("Batsman {0} is already at the crease")]
    BatsmanAlreadyBatting(PlayerId),

    #[error("Openers must be two different players")]
    DuplicateOpeners,

    #[error("No batting position is vacant")]
    NoVacancy,

    #[error("Innings is not accepting this selection (state: {0:?})")]
    WrongState(InningsState),

    #[error("Impact player already used for this match")]
    ImpactPlayerAlreadyUsed,

    #[error("Player {0} is not an impact reserve")]
    ImpactPlayerNotFound(PlayerId),

    #[error("Player {0} is not in the playing XI")]
    ReplacedPlayerNotInXi(PlayerId),

    #[error("Player {0} is on the field in an active role and cannot be replaced")]
    ReplacedPlayerActive(PlayerId),

    #[error("Overseas limit exceeded: {count} overseas players (max {max})")]
    OverseasLimitExceeded { count: usize, max: usize },
}

/// Invalid team setups, rejected before a match is created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("Invalid team size: expected {expected}, found {found}")]
    InvalidTeamSize { expected: usize, found: usize },

    #[error("Too many impact reserves: {found} (max {max})")]
    TooManyReserves { found: usize, max: usize },

    #[error("Duplicate player id: {0}")]
    DuplicatePlayer(PlayerId),

    #[error("Overseas limit exceeded: {count} overseas players (max {max})")]
    OverseasLimitExceeded { count: usize, max: usize },

    #[error("Both teams use the id {0}")]
    SameTeam(String),

    #[error("Player id {0} appears in both squads")]
    SharedPlayer(PlayerId),

    #[error("Invalid overs format: {0}")]
    InvalidOvers(u32),
}

/// Controller misuse and driver stalls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Operation not allowed while match is {0:?}")]
    WrongStatus(MatchStatus),

    #[error("No innings in progress")]
    NoInnings,

    #[error("Cannot bowl: innings is {0:?}")]
    NotReady(InningsState),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("No legal bowler available for the next over")]
    NoLegalBowler,

    #[error("Invalid Super Over nomination: {0}")]
    InvalidNomination(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Stats collaborator failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Io(_) => true,
            StoreError::Unavailable(_) => true,
            StoreError::Serialization(_) => false,
        }
    }
}

/// Top-level error for the JSON API and configuration loading.
#[derive(Error, Debug)]
pub enum CricketError {
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(u8),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CricketError>;
