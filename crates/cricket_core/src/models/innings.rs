//! Innings data: score, crease occupants, cards, partnerships and fall of
//! wickets. Transitions live in `engine::innings`.

use serde::{Deserialize, Serialize};

use super::ball::BallEvent;
use super::player::{overs_string, Player, PlayerId};

pub const BALLS_PER_OVER: u32 = 6;
pub const DEFAULT_WICKET_LIMIT: u32 = 10;

/// Scoring phase by over number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    Powerplay,
    Middle,
    Death,
}

impl MatchPhase {
    /// Powerplay for the first six overs, death for the last four, middle
    /// otherwise. `over` is zero-based.
    pub fn for_over(over: u32, total_overs: u32) -> Self {
        if over < 6 {
            MatchPhase::Powerplay
        } else if over >= total_overs.saturating_sub(4) {
            MatchPhase::Death
        } else {
            MatchPhase::Middle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extras {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatsmanShare {
    pub player_id: PlayerId,
    pub runs: u32,
    pub balls: u32,
}

impl BatsmanShare {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self { player_id: player_id.into(), runs: 0, balls: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub batsman1: BatsmanShare,
    pub batsman2: BatsmanShare,
    /// Combined runs, extras included
    pub runs: u32,
    /// Legal balls
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub start_over: u32,
    pub end_over: Option<u32>,
    pub phase: MatchPhase,
    pub active: bool,
}

impl Partnership {
    pub fn new(first: &str, second: &str, start_over: u32, phase: MatchPhase) -> Self {
        Self {
            batsman1: BatsmanShare::new(first),
            batsman2: BatsmanShare::new(second),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            start_over,
            end_over: None,
            phase,
            active: true,
        }
    }

    pub fn share_mut(&mut self, player_id: &str) -> Option<&mut BatsmanShare> {
        if self.batsman1.player_id == player_id {
            Some(&mut self.batsman1)
        } else if self.batsman2.player_id == player_id {
            Some(&mut self.batsman2)
        } else {
            None
        }
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.batsman1.player_id == player_id || self.batsman2.player_id == player_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub wicket_number: u32,
    pub score: u32,
    pub overs: String,
    pub batsman: String,
    pub bowler: String,
    pub phase: MatchPhase,
}

/// Where an innings is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InningsState {
    /// Openers not chosen yet
    NotStarted,
    /// No bowler before the first ball
    AwaitingBowler,
    /// A crease slot is empty after a wicket
    AwaitingBatsman,
    InProgress,
    /// Over just ended, next bowler not chosen
    OverBreak,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    /// 1 or 2
    pub number: u8,
    pub batting_team: String,
    pub bowling_team: String,
    pub total_overs: u32,
    pub wicket_limit: u32,
    /// Runs needed to win; second innings only
    pub target: Option<u32>,

    pub total_runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub extras: Extras,

    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub current_bowler: Option<PlayerId>,
    pub last_over_bowler: Option<PlayerId>,
    pub phase: MatchPhase,
    /// Runs charged to the current bowler in the over in progress
    pub over_runs_conceded: u32,

    /// Batting records in order of appearance
    pub batting_order: Vec<Player>,
    /// Bowling records in order of first over
    pub bowling_card: Vec<Player>,
    pub partnerships: Vec<Partnership>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub deliveries: Vec<BallEvent>,

    pub free_hit: bool,
    pub completed: bool,
}

impl Innings {
    pub fn new(
        number: u8,
        batting_team: impl Into<String>,
        bowling_team: impl Into<String>,
        total_overs: u32,
        target: Option<u32>,
    ) -> Self {
        Self {
            number,
            batting_team: batting_team.into(),
            bowling_team: bowling_team.into(),
            total_overs,
            wicket_limit: DEFAULT_WICKET_LIMIT,
            target,
            total_runs: 0,
            wickets: 0,
            legal_balls: 0,
            extras: Extras::default(),
            striker: None,
            non_striker: None,
            current_bowler: None,
            last_over_bowler: None,
            phase: MatchPhase::for_over(0, total_overs),
            over_runs_conceded: 0,
            batting_order: Vec::new(),
            bowling_card: Vec::new(),
            partnerships: Vec::new(),
            fall_of_wickets: Vec::new(),
            deliveries: Vec::new(),
            free_hit: false,
            completed: false,
        }
    }

    pub fn with_wicket_limit(mut self, wicket_limit: u32) -> Self {
        self.wicket_limit = wicket_limit;
        self
    }

    pub fn state(&self) -> InningsState {
        if self.completed {
            InningsState::Completed
        } else if self.batting_order.is_empty() {
            InningsState::NotStarted
        } else if self.striker.is_none() || self.non_striker.is_none() {
            InningsState::AwaitingBatsman
        } else if self.current_bowler.is_none() {
            if self.legal_balls == 0 {
                InningsState::AwaitingBowler
            } else {
                InningsState::OverBreak
            }
        } else {
            InningsState::InProgress
        }
    }

    pub fn max_balls(&self) -> u32 {
        self.total_overs * BALLS_PER_OVER
    }

    pub fn balls_remaining(&self) -> u32 {
        self.max_balls().saturating_sub(self.legal_balls)
    }

    pub fn wickets_in_hand(&self) -> u32 {
        self.wicket_limit.saturating_sub(self.wickets)
    }

    pub fn current_over(&self) -> u32 {
        self.legal_balls / BALLS_PER_OVER
    }

    pub fn overs(&self) -> String {
        overs_string(self.legal_balls)
    }

    pub fn run_rate(&self) -> f64 {
        if self.legal_balls == 0 {
            return 0.0;
        }
        self.total_runs as f64 * BALLS_PER_OVER as f64 / self.legal_balls as f64
    }

    /// Runs still needed to win, if chasing.
    pub fn runs_required(&self) -> Option<u32> {
        self.target.map(|target| target.saturating_sub(self.total_runs))
    }

    pub fn required_run_rate(&self) -> Option<f64> {
        let required = self.runs_required()?;
        let balls = self.balls_remaining();
        if balls == 0 {
            return None;
        }
        Some(required as f64 * BALLS_PER_OVER as f64 / balls as f64)
    }

    pub fn batsman(&self, id: &str) -> Option<&Player> {
        self.batting_order.iter().find(|p| p.id == id)
    }

    pub fn bowler(&self, id: &str) -> Option<&Player> {
        self.bowling_card.iter().find(|p| p.id == id)
    }

    pub fn active_partnership(&self) -> Option<&Partnership> {
        self.partnerships.iter().rev().find(|p| p.active)
    }

    pub fn is_at_crease(&self, id: &str) -> bool {
        self.striker.as_deref() == Some(id) || self.non_striker.as_deref() == Some(id)
    }

    /// "160/6 (20.0)"
    pub fn score_line(&self) -> String {
        format!("{}/{} ({})", self.total_runs, self.wickets, self.overs())
    }

    /// Completion rule: all overs bowled, all wickets down, or target reached.
    pub fn is_complete_now(&self) -> bool {
        self.legal_balls >= self.max_balls()
            || self.wickets >= self.wicket_limit
            || self.target.is_some_and(|target| self.total_runs >= target)
    }
}
