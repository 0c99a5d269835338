//! Player records: identity, ratings, rolling form and per-match counters.
//!
//! Only `MatchCounters` is touched by the simulation. Career aggregates live in
//! `PerformanceHistory` and are updated once per match by the stats layer.

use serde::{Deserialize, Serialize};

pub type PlayerId = String;

/// Number of recent matches kept in the rolling form window.
pub const RECENT_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    #[default]
    AllRounder,
    WicketKeeper,
}

/// Rolling performance record used by the outcome model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceHistory {
    /// Recent form on a 0-100 scale (50 = neutral)
    pub form: f64,
    /// Runs in the most recent matches, oldest first
    #[serde(default)]
    pub recent_runs: Vec<u32>,
    /// Wickets in the most recent matches, oldest first
    #[serde(default)]
    pub recent_wickets: Vec<u32>,
    #[serde(default)]
    pub career_matches: u32,
    #[serde(default)]
    pub career_runs: u32,
    #[serde(default)]
    pub career_wickets: u32,
}

impl Default for PerformanceHistory {
    fn default() -> Self {
        Self {
            form: 50.0,
            recent_runs: Vec::new(),
            recent_wickets: Vec::new(),
            career_matches: 0,
            career_runs: 0,
            career_wickets: 0,
        }
    }
}

impl PerformanceHistory {
    /// Sum of runs over the last five matches.
    pub fn last5_runs(&self) -> u32 {
        self.recent_runs.iter().rev().take(RECENT_WINDOW).sum()
    }

    /// Sum of wickets over the last five matches.
    pub fn last5_wickets(&self) -> u32 {
        self.recent_wickets.iter().rev().take(RECENT_WINDOW).sum()
    }

    /// Fold one finished match into the rolling window and career totals.
    ///
    /// Form is an exponential moving average of a 0-100 match rating.
    pub fn record_match(&mut self, counters: &MatchCounters) {
        push_window(&mut self.recent_runs, counters.runs);
        push_window(&mut self.recent_wickets, counters.wickets);

        self.career_matches += 1;
        self.career_runs += counters.runs;
        self.career_wickets += counters.wickets;

        let rating = (counters.runs as f64 * 1.2 + counters.wickets as f64 * 20.0).min(100.0);
        self.form = (self.form * 0.7 + rating * 0.3).clamp(0.0, 100.0);
    }
}

fn push_window(window: &mut Vec<u32>, value: u32) {
    window.push(value);
    if window.len() > RECENT_WINDOW {
        let excess = window.len() - RECENT_WINDOW;
        window.drain(..excess);
    }
}

/// Per-match counters. Reset to zero at the start of every match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchCounters {
    // Batting
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    pub dismissal: Option<String>,

    // Bowling
    pub legal_balls_bowled: u32,
    /// Base-6 overs notation: 3.4 means three overs and four balls
    pub overs_bowled: f64,
    pub maidens: u32,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub wides: u32,
    pub no_balls: u32,
    pub dot_balls: u32,
}

impl MatchCounters {
    pub fn has_batted(&self) -> bool {
        self.balls_faced > 0 || self.is_out || self.runs > 0
    }

    pub fn has_bowled(&self) -> bool {
        self.legal_balls_bowled > 0 || self.wides > 0 || self.no_balls > 0
    }

    /// Runs per 100 balls, `None` before the first ball faced.
    pub fn strike_rate(&self) -> Option<f64> {
        if self.balls_faced == 0 {
            return None;
        }
        Some(self.runs as f64 * 100.0 / self.balls_faced as f64)
    }

    /// Runs conceded per six legal balls, `None` before the first legal ball.
    pub fn economy(&self) -> Option<f64> {
        if self.legal_balls_bowled == 0 {
            return None;
        }
        Some(self.runs_conceded as f64 * 6.0 / self.legal_balls_bowled as f64)
    }

    pub fn completed_overs(&self) -> u32 {
        self.legal_balls_bowled / 6
    }

    pub(crate) fn record_legal_ball_bowled(&mut self) {
        self.legal_balls_bowled += 1;
        self.overs_bowled = overs_notation(self.legal_balls_bowled);
    }
}

/// `wholeOvers + remainder / 10`, e.g. 22 balls -> 3.4
pub fn overs_notation(legal_balls: u32) -> f64 {
    (legal_balls / 6) as f64 + (legal_balls % 6) as f64 / 10.0
}

/// Scorecard string for a ball count, e.g. 75 balls -> "12.3"
pub fn overs_string(legal_balls: u32) -> String {
    format!("{}.{}", legal_balls / 6, legal_balls % 6)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub role: PlayerRole,
    /// Batting skill (0-100)
    pub batting: u8,
    /// Bowling skill (0-100)
    pub bowling: u8,
    #[serde(default)]
    pub is_overseas: bool,
    #[serde(default)]
    pub history: PerformanceHistory,
    #[serde(default)]
    pub stats: MatchCounters,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, batting: u8, bowling: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: PlayerRole::default(),
            batting: batting.min(100),
            bowling: bowling.min(100),
            is_overseas: false,
            history: PerformanceHistory::default(),
            stats: MatchCounters::default(),
        }
    }

    pub fn with_role(mut self, role: PlayerRole) -> Self {
        self.role = role;
        self
    }

    pub fn overseas(mut self) -> Self {
        self.is_overseas = true;
        self
    }

    pub fn with_history(mut self, history: PerformanceHistory) -> Self {
        self.history = history;
        self
    }

    pub fn reset_match_counters(&mut self) {
        self.stats = MatchCounters::default();
    }
}
