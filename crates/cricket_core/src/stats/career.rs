use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::player::{MatchCounters, Player, PlayerId};

/// Best figures in a single match: most wickets, then fewest runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingFigures {
    pub wickets: u32,
    pub runs: u32,
}

impl BowlingFigures {
    pub fn is_better_than(&self, other: &BowlingFigures) -> bool {
        match self.wickets.cmp(&other.wickets) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.runs < other.runs,
        }
    }
}

impl std::fmt::Display for BowlingFigures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.wickets, self.runs)
    }
}

/// Career totals for one player, upserted after every completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub matches: u32,
    pub matches_batted: u32,
    pub matches_bowled: u32,

    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub highest_score: u32,
    pub fifties: u32,
    pub hundreds: u32,
    pub not_outs: u32,

    pub legal_balls_bowled: u32,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub maidens: u32,
    pub best_bowling: Option<BowlingFigures>,

    pub updated_at: DateTime<Utc>,
}

impl CareerRecord {
    pub fn new(player_id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            matches: 0,
            matches_batted: 0,
            matches_bowled: 0,
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            highest_score: 0,
            fifties: 0,
            hundreds: 0,
            not_outs: 0,
            legal_balls_bowled: 0,
            wickets: 0,
            runs_conceded: 0,
            maidens: 0,
            best_bowling: None,
            updated_at: Utc::now(),
        }
    }

    /// Fold one match into the totals. Additive; never resets.
    pub fn merge_match(&mut self, player: &Player) {
        let c: &MatchCounters = &player.stats;
        self.name = player.name.clone();
        self.matches += 1;

        if c.has_batted() {
            self.matches_batted += 1;
            self.runs += c.runs;
            self.balls_faced += c.balls_faced;
            self.fours += c.fours;
            self.sixes += c.sixes;
            self.highest_score = self.highest_score.max(c.runs);
            if c.runs >= 100 {
                self.hundreds += 1;
            } else if c.runs >= 50 {
                self.fifties += 1;
            }
            if !c.is_out {
                self.not_outs += 1;
            }
        }

        if c.has_bowled() {
            self.matches_bowled += 1;
            self.legal_balls_bowled += c.legal_balls_bowled;
            self.wickets += c.wickets;
            self.runs_conceded += c.runs_conceded;
            self.maidens += c.maidens;
            let figures = BowlingFigures { wickets: c.wickets, runs: c.runs_conceded };
            if self.best_bowling.map_or(true, |best| figures.is_better_than(&best)) {
                self.best_bowling = Some(figures);
            }
        }

        self.updated_at = Utc::now();
    }

    pub fn batting_average(&self) -> Option<f64> {
        let dismissals = self.matches_batted.saturating_sub(self.not_outs);
        (dismissals > 0).then(|| self.runs as f64 / dismissals as f64)
    }

    pub fn bowling_average(&self) -> Option<f64> {
        (self.wickets > 0).then(|| self.runs_conceded as f64 / self.wickets as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batted(runs: u32, out: bool) -> Player {
        let mut p = Player::new("p1", "Pat", 70, 40);
        p.stats.runs = runs;
        p.stats.balls_faced = runs.max(1);
        p.stats.fours = runs / 10;
        p.stats.is_out = out;
        p
    }

    fn bowled(wickets: u32, runs: u32) -> Player {
        let mut p = Player::new("p1", "Pat", 70, 40);
        for _ in 0..24 {
            p.stats.record_legal_ball_bowled();
        }
        p.stats.wickets = wickets;
        p.stats.runs_conceded = runs;
        p
    }

    #[test]
    fn test_batting_milestones() {
        let mut record = CareerRecord::new("p1", "Pat");
        record.merge_match(&batted(54, true));
        record.merge_match(&batted(101, false));
        record.merge_match(&batted(12, true));

        assert_eq!(record.matches, 3);
        assert_eq!(record.matches_batted, 3);
        assert_eq!(record.runs, 167);
        assert_eq!(record.highest_score, 101);
        assert_eq!(record.fifties, 1);
        assert_eq!(record.hundreds, 1);
        assert_eq!(record.not_outs, 1);
        assert_eq!(record.batting_average(), Some(83.5));
    }

    #[test]
    fn test_best_bowling_prefers_wickets_then_economy() {
        let mut record = CareerRecord::new("p1", "Pat");
        record.merge_match(&bowled(2, 30));
        record.merge_match(&bowled(2, 18));
        record.merge_match(&bowled(1, 4));

        assert_eq!(record.best_bowling, Some(BowlingFigures { wickets: 2, runs: 18 }));
        assert_eq!(record.best_bowling.unwrap().to_string(), "2/18");
        assert_eq!(record.wickets, 5);
        assert_eq!(record.legal_balls_bowled, 72);
        assert_eq!(record.matches_bowled, 3);
        assert_eq!(record.matches_batted, 0);
    }

    #[test]
    fn test_unused_player_counts_a_match_only() {
        let mut record = CareerRecord::new("p1", "Pat");
        record.merge_match(&Player::new("p1", "Pat", 70, 40));
        assert_eq!(record.matches, 1);
        assert_eq!(record.matches_batted, 0);
        assert_eq!(record.not_outs, 0);
        assert_eq!(record.best_bowling, None);
    }
}
