//! Match record: both innings, toss, status and result.
//!
//! A `Match` is created from two finalized team setups and becomes immutable
//! history once a result is set. Transitions live in `engine::controller`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::innings::Innings;
use super::player::{Player, PlayerId};
use super::team_setup::{project_latest, TeamSetup, TeamSide};
use crate::engine::super_over::SuperOverOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner: TeamSide,
    pub decision: TossDecision,
}

impl Toss {
    pub fn batting_first(&self) -> TeamSide {
        match self.decision {
            TossDecision::Bat => self.winner,
            TossDecision::Bowl => self.winner.opponent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Created,
    FirstInnings,
    InningsBreak,
    SecondInnings,
    /// Scores level after both innings; Super Over pending
    Tied,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrentInnings {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

impl Margin {
    pub fn describe(&self) -> String {
        match self {
            Margin::Runs(n) => format!("{} {}", n, if *n == 1 { "run" } else { "runs" }),
            Margin::Wickets(n) => format!("{} {}", n, if *n == 1 { "wicket" } else { "wickets" }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchOutcome {
    Won { winner: TeamSide, margin: Margin },
    Tied,
    /// Won in a Super Over after scores were level
    SuperOverWon { winner: TeamSide, margin: Margin },
    /// Still level after the last Super Over allowed
    Shared,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<TeamSide> {
        match self {
            MatchOutcome::Won { winner, .. } | MatchOutcome::SuperOverWon { winner, .. } => {
                Some(*winner)
            }
            MatchOutcome::Tied | MatchOutcome::Shared => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub overs: u32,
    pub home: TeamSetup,
    pub away: TeamSetup,
    pub toss: Option<Toss>,
    pub first_innings: Option<Innings>,
    pub second_innings: Option<Innings>,
    pub current_innings: Option<CurrentInnings>,
    pub status: MatchStatus,
    pub outcome: Option<MatchOutcome>,
    pub result: Option<String>,
    pub man_of_the_match: Option<PlayerId>,
    #[serde(default)]
    pub super_overs: Vec<SuperOverOutcome>,
}

impl Match {
    pub fn setup(&self, side: TeamSide) -> &TeamSetup {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub(crate) fn setup_mut(&mut self, side: TeamSide) -> &mut TeamSetup {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    pub fn side_of_team(&self, team_id: &str) -> Option<TeamSide> {
        if self.home.team_id == team_id {
            Some(TeamSide::Home)
        } else if self.away.team_id == team_id {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        &self.setup(side).name
    }

    pub fn batting_first(&self) -> Option<TeamSide> {
        self.toss.map(|toss| toss.batting_first())
    }

    pub fn innings(&self) -> Option<&Innings> {
        match self.current_innings? {
            CurrentInnings::First => self.first_innings.as_ref(),
            CurrentInnings::Second => self.second_innings.as_ref(),
        }
    }

    pub(crate) fn innings_mut(&mut self) -> Option<&mut Innings> {
        match self.current_innings? {
            CurrentInnings::First => self.first_innings.as_mut(),
            CurrentInnings::Second => self.second_innings.as_mut(),
        }
    }

    /// Side currently batting.
    pub fn batting_side(&self) -> Option<TeamSide> {
        self.innings().and_then(|innings| self.side_of_team(&innings.batting_team))
    }

    /// XI of `side` with the latest per-match counters from both innings.
    /// Only cards belonging to `side` are read.
    pub fn latest_xi(&self, side: TeamSide) -> Vec<Player> {
        let team_id = self.setup(side).team_id.as_str();
        let mut xi = self.setup(side).playing_xi.clone();
        for innings in [&self.first_innings, &self.second_innings].into_iter().flatten() {
            if innings.batting_team == team_id {
                xi = project_latest(&xi, &innings.batting_order);
            }
            if innings.bowling_team == team_id {
                xi = project_latest(&xi, &innings.bowling_card);
            }
        }
        xi
    }

    /// Every player who took part, with their latest records. A player
    /// substituted out is included when they already appear on a card.
    pub fn all_players_latest(&self) -> Vec<Player> {
        let mut players = Vec::with_capacity(24);
        for side in [TeamSide::Home, TeamSide::Away] {
            players.extend(self.latest_xi(side));
            if let Some(sub) = &self.setup(side).substitution {
                if let Some(record) = self.latest_card_record(side, &sub.player_out) {
                    players.push(record);
                }
            }
        }
        players
    }

    fn latest_card_record(&self, side: TeamSide, id: &str) -> Option<Player> {
        let team_id = self.setup(side).team_id.as_str();
        [&self.second_innings, &self.first_innings]
            .into_iter()
            .flatten()
            .find_map(|innings| {
                if innings.bowling_team == team_id {
                    innings.bowler(id)
                } else if innings.batting_team == team_id {
                    innings.batsman(id)
                } else {
                    None
                }
            })
            .cloned()
    }
}
