//! Delivery outcomes and the per-ball event log.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerId;

/// One-run penalty added on top of a no-ball's runs.
pub const NO_BALL_PENALTY: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKind {
    Wide,
    NoBall,
    Bye,
    LegBye,
}

/// Result of a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Runs off the bat, 0 to 6
    Runs { runs: u8 },
    Wicket,
    Extra { kind: ExtraKind, runs: u8 },
}

impl Outcome {
    pub const DOT: Outcome = Outcome::Runs { runs: 0 };

    pub fn runs(runs: u8) -> Self {
        Outcome::Runs { runs }
    }

    pub fn wide(runs: u8) -> Self {
        Outcome::Extra { kind: ExtraKind::Wide, runs }
    }

    pub fn no_ball(runs: u8) -> Self {
        Outcome::Extra { kind: ExtraKind::NoBall, runs }
    }

    pub fn bye(runs: u8) -> Self {
        Outcome::Extra { kind: ExtraKind::Bye, runs }
    }

    pub fn leg_bye(runs: u8) -> Self {
        Outcome::Extra { kind: ExtraKind::LegBye, runs }
    }

    pub fn is_wicket(&self) -> bool {
        matches!(self, Outcome::Wicket)
    }

    pub fn extra_kind(&self) -> Option<ExtraKind> {
        match self {
            Outcome::Extra { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.extra_kind() == Some(ExtraKind::Wide)
    }

    pub fn is_no_ball(&self) -> bool {
        self.extra_kind() == Some(ExtraKind::NoBall)
    }

    /// Wides and no-balls do not count towards the over.
    pub fn is_legal(&self) -> bool {
        !self.is_wide() && !self.is_no_ball()
    }

    /// Runs credited to the striker.
    pub fn bat_runs(&self) -> u32 {
        match self {
            Outcome::Runs { runs } => *runs as u32,
            Outcome::Extra { kind: ExtraKind::NoBall, runs } => *runs as u32,
            _ => 0,
        }
    }

    /// Runs added to the batting total.
    pub fn total_runs(&self) -> u32 {
        match self {
            Outcome::Runs { runs } => *runs as u32,
            Outcome::Wicket => 0,
            Outcome::Extra { kind: ExtraKind::NoBall, runs } => *runs as u32 + NO_BALL_PENALTY,
            Outcome::Extra { runs, .. } => *runs as u32,
        }
    }

    /// Runs charged to the bowler. Byes and leg-byes are not.
    pub fn runs_conceded(&self) -> u32 {
        match self {
            Outcome::Extra { kind: ExtraKind::Bye | ExtraKind::LegBye, .. } => 0,
            other => other.total_runs(),
        }
    }

    /// Runs the batsmen actually ran or hit; decides strike rotation.
    pub fn runs_completed(&self) -> u32 {
        match self {
            Outcome::Runs { runs } => *runs as u32,
            Outcome::Wicket => 0,
            Outcome::Extra { kind: ExtraKind::Wide, runs } => (*runs as u32).saturating_sub(1),
            Outcome::Extra { runs, .. } => *runs as u32,
        }
    }

    pub fn is_four(&self) -> bool {
        matches!(self, Outcome::Runs { runs: 4 })
    }

    pub fn is_six(&self) -> bool {
        matches!(self, Outcome::Runs { runs: 6 })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Runs { runs: 0 } => write!(f, "no run"),
            Outcome::Runs { runs: 1 } => write!(f, "1 run"),
            Outcome::Runs { runs: 4 } => write!(f, "FOUR"),
            Outcome::Runs { runs: 6 } => write!(f, "SIX"),
            Outcome::Runs { runs } => write!(f, "{} runs", runs),
            Outcome::Wicket => write!(f, "OUT"),
            Outcome::Extra { kind: ExtraKind::Wide, runs } => write!(f, "wide ({})", runs),
            Outcome::Extra { kind: ExtraKind::NoBall, runs } => write!(f, "no-ball +{}", runs),
            Outcome::Extra { kind: ExtraKind::Bye, runs } => write!(f, "{} bye(s)", runs),
            Outcome::Extra { kind: ExtraKind::LegBye, runs } => write!(f, "{} leg-bye(s)", runs),
        }
    }
}

/// Log entry for one delivery, as applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallEvent {
    /// Zero-based over index
    pub over: u32,
    /// 1-6 for the legal ball this delivery belongs to
    pub ball: u32,
    pub striker_id: PlayerId,
    pub bowler_id: PlayerId,
    /// Outcome after free-hit protection
    pub outcome: Outcome,
    /// A wicket was rolled but voided by the free hit
    #[serde(default)]
    pub free_hit_saved: bool,
    pub runs: u32,
    pub legal: bool,
    pub wicket: bool,
    pub over_completed: bool,
    pub score_after: u32,
    pub wickets_after: u32,
    pub commentary: String,
}
