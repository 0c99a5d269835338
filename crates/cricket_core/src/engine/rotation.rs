//! Bowler rotation rules.
//!
//! A bowler may take the next over when they are under the per-bowler over
//! quota and did not bowl the over that just ended.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::player::Player;

/// Over quota per bowler: a fifth of the innings, at least one.
pub fn max_overs_per_bowler(overs_format: u32) -> u32 {
    (overs_format / 5).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Ineligibility {
    BowledLastOver,
    QuotaExhausted { bowled: u32, max: u32 },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::BowledLastOver => write!(f, "bowled the previous over"),
            Ineligibility::QuotaExhausted { bowled, max } => {
                write!(f, "has bowled {bowled} of a maximum {max} overs")
            }
        }
    }
}

/// Why `player` may not bowl the next over, or `None` if they may.
pub fn ineligibility(
    player: &Player,
    last_over_bowler: Option<&str>,
    overs_format: u32,
) -> Option<Ineligibility> {
    if last_over_bowler == Some(player.id.as_str()) {
        return Some(Ineligibility::BowledLastOver);
    }
    let max = max_overs_per_bowler(overs_format);
    let bowled = player.stats.completed_overs();
    if bowled >= max {
        return Some(Ineligibility::QuotaExhausted { bowled, max });
    }
    None
}

/// Bowlers of `bowling_xi` allowed to take the next over, in XI order.
pub fn available_bowlers<'a>(
    bowling_xi: &'a [Player],
    last_over_bowler: Option<&str>,
    overs_format: u32,
) -> Vec<&'a Player> {
    bowling_xi
        .iter()
        .filter(|p| ineligibility(p, last_over_bowler, overs_format).is_none())
        .collect()
}

/// Result of asking who can bowl next. An empty pool is a normal state the
/// driver has to present, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum BowlerAvailability<'a> {
    Available(Vec<&'a Player>),
    NoLegalBowler,
}

impl<'a> BowlerAvailability<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, BowlerAvailability::NoLegalBowler)
    }

    pub fn bowlers(&self) -> &[&'a Player] {
        match self {
            BowlerAvailability::Available(bowlers) => bowlers,
            BowlerAvailability::NoLegalBowler => &[],
        }
    }
}

pub fn bowler_availability<'a>(
    bowling_xi: &'a [Player],
    last_over_bowler: Option<&str>,
    overs_format: u32,
) -> BowlerAvailability<'a> {
    let bowlers = available_bowlers(bowling_xi, last_over_bowler, overs_format);
    if bowlers.is_empty() {
        BowlerAvailability::NoLegalBowler
    } else {
        BowlerAvailability::Available(bowlers)
    }
}
