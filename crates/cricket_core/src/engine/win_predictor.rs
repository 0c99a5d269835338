//! Win probability estimates. Read-only over match snapshots.
//!
//! `predict` is a closed-form logistic model over projected runs and the
//! resources left. `monte_carlo` plays the rest of the match many times from
//! the snapshot and counts results.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::driver::AutoDriver;
use crate::error::MatchError;
use crate::models::innings::{Innings, BALLS_PER_OVER};
use crate::models::match_state::{Match, MatchStatus};
use crate::models::team_setup::TeamSide;

/// Runs per over treated as par.
pub const PAR_RUN_RATE: f64 = 8.0;

/// Balls of par run rate blended into the observed rate; shrinks early
/// projections towards par.
const PRIOR_BALLS: f64 = 36.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinProbability {
    pub home: f64,
    pub away: f64,
}

impl WinProbability {
    fn for_side(side: TeamSide, p: f64) -> Self {
        let p = p.clamp(0.0, 1.0);
        match side {
            TeamSide::Home => Self { home: p, away: 1.0 - p },
            TeamSide::Away => Self { home: 1.0 - p, away: p },
        }
    }

    pub fn of(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }
}

#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Share of scoring power left: falls with wickets lost.
fn wicket_resource(innings: &Innings) -> f64 {
    let share = innings.wickets_in_hand() as f64 / innings.wicket_limit.max(1) as f64;
    0.35 + 0.65 * share
}

/// Expected runs from the balls still to come.
fn expected_remaining_runs(innings: &Innings) -> f64 {
    let balls = innings.legal_balls as f64;
    let rate = (innings.run_rate() * balls + PAR_RUN_RATE * PRIOR_BALLS) / (balls + PRIOR_BALLS);
    let overs_left = innings.balls_remaining() as f64 / BALLS_PER_OVER as f64;
    rate * overs_left * wicket_resource(innings)
}

/// Probability that the side batting first wins, from its innings so far.
fn first_innings_probability(innings: &Innings) -> f64 {
    let projected = innings.total_runs as f64 + expected_remaining_runs(innings);
    let par = PAR_RUN_RATE * innings.total_overs as f64;
    logistic((projected - par) / (0.1 * par).max(1.0))
}

/// Probability that the chasing side wins.
fn chase_probability(innings: &Innings) -> f64 {
    let required = innings.runs_required().unwrap_or(0) as f64;
    if required <= 0.0 {
        return 1.0;
    }
    if innings.balls_remaining() == 0 || innings.wickets_in_hand() == 0 {
        return 0.0;
    }
    let expected = expected_remaining_runs(innings);
    logistic((expected - required) / (6.0 + 0.08 * required))
}

/// Closed-form estimate for the current state. `None` before the first
/// innings starts.
pub fn predict(m: &Match) -> Option<WinProbability> {
    match m.status {
        MatchStatus::Created => None,
        MatchStatus::Tied => Some(WinProbability { home: 0.5, away: 0.5 }),
        MatchStatus::Completed => Some(match m.outcome.and_then(|o| o.winner()) {
            Some(winner) => WinProbability::for_side(winner, 1.0),
            None => WinProbability { home: 0.5, away: 0.5 },
        }),
        MatchStatus::FirstInnings => {
            let innings = m.first_innings.as_ref()?;
            let side = m.side_of_team(&innings.batting_team)?;
            Some(WinProbability::for_side(side, first_innings_probability(innings)))
        }
        MatchStatus::InningsBreak => {
            let first = m.first_innings.as_ref()?;
            let chasing = m.side_of_team(&first.bowling_team)?;
            let fresh = Innings::new(2, &first.bowling_team, &first.batting_team, m.overs, Some(first.total_runs + 1));
            Some(WinProbability::for_side(chasing, chase_probability(&fresh)))
        }
        MatchStatus::SecondInnings => {
            let innings = m.second_innings.as_ref()?;
            let side = m.side_of_team(&innings.batting_team)?;
            Some(WinProbability::for_side(side, chase_probability(innings)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloEstimate {
    pub home: f64,
    pub away: f64,
    /// Matches still level after every Super Over allowed
    pub shared: f64,
    pub simulations: u32,
}

/// Play `simulations` completions of `m` in parallel. Run `i` is seeded with
/// `seed + i`, so the estimate does not depend on thread scheduling.
pub fn monte_carlo(
    m: &Match,
    driver: &AutoDriver,
    simulations: u32,
    seed: u64,
) -> Result<MonteCarloEstimate, MatchError> {
    if simulations == 0 {
        return Ok(MonteCarloEstimate { home: 0.0, away: 0.0, shared: 0.0, simulations });
    }
    let winners = (0..simulations)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
            driver
                .play_match(m, &mut rng)
                .map(|done| done.outcome.and_then(|o| o.winner()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let n = simulations as f64;
    let count = |side| winners.iter().filter(|w| **w == Some(side)).count() as f64;
    let (home, away) = (count(TeamSide::Home), count(TeamSide::Away));
    log::debug!("Monte Carlo over {} runs: home {}, away {}", simulations, home, away);
    Ok(MonteCarloEstimate {
        home: home / n,
        away: away / n,
        shared: (n - home - away) / n,
        simulations,
    })
}
