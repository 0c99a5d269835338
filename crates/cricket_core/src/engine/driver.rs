//! Automatic driver: makes every selection a human captain would make and
//! rolls deliveries until the match is decided.
//!
//! Captaincy is deliberately simple: openers are the first two in the XI,
//! batsmen come in XI order, the best available bowler takes each over.

use rand::Rng;
use std::cmp::Reverse;

use super::outcome::{ConditionModifiers, OutcomeModel};
use super::rotation::{bowler_availability, BowlerAvailability};
use super::super_over::SuperOverNominees;
use crate::config::EngineConfig;
use crate::error::MatchError;
use crate::models::ball::BallEvent;
use crate::models::innings::InningsState;
use crate::models::match_state::{Match, MatchStatus};
use crate::models::player::{Player, PlayerId};
use crate::models::team_setup::TeamSide;

#[derive(Debug, Clone, PartialEq)]
pub struct AutoDriver {
    pub model: OutcomeModel,
    pub conditions: Option<ConditionModifiers>,
    pub max_super_overs: u32,
}

impl Default for AutoDriver {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default(), None)
    }
}

/// First two players of the XI.
pub fn pick_openers(xi: &[Player]) -> Option<(PlayerId, PlayerId)> {
    match xi {
        [first, second, ..] => Some((first.id.clone(), second.id.clone())),
        _ => None,
    }
}

/// Best bowler allowed to take the next over; ties go to the one with fewer
/// balls bowled, then XI order.
pub fn pick_bowler(xi: &[Player], last_over_bowler: Option<&str>, overs_format: u32) -> Option<PlayerId> {
    match bowler_availability(xi, last_over_bowler, overs_format) {
        BowlerAvailability::NoLegalBowler => None,
        BowlerAvailability::Available(bowlers) => bowlers
            .iter()
            .enumerate()
            .max_by_key(|(idx, p)| (p.bowling, Reverse(p.stats.legal_balls_bowled), Reverse(*idx)))
            .map(|(_, p)| p.id.clone()),
    }
}

/// Two best batsmen and the best bowler of the XI.
pub fn pick_nominees(xi: &[Player]) -> Option<SuperOverNominees> {
    let mut by_batting: Vec<&Player> = xi.iter().collect();
    by_batting.sort_by_key(|p| Reverse(p.batting));
    let bowler = xi.iter().enumerate().max_by_key(|(idx, p)| (p.bowling, Reverse(*idx)))?.1;
    match by_batting.as_slice() {
        [a, b, ..] => Some(SuperOverNominees::new(a.id.clone(), b.id.clone(), bowler.id.clone())),
        _ => None,
    }
}

impl AutoDriver {
    pub fn new(model: OutcomeModel, conditions: Option<ConditionModifiers>) -> Self {
        Self { model, conditions, max_super_overs: EngineConfig::default().rules.max_super_overs }
    }

    pub fn from_config(config: &EngineConfig, conditions: Option<ConditionModifiers>) -> Self {
        Self {
            model: OutcomeModel::new(config.outcome.clone()),
            conditions,
            max_super_overs: config.rules.max_super_overs,
        }
    }

    /// Fill any empty crease slot and choose a bowler if the over needs one.
    pub fn prepare(&self, m: &Match) -> Result<Match, MatchError> {
        let mut current = m.clone();
        loop {
            let Some(innings) = current.innings() else {
                return Ok(current);
            };
            match innings.state() {
                InningsState::AwaitingBatsman => {
                    let id = current
                        .yet_to_bat()?
                        .into_iter()
                        .next()
                        .ok_or(MatchError::NotReady(InningsState::AwaitingBatsman))?;
                    current = current.select_batsman(&id)?;
                }
                InningsState::AwaitingBowler | InningsState::OverBreak => {
                    let xi = current.bowling_xi()?;
                    let id = pick_bowler(&xi, innings.last_over_bowler.as_deref(), innings.total_overs)
                        .ok_or(MatchError::NoLegalBowler)?;
                    current = current.select_bowler(&id)?;
                }
                _ => return Ok(current),
            }
        }
    }

    /// Prepare and bowl one delivery.
    pub fn step<R: Rng + ?Sized>(&self, m: &Match, rng: &mut R) -> Result<(Match, BallEvent), MatchError> {
        let ready = self.prepare(m)?;
        ready.simulate_next_ball(&self.model, self.conditions.as_ref(), rng)
    }

    /// Bowl until the current innings ends.
    pub fn play_innings<R: Rng + ?Sized>(&self, m: &Match, rng: &mut R) -> Result<Match, MatchError> {
        let mut current = m.clone();
        while matches!(current.status, MatchStatus::FirstInnings | MatchStatus::SecondInnings)
            && current.innings().is_some_and(|i| !i.completed)
        {
            current = self.step(&current, rng)?.0;
        }
        Ok(current)
    }

    /// Move the match on by one step: the toss, an innings start, a single
    /// delivery or a Super Over round. `None` once the match is completed.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        m: &Match,
        rng: &mut R,
    ) -> Result<Option<(Match, Option<BallEvent>)>, MatchError> {
        let next = match m.status {
            MatchStatus::Created if m.toss.is_none() => (m.simulate_toss(rng)?, None),
            MatchStatus::Created => {
                let side = m.batting_first().ok_or(MatchError::WrongStatus(m.status))?;
                let (a, b) = openers(m, side)?;
                (m.start_first_innings(&a, &b)?, None)
            }
            MatchStatus::FirstInnings | MatchStatus::SecondInnings => {
                let (next, event) = self.step(m, rng)?;
                (next, Some(event))
            }
            MatchStatus::InningsBreak => {
                let side = m
                    .batting_first()
                    .map(|s| s.opponent())
                    .ok_or(MatchError::WrongStatus(m.status))?;
                let (a, b) = openers(m, side)?;
                (m.start_second_innings(&a, &b)?, None)
            }
            MatchStatus::Tied => {
                let home = nominees(m, TeamSide::Home)?;
                let away = nominees(m, TeamSide::Away)?;
                let (next, _) = m.resolve_super_over(
                    &home,
                    &away,
                    &self.model,
                    self.conditions.as_ref(),
                    rng,
                    self.max_super_overs,
                )?;
                (next, None)
            }
            MatchStatus::Completed => return Ok(None),
        };
        Ok(Some(next))
    }

    /// Play from any point to a result: toss, both innings and any Super
    /// Overs still needed.
    pub fn play_match<R: Rng + ?Sized>(&self, m: &Match, rng: &mut R) -> Result<Match, MatchError> {
        let mut current = m.clone();
        while let Some((next, _)) = self.advance(&current, rng)? {
            current = next;
        }
        Ok(current)
    }

    /// Play until `balls` more deliveries have been bowled or the match ends.
    pub fn play_balls<R: Rng + ?Sized>(&self, m: &Match, balls: u32, rng: &mut R) -> Result<Match, MatchError> {
        let mut current = m.clone();
        let mut bowled = 0;
        while bowled < balls {
            let Some((next, event)) = self.advance(&current, rng)? else {
                break;
            };
            if event.is_some() {
                bowled += 1;
            }
            current = next;
        }
        Ok(current)
    }
}

fn openers(m: &Match, side: TeamSide) -> Result<(PlayerId, PlayerId), MatchError> {
    pick_openers(&m.latest_xi(side)).ok_or_else(|| MatchError::InvalidNomination("fewer than two batsmen".into()))
}

fn nominees(m: &Match, side: TeamSide) -> Result<SuperOverNominees, MatchError> {
    pick_nominees(&m.latest_xi(side)).ok_or_else(|| MatchError::InvalidNomination("fewer than two batsmen".into()))
}
