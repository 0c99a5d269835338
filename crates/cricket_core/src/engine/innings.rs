//! Innings state machine.
//!
//! Every transition takes `&self` and returns a new `Innings`; the caller owns
//! the single current value. Deliveries can only be applied through a
//! [`ReadyToBowl`] proof, which exists only while both batsmen and a bowler
//! are in place on an incomplete innings.
//!
//! ```text
//! NotStarted -> AwaitingBowler -> InProgress -> OverBreak -> InProgress ...
//!                                     |  ^
//!                           (wicket)  v  |  (select_batsman)
//!                               AwaitingBatsman
//! any state -> Completed (overs used, all out, or target reached)
//! ```

use rand::Rng;

use super::outcome::{ConditionModifiers, OutcomeModel};
use super::rotation::ineligibility;
use crate::error::SelectionError;
use crate::models::ball::{BallEvent, ExtraKind, Outcome, NO_BALL_PENALTY};
use crate::models::innings::{FallOfWicket, Innings, InningsState, MatchPhase, Partnership, BALLS_PER_OVER};
use crate::models::player::Player;

/// Borrowed proof that the next delivery can be bowled.
#[derive(Debug, Clone, Copy)]
pub struct ReadyToBowl<'a> {
    innings: &'a Innings,
    striker: &'a Player,
    bowler: &'a Player,
}

impl Innings {
    /// Put the opening pair at the crease. `first` takes strike.
    pub fn select_openers(
        &self,
        batting_xi: &[Player],
        first: &str,
        second: &str,
    ) -> Result<Innings, SelectionError> {
        if self.state() != InningsState::NotStarted {
            return Err(SelectionError::WrongState(self.state()));
        }
        if first == second {
            return Err(SelectionError::DuplicateOpeners);
        }
        let opener = |id: &str| {
            batting_xi
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| SelectionError::BatsmanNotInXi(id.to_string()))
        };
        let (a, b) = (opener(first)?, opener(second)?);
        for p in [a, b] {
            if p.stats.is_out {
                return Err(SelectionError::BatsmanAlreadyOut(p.id.clone()));
            }
        }

        let mut next = self.clone();
        next.batting_order.push(a.clone());
        next.batting_order.push(b.clone());
        next.striker = Some(a.id.clone());
        next.non_striker = Some(b.id.clone());
        next.partnerships.push(Partnership::new(&a.id, &b.id, next.current_over(), next.phase));
        log::debug!("{}: openers {} and {}", next.batting_team, a.name, b.name);
        Ok(next)
    }

    /// Hand the ball to `bowler_id` for the next over.
    ///
    /// Quota and consecutive-over checks use the latest counters: the
    /// innings' own bowling card first, then the XI record passed in.
    pub fn select_bowler(&self, bowling_xi: &[Player], bowler_id: &str) -> Result<Innings, SelectionError> {
        if self.completed || self.batting_order.is_empty() || self.current_bowler.is_some() {
            return Err(SelectionError::WrongState(self.state()));
        }
        let listed = bowling_xi
            .iter()
            .find(|p| p.id == bowler_id)
            .ok_or_else(|| SelectionError::BowlerNotInXi(bowler_id.to_string()))?;
        let latest = self.bowler(bowler_id).unwrap_or(listed);

        if let Some(reason) = ineligibility(latest, self.last_over_bowler.as_deref(), self.total_overs) {
            log::warn!("{}: bowler {} refused ({})", self.bowling_team, latest.name, reason);
            return Err(SelectionError::BowlerIneligible { id: bowler_id.to_string(), reason });
        }

        let mut next = self.clone();
        if next.bowler(bowler_id).is_none() {
            next.bowling_card.push(listed.clone());
        }
        next.current_bowler = Some(bowler_id.to_string());
        next.over_runs_conceded = 0;
        log::debug!("{}: {} to bowl over {}", next.bowling_team, latest.name, next.current_over() + 1);
        Ok(next)
    }

    /// Send in a new batsman after a wicket. They fill whichever crease slot
    /// is empty and start a partnership with the survivor.
    pub fn select_batsman(&self, batting_xi: &[Player], batsman_id: &str) -> Result<Innings, SelectionError> {
        if self.completed || self.batting_order.is_empty() {
            return Err(SelectionError::WrongState(self.state()));
        }
        let incoming = batting_xi
            .iter()
            .find(|p| p.id == batsman_id)
            .ok_or_else(|| SelectionError::BatsmanNotInXi(batsman_id.to_string()))?;
        if let Some(record) = self.batsman(batsman_id) {
            return Err(if record.stats.is_out {
                SelectionError::BatsmanAlreadyOut(batsman_id.to_string())
            } else {
                SelectionError::BatsmanAlreadyBatting(batsman_id.to_string())
            });
        }
        if incoming.stats.is_out {
            return Err(SelectionError::BatsmanAlreadyOut(batsman_id.to_string()));
        }

        let mut next = self.clone();
        let survivor = match (&next.striker, &next.non_striker) {
            (None, Some(other)) => {
                let other = other.clone();
                next.striker = Some(batsman_id.to_string());
                other
            }
            (Some(other), None) => {
                let other = other.clone();
                next.non_striker = Some(batsman_id.to_string());
                other
            }
            _ => return Err(SelectionError::NoVacancy),
        };
        next.batting_order.push(incoming.clone());
        next.partnerships.push(Partnership::new(
            &survivor,
            batsman_id,
            next.current_over(),
            next.phase,
        ));
        log::debug!("{}: {} comes in", next.batting_team, incoming.name);
        Ok(next)
    }

    /// Proof that a delivery may be bowled, or the state explaining why not.
    pub fn ready(&self) -> Result<ReadyToBowl<'_>, InningsState> {
        let state = self.state();
        if state != InningsState::InProgress {
            return Err(state);
        }
        let striker = self.striker.as_deref().and_then(|id| self.batsman(id));
        let bowler = self.current_bowler.as_deref().and_then(|id| self.bowler(id));
        match (striker, bowler) {
            (Some(striker), Some(bowler)) => Ok(ReadyToBowl { innings: self, striker, bowler }),
            _ => Err(state),
        }
    }

    /// Apply a known outcome to the next delivery.
    pub fn apply_outcome(&self, outcome: Outcome) -> Result<(Innings, BallEvent), InningsState> {
        Ok(self.ready()?.apply_ball(outcome))
    }

    /// Roll the next delivery from the outcome model and apply it.
    pub fn simulate_next_ball<R: Rng + ?Sized>(
        &self,
        model: &OutcomeModel,
        conditions: Option<&ConditionModifiers>,
        rng: &mut R,
    ) -> Result<(Innings, BallEvent), InningsState> {
        Ok(self.ready()?.simulate(model, conditions, rng))
    }
}

impl<'a> ReadyToBowl<'a> {
    pub fn innings(&self) -> &'a Innings {
        self.innings
    }

    pub fn striker(&self) -> &'a Player {
        self.striker
    }

    pub fn bowler(&self) -> &'a Player {
        self.bowler
    }

    pub fn simulate<R: Rng + ?Sized>(
        self,
        model: &OutcomeModel,
        conditions: Option<&ConditionModifiers>,
        rng: &mut R,
    ) -> (Innings, BallEvent) {
        let outcome = model.compute_outcome(self.striker, self.bowler, self.innings.phase, conditions, rng);
        self.apply_ball(outcome)
    }

    /// Apply one delivery and return the next innings value plus its log
    /// entry.
    pub fn apply_ball(self, rolled: Outcome) -> (Innings, BallEvent) {
        let mut next = self.innings.clone();
        let striker_id = self.striker.id.clone();
        let bowler_id = self.bowler.id.clone();
        let over_index = next.current_over();

        // Free hit: no dismissal possible.
        let free_hit_saved = next.free_hit && rolled.is_wicket();
        let outcome = if free_hit_saved { Outcome::DOT } else { rolled };
        let legal = outcome.is_legal();
        let wicket = outcome.is_wicket();

        // Striker
        if let Some(batsman) = next.batting_order.iter_mut().find(|p| p.id == striker_id) {
            batsman.stats.runs += outcome.bat_runs();
            if legal {
                batsman.stats.balls_faced += 1;
            }
            if outcome.is_four() {
                batsman.stats.fours += 1;
            }
            if outcome.is_six() {
                batsman.stats.sixes += 1;
            }
            if wicket {
                batsman.stats.is_out = true;
                batsman.stats.dismissal = Some(format!("b {}", self.bowler.name));
            }
        }

        // Bowler
        let conceded = outcome.runs_conceded();
        next.over_runs_conceded += conceded;
        let over_completed = legal && (next.legal_balls + 1) % BALLS_PER_OVER == 0;
        if let Some(bowler) = next.bowling_card.iter_mut().find(|p| p.id == bowler_id) {
            bowler.stats.runs_conceded += conceded;
            if wicket {
                bowler.stats.wickets += 1;
            }
            match outcome.extra_kind() {
                Some(ExtraKind::Wide) => bowler.stats.wides += 1,
                Some(ExtraKind::NoBall) => bowler.stats.no_balls += 1,
                _ => {}
            }
            if legal {
                if conceded == 0 {
                    bowler.stats.dot_balls += 1;
                }
                bowler.stats.record_legal_ball_bowled();
            }
            if over_completed && next.over_runs_conceded == 0 {
                bowler.stats.maidens += 1;
            }
        }

        // Team totals and extras
        let runs = outcome.total_runs();
        next.total_runs += runs;
        if legal {
            next.legal_balls += 1;
        }
        if wicket {
            next.wickets += 1;
        }
        if let Outcome::Extra { kind, runs: extra_runs } = outcome {
            let extra_runs = extra_runs as u32;
            match kind {
                ExtraKind::Wide => next.extras.wides += extra_runs,
                ExtraKind::NoBall => next.extras.no_balls += NO_BALL_PENALTY,
                ExtraKind::Bye => next.extras.byes += extra_runs,
                ExtraKind::LegBye => next.extras.leg_byes += extra_runs,
            }
        }

        // Partnership
        if let Some(partnership) = next.partnerships.iter_mut().rev().find(|p| p.active) {
            partnership.runs += runs;
            if legal {
                partnership.balls += 1;
            }
            if outcome.is_four() {
                partnership.fours += 1;
            }
            if outcome.is_six() {
                partnership.sixes += 1;
            }
            if let Some(share) = partnership.share_mut(&striker_id) {
                share.runs += outcome.bat_runs();
                if legal {
                    share.balls += 1;
                }
            }
        }

        // Strike
        if wicket {
            if over_completed {
                next.striker = next.non_striker.take();
            } else {
                next.striker = None;
            }
        } else {
            let odd_runs = outcome.runs_completed() % 2 == 1;
            if odd_runs != over_completed {
                std::mem::swap(&mut next.striker, &mut next.non_striker);
            }
        }

        // Over end
        if over_completed {
            next.last_over_bowler = Some(bowler_id.clone());
            next.current_bowler = None;
            next.over_runs_conceded = 0;
            next.phase = MatchPhase::for_over(next.current_over(), next.total_overs);
            if let Some(partnership) = next.partnerships.iter_mut().rev().find(|p| p.active) {
                partnership.phase = next.phase;
            }
        }

        // Fall of wicket
        if wicket {
            if let Some(partnership) = next.partnerships.iter_mut().rev().find(|p| p.active) {
                partnership.active = false;
                partnership.end_over = Some(over_index);
            }
            next.fall_of_wickets.push(FallOfWicket {
                wicket_number: next.wickets,
                score: next.total_runs,
                overs: next.overs(),
                batsman: self.striker.name.clone(),
                bowler: self.bowler.name.clone(),
                phase: next.phase,
            });
        }

        next.free_hit = outcome.is_no_ball();

        if next.is_complete_now() {
            next.completed = true;
            next.free_hit = false;
            if let Some(partnership) = next.partnerships.iter_mut().rev().find(|p| p.active) {
                partnership.active = false;
                partnership.end_over = Some(over_index);
            }
            log::info!("{}: innings {} closed at {}", next.batting_team, next.number, next.score_line());
        }

        let ball = if legal {
            (next.legal_balls - 1) % BALLS_PER_OVER + 1
        } else {
            next.legal_balls % BALLS_PER_OVER + 1
        };
        let mut commentary = format!(
            "{}.{} {} to {}, {}",
            over_index, ball, self.bowler.name, self.striker.name, outcome
        );
        if free_hit_saved {
            commentary.push_str(" (free hit, wicket void)");
        }
        log::debug!("{} -> {}", commentary, next.score_line());

        let event = BallEvent {
            over: over_index,
            ball,
            striker_id,
            bowler_id,
            outcome,
            free_hit_saved,
            runs,
            legal,
            wicket,
            over_completed,
            score_after: next.total_runs,
            wickets_after: next.wickets,
            commentary,
        };
        next.deliveries.push(event.clone());
        (next, event)
    }
}
