//! Match controller: toss, both innings, result and tiebreak.
//!
//! ```text
//! Created -> FirstInnings -> InningsBreak -> SecondInnings -> Completed
//!                                                   |
//!                                                   v (scores level)
//!                                                 Tied -> Completed (Super Over)
//! ```
//!
//! Like the innings machine, every operation returns a new `Match`.

use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use super::awards::man_of_the_match;
use super::outcome::{ConditionModifiers, OutcomeModel};
use super::rotation::available_bowlers;
use super::super_over::{play_round, SuperOverNominees, SuperOverOutcome, SuperOverSide};
use crate::error::{MatchError, SelectionError, SetupError};
use crate::models::ball::{BallEvent, Outcome};
use crate::models::innings::{Innings, InningsState};
use crate::models::match_state::{CurrentInnings, Margin, Match, MatchOutcome, MatchStatus, Toss, TossDecision};
use crate::models::player::{Player, PlayerId};
use crate::models::team_setup::{TeamSetup, TeamSide};

/// Result of two completed innings. `chasing` is the side that batted
/// second.
pub fn derive_result(first: &Innings, second: &Innings, chasing: TeamSide) -> MatchOutcome {
    if second.total_runs > first.total_runs {
        MatchOutcome::Won {
            winner: chasing,
            margin: Margin::Wickets(second.wicket_limit.saturating_sub(second.wickets)),
        }
    } else if second.total_runs < first.total_runs {
        MatchOutcome::Won {
            winner: chasing.opponent(),
            margin: Margin::Runs(first.total_runs - second.total_runs),
        }
    } else {
        MatchOutcome::Tied
    }
}

impl Match {
    /// New match between two validated setups. Per-match counters are reset.
    pub fn new(home: TeamSetup, away: TeamSetup, overs: u32) -> Result<Match, MatchError> {
        if overs == 0 {
            return Err(SetupError::InvalidOvers(overs).into());
        }
        home.validate()?;
        away.validate()?;
        if home.team_id == away.team_id {
            return Err(SetupError::SameTeam(home.team_id).into());
        }
        let home_ids: HashSet<&str> = home
            .playing_xi
            .iter()
            .chain(home.impact_players.iter())
            .map(|p| p.id.as_str())
            .collect();
        if let Some(shared) = away
            .playing_xi
            .iter()
            .chain(away.impact_players.iter())
            .find(|p| home_ids.contains(p.id.as_str()))
        {
            return Err(SetupError::SharedPlayer(shared.id.clone()).into());
        }

        let m = Match {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            overs,
            home: home.fresh_for_match(),
            away: away.fresh_for_match(),
            toss: None,
            first_innings: None,
            second_innings: None,
            current_innings: None,
            status: MatchStatus::Created,
            outcome: None,
            result: None,
            man_of_the_match: None,
            super_overs: Vec::new(),
        };
        log::info!("Match {}: {} v {}, {} overs", m.id, m.home.name, m.away.name, overs);
        Ok(m)
    }

    fn expect_status(&self, allowed: &[MatchStatus]) -> Result<(), MatchError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(MatchError::WrongStatus(self.status))
        }
    }

    pub fn record_toss(&self, toss: Toss) -> Result<Match, MatchError> {
        self.expect_status(&[MatchStatus::Created])?;
        let mut next = self.clone();
        next.toss = Some(toss);
        log::info!(
            "{} won the toss and chose to {}",
            next.team_name(toss.winner),
            match toss.decision {
                TossDecision::Bat => "bat",
                TossDecision::Bowl => "bowl",
            }
        );
        Ok(next)
    }

    pub fn simulate_toss<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Match, MatchError> {
        let winner = if rng.gen_bool(0.5) { TeamSide::Home } else { TeamSide::Away };
        let decision = if rng.gen_bool(0.5) { TossDecision::Bat } else { TossDecision::Bowl };
        self.record_toss(Toss { winner, decision })
    }

    pub fn start_first_innings(&self, opener1: &str, opener2: &str) -> Result<Match, MatchError> {
        self.expect_status(&[MatchStatus::Created])?;
        let batting = self.batting_first().ok_or(MatchError::WrongStatus(self.status))?;
        let innings = Innings::new(
            1,
            self.setup(batting).team_id.clone(),
            self.setup(batting.opponent()).team_id.clone(),
            self.overs,
            None,
        )
        .select_openers(&self.latest_xi(batting), opener1, opener2)?;

        let mut next = self.clone();
        next.first_innings = Some(innings);
        next.current_innings = Some(CurrentInnings::First);
        next.status = MatchStatus::FirstInnings;
        log::info!("First innings: {} batting", next.team_name(batting));
        Ok(next)
    }

    /// Second innings with the sides swapped and target = first total + 1.
    pub fn start_second_innings(&self, opener1: &str, opener2: &str) -> Result<Match, MatchError> {
        self.expect_status(&[MatchStatus::InningsBreak])?;
        let first = self.first_innings.as_ref().ok_or(MatchError::NoInnings)?;
        let batting = self.side_of_team(&first.bowling_team).ok_or(MatchError::NoInnings)?;
        let target = first.total_runs + 1;
        let innings = Innings::new(
            2,
            first.bowling_team.clone(),
            first.batting_team.clone(),
            self.overs,
            Some(target),
        )
        .select_openers(&self.latest_xi(batting), opener1, opener2)?;

        let mut next = self.clone();
        next.second_innings = Some(innings);
        next.current_innings = Some(CurrentInnings::Second);
        next.status = MatchStatus::SecondInnings;
        log::info!("Second innings: {} need {} to win", next.team_name(batting), target);
        Ok(next)
    }

    fn in_play(&self) -> Result<(&Innings, TeamSide), MatchError> {
        self.expect_status(&[MatchStatus::FirstInnings, MatchStatus::SecondInnings])?;
        let innings = self.innings().ok_or(MatchError::NoInnings)?;
        let batting = self.side_of_team(&innings.batting_team).ok_or(MatchError::NoInnings)?;
        Ok((innings, batting))
    }

    /// Batting XI of the current innings with latest counters.
    pub fn batting_xi(&self) -> Result<Vec<Player>, MatchError> {
        let (_, batting) = self.in_play()?;
        Ok(self.latest_xi(batting))
    }

    /// Bowling XI of the current innings with latest counters.
    pub fn bowling_xi(&self) -> Result<Vec<Player>, MatchError> {
        let (_, batting) = self.in_play()?;
        Ok(self.latest_xi(batting.opponent()))
    }

    /// Ids of the bowlers allowed to take the next over. Empty means no
    /// legal bowler is left.
    pub fn available_bowlers(&self) -> Result<Vec<PlayerId>, MatchError> {
        let (innings, _) = self.in_play()?;
        let xi = self.bowling_xi()?;
        Ok(available_bowlers(&xi, innings.last_over_bowler.as_deref(), innings.total_overs)
            .into_iter()
            .map(|p| p.id.clone())
            .collect())
    }

    /// Batsmen who have not yet batted in the current innings.
    pub fn yet_to_bat(&self) -> Result<Vec<PlayerId>, MatchError> {
        let (innings, batting) = self.in_play()?;
        Ok(self
            .latest_xi(batting)
            .into_iter()
            .filter(|p| innings.batsman(&p.id).is_none())
            .map(|p| p.id)
            .collect())
    }

    pub fn select_bowler(&self, bowler_id: &str) -> Result<Match, MatchError> {
        let (innings, _) = self.in_play()?;
        let updated = innings.select_bowler(&self.bowling_xi()?, bowler_id)?;
        Ok(self.with_current_innings(updated))
    }

    pub fn select_batsman(&self, batsman_id: &str) -> Result<Match, MatchError> {
        let (innings, _) = self.in_play()?;
        let updated = innings.select_batsman(&self.batting_xi()?, batsman_id)?;
        Ok(self.with_current_innings(updated))
    }

    /// Apply a known outcome to the next delivery.
    pub fn apply_outcome(&self, outcome: Outcome) -> Result<(Match, BallEvent), MatchError> {
        let (innings, _) = self.in_play()?;
        let (updated, event) = innings.apply_outcome(outcome).map_err(MatchError::NotReady)?;
        Ok((self.after_delivery(updated), event))
    }

    /// Roll and apply the next delivery.
    pub fn simulate_next_ball<R: Rng + ?Sized>(
        &self,
        model: &OutcomeModel,
        conditions: Option<&ConditionModifiers>,
        rng: &mut R,
    ) -> Result<(Match, BallEvent), MatchError> {
        let (innings, _) = self.in_play()?;
        let (updated, event) = innings
            .simulate_next_ball(model, conditions, rng)
            .map_err(MatchError::NotReady)?;
        Ok((self.after_delivery(updated), event))
    }

    fn with_current_innings(&self, innings: Innings) -> Match {
        let mut next = self.clone();
        if let Some(slot) = next.innings_mut() {
            *slot = innings;
        }
        next
    }

    fn after_delivery(&self, innings: Innings) -> Match {
        let completed = innings.state() == InningsState::Completed;
        let mut next = self.with_current_innings(innings);
        if !completed {
            return next;
        }
        match next.current_innings {
            Some(CurrentInnings::First) => {
                next.status = MatchStatus::InningsBreak;
                log::info!("Innings break");
            }
            Some(CurrentInnings::Second) => next.conclude(),
            None => {}
        }
        next
    }

    fn conclude(&mut self) {
        let (Some(first), Some(second)) = (&self.first_innings, &self.second_innings) else {
            return;
        };
        let Some(chasing) = self.side_of_team(&second.batting_team) else {
            return;
        };
        let outcome = derive_result(first, second, chasing);
        let level_at = second.total_runs;
        self.outcome = Some(outcome);
        match outcome {
            MatchOutcome::Won { winner, margin } => {
                let text = format!("{} won by {}", self.team_name(winner), margin.describe());
                self.finish(text);
            }
            _ => {
                self.status = MatchStatus::Tied;
                log::info!("Scores level at {}: Super Over required", level_at);
            }
        }
    }

    fn finish(&mut self, result: String) {
        self.man_of_the_match = man_of_the_match(&self.all_players_latest());
        self.status = MatchStatus::Completed;
        log::info!("{}", result);
        self.result = Some(result);
    }

    /// Close a tied match without a Super Over.
    pub fn accept_tie(&self) -> Result<Match, MatchError> {
        self.expect_status(&[MatchStatus::Tied])?;
        let mut next = self.clone();
        next.outcome = Some(MatchOutcome::Tied);
        next.finish("Match Tied".to_string());
        Ok(next)
    }

    /// Play one Super Over round. The side that batted second in the match
    /// bats first. A level round leaves the match `Tied` for another round
    /// until `max_super_overs` have been played, after which it is shared.
    pub fn resolve_super_over<R: Rng + ?Sized>(
        &self,
        home_nominees: &SuperOverNominees,
        away_nominees: &SuperOverNominees,
        model: &OutcomeModel,
        conditions: Option<&ConditionModifiers>,
        rng: &mut R,
        max_super_overs: u32,
    ) -> Result<(Match, SuperOverOutcome), MatchError> {
        self.expect_status(&[MatchStatus::Tied])?;
        let second = self.second_innings.as_ref().ok_or(MatchError::NoInnings)?;
        let opens = self.side_of_team(&second.batting_team).ok_or(MatchError::NoInnings)?;

        let nominees = |side: TeamSide| match side {
            TeamSide::Home => home_nominees,
            TeamSide::Away => away_nominees,
        };
        let (first_xi, second_xi) = (self.latest_xi(opens), self.latest_xi(opens.opponent()));
        let first = SuperOverSide {
            side: opens,
            name: self.team_name(opens),
            nominees: nominees(opens),
            xi: &first_xi,
        };
        let second = SuperOverSide {
            side: opens.opponent(),
            name: self.team_name(opens.opponent()),
            nominees: nominees(opens.opponent()),
            xi: &second_xi,
        };
        let round = self.super_overs.len() as u32 + 1;
        let outcome = play_round(round, &first, &second, model, conditions, rng)?;

        let mut next = self.clone();
        next.super_overs.push(outcome.clone());
        match (outcome.winner, outcome.margin) {
            (Some(winner), Some(margin)) => {
                next.outcome = Some(MatchOutcome::SuperOverWon { winner, margin });
                next.finish(outcome.margin_text.clone());
            }
            _ if round >= max_super_overs => {
                next.outcome = Some(MatchOutcome::Shared);
                next.finish(format!("Match Tied, still level after {round} Super Overs"));
            }
            _ => {}
        }
        Ok((next, outcome))
    }

    /// Bring an impact reserve in for `replace_id`. Refused for a player at
    /// the crease or bowling the current over.
    pub fn use_impact_player(&self, side: TeamSide, impact_id: &str, replace_id: &str) -> Result<Match, MatchError> {
        self.expect_status(&[
            MatchStatus::Created,
            MatchStatus::FirstInnings,
            MatchStatus::InningsBreak,
            MatchStatus::SecondInnings,
        ])?;
        if let Some(innings) = self.innings().filter(|i| !i.completed) {
            if innings.is_at_crease(replace_id) || innings.current_bowler.as_deref() == Some(replace_id) {
                return Err(SelectionError::ReplacedPlayerActive(replace_id.to_string()).into());
            }
        }
        let updated = self.setup(side).use_impact_player(impact_id, replace_id)?;
        let mut next = self.clone();
        *next.setup_mut(side) = updated;
        Ok(next)
    }
}
