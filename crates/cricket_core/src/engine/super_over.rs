//! Super Over tiebreaker.
//!
//! Each side bats one over with two nominated batsmen against one nominated
//! bowler. The over ends after six legal balls or two wickets, and the chase
//! stops as soon as it passes the first total. After the first wicket the
//! surviving batsman faces every remaining ball. Super Over deliveries do not
//! touch match counters.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::outcome::{ConditionModifiers, OutcomeModel};
use crate::error::MatchError;
use crate::models::ball::{BallEvent, Outcome};
use crate::models::innings::{MatchPhase, BALLS_PER_OVER};
use crate::models::match_state::Margin;
use crate::models::player::{Player, PlayerId};
use crate::models::team_setup::TeamSide;

pub const SUPER_OVER_BALLS: u32 = BALLS_PER_OVER;
pub const SUPER_OVER_WICKETS: u32 = 2;

/// One side's picks: two batsmen (the first takes strike) and the bowler
/// who bowls at the opposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperOverNominees {
    pub batsmen: [PlayerId; 2],
    pub bowler: PlayerId,
}

impl SuperOverNominees {
    pub fn new(striker: impl Into<PlayerId>, partner: impl Into<PlayerId>, bowler: impl Into<PlayerId>) -> Self {
        Self { batsmen: [striker.into(), partner.into()], bowler: bowler.into() }
    }

    /// Batsmen from this side's XI, bowler from the same XI.
    pub fn validate(&self, xi: &[Player]) -> Result<(), MatchError> {
        if self.batsmen[0] == self.batsmen[1] {
            return Err(MatchError::InvalidNomination("batsmen must be different players".into()));
        }
        for id in self.batsmen.iter().chain(std::iter::once(&self.bowler)) {
            if !xi.iter().any(|p| &p.id == id) {
                return Err(MatchError::InvalidNomination(format!("{id} is not in the playing XI")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperOverInnings {
    pub batting: TeamSide,
    pub batsmen: [PlayerId; 2],
    pub bowler: PlayerId,
    pub target: Option<u32>,
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    /// Index into `batsmen` of the batsman on strike
    pub striker: usize,
    /// `batsmen[i]` has been dismissed
    pub out: [bool; 2],
    pub free_hit: bool,
    pub deliveries: Vec<BallEvent>,
}

impl SuperOverInnings {
    pub fn new(batting: TeamSide, nominees: &SuperOverNominees, bowler: &PlayerId, target: Option<u32>) -> Self {
        Self {
            batting,
            batsmen: nominees.batsmen.clone(),
            bowler: bowler.clone(),
            target,
            runs: 0,
            wickets: 0,
            legal_balls: 0,
            striker: 0,
            out: [false; 2],
            free_hit: false,
            deliveries: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.legal_balls >= SUPER_OVER_BALLS
            || self.wickets >= SUPER_OVER_WICKETS
            || self.target.is_some_and(|target| self.runs >= target)
    }

    pub fn striker_id(&self) -> &PlayerId {
        &self.batsmen[self.striker]
    }

    /// "13/1 (0.5)"
    pub fn score_line(&self) -> String {
        format!("{}/{} (0.{})", self.runs, self.wickets, self.legal_balls)
    }

    /// Apply one delivery. Returns `None` once the over is finished.
    pub fn apply_ball(&self, rolled: Outcome) -> Option<SuperOverInnings> {
        if self.is_complete() {
            return None;
        }
        let mut next = self.clone();
        let free_hit_saved = next.free_hit && rolled.is_wicket();
        let outcome = if free_hit_saved { Outcome::DOT } else { rolled };
        let striker_id = next.striker_id().clone();

        next.runs += outcome.total_runs();
        if outcome.is_legal() {
            next.legal_balls += 1;
        }
        if outcome.is_wicket() {
            next.wickets += 1;
            next.out[next.striker] = true;
        }

        let partner = 1 - next.striker;
        if next.out[next.striker] {
            next.striker = partner;
        } else if !next.out[partner] && outcome.runs_completed() % 2 == 1 {
            next.striker = partner;
        }
        next.free_hit = outcome.is_no_ball();

        let ball = if outcome.is_legal() { next.legal_balls } else { next.legal_balls + 1 };
        next.deliveries.push(BallEvent {
            over: 0,
            ball,
            striker_id,
            bowler_id: next.bowler.clone(),
            outcome,
            free_hit_saved,
            runs: outcome.total_runs(),
            legal: outcome.is_legal(),
            wicket: outcome.is_wicket(),
            over_completed: outcome.is_legal() && next.legal_balls == SUPER_OVER_BALLS,
            score_after: next.runs,
            wickets_after: next.wickets,
            commentary: format!("0.{ball} {outcome}"),
        });
        Some(next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperOverOutcome {
    /// 1 for the first Super Over, 2 for a repeat, and so on
    pub round: u32,
    pub first: SuperOverInnings,
    pub second: SuperOverInnings,
    pub winner: Option<TeamSide>,
    pub margin: Option<Margin>,
    pub margin_text: String,
}

/// Winner and margin of a completed round: the chasing side by wickets in
/// hand, the defending side by runs, `None` when level.
pub fn decide(first: &SuperOverInnings, second: &SuperOverInnings) -> Option<(TeamSide, Margin)> {
    if second.runs > first.runs {
        Some((second.batting, Margin::Wickets(SUPER_OVER_WICKETS.saturating_sub(second.wickets))))
    } else if second.runs < first.runs {
        Some((first.batting, Margin::Runs(first.runs - second.runs)))
    } else {
        None
    }
}

/// Bowl out one Super Over innings from the outcome model.
pub fn play_innings<R: Rng + ?Sized>(
    innings: SuperOverInnings,
    batsmen: &[Player; 2],
    bowler: &Player,
    model: &OutcomeModel,
    conditions: Option<&ConditionModifiers>,
    rng: &mut R,
) -> SuperOverInnings {
    let mut current = innings;
    while !current.is_complete() {
        let striker = &batsmen[current.striker];
        let outcome = model.compute_outcome(striker, bowler, MatchPhase::Death, conditions, rng);
        match current.apply_ball(outcome) {
            Some(next) => current = next,
            None => break,
        }
    }
    log::info!("Super Over: {:?} made {}", current.batting, current.score_line());
    current
}

/// Sides and names needed to play one full round.
pub struct SuperOverSide<'a> {
    pub side: TeamSide,
    pub name: &'a str,
    pub nominees: &'a SuperOverNominees,
    pub xi: &'a [Player],
}

impl SuperOverSide<'_> {
    fn player(&self, id: &str) -> Result<Player, MatchError> {
        self.xi
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| MatchError::UnknownPlayer(id.to_string()))
    }

    fn batsmen(&self) -> Result<[Player; 2], MatchError> {
        Ok([self.player(&self.nominees.batsmen[0])?, self.player(&self.nominees.batsmen[1])?])
    }
}

/// Play a full round: `first` bats, then `second` chases.
pub fn play_round<R: Rng + ?Sized>(
    round: u32,
    first: &SuperOverSide<'_>,
    second: &SuperOverSide<'_>,
    model: &OutcomeModel,
    conditions: Option<&ConditionModifiers>,
    rng: &mut R,
) -> Result<SuperOverOutcome, MatchError> {
    first.nominees.validate(first.xi)?;
    second.nominees.validate(second.xi)?;

    let opening = SuperOverInnings::new(first.side, first.nominees, &second.nominees.bowler, None);
    let opening = play_innings(
        opening,
        &first.batsmen()?,
        &second.player(&second.nominees.bowler)?,
        model,
        conditions,
        rng,
    );

    let chase = SuperOverInnings::new(
        second.side,
        second.nominees,
        &first.nominees.bowler,
        Some(opening.runs + 1),
    );
    let chase = play_innings(
        chase,
        &second.batsmen()?,
        &first.player(&first.nominees.bowler)?,
        model,
        conditions,
        rng,
    );

    let decision = decide(&opening, &chase);
    let margin_text = match decision {
        Some((side, margin)) => {
            let name = if side == first.side { first.name } else { second.name };
            format!("{} won the Super Over by {}", name, margin.describe())
        }
        None => "Super Over tied".to_string(),
    };
    log::info!("Super Over {}: {}", round, margin_text);

    Ok(SuperOverOutcome {
        round,
        first: opening,
        second: chase,
        winner: decision.map(|(side, _)| side),
        margin: decision.map(|(_, margin)| margin),
        margin_text,
    })
}
