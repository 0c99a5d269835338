//! Ball outcome model.
//!
//! Turns a striker/bowler pairing, the match phase and optional pitch/weather
//! conditions into a weight table over outcomes, then rolls one delivery.
//! Weight computation is pure; the only randomness is the injected `Rng`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::draw::categorical_draw;
use crate::config::OutcomeTuning;
use crate::models::ball::{ExtraKind, Outcome};
use crate::models::innings::MatchPhase;
use crate::models::player::Player;

// ============================================================================
// Conditions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Pitch {
    #[default]
    Balanced,
    /// Hard and true, good for batting
    Flat,
    /// Grass cover, helps seam
    Green,
    /// Dry and turning, helps spin
    Dusty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Overcast,
    /// Dew makes the ball hard to grip
    Humid,
}

/// External multipliers applied on top of the skill-based weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionModifiers {
    pub boundary: f64,
    pub six: f64,
    pub dot: f64,
    /// Wicket multiplier for pace-leaning matchups
    pub pace_wicket: f64,
    /// Wicket multiplier for spin-leaning matchups
    pub spin_wicket: f64,
    pub extras: f64,
}

impl Default for ConditionModifiers {
    fn default() -> Self {
        Self { boundary: 1.0, six: 1.0, dot: 1.0, pace_wicket: 1.0, spin_wicket: 1.0, extras: 1.0 }
    }
}

impl ConditionModifiers {
    pub fn from_conditions(pitch: Pitch, weather: Weather) -> Self {
        let mut m = Self::default();
        match pitch {
            Pitch::Balanced => {}
            Pitch::Flat => {
                m.boundary *= 1.2;
                m.six *= 1.15;
                m.dot *= 0.9;
                m.pace_wicket *= 0.85;
                m.spin_wicket *= 0.85;
            }
            Pitch::Green => {
                m.boundary *= 0.9;
                m.pace_wicket *= 1.3;
                m.dot *= 1.1;
            }
            Pitch::Dusty => {
                m.six *= 0.9;
                m.spin_wicket *= 1.35;
                m.dot *= 1.05;
            }
        }
        match weather {
            Weather::Clear => {}
            Weather::Overcast => {
                m.pace_wicket *= 1.15;
                m.boundary *= 0.95;
            }
            Weather::Humid => {
                m.extras *= 1.3;
                m.spin_wicket *= 0.9;
                m.six *= 1.05;
            }
        }
        m
    }
}

/// Which bowling type a matchup leans towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BowlingLean {
    Pace,
    Spin,
}

impl BowlingLean {
    /// Pace when the bowler is strong (> 60) and better than the batsman.
    pub fn classify(bat_skill: u8, bowl_skill: u8) -> Self {
        if bowl_skill > 60 && bat_skill < bowl_skill {
            BowlingLean::Pace
        } else {
            BowlingLean::Spin
        }
    }
}

// ============================================================================
// Weights
// ============================================================================

/// Unnormalized weights for a regular (non-extra) delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeWeights {
    pub dot: f64,
    pub single: f64,
    pub double: f64,
    pub triple: f64,
    pub four: f64,
    pub six: f64,
    pub wicket: f64,
}

impl OutcomeWeights {
    /// Draw order: 0, 1, 2, 3, 4, 6, wicket
    pub fn as_array(&self) -> [f64; 7] {
        [self.dot, self.single, self.double, self.triple, self.four, self.six, self.wicket]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    fn outcome_at(idx: usize) -> Outcome {
        match idx {
            0 => Outcome::runs(0),
            1 => Outcome::runs(1),
            2 => Outcome::runs(2),
            3 => Outcome::runs(3),
            4 => Outcome::runs(4),
            5 => Outcome::runs(6),
            _ => Outcome::Wicket,
        }
    }
}

pub const DOT_FLOOR: f64 = 20.0;
pub const WICKET_FLOOR: f64 = 3.0;
pub const BOUNDARY_FLOOR: f64 = 8.0;
pub const SIX_FLOOR: f64 = 2.0;
pub const SINGLE_WEIGHT: f64 = 35.0;
pub const DOUBLE_WEIGHT: f64 = 15.0;
pub const TRIPLE_WEIGHT: f64 = 3.0;

/// `(bat - bowl) + 0.15 (batForm - bowlForm) + 0.02 batLast5Runs - 0.5 bowlLast5Wickets`
pub fn skill_differential(striker: &Player, bowler: &Player) -> f64 {
    (striker.batting as f64 - bowler.bowling as f64)
        + 0.15 * (striker.history.form - bowler.history.form)
        + 0.02 * striker.history.last5_runs() as f64
        - 0.5 * bowler.history.last5_wickets() as f64
}

/// Skill-only weights before conditions and phase.
pub fn base_weights(diff: f64) -> OutcomeWeights {
    OutcomeWeights {
        dot: (35.0 - 0.25 * diff).max(DOT_FLOOR),
        single: SINGLE_WEIGHT,
        double: DOUBLE_WEIGHT,
        triple: TRIPLE_WEIGHT,
        four: (10.0 + 0.12 * diff).max(BOUNDARY_FLOOR),
        six: (4.0 + 0.06 * diff).max(SIX_FLOOR),
        wicket: (5.0 - 0.06 * diff).max(WICKET_FLOOR),
    }
}

pub fn apply_conditions(weights: &mut OutcomeWeights, mods: &ConditionModifiers, lean: BowlingLean) {
    weights.four *= mods.boundary;
    weights.six *= mods.six;
    weights.dot *= mods.dot;
    weights.wicket *= match lean {
        BowlingLean::Pace => mods.pace_wicket,
        BowlingLean::Spin => mods.spin_wicket,
    };
}

pub fn apply_phase(weights: &mut OutcomeWeights, phase: MatchPhase) {
    match phase {
        MatchPhase::Powerplay => {
            weights.four *= 1.5;
            weights.six *= 1.3;
            weights.single *= 1.2;
            weights.wicket *= 1.1;
            weights.dot *= 0.8;
        }
        MatchPhase::Middle => {}
        MatchPhase::Death => {
            weights.four *= 1.3;
            weights.six *= 1.6;
            weights.wicket *= 1.4;
            weights.single *= 0.8;
            weights.dot *= 1.1;
        }
    }
}

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeModel {
    pub tuning: OutcomeTuning,
}

impl OutcomeModel {
    pub fn new(tuning: OutcomeTuning) -> Self {
        Self { tuning }
    }

    /// Final weight table for a regular delivery.
    pub fn weights(
        &self,
        striker: &Player,
        bowler: &Player,
        phase: MatchPhase,
        conditions: Option<&ConditionModifiers>,
    ) -> OutcomeWeights {
        let mut weights = base_weights(skill_differential(striker, bowler));
        if let Some(mods) = conditions {
            let lean = BowlingLean::classify(striker.batting, bowler.bowling);
            apply_conditions(&mut weights, mods, lean);
        }
        apply_phase(&mut weights, phase);
        weights
    }

    /// Probability that a delivery is an extra.
    pub fn extras_probability(&self, phase: MatchPhase, conditions: Option<&ConditionModifiers>) -> f64 {
        let base = match phase {
            MatchPhase::Death => self.tuning.death_extras_rate,
            _ => self.tuning.extras_rate,
        };
        let multiplier = conditions.map_or(1.0, |m| m.extras);
        (base * multiplier).clamp(0.0, 1.0)
    }

    /// Roll one delivery. Extras are rolled first and never carry a wicket.
    pub fn compute_outcome<R: Rng + ?Sized>(
        &self,
        striker: &Player,
        bowler: &Player,
        phase: MatchPhase,
        conditions: Option<&ConditionModifiers>,
        rng: &mut R,
    ) -> Outcome {
        if rng.gen::<f64>() < self.extras_probability(phase, conditions) {
            return roll_extra(rng);
        }

        let weights = self.weights(striker, bowler, phase, conditions);
        match categorical_draw(&weights.as_array(), rng) {
            Some(idx) => OutcomeWeights::outcome_at(idx),
            None => Outcome::DOT,
        }
    }
}

/// Extra kind (wide 40, no-ball 30, bye 15, leg-bye 15) and its runs.
fn roll_extra<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    const KINDS: [f64; 4] = [40.0, 30.0, 15.0, 15.0];
    const NO_BALL_RUNS: [(u8, f64); 3] = [(1, 70.0), (4, 20.0), (6, 10.0)];
    const BYE_RUNS: [(u8, f64); 2] = [(1, 80.0), (4, 20.0)];
    const LEG_BYE_RUNS: [(u8, f64); 3] = [(1, 60.0), (2, 25.0), (4, 15.0)];

    let pick = |table: &[(u8, f64)], rng: &mut R| -> u8 {
        let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
        categorical_draw(&weights, rng).map_or(1, |idx| table[idx].0)
    };

    match categorical_draw(&KINDS, rng) {
        Some(0) | None => Outcome::Extra { kind: ExtraKind::Wide, runs: 1 },
        Some(1) => Outcome::Extra { kind: ExtraKind::NoBall, runs: pick(&NO_BALL_RUNS, rng) },
        Some(2) => Outcome::Extra { kind: ExtraKind::Bye, runs: pick(&BYE_RUNS, rng) },
        Some(_) => Outcome::Extra { kind: ExtraKind::LegBye, runs: pick(&LEG_BYE_RUNS, rng) },
    }
}
