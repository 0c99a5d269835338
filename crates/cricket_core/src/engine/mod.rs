pub mod awards;
pub mod controller;
pub mod draw;
pub mod driver;
pub mod innings;
pub mod outcome;
pub mod rotation;
pub mod super_over;
pub mod win_predictor;

#[cfg(test)]
pub mod test_fixtures;

#[cfg(test)]
mod controller_tests;
#[cfg(test)]
mod outcome_tests;

pub use awards::{impact_score, man_of_the_match};
pub use controller::derive_result;
pub use draw::{categorical_draw, categorical_index, weighted_choice};
pub use driver::{pick_bowler, pick_nominees, pick_openers, AutoDriver};
pub use innings::ReadyToBowl;
pub use outcome::{
    BowlingLean, ConditionModifiers, OutcomeModel, OutcomeWeights, Pitch, Weather,
};
pub use rotation::{
    available_bowlers, bowler_availability, ineligibility, max_overs_per_bowler,
    BowlerAvailability, Ineligibility,
};
pub use super_over::{
    SuperOverInnings, SuperOverNominees, SuperOverOutcome, SuperOverSide, SUPER_OVER_BALLS,
    SUPER_OVER_WICKETS,
};
pub use win_predictor::{monte_carlo, predict, MonteCarloEstimate, WinProbability};
