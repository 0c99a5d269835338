use super::outcome::*;
use crate::config::OutcomeTuning;
use crate::models::ball::{ExtraKind, Outcome};
use crate::models::innings::MatchPhase;
use crate::models::player::{PerformanceHistory, Player};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn batsman(skill: u8) -> Player {
    Player::new("bat", "Batsman", skill, 20)
}

fn bowler(skill: u8) -> Player {
    Player::new("bowl", "Bowler", 20, skill)
}

#[test]
fn test_differential_uses_form_and_recent_numbers() {
    let bat = batsman(70).with_history(PerformanceHistory {
        form: 80.0,
        recent_runs: vec![40, 60, 100],
        ..Default::default()
    });
    let bowl = bowler(60).with_history(PerformanceHistory {
        form: 40.0,
        recent_wickets: vec![2, 2],
        ..Default::default()
    });
    // 10 + 0.15 * 40 + 0.02 * 200 - 0.5 * 4
    assert!((skill_differential(&bat, &bowl) - 18.0).abs() < 1e-9);
}

#[test]
fn test_base_weights_respect_floors() {
    let strong_bat = base_weights(500.0);
    assert_eq!(strong_bat.dot, DOT_FLOOR);
    assert_eq!(strong_bat.wicket, WICKET_FLOOR);

    let strong_bowl = base_weights(-500.0);
    assert_eq!(strong_bowl.four, BOUNDARY_FLOOR);
    assert_eq!(strong_bowl.six, SIX_FLOOR);

    for w in [strong_bat, strong_bowl, base_weights(0.0)] {
        assert_eq!(w.single, 35.0);
        assert_eq!(w.double, 15.0);
        assert_eq!(w.triple, 3.0);
    }
}

#[test]
fn test_better_batsman_scores_more_boundaries() {
    let even = base_weights(0.0);
    let ahead = base_weights(30.0);
    assert!(ahead.four > even.four);
    assert!(ahead.six > even.six);
    assert!(ahead.dot < even.dot);
    assert!(ahead.wicket < even.wicket);
}

#[test]
fn test_phase_multipliers() {
    let base = base_weights(0.0);

    let mut pp = base;
    apply_phase(&mut pp, MatchPhase::Powerplay);
    assert!((pp.four - base.four * 1.5).abs() < 1e-9);
    assert!((pp.six - base.six * 1.3).abs() < 1e-9);
    assert!((pp.single - base.single * 1.2).abs() < 1e-9);
    assert!((pp.wicket - base.wicket * 1.1).abs() < 1e-9);
    assert!((pp.dot - base.dot * 0.8).abs() < 1e-9);

    let mut death = base;
    apply_phase(&mut death, MatchPhase::Death);
    assert!((death.four - base.four * 1.3).abs() < 1e-9);
    assert!((death.six - base.six * 1.6).abs() < 1e-9);
    assert!((death.wicket - base.wicket * 1.4).abs() < 1e-9);
    assert!((death.single - base.single * 0.8).abs() < 1e-9);
    assert!((death.dot - base.dot * 1.1).abs() < 1e-9);

    let mut middle = base;
    apply_phase(&mut middle, MatchPhase::Middle);
    assert_eq!(middle, base);
}

#[test]
fn test_wicket_multiplier_follows_bowling_lean() {
    assert_eq!(BowlingLean::classify(50, 70), BowlingLean::Pace);
    assert_eq!(BowlingLean::classify(80, 70), BowlingLean::Spin);
    assert_eq!(BowlingLean::classify(40, 55), BowlingLean::Spin);

    let mods = ConditionModifiers { pace_wicket: 2.0, spin_wicket: 0.5, ..Default::default() };
    let model = OutcomeModel::default();

    let pace = model.weights(&batsman(50), &bowler(70), MatchPhase::Middle, Some(&mods));
    let plain = model.weights(&batsman(50), &bowler(70), MatchPhase::Middle, None);
    assert!((pace.wicket - plain.wicket * 2.0).abs() < 1e-9);

    let spin = model.weights(&batsman(40), &bowler(55), MatchPhase::Middle, Some(&mods));
    let plain = model.weights(&batsman(40), &bowler(55), MatchPhase::Middle, None);
    assert!((spin.wicket - plain.wicket * 0.5).abs() < 1e-9);
}

#[test]
fn test_condition_presets() {
    let flat = ConditionModifiers::from_conditions(Pitch::Flat, Weather::Clear);
    assert!(flat.boundary > 1.0 && flat.pace_wicket < 1.0);
    let green = ConditionModifiers::from_conditions(Pitch::Green, Weather::Overcast);
    assert!(green.pace_wicket > 1.3);
    let humid = ConditionModifiers::from_conditions(Pitch::Balanced, Weather::Humid);
    assert!(humid.extras > 1.0);
    assert_eq!(
        ConditionModifiers::from_conditions(Pitch::Balanced, Weather::Clear),
        ConditionModifiers::default()
    );
}

#[test]
fn test_extras_probability_by_phase() {
    let model = OutcomeModel::default();
    assert!((model.extras_probability(MatchPhase::Middle, None) - 0.08).abs() < 1e-9);
    assert!((model.extras_probability(MatchPhase::Death, None) - 0.10).abs() < 1e-9);
    let mods = ConditionModifiers { extras: 1.5, ..Default::default() };
    assert!((model.extras_probability(MatchPhase::Powerplay, Some(&mods)) - 0.12).abs() < 1e-9);
}

#[test]
fn test_outcomes_are_reproducible_with_seed() {
    let model = OutcomeModel::default();
    let (bat, bowl) = (batsman(65), bowler(60));
    let roll = |seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..200)
            .map(|_| model.compute_outcome(&bat, &bowl, MatchPhase::Middle, None, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(roll(11), roll(11));
    assert_ne!(roll(11), roll(12));
}

#[test]
fn test_outcome_shapes_and_extras_rate() {
    let model = OutcomeModel::default();
    let (bat, bowl) = (batsman(60), bowler(60));
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let mut extras = 0;
    let n = 20_000;
    for _ in 0..n {
        match model.compute_outcome(&bat, &bowl, MatchPhase::Middle, None, &mut rng) {
            Outcome::Runs { runs } => assert!(matches!(runs, 0 | 1 | 2 | 3 | 4 | 6)),
            Outcome::Wicket => {}
            Outcome::Extra { kind, runs } => {
                extras += 1;
                match kind {
                    ExtraKind::Wide => assert_eq!(runs, 1),
                    ExtraKind::NoBall => assert!(matches!(runs, 1 | 4 | 6)),
                    ExtraKind::Bye => assert!(matches!(runs, 1 | 4)),
                    ExtraKind::LegBye => assert!(matches!(runs, 1 | 2 | 4)),
                }
            }
        }
    }
    let rate = extras as f64 / n as f64;
    assert!((0.07..0.09).contains(&rate), "extras rate {rate}");
}

#[test]
fn test_no_extras_when_rate_is_zero() {
    let model = OutcomeModel::new(OutcomeTuning { extras_rate: 0.0, death_extras_rate: 0.0 });
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..2_000 {
        let outcome =
            model.compute_outcome(&batsman(50), &bowler(50), MatchPhase::Death, None, &mut rng);
        assert!(outcome.extra_kind().is_none());
    }
}
