use super::controller::derive_result;
use super::driver::AutoDriver;
use super::super_over::SuperOverNominees;
use super::test_fixtures::team;
use crate::error::{MatchError, SelectionError, SetupError};
use crate::models::ball::Outcome;
use crate::models::innings::Innings;
use crate::models::match_state::{Margin, Match, MatchOutcome, MatchStatus, Toss, TossDecision};
use crate::models::team_setup::TeamSide;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// `balls` legal deliveries: wickets at the given indices, then `twos` twos,
/// then singles.
fn script(balls: usize, wickets_at: &[usize], twos: usize) -> Vec<Outcome> {
    let mut scored = 0;
    (0..balls)
        .map(|i| {
            if wickets_at.contains(&i) {
                Outcome::Wicket
            } else {
                scored += 1;
                if scored <= twos {
                    Outcome::runs(2)
                } else {
                    Outcome::runs(1)
                }
            }
        })
        .collect()
}

fn bowl(m: &Match, outcomes: &[Outcome]) -> Match {
    let driver = AutoDriver::default();
    outcomes.iter().fold(m.clone(), |acc, outcome| {
        driver.prepare(&acc).unwrap().apply_outcome(*outcome).unwrap().0
    })
}

/// Alpha (home) bats first.
fn first_innings_started() -> Match {
    Match::new(team("a", "Alpha"), team("b", "Bravo"), 20)
        .unwrap()
        .record_toss(Toss { winner: TeamSide::Home, decision: TossDecision::Bat })
        .unwrap()
        .start_first_innings("a0", "a1")
        .unwrap()
}

#[test]
fn test_match_creation_is_validated() {
    assert_eq!(
        Match::new(team("a", "Alpha"), team("b", "Bravo"), 0).unwrap_err(),
        MatchError::Setup(SetupError::InvalidOvers(0))
    );
    assert_eq!(
        Match::new(team("a", "Alpha"), team("a", "Alpha"), 20).unwrap_err(),
        MatchError::Setup(SetupError::SameTeam("a".into()))
    );

    let mut dirty = team("a", "Alpha");
    dirty.playing_xi[0].stats.runs = 99;
    let m = Match::new(dirty, team("b", "Bravo"), 20).unwrap();
    assert_eq!(m.status, MatchStatus::Created);
    assert_eq!(m.home.playing_xi[0].stats.runs, 0);
}

#[test]
fn test_squads_sharing_player_ids_are_rejected() {
    let mut away = team("b", "Bravo");
    away.playing_xi[4].id = "a4".into();
    assert_eq!(
        Match::new(team("a", "Alpha"), away, 20).unwrap_err(),
        MatchError::Setup(SetupError::SharedPlayer("a4".into()))
    );

    let mut away = team("b", "Bravo");
    away.impact_players[0].id = "ar1".into();
    assert_eq!(
        Match::new(team("a", "Alpha"), away, 20).unwrap_err(),
        MatchError::Setup(SetupError::SharedPlayer("ar1".into()))
    );
}

#[test]
fn test_latest_xi_reads_only_own_cards() {
    // Force a collision past validation: both XIs use a0..a10.
    let mut m = Match::new(team("a", "Alpha"), team("b", "Bravo"), 5).unwrap();
    for p in m.away.playing_xi.iter_mut() {
        p.id = p.id.replacen('b', "a", 1);
    }
    let m = m
        .record_toss(Toss { winner: TeamSide::Home, decision: TossDecision::Bat })
        .unwrap()
        .start_first_innings("a0", "a1")
        .unwrap();
    let m = AutoDriver::default().play_innings(&m, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();

    let home = m.latest_xi(TeamSide::Home);
    assert!(home.iter().all(|p| p.name.starts_with("A ")));
    assert!(home.iter().all(|p| !p.stats.has_bowled()));

    let away = m.latest_xi(TeamSide::Away);
    assert!(away.iter().all(|p| p.name.starts_with("B ")));
    assert!(away.iter().all(|p| !p.stats.has_batted()));
    assert!(away.iter().any(|p| p.stats.has_bowled()));
}

#[test]
fn test_toss_decides_batting_side() {
    let m = Match::new(team("a", "Alpha"), team("b", "Bravo"), 20).unwrap();
    assert!(matches!(m.start_first_innings("a0", "a1"), Err(MatchError::WrongStatus(MatchStatus::Created))));

    let m = m.record_toss(Toss { winner: TeamSide::Home, decision: TossDecision::Bowl }).unwrap();
    assert_eq!(m.batting_first(), Some(TeamSide::Away));
    let m = m.start_first_innings("b0", "b1").unwrap();
    assert_eq!(m.batting_side(), Some(TeamSide::Away));
    assert!(matches!(m.record_toss(Toss { winner: TeamSide::Away, decision: TossDecision::Bat }), Err(MatchError::WrongStatus(_))));
}

#[test]
fn test_chase_won_by_wickets_end_to_end() {
    let m = first_innings_started();

    // 160/6 in 120 balls
    let m = bowl(&m, &script(120, &[19, 39, 59, 79, 99, 119], 46));
    assert_eq!(m.status, MatchStatus::InningsBreak);
    let first = m.first_innings.as_ref().unwrap();
    assert_eq!(first.score_line(), "160/6 (20.0)");
    assert!(first.completed);

    let m = m.start_second_innings("b0", "b1").unwrap();
    assert_eq!(m.status, MatchStatus::SecondInnings);
    let second = m.second_innings.as_ref().unwrap();
    assert_eq!(second.target, Some(161));
    assert_eq!(second.batting_team, "b");
    assert_eq!(second.total_runs, 0);
    assert!(second.partnerships.len() == 1 && second.extras.total() == 0);

    // 161/4 in 110 balls; the last ball takes them to 161.
    let chase = script(110, &[9, 29, 49, 69], 55);
    let m = bowl(&m, &chase[..109]);
    assert_eq!(m.status, MatchStatus::SecondInnings);
    assert_eq!(m.second_innings.as_ref().unwrap().total_runs, 160);

    let m = bowl(&m, &chase[109..]);
    let second = m.second_innings.as_ref().unwrap();
    assert!(second.completed);
    assert_eq!(second.legal_balls, 110);
    assert_eq!(second.score_line(), "161/4 (18.2)");
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(
        m.outcome,
        Some(MatchOutcome::Won { winner: TeamSide::Away, margin: Margin::Wickets(6) })
    );
    assert_eq!(m.result.as_deref(), Some("Bravo won by 6 wickets"));
    assert!(m.man_of_the_match.is_some());

    // Nothing more can be bowled.
    assert_eq!(
        m.apply_outcome(Outcome::DOT).unwrap_err(),
        MatchError::WrongStatus(MatchStatus::Completed)
    );
}

#[test]
fn test_defending_side_wins_by_runs() {
    let m = bowl(&first_innings_started(), &script(120, &[19, 39, 59, 79, 99, 119], 46));
    let m = m.start_second_innings("b0", "b1").unwrap();
    let m = bowl(&m, &script(10, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], 0));
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.result.as_deref(), Some("Alpha won by 160 runs"));
}

fn tied_match() -> Match {
    // 150/8 v 150/9
    let m = bowl(&first_innings_started(), &script(120, &[10, 20, 30, 40, 50, 60, 70, 80], 38));
    let m = m.start_second_innings("b0", "b1").unwrap();
    bowl(&m, &script(120, &[10, 20, 30, 40, 50, 60, 70, 80, 90], 39))
}

#[test]
fn test_level_scores_tie_and_go_to_super_over() {
    let m = tied_match();
    assert_eq!(m.first_innings.as_ref().unwrap().score_line(), "150/8 (20.0)");
    assert_eq!(m.second_innings.as_ref().unwrap().score_line(), "150/9 (20.0)");
    assert_eq!(m.status, MatchStatus::Tied);
    assert_eq!(m.outcome, Some(MatchOutcome::Tied));
    assert!(m.result.is_none());

    let home = SuperOverNominees::new("a0", "a1", "a10");
    let away = SuperOverNominees::new("b0", "b1", "b10");
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let driver = AutoDriver::default();
    let (after, round) = m
        .resolve_super_over(&home, &away, &driver.model, None, &mut rng, 5)
        .unwrap();

    // Bravo batted second in the match, so they bat first now.
    assert_eq!(round.first.batting, TeamSide::Away);
    assert_eq!(round.second.batting, TeamSide::Home);
    assert_eq!(round.round, 1);
    assert_eq!(after.super_overs.len(), 1);
    match round.winner {
        Some(_) => {
            assert_eq!(after.status, MatchStatus::Completed);
            assert_eq!(after.result.as_deref(), Some(round.margin_text.as_str()));
        }
        None => assert_eq!(after.status, MatchStatus::Tied),
    }
}

#[test]
fn test_super_over_rejects_bad_nominees() {
    let m = tied_match();
    let home = SuperOverNominees::new("a0", "b1", "a10");
    let away = SuperOverNominees::new("b0", "b1", "b10");
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert!(matches!(
        m.resolve_super_over(&home, &away, &Default::default(), None, &mut rng, 5),
        Err(MatchError::InvalidNomination(_))
    ));
}

#[test]
fn test_repeated_super_overs_are_capped() {
    let m = tied_match();
    let driver = AutoDriver { max_super_overs: 1, ..AutoDriver::default() };
    let home = SuperOverNominees::new("a0", "a1", "a10");
    let away = SuperOverNominees::new("b0", "b1", "b10");

    // Whatever the seed, one round either decides the match or shares it.
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (after, round) = m
            .resolve_super_over(&home, &away, &driver.model, None, &mut rng, driver.max_super_overs)
            .unwrap();
        assert_eq!(after.status, MatchStatus::Completed);
        if round.winner.is_none() {
            assert_eq!(after.outcome, Some(MatchOutcome::Shared));
        }
    }
}

#[test]
fn test_accept_tie() {
    let m = tied_match().accept_tie().unwrap();
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.result.as_deref(), Some("Match Tied"));
}

#[test]
fn test_derive_result_is_pure() {
    let mut first = Innings::new(1, "a", "b", 20, None);
    let mut second = Innings::new(2, "b", "a", 20, Some(141));
    first.total_runs = 140;
    second.total_runs = 141;
    second.wickets = 3;
    assert_eq!(
        derive_result(&first, &second, TeamSide::Away),
        MatchOutcome::Won { winner: TeamSide::Away, margin: Margin::Wickets(7) }
    );
    second.total_runs = 139;
    assert_eq!(
        derive_result(&first, &second, TeamSide::Away),
        MatchOutcome::Won { winner: TeamSide::Home, margin: Margin::Runs(1) }
    );
    second.total_runs = 140;
    assert_eq!(derive_result(&first, &second, TeamSide::Away), MatchOutcome::Tied);
}

#[test]
fn test_available_bowlers_and_selection_errors() {
    let m = first_innings_started();
    assert_eq!(m.available_bowlers().unwrap().len(), 11);

    let m = bowl(&m, &[Outcome::DOT; 6]);
    let innings = m.innings().unwrap();
    let last = innings.last_over_bowler.clone().unwrap();
    let options = m.available_bowlers().unwrap();
    assert_eq!(options.len(), 10);
    assert!(!options.contains(&last));

    assert!(matches!(
        m.select_bowler(&last),
        Err(MatchError::Selection(SelectionError::BowlerIneligible { .. }))
    ));
    assert!(matches!(
        m.select_bowler("a3"),
        Err(MatchError::Selection(SelectionError::BowlerNotInXi(_)))
    ));
}

#[test]
fn test_impact_player_rules_in_match() {
    let m = first_innings_started();
    // a0 is at the crease.
    assert_eq!(
        m.use_impact_player(TeamSide::Home, "ar0", "a0").unwrap_err(),
        MatchError::Selection(SelectionError::ReplacedPlayerActive("a0".into()))
    );

    let m = m.use_impact_player(TeamSide::Home, "ar0", "a9").unwrap();
    assert!(m.home.in_xi("ar0"));
    assert!(m.home.impact_player_used);
    assert_eq!(
        m.use_impact_player(TeamSide::Home, "ar1", "a8").unwrap_err(),
        MatchError::Selection(SelectionError::ImpactPlayerAlreadyUsed)
    );
    // The other side still has its own substitution.
    assert!(m.use_impact_player(TeamSide::Away, "br0", "b2").is_ok());
}

#[test]
fn test_counters_follow_players_across_innings() {
    let m = bowl(&first_innings_started(), &script(120, &[19, 39, 59, 79, 99, 119], 46));
    let m = m.start_second_innings("b0", "b1").unwrap();
    let m = bowl(&m, &script(10, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], 0));

    let players = m.all_players_latest();
    assert_eq!(players.len(), 22);
    let bat_runs: u32 = players.iter().map(|p| p.stats.runs).sum();
    assert_eq!(bat_runs, 160);
    let wickets: u32 = players.iter().map(|p| p.stats.wickets).sum();
    assert_eq!(wickets, 16);
    // Alpha's records carry their second-innings bowling.
    let a10 = players.iter().find(|p| p.id == "a10").unwrap();
    assert!(a10.stats.has_bowled());
}

#[test]
fn test_seeded_matches_are_reproducible() {
    let driver = AutoDriver::default();
    let m = Match::new(team("a", "Alpha"), team("b", "Bravo"), 20).unwrap();
    let play = |seed| driver.play_match(&m, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

    let (x, y) = (play(99), play(99));
    assert_eq!(x.status, MatchStatus::Completed);
    assert_eq!(x.result, y.result);
    assert_eq!(x.first_innings, y.first_innings);
    assert_eq!(x.second_innings, y.second_innings);
    assert!(x.result.is_some());
}
