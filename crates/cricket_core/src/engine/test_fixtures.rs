//! Shared builders for engine tests.

use crate::models::ball::Outcome;
use crate::models::innings::{Innings, InningsState};
use crate::models::player::Player;
use crate::models::team_setup::TeamSetup;

/// Eleven players `{prefix}0..{prefix}10`. Batting skill falls and bowling
/// skill rises down the order.
pub fn squad(prefix: &str) -> Vec<Player> {
    (0..11u8)
        .map(|i| {
            Player::new(
                format!("{prefix}{i}"),
                format!("{} {}", prefix.to_uppercase(), i),
                80 - i * 5,
                20 + i * 6,
            )
        })
        .collect()
}

pub fn team(id: &str, name: &str) -> TeamSetup {
    let reserves = vec![
        Player::new(format!("{id}r0"), format!("{name} Reserve 0"), 60, 60),
        Player::new(format!("{id}r1"), format!("{name} Reserve 1"), 50, 70).overseas(),
    ];
    TeamSetup {
        team_id: id.to_string(),
        name: name.to_string(),
        playing_xi: squad(id),
        impact_players: reserves,
        impact_player_used: false,
        substitution: None,
    }
}

/// Innings of `overs` overs between squads "a" (batting) and "b", openers in
/// and the first bowler chosen.
pub fn started_innings(overs: u32, target: Option<u32>) -> Innings {
    let number = if target.is_some() { 2 } else { 1 };
    Innings::new(number, "a", "b", overs, target)
        .select_openers(&squad("a"), "a0", "a1")
        .and_then(|i| i.select_bowler(&squad("b"), "b10"))
        .unwrap()
}

/// Fill whatever the innings is waiting for: the next unused batsman, or
/// the first eligible bowler from the end of the order.
pub fn fill_vacancies(innings: &Innings) -> Innings {
    let mut current = innings.clone();
    loop {
        match current.state() {
            InningsState::AwaitingBatsman => {
                let id = squad("a")
                    .into_iter()
                    .find(|p| current.batsman(&p.id).is_none())
                    .map(|p| p.id)
                    .unwrap();
                current = current.select_batsman(&squad("a"), &id).unwrap();
            }
            InningsState::OverBreak | InningsState::AwaitingBowler if current.current_bowler.is_none() => {
                let bowlers = squad("b");
                let next = bowlers
                    .iter()
                    .rev()
                    .find_map(|p| current.select_bowler(&bowlers, &p.id).ok())
                    .unwrap();
                current = next;
            }
            _ => return current,
        }
    }
}

/// Apply `outcomes` in order, filling vacancies between deliveries.
pub fn play(innings: &Innings, outcomes: &[Outcome]) -> Innings {
    let mut current = innings.clone();
    for outcome in outcomes {
        current = fill_vacancies(&current);
        current = current.apply_outcome(*outcome).unwrap().0;
    }
    current
}
