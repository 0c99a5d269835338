//! Man-of-the-match scoring.

use crate::models::player::{Player, PlayerId};

/// Weighted impact of one player's match.
///
/// Batting: 1.5 per run, 2 per four, 4 per six, 10 bonus above a strike
/// rate of 150. Bowling: 25 per wicket, 10 per maiden, 15 bonus below an
/// economy of 6 and a further 10 below 5.
pub fn impact_score(player: &Player) -> f64 {
    let s = &player.stats;
    let mut score = s.runs as f64 * 1.5 + s.fours as f64 * 2.0 + s.sixes as f64 * 4.0;
    if s.strike_rate().is_some_and(|sr| sr > 150.0) {
        score += 10.0;
    }

    score += s.wickets as f64 * 25.0 + s.maidens as f64 * 10.0;
    if let Some(economy) = s.economy() {
        if economy < 6.0 {
            score += 15.0;
        }
        if economy < 5.0 {
            score += 10.0;
        }
    }
    score
}

/// Highest impact score; the earlier player wins a tie.
pub fn man_of_the_match(players: &[Player]) -> Option<PlayerId> {
    let mut best: Option<(&Player, f64)> = None;
    for player in players {
        let score = impact_score(player);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((player, score));
        }
    }
    best.map(|(player, _)| player.id.clone())
}
