//! Randomised sample requests for trying the engine without real squads.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use cricket_core::api::{ConditionsData, MatchRequest, PlayerData, TeamData, SCHEMA_VERSION};
use cricket_core::models::PlayerRole;
use cricket_core::{Pitch, Weather};

const SURNAMES: &[&str] = &[
    "Ahmed", "Bell", "Carter", "Das", "Evans", "Fernando", "Gill", "Hussain", "Iyer", "Jones",
    "Khan", "Lewis", "Mills", "Nair", "Owen", "Patel", "Quinn", "Rao", "Shah", "Taylor",
    "Usman", "Vaughan", "Wood", "Young",
];

/// Batting order template: openers, middle order, all-rounders, bowlers.
fn role_for(slot: usize) -> PlayerRole {
    match slot {
        0..=3 => PlayerRole::Batsman,
        4 => PlayerRole::WicketKeeper,
        5..=6 => PlayerRole::AllRounder,
        _ => PlayerRole::Bowler,
    }
}

fn skills<R: Rng + ?Sized>(role: PlayerRole, rng: &mut R) -> (u8, u8) {
    match role {
        PlayerRole::Batsman => (rng.gen_range(65..=90), rng.gen_range(10..=35)),
        PlayerRole::WicketKeeper => (rng.gen_range(55..=80), rng.gen_range(5..=15)),
        PlayerRole::AllRounder => (rng.gen_range(50..=75), rng.gen_range(50..=75)),
        PlayerRole::Bowler => (rng.gen_range(15..=40), rng.gen_range(65..=90)),
    }
}

fn player<R: Rng + ?Sized>(id: String, role: PlayerRole, overseas: bool, rng: &mut R) -> PlayerData {
    let (batting, bowling) = skills(role, rng);
    let surname = SURNAMES.choose(rng).copied().unwrap_or("Smith");
    let initial = (b'A' + rng.gen_range(0..26u8)) as char;
    PlayerData {
        id,
        name: format!("{initial}. {surname}"),
        role,
        batting,
        bowling,
        overseas,
        history: None,
    }
}

fn team<R: Rng + ?Sized>(id: &str, name: &str, rng: &mut R) -> TeamData {
    let players = (0..11)
        .map(|slot| player(format!("{id}{slot}"), role_for(slot), slot % 3 == 0, rng))
        .collect();
    let impact_players = [PlayerRole::Batsman, PlayerRole::Bowler]
        .into_iter()
        .enumerate()
        .map(|(i, role)| player(format!("{id}r{i}"), role, false, rng))
        .collect();
    TeamData { id: id.to_string(), name: name.to_string(), players, impact_players }
}

pub fn sample_request(seed: u64, overs: Option<u32>) -> MatchRequest {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pitch = *[Pitch::Balanced, Pitch::Flat, Pitch::Green, Pitch::Dusty]
        .choose(&mut rng)
        .unwrap_or(&Pitch::Balanced);
    let weather = *[Weather::Clear, Weather::Overcast, Weather::Humid]
        .choose(&mut rng)
        .unwrap_or(&Weather::Clear);
    MatchRequest {
        schema_version: SCHEMA_VERSION,
        seed,
        overs,
        home_team: team("kng", "Kingsmead Gulls", &mut rng),
        away_team: team("wnd", "Wanderers Owls", &mut rng),
        conditions: Some(ConditionsData { pitch, weather }),
    }
}
