//! Career statistics persisted after a match is decided.
//!
//! Runs strictly after completion and never feeds back into match state.
//! Each player is read, merged and written on its own, so one failing
//! record does not stop the rest.

pub mod career;
pub mod retry;
pub mod store;

pub use career::{BowlingFigures, CareerRecord};
pub use retry::{retry_with_backoff, retry_with_backoff_using, RetryError, RetryPolicy, Transient};
pub use store::{JsonFileStatsStore, MemoryStatsStore, StatsStore};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{MatchError, StoreError};
use crate::models::match_state::{Match, MatchStatus};
use crate::models::player::{Player, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistFailure {
    pub player_id: PlayerId,
    pub attempts: u32,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistReport {
    pub updated: Vec<PlayerId>,
    pub failed: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn upsert<S: StatsStore + ?Sized>(store: &mut S, player: &Player) -> Result<(), StoreError> {
    let mut record = store
        .load(&player.id)?
        .unwrap_or_else(|| CareerRecord::new(player.id.clone(), player.name.clone()));
    record.merge_match(player);
    store.save(&record)
}

/// Merge each player's match counters into their career record.
pub fn persist_match_stats<S: StatsStore + ?Sized>(
    store: &mut S,
    players: &[Player],
    policy: &RetryPolicy,
) -> PersistReport {
    persist_match_stats_using(store, players, policy, std::thread::sleep)
}

/// As [`persist_match_stats`] with an injectable sleep.
pub fn persist_match_stats_using<S, F>(
    store: &mut S,
    players: &[Player],
    policy: &RetryPolicy,
    mut sleep: F,
) -> PersistReport
where
    S: StatsStore + ?Sized,
    F: FnMut(Duration),
{
    let mut report = PersistReport::default();
    for player in players {
        match retry_with_backoff_using(policy, &mut sleep, |_| upsert(store, player)) {
            Ok(()) => report.updated.push(player.id.clone()),
            Err(err) => report.failed.push(PersistFailure {
                player_id: player.id.clone(),
                attempts: err.attempts,
                error: err.last.to_string(),
            }),
        }
    }
    log::info!(
        "Persisted career stats: {} updated, {} failed",
        report.updated.len(),
        report.failed.len()
    );
    report
}

/// Persist every player of a completed match, impact substitutes included.
pub fn persist_completed_match<S: StatsStore + ?Sized>(
    store: &mut S,
    m: &Match,
    policy: &RetryPolicy,
) -> Result<PersistReport, MatchError> {
    if m.status != MatchStatus::Completed {
        return Err(MatchError::WrongStatus(m.status));
    }
    Ok(persist_match_stats(store, &m.all_players_latest(), policy))
}

/// Every player of a completed match with the match folded into their
/// rolling form and history. Match counters are left as played.
pub fn updated_histories(m: &Match) -> Result<Vec<Player>, MatchError> {
    if m.status != MatchStatus::Completed {
        return Err(MatchError::WrongStatus(m.status));
    }
    Ok(m.all_players_latest()
        .into_iter()
        .map(|mut player| {
            let counters = player.stats.clone();
            player.history.record_match(&counters);
            player
        })
        .collect())
}
