//! Team setup: the playing XI and impact reserves for one match.
//!
//! A setup is read-only during the match except for the single, irreversible
//! impact-player substitution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::player::{Player, PlayerId};
use crate::error::{SelectionError, SetupError};

pub const PLAYING_XI_SIZE: usize = 11;
pub const MAX_IMPACT_PLAYERS: usize = 4;
pub const MAX_OVERSEAS_IN_XI: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub player_in: PlayerId,
    pub player_out: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSetup {
    pub team_id: String,
    pub name: String,
    pub playing_xi: Vec<Player>,
    #[serde(default)]
    pub impact_players: Vec<Player>,
    #[serde(default)]
    pub impact_player_used: bool,
    #[serde(default)]
    pub substitution: Option<Substitution>,
}

impl TeamSetup {
    /// Validate and build a setup: exactly 11 in the XI, at most 4 reserves,
    /// unique ids and at most 4 overseas players in the XI.
    pub fn new(
        team_id: impl Into<String>,
        name: impl Into<String>,
        playing_xi: Vec<Player>,
        impact_players: Vec<Player>,
    ) -> Result<Self, SetupError> {
        let setup = Self {
            team_id: team_id.into(),
            name: name.into(),
            playing_xi,
            impact_players,
            impact_player_used: false,
            substitution: None,
        };
        setup.validate()?;
        Ok(setup)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.playing_xi.len() != PLAYING_XI_SIZE {
            return Err(SetupError::InvalidTeamSize {
                expected: PLAYING_XI_SIZE,
                found: self.playing_xi.len(),
            });
        }
        if self.impact_players.len() > MAX_IMPACT_PLAYERS {
            return Err(SetupError::TooManyReserves {
                found: self.impact_players.len(),
                max: MAX_IMPACT_PLAYERS,
            });
        }

        let mut seen = HashSet::new();
        for player in self.playing_xi.iter().chain(self.impact_players.iter()) {
            if !seen.insert(player.id.as_str()) {
                return Err(SetupError::DuplicatePlayer(player.id.clone()));
            }
        }

        let overseas = self.overseas_in_xi();
        if overseas > MAX_OVERSEAS_IN_XI {
            return Err(SetupError::OverseasLimitExceeded {
                count: overseas,
                max: MAX_OVERSEAS_IN_XI,
            });
        }
        Ok(())
    }

    pub fn overseas_in_xi(&self) -> usize {
        self.playing_xi.iter().filter(|p| p.is_overseas).count()
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.playing_xi.iter().find(|p| p.id == id)
    }

    pub fn in_xi(&self, id: &str) -> bool {
        self.player(id).is_some()
    }

    /// Copy of this setup with every per-match counter zeroed.
    pub fn fresh_for_match(&self) -> Self {
        let mut setup = self.clone();
        for player in setup.playing_xi.iter_mut().chain(setup.impact_players.iter_mut()) {
            player.reset_match_counters();
        }
        setup
    }

    /// Bring an impact reserve into the XI in place of `replace_id`.
    ///
    /// The replaced player leaves the XI for the rest of the match. Only one
    /// substitution is allowed per match.
    pub fn use_impact_player(
        &self,
        impact_id: &str,
        replace_id: &str,
    ) -> Result<TeamSetup, SelectionError> {
        if self.impact_player_used {
            return Err(SelectionError::ImpactPlayerAlreadyUsed);
        }
        let incoming = self
            .impact_players
            .iter()
            .find(|p| p.id == impact_id)
            .ok_or_else(|| SelectionError::ImpactPlayerNotFound(impact_id.to_string()))?;
        let slot = self
            .playing_xi
            .iter()
            .position(|p| p.id == replace_id)
            .ok_or_else(|| SelectionError::ReplacedPlayerNotInXi(replace_id.to_string()))?;

        let outgoing_overseas = usize::from(self.playing_xi[slot].is_overseas);
        let overseas = self.overseas_in_xi() - outgoing_overseas + usize::from(incoming.is_overseas);
        if overseas > MAX_OVERSEAS_IN_XI {
            return Err(SelectionError::OverseasLimitExceeded {
                count: overseas,
                max: MAX_OVERSEAS_IN_XI,
            });
        }

        let mut next = self.clone();
        next.playing_xi[slot] = incoming.clone();
        next.impact_players.retain(|p| p.id != impact_id);
        next.impact_player_used = true;
        next.substitution = Some(Substitution {
            player_in: impact_id.to_string(),
            player_out: replace_id.to_string(),
        });
        log::info!("{}: impact player {} replaces {}", self.name, impact_id, replace_id);
        Ok(next)
    }
}

/// Project the latest record for each player by id.
///
/// Keeps the order and membership of `base`; any player that also appears in
/// `latest` is replaced by that copy.
pub fn project_latest(base: &[Player], latest: &[Player]) -> Vec<Player> {
    base.iter()
        .map(|player| {
            latest
                .iter()
                .find(|candidate| candidate.id == player.id)
                .cloned()
                .unwrap_or_else(|| player.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squad(prefix: &str, overseas: usize) -> Vec<Player> {
        (0..PLAYING_XI_SIZE)
            .map(|i| {
                let p = Player::new(format!("{prefix}{i}"), format!("{prefix} {i}"), 60, 40);
                if i < overseas {
                    p.overseas()
                } else {
                    p
                }
            })
            .collect()
    }

    fn reserves(prefix: &str, overseas: bool) -> Vec<Player> {
        (0..2)
            .map(|i| {
                let p = Player::new(format!("{prefix}r{i}"), format!("Reserve {i}"), 55, 55);
                if overseas {
                    p.overseas()
                } else {
                    p
                }
            })
            .collect()
    }

    #[test]
    fn test_setup_validation() {
        assert!(TeamSetup::new("a", "A", squad("a", 4), reserves("a", false)).is_ok());

        let err = TeamSetup::new("a", "A", squad("a", 5), vec![]).unwrap_err();
        assert_eq!(err, SetupError::OverseasLimitExceeded { count: 5, max: 4 });

        let mut short = squad("a", 0);
        short.pop();
        let err = TeamSetup::new("a", "A", short, vec![]).unwrap_err();
        assert_eq!(err, SetupError::InvalidTeamSize { expected: 11, found: 10 });

        let mut dup = squad("a", 0);
        dup[3].id = "a0".into();
        assert_eq!(
            TeamSetup::new("a", "A", dup, vec![]).unwrap_err(),
            SetupError::DuplicatePlayer("a0".into())
        );
    }

    #[test]
    fn test_impact_substitution_is_single_use() {
        let setup = TeamSetup::new("a", "A", squad("a", 2), reserves("a", false)).unwrap();
        let after = setup.use_impact_player("ar0", "a5").unwrap();

        assert!(after.impact_player_used);
        assert!(after.in_xi("ar0"));
        assert!(!after.in_xi("a5"));
        assert_eq!(after.playing_xi.len(), PLAYING_XI_SIZE);
        assert_eq!(
            after.substitution,
            Some(Substitution { player_in: "ar0".into(), player_out: "a5".into() })
        );

        // Any further call is rejected, whatever the arguments.
        assert_eq!(
            after.use_impact_player("ar1", "a6"),
            Err(SelectionError::ImpactPlayerAlreadyUsed)
        );
        assert_eq!(
            after.use_impact_player("nobody", "nobody"),
            Err(SelectionError::ImpactPlayerAlreadyUsed)
        );
    }

    #[test]
    fn test_impact_overseas_limit() {
        let setup = TeamSetup::new("a", "A", squad("a", 4), reserves("a", true)).unwrap();
        // Replacing a local with an overseas reserve would make five.
        assert_eq!(
            setup.use_impact_player("ar0", "a8"),
            Err(SelectionError::OverseasLimitExceeded { count: 5, max: 4 })
        );
        // Replacing an overseas player keeps the count at four.
        assert!(setup.use_impact_player("ar0", "a1").is_ok());
    }

    #[test]
    fn test_impact_unknown_players() {
        let setup = TeamSetup::new("a", "A", squad("a", 0), reserves("a", false)).unwrap();
        assert_eq!(
            setup.use_impact_player("x", "a1"),
            Err(SelectionError::ImpactPlayerNotFound("x".into()))
        );
        assert_eq!(
            setup.use_impact_player("ar0", "zz"),
            Err(SelectionError::ReplacedPlayerNotInXi("zz".into()))
        );
        assert!(!setup.impact_player_used);
    }

    #[test]
    fn test_project_latest_by_id() {
        let base = squad("a", 0);
        let mut updated = base[2].clone();
        updated.stats.runs = 57;
        let stranger = Player::new("other", "Other", 10, 10);

        let projected = project_latest(&base, &[stranger, updated]);
        assert_eq!(projected.len(), base.len());
        assert_eq!(projected[2].stats.runs, 57);
        assert_eq!(projected[0], base[0]);
        assert!(projected.iter().all(|p| p.id != "other"));
    }
}
