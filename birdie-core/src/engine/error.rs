use itertools::Itertools;
use thiserror::Error;

/// A player that is already committed to an ongoing match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailablePlayer {
    pub id: i64,
    pub name: String,
}

impl std::fmt::Display for UnavailablePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("players already in an ongoing match: {}", format_players(.0))]
    PlayerUnavailable(Vec<UnavailablePlayer>),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

fn format_players(players: &[UnavailablePlayer]) -> String {
    players.iter().join(", ")
}
