//! Court enumerations and their stable string tokens.
//!
//! These tokens are part of the public contract with external viewers and
//! must never change spelling.

use serde::{Deserialize, Serialize};

/// A half of one team's court: service side or player position.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `birdie-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "LEFT"),
            Side::Right => write!(f, "RIGHT"),
        }
    }
}

/// Match lifecycle status.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `birdie-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    Ongoing,
    Finished,
    Forfeited,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Ongoing => write!(f, "ONGOING"),
            MatchStatus::Finished => write!(f, "FINISHED"),
            MatchStatus::Forfeited => write!(f, "FORFEITED"),
        }
    }
}

/// Which of the two teams of a match is meant.
///
/// Team A is the first team given at match start, team B the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSlot {
    A,
    B,
}

impl TeamSlot {
    pub fn from_is_a(is_a: bool) -> Self {
        if is_a { TeamSlot::A } else { TeamSlot::B }
    }

    pub fn is_a(self) -> bool {
        self == TeamSlot::A
    }

    /// The other team of the match.
    pub fn opponent(self) -> Self {
        match self {
            TeamSlot::A => TeamSlot::B,
            TeamSlot::B => TeamSlot::A,
        }
    }

    /// Position of this team in a match's ordered team list.
    pub fn index(self) -> usize {
        match self {
            TeamSlot::A => 0,
            TeamSlot::B => 1,
        }
    }
}

impl std::fmt::Display for TeamSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSlot::A => write!(f, "A"),
            TeamSlot::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_stable() {
        assert_eq!(serde_json::to_string(&Side::Left).unwrap(), r#""LEFT""#);
        assert_eq!(serde_json::to_string(&Side::Right).unwrap(), r#""RIGHT""#);
        assert_eq!(
            serde_json::to_string(&MatchStatus::Forfeited).unwrap(),
            r#""FORFEITED""#
        );
        assert_eq!(serde_json::to_string(&TeamSlot::B).unwrap(), r#""B""#);

        let status: MatchStatus = serde_json::from_str(r#""ONGOING""#).unwrap();
        assert_eq!(status, MatchStatus::Ongoing);
    }

    #[test]
    fn test_display_matches_serde_token() {
        for side in [Side::Left, Side::Right] {
            let json = serde_json::to_string(&side).unwrap();
            assert_eq!(json.trim_matches('"'), side.to_string());
        }
        for status in [
            MatchStatus::Ongoing,
            MatchStatus::Finished,
            MatchStatus::Forfeited,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json.trim_matches('"'), status.to_string());
        }
    }

    #[test]
    fn test_lowercase_tokens_are_rejected() {
        assert!(serde_json::from_str::<Side>(r#""left""#).is_err());
        assert!(serde_json::from_str::<TeamSlot>(r#""C""#).is_err());
    }

    #[test]
    fn test_team_slot_helpers() {
        assert_eq!(TeamSlot::from_is_a(true), TeamSlot::A);
        assert_eq!(TeamSlot::from_is_a(false), TeamSlot::B);
        assert_eq!(TeamSlot::A.opponent(), TeamSlot::B);
        assert_eq!(TeamSlot::B.index(), 1);
        assert!(!TeamSlot::B.is_a());
    }
}
