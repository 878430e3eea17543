pub mod matches;
pub mod players;
pub mod sets;
pub mod teams;

use birdie_sdk::objects::{MatchStatus as SdkMatchStatus, Side as SdkSide};

/// Court half for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `birdie_sdk::objects::Side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE", type_name = "court_side")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn invert(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SdkSide::from(*self).fmt(f)
    }
}

impl From<Side> for SdkSide {
    fn from(value: Side) -> Self {
        match value {
            Side::Left => SdkSide::Left,
            Side::Right => SdkSide::Right,
        }
    }
}

impl From<SdkSide> for Side {
    fn from(value: SdkSide) -> Self {
        match value {
            SdkSide::Left => Side::Left,
            SdkSide::Right => Side::Right,
        }
    }
}

/// Match status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `birdie_sdk::objects::MatchStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE", type_name = "match_status")]
pub enum MatchStatus {
    Ongoing,
    Finished,
    Forfeited,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        SdkMatchStatus::from(*self).fmt(f)
    }
}

impl From<MatchStatus> for SdkMatchStatus {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Ongoing => SdkMatchStatus::Ongoing,
            MatchStatus::Finished => SdkMatchStatus::Finished,
            MatchStatus::Forfeited => SdkMatchStatus::Forfeited,
        }
    }
}

impl From<SdkMatchStatus> for MatchStatus {
    fn from(value: SdkMatchStatus) -> Self {
        match value {
            SdkMatchStatus::Ongoing => MatchStatus::Ongoing,
            SdkMatchStatus::Finished => MatchStatus::Finished,
            SdkMatchStatus::Forfeited => MatchStatus::Forfeited,
        }
    }
}
