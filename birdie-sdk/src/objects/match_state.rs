//! Response types describing teams, players and match state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::court::{MatchStatus, Side, TeamSlot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    /// Court half the player currently stands on.
    pub position: Side,
    /// Whether the player is committed to an ongoing match.
    pub busy: bool,
}

/// A team with its two players in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: i64,
    pub players: Vec<PlayerResponse>,
}

/// Score of one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResponse {
    /// 1-based sequence number within the match.
    pub number: u8,
    pub points_a: u32,
    pub points_b: u32,
}

/// Full match state as returned by every match operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub id: Uuid,
    pub date: time::Date,
    pub team_a: TeamResponse,
    pub team_b: TeamResponse,
    /// Sets ordered by sequence number.
    pub sets: Vec<SetResponse>,
    pub serving_team: Option<TeamSlot>,
    pub serve_side: Side,
    pub winning_team: Option<TeamSlot>,
    pub status: MatchStatus,
}

impl MatchResponse {
    /// The set currently being played (highest sequence number).
    pub fn current_set(&self) -> Option<&SetResponse> {
        self.sets.iter().max_by_key(|s| s.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRecommendation {
    pub break_recommended: bool,
}
