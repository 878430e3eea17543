//! Request bodies accepted by the match API.

use serde::{Deserialize, Serialize};

use super::court::{Side, TeamSlot};

/// A player to create as part of a new team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
}

/// Request body for creating a team.
///
/// Exactly two players are required. The first one starts on the right,
/// the second one on the left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub players: Vec<NewPlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartMatchRequest {
    pub team_a_id: i64,
    pub team_b_id: i64,
    /// `true` if team A has the first serve.
    pub serve_team_is_a: bool,
    pub start_side: Side,
}

/// Names the team a point is awarded to (or taken from, for undo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRequest {
    pub team: TeamSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortRequest {
    pub forfeiting_team: TeamSlot,
}

/// Manual correction of the serve side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeSideRequest {
    pub side: Side,
}

/// JSON error body returned by the API on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
