pub mod court;
pub mod match_state;
pub mod requests;

pub use court::{MatchStatus, Side, TeamSlot};
pub use match_state::{
    BreakRecommendation, MatchResponse, PlayerResponse, SetResponse, TeamResponse,
};
pub use requests::{
    AbortRequest, CreateTeamRequest, ErrorBody, NewPlayer, PointRequest, ServeSideRequest,
    StartMatchRequest,
};
