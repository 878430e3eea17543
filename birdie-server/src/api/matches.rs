//! Match endpoints. Every mutating endpoint answers with the full match state.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use birdie_core::engine::{Match, TeamSlot};
use birdie_sdk::objects::{
    AbortRequest, BreakRecommendation, MatchResponse, PointRequest, ServeSideRequest, SetResponse,
    StartMatchRequest,
};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

fn to_response(m: &Match) -> Result<Json<MatchResponse>, ApiError> {
    Ok(Json(MatchResponse::try_from(m)?))
}

/// `GET /matches` — newest first.
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchResponse>>, ApiError> {
    let matches = state.matches.list_matches().await?;
    let responses = matches
        .iter()
        .map(MatchResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(responses))
}

/// `POST /matches` — start a match between two idle teams.
pub async fn start_match(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StartMatchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let m = state
        .matches
        .start_match(
            payload.team_a_id,
            payload.team_b_id,
            TeamSlot::from_is_a(payload.serve_team_is_a),
            payload.start_side.into(),
        )
        .await?;
    Ok((StatusCode::CREATED, to_response(&m)?))
}

/// `GET /matches/{match_id}`
pub async fn get_match(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
) -> Result<Json<MatchResponse>, ApiError> {
    let m = state.matches.get_match(match_id).await?;
    to_response(&m)
}

/// `DELETE /matches/{match_id}`
pub async fn delete_match(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.matches.delete_match(match_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /matches/{match_id}/points`
pub async fn award_point(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PointRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let m = state.matches.award_point(match_id, payload.team).await?;
    to_response(&m)
}

/// `POST /matches/{match_id}/undo`
pub async fn undo_point(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PointRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let m = state.matches.undo_last_point(match_id, payload.team).await?;
    to_response(&m)
}

/// `POST /matches/{match_id}/abort`
pub async fn abort_match(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AbortRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let m = state
        .matches
        .abort_match(match_id, payload.forfeiting_team)
        .await?;
    to_response(&m)
}

/// `PUT /matches/{match_id}/serve-side`
pub async fn set_serve_side(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ServeSideRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let m = state
        .matches
        .override_serve_side(match_id, payload.side.into())
        .await?;
    to_response(&m)
}

/// `GET /matches/{match_id}/break`
pub async fn break_recommendation(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
) -> Result<Json<BreakRecommendation>, ApiError> {
    let break_recommended = state.matches.is_break_recommended(match_id).await?;
    Ok(Json(BreakRecommendation { break_recommended }))
}

/// `GET /matches/{match_id}/sets`
pub async fn list_sets(
    State(state): State<AppState>,
    ApiPath(match_id): ApiPath<Uuid>,
) -> Result<Json<Vec<SetResponse>>, ApiError> {
    let sets = state.matches.list_sets(match_id).await?;
    Ok(Json(sets.iter().map(SetResponse::from).collect()))
}

/// `GET /matches/{match_id}/sets/{number}`
pub async fn get_set(
    State(state): State<AppState>,
    ApiPath((match_id, number)): ApiPath<(Uuid, u8)>,
) -> Result<Json<SetResponse>, ApiError> {
    let set = state.matches.get_set(match_id, number).await?;
    Ok(Json(SetResponse::from(&set)))
}
