//! Team and player endpoints.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use birdie_sdk::objects::{CreateTeamRequest, PlayerResponse, TeamResponse};

use crate::api::error::ApiError;
use crate::api::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

/// `GET /teams`
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state.matches.list_teams().await?;
    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// `POST /teams` — create a team with two named players.
pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let names = payload.players.into_iter().map(|p| p.name).collect();
    let team = state.matches.create_team(names).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// `GET /teams/{team_id}`
pub async fn get_team(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.matches.get_team(team_id).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// `DELETE /teams/{team_id}` — only teams that never played can be deleted.
pub async fn delete_team(
    State(state): State<AppState>,
    ApiPath(team_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.matches.delete_team(team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /players`
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    let players = state.matches.list_players().await?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}

/// `GET /players/{player_id}`
pub async fn get_player(
    State(state): State<AppState>,
    ApiPath(player_id): ApiPath<i64>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = state.matches.get_player(player_id).await?;
    Ok(Json(PlayerResponse::from(&player)))
}
