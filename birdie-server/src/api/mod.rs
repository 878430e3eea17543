//! HTTP API, nested under `/api/v1`.
//!
//! # Endpoints
//!
//! - `GET    /teams`, `POST /teams`, `GET|DELETE /teams/{team_id}`
//! - `GET    /players`, `GET /players/{player_id}`
//! - `GET    /matches`, `POST /matches`, `GET|DELETE /matches/{match_id}`
//! - `POST   /matches/{match_id}/points` – award a point
//! - `POST   /matches/{match_id}/undo`   – take a point back
//! - `POST   /matches/{match_id}/abort`  – forfeit
//! - `PUT    /matches/{match_id}/serve-side`
//! - `GET    /matches/{match_id}/break`
//! - `GET    /matches/{match_id}/sets`, `GET /matches/{match_id}/sets/{number}`

pub mod error;
pub mod extractors;
mod matches;
mod teams;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/{team_id}",
            get(teams::get_team).delete(teams::delete_team),
        )
        .route("/players", get(teams::list_players))
        .route("/players/{player_id}", get(teams::get_player))
        .route(
            "/matches",
            get(matches::list_matches).post(matches::start_match),
        )
        .route(
            "/matches/{match_id}",
            get(matches::get_match).delete(matches::delete_match),
        )
        .route("/matches/{match_id}/points", post(matches::award_point))
        .route("/matches/{match_id}/undo", post(matches::undo_point))
        .route("/matches/{match_id}/abort", post(matches::abort_match))
        .route(
            "/matches/{match_id}/serve-side",
            put(matches::set_serve_side),
        )
        .route(
            "/matches/{match_id}/break",
            get(matches::break_recommendation),
        )
        .route("/matches/{match_id}/sets", get(matches::list_sets))
        .route("/matches/{match_id}/sets/{number}", get(matches::get_set))
}
