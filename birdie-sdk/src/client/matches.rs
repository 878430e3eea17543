//! Match client: start a match, score it, and read it back.

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::{ClientError, check_status, parse_response};
use crate::objects::{
    AbortRequest, BreakRecommendation, MatchResponse, PointRequest, ServeSideRequest,
    SetResponse, Side, StartMatchRequest, TeamSlot,
};

/// Typed HTTP client for the match endpoints.
///
/// Every scoring call returns the full updated match, so a scoreboard can
/// redraw from the response without a second request.
#[derive(Debug, Clone)]
pub struct MatchClient {
    http: Client,
    base_url: Url,
}

impl MatchClient {
    /// * `base_url` – root URL of the Birdie server (e.g. `http://localhost:8080`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn match_url(&self, match_id: Uuid, suffix: &str) -> Result<Url, ClientError> {
        Ok(self
            .base_url
            .join(&format!("/api/v1/matches/{match_id}{suffix}"))?)
    }

    /// `POST /api/v1/matches` – start a new match between two idle teams.
    pub async fn start_match(
        &self,
        request: &StartMatchRequest,
    ) -> Result<MatchResponse, ClientError> {
        let url = self.base_url.join("/api/v1/matches")?;
        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/matches`
    pub async fn list_matches(&self) -> Result<Vec<MatchResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/matches")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/matches/{id}`
    pub async fn get_match(&self, match_id: Uuid) -> Result<MatchResponse, ClientError> {
        let resp = self.http.get(self.match_url(match_id, "")?).send().await?;
        parse_response(resp).await
    }

    /// `DELETE /api/v1/matches/{id}`
    pub async fn delete_match(&self, match_id: Uuid) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.match_url(match_id, "")?)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// `POST /api/v1/matches/{id}/points`
    pub async fn award_point(
        &self,
        match_id: Uuid,
        team: TeamSlot,
    ) -> Result<MatchResponse, ClientError> {
        let resp = self
            .http
            .post(self.match_url(match_id, "/points")?)
            .json(&PointRequest { team })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/matches/{id}/undo`
    pub async fn undo_point(
        &self,
        match_id: Uuid,
        team: TeamSlot,
    ) -> Result<MatchResponse, ClientError> {
        let resp = self
            .http
            .post(self.match_url(match_id, "/undo")?)
            .json(&PointRequest { team })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/matches/{id}/abort`
    pub async fn abort_match(
        &self,
        match_id: Uuid,
        forfeiting_team: TeamSlot,
    ) -> Result<MatchResponse, ClientError> {
        let resp = self
            .http
            .post(self.match_url(match_id, "/abort")?)
            .json(&AbortRequest { forfeiting_team })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PUT /api/v1/matches/{id}/serve-side`
    pub async fn set_serve_side(
        &self,
        match_id: Uuid,
        side: Side,
    ) -> Result<MatchResponse, ClientError> {
        let resp = self
            .http
            .put(self.match_url(match_id, "/serve-side")?)
            .json(&ServeSideRequest { side })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/matches/{id}/break`
    pub async fn is_break_recommended(&self, match_id: Uuid) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(self.match_url(match_id, "/break")?)
            .send()
            .await?;
        let rec: BreakRecommendation = parse_response(resp).await?;
        Ok(rec.break_recommended)
    }

    /// `GET /api/v1/matches/{id}/sets`
    pub async fn list_sets(&self, match_id: Uuid) -> Result<Vec<SetResponse>, ClientError> {
        let resp = self
            .http
            .get(self.match_url(match_id, "/sets")?)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/matches/{id}/sets/{number}`
    pub async fn get_set(&self, match_id: Uuid, number: u8) -> Result<SetResponse, ClientError> {
        let resp = self
            .http
            .get(self.match_url(match_id, &format!("/sets/{number}"))?)
            .send()
            .await?;
        parse_response(resp).await
    }
}
