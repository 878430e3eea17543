//! Team and player client.

use reqwest::Client;
use url::Url;

use super::{ClientError, check_status, parse_response};
use crate::objects::{CreateTeamRequest, NewPlayer, PlayerResponse, TeamResponse};

/// Typed HTTP client for the team and player endpoints.
#[derive(Debug, Clone)]
pub struct TeamClient {
    http: Client,
    base_url: Url,
}

impl TeamClient {
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

    /// `POST /api/v1/teams` – create a team of two players.
    pub async fn create_team(
        &self,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Result<TeamResponse, ClientError> {
        let url = self.base_url.join("/api/v1/teams")?;
        let body = CreateTeamRequest {
            players: vec![
                NewPlayer { name: first.into() },
                NewPlayer {
                    name: second.into(),
                },
            ],
        };
        let resp = self.http.post(url).json(&body).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/teams`
    pub async fn list_teams(&self) -> Result<Vec<TeamResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/teams")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/teams/{id}`
    pub async fn get_team(&self, team_id: i64) -> Result<TeamResponse, ClientError> {
        let url = self.base_url.join(&format!("/api/v1/teams/{team_id}"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `DELETE /api/v1/teams/{id}`
    pub async fn delete_team(&self, team_id: i64) -> Result<(), ClientError> {
        let url = self.base_url.join(&format!("/api/v1/teams/{team_id}"))?;
        let resp = self.http.delete(url).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// `GET /api/v1/players`
    pub async fn list_players(&self) -> Result<Vec<PlayerResponse>, ClientError> {
        let url = self.base_url.join("/api/v1/players")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/players/{id}`
    pub async fn get_player(&self, player_id: i64) -> Result<PlayerResponse, ClientError> {
        let url = self.base_url.join(&format!("/api/v1/players/{player_id}"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}
