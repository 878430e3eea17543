use itertools::Itertools;
use kanau::processor::Processor;

use crate::engine::{Player, Team};
use crate::entities::Side;
use crate::entities::players::{GetPlayersOfTeams, PlayerRecord};
use crate::framework::DatabaseProcessor;

/// Group player rows under their teams, keeping `team_ids` order and putting
/// each team's players in slot order.
pub fn assemble_teams(team_ids: &[i64], players: Vec<PlayerRecord>) -> Vec<Team> {
    let mut by_team = players.into_iter().into_group_map_by(|p| p.team_id);
    team_ids
        .iter()
        .map(|&id| {
            let players = by_team
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .sorted_by_key(|p| p.slot)
                .map(Player::from)
                .collect();
            Team { id, players }
        })
        .collect()
}

#[derive(Debug, Clone)]
/// Create a team and its players in one statement. Slot 0 starts on the
/// right, slot 1 on the left, both idle.
pub struct CreateTeam {
    pub player_names: Vec<String>,
}

impl Processor<CreateTeam> for DatabaseProcessor {
    type Output = Team;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateTeam")]
    async fn process(&self, cmd: CreateTeam) -> Result<Team, sqlx::Error> {
        let slots: Vec<i16> = (0..cmd.player_names.len()).map(|s| s as i16).collect();
        let positions: Vec<Side> = (0..cmd.player_names.len())
            .map(Team::initial_position)
            .collect();

        let records = sqlx::query_as::<_, PlayerRecord>(
            r#"
            WITH team AS (INSERT INTO teams DEFAULT VALUES RETURNING id)
            INSERT INTO players (team_id, slot, name, position, busy)
            SELECT team.id, p.slot, p.name, p.position, false
            FROM team, UNNEST($1::smallint[], $2::text[], $3::court_side[]) AS p(slot, name, position)
            RETURNING id, team_id, slot, name, position, busy
            "#,
        )
        .bind(slots)
        .bind(cmd.player_names)
        .bind(positions)
        .fetch_all(&self.pool)
        .await?;

        let team_id = records
            .first()
            .map(|p| p.team_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        let players = records
            .into_iter()
            .sorted_by_key(|p| p.slot)
            .map(Player::from)
            .collect();
        Ok(Team {
            id: team_id,
            players,
        })
    }
}

#[derive(Debug, Clone)]
/// Load the given teams with their players. Unknown ids are skipped.
pub struct GetTeams {
    pub team_ids: Vec<i64>,
}

impl Processor<GetTeams> for DatabaseProcessor {
    type Output = Vec<Team>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetTeams")]
    async fn process(&self, query: GetTeams) -> Result<Vec<Team>, sqlx::Error> {
        let existing: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM teams WHERE id = ANY($1) ORDER BY id")
                .bind(&query.team_ids)
                .fetch_all(&self.pool)
                .await?;
        let players = self
            .process(GetPlayersOfTeams {
                team_ids: existing.clone(),
            })
            .await?;
        Ok(assemble_teams(&existing, players))
    }
}

#[derive(Debug, Clone)]
pub struct ListTeams;

impl Processor<ListTeams> for DatabaseProcessor {
    type Output = Vec<Team>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListTeams")]
    async fn process(&self, _query: ListTeams) -> Result<Vec<Team>, sqlx::Error> {
        let team_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let players = self
            .process(GetPlayersOfTeams {
                team_ids: team_ids.clone(),
            })
            .await?;
        Ok(assemble_teams(&team_ids, players))
    }
}

#[derive(Debug, Clone)]
/// Whether any match, in any status, references the team.
pub struct TeamHasMatches {
    pub team_id: i64,
}

impl Processor<TeamHasMatches> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:TeamHasMatches")]
    async fn process(&self, query: TeamHasMatches) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM matches WHERE team_a_id = $1 OR team_b_id = $1)",
        )
        .bind(query.team_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[derive(Debug, Clone)]
/// Delete a team; its players go with it. Returns false if no such team.
pub struct DeleteTeam {
    pub team_id: i64,
}

impl Processor<DeleteTeam> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteTeam")]
    async fn process(&self, cmd: DeleteTeam) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(cmd.team_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
