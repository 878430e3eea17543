use kanau::processor::Processor;

use crate::engine::Player;
use crate::entities::Side;
use crate::framework::DatabaseProcessor;

const PLAYER_COLUMNS: &str = "id, team_id, slot, name, position, busy";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayerRecord {
    pub id: i64,
    pub team_id: i64,
    /// 0 or 1, the player's place in the team.
    pub slot: i16,
    pub name: String,
    pub position: Side,
    pub busy: bool,
}

impl From<PlayerRecord> for Player {
    fn from(record: PlayerRecord) -> Self {
        Player {
            id: record.id,
            team_id: record.team_id,
            name: record.name,
            position: record.position,
            busy: record.busy,
        }
    }
}

/// Players of the given teams ordered by id. With `lock` the rows are taken
/// `FOR UPDATE`; the id ordering keeps concurrent lockers from deadlocking.
pub(crate) async fn select_players_of_teams(
    conn: &mut sqlx::PgConnection,
    team_ids: &[i64],
    lock: bool,
) -> Result<Vec<PlayerRecord>, sqlx::Error> {
    if team_ids.is_empty() {
        return Ok(Vec::new());
    }
    let lock = if lock { " FOR UPDATE" } else { "" };
    let sql =
        format!("SELECT {PLAYER_COLUMNS} FROM players WHERE team_id = ANY($1) ORDER BY id{lock}");
    sqlx::query_as::<_, PlayerRecord>(&sql)
        .bind(team_ids)
        .fetch_all(conn)
        .await
}

#[derive(Debug, Clone)]
pub struct GetPlayerById {
    pub player_id: i64,
}

impl Processor<GetPlayerById> for DatabaseProcessor {
    type Output = Option<PlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPlayerById")]
    async fn process(&self, query: GetPlayerById) -> Result<Option<PlayerRecord>, sqlx::Error> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1");
        let player = sqlx::query_as::<_, PlayerRecord>(&sql)
            .bind(query.player_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(player)
    }
}

#[derive(Debug, Clone)]
pub struct ListPlayers;

impl Processor<ListPlayers> for DatabaseProcessor {
    type Output = Vec<PlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListPlayers")]
    async fn process(&self, _query: ListPlayers) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY team_id, slot");
        let players = sqlx::query_as::<_, PlayerRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(players)
    }
}

#[derive(Debug, Clone)]
/// Players of the given teams, ordered by id.
pub struct GetPlayersOfTeams {
    pub team_ids: Vec<i64>,
}

impl Processor<GetPlayersOfTeams> for DatabaseProcessor {
    type Output = Vec<PlayerRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPlayersOfTeams")]
    async fn process(&self, query: GetPlayersOfTeams) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        select_players_of_teams(&mut *conn, &query.team_ids, false).await
    }
}

/// Court position and busy flag of one player, as written back after an
/// engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub id: i64,
    pub position: Side,
    pub busy: bool,
}

impl From<&Player> for PlayerState {
    fn from(player: &Player) -> Self {
        PlayerState {
            id: player.id,
            position: player.position,
            busy: player.busy,
        }
    }
}

impl PlayerRecord {
    /// Lock the players of the given teams for the rest of the transaction.
    #[tracing::instrument(skip_all, err, name = "SQL:LockPlayersOfTeams")]
    pub async fn lock_for_teams_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_ids: &[i64],
    ) -> Result<Vec<PlayerRecord>, sqlx::Error> {
        select_players_of_teams(&mut **tx, team_ids, true).await
    }

    /// Write positions and busy flags of several players in a single query.
    /// Returns the number of rows updated.
    #[tracing::instrument(skip_all, err, name = "SQL:UpdatePlayerStates")]
    pub async fn update_states_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        players: &[PlayerState],
    ) -> Result<u64, sqlx::Error> {
        if players.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = players.iter().map(|p| p.id).collect();
        let positions: Vec<Side> = players.iter().map(|p| p.position).collect();
        let busy: Vec<bool> = players.iter().map(|p| p.busy).collect();

        let result = sqlx::query(
            r#"
            UPDATE players AS p
            SET position = u.position, busy = u.busy
            FROM UNNEST($1::bigint[], $2::court_side[], $3::boolean[]) AS u(id, position, busy)
            WHERE p.id = u.id
            "#,
        )
        .bind(ids)
        .bind(positions)
        .bind(busy)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
