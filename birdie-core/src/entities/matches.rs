use std::collections::HashMap;

use itertools::Itertools;
use kanau::processor::Processor;
use uuid::Uuid;

use crate::engine::{EngineError, GameSet, Match, TEAM_SIZE, TeamSlot};
use crate::entities::players::{
    GetPlayersOfTeams, PlayerRecord, PlayerState, select_players_of_teams,
};
use crate::entities::sets::{GetSetsOfMatches, SetRecord, select_sets_of_matches};
use crate::entities::teams::assemble_teams;
use crate::entities::{MatchStatus, Side};
use crate::framework::DatabaseProcessor;

const MATCH_COLUMNS: &str = "id, match_date, team_a_id, team_b_id, winning_team_id, \
    serving_team_id, serve_side, status";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MatchRecord {
    pub id: Uuid,
    pub match_date: time::Date,
    pub team_a_id: i64,
    pub team_b_id: i64,
    pub winning_team_id: Option<i64>,
    pub serving_team_id: Option<i64>,
    pub serve_side: Side,
    pub status: MatchStatus,
}

/// Everything stored for one match: its row, the players of both teams and
/// its sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRows {
    pub record: MatchRecord,
    pub players: Vec<PlayerRecord>,
    pub sets: Vec<SetRecord>,
}

impl MatchRows {
    /// Build the aggregate, rejecting rows no engine operation could have
    /// produced.
    pub fn into_match(self) -> Result<Match, EngineError> {
        let MatchRows {
            record,
            players,
            sets,
        } = self;

        let teams = assemble_teams(&[record.team_a_id, record.team_b_id], players);
        if let Some(team) = teams.iter().find(|t| t.players.len() != TEAM_SIZE) {
            return Err(EngineError::InvariantViolation(format!(
                "team {} of match {} has {} players",
                team.id,
                record.id,
                team.players.len()
            )));
        }

        let slot = |team_id: i64| {
            if team_id == record.team_a_id {
                Ok(TeamSlot::A)
            } else if team_id == record.team_b_id {
                Ok(TeamSlot::B)
            } else {
                Err(EngineError::InvariantViolation(format!(
                    "team {team_id} does not play in match {}",
                    record.id
                )))
            }
        };
        let serving_team = record.serving_team_id.map(slot).transpose()?;
        let winning_team = record.winning_team_id.map(slot).transpose()?;
        let sets = sets
            .into_iter()
            .map(GameSet::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Match {
            id: record.id,
            date: record.match_date,
            teams,
            sets,
            serving_team,
            serve_side: record.serve_side,
            winning_team,
            status: record.status,
        })
    }
}

/// Row, players and sets of one match. With `lock` the match row and the
/// players' rows are taken `FOR UPDATE`, serialising writers on the match.
async fn select_match_rows(
    conn: &mut sqlx::PgConnection,
    match_id: Uuid,
    lock: bool,
) -> Result<Option<MatchRows>, sqlx::Error> {
    let lock_clause = if lock { " FOR UPDATE" } else { "" };
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1{lock_clause}");
    let Some(record) = sqlx::query_as::<_, MatchRecord>(&sql)
        .bind(match_id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let players =
        select_players_of_teams(&mut *conn, &[record.team_a_id, record.team_b_id], lock).await?;
    let sets = select_sets_of_matches(&mut *conn, &[record.id]).await?;
    Ok(Some(MatchRows {
        record,
        players,
        sets,
    }))
}

impl MatchRows {
    /// Load and lock a match for the rest of the transaction.
    #[tracing::instrument(skip_all, err, name = "SQL:LockMatch")]
    pub async fn lock_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        match_id: Uuid,
    ) -> Result<Option<MatchRows>, sqlx::Error> {
        select_match_rows(&mut **tx, match_id, true).await
    }
}

#[derive(Debug, Clone)]
/// Load one match with its teams and sets.
pub struct LoadMatch {
    pub match_id: Uuid,
}

impl Processor<LoadMatch> for DatabaseProcessor {
    type Output = Option<MatchRows>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:LoadMatch")]
    async fn process(&self, query: LoadMatch) -> Result<Option<MatchRows>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        select_match_rows(&mut *conn, query.match_id, false).await
    }
}

#[derive(Debug, Clone)]
/// All matches, newest first.
pub struct ListMatches;

impl Processor<ListMatches> for DatabaseProcessor {
    type Output = Vec<MatchRows>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListMatches")]
    async fn process(&self, _query: ListMatches) -> Result<Vec<MatchRows>, sqlx::Error> {
        // v7 ids sort by creation time
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id DESC");
        let records = sqlx::query_as::<_, MatchRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let team_ids = records
            .iter()
            .flat_map(|r| [r.team_a_id, r.team_b_id])
            .unique()
            .collect();
        let players: HashMap<i64, Vec<PlayerRecord>> = self
            .process(GetPlayersOfTeams { team_ids })
            .await?
            .into_iter()
            .into_group_map_by(|p| p.team_id);
        let mut sets = self
            .process(GetSetsOfMatches {
                match_ids: records.iter().map(|r| r.id).collect(),
            })
            .await?
            .into_iter()
            .into_group_map_by(|s| s.match_id);

        let rows = records
            .into_iter()
            .map(|record| {
                let players = [record.team_a_id, record.team_b_id]
                    .iter()
                    .flat_map(|id| players.get(id).cloned().unwrap_or_default())
                    .collect();
                let sets = sets.remove(&record.id).unwrap_or_default();
                MatchRows {
                    record,
                    players,
                    sets,
                }
            })
            .collect();
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
/// Write back a whole match: the match row, every set and every player's
/// position and busy flag.
pub struct SaveMatch {
    pub record: MatchRecord,
    pub sets: Vec<SetRecord>,
    pub players: Vec<PlayerState>,
}

impl TryFrom<&Match> for SaveMatch {
    type Error = EngineError;

    fn try_from(m: &Match) -> Result<Self, Self::Error> {
        let (Some(team_a), Some(team_b)) = (m.team(TeamSlot::A), m.team(TeamSlot::B)) else {
            return Err(EngineError::InvariantViolation(format!(
                "match {} has {} teams",
                m.id,
                m.teams.len()
            )));
        };
        let team_id = |slot: TeamSlot| match slot {
            TeamSlot::A => team_a.id,
            TeamSlot::B => team_b.id,
        };

        Ok(SaveMatch {
            record: MatchRecord {
                id: m.id,
                match_date: m.date,
                team_a_id: team_a.id,
                team_b_id: team_b.id,
                winning_team_id: m.winning_team.map(team_id),
                serving_team_id: m.serving_team.map(team_id),
                serve_side: m.serve_side,
                status: m.status,
            },
            sets: m.sets.iter().map(SetRecord::from).collect(),
            players: m.players().map(PlayerState::from).collect(),
        })
    }
}

impl SaveMatch {
    #[tracing::instrument(skip_all, err, name = "SQL:SaveMatch")]
    pub async fn execute_tx(
        self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        let SaveMatch {
            record,
            sets,
            players,
        } = self;
        sqlx::query(
            r#"
            INSERT INTO matches
            (id, match_date, team_a_id, team_b_id, winning_team_id, serving_team_id, serve_side, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                winning_team_id = EXCLUDED.winning_team_id,
                serving_team_id = EXCLUDED.serving_team_id,
                serve_side = EXCLUDED.serve_side,
                status = EXCLUDED.status
            "#,
        )
        .bind(record.id)
        .bind(record.match_date)
        .bind(record.team_a_id)
        .bind(record.team_b_id)
        .bind(record.winning_team_id)
        .bind(record.serving_team_id)
        .bind(record.serve_side)
        .bind(record.status)
        .execute(&mut **tx)
        .await?;

        SetRecord::upsert_many_tx(tx, sets).await?;
        PlayerRecord::update_states_tx(tx, &players).await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MatchExists {
    pub match_id: Uuid,
}

impl Processor<MatchExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:MatchExists")]
    async fn process(&self, query: MatchExists) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM matches WHERE id = $1)")
            .bind(query.match_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

impl MatchRecord {
    /// Delete a match and, through the foreign key, its sets. Returns false
    /// if no such match.
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteMatch")]
    pub async fn delete_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        match_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(match_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, Team};
    use time::macros::date;

    fn player(id: i64, team_id: i64, slot: i16, busy: bool) -> PlayerRecord {
        PlayerRecord {
            id,
            team_id,
            slot,
            name: format!("p{id}"),
            position: Team::initial_position(slot as usize),
            busy,
        }
    }

    fn rows() -> MatchRows {
        let id = Uuid::now_v7();
        MatchRows {
            record: MatchRecord {
                id,
                match_date: date!(2024 - 06 - 10),
                team_a_id: 1,
                team_b_id: 2,
                winning_team_id: None,
                serving_team_id: Some(2),
                serve_side: Side::Left,
                status: MatchStatus::Ongoing,
            },
            players: vec![
                player(4, 2, 1, true),
                player(1, 1, 0, true),
                player(3, 2, 0, true),
                player(2, 1, 1, true),
            ],
            sets: vec![SetRecord {
                match_id: id,
                seq: 1,
                points_a: 3,
                points_b: 5,
            }],
        }
    }

    #[test]
    fn test_rows_map_to_aggregate() {
        let m = rows().into_match().unwrap();
        assert_eq!(m.teams[0].id, 1);
        assert_eq!(m.teams[1].id, 2);
        assert_eq!(
            m.teams[1].players.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(m.serving_team, Some(TeamSlot::B));
        assert_eq!(m.winning_team, None);
        assert_eq!(m.serve_side, Side::Left);
        let set = m.current_set().unwrap();
        assert_eq!((set.number, set.points_a, set.points_b), (1, 3, 5));
    }

    #[test]
    fn test_save_matches_loaded_rows() {
        let rows = rows();
        let mut m = rows.clone().into_match().unwrap();
        let save = SaveMatch::try_from(&m).unwrap();
        assert_eq!(save.record, rows.record);
        assert_eq!(save.sets, rows.sets);
        assert_eq!(save.players.len(), 4);

        engine::abort_match(&mut m, TeamSlot::B).unwrap();
        let save = SaveMatch::try_from(&m).unwrap();
        assert_eq!(save.record.winning_team_id, Some(1));
        assert_eq!(save.record.status, MatchStatus::Forfeited);
        assert!(save.players.iter().all(|p| !p.busy));
    }

    #[test]
    fn test_team_with_missing_player_is_rejected() {
        let mut rows = rows();
        rows.players.retain(|p| p.id != 4);
        assert!(matches!(
            rows.into_match(),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_foreign_serving_team_is_rejected() {
        let mut rows = rows();
        rows.record.serving_team_id = Some(9);
        assert!(matches!(
            rows.into_match(),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_negative_points_are_rejected() {
        let mut rows = rows();
        rows.sets[0].points_b = -1;
        assert!(matches!(
            rows.into_match(),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_save_requires_two_teams() {
        let mut m = rows().into_match().unwrap();
        m.teams.truncate(1);
        assert!(matches!(
            SaveMatch::try_from(&m),
            Err(EngineError::InvariantViolation(_))
        ));
    }
}
