use kanau::processor::Processor;
use uuid::Uuid;

use crate::engine::{EngineError, GameSet, rules};
use crate::framework::DatabaseProcessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct SetRecord {
    pub match_id: Uuid,
    pub seq: i16,
    pub points_a: i32,
    pub points_b: i32,
}

impl TryFrom<SetRecord> for GameSet {
    type Error = EngineError;

    fn try_from(record: SetRecord) -> Result<Self, Self::Error> {
        let number = u8::try_from(record.seq)
            .ok()
            .filter(|n| (1..=rules::MAX_SETS as u8).contains(n))
            .ok_or_else(|| {
                EngineError::InvariantViolation(format!(
                    "match {} has a set with sequence {}",
                    record.match_id, record.seq
                ))
            })?;
        let points = |value: i32| {
            u32::try_from(value).map_err(|_| {
                EngineError::InvariantViolation(format!(
                    "set {} of match {} has {} points",
                    record.seq, record.match_id, value
                ))
            })
        };
        Ok(GameSet {
            match_id: record.match_id,
            number,
            points_a: points(record.points_a)?,
            points_b: points(record.points_b)?,
        })
    }
}

impl From<&GameSet> for SetRecord {
    fn from(set: &GameSet) -> Self {
        SetRecord {
            match_id: set.match_id,
            seq: i16::from(set.number),
            points_a: set.points_a as i32,
            points_b: set.points_b as i32,
        }
    }
}

/// Sets of the given matches, ordered by match then sequence.
pub(crate) async fn select_sets_of_matches(
    conn: &mut sqlx::PgConnection,
    match_ids: &[Uuid],
) -> Result<Vec<SetRecord>, sqlx::Error> {
    if match_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, SetRecord>(
        r#"
        SELECT match_id, seq, points_a, points_b
        FROM match_sets
        WHERE match_id = ANY($1)
        ORDER BY match_id, seq
        "#,
    )
    .bind(match_ids)
    .fetch_all(conn)
    .await
}

#[derive(Debug, Clone)]
pub struct GetSetsOfMatches {
    pub match_ids: Vec<Uuid>,
}

impl Processor<GetSetsOfMatches> for DatabaseProcessor {
    type Output = Vec<SetRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSetsOfMatches")]
    async fn process(&self, query: GetSetsOfMatches) -> Result<Vec<SetRecord>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        select_sets_of_matches(&mut *conn, &query.match_ids).await
    }
}

#[derive(Debug, Clone)]
pub struct GetSet {
    pub match_id: Uuid,
    pub seq: i16,
}

impl Processor<GetSet> for DatabaseProcessor {
    type Output = Option<SetRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetSet")]
    async fn process(&self, query: GetSet) -> Result<Option<SetRecord>, sqlx::Error> {
        let set = sqlx::query_as::<_, SetRecord>(
            r#"
            SELECT match_id, seq, points_a, points_b
            FROM match_sets
            WHERE match_id = $1 AND seq = $2
            "#,
        )
        .bind(query.match_id)
        .bind(query.seq)
        .fetch_optional(&self.pool)
        .await?;
        Ok(set)
    }
}

impl SetRecord {
    /// Insert or overwrite set scores in a single query.
    ///
    /// Returns the number of rows written.
    #[tracing::instrument(skip_all, err, name = "SQL:UpsertSets")]
    pub async fn upsert_many_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        sets: Vec<SetRecord>,
    ) -> Result<u64, sqlx::Error> {
        if sets.is_empty() {
            return Ok(0);
        }

        let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "INSERT INTO match_sets (match_id, seq, points_a, points_b) ",
        );
        query_builder.push_values(sets, |mut b, set| {
            b.push_bind(set.match_id)
                .push_bind(set.seq)
                .push_bind(set.points_a)
                .push_bind(set.points_b);
        });
        query_builder.push(
            " ON CONFLICT (match_id, seq) DO UPDATE \
            SET points_a = EXCLUDED.points_a, points_b = EXCLUDED.points_b",
        );

        let result = query_builder.build().execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }
}
