use sqlx::PgPool;

/// Runs pool-backed queries. Each query struct in [`crate::entities`] has a
/// `kanau::processor::Processor` impl on this type.
///
/// Work that must share a transaction goes through the `*_tx` functions on
/// the entity records instead.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
