//! Transactional glue between storage and the match engine.
//!
//! Every mutating operation runs as: begin, lock and load, engine call, save,
//! commit. Returning early drops the transaction, which rolls it back.

mod matches;
mod responses;
mod teams;

use sqlx::PgPool;
use thiserror::Error;

use crate::engine::{EngineError, TEAM_SIZE};
use crate::framework::DatabaseProcessor;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    fn match_not_found(id: uuid::Uuid) -> Self {
        ServiceError::NotFound(format!("match {id}"))
    }

    fn team_not_found(id: i64) -> Self {
        ServiceError::NotFound(format!("team {id}"))
    }
}

#[derive(Debug, Clone)]
pub struct MatchService {
    pool: PgPool,
}

impl MatchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn db(&self) -> DatabaseProcessor {
        DatabaseProcessor::new(self.pool.clone())
    }
}

/// Trim the names and check that there is exactly one per team slot.
pub fn validate_player_names(names: Vec<String>) -> Result<Vec<String>, ServiceError> {
    if names.len() != TEAM_SIZE {
        return Err(ServiceError::Validation(format!(
            "a team needs exactly {TEAM_SIZE} players, got {}",
            names.len()
        )));
    }
    names
        .into_iter()
        .map(|name| {
            let name = name.trim().to_string();
            if name.is_empty() {
                Err(ServiceError::Validation(
                    "player name must not be empty".to_string(),
                ))
            } else {
                Ok(name)
            }
        })
        .collect()
}
