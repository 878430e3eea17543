//! Application state shared across all request handlers.

use birdie_core::service::MatchService;
use sqlx::PgPool;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (the pool is behind an Arc).
#[derive(Clone)]
pub struct AppState {
    pub matches: MatchService,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self {
            matches: MatchService::new(db),
        }
    }
}
