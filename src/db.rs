use diesel_migrations::MigrationHarness;

use crate::domain::errors::StoreError;
use crate::errors::AppError;
use crate::infrastructure::pg_session::PgSession;
use crate::MIGRATIONS;

pub fn establish_session(database_url: &str) -> Result<PgSession, StoreError> {
    PgSession::connect(database_url)
}

/// Run any pending Diesel migrations on the session's connection.
///
/// Returns the number of migrations applied.
pub fn run_migrations(session: &mut PgSession) -> Result<usize, AppError> {
    let applied = session
        .connection()
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::Migration(e.to_string()))?;
    Ok(applied.len())
}
