//! Database connection utilities.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::{DbError, ensure_schema};

/// Default location of the alerts database, relative to the working
/// directory.
pub const DEFAULT_DB_PATH: &str = "data/urban_alerts.db";

/// Opens (or creates) the alerts `SQLite` database at `path` and ensures the
/// schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the parent directory cannot be created, the
/// database cannot be opened, or schema creation fails.
pub async fn open(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| DbError::Connection {
            message: format!("Failed to create {}: {e}", parent.display()),
        })?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connection {
        message: e.to_string(),
    })?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Opens a private in-memory database with the schema applied.
///
/// Nothing is persisted; used by tests and for throwaway runs.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be created or schema creation
/// fails.
pub async fn open_in_memory() -> Result<Box<dyn Database>, DbError> {
    let db = init_sqlite_rusqlite(None).map_err(|e| DbError::Connection {
        message: e.to_string(),
    })?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}
