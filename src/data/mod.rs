pub mod migrations;
pub mod repository;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::AppError;

/// Opens the index at `db_path`, creating it on first use.
///
/// The returned connection is the only handle to the store for the current
/// command; dropping it closes the file.
pub fn open_database(db_path: &Path) -> Result<Connection, AppError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    migrations::run_migrations(&conn)?;
    tracing::debug!(path = %db_path.display(), "opened index");
    Ok(conn)
}
