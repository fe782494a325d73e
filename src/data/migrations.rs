use rusqlite::Connection;

use crate::error::AppError;

pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS text_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_path TEXT NOT NULL,
    normalized_text TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_text_records_source ON text_records(source_path);
";

pub fn schema_version(conn: &Connection) -> Result<i64, AppError> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

pub fn run_migrations(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    match schema_version(conn)? {
        0 => {
            conn.execute_batch(SCHEMA_V1)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        SCHEMA_VERSION => conn.execute_batch(SCHEMA_V1)?,
        found => {
            return Err(AppError::SchemaMismatch {
                found,
                expected: SCHEMA_VERSION,
            })
        }
    }
    Ok(())
}
