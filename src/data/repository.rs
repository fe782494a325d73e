use rusqlite::{params, Connection};

use crate::error::AppError;
use crate::models::record::{ExtractedLine, TextRecord};

/// Swaps the whole record set for `lines` inside one transaction.
///
/// Readers see either the previous set or the new one. If anything fails
/// before commit, the transaction rolls back on drop and the previous set
/// stays in place.
pub fn replace_all_records(
    conn: &mut Connection,
    lines: &[ExtractedLine],
) -> Result<usize, AppError> {
    let tx = conn.transaction()?;
    let removed = tx.execute("DELETE FROM text_records", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO text_records (source_path, normalized_text) VALUES (?1, ?2)",
        )?;
        for line in lines {
            stmt.execute(params![line.source_path, line.normalized_text])?;
        }
    }

    tx.commit()?;
    tracing::debug!(removed, inserted = lines.len(), "replaced index records");
    Ok(lines.len())
}

pub fn list_records(conn: &Connection) -> Result<Vec<TextRecord>, AppError> {
    let mut stmt =
        conn.prepare("SELECT id, source_path, normalized_text FROM text_records ORDER BY id")?;

    let records = stmt
        .query_map([], |row| {
            Ok(TextRecord {
                id: row.get(0)?,
                source_path: row.get(1)?,
                normalized_text: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn count_records(conn: &Connection) -> Result<usize, AppError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM text_records", [], |row| row.get(0))?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::migrations::run_migrations;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn line(path: &str, text: &str) -> ExtractedLine {
        ExtractedLine {
            source_path: path.to_string(),
            normalized_text: text.to_string(),
        }
    }

    fn texts(conn: &Connection) -> Vec<String> {
        list_records(conn)
            .unwrap()
            .into_iter()
            .map(|r| r.normalized_text)
            .collect()
    }

    #[test]
    fn test_replace_into_empty_store() {
        let mut conn = setup_db();
        assert_eq!(count_records(&conn).unwrap(), 0);

        let written = replace_all_records(
            &mut conn,
            &[line("/s/a.png", "hello"), line("/s/a.png", "world")],
        )
        .unwrap();

        assert_eq!(written, 2);
        let records = list_records(&conn).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source_path, "/s/a.png");
        assert_eq!(records[0].normalized_text, "hello");
        assert_eq!(records[1].normalized_text, "world");
    }

    #[test]
    fn test_replace_discards_previous_set() {
        let mut conn = setup_db();
        replace_all_records(&mut conn, &[line("/s/old.png", "old text")]).unwrap();
        replace_all_records(&mut conn, &[line("/s/new.png", "new text")]).unwrap();

        let records = list_records(&conn).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_path, "/s/new.png");
    }

    #[test]
    fn test_replace_with_nothing_empties_store() {
        let mut conn = setup_db();
        replace_all_records(&mut conn, &[line("/s/a.png", "a")]).unwrap();
        replace_all_records(&mut conn, &[]).unwrap();

        assert_eq!(count_records(&conn).unwrap(), 0);
    }

    #[test]
    fn test_ids_are_fresh_after_replace() {
        let mut conn = setup_db();
        replace_all_records(&mut conn, &[line("/s/a.png", "a"), line("/s/b.png", "b")]).unwrap();
        let first: Vec<i64> = list_records(&conn).unwrap().iter().map(|r| r.id).collect();

        replace_all_records(&mut conn, &[line("/s/a.png", "a")]).unwrap();
        let second = list_records(&conn).unwrap();

        let max_first = first.iter().copied().max().unwrap();
        assert!(second[0].id > max_first);
    }

    #[test]
    fn test_failed_insert_keeps_previous_set() {
        let mut conn = setup_db();
        replace_all_records(&mut conn, &[line("/s/a.png", "kept one"), line("/s/b.png", "kept two")])
            .unwrap();

        conn.execute_batch(
            "CREATE TEMP TRIGGER fail_midway BEFORE INSERT ON text_records
             WHEN NEW.normalized_text = 'boom'
             BEGIN SELECT RAISE(ABORT, 'simulated write failure'); END;",
        )
        .unwrap();

        let result = replace_all_records(
            &mut conn,
            &[line("/s/c.png", "fresh"), line("/s/d.png", "boom")],
        );

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(texts(&conn), vec!["kept one", "kept two"]);
    }

    #[test]
    fn test_interrupted_replace_leaves_previous_set_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("sfzf.db");

        {
            let mut conn = Connection::open(&db_path).unwrap();
            run_migrations(&conn).unwrap();
            replace_all_records(&mut conn, &[line("/s/a.png", "before reindex")]).unwrap();
        }

        {
            // Delete done, inserts half done, process goes away before commit:
            // neither the transaction nor the connection gets to clean up.
            let mut conn = Connection::open(&db_path).unwrap();
            let tx = conn.transaction().unwrap();
            tx.execute("DELETE FROM text_records", []).unwrap();
            tx.execute(
                "INSERT INTO text_records (source_path, normalized_text) VALUES ('/s/b.png', 'partial')",
                [],
            )
            .unwrap();

            let reader = Connection::open(&db_path).unwrap();
            assert_eq!(texts(&reader), vec!["before reindex"]);

            std::mem::forget(tx);
            std::mem::forget(conn);
        }

        let conn = Connection::open(&db_path).unwrap();
        assert_eq!(texts(&conn), vec!["before reindex"]);
    }
}
