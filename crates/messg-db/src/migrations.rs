use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (message, apikey)");
        conn.execute_batch(
            "
            CREATE TABLE message (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                text        TEXT,
                counter     INTEGER NOT NULL DEFAULT 0
            );

            -- No UNIQUE on key: duplicate rows are tolerated, any match authorizes
            CREATE TABLE apikey (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                key         TEXT NOT NULL
            );

            CREATE INDEX idx_apikey_key ON apikey(key);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn message_counter_defaults_to_zero() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();

        conn.execute("INSERT INTO message (text) VALUES ('x')", []).unwrap();
        let counter: i64 = conn
            .query_row("SELECT counter FROM message", [], |r| r.get(0))
            .unwrap();
        assert_eq!(counter, 0);
    }
}
