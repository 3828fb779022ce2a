use rusqlite::Connection;

/// `scenarios` is a document table: the whole [`crate::models::ScenarioBody`]
/// is stored as one JSON blob per row rather than split across
/// accounts/transactions tables. The core never queries it directly — it's
/// parsed back into domain types by [`crate::repository::SqliteRepository`]
/// per request.
pub fn init_db(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scenarios (
            id TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
