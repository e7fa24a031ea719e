//! Forward-only schema migrations.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Ordered `(id, sql)` pairs. Ids are never reused or edited once released.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    "
    CREATE TABLE conversations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        conversation_id INTEGER NOT NULL,
        role TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (conversation_id) REFERENCES conversations(id) ON DELETE CASCADE
    );
    ",
)];

/// Highest migration id this build knows about.
pub fn latest_migration() -> i64 {
    MIGRATIONS.iter().map(|(id, _)| *id).max().unwrap_or(0)
}

/// Apply every migration newer than the last one recorded.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row, so a failure leaves the database at the previous version.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS migrations (id INTEGER PRIMARY KEY);")?;

    let applied: Option<i64> =
        conn.query_row("SELECT MAX(id) FROM migrations", [], |row| row.get(0))?;
    let applied = applied.unwrap_or(0);

    let mut pending: Vec<&(i64, &str)> =
        MIGRATIONS.iter().filter(|(id, _)| *id > applied).collect();
    pending.sort_by_key(|(id, _)| *id);

    for (id, sql) in pending {
        let tx = conn.transaction()?;
        tx.execute_batch(sql).with_context(|| format!("Failed to apply migration {id}"))?;
        tx.execute("INSERT INTO migrations(id) VALUES (?1)", [id])?;
        tx.commit()?;
        tracing::debug!("Applied database migration {}", id);
    }

    Ok(())
}
