//! Local conversation history (SQLite under the project's `.pal` directory)

use crate::domain::APP_DIR;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub mod conversations;
pub mod schema;

pub use conversations::{Conversation, StoredMessage};

pub const DB_FILE_NAME: &str = "db.sqlite";

/// Location of the conversation database for a project.
pub fn database_path(project_root: &Path) -> PathBuf {
    project_root.join(APP_DIR).join(DB_FILE_NAME)
}

/// Handle to the conversation database.
pub struct ConversationStore {
    conn: Connection,
}

impl ConversationStore {
    /// Open (creating if needed) the project's database and bring its schema
    /// up to date.
    pub fn open(project_root: &Path) -> Result<Self> {
        let db_path = database_path(project_root);
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        schema::run_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
