//! Conversation and message persistence.

use super::ConversationStore;
use crate::domain::{Message, Role};
use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: i64,
    pub messages: Vec<StoredMessage>,
}

impl Conversation {
    /// Messages in the shape providers expect. Rows with an unknown role are
    /// dropped.
    pub fn to_messages(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter_map(|m| {
                Role::parse(&m.role).map(|role| Message { role, content: m.content.clone() })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: i64,
    pub role: String,
    pub content: String,
}

impl ConversationStore {
    /// Create an empty conversation.
    pub fn initialize_conversation(&self) -> Result<Conversation> {
        self.conn().execute("INSERT INTO conversations DEFAULT VALUES", [])?;
        let id = self.conn().last_insert_rowid();
        Ok(Conversation { id, messages: Vec::new() })
    }

    /// The most recently created conversation, with its messages in order.
    pub fn fetch_recent_conversation(&self) -> Result<Option<Conversation>> {
        let id: Option<i64> =
            self.conn().query_row("SELECT MAX(id) FROM conversations", [], |row| row.get(0))?;
        match id {
            Some(id) => self.fetch_conversation(id).map(Some),
            None => Ok(None),
        }
    }

    pub fn fetch_conversation(&self, id: i64) -> Result<Conversation> {
        let exists = self
            .conn()
            .query_row("SELECT id FROM conversations WHERE id = ?1", [id], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        if exists.is_none() {
            anyhow::bail!("No conversation with id {}", id);
        }

        let mut stmt = self.conn().prepare(
            "SELECT id, role, content FROM messages WHERE conversation_id = ?1 ORDER BY id",
        )?;
        let messages = stmt
            .query_map([id], |row| {
                Ok(StoredMessage { id: row.get(0)?, role: row.get(1)?, content: row.get(2)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Conversation { id, messages })
    }

    /// Append a message to a conversation and return the stored row.
    pub fn insert_message(
        &self,
        conversation_id: i64,
        role: Role,
        content: &str,
    ) -> Result<StoredMessage> {
        self.conn()
            .execute(
                "INSERT INTO messages(conversation_id, role, content) VALUES (?1, ?2, ?3)",
                params![conversation_id, role.as_str(), content],
            )
            .with_context(|| format!("Failed to add message to conversation {}", conversation_id))?;
        let id = self.conn().last_insert_rowid();
        Ok(StoredMessage { id, role: role.as_str().to_string(), content: content.to_string() })
    }

    /// Extend a message's content (used while a reply streams in).
    pub fn append_to_message(&self, message_id: i64, text: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE messages SET content = content || ?1 WHERE id = ?2",
            params![text, message_id],
        )?;
        Ok(())
    }

    /// Keep only the `keep` most recent conversations; returns how many were
    /// deleted. Messages go with their conversation.
    pub fn prune_old_conversations(&self, keep: usize) -> Result<usize> {
        let deleted = self.conn().execute(
            "DELETE FROM conversations
             WHERE id NOT IN (SELECT id FROM conversations ORDER BY id DESC LIMIT ?1)",
            [keep as i64],
        )?;
        if deleted > 0 {
            tracing::debug!("Pruned {} old conversations", deleted);
        }
        Ok(deleted)
    }
}
