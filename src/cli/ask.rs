//! Start or continue a conversation about the project.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use super::utils::{combine_message, load_project_config, read_stdin, scan_project};
use crate::domain::{Message, Role};
use crate::provider::resolve_provider;
use crate::render::{assemble_context, check_context_length, full_system_message};
use crate::store::{Conversation, ConversationStore, StoredMessage};

pub fn run(project_path: &Path, message: Option<&str>, continue_last: bool) -> Result<()> {
    let user_message = combine_message(&read_stdin()?, message)?;

    // The provider (and its API key) is checked before any document is read.
    let config = load_project_config(project_path)?;
    let provider = resolve_provider(&config)?;

    let project = scan_project(project_path, config)?;
    let config = &project.config;

    let context = assemble_context(&project.documents);
    check_context_length(&context, config.max_context_length)?;
    let system_message = full_system_message(&config.system_message, &context);

    let store = ConversationStore::open(project_path)?;

    // Fall back to a fresh conversation when there is nothing to continue,
    // or when the last one cannot be loaded.
    let existing: Option<Conversation> = if continue_last {
        store.fetch_recent_conversation().unwrap_or_else(|err| {
            tracing::warn!("Starting a new conversation, the last one failed to load: {:#}", err);
            None
        })
    } else {
        None
    };

    let mut messages: Vec<Message> =
        existing.as_ref().map(Conversation::to_messages).unwrap_or_default();
    messages.push(Message::user(user_message.as_str()));

    // Rows are only written once the provider starts answering, so a failed
    // request leaves no half-recorded turn behind.
    let mut reply: Option<StoredMessage> = None;
    let mut stdout = io::stdout().lock();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let mut on_tokens = |tokens: &str| -> Result<()> {
        let reply_id = match &reply {
            Some(stored) => stored.id,
            None => {
                let conversation_id = match &existing {
                    Some(conversation) => conversation.id,
                    None => store.initialize_conversation()?.id,
                };
                store.insert_message(conversation_id, Role::User, &user_message)?;
                let stored = store.insert_message(conversation_id, Role::Assistant, "")?;
                let id = stored.id;
                reply = Some(stored);
                id
            }
        };

        write!(stdout, "{}", tokens)?;
        stdout.flush()?;
        store.append_to_message(reply_id, tokens)
    };
    runtime.block_on(provider.complete(&system_message, &messages, &mut on_tokens))?;

    if reply.is_some() {
        writeln!(stdout)?;
    }

    if config.max_conversation_history >= 0 {
        store.prune_old_conversations(config.max_conversation_history as usize)?;
    }

    Ok(())
}
