//! OpenAI chat completions (streaming).

use super::{check_status, http_client, LlmProvider, TokenSink};
use crate::domain::Message;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::pin::pin;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DONE_MARKER: &str = "[DONE]";

pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("API key contains invalid header characters")?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            client: http_client(headers)?,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
        })
    }
}

#[async_trait(?Send)]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        system_message: &str,
        messages: &[Message],
        on_tokens: &mut TokenSink<'_>,
    ) -> Result<()> {
        let request = build_request(&self.model, system_message, messages);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the OpenAI API")?;
        let response = check_status("OpenAI", response).await?;
        stream_tokens(response.bytes_stream(), on_tokens).await
    }
}

fn build_request<'a>(
    model: &'a str,
    system_message: &'a str,
    messages: &'a [Message],
) -> ChatRequest<'a> {
    let mut turns = Vec::with_capacity(messages.len() + 1);
    turns.push(ChatMessage { role: "system", content: system_message });
    turns.extend(
        messages.iter().map(|m| ChatMessage { role: m.role.as_str(), content: &m.content }),
    );
    ChatRequest { model, stream: true, messages: turns }
}

/// Forward `delta.content` fragments until the `[DONE]` marker.
async fn stream_tokens<S, B, E>(stream: S, on_tokens: &mut TokenSink<'_>) -> Result<()>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut events = pin!(stream.eventsource());
    while let Some(event) = events.next().await {
        let event = event.map_err(|err| anyhow!("Failed reading OpenAI response stream: {err}"))?;
        let data = event.data.trim();
        if data == DONE_MARKER {
            break;
        }
        if data.is_empty() {
            continue;
        }

        let chunk: ChatChunk = serde_json::from_str(data)
            .with_context(|| format!("Unexpected OpenAI stream chunk: {data}"))?;
        for choice in chunk.choices {
            if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                on_tokens(&content)?;
            }
        }
    }
    Ok(())
}
