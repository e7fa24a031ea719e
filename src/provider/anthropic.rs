//! Anthropic messages API (streaming).

use super::{check_status, http_client, LlmProvider, TokenSink};
use crate::domain::Message;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::pin::pin;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct AnthropicProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    Error { error: ApiError },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        let mut key =
            HeaderValue::from_str(&api_key).context("API key contains invalid header characters")?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client: http_client(headers)?,
            endpoint: format!("{}/messages", base_url.trim_end_matches('/')),
            model,
        })
    }
}

#[async_trait(?Send)]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(
        &self,
        system_message: &str,
        messages: &[Message],
        on_tokens: &mut TokenSink<'_>,
    ) -> Result<()> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: system_message,
            messages,
            stream: true,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the Anthropic API")?;
        let response = check_status("Anthropic", response).await?;
        stream_tokens(response.bytes_stream(), on_tokens).await
    }
}

/// Forward text deltas until `message_stop`; `error` events fail the call.
async fn stream_tokens<S, B, E>(stream: S, on_tokens: &mut TokenSink<'_>) -> Result<()>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut events = pin!(stream.eventsource());
    while let Some(event) = events.next().await {
        let event =
            event.map_err(|err| anyhow!("Failed reading Anthropic response stream: {err}"))?;
        if event.data.trim().is_empty() {
            continue;
        }

        let parsed: StreamEvent = serde_json::from_str(&event.data)
            .with_context(|| format!("Unexpected Anthropic stream event: {}", event.data))?;
        match parsed {
            StreamEvent::ContentBlockDelta { delta: Delta::TextDelta { text } } => {
                if !text.is_empty() {
                    on_tokens(&text)?;
                }
            }
            StreamEvent::MessageStop => break,
            StreamEvent::Error { error } => {
                bail!("Anthropic stream error ({}): {}", error.kind, error.message)
            }
            StreamEvent::ContentBlockDelta { delta: Delta::Other } | StreamEvent::Other => {}
        }
    }
    Ok(())
}
