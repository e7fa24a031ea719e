//! LLM providers
//!
//! A provider turns a system message and a list of chat turns into a stream
//! of text fragments. Fragments are handed to a callback as they arrive; an
//! error from the callback aborts the completion.

use crate::domain::{Config, Message, ProviderKind};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::env;
use std::time::Duration;

pub mod anthropic;
pub mod openai;
pub mod testing;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use testing::TestingProvider;

/// Callback receiving streamed text fragments.
pub type TokenSink<'a> = dyn FnMut(&str) -> Result<()> + 'a;

/// The token sink usually writes to a local SQLite connection, so the
/// returned futures are not `Send` and run on a current-thread runtime.
#[async_trait(?Send)]
pub trait LlmProvider {
    fn name(&self) -> &'static str;

    /// Request a completion. `system_message` already includes the context.
    async fn complete(
        &self,
        system_message: &str,
        messages: &[Message],
        on_tokens: &mut TokenSink<'_>,
    ) -> Result<()>;
}

/// Build the provider selected in the resolved config.
///
/// API keys are read from the environment variable named in the config.
pub fn resolve_provider(config: &Config) -> Result<Box<dyn LlmProvider>> {
    let Some(kind) = ProviderKind::parse(&config.provider) else {
        bail!("{:?} is not a supported provider", config.provider);
    };

    let provider: Box<dyn LlmProvider> = match kind {
        ProviderKind::Testing => Box::new(TestingProvider),
        ProviderKind::Openai => Box::new(OpenAiProvider::new(
            read_api_key(&config.openai.api_key_env)?,
            config.openai.model.clone(),
        )?),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(
            read_api_key(&config.anthropic.api_key_env)?,
            config.anthropic.model.clone(),
        )?),
    };
    tracing::debug!("Using provider {}", provider.name());
    Ok(provider)
}

fn read_api_key(var: &str) -> Result<String> {
    match env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => bail!("API key not found: set the {} environment variable", var),
    }
}

/// Shared HTTP client settings. Replies stream for a while, so the overall
/// timeout is generous while connecting must be quick.
pub(crate) fn http_client(headers: reqwest::header::HeaderMap) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(600))
        .build()?)
}

/// Turn a non-success HTTP response into an error carrying status and body.
pub(crate) async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{} request failed with status {}: {}", provider, status, body.trim())
}
