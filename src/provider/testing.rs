//! Offline provider for tests and dry runs.

use super::{LlmProvider, TokenSink};
use crate::domain::Message;
use anyhow::Result;
use async_trait::async_trait;

/// The single reply the testing provider streams.
pub const TESTING_REPLY: &str = "Hello, world!";

pub struct TestingProvider;

#[async_trait(?Send)]
impl LlmProvider for TestingProvider {
    fn name(&self) -> &'static str {
        "testing"
    }

    async fn complete(
        &self,
        _system_message: &str,
        _messages: &[Message],
        on_tokens: &mut TokenSink<'_>,
    ) -> Result<()> {
        on_tokens(TESTING_REPLY)
    }
}
