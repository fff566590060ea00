use crate::error::Result;
use crate::models::Message;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Incremental text fragments of one streaming completion
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// A chat-completion endpoint.
///
/// Implementations receive the full message sequence on every call and keep
/// no conversation state of their own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one blocking completion and return the assistant text.
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<String>;

    /// Open a streaming completion yielding text deltas as they arrive.
    async fn complete_stream(
        &self,
        messages: &[Message],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<FragmentStream>;
}
