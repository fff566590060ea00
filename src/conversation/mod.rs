pub mod cache;
pub mod history;
mod stream;

pub use cache::{Clock, ConversationCache, SystemClock, DEFAULT_CACHE_TTL_MINUTES};
pub use history::{reorganize, MAX_MESSAGES_PER_ROLE};
pub use stream::ConversationStream;

use crate::api::{CompletionClient, CompletionOptions};
use crate::error::{PdfSumError, Result};
use crate::models::{Message, Role};
use std::ops::DerefMut;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A conversation shared between the cache and in-flight requests
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Role-tagged chat history bound to one model.
///
/// A conversation without a thread id is ephemeral and never persisted.
#[derive(Debug, Clone)]
pub struct Conversation {
    thread_id: Option<String>,
    model: String,
    options: CompletionOptions,
    pub(crate) messages: Vec<Message>,
}

impl Conversation {
    pub fn new(thread_id: Option<String>, model: impl Into<String>) -> Self {
        Self {
            thread_id,
            model: model.into(),
            options: CompletionOptions::default(),
            messages: Vec::new(),
        }
    }

    pub fn ephemeral(model: impl Into<String>) -> Self {
        Self::new(None, model)
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Overwrite the system message in place, or put a new one at the front.
    ///
    /// An empty prompt is an explicit clear: the content becomes empty but the
    /// message keeps its slot.
    pub fn apply_system_prompt(&mut self, prompt: &str) {
        let mut found = false;
        for message in self.messages.iter_mut().filter(|m| m.role == Role::System) {
            message.content = prompt.to_string();
            found = true;
        }
        if !found {
            self.messages.insert(0, Message::system(prompt));
        }
    }

    /// Run one blocking turn and return the assistant reply.
    ///
    /// The user message stays in the history even when the completion fails.
    /// An empty reply is treated as a failed completion and returns
    /// `PdfSumError::Completion` without appending an assistant message.
    pub async fn chat(&mut self, client: &dyn CompletionClient, text: &str) -> Result<String> {
        self.messages.push(Message::user(text));

        let reply = client
            .complete(&self.messages, &self.model, &self.options)
            .await?;
        if reply.is_empty() {
            return Err(PdfSumError::Completion(
                "Completion returned an empty result".to_string(),
            ));
        }

        self.messages.push(Message::assistant(reply.clone()));
        reorganize(&mut self.messages, MAX_MESSAGES_PER_ROLE);
        Ok(reply)
    }

    /// Start a streaming turn on a borrowed conversation.
    pub async fn stream<'a>(
        &'a mut self,
        client: &dyn CompletionClient,
        text: &str,
    ) -> Result<ConversationStream<&'a mut Conversation>> {
        open_stream(self, client, text).await
    }
}

/// Start a streaming turn on any mutable handle to a conversation, such as an
/// owned mutex guard that has to outlive the caller's borrow.
///
/// The user message is appended before the completion is requested.
pub async fn open_stream<G>(
    mut conversation: G,
    client: &dyn CompletionClient,
    text: &str,
) -> Result<ConversationStream<G>>
where
    G: DerefMut<Target = Conversation> + Unpin,
{
    let fragments = {
        let conversation = conversation.deref_mut();
        conversation.messages.push(Message::user(text));
        client
            .complete_stream(&conversation.messages, &conversation.model, &conversation.options)
            .await?
    };
    Ok(ConversationStream::new(conversation, fragments))
}
