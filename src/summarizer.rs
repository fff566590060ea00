use crate::api::CompletionClient;
use crate::conversation::{open_stream, ConversationCache};
use crate::error::Result;
use crate::transcript::TranscriptStore;
use futures::{Stream, StreamExt};
use std::sync::Arc;

/// Entry point the document layer talks to.
///
/// Owns the completion client, the transcript store and the conversation
/// cache. Each request resolves its conversation, runs one turn, saves the
/// transcript and then sweeps expired cache entries.
pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
    store: Arc<dyn TranscriptStore>,
    cache: ConversationCache,
    model: String,
}

impl Summarizer {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        store: Arc<dyn TranscriptStore>,
        model: impl Into<String>,
    ) -> Self {
        let cache = ConversationCache::new(store.clone());
        Self::with_cache(client, cache, model)
    }

    /// Build around a preconfigured cache; transcripts go to the cache's store.
    pub fn with_cache(
        client: Arc<dyn CompletionClient>,
        cache: ConversationCache,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store: cache.store().clone(),
            cache,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn cache(&self) -> &ConversationCache {
        &self.cache
    }

    /// Whether a transcript already exists for this thread id
    pub fn has_conversation(&self, thread_id: &str) -> bool {
        self.store.exists(thread_id, &self.model)
    }

    /// Send `text` and return the full reply.
    pub async fn submit(
        &self,
        text: &str,
        thread_id: Option<&str>,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let shared = self
            .cache
            .get_or_create(thread_id, &self.model, system_prompt)
            .await?;
        let mut conversation = shared.lock().await;

        let reply = conversation.chat(self.client.as_ref(), text).await?;

        self.store.save(
            conversation.thread_id(),
            conversation.model(),
            conversation.messages(),
        )?;
        drop(conversation);
        self.cache.sweep_expired();

        Ok(reply)
    }

    /// Streaming counterpart of `submit`.
    ///
    /// The transcript is saved after the last fragment has been yielded; a
    /// stream dropped before that point saves nothing.
    pub fn submit_stream<'a>(
        &'a self,
        text: &'a str,
        thread_id: Option<&'a str>,
        system_prompt: Option<&'a str>,
    ) -> impl Stream<Item = Result<String>> + Send + 'a {
        async_stream::try_stream! {
            let shared = self
                .cache
                .get_or_create(thread_id, &self.model, system_prompt)
                .await?;
            let guard = shared.lock_owned().await;

            let mut fragments = open_stream(guard, self.client.as_ref(), text).await?;
            while let Some(fragment) = fragments.next().await {
                yield fragment?;
            }

            let conversation = fragments.into_inner();
            self.store.save(
                conversation.thread_id(),
                conversation.model(),
                conversation.messages(),
            )?;
            drop(conversation);
            self.cache.sweep_expired();
        }
    }
}
