use super::{Conversation, SharedConversation};
use crate::error::Result;
use crate::transcript::TranscriptStore;
use chrono::{DateTime, Duration, Utc};
use colored::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_CACHE_TTL_MINUTES: i64 = 60;

/// Source of the current time for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CacheEntry {
    conversation: SharedConversation,
    expires_at: DateTime<Utc>,
}

/// In-memory map of active conversations keyed by thread id.
///
/// Every access pushes an entry's expiry out by the TTL. Expired entries are
/// only dropped by `sweep_expired`; their transcripts stay on disk.
pub struct ConversationCache {
    store: Arc<dyn TranscriptStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    verbose: bool,
}

impl ConversationCache {
    pub fn new(store: Arc<dyn TranscriptStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ttl: Duration::minutes(DEFAULT_CACHE_TTL_MINUTES),
            entries: Mutex::new(HashMap::new()),
            verbose: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn log(&self, message: String) {
        if self.verbose {
            eprintln!("{}", format!("[cache] {}", message).dimmed());
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Recovers the map from a poisoned lock.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached conversation for `thread_id`, restoring it from the
    /// transcript store on a miss. Without a thread id a fresh ephemeral
    /// conversation is returned and nothing is cached.
    ///
    /// `system_prompt` of `None` leaves the history alone; `Some` is applied
    /// through `Conversation::apply_system_prompt`.
    pub async fn get_or_create(
        &self,
        thread_id: Option<&str>,
        model: &str,
        system_prompt: Option<&str>,
    ) -> Result<SharedConversation> {
        let conversation = match thread_id {
            Some(thread_id) => self.lookup_or_restore(thread_id, model)?,
            None => Arc::new(tokio::sync::Mutex::new(Conversation::ephemeral(model))),
        };

        if let Some(prompt) = system_prompt {
            conversation.lock().await.apply_system_prompt(prompt);
        }

        Ok(conversation)
    }

    fn lookup_or_restore(&self, thread_id: &str, model: &str) -> Result<SharedConversation> {
        let expires_at = self.clock.now() + self.ttl;

        if let Some(entry) = self.entries().get_mut(thread_id) {
            self.log(format!("Hit conversation cache: {}", thread_id));
            entry.expires_at = expires_at;
            return Ok(entry.conversation.clone());
        }

        let mut conversation = Conversation::new(Some(thread_id.to_string()), model);
        if let Some(messages) = self.store.load(thread_id, model)? {
            self.log(format!(
                "Restored {} message(s) for {}",
                messages.len(),
                thread_id
            ));
            conversation = conversation.with_messages(messages);
        }

        let shared = Arc::new(tokio::sync::Mutex::new(conversation));
        // Another request may have restored the same thread meanwhile; keep the first.
        let entry = self
            .entries()
            .entry(thread_id.to_string())
            .or_insert(CacheEntry {
                conversation: shared,
                expires_at,
            })
            .conversation
            .clone();
        Ok(entry)
    }

    /// Drop every entry whose expiry has passed; returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|thread_id, entry| {
            let alive = now < entry.expires_at;
            if !alive {
                self.log(format!(
                    "Conversation with thread_id {} expired and deleted.",
                    thread_id
                ));
            }
            alive
        });
        before - entries.len()
    }

    pub fn contains(&self, thread_id: &str) -> bool {
        self.entries().contains_key(thread_id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn store(&self) -> &Arc<dyn TranscriptStore> {
        &self.store
    }
}
