#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pdfsum::api::{CompletionClient, CompletionOptions, FragmentStream};
use pdfsum::conversation::Clock;
use pdfsum::models::Message;
use pdfsum::transcript::TranscriptStore;
use pdfsum::{PdfSumError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Completion client that answers every call with canned output
pub struct StubClient {
    reply: String,
    fragments: Vec<String>,
    fail: bool,
    fail_after: Option<usize>,
    pub seen: Mutex<Vec<(Vec<Message>, String, f32)>>,
}

impl StubClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fragments: Vec::new(),
            fail: false,
            fail_after: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn streaming(fragments: &[&str]) -> Self {
        Self {
            reply: fragments.concat(),
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            fail: false,
            fail_after: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fragments: Vec::new(),
            fail: true,
            fail_after: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Streams `fragments` but emits a timeout after the first `after` of them
    pub fn streaming_with_error(fragments: &[&str], after: usize) -> Self {
        Self {
            fail_after: Some(after),
            ..Self::streaming(fragments)
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_messages(&self) -> Vec<Message> {
        self.seen
            .lock()
            .unwrap()
            .last()
            .map(|(messages, _, _)| messages.clone())
            .unwrap_or_default()
    }

    fn record(&self, messages: &[Message], model: &str, options: &CompletionOptions) {
        self.seen
            .lock()
            .unwrap()
            .push((messages.to_vec(), model.to_string(), options.temperature));
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        self.record(messages, model, options);
        if self.fail {
            return Err(PdfSumError::ApiError {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.reply.clone())
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<FragmentStream> {
        self.record(messages, model, options);
        if self.fail {
            return Err(PdfSumError::Timeout);
        }
        let mut fragments: Vec<Result<String>> = self.fragments.iter().cloned().map(Ok).collect();
        if let Some(after) = self.fail_after {
            fragments.insert(after, Err(PdfSumError::Timeout));
        }
        Ok(Box::pin(futures::stream::iter(fragments)))
    }
}

/// In-memory store that counts loads
#[derive(Default)]
pub struct CountingStore {
    records: Mutex<HashMap<(String, String), Vec<Message>>>,
    loads: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, thread_id: &str, model: &str, messages: Vec<Message>) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert((thread_id.to_string(), model.to_string()), messages);
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn record(&self, thread_id: &str, model: &str) -> Option<Vec<Message>> {
        self.records
            .lock()
            .unwrap()
            .get(&(thread_id.to_string(), model.to_string()))
            .cloned()
    }
}

impl TranscriptStore for CountingStore {
    fn path_for(&self, thread_id: &str, model: &str) -> PathBuf {
        PathBuf::from(model).join(thread_id)
    }

    fn load(&self, thread_id: &str, model: &str) -> Result<Option<Vec<Message>>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.record(thread_id, model))
    }

    fn save(&self, thread_id: Option<&str>, model: &str, messages: &[Message]) -> Result<()> {
        if let Some(thread_id) = thread_id {
            self.records
                .lock()
                .unwrap()
                .insert((thread_id.to_string(), model.to_string()), messages.to_vec());
        }
        Ok(())
    }

    fn exists(&self, thread_id: &str, model: &str) -> bool {
        self.record(thread_id, model).is_some()
    }

    fn clear_all(&self) -> Result<usize> {
        let mut records = self.records.lock().unwrap();
        let count = records.len();
        records.clear();
        Ok(count)
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
