mod common;

use chrono::Duration;
use common::{CountingStore, ManualClock, StubClient};
use futures::StreamExt;
use pdfsum::conversation::ConversationCache;
use pdfsum::models::Message;
use pdfsum::transcript::{FilesystemTranscriptStore, TranscriptStore};
use pdfsum::Summarizer;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_submit_persists_transcript() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FilesystemTranscriptStore::new(temp_dir.path()));
    let summarizer = Summarizer::new(Arc::new(StubClient::replying("hello")), store.clone(), "m");

    let reply = summarizer.submit("hi", Some("t1"), None).await.unwrap();

    assert_eq!(reply, "hello");
    assert_eq!(
        store.load("t1", "m").unwrap().unwrap(),
        vec![Message::user("hi"), Message::assistant("hello")]
    );
    assert!(summarizer.has_conversation("t1"));
}

#[tokio::test]
async fn test_submit_with_system_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FilesystemTranscriptStore::new(temp_dir.path()));
    let client = Arc::new(StubClient::replying("summary"));
    let summarizer = Summarizer::new(client.clone(), store.clone(), "m");

    summarizer
        .submit("document text", Some("t1"), Some("summarize"))
        .await
        .unwrap();

    assert_eq!(
        client.last_messages(),
        vec![Message::system("summarize"), Message::user("document text")]
    );
    assert_eq!(
        store.load("t1", "m").unwrap().unwrap()[0],
        Message::system("summarize")
    );
}

#[tokio::test]
async fn test_submit_continues_thread() {
    let store = Arc::new(CountingStore::new());
    let client = Arc::new(StubClient::replying("ok"));
    let summarizer = Summarizer::new(client.clone(), store.clone(), "m");

    summarizer.submit("one", Some("t1"), None).await.unwrap();
    summarizer.submit("two", Some("t1"), None).await.unwrap();

    assert_eq!(store.loads(), 1);
    assert_eq!(client.last_messages().len(), 3);
    assert_eq!(store.record("t1", "m").unwrap().len(), 4);
}

#[tokio::test]
async fn test_ephemeral_submit_is_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("conversations");
    let store = Arc::new(FilesystemTranscriptStore::new(&root));
    let summarizer = Summarizer::new(Arc::new(StubClient::replying("hello")), store, "m");

    let reply = summarizer.submit("hi", None, Some("sys")).await.unwrap();

    assert_eq!(reply, "hello");
    assert!(!root.exists());
    assert!(summarizer.cache().is_empty());
}

#[tokio::test]
async fn test_failed_submit_saves_nothing() {
    let store = Arc::new(CountingStore::new());
    let summarizer = Summarizer::new(Arc::new(StubClient::failing()), store.clone(), "m");

    let err = summarizer.submit("hi", Some("t1"), None).await.unwrap_err();

    assert!(err.is_completion_error());
    assert!(store.record("t1", "m").is_none());
}

#[tokio::test]
async fn test_submit_stream_saves_after_last_fragment() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FilesystemTranscriptStore::new(temp_dir.path()));
    let summarizer = Summarizer::new(
        Arc::new(StubClient::streaming(&["Hel", "lo"])),
        store.clone(),
        "m",
    );

    let stream = summarizer.submit_stream("hi", Some("t1"), None);
    futures::pin_mut!(stream);

    assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
    assert!(!store.exists("t1", "m"));
    assert_eq!(stream.next().await.unwrap().unwrap(), "lo");
    assert!(stream.next().await.is_none());

    assert_eq!(
        store.load("t1", "m").unwrap().unwrap(),
        vec![Message::user("hi"), Message::assistant("Hello")]
    );
}

#[tokio::test]
async fn test_dropped_submit_stream_saves_nothing() {
    let store = Arc::new(CountingStore::new());
    let summarizer = Summarizer::new(
        Arc::new(StubClient::streaming(&["Hel", "lo"])),
        store.clone(),
        "m",
    );

    {
        let stream = summarizer.submit_stream("hi", Some("t1"), None);
        futures::pin_mut!(stream);
        assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
    }

    assert!(store.record("t1", "m").is_none());
    let cached = summarizer
        .cache()
        .get_or_create(Some("t1"), "m", None)
        .await
        .unwrap();
    assert_eq!(cached.lock().await.messages(), &[Message::user("hi")]);
}

#[tokio::test]
async fn test_failed_submit_stream_saves_nothing() {
    let store = Arc::new(CountingStore::new());
    let summarizer = Summarizer::new(
        Arc::new(StubClient::streaming_with_error(&["Hel", "lo"], 1)),
        store.clone(),
        "m",
    );

    let stream = summarizer.submit_stream("hi", Some("t1"), None);
    futures::pin_mut!(stream);
    let mut fragments = Vec::new();
    let mut failed = false;
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => fragments.push(fragment),
            Err(_) => failed = true,
        }
    }

    assert_eq!(fragments, vec!["Hel".to_string()]);
    assert!(failed);
    assert!(store.record("t1", "m").is_none());
}

#[tokio::test]
async fn test_requests_sweep_expired_conversations() {
    let store = Arc::new(CountingStore::new());
    let clock = Arc::new(ManualClock::new());
    let cache = ConversationCache::new(store.clone()).with_clock(clock.clone());
    let summarizer = Summarizer::with_cache(Arc::new(StubClient::replying("ok")), cache, "m");

    summarizer.submit("one", Some("t1"), None).await.unwrap();
    clock.advance(Duration::hours(2));
    summarizer.submit("two", Some("t2"), None).await.unwrap();

    assert!(!summarizer.cache().contains("t1"));
    assert!(summarizer.cache().contains("t2"));
}
