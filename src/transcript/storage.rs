use crate::error::Result;
use crate::models::Message;
use std::path::PathBuf;

/// Trait for transcript storage backends
pub trait TranscriptStore: Send + Sync {
    /// Location of the transcript for a thread id under a given model
    fn path_for(&self, thread_id: &str, model: &str) -> PathBuf;

    /// Load a transcript; `Ok(None)` when nothing was stored yet
    fn load(&self, thread_id: &str, model: &str) -> Result<Option<Vec<Message>>>;

    /// Save a transcript. Ephemeral conversations (no thread id) are skipped.
    fn save(&self, thread_id: Option<&str>, model: &str, messages: &[Message]) -> Result<()>;

    /// Whether a transcript exists for this thread id and model
    fn exists(&self, thread_id: &str, model: &str) -> bool;

    /// Remove every stored transcript, returning how many were deleted
    fn clear_all(&self) -> Result<usize>;
}
