mod filesystem;
mod storage;

pub use filesystem::{thread_hash, FilesystemTranscriptStore, DEFAULT_CONVERSATIONS_DIR};
pub use storage::TranscriptStore;
