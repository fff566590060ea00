use super::storage::TranscriptStore;
use crate::error::{PdfSumError, Result};
use crate::models::Message;
use colored::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONVERSATIONS_DIR: &str = "conversations";

/// Stores each transcript as pretty-printed JSON under
/// `<root>/<model>/<hash[..2]>/<hash>.json`.
///
/// There is no locking: two writers for the same thread race and the last
/// save wins.
pub struct FilesystemTranscriptStore {
    root: PathBuf,
    verbose: bool,
}

impl FilesystemTranscriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn log(&self, message: String) {
        if self.verbose {
            eprintln!("{}", format!("[transcript] {}", message).dimmed());
        }
    }
}

/// Hex-encoded SHA-256 of a thread id
pub fn thread_hash(thread_id: &str) -> String {
    hex::encode(Sha256::digest(thread_id.as_bytes()))
}

/// Model names such as `openai/gpt-4o` must stay a single directory level
fn model_dir_name(model: &str) -> String {
    model
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

impl TranscriptStore for FilesystemTranscriptStore {
    fn path_for(&self, thread_id: &str, model: &str) -> PathBuf {
        let hash = thread_hash(thread_id);
        self.root
            .join(model_dir_name(model))
            .join(&hash[..2])
            .join(format!("{}.json", hash))
    }

    fn load(&self, thread_id: &str, model: &str) -> Result<Option<Vec<Message>>> {
        let path = self.path_for(thread_id, model);
        if !path.exists() {
            return Ok(None);
        }

        self.log(format!("Restore: {}", path.display()));
        let content = fs::read(&path)?;
        let messages: Vec<Message> = serde_json::from_slice(&content)
            .map_err(|source| PdfSumError::CorruptTranscript { path, source })?;
        Ok(Some(messages))
    }

    fn save(&self, thread_id: Option<&str>, model: &str, messages: &[Message]) -> Result<()> {
        let Some(thread_id) = thread_id else {
            return Ok(());
        };

        let path = self.path_for(thread_id, model);
        self.log(format!("Save: {}", path.display()));

        if let Some(directory) = path.parent() {
            fs::create_dir_all(directory).map_err(|source| PdfSumError::StorageWrite {
                path: directory.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(messages)?;
        fs::write(&path, content).map_err(|source| PdfSumError::StorageWrite { path, source })
    }

    fn exists(&self, thread_id: &str, model: &str) -> bool {
        self.path_for(thread_id, model).exists()
    }

    fn clear_all(&self) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)?.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension() == Some(std::ffi::OsStr::new("json")) {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
        }

        self.log(format!("Cleared {} transcript(s) under {}", removed, self.root.display()));
        Ok(removed)
    }
}

impl Default for FilesystemTranscriptStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERSATIONS_DIR)
    }
}
