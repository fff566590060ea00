use super::extract::extract_text;
use super::source::DocumentSource;
use crate::error::{PdfSumError, Result};
use colored::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DOWNLOAD_DIR: &str = "tmp";

/// Reads documents from disk or over HTTP.
///
/// Remote documents are downloaded once into the download directory and
/// served from there on later reads.
pub struct DocumentReader {
    http: reqwest::Client,
    download_dir: PathBuf,
    verbose: bool,
}

impl DocumentReader {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::Client::new(),
            download_dir: download_dir.into(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Cache location for a downloaded URL
    pub fn cache_path_for(&self, source: &DocumentSource) -> PathBuf {
        let hash = hex::encode(Sha256::digest(source.display_name().as_bytes()));
        let ext = source.extension();
        if ext.is_empty() {
            self.download_dir.join(hash)
        } else {
            self.download_dir.join(format!("{}.{}", hash, ext))
        }
    }

    pub async fn read_bytes(&self, source: &DocumentSource) -> Result<Vec<u8>> {
        match source {
            DocumentSource::Local(path) => fs::read(path).map_err(|e| {
                PdfSumError::Document(format!("failed to read {}: {}", path.display(), e))
            }),
            DocumentSource::Remote(url) => {
                let cache_path = self.cache_path_for(source);
                if cache_path.exists() {
                    if self.verbose {
                        eprintln!(
                            "{}",
                            format!("[document] Using cached download {}", cache_path.display())
                                .dimmed()
                        );
                    }
                    return Ok(fs::read(&cache_path)?);
                }

                let bytes = self.download(url).await?;
                fs::create_dir_all(&self.download_dir)?;
                fs::write(&cache_path, &bytes)?;
                Ok(bytes.to_vec())
            }
        }
    }

    async fn download(&self, url: &str) -> Result<bytes::Bytes> {
        if self.verbose {
            eprintln!("{}", format!("[document] Downloading {}", url).dimmed());
        }
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PdfSumError::Document(format!(
                "download of {} failed with status {}",
                url,
                response.status()
            )));
        }
        Ok(response.bytes().await?)
    }

    /// Fetch the document and return its text
    pub async fn read_text(&self, source: &DocumentSource) -> Result<String> {
        let bytes = self.read_bytes(source).await?;
        let extension = source.extension();
        tokio::task::spawn_blocking(move || extract_text(&bytes, &extension))
            .await
            .map_err(|e| PdfSumError::Document(format!("task join error: {}", e)))?
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_DIR)
    }
}
