use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PdfSumError {
    /// A stored transcript exists but could not be parsed.
    CorruptTranscript {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Directory creation or file write failed while saving a transcript.
    StorageWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The completion endpoint answered without a usable result.
    Completion(String),
    ApiError {
        status: u16,
        message: String,
    },
    NetworkError(reqwest::Error),
    Timeout,
    Document(String),
    ConfigError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl PdfSumError {
    /// True for every failure of the external completion call.
    pub fn is_completion_error(&self) -> bool {
        matches!(
            self,
            PdfSumError::Completion(_)
                | PdfSumError::ApiError { .. }
                | PdfSumError::NetworkError(_)
                | PdfSumError::Timeout
        )
    }
}

impl fmt::Display for PdfSumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfSumError::CorruptTranscript { path, source } => {
                write!(f, "Corrupt transcript {}: {}", path.display(), source)
            }
            PdfSumError::StorageWrite { path, source } => {
                write!(f, "Failed to write transcript {}: {}", path.display(), source)
            }
            PdfSumError::Completion(msg) => write!(f, "Completion error: {}", msg),
            PdfSumError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            PdfSumError::NetworkError(e) => write!(f, "Network error: {}", e),
            PdfSumError::Timeout => write!(f, "Request timeout"),
            PdfSumError::Document(msg) => write!(f, "Document error: {}", msg),
            PdfSumError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            PdfSumError::IoError(e) => write!(f, "IO error: {}", e),
            PdfSumError::JsonError(e) => write!(f, "JSON error: {}", e),
            PdfSumError::YamlError(e) => write!(f, "YAML error: {}", e),
            PdfSumError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PdfSumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PdfSumError::CorruptTranscript { source, .. } => Some(source),
            PdfSumError::StorageWrite { source, .. } => Some(source),
            PdfSumError::NetworkError(e) => Some(e),
            PdfSumError::IoError(e) => Some(e),
            PdfSumError::JsonError(e) => Some(e),
            PdfSumError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PdfSumError {
    fn from(err: reqwest::Error) -> Self {
        PdfSumError::NetworkError(err)
    }
}

impl From<std::io::Error> for PdfSumError {
    fn from(err: std::io::Error) -> Self {
        PdfSumError::IoError(err)
    }
}

impl From<serde_json::Error> for PdfSumError {
    fn from(err: serde_json::Error) -> Self {
        PdfSumError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for PdfSumError {
    fn from(err: serde_yaml::Error) -> Self {
        PdfSumError::YamlError(err)
    }
}

impl From<anyhow::Error> for PdfSumError {
    fn from(err: anyhow::Error) -> Self {
        PdfSumError::Other(err.to_string())
    }
}

impl From<String> for PdfSumError {
    fn from(msg: String) -> Self {
        PdfSumError::Other(msg)
    }
}

impl From<&str> for PdfSumError {
    fn from(msg: &str) -> Self {
        PdfSumError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PdfSumError>;
