use std::path::{Path, PathBuf};

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Local(PathBuf),
    Remote(String),
}

impl DocumentSource {
    /// Targets starting with `http` are fetched, everything else is a path.
    pub fn parse(target: &str) -> Self {
        if target.starts_with("http") {
            DocumentSource::Remote(target.to_string())
        } else {
            DocumentSource::Local(PathBuf::from(target))
        }
    }

    /// Lowercased file extension without the dot, empty when there is none
    pub fn extension(&self) -> String {
        let ext = match self {
            DocumentSource::Local(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_string()),
            DocumentSource::Remote(url) => reqwest::Url::parse(url).ok().and_then(|u| {
                Path::new(u.path())
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_string())
            }),
        };
        ext.unwrap_or_default().to_lowercase()
    }

    pub fn display_name(&self) -> String {
        match self {
            DocumentSource::Local(path) => path.display().to_string(),
            DocumentSource::Remote(url) => url.clone(),
        }
    }
}
