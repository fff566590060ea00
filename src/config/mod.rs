mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::conversation::DEFAULT_MODEL;
use crate::document::DEFAULT_DOWNLOAD_DIR;
use crate::transcript::DEFAULT_CONVERSATIONS_DIR;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::ApiConfig;
pub use defaults::{
    API_KEY_PLACEHOLDER, DEFAULT_API_ENDPOINT, DEFAULT_OUTPUT_PATH, DEFAULT_STREAM_TIMEOUT,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_SYSTEM_PROMPT_FILE,
};
pub use validation::{expand_env_var_in_string, normalize_endpoint, validate_api_key};

pub const LOCAL_CONFIG_FILE: &str = ".pdfsum.yaml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Read the system prompt from this file when `system_prompt` is unset
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub conversations_dir: Option<String>,
    #[serde(default)]
    pub download_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "defaults::default_stream")]
    pub stream: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            stream: defaults::default_stream(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: String,
    pub stream_timeout: u64,
    pub conversations_dir: PathBuf,
    pub download_dir: PathBuf,
    pub output_path: PathBuf,
    pub stream: bool,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        let json_config = JsonConfig::load().map_err(|e| format!("{:#}", e))?;
        Self::resolve(args, json_config)
    }

    /// Merge CLI args > environment > config file > defaults
    pub fn resolve(args: &Args, json_config: JsonConfig) -> Result<Self, String> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .or_else(|| {
                json_config
                    .api
                    .api_key
                    .as_deref()
                    .map(expand_env_var_in_string)
            })
            .ok_or("OPENAI_API_KEY environment variable not set")?;
        validate_api_key(&api_key)?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env::var("PDFSUM_API_ENDPOINT").ok())
            .or(json_config.api.endpoint.clone())
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env::var("PDFSUM_MODEL").ok())
            .or(json_config.model.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = match args
            .system_prompt
            .clone()
            .or_else(|| env::var("PDFSUM_SYSTEM_PROMPT").ok())
            .or(json_config.model.system_prompt.clone())
        {
            Some(prompt) => prompt,
            None => Self::read_system_prompt_file(&json_config.model)?,
        };

        let stream_timeout = env::var("PDFSUM_STREAM_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or(json_config.api.stream_timeout)
            .unwrap_or(DEFAULT_STREAM_TIMEOUT);

        let verbose = args.verbose
            || env::var("PDFSUM_VERBOSE")
                .ok()
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(json_config.session.verbose)
                .unwrap_or(false);

        let conversations_dir = json_config.conversations_dir();
        let download_dir = PathBuf::from(
            json_config
                .storage
                .download_dir
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.to_string()),
        );

        let output_path = args
            .output
            .clone()
            .or(json_config.output.path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        let stream = !args.no_stream && json_config.output.stream;

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            stream_timeout,
            conversations_dir,
            download_dir,
            output_path,
            stream,
            verbose,
        })
    }

    /// Configured prompt file, then `system_prompt.txt` if present, then the
    /// built-in prompt
    fn read_system_prompt_file(model: &ModelConfig) -> Result<String, String> {
        if let Some(path) = &model.system_prompt_file {
            return fs::read_to_string(path)
                .map_err(|e| format!("Failed to read system prompt file {}: {}", path, e));
        }

        let default_file = Path::new(DEFAULT_SYSTEM_PROMPT_FILE);
        if default_file.exists() {
            return fs::read_to_string(default_file).map_err(|e| {
                format!(
                    "Failed to read system prompt file {}: {}",
                    default_file.display(),
                    e
                )
            });
        }

        Ok(DEFAULT_SYSTEM_PROMPT.to_string())
    }
}

impl JsonConfig {
    pub fn conversations_dir(&self) -> PathBuf {
        PathBuf::from(
            self.storage
                .conversations_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_CONVERSATIONS_DIR.to_string()),
        )
    }

    pub fn load() -> Result<Self> {
        Self::load_first(&Self::get_config_paths())
    }

    /// Load the first of `paths` that exists; defaults when none do.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_from(path),
            None => Ok(JsonConfig::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config: JsonConfig = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".pdfsum.yaml"),
            PathBuf::from(".pdfsum.yml"),
            PathBuf::from(".pdfsum.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("pdfsum");
            paths.push(config_dir.join("pdfsum.yaml"));
            paths.push(config_dir.join("pdfsum.yml"));
            paths.push(config_dir.join("pdfsum.json"));
        }

        paths
    }
}

/// Write a starter config and the default system prompt into `dir`.
///
/// Existing files are left untouched. Returns the files that were created.
pub fn init_config_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();

    let config_path = dir.join(LOCAL_CONFIG_FILE);
    if !config_path.exists() {
        let mut template = JsonConfig::default();
        template.api.api_key = Some(API_KEY_PLACEHOLDER.to_string());
        template.api.endpoint = Some(DEFAULT_API_ENDPOINT.to_string());
        template.model.default_model = Some(DEFAULT_MODEL.to_string());
        template.model.system_prompt_file = Some(DEFAULT_SYSTEM_PROMPT_FILE.to_string());
        template.storage.conversations_dir = Some(DEFAULT_CONVERSATIONS_DIR.to_string());
        template.storage.download_dir = Some(DEFAULT_DOWNLOAD_DIR.to_string());
        template.output.path = Some(DEFAULT_OUTPUT_PATH.to_string());

        let contents = serde_yaml::to_string(&template).context("Failed to render config")?;
        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        created.push(config_path);
    }

    let prompt_path = dir.join(DEFAULT_SYSTEM_PROMPT_FILE);
    if !prompt_path.exists() {
        fs::write(&prompt_path, DEFAULT_SYSTEM_PROMPT)
            .with_context(|| format!("Failed to write {}", prompt_path.display()))?;
        created.push(prompt_path);
    }

    Ok(created)
}
