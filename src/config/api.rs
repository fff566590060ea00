use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    /// May reference environment variables as `${VAR}`
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub stream_timeout: Option<u64>,
}
