use crate::api::completion::{CompletionClient, CompletionOptions, FragmentStream};
use crate::api::models::RequestBody;
use crate::api::response::{extract_content, extract_error_message};
use crate::api::streaming::fragment_stream;
use crate::error::{PdfSumError, Result};
use crate::models::Message;
use async_trait::async_trait;
use colored::*;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct OpenAiClient {
    http: reqwest::Client,
    api_endpoint: String,
    stream_timeout: u64,
    verbose: bool,
}

impl OpenAiClient {
    pub fn new(api_key: &str, api_endpoint: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                PdfSumError::ConfigError(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_endpoint: api_endpoint.into(),
            stream_timeout: 30,
            verbose: false,
        })
    }

    pub fn with_stream_timeout(mut self, secs: u64) -> Self {
        self.stream_timeout = secs;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    async fn send(&self, request_body: &RequestBody) -> Result<reqwest::Response> {
        if self.verbose {
            eprintln!(
                "{}",
                format!(
                    "[AI] Requesting {} (model={}, messages={}, stream={})",
                    self.api_endpoint,
                    request_body.model,
                    request_body.messages.len(),
                    request_body.stream
                )
                .dimmed()
            );
        }

        let response = self
            .http
            .post(&self.api_endpoint)
            .json(request_body)
            .send()
            .await?;

        if self.verbose {
            eprintln!(
                "{}",
                format!("[AI] Response status: {}", response.status()).dimmed()
            );
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PdfSumError::ApiError {
                status,
                message: extract_error_message(&error_text),
            });
        }

        Ok(response)
    }
}

fn request_body(
    messages: &[Message],
    model: &str,
    options: &CompletionOptions,
    stream: bool,
) -> RequestBody {
    RequestBody {
        model: model.to_string(),
        messages: messages.to_vec(),
        stream,
        temperature: options.temperature,
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<String> {
        let response = self
            .send(&request_body(messages, model, options, false))
            .await?;
        let response_text = response.text().await?;
        if self.verbose {
            eprintln!("{}", format!("[AI] Raw response: {}", response_text).dimmed());
        }

        let response_json: Value = serde_json::from_str(&response_text)?;
        extract_content(&response_json)?
            .ok_or_else(|| PdfSumError::Completion("No content in response".to_string()))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        model: &str,
        options: &CompletionOptions,
    ) -> Result<FragmentStream> {
        let response = self
            .send(&request_body(messages, model, options, true))
            .await?;
        Ok(fragment_stream(response, self.stream_timeout, self.verbose))
    }
}
