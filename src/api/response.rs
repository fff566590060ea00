use crate::error::{PdfSumError, Result};
use serde_json::Value;

/// Extract the assistant content from a non-streaming response
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| PdfSumError::Completion("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| PdfSumError::Completion("Empty choices array".to_string()))?;

    let message = first_choice
        .get("message")
        .ok_or_else(|| PdfSumError::Completion("No message in response".to_string()))?;

    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

/// Extract the error message an endpoint returned alongside a failure status
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}
