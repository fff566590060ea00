use crate::api::completion::FragmentStream;
use crate::api::models::StreamResponse;
use crate::error::PdfSumError;
use colored::*;
use futures::StreamExt;
use tokio::time::{timeout, Duration};

/// One decoded server-sent event relevant to a completion stream
#[derive(Debug, PartialEq, Eq)]
pub enum SseEvent {
    Fragment(String),
    Done,
}

/// Splits raw response chunks into complete SSE lines.
///
/// Chunks can end mid-line; the tail is held back until its newline arrives.
#[derive(Default)]
pub struct SseLineBuffer {
    incomplete_line: String,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the events completed by it
    pub fn push(&mut self, chunk: &str, verbose: bool) -> Vec<SseEvent> {
        self.incomplete_line.push_str(chunk);

        let Some(last_newline_pos) = self.incomplete_line.rfind('\n') else {
            return Vec::new();
        };
        let complete: String = self.incomplete_line.drain(..=last_newline_pos).collect();

        complete
            .lines()
            .filter_map(|line| parse_line(line, verbose))
            .collect()
    }

    /// Flush whatever is left once the body has ended without a newline
    pub fn finish(&mut self, verbose: bool) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.incomplete_line);
        parse_line(rest.trim_end_matches('\r'), verbose)
    }
}

fn parse_line(line: &str, verbose: bool) -> Option<SseEvent> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let colon_pos = line.find(':')?;
    let field = line[..colon_pos].trim();
    let value = line[colon_pos + 1..].trim_start();

    match field {
        "data" => {
            if value == "[DONE]" {
                return Some(SseEvent::Done);
            }
            match serde_json::from_str::<StreamResponse>(value) {
                Ok(parsed) => {
                    let content: String = parsed
                        .choices
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|choice| choice.delta.and_then(|d| d.content))
                        .collect();
                    if content.is_empty() {
                        None
                    } else {
                        Some(SseEvent::Fragment(content))
                    }
                }
                Err(e) => {
                    if verbose {
                        eprintln!("{}", format!("[AI] JSON parse error: {}", e).dimmed());
                    }
                    None
                }
            }
        }
        _ => {
            if verbose {
                eprintln!("{}", format!("[AI] SSE {}: {}", field, value).dimmed());
            }
            None
        }
    }
}

/// Turn a streaming HTTP response into a stream of content deltas.
///
/// Each chunk must arrive within `timeout_secs`, otherwise the stream ends
/// with `PdfSumError::Timeout`.
pub fn fragment_stream(
    response: reqwest::Response,
    timeout_secs: u64,
    verbose: bool,
) -> FragmentStream {
    Box::pin(async_stream::stream! {
        let mut body = response.bytes_stream();
        let mut lines = SseLineBuffer::new();
        let chunk_timeout = Duration::from_secs(timeout_secs);

        'outer: loop {
            let chunk: bytes::Bytes = match timeout(chunk_timeout, body.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    yield Err(PdfSumError::NetworkError(e));
                    break;
                }
                Ok(None) => {
                    if let Some(SseEvent::Fragment(fragment)) = lines.finish(verbose) {
                        yield Ok(fragment);
                    }
                    break;
                }
                Err(_) => {
                    yield Err(PdfSumError::Timeout);
                    break;
                }
            };
            let text = String::from_utf8_lossy(&chunk).into_owned();

            for event in lines.push(&text, verbose) {
                match event {
                    SseEvent::Fragment(fragment) => {
                        yield Ok(fragment);
                    }
                    SseEvent::Done => break 'outer,
                }
            }
        }
    })
}
