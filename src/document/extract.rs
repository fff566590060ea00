use crate::error::{PdfSumError, Result};

/// Decode document bytes into plain text based on the file extension.
///
/// PDFs go through `pdf_extract`; its form-feed page breaks become blank
/// lines. Anything else is decoded as UTF-8, replacing invalid sequences.
pub fn extract_text(bytes: &[u8], extension: &str) -> Result<String> {
    match extension {
        "pdf" => {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| PdfSumError::Document(format!("failed to extract PDF text: {}", e)))?;
            Ok(join_pages(&text))
        }
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn join_pages(text: &str) -> String {
    text.split('\x0c')
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
