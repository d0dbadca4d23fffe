//! Minimal Google Document AI `:process` client.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::DocumentAiConfig;

#[derive(Debug, Error)]
pub enum DocumentAiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document AI returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    document: Option<ProcessedDocument>,
}

#[derive(Debug, Deserialize)]
struct ProcessedDocument {
    #[serde(default)]
    text: String,
}

pub(crate) fn process_body(pdf: &[u8]) -> serde_json::Value {
    json!({
        "rawDocument": {
            "content": STANDARD.encode(pdf),
            "mimeType": "application/pdf"
        }
    })
}

/// Sends the PDF inline and returns the document text (possibly empty).
pub async fn process_pdf(
    http: &reqwest::Client,
    config: &DocumentAiConfig,
    pdf: &[u8],
) -> Result<String, DocumentAiError> {
    let response = http
        .post(config.process_url())
        .bearer_auth(&config.access_token)
        .json(&process_body(pdf))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(DocumentAiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body: ProcessResponse = response.json().await?;
    Ok(body.document.map(|d| d.text).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_body_base64_encodes_pdf() {
        let body = process_body(b"%PDF-1.4");
        assert_eq!(body["rawDocument"]["content"], "JVBERi0xLjQ=");
        assert_eq!(body["rawDocument"]["mimeType"], "application/pdf");
    }

    #[test]
    fn test_response_without_document_is_empty() {
        let parsed: ProcessResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.document.is_none());
        let parsed: ProcessResponse = serde_json::from_str(r#"{"document": {"text": "Jane"}}"#).unwrap();
        assert_eq!(parsed.document.unwrap().text, "Jane");
    }
}
