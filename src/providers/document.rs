use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::{status_error, DocumentTextExtraction, ProviderError};
use crate::config;

/// Client for the document text extraction service. Sends raw PDF bytes and
/// receives per-page text.
pub struct DocExtractClient {
    base: String,
    token: String,
    client: Client,
}

#[derive(Deserialize)]
struct ExtractResponse {
    pages: Vec<String>,
}

impl DocExtractClient {
    pub fn from_env() -> Self {
        Self::new(
            config::DOC_EXTRACT_ADDR.as_str(),
            config::DOC_EXTRACT_TOKEN.as_str(),
        )
    }

    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("client build"),
        }
    }
}

#[async_trait]
impl DocumentTextExtraction for DocExtractClient {
    async fn extract_text(&self, document: Bytes) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(format!("{}/v1/extract", self.base))
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/pdf")
            .body(document)
            .send()
            .await?;
        let status = resp.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST
                | StatusCode::UNSUPPORTED_MEDIA_TYPE
                | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            return Err(ProviderError::Unreadable);
        }
        if !status.is_success() {
            return Err(status_error(resp).await);
        }
        let body: ExtractResponse = resp.json().await?;
        if body.pages.is_empty() {
            return Err(ProviderError::Unreadable);
        }
        Ok(body.pages.join("\n"))
    }
}
