use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

pub mod document;
pub mod image;
pub mod text;

pub use document::DocExtractClient;
pub use image::{ImageSynthesisClient, ImageVaultClient};
pub use text::ChatCompletionClient;

/// Failure of one external provider call. No retries anywhere; every failure
/// is terminal for the request.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("provider response missing {0}")]
    Malformed(&'static str),
    #[error("document could not be read")]
    Unreadable,
}

pub(crate) async fn status_error(resp: reqwest::Response) -> ProviderError {
    let status = resp.status().as_u16();
    let detail = resp.text().await.unwrap_or_default();
    ProviderError::Status { status, detail }
}

/// Single request/response text completion, no streaming.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

/// Text-to-image synthesis. Returned bytes are opaque and handed unmodified
/// to the image vault.
#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError>;
}

/// Image storage plus transformation-by-reference. Transformations operate on
/// a stored image; the service does not transform unsaved bytes.
#[async_trait]
pub trait ImageVault: Send + Sync {
    async fn store(&self, image: Bytes) -> Result<String, ProviderError>;
    async fn remove_background(&self, image: Bytes) -> Result<String, ProviderError>;
    async fn remove_object(&self, image: Bytes, object: &str) -> Result<String, ProviderError>;
}

/// PDF text extraction. Multi-page documents come back as per-page text
/// joined in page order.
#[async_trait]
pub trait DocumentTextExtraction: Send + Sync {
    async fn extract_text(&self, document: Bytes) -> Result<String, ProviderError>;
}

/// The provider bundle handlers receive through an `Extension` layer. Tests
/// swap in doubles per trait.
#[derive(Clone)]
pub struct Providers {
    pub text: Arc<dyn TextCompletion>,
    pub images: Arc<dyn ImageSynthesis>,
    pub vault: Arc<dyn ImageVault>,
    pub documents: Arc<dyn DocumentTextExtraction>,
}

impl Providers {
    pub fn from_env() -> Self {
        Self {
            text: Arc::new(ChatCompletionClient::from_env()),
            images: Arc::new(ImageSynthesisClient::from_env()),
            vault: Arc::new(ImageVaultClient::from_env()),
            documents: Arc::new(DocExtractClient::from_env()),
        }
    }
}
