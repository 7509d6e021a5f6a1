use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{status_error, ImageSynthesis, ImageVault, ProviderError};
use crate::config;

/// Client for the text-to-image synthesis API. The prompt travels as a
/// multipart form field; the response body is the raw image.
pub struct ImageSynthesisClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl ImageSynthesisClient {
    pub fn from_env() -> Self {
        Self::new(
            config::IMAGE_SYNTH_ENDPOINT.as_str(),
            config::IMAGE_SYNTH_API_KEY.as_str(),
        )
    }

    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .expect("client build"),
        }
    }
}

#[async_trait]
impl ImageSynthesis for ImageSynthesisClient {
    async fn generate(&self, prompt: &str) -> Result<Bytes, ProviderError> {
        let form = reqwest::multipart::Form::new().text("prompt", prompt.to_owned());
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.bytes().await?)
    }
}

/// Client for the image vault: stores images and requests transformations of
/// already-stored images by id. Uploads carry the image as a base64 data URI.
pub struct ImageVaultClient {
    base: String,
    token: String,
    client: Client,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct EditResponse {
    secure_url: String,
}

impl ImageVaultClient {
    pub fn from_env() -> Self {
        Self::new(
            config::IMAGE_VAULT_ADDR.as_str(),
            config::IMAGE_VAULT_TOKEN.as_str(),
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

    async fn upload(
        &self,
        image: &Bytes,
        effect: Option<&str>,
    ) -> Result<UploadResponse, ProviderError> {
        let data_uri = format!("data:image/png;base64,{}", BASE64.encode(image));
        let mut body = json!({ "file": data_uri });
        if let Some(effect) = effect {
            body["transformation"] = json!({ "effect": effect });
        }
        let resp = self
            .client
            .post(format!("{}/v1/images", self.base))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ImageVault for ImageVaultClient {
    async fn store(&self, image: Bytes) -> Result<String, ProviderError> {
        Ok(self.upload(&image, None).await?.secure_url)
    }

    async fn remove_background(&self, image: Bytes) -> Result<String, ProviderError> {
        Ok(self
            .upload(&image, Some("background_removal"))
            .await?
            .secure_url)
    }

    async fn remove_object(&self, image: Bytes, object: &str) -> Result<String, ProviderError> {
        let stored = self.upload(&image, None).await?;
        let resp = self
            .client
            .post(format!("{}/v1/images/{}/edits", self.base, stored.public_id))
            .bearer_auth(&self.token)
            .json(&json!({ "effect": "gen_remove", "target": object }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let edit: EditResponse = resp.json().await?;
        Ok(edit.secure_url)
    }
}
