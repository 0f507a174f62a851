//! [`PredictClient`], an HTTP client for the cookd JSON API.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::server::wire::{ErrorResponse, HealthResponse, LabelsResponse, PredictResponse};
use crate::{CookError, Result};

/// A client for a remote cookd server.
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CookError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload an image file from disk.
    pub async fn predict_file(&self, path: &Path) -> Result<PredictResponse> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        self.predict_bytes(file_name, bytes).await
    }

    /// Upload raw image bytes under the given file name.
    pub async fn predict_bytes(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<PredictResponse> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.into()));
        let response = self
            .http
            .post(format!("{}/predict", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CookError::Http(e.to_string()))?;
        decode(response).await
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| CookError::Http(e.to_string()))?;
        decode(response).await
    }

    /// `GET /labels`
    pub async fn labels(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/labels", self.base_url))
            .send()
            .await
            .map_err(|e| CookError::Http(e.to_string()))?;
        decode::<LabelsResponse>(response).await.map(|r| r.labels)
    }
}

/// Decode a JSON body, turning non-2xx responses into [`CookError::Api`].
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CookError::Http(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        return Err(CookError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
