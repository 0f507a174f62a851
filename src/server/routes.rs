//! JSON API handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;

use super::AppState;
use super::error::ApiError;
use super::upload::{FILE_FIELD, read_file_field};
use super::wire::{HealthResponse, LabelsResponse, PredictResponse};
use crate::types::PredictionResult;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// `GET /`: static landing page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `POST /predict`: classify the uploaded `file` field.
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut multipart = multipart.map_err(|_| {
        ApiError::bad_request(format!("parameter \"{FILE_FIELD}\" not found in request"))
    })?;

    let upload = read_file_field(&mut multipart).await?.ok_or_else(|| {
        ApiError::bad_request(format!("parameter \"{FILE_FIELD}\" not found in request"))
    })?;
    if upload.file_name.is_empty() {
        return Err(ApiError::bad_request("no file selected"));
    }

    let result = run_pipeline(&state, upload.bytes.to_vec()).await?;
    Ok(Json(result.into()))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version_string(),
        classifier: state.pipeline.classifier_name().to_string(),
        labels: state.pipeline.labels().len(),
        recipes: state.pipeline.recipes().len(),
    })
}

/// `GET /labels`: class identifiers in model output order.
pub async fn labels(State(state): State<AppState>) -> Json<LabelsResponse> {
    Json(LabelsResponse {
        labels: state.pipeline.labels().as_slice().to_vec(),
    })
}

/// Run the blocking pipeline off the async executor.
pub(crate) async fn run_pipeline(
    state: &AppState,
    bytes: Vec<u8>,
) -> Result<PredictionResult, ApiError> {
    let pipeline = Arc::clone(&state.pipeline);
    tokio::task::spawn_blocking(move || pipeline.predict(&bytes))
        .await
        .map_err(|e| ApiError::internal_error(format!("prediction task failed: {e}")))?
        .map_err(ApiError::from)
}
