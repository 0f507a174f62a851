//! JSON bodies exchanged over HTTP, shared by the server and the client.

use serde::{Deserialize, Serialize};

use crate::types::PredictionResult;

/// Body of a successful `POST /predict`.
///
/// Field names are the public wire format consumed by existing front-ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: String,
    pub prediksi_nama: String,
    /// Confidence with four decimals, as a string.
    pub akurasi_prediksi: String,
    pub kalori_per_sajian: String,
    pub bahan_utama: String,
    pub cara_membuat: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            status: "success".to_string(),
            prediksi_nama: result.display_name,
            akurasi_prediksi: format!("{:.4}", result.confidence),
            kalori_per_sajian: result.calories,
            bahan_utama: result.ingredients,
            cara_membuat: result.instructions,
        }
    }
}

/// Body of any error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub classifier: String,
    pub labels: usize,
    pub recipes: usize,
}

/// Body of `GET /labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}
