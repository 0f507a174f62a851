//! HTTP-level tests for the JSON API and dashboard, driven through the
//! router with `tower::ServiceExt::oneshot` (no sockets).

#![cfg(feature = "server")]

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use letthemcook::providers::Classifier;
use letthemcook::server::wire::{ErrorResponse, HealthResponse, LabelsResponse, PredictResponse};
use letthemcook::server::{ServerConfig, router};
use letthemcook::types::{DATA_NOT_AVAILABLE, RECIPE_NOT_ADDED};
use letthemcook::{ImageTensor, PredictionPipeline, RecipeStore, Result};

// ============================================================================
// Fixtures
// ============================================================================

/// Scores the first three classes by mean red, green and blue intensity.
struct ColorClassifier;

impl Classifier for ColorClassifier {
    fn name(&self) -> &str {
        "color"
    }

    fn input_size(&self) -> (u32, u32) {
        (8, 8)
    }

    fn infer(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let mut scores = vec![0.0f32; 5];
        for pixel in tensor.as_slice().chunks(3) {
            for (score, value) in scores.iter_mut().zip(pixel) {
                *score += value;
            }
        }
        let total: f32 = scores.iter().sum();
        if total > 0.0 {
            scores.iter_mut().for_each(|s| *s /= total);
        }
        Ok(scores)
    }
}

const RECIPES: &str = r#"{
    "apple_pie": {
        "nama": "Pai Apel",
        "kalori_per_sajian": "296 kkal",
        "bahan_utama": "apel, tepung, mentega",
        "cara_membuat": "1. Buat adonan\n2. Panggang"
    },
    "beef_tartare": { "nama": "<script>alert(1)</script>" }
}"#;

const BOUNDARY: &str = "cook-test-boundary";

fn app_with(config: ServerConfig) -> Router {
    let pipeline = PredictionPipeline::builder()
        .classifier(Arc::new(ColorClassifier))
        .recipes(RecipeStore::from_json_str(RECIPES).unwrap())
        .build()
        .unwrap();
    router(Arc::new(pipeline), &config)
}

fn app() -> Router {
    app_with(ServerConfig::default())
}

fn png(color: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(10, 10, image::Rgb(color));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Build a single-part multipart/form-data body.
fn multipart(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ============================================================================
// POST /predict
// ============================================================================

#[tokio::test]
async fn predict_returns_recipe_for_top_class() {
    let response = app()
        .oneshot(upload_request(
            "/predict",
            multipart("file", "pie.png", &png([255, 0, 0])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: PredictResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.status, "success");
    assert_eq!(body.prediksi_nama, "Pai Apel");
    assert_eq!(body.akurasi_prediksi, "1.0000");
    assert_eq!(body.kalori_per_sajian, "296 kkal");
    assert_eq!(body.bahan_utama, "apel, tepung, mentega");
    assert_eq!(body.cara_membuat, "1. Buat adonan\n2. Panggang");
}

#[tokio::test]
async fn predict_uses_placeholders_for_unknown_recipe() {
    let response = app()
        .oneshot(upload_request(
            "/predict",
            multipart("file", "ribs.jpg", &png([0, 255, 0])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: PredictResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.prediksi_nama, "Baby Back Ribs");
    assert_eq!(body.kalori_per_sajian, DATA_NOT_AVAILABLE);
    assert_eq!(body.bahan_utama, DATA_NOT_AVAILABLE);
    assert_eq!(body.cara_membuat, RECIPE_NOT_ADDED);
}

#[tokio::test]
async fn predict_confidence_has_four_decimals() {
    let response = app()
        .oneshot(upload_request(
            "/predict",
            multipart("file", "mixed.png", &png([200, 100, 50])),
        ))
        .await
        .unwrap();
    let body: PredictResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();

    let (_, decimals) = body.akurasi_prediksi.split_once('.').unwrap();
    assert_eq!(decimals.len(), 4);
    let value: f32 = body.akurasi_prediksi.parse().unwrap();
    assert!((0.0..=1.0).contains(&value));
}

#[tokio::test]
async fn predict_without_multipart_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::from("hello"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body.error.contains("\"file\""), "got {}", body.error);
}

#[tokio::test]
async fn predict_with_wrong_field_is_bad_request() {
    let response = app()
        .oneshot(upload_request(
            "/predict",
            multipart("image", "pie.png", &png([255, 0, 0])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body.error.contains("not found"));
}

#[tokio::test]
async fn predict_with_empty_filename_is_bad_request() {
    let response = app()
        .oneshot(upload_request("/predict", multipart("file", "", b"")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.error, "no file selected");
}

#[tokio::test]
async fn predict_with_non_image_is_server_error() {
    let response = app()
        .oneshot(upload_request(
            "/predict",
            multipart("file", "notes.txt", b"just some text"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body.error.contains("decode"), "got {}", body.error);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 256,
        ..ServerConfig::default()
    };
    let response = app_with(config)
        .oneshot(upload_request(
            "/predict",
            multipart("file", "big.png", &vec![0u8; 4096]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// Service endpoints
// ============================================================================

#[tokio::test]
async fn health_reports_loaded_assets() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.status, "ok");
    assert_eq!(body.classifier, "color");
    assert_eq!(body.labels, 5);
    assert_eq!(body.recipes, 2);
    assert!(body.version.starts_with(letthemcook::PKG_VERSION));
}

#[tokio::test]
async fn labels_are_in_model_order() {
    let response = app().oneshot(get("/labels")).await.unwrap();
    let body: LabelsResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body.labels,
        vec![
            "apple_pie",
            "baby_back_ribs",
            "baklava",
            "beef_carpaccio",
            "beef_tartare"
        ]
    );
}

#[tokio::test]
async fn index_serves_landing_page() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(response).await.contains("/predict"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn cors_can_be_disabled() {
    let config = ServerConfig {
        cors: false,
        ..ServerConfig::default()
    };
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app_with(config).oneshot(request).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn dashboard_page_has_upload_form() {
    let response = app().oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"enctype="multipart/form-data""#));
}

#[tokio::test]
async fn dashboard_renders_prediction() {
    let response = app()
        .oneshot(upload_request(
            "/dashboard",
            multipart("file", "Pie.PNG", &png([255, 0, 0])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Pai Apel"));
    assert!(html.contains("100.00%"));
    assert!(html.contains("296 kkal"));
    assert!(html.contains("1. Buat adonan<br>2. Panggang"));
}

#[tokio::test]
async fn dashboard_shows_uploaded_image() {
    use base64::Engine;

    let image = png([255, 0, 0]);
    let response = app()
        .oneshot(upload_request(
            "/dashboard",
            multipart("file", "Pie.PNG", &image),
        ))
        .await
        .unwrap();

    let html = body_text(response).await;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&image);
    assert!(html.contains(&format!("data:image/png;base64,{encoded}")));
    assert!(html.contains("<figcaption>Pie.PNG</figcaption>"));
}

/// Always picks the last class (`beef_tartare`).
struct TartareClassifier;

impl Classifier for TartareClassifier {
    fn name(&self) -> &str {
        "tartare"
    }

    fn input_size(&self) -> (u32, u32) {
        (8, 8)
    }

    fn infer(&self, _tensor: &ImageTensor) -> Result<Vec<f32>> {
        Ok(vec![0.05, 0.05, 0.1, 0.1, 0.7])
    }
}

#[tokio::test]
async fn dashboard_escapes_recipe_markup() {
    let pipeline = PredictionPipeline::builder()
        .classifier(Arc::new(TartareClassifier))
        .recipes(RecipeStore::from_json_str(RECIPES).unwrap())
        .build()
        .unwrap();
    let app = router(Arc::new(pipeline), &ServerConfig::default());

    let response = app
        .oneshot(upload_request(
            "/dashboard",
            multipart("file", "tartare.jpg", &png([10, 10, 10])),
        ))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("70.00%"));
}

#[tokio::test]
async fn dashboard_rejects_unsupported_extension() {
    let response = app()
        .oneshot(upload_request(
            "/dashboard",
            multipart("file", "anim.gif", &png([255, 0, 0])),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Unsupported file"));
    assert!(!html.contains("Pai Apel"));
}

#[tokio::test]
async fn dashboard_without_file_is_bad_request() {
    let response = app()
        .oneshot(upload_request("/dashboard", multipart("file", "", b"")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Please choose an image"));
}

#[tokio::test]
async fn dashboard_reports_processing_failure_inline() {
    let response = app()
        .oneshot(upload_request(
            "/dashboard",
            multipart("file", "broken.jpg", b"\xff\xd8 not really a jpeg"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Something went wrong"));
}
