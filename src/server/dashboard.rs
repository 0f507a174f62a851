//! Interactive dashboard: upload an image, get a rendered result panel.
//!
//! Server-rendered HTML so it works without JavaScript. Each submission is
//! independent; nothing is kept between requests.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::AppState;
use super::routes::run_pipeline;
use super::upload::{Upload, read_file_field};
use crate::types::PredictionResult;

/// Upload extensions the dashboard accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const ALTERNATIVES_SHOWN: usize = 3;

/// `GET /dashboard`
pub async fn page() -> Html<String> {
    Html(render_page(None))
}

/// `POST /dashboard`
pub async fn submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Html<String>) {
    let upload = match multipart {
        Ok(mut multipart) => read_file_field(&mut multipart).await,
        Err(_) => Ok(None),
    };

    let upload = match upload {
        Ok(Some(upload)) if !upload.file_name.is_empty() => upload,
        Ok(_) => return render_error(StatusCode::BAD_REQUEST, "Please choose an image to upload."),
        Err(e) => return render_error(e.status, &e.message),
    };

    let accepted = upload
        .extension()
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
    if !accepted {
        return render_error(
            StatusCode::OK,
            &format!(
                "Unsupported file '{}'. Upload a JPG, JPEG or PNG image.",
                upload.file_name
            ),
        );
    }

    match run_pipeline(&state, upload.bytes.to_vec()).await {
        Ok(result) => {
            let panel = format!(
                "{}{}",
                render_preview(&upload),
                render_result(&result, state.pipeline.labels().as_slice())
            );
            (StatusCode::OK, Html(render_page(Some(&panel))))
        }
        Err(e) => render_error(
            StatusCode::OK,
            &format!("Something went wrong while processing the image: {}", e.message),
        ),
    }
}

fn render_error(status: StatusCode, message: &str) -> (StatusCode, Html<String>) {
    let panel = format!(
        r#"<div class="error">{}</div>"#,
        escape_html(message)
    );
    (status, Html(render_page(Some(&panel))))
}

/// Confidence as a percentage with two decimals, e.g. `0.91234` → `91.23%`.
pub fn format_percent(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}

/// MIME type for an accepted upload extension.
fn mime_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        _ => "image/jpeg",
    }
}

/// The uploaded image inlined as a `data:` URI, captioned with its file name.
fn render_preview(upload: &Upload) -> String {
    let mime = mime_type(upload.extension().as_deref().unwrap_or_default());
    format!(
        r#"<figure class="preview">
  <img src="data:{mime};base64,{data}" alt="{name}">
  <figcaption>{name}</figcaption>
</figure>"#,
        data = STANDARD.encode(&upload.bytes),
        name = escape_html(&upload.file_name),
    )
}

fn render_result(result: &PredictionResult, labels: &[String]) -> String {
    let alternatives: String = result
        .top_k(labels, ALTERNATIVES_SHOWN)
        .into_iter()
        .map(|(label, p)| {
            format!(
                "<li>{} <span class=\"muted\">{}</span></li>",
                escape_html(&crate::types::humanize(label)),
                format_percent(p)
            )
        })
        .collect();

    format!(
        r#"<div class="result">
  <h2>Prediction: {name}</h2>
  <p class="metric">Model confidence <strong>{confidence}</strong></p>
  <hr>
  <p class="info"><strong>Main ingredients:</strong> {ingredients}</p>
  <p class="warn"><strong>Estimated calories per serving:</strong> {calories}</p>
  <h3>Instructions</h3>
  <p>{instructions}</p>
  <h3>Top classes</h3>
  <ul>{alternatives}</ul>
</div>"#,
        name = escape_html(&result.display_name),
        confidence = format_percent(result.confidence),
        ingredients = escape_html(&result.ingredients),
        calories = escape_html(&result.calories),
        instructions = escape_html(&result.instructions).replace('\n', "<br>"),
        alternatives = alternatives,
    )
}

fn render_page(panel: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Let Them Cook</title>
<style>
body {{ font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }}
.error {{ color: #b00020; }}
.info {{ background: #e8f0fe; padding: .5rem; }}
.warn {{ background: #fff4e5; padding: .5rem; }}
.muted {{ color: #777; }}
.preview img {{ max-width: 100%; max-height: 360px; }}
</style>
</head>
<body>
<h1>Let Them Cook: image-based recipe discovery</h1>
<p>Upload a food photo (JPG, JPEG, PNG) to identify the dish and get its recipe.</p>
<form method="post" action="/dashboard" enctype="multipart/form-data">
  <input type="file" name="file" accept=".jpg,.jpeg,.png">
  <button type="submit">Predict and find recipe</button>
</form>
{panel}
</body>
</html>"#,
        panel = panel.unwrap_or_default()
    )
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
