//! Multipart upload extraction shared by the API and dashboard handlers.

use axum::body::Bytes;
use axum::extract::Multipart;

use super::error::ApiError;

/// Form field carrying the image.
pub const FILE_FIELD: &str = "file";

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied file name; empty when the browser sent no file.
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Find the `file` field and read it fully. Other fields are skipped.
///
/// Returns `Ok(None)` when the form has no `file` field.
pub async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Upload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), format!("failed to read upload: {e}")))?;
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}
