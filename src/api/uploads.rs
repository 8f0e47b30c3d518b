//! Attachment upload endpoint

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::Multipart;

use crate::{
    error::{AppError, AppResult},
    services::uploads::StoredUpload,
    AppState,
};

use super::AuthenticatedUser;

const FILE_FIELD: &str = "file";

/// Upload one attachment (PDF, PNG or JPEG) in the multipart field `file`
#[utoipa::path(
    post,
    path = "/uploads",
    tag = "uploads",
    security(("bearer_auth" = [])),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Multipart body with a `file` field"),
    responses(
        (status = 201, description = "File stored", body = StoredUpload),
        (status = 400, description = "Missing file or unsupported type", body = crate::error::ErrorResponse),
        (status = 413, description = "File too large", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredUpload>)> {
    let uploads = &state.services.uploads;
    let malformed = |e: axum_extra::extract::multipart::MultipartError| {
        AppError::Validation(format!("Malformed multipart body: {}", e))
    };

    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original = field.file_name().map(str::to_string);
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(malformed)? {
            if data.len() + chunk.len() > uploads.max_bytes() {
                return Err(uploads.too_large());
            }
            data.extend_from_slice(&chunk);
        }

        tracing::debug!(user = %ctx.username, ?original, %mimetype, "upload received");
        let stored = uploads.store(original, &mimetype, &data).await?;
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(AppError::Validation(format!("Missing multipart field `{}`", FILE_FIELD)))
}
