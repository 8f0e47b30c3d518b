//! Attachment storage on the local filesystem

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
};

/// Accepted MIME types and the extension stored files get
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("application/pdf", ".pdf"),
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredUpload {
    pub ok: bool,
    /// Public URL of the stored file
    pub url: String,
    /// File name as sent by the client
    pub original: String,
    pub size: usize,
    pub mimetype: String,
}

#[derive(Clone)]
pub struct UploadsService {
    config: UploadsConfig,
}

impl UploadsService {
    pub fn new(config: UploadsConfig) -> Self {
        Self { config }
    }

    pub fn max_bytes(&self) -> usize {
        self.config.max_bytes
    }

    pub fn too_large(&self) -> AppError {
        AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte limit",
            self.config.max_bytes
        ))
    }

    /// Validate and write one file, returning where it can be fetched
    pub async fn store(&self, original: Option<String>, mimetype: &str, data: &[u8]) -> AppResult<StoredUpload> {
        let extension = ALLOWED_TYPES
            .iter()
            .find(|(mime, _)| *mime == mimetype)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unsupported file type {}; allowed: PDF, PNG, JPEG",
                    mimetype
                ))
            })?;
        if data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }
        if data.len() > self.config.max_bytes {
            return Err(self.too_large());
        }

        let name = format!("{}-{}{}", Utc::now().timestamp_millis(), Uuid::new_v4(), extension);
        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot create upload directory: {}", e)))?;
        tokio::fs::write(self.config.dir.join(&name), data)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot store upload: {}", e)))?;

        tracing::info!(file = %name, size = data.len(), mimetype, "upload stored");
        Ok(StoredUpload {
            ok: true,
            url: format!("{}/{}", self.config.public_prefix.trim_end_matches('/'), name),
            original: original.unwrap_or_else(|| name.clone()),
            size: data.len(),
            mimetype: mimetype.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &std::path::Path, max_bytes: usize) -> UploadsService {
        UploadsService::new(UploadsConfig {
            dir: dir.to_path_buf(),
            max_bytes,
            public_prefix: "/uploads/".to_string(),
        })
    }

    #[tokio::test]
    async fn stores_allowed_files() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = service(tmp.path(), 1024);

        let stored = uploads
            .store(Some("report.pdf".into()), "application/pdf", b"%PDF-1.4")
            .await
            .unwrap();

        assert!(stored.ok);
        assert_eq!(stored.original, "report.pdf");
        assert_eq!(stored.size, 8);
        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.url.ends_with(".pdf"));

        let name = stored.url.trim_start_matches("/uploads/");
        let written = std::fs::read(tmp.path().join(name)).unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn rejects_other_types() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = service(tmp.path(), 1024);
        let err = uploads.store(None, "text/html", b"<html>").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn rejects_oversize_files() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = service(tmp.path(), 4);
        let err = uploads.store(None, "image/png", b"12345").await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let uploads = service(&nested, 1024);
        uploads.store(None, "image/jpeg", b"\xff\xd8\xff").await.unwrap();
        assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 1);
    }
}
