//! # Cloudinary Upload
//!
//! Unsigned image uploads for product photos.
//!
//! ```text
//! upload_file("remera.jpg")
//!      │
//!      ▼
//! POST https://api.cloudinary.com/v1_1/{cloud}/image/upload
//!      multipart: file=<bytes>, upload_preset=<preset>
//!      │
//!      ├── 2xx ──► { "secure_url": "https://res.cloudinary.com/..." }
//!      └── else ─► { "error": { "message": "..." } } → ApiError::Upload
//! ```
//!
//! Goes straight to Cloudinary through the same [`HttpTransport`], without
//! the backend's bearer or tenant headers.

use reqwest::Method;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

use crate::config::CloudinarySettings;
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, FilePart, HttpTransport, RequestBody};

const CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1";

#[derive(Deserialize)]
struct UploadReply {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Deserialize)]
struct UploadErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryUploader {
    cloud_name: String,
    upload_preset: String,
    transport: Arc<dyn HttpTransport>,
}

impl CloudinaryUploader {
    pub fn new(
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        CloudinaryUploader {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            transport,
        }
    }

    /// Builds an uploader from config, failing when either setting is absent.
    pub fn from_settings(settings: &CloudinarySettings, transport: Arc<dyn HttpTransport>) -> ApiResult<Self> {
        let cloud_name = settings
            .cloud_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::MissingSetting("cloudinary.cloud_name".into()))?;
        let upload_preset = settings
            .upload_preset
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::MissingSetting("cloudinary.upload_preset".into()))?;

        Ok(Self::new(cloud_name, upload_preset, transport))
    }

    pub fn endpoint(&self) -> ApiResult<Url> {
        Ok(Url::parse(&format!(
            "{}/{}/image/upload",
            CLOUDINARY_API, self.cloud_name
        ))?)
    }

    /// Uploads raw bytes and returns the `secure_url`.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<String> {
        if bytes.is_empty() {
            return Err(ApiError::Upload(format!("{} is empty", file_name)));
        }

        let size = bytes.len();
        let request = ApiRequest::new(Method::POST, self.endpoint()?).body(RequestBody::Multipart {
            fields: vec![("upload_preset".to_string(), self.upload_preset.clone())],
            file: FilePart {
                field: "file".to_string(),
                file_name: file_name.to_string(),
                bytes,
            },
        });

        let response = self.transport.send(request).await?;
        let reply: Option<UploadReply> = serde_json::from_str(&response.body).ok();

        if !response.is_success() {
            let message = reply
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            error!(status = response.status, file = %file_name, message = %message, "Cloudinary upload failed");
            return Err(ApiError::Upload(message));
        }

        let url = reply
            .and_then(|r| r.secure_url)
            .ok_or_else(|| ApiError::Upload("response has no secure_url".into()))?;
        info!(file = %file_name, bytes = size, url = %url, "Image uploaded");
        Ok(url)
    }

    /// Reads a file from disk and uploads it.
    pub async fn upload_file(&self, path: &Path) -> ApiResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Upload(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.upload(&file_name, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use serde_json::json;

    fn uploader() -> (CloudinaryUploader, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        (
            CloudinaryUploader::new("demo-cloud", "unsigned_vitrina", transport.clone()),
            transport,
        )
    }

    #[tokio::test]
    async fn test_upload_sends_multipart() {
        let (uploader, transport) = uploader();
        transport.push_json(200, json!({ "secure_url": "https://res.cloudinary.com/demo/a.jpg" }));

        let url = uploader.upload("a.jpg", vec![1, 2, 3]).await.unwrap();

        assert_eq!(url, "https://res.cloudinary.com/demo/a.jpg");
        let request = &transport.requests()[0];
        assert_eq!(
            request.url.as_str(),
            "https://api.cloudinary.com/v1_1/demo-cloud/image/upload"
        );
        assert_eq!(request.header_value("authorization"), None);
        match &request.body {
            RequestBody::Multipart { fields, file } => {
                assert_eq!(fields, &vec![("upload_preset".to_string(), "unsigned_vitrina".to_string())]);
                assert_eq!(file.field, "file");
                assert_eq!(file.bytes, vec![1, 2, 3]);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_error_message() {
        let (uploader, transport) = uploader();
        transport.push_json(400, json!({ "error": { "message": "Upload preset not found" } }));

        let err = uploader.upload("a.jpg", vec![1]).await.unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: Upload preset not found");
    }

    #[test]
    fn test_from_settings_requires_both() {
        let transport: Arc<dyn HttpTransport> = Arc::new(RecordingTransport::new());
        let settings = CloudinarySettings {
            cloud_name: Some("demo".into()),
            upload_preset: None,
        };

        let err = CloudinaryUploader::from_settings(&settings, transport).err().unwrap();
        assert!(matches!(err, ApiError::MissingSetting(_)));
    }
}
