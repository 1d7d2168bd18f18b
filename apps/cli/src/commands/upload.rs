//! Product image upload to Cloudinary (unsigned preset).

use std::path::Path;

use serde::Serialize;
use vitrina_api::CloudinaryUploader;

use crate::error::CliResult;
use crate::render::Render;
use crate::state::AppContext;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadView {
    pub file: String,
    pub url: String,
}

impl Render for UploadView {
    fn render(&self) -> String {
        self.url.clone()
    }
}

pub async fn image(ctx: &AppContext, path: &Path) -> CliResult<UploadView> {
    let uploader = CloudinaryUploader::from_settings(&ctx.config.config().cloudinary, ctx.transport())?;
    let url = uploader.upload_file(path).await?;
    Ok(UploadView {
        file: path.display().to_string(),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_is_an_upload_error() {
        let (ctx, transport) = context(false).await;

        let err = image(&ctx, Path::new("/nonexistent/remera.jpg")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::UploadError);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_uploads_to_configured_cloud() {
        let (ctx, transport) = context(false).await;
        let path = std::env::temp_dir().join(format!("vitrina-upload-{}.png", std::process::id()));
        std::fs::write(&path, b"png-bytes").unwrap();
        transport.push_json(200, json!({ "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/x.png" }));

        let view = image(&ctx, &path).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(view.url, "https://res.cloudinary.com/demo/image/upload/v1/x.png");
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }
}
