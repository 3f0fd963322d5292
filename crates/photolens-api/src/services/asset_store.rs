//! Media upload relay.

use std::time::Duration;

use async_trait::async_trait;
use photolens_core::{CloudinaryConfig, Error, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

/// Upload timeout in seconds.
const UPLOAD_TIMEOUT_SECS: u64 = 60;

/// One upload with already-sanitized metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpload {
    /// File reference accepted by the store (data URI, base64 or remote URL).
    pub file: String,
    /// Comma-delimited tags.
    pub tags: String,
    /// Pipe-delimited `key=value` context.
    pub context: String,
}

/// Destination for uploaded media.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload and return the store's response document.
    async fn upload(&self, upload: &AssetUpload) -> Result<Value>;
}

/// Unsigned Cloudinary uploads through an upload preset.
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AssetStore for CloudinaryStore {
    async fn upload(&self, upload: &AssetUpload) -> Result<Value> {
        let form = [
            ("file", upload.file.as_str()),
            ("upload_preset", self.config.upload_preset.as_str()),
            ("tags", upload.tags.as_str()),
            ("context", upload.context.as_str()),
        ];

        let response = self
            .client
            .post(self.config.upload_url())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "upload",
                component = "cloudinary",
                op = "upload",
                status = status.as_u16(),
                "Upload rejected by media store"
            );
            return Err(Error::Upstream(format!(
                "Upload failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse upload response: {}", e)))?;

        let public_id = document
            .get("public_id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("-");
        info!(
            subsystem = "upload",
            component = "cloudinary",
            op = "upload",
            public_id = public_id,
            "Upload stored"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> CloudinaryStore {
        CloudinaryStore::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            upload_preset: "unsigned_preset".to_string(),
            base_url: server.uri(),
        })
        .unwrap()
    }

    fn upload() -> AssetUpload {
        AssetUpload {
            file: "data:image/png;base64,iVBORw==".to_string(),
            tags: "portrait,ip:1.2.3.4".to_string(),
            context: "source=app|ip=1.2.3.4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_posts_form_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .and(body_string_contains("upload_preset=unsigned_preset"))
            .and(body_string_contains("tags=portrait%2Cip%3A1.2.3.4"))
            .and(body_string_contains("context=source%3Dapp%7Cip%3D1.2.3.4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "abc123",
                "secure_url": "https://res.cloudinary.com/demo/image/upload/abc123.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let document = store_for(&server).upload(&upload()).await.unwrap();
        assert_eq!(document["public_id"], "abc123");
    }

    #[tokio::test]
    async fn test_upload_failure_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Upload preset not found" }
            })))
            .mount(&server)
            .await;

        let err = store_for(&server).upload(&upload()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert!(err.to_string().contains("Upload preset not found"));
    }
}
