use std::path::Path;

use reqwest::{header::CONTENT_TYPE, Client};
use tokio::fs;
use tracing::info;

use crate::{Error, Result, UploadConfig};

/// Uploads output files to an S3-compatible object store with a plain `PUT`.
/// Signing is left to whoever hands out the presigned URL or the auth headers.
#[derive(Debug, Clone)]
pub struct ObjectStoreUploader {
    client: Client,
    config: UploadConfig,
}

impl ObjectStoreUploader {
    pub fn new(client: Client, config: UploadConfig) -> Self {
        Self { client, config }
    }

    /// Object key for a file: `{prefix}/{file_name}`, or just the file name without a prefix.
    pub fn object_key(&self, file_name: &str) -> String {
        let prefix = self.config.prefix.trim_matches('/');
        if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{prefix}/{file_name}")
        }
    }

    fn object_url(&self, key: &str) -> String {
        if let Some(url) = &self.config.presigned_url {
            return url.clone();
        }
        format!(
            "{}/{}/{key}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket
        )
    }

    /// Uploads the file once, no retries. Returns the acknowledgement message.
    pub async fn upload(&self, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let body = fs::read(path).await.map_err(|source| Error::OpenFile {
            file: path.to_path_buf(),
            source,
        })?;

        let key = self.object_key(&file_name);
        let upload_err = |reason: String| Error::Upload {
            key: key.clone(),
            reason,
        };
        let mut req = self
            .client
            .put(self.object_url(&key))
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in &self.config.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        // Bad header names or values surface here too.
        let res = req
            .body(body)
            .send()
            .await
            .map_err(|e| upload_err(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(upload_err(format!("Status: {status}")));
        }

        info!(bucket = %self.config.bucket, %key, "uploaded");
        Ok(format!("{file_name} file uploaded"))
    }
}
