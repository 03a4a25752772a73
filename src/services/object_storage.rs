//! Storage-write collaborators.
//!
//! [`ObjectStorage`] is the seam the orchestrator writes through. Two
//! implementations ship with the crate:
//!
//! - [`LocalDirStorage`] - objects written under a local directory
//! - `HttpObjectStorage` - objects POSTed to a storage REST endpoint (`http` feature)
//!
//! Timeouts and retries belong to the implementation, never to the caller.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::types::errors::TransportError;
use crate::types::record::StoredObject;

#[async_trait::async_trait(?Send)]
pub trait ObjectStorage {
    /// Writes `bytes` under `key` and returns where the object can be fetched.
    async fn write(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, TransportError>;
}

/// Rejects absolute keys and keys that climb out of their root.
fn checked_relative(key: &str) -> Result<&Path, TransportError> {
    let path = Path::new(key);
    let safe = !key.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(path)
    } else {
        Err(TransportError::Rejected {
            status: 400,
            message: format!("invalid object key: {}", key),
        })
    }
}

/// Writes objects to a directory tree on the local filesystem.
pub struct LocalDirStorage {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl LocalDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_base_url: None,
        }
    }

    /// Public URLs become `<base>/<key>` instead of `file://` paths.
    pub fn with_public_base_url(mut self, base: impl Into<String>) -> Self {
        self.public_base_url = Some(base.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait(?Send)]
impl ObjectStorage for LocalDirStorage {
    async fn write(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, TransportError> {
        let target = self.root.join(checked_relative(key)?);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
        }
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(TransportError::Rejected {
                status: 409,
                message: format!("object already exists: {}", key),
            });
        }
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!(key, bytes = bytes.len(), "object written to local storage");

        let public_url = match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!("file://{}", target.display()),
        };
        Ok(StoredObject {
            key: key.to_string(),
            public_url,
        })
    }
}

#[cfg(feature = "http")]
pub use http::HttpObjectStorage;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use tracing::debug;

    use super::{checked_relative, ObjectStorage};
    use crate::types::config::StorageSettings;
    use crate::types::errors::TransportError;
    use crate::types::record::StoredObject;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Storage REST client: `POST {endpoint}/object/{bucket}/{key}`.
    pub struct HttpObjectStorage {
        client: reqwest::Client,
        endpoint: String,
        bucket: String,
        api_key: Option<String>,
        public_base_url: String,
    }

    impl HttpObjectStorage {
        pub fn new(settings: &StorageSettings) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let endpoint = settings.endpoint.trim_end_matches('/').to_string();
            let public_base_url = match &settings.public_base_url {
                Some(base) => base.trim_end_matches('/').to_string(),
                None => format!("{}/object/public/{}", endpoint, settings.bucket),
            };
            Ok(Self {
                client,
                endpoint,
                bucket: settings.bucket.clone(),
                api_key: settings.api_key.clone(),
                public_base_url,
            })
        }

        pub fn object_url(&self, key: &str) -> String {
            format!("{}/object/{}/{}", self.endpoint, self.bucket, key)
        }

        pub fn public_url(&self, key: &str) -> String {
            format!("{}/{}", self.public_base_url, key)
        }
    }

    #[async_trait::async_trait(?Send)]
    impl ObjectStorage for HttpObjectStorage {
        async fn write(
            &self,
            key: &str,
            bytes: Vec<u8>,
            content_type: &str,
        ) -> Result<StoredObject, TransportError> {
            checked_relative(key)?;
            let mut request = self
                .client
                .post(self.object_url(key))
                .header(CONTENT_TYPE, content_type)
                .header("x-upsert", "false")
                .body(bytes);
            if let Some(api_key) = &self.api_key {
                request = request
                    .header(AUTHORIZATION, format!("Bearer {}", api_key))
                    .header("apikey", api_key);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("upload rejected")
                        .to_string()
                } else {
                    body
                };
                return Err(TransportError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!(key, status = status.as_u16(), "object uploaded");
            Ok(StoredObject {
                key: key.to_string(),
                public_url: self.public_url(key),
            })
        }
    }

}
