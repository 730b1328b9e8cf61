//! Registration client interface.
//!
//! The registry persists release metadata and hands out the upload target
//! for the artifact bytes. Transport and retry policy belong to the
//! implementation; the pipeline only consumes results.

mod http;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use relpub_schema::{Release, ReleaseDescriptor, UploadTarget};
use thiserror::Error;
use tokio::io::AsyncRead;

pub use http::HttpRegistry;

/// Byte stream handed to [`Registry::upload`].
pub type UploadBody = Box<dyn AsyncRead + Send + Sync + Unpin>;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Structured error returned by the registry.
    #[error("{code} - {title}: {detail}")]
    Api {
        code: String,
        title: String,
        detail: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from registry: HTTP {status}")]
    Status { status: u16 },

    #[error("registry returned no upload target for release {0}")]
    MissingUploadTarget(String),

    #[error("upload rejected by storage: HTTP {status}")]
    Transfer { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// Code used when the registry omits one.
    pub const DEFAULT_CODE: &'static str = "API_ERROR";
}

#[async_trait]
pub trait Registry: Send + Sync {
    /// Create or update the release described by `descriptor`.
    ///
    /// Re-registering the same product/version/platform/channel updates
    /// the existing release instead of creating a duplicate.
    async fn upsert_release(&self, descriptor: &ReleaseDescriptor)
    -> Result<Release, RegistryError>;

    /// Send `content_length` bytes from `body` to `target`.
    async fn upload(
        &self,
        target: &UploadTarget,
        body: UploadBody,
        content_length: u64,
    ) -> Result<(), RegistryError>;
}
