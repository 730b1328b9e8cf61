//! Streaming artifact upload.

use std::sync::Arc;

use relpub_schema::UploadTarget;
use tokio::io::{AsyncRead, BufReader};

use super::artifact::ArtifactFile;
use super::progress::{ProgressReader, ProgressSink};
use crate::registry::{Registry, RegistryError, UploadBody};

/// Default read-buffer size for uploads (50 MiB).
pub const DEFAULT_BUFFER_SIZE: usize = 50 * 1024 * 1024;

/// Tuning for [`upload_artifact`].
#[derive(Debug, Clone, Copy)]
pub struct UploadOptions {
    /// Capacity of the buffered reader in front of the file. Bounds the
    /// memory held by the upload; not a correctness knob.
    pub buffer_size: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Stream the artifact's bytes to `target`, exactly once.
///
/// When a progress sink is attached it sees every read, and is finished
/// (drained) before this returns. Failures are not retried.
pub async fn upload_artifact<C>(
    registry: &C,
    target: &UploadTarget,
    artifact: ArtifactFile,
    options: UploadOptions,
    progress: Option<Arc<dyn ProgressSink>>,
) -> Result<(), RegistryError>
where
    C: Registry + ?Sized,
{
    let filesize = artifact.filesize();
    tracing::debug!(
        "Uploading {} ({filesize} bytes, {} byte buffer)",
        artifact.filename(),
        options.buffer_size
    );

    let body = upload_body(artifact.into_async(), options, progress.as_ref());
    let result = registry.upload(target, body, filesize).await;

    if let Some(sink) = progress {
        sink.finish();
    }

    result
}

/// Buffer `source` and attach the progress sink, if any.
fn upload_body<S>(
    source: S,
    options: UploadOptions,
    progress: Option<&Arc<dyn ProgressSink>>,
) -> UploadBody
where
    S: AsyncRead + Send + Sync + Unpin + 'static,
{
    let reader = BufReader::with_capacity(options.buffer_size, source);
    match progress {
        Some(sink) => Box::new(ProgressReader::new(reader, Arc::clone(sink))),
        None => Box::new(reader),
    }
}
