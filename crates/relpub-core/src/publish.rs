//! The publish pipeline: open, describe, register, upload.

use std::path::PathBuf;
use std::sync::Arc;

use relpub_schema::{Release, ReleaseDescriptor};
use thiserror::Error;

use crate::descriptor::{self, DescriptorError, ReleaseInputs};
use crate::io::{ArtifactError, ArtifactFile, ProgressSink, UploadOptions, upload_artifact};
use crate::registry::{Registry, RegistryError};
use crate::reporter::Reporter;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Registry(RegistryError),

    #[error("upload failed: {0}")]
    Upload(RegistryError),
}

/// One artifact to publish, with everything needed to describe it.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub path: PathBuf,
    pub inputs: ReleaseInputs,
    pub upload: UploadOptions,
}

/// Open the artifact and build its descriptor without contacting the
/// registry.
pub fn prepare<R: Reporter + ?Sized>(
    request: &PublishRequest,
    reporter: &R,
) -> Result<(ArtifactFile, ReleaseDescriptor), PublishError> {
    let mut artifact = ArtifactFile::open(&request.path)?;
    let descriptor = descriptor::build(&request.inputs, &mut artifact, reporter)?;
    Ok((artifact, descriptor))
}

/// Publish one release.
///
/// Steps run strictly in order and the first failure ends the run. A
/// release that was registered but whose upload failed is left in place;
/// publishing again upserts the same release.
///
/// `progress` is asked for a sink once registration succeeded, right
/// before the upload starts.
pub async fn publish<C, R, P>(
    request: &PublishRequest,
    registry: &C,
    reporter: &R,
    progress: P,
) -> Result<Release, PublishError>
where
    C: Registry + ?Sized,
    R: Reporter + ?Sized,
    P: FnOnce(&ReleaseDescriptor) -> Option<Arc<dyn ProgressSink>>,
{
    let (artifact, descriptor) = prepare(request, reporter)?;

    tracing::debug!("Registering {} {}", descriptor.filename, descriptor.version);
    let release = registry
        .upsert_release(&descriptor)
        .await
        .map_err(PublishError::Registry)?;

    reporter.info(&format!(
        "uploading {} ({} bytes) for release {}",
        descriptor.filename, descriptor.filesize, release.id
    ));

    upload_artifact(
        registry,
        &release.upload_target,
        artifact,
        request.upload,
        progress(&descriptor),
    )
    .await
    .map_err(PublishError::Upload)?;

    Ok(release)
}
