//! IO modules - side effects (filesystem, hashing passes, upload streams)

pub mod artifact;
pub mod digest;
pub mod progress;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use artifact::{ArtifactError, ArtifactFile, with_rewind};
pub use progress::{ByteCounter, ProgressReader, ProgressSink};
pub use upload::{DEFAULT_BUFFER_SIZE, UploadOptions, upload_artifact};
