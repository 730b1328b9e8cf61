//! The release artifact on disk.
//!
//! The artifact is read in full three times (checksum, signature, upload).
//! Each pass goes through [`with_rewind`] so the next one starts at byte 0.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::paths::{ExpandError, expand_home};

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("path \"{}\" is not expandable ({source})", .path.display())]
    NotExpandable { path: PathBuf, source: ExpandError },

    #[error("path \"{}\" is not readable ({source})", .path.display())]
    NotReadable { path: PathBuf, source: io::Error },

    #[error("path \"{}\" is a directory (must be a file)", .path.display())]
    Directory { path: PathBuf },
}

/// An open, seekable release artifact with its name and size.
///
/// The file is closed when this value is dropped, which covers every exit
/// path of the pipeline.
#[derive(Debug)]
pub struct ArtifactFile {
    file: File,
    path: PathBuf,
    filename: String,
    filesize: u64,
}

impl ArtifactFile {
    /// Open the artifact at `path`, expanding a leading `~`.
    ///
    /// # Errors
    ///
    /// Fails if the path cannot be expanded, opened or stat'ed, or if it
    /// names a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let raw = path.as_ref();
        let path = expand_home(raw).map_err(|source| ArtifactError::NotExpandable {
            path: raw.to_path_buf(),
            source,
        })?;

        let not_readable = |source| ArtifactError::NotReadable {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).map_err(not_readable)?;
        let meta = file.metadata().map_err(not_readable)?;

        if meta.is_dir() {
            return Err(ArtifactError::Directory { path });
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file,
            filename,
            filesize: meta.len(),
            path,
        })
    }

    /// Resolved path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Basename of the artifact path.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Size in bytes at open time.
    pub fn filesize(&self) -> u64 {
        self.filesize
    }

    /// Run one full-stream pass over the file, then seek back to the start.
    pub fn pass<T, E>(&mut self, f: impl FnOnce(&mut File) -> Result<T, E>) -> Result<T, E>
    where
        E: From<io::Error>,
    {
        with_rewind(&mut self.file, f)
    }

    /// Hand the file over to tokio for the upload pass.
    pub fn into_async(self) -> tokio::fs::File {
        tokio::fs::File::from_std(self.file)
    }
}

/// Run `pass` over `stream`, then reset the read position to byte 0.
///
/// The rewind happens whether or not `pass` failed. If the pass failed its
/// error is returned; otherwise a failed rewind is reported.
pub fn with_rewind<S, T, E>(
    stream: &mut S,
    pass: impl FnOnce(&mut S) -> Result<T, E>,
) -> Result<T, E>
where
    S: Seek,
    E: From<io::Error>,
{
    let result = pass(stream);
    let rewound = stream.seek(SeekFrom::Start(0));
    let value = result?;
    rewound?;
    Ok(value)
}
