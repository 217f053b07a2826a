use std::path::PathBuf;

use thiserror::Error;

use crate::AssetKind;

/// The bytes were found but could not be turned into the requested asset.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("decoding {0} assets is not supported")]
    Unsupported(AssetKind),
    #[error("malformed {kind}: {reason}")]
    Malformed { kind: AssetKind, reason: String },
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to decode wav: {0}")]
    Wav(#[from] hound::Error),
}

impl DecodeError {
    pub fn malformed(kind: AssetKind, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("out of device memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: u64, available: u64 },
    #[error("device rejected the upload: {0}")]
    Rejected(String),
    #[error("device lost")]
    DeviceLost,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to index archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that cross the [`crate::ResourceManager`] boundary.
///
/// Missing or malformed assets are not errors, they resolve to the fallback asset.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to upload {kind} {name}: {source}")]
    Upload {
        kind: AssetKind,
        name: String,
        #[source]
        source: UploadError,
    },
    #[error("invalid resource manager configuration: {0}")]
    Configuration(String),
}

impl ResourceError {
    pub(crate) fn upload(kind: AssetKind, name: &str, source: UploadError) -> Self {
        log::error!("Failed to upload {} {}: {}", kind, name, source);
        Self::Upload {
            kind,
            name: name.to_string(),
            source,
        }
    }
}
