use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why an asset (or a whole asset tree) was not loaded.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset directory {path:?} does not exist or is not a directory")]
    RootMissing { path: PathBuf },
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{kind} limit of {limit} reached")]
    CapacityExceeded { kind: &'static str, limit: usize },
    #[error("an asset named '{name}' is already loaded")]
    DuplicateName { name: String },
    #[error("invalid animation sheet {path:?}: {reason}")]
    InvalidSheet { path: PathBuf, reason: String },
}

impl AssetError {
    /// Capacity and duplicate-name rejections, as opposed to read or decode
    /// failures of the source file.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AssetError::CapacityExceeded { .. } | AssetError::DuplicateName { .. }
        )
    }
}
