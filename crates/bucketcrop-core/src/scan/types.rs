//! Scan result types and errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{Bucket, BucketId, Orientation};

/// Errors raised while scanning a folder.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The folder does not exist.
    #[error("Folder not found: {0:?}")]
    FolderNotFound(PathBuf),

    /// The path exists but is not a directory.
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// Walking the directory tree failed.
    #[error("Failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The folder contains no readable image in a supported format.
    #[error("No supported images found in {0:?}")]
    NoImages(PathBuf),
}

/// One image found by a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedImage {
    pub path: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    /// Bucket chosen from the orientation.
    pub assigned_bucket: BucketId,
}

impl ScannedImage {
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

/// Seed for a session: classified images plus proposed buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub images: Vec<ScannedImage>,
    pub buckets: Vec<Bucket>,
}
