//! Export hand-off types and errors.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::{BucketDimensions, BucketId};
use crate::geometry::CropRect;

/// Errors raised while exporting a single image or preparing a batch.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory could not be created.
    #[error("Cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source image could not be opened or decoded.
    #[error("Cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The crop does not fit inside the decoded image.
    #[error("Crop {crop:?} does not fit a {width}x{height} image")]
    CropOutOfBounds { crop: CropRect, width: u32, height: u32 },

    /// The image's bucket has no target dimensions in the request.
    #[error("No dimensions for bucket {0}")]
    MissingBucket(BucketId),

    /// The filename has no usable final component.
    #[error("Invalid output filename: {0:?}")]
    InvalidFilename(String),

    /// Creating the output file failed.
    #[error("Cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the output image failed.
    #[error("Cannot encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// One image as handed to the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportImage {
    pub path: String,
    pub filename: String,
    pub assigned_bucket: BucketId,
    /// True only for saved crops; everything else is skipped.
    pub cropped: bool,
    pub crop_params: Option<CropRect>,
}

fn default_copy_companions() -> bool {
    true
}

/// A full export batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub images: Vec<ExportImage>,
    pub buckets: BTreeMap<BucketId, BucketDimensions>,
    /// Opaque destination chosen by the caller.
    pub output_dir: PathBuf,
    #[serde(default = "default_copy_companions")]
    pub copy_companions: bool,
}

/// Per-batch outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}
