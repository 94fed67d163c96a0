//! Export collaborator: turns saved crops into training-ready files.
//!
//! For every image marked cropped, the source is cropped to its rectangle,
//! resampled with Lanczos3 to the bucket's exact size and written into the
//! output directory under its original filename. Label files sharing the
//! image's stem can be copied alongside.
//!
//! The crop engine never calls into this module; a session only produces
//! the [`ExportRequest`] it consumes.

mod batch;
mod types;

pub use batch::{copy_companions, crop_and_resize, export_batch, find_companions, COMPANION_EXTENSIONS, JPEG_QUALITY};
pub use types::{ExportError, ExportImage, ExportRequest, ExportSummary};
