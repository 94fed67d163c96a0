//! Scan collaborator: finds images and proposes buckets.
//!
//! Images are classified by aspect ratio into landscape, square and
//! portrait, each class going to its own bucket. Bucket sizes are proposed
//! from the median sizes of each class, aligned to the grid unit.
//!
//! The output, a [`ScanResult`], is the seed a
//! [`Session`](crate::session::Session) is built from. Any other source of
//! images can build a `ScanResult` directly.

mod analyze;
mod folder;
mod types;

pub use analyze::{analyze_buckets, count_assigned};
pub use folder::{is_supported_image, scan, scan_folder, SUPPORTED_EXTENSIONS};
pub use types::{ScanError, ScanResult, ScannedImage};
