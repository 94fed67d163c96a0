//! Bucketcrop Core - Bucket-constrained cropping for training datasets
//!
//! This crate groups images into a small set of target resolution buckets
//! (landscape, square, portrait) and lets the user frame one crop per image
//! at the bucket's exact aspect ratio. Saved crops are exported by cropping
//! and resampling each source to its bucket's size.
//!
//! # Module Structure
//!
//! - `dimension` - Grid alignment of bucket sides
//! - `bucket` - Buckets, orientation classes and the bucket registry
//! - `geometry` - Default crops, card layout and drag tracking
//! - `ledger` - Per-image crop state and save ordering
//! - `session` - The action-driven session controller
//! - `scan` - Folder scanning and bucket proposals
//! - `export` - Crop-and-resize batch export
//! - `config` - Session configuration

pub mod bucket;
pub mod config;
pub mod dimension;
pub mod export;
pub mod geometry;
pub mod ledger;
pub mod scan;
pub mod session;

pub use bucket::{Bucket, BucketDimensions, BucketId, BucketRegistry, Orientation, ResizeOutcome};
pub use config::SessionConfig;
pub use dimension::{normalize, validate_dimensions, AlignedDimensions, ALIGNMENT};
pub use geometry::{centered_crop, CardLayout, CropRect, Pan, PointerPosition, ScaleState};
pub use ledger::{BucketProgress, CropState, ImageRecord, Ledger, SaveStamp};
pub use session::{BucketSummary, CardView, Notice, NoticeKind, NoticeLevel, Session};
