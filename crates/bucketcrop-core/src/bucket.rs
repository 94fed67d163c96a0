//! Orientation buckets and their registry.
//!
//! A session has exactly three buckets, one per orientation class. Each
//! bucket carries a target resolution whose sides are always multiples of
//! [`ALIGNMENT`](crate::dimension::ALIGNMENT); its aspect ratio is derived
//! from those sides on demand and so can never drift out of sync.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ClassificationThresholds, FallbackDimensions};
use crate::dimension::{normalize, validate_dimensions};

/// Stable bucket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BucketId {
    /// Landscape
    A,
    /// Square
    B,
    /// Portrait
    C,
}

impl BucketId {
    pub const ALL: [BucketId; 3] = [BucketId::A, BucketId::B, BucketId::C];

    pub fn as_str(self) -> &'static str {
        match self {
            BucketId::A => "A",
            BucketId::B => "B",
            BucketId::C => "C",
        }
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known bucket id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown bucket id: {0:?}")]
pub struct ParseBucketIdError(pub String);

impl FromStr for BucketId {
    type Err = ParseBucketIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(BucketId::A),
            "B" | "b" => Ok(BucketId::B),
            "C" | "c" => Ok(BucketId::C),
            other => Err(ParseBucketIdError(other.to_string())),
        }
    }
}

/// Orientation class of an image or bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Square,
    Portrait,
}

impl Orientation {
    /// Classify native dimensions by width/height ratio.
    ///
    /// A zero height is treated as ratio 1.0 (square).
    pub fn classify(width: u32, height: u32, thresholds: &ClassificationThresholds) -> Self {
        let ratio = if height > 0 {
            width as f64 / height as f64
        } else {
            1.0
        };
        if ratio > thresholds.landscape_above {
            Orientation::Landscape
        } else if ratio < thresholds.portrait_below {
            Orientation::Portrait
        } else {
            Orientation::Square
        }
    }

    /// The bucket that collects images of this orientation.
    pub fn bucket_id(self) -> BucketId {
        match self {
            Orientation::Landscape => BucketId::A,
            Orientation::Square => BucketId::B,
            Orientation::Portrait => BucketId::C,
        }
    }

    /// Display name of the bucket for this orientation.
    pub fn bucket_name(self) -> &'static str {
        match self {
            Orientation::Landscape => "Landscape",
            Orientation::Square => "Square",
            Orientation::Portrait => "Portrait",
        }
    }

    pub fn fallback_dimensions(self, fallback: &FallbackDimensions) -> (u32, u32) {
        match self {
            Orientation::Landscape => fallback.landscape,
            Orientation::Square => fallback.square,
            Orientation::Portrait => fallback.portrait,
        }
    }
}

/// A target resolution class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub name: String,
    /// Fixed at creation; resizing never reclassifies a bucket.
    pub orientation: Orientation,
    width: u32,
    height: u32,
}

impl Bucket {
    /// Create a bucket, aligning the given dimensions.
    pub fn new(id: BucketId, name: impl Into<String>, orientation: Orientation, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            orientation,
            width: normalize(width as f64),
            height: normalize(height as f64),
        }
    }

    /// Create the standard bucket for an orientation.
    pub fn for_orientation(orientation: Orientation, width: u32, height: u32) -> Self {
        Self::new(
            orientation.bucket_id(),
            orientation.bucket_name(),
            orientation,
            width,
            height,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Target aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn dimensions(&self) -> BucketDimensions {
        BucketDimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Target size of a bucket, as handed to the export collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDimensions {
    pub width: u32,
    pub height: u32,
}

/// Outcome of a bucket resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeOutcome {
    pub applied_width: u32,
    pub applied_height: u32,
    pub was_adjusted: bool,
}

/// The set of buckets of a session.
#[derive(Debug, Clone, Default)]
pub struct BucketRegistry {
    buckets: Vec<Bucket>,
}

impl BucketRegistry {
    /// Build a registry from seed buckets.
    ///
    /// Seeds are re-aligned, and a later bucket with an id already present
    /// is ignored. Buckets are kept in id order.
    pub fn new(seed: impl IntoIterator<Item = Bucket>) -> Self {
        let mut buckets: Vec<Bucket> = Vec::new();
        for bucket in seed {
            if buckets.iter().any(|b| b.id == bucket.id) {
                log::warn!("Duplicate bucket {} in seed ignored", bucket.id);
                continue;
            }
            let aligned = Bucket::new(
                bucket.id,
                bucket.name,
                bucket.orientation,
                bucket.width,
                bucket.height,
            );
            buckets.push(aligned);
        }
        buckets.sort_by_key(|b| b.id);
        Self { buckets }
    }

    /// The three standard buckets at the fallback sizes.
    pub fn with_fallback(fallback: &FallbackDimensions) -> Self {
        Self::new(
            [Orientation::Landscape, Orientation::Square, Orientation::Portrait]
                .into_iter()
                .map(|o| {
                    let (w, h) = o.fallback_dimensions(fallback);
                    Bucket::for_orientation(o, w, h)
                }),
        )
    }

    pub fn get(&self, id: BucketId) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BucketId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Resize a bucket, aligning the requested sides.
    ///
    /// Returns `None` (and changes nothing) for an unknown id. The bucket's
    /// orientation is left as it was even if the new ratio contradicts it.
    pub fn resize(&mut self, id: BucketId, width: f64, height: f64) -> Option<ResizeOutcome> {
        let bucket = self.buckets.iter_mut().find(|b| b.id == id)?;
        let aligned = validate_dimensions(width, height);
        bucket.width = aligned.width;
        bucket.height = aligned.height;
        log::debug!(
            "Bucket {} resized to {}x{} (adjusted: {})",
            id,
            aligned.width,
            aligned.height,
            aligned.was_adjusted
        );
        Some(ResizeOutcome {
            applied_width: aligned.width,
            applied_height: aligned.height,
            was_adjusted: aligned.was_adjusted,
        })
    }

    /// Bucket id to target size, as consumed by the export collaborator.
    pub fn dimension_map(&self) -> BTreeMap<BucketId, BucketDimensions> {
        self.buckets.iter().map(|b| (b.id, b.dimensions())).collect()
    }
}
