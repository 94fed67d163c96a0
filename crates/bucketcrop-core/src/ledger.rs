//! The image assignment ledger.
//!
//! The ledger is the authoritative list of images in a session: which bucket
//! each belongs to, where its crop is, and whether that crop has been saved.
//! Per-image crop state only moves forward:
//!
//! ```text
//! Unset ──interactive crop──▶ Pending ──commit──▶ Locked
//!   │                                               │
//!   └───────────────commit (default crop)───────────┘
//! ```
//!
//! The only way back to `Unset` is reassignment to another bucket, which is
//! refused for locked images. Everything derived from the ledger (counts,
//! display order, export projection) is computed on demand.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bucket::{Bucket, BucketId};
use crate::export::ExportImage;
use crate::geometry::{centered_crop, CropRect, ScaleState};

/// Crop lifecycle of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropState {
    /// No explicit crop yet; the default crop applies.
    #[default]
    Unset,
    /// An explicit crop exists but has not been saved.
    Pending,
    /// Saved; immune to further edits for the rest of the session.
    Locked,
}

/// Logical time of a save, ordered by when the commit happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SaveStamp(pub u64);

/// One image and its crop state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: String,
    pub filename: String,
    /// Native size in source pixels.
    pub width: u32,
    pub height: u32,
    pub bucket: BucketId,
    pub state: CropState,
    /// Explicit crop; present whenever `state` is not `Unset`.
    pub crop: Option<CropRect>,
    /// Centered crop for the current bucket.
    pub default_crop: CropRect,
    pub scale: ScaleState,
    pub saved_at: Option<SaveStamp>,
}

impl ImageRecord {
    /// A fresh, unset record assigned to `bucket`.
    pub fn new(
        path: impl Into<String>,
        filename: impl Into<String>,
        width: u32,
        height: u32,
        bucket: &Bucket,
    ) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
            width,
            height,
            bucket: bucket.id,
            state: CropState::Unset,
            crop: None,
            default_crop: centered_crop(width, height, bucket.aspect_ratio()),
            scale: ScaleState::default(),
            saved_at: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state == CropState::Locked
    }

    /// The crop that would be exported if this image were saved now.
    pub fn effective_crop(&self) -> CropRect {
        self.crop.unwrap_or(self.default_crop)
    }
}

/// Saved/unsaved split of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketProgress {
    pub unsaved: usize,
    pub saved: usize,
}

/// All images of a session, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    images: Vec<ImageRecord>,
    index: HashMap<String, usize>,
    clock: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image. Returns false if its path is already present.
    pub fn insert(&mut self, record: ImageRecord) -> bool {
        if self.index.contains_key(&record.path) {
            log::warn!("Duplicate image path ignored: {}", record.path);
            return false;
        }
        self.index.insert(record.path.clone(), self.images.len());
        self.images.push(record);
        true
    }

    pub fn get(&self, path: &str) -> Option<&ImageRecord> {
        self.index.get(path).map(|&i| &self.images[i])
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut ImageRecord> {
        let i = *self.index.get(path)?;
        self.images.get_mut(i)
    }

    /// Images in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Move an image to another bucket and restart its crop.
    ///
    /// No-op (returns false) for an unknown path, a locked image, or a move
    /// to the bucket it is already in.
    pub fn reassign(&mut self, path: &str, bucket: &Bucket) -> bool {
        let Some(record) = self.get_mut(path) else {
            return false;
        };
        if record.is_locked() || record.bucket == bucket.id {
            return false;
        }
        record.bucket = bucket.id;
        record.state = CropState::Unset;
        record.crop = None;
        record.saved_at = None;
        record.default_crop = centered_crop(record.width, record.height, bucket.aspect_ratio());
        log::debug!("{} reassigned to bucket {}", path, bucket.id);
        true
    }

    /// Store an interactively framed crop.
    ///
    /// The rectangle is clamped into the image and, if clamping or the
    /// caller left it off the bucket ratio, refitted to the largest
    /// bucket-ratio rectangle centered inside it. No-op for unknown or
    /// locked images, a bucket the image is not assigned to, or a
    /// rectangle too small to carry the ratio.
    pub fn apply_interactive_crop(
        &mut self,
        path: &str,
        crop: CropRect,
        scale: ScaleState,
        bucket: &Bucket,
    ) -> bool {
        let Some(record) = self.get_mut(path) else {
            return false;
        };
        if record.is_locked() || record.bucket != bucket.id {
            return false;
        }
        let ratio = bucket.aspect_ratio();
        let mut crop = crop.clamped_to(record.width, record.height);
        if !crop.matches_ratio(ratio) {
            crop = crop.fitted_to_ratio(ratio);
            if !crop.matches_ratio(ratio) {
                log::debug!("{}: rejected crop {:?} off ratio {}", path, crop, ratio);
                return false;
            }
        }
        record.crop = Some(crop);
        record.scale = scale;
        record.state = CropState::Pending;
        true
    }

    fn tick(&mut self) -> SaveStamp {
        self.clock += 1;
        SaveStamp(self.clock)
    }

    fn lock(record: &mut ImageRecord, stamp: SaveStamp) {
        let crop = record.effective_crop().clamped_to(record.width, record.height);
        record.crop = Some(crop);
        record.state = CropState::Locked;
        record.saved_at = Some(stamp);
    }

    /// Save one image's crop. Returns true if it was newly locked.
    pub fn commit(&mut self, path: &str) -> bool {
        match self.get(path) {
            Some(record) if !record.is_locked() => {}
            _ => return false,
        }
        let stamp = self.tick();
        if let Some(record) = self.get_mut(path) {
            Self::lock(record, stamp);
            log::debug!("{} locked at {:?}", path, stamp);
        }
        true
    }

    /// Save every unlocked image of a bucket in one pass, all with the same
    /// stamp. Returns how many images were newly locked.
    pub fn commit_all(&mut self, bucket: BucketId) -> usize {
        let stamp = self.tick();
        let mut committed = 0;
        for record in self
            .images
            .iter_mut()
            .filter(|r| r.bucket == bucket && !r.is_locked())
        {
            Self::lock(record, stamp);
            committed += 1;
        }
        log::debug!("Bucket {}: {} images locked at {:?}", bucket, committed, stamp);
        committed
    }

    /// Recompute default crops after a bucket's ratio changed.
    ///
    /// Locked images keep everything. A pending image's explicit crop was
    /// framed for the old ratio, so it is replaced by the new default.
    /// Returns the paths that changed.
    pub fn refresh_defaults(&mut self, bucket: &Bucket) -> Vec<String> {
        let ratio = bucket.aspect_ratio();
        let mut changed = Vec::new();
        for record in self
            .images
            .iter_mut()
            .filter(|r| r.bucket == bucket.id && !r.is_locked())
        {
            record.default_crop = centered_crop(record.width, record.height, ratio);
            if record.state == CropState::Pending {
                record.crop = Some(record.default_crop);
            }
            changed.push(record.path.clone());
        }
        changed
    }

    pub fn images_in(&self, bucket: BucketId) -> impl Iterator<Item = &ImageRecord> {
        self.images.iter().filter(move |r| r.bucket == bucket)
    }

    pub fn image_count(&self, bucket: BucketId) -> usize {
        self.images_in(bucket).count()
    }

    /// Images of a bucket for display: unsaved first in ledger order, then
    /// saved ones by ascending save stamp.
    pub fn sorted_for_bucket(&self, bucket: BucketId) -> Vec<&ImageRecord> {
        let mut images: Vec<&ImageRecord> = self.images_in(bucket).collect();
        // Stable: ties keep ledger order
        images.sort_by_key(|r| match r.saved_at {
            None => (false, SaveStamp(0)),
            Some(stamp) => (true, stamp),
        });
        images
    }

    pub fn progress(&self, bucket: BucketId) -> BucketProgress {
        self.images_in(bucket)
            .fold(BucketProgress::default(), |mut progress, r| {
                if r.saved_at.is_some() {
                    progress.saved += 1;
                } else {
                    progress.unsaved += 1;
                }
                progress
            })
    }

    /// Number of locked images across all buckets.
    pub fn cropped_count(&self) -> usize {
        self.images.iter().filter(|r| r.is_locked()).count()
    }

    /// Export hand-off for every image. Only locked images are marked
    /// cropped; the rest are expected to be skipped by the exporter.
    pub fn export_images(&self) -> Vec<ExportImage> {
        self.images
            .iter()
            .map(|r| ExportImage {
                path: r.path.clone(),
                filename: r.filename.clone(),
                assigned_bucket: r.bucket,
                cropped: r.is_locked(),
                crop_params: r.crop,
            })
            .collect()
    }
}
