//! The editing session: one owned state container driven by user actions.
//!
//! A [`Session`] owns the bucket registry, the image ledger and the
//! ephemeral per-card viewport state (pan positions, the active drag). Every
//! action runs synchronously to completion and either takes effect or is a
//! silent no-op; nothing here returns an error. Feedback meant for the user
//! is queued as [`Notice`]s and drained by the front end.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bucket::{Bucket, BucketId, BucketRegistry, Orientation, ResizeOutcome};
use crate::config::SessionConfig;
use crate::export::ExportRequest;
use crate::geometry::{CardLayout, CropRect, DragSession, Pan, PanRange, PointerPosition, ScaleState};
use crate::ledger::{BucketProgress, ImageRecord, Ledger};
use crate::scan::ScanResult;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// What a notice is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoticeKind {
    /// Resize input was snapped to the alignment grid.
    DimensionsAdjusted { bucket: BucketId, width: u32, height: u32 },
    MovedToBucket { path: String, bucket: BucketId, name: String },
    CropSaved { path: String },
    BucketSaved { bucket: BucketId, committed: usize },
}

/// An advisory message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    #[serde(flatten)]
    pub kind: NoticeKind,
}

impl Notice {
    pub fn message(&self) -> String {
        match &self.kind {
            NoticeKind::DimensionsAdjusted { width, height, .. } => {
                format!("Aligned to {width}x{height} (multiples of 64) for memory efficiency")
            }
            NoticeKind::MovedToBucket { name, .. } => format!("Moved to {name}"),
            NoticeKind::CropSaved { .. } => "Crop saved".to_string(),
            NoticeKind::BucketSaved { committed, .. } => {
                format!("Saved all crops in this bucket ({committed} new)")
            }
        }
    }
}

/// A bucket with its derived counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub id: BucketId,
    pub name: String,
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub image_count: usize,
    pub progress: BucketProgress,
}

/// Everything a front end needs to draw one image card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub path: String,
    pub layout: CardLayout,
    pub pan: Pan,
    pub pan_range: PanRange,
    pub scale: ScaleState,
    pub locked: bool,
    pub dragging: bool,
}

#[derive(Debug)]
struct ActiveDrag {
    path: String,
    session: DragSession,
}

/// One editing session over a scanned folder.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    registry: BucketRegistry,
    ledger: Ledger,
    pans: HashMap<String, Pan>,
    drag: Option<ActiveDrag>,
    notices: Vec<Notice>,
}

impl Session {
    /// Seed a session from a scan.
    ///
    /// Without proposed buckets the fallback sizes are used. An image whose
    /// assigned bucket is missing goes to its orientation's bucket, or the
    /// first bucket if that is missing too. Zero-sized images are dropped.
    pub fn new(seed: ScanResult, config: SessionConfig) -> Self {
        let registry = if seed.buckets.is_empty() {
            BucketRegistry::with_fallback(&config.fallback)
        } else {
            BucketRegistry::new(seed.buckets)
        };

        let mut ledger = Ledger::new();
        for image in seed.images {
            if image.width == 0 || image.height == 0 {
                log::warn!("Dropping zero-sized image {}", image.path);
                continue;
            }
            let bucket = registry
                .get(image.assigned_bucket)
                .or_else(|| registry.get(image.orientation.bucket_id()))
                .or_else(|| registry.iter().next());
            let Some(bucket) = bucket else {
                continue;
            };
            ledger.insert(ImageRecord::new(
                image.path,
                image.filename,
                image.width,
                image.height,
                bucket,
            ));
        }

        log::info!(
            "Session started with {} images in {} buckets",
            ledger.len(),
            registry.len()
        );

        Self {
            config,
            registry,
            ledger,
            pans: HashMap::new(),
            drag: None,
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &BucketRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn bucket(&self, id: BucketId) -> Option<&Bucket> {
        self.registry.get(id)
    }

    pub fn image(&self, path: &str) -> Option<&ImageRecord> {
        self.ledger.get(path)
    }

    /// All buckets with counts derived from the ledger right now.
    pub fn bucket_summaries(&self) -> Vec<BucketSummary> {
        self.registry
            .iter()
            .map(|b| BucketSummary {
                id: b.id,
                name: b.name.clone(),
                orientation: b.orientation,
                width: b.width(),
                height: b.height(),
                aspect_ratio: b.aspect_ratio(),
                image_count: self.ledger.image_count(b.id),
                progress: self.ledger.progress(b.id),
            })
            .collect()
    }

    pub fn sorted_images(&self, bucket: BucketId) -> Vec<&ImageRecord> {
        self.ledger.sorted_for_bucket(bucket)
    }

    pub fn progress(&self, bucket: BucketId) -> BucketProgress {
        self.ledger.progress(bucket)
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, kind: NoticeKind) {
        self.notices.push(Notice { level, kind });
    }

    fn layout_for(&self, record: &ImageRecord, scale: ScaleState) -> Option<CardLayout> {
        let bucket = self.registry.get(record.bucket)?;
        Some(CardLayout::compute(
            &self.config.viewport,
            record.width,
            record.height,
            bucket.aspect_ratio(),
            scale,
        ))
    }

    fn release_drag(&mut self, path: &str) {
        if self.drag.as_ref().is_some_and(|d| d.path == path) {
            self.drag = None;
        }
    }

    /// Forget viewport state of a card so it is rebuilt from its crop.
    fn reset_card(&mut self, path: &str) {
        self.pans.remove(path);
        self.release_drag(path);
    }

    /// Current geometry and pan of an image card.
    ///
    /// An active drag wins; then a remembered pan; then the pan that shows
    /// the stored crop; otherwise centered.
    pub fn card(&self, path: &str) -> Option<CardView> {
        let record = self.ledger.get(path)?;
        let layout = self.layout_for(record, record.scale)?;

        let dragging = self.drag.as_ref().filter(|d| d.path == path);
        let pan = if let Some(drag) = dragging {
            drag.session.pan()
        } else if let Some(pan) = self.pans.get(path) {
            layout.clamp_pan(*pan)
        } else {
            match record.crop {
                Some(crop) => layout.pan_for_crop(&crop),
                None => layout.centered_pan(),
            }
        };

        Some(CardView {
            path: record.path.clone(),
            layout,
            pan,
            pan_range: layout.pan_range(),
            scale: record.scale,
            locked: record.is_locked(),
            dragging: dragging.is_some(),
        })
    }

    /// Resize a bucket and refresh the default crops of its unlocked images.
    ///
    /// Returns `None` for an unknown bucket.
    pub fn resize_bucket(&mut self, id: BucketId, width: f64, height: f64) -> Option<ResizeOutcome> {
        let outcome = self.registry.resize(id, width, height)?;
        let bucket = self.registry.get(id)?.clone();

        for path in self.ledger.refresh_defaults(&bucket) {
            self.reset_card(&path);
        }

        if outcome.was_adjusted {
            self.notify(
                NoticeLevel::Info,
                NoticeKind::DimensionsAdjusted {
                    bucket: id,
                    width: outcome.applied_width,
                    height: outcome.applied_height,
                },
            );
        }
        Some(outcome)
    }

    /// Pointer-down on an image. Rejected for unknown or locked images.
    ///
    /// Any drag still active on another card is dropped first.
    pub fn begin_drag(&mut self, path: &str, pointer: PointerPosition) -> bool {
        self.drag = None;
        let Some(card) = self.card(path) else {
            return false;
        };
        if card.locked {
            return false;
        }
        self.drag = Some(ActiveDrag {
            path: path.to_string(),
            session: DragSession::begin(card.layout, card.pan, pointer),
        });
        true
    }

    /// Pointer-move during a drag. Returns the clamped pan, or `None` when
    /// no drag is active.
    pub fn drag_to(&mut self, pointer: PointerPosition) -> Option<Pan> {
        self.drag.as_mut().map(|d| d.session.update(pointer))
    }

    /// Pointer-up: end the drag and store the framed crop as pending.
    ///
    /// The drag is released whether or not the crop could be applied.
    pub fn end_drag(&mut self) -> Option<CropRect> {
        let ActiveDrag { path, session } = self.drag.take()?;
        let (pan, crop) = session.finish();
        let record = self.ledger.get(&path)?;
        let scale = record.scale;
        let bucket = self.registry.get(record.bucket)?;
        if !self.ledger.apply_interactive_crop(&path, crop, scale, bucket) {
            return None;
        }
        let stored = self.ledger.get(&path).and_then(|r| r.crop);
        // A refitted crop no longer matches the drag position
        if stored == Some(crop) {
            self.pans.insert(path, pan);
        } else {
            self.pans.remove(&path);
        }
        stored
    }

    /// Abandon the active drag without touching the crop.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Tear down a card's viewport state, releasing its drag if any.
    pub fn close_card(&mut self, path: &str) {
        self.reset_card(path);
    }

    /// Recenter under a new scale state and store the resulting crop.
    ///
    /// In scaling mode the stored factor is the one the layout actually
    /// applies. Returns the stored scale state.
    fn rescale(&mut self, path: &str, mut scale: ScaleState) -> Option<ScaleState> {
        let record = self.ledger.get(path)?;
        if record.is_locked() {
            return None;
        }
        let layout = self.layout_for(record, scale)?;
        if scale.scale_mode {
            scale.scale_factor = layout.effective_scale;
        }
        let bucket_id = record.bucket;
        self.reset_card(path);
        let bucket = self.registry.get(bucket_id)?;
        self.ledger
            .apply_interactive_crop(path, layout.centered_crop(), scale, bucket)
            .then_some(scale)
    }

    /// Switch scaling mode on or off for an image.
    pub fn toggle_scaling(&mut self, path: &str) -> bool {
        let Some(record) = self.ledger.get(path) else {
            return false;
        };
        let scale = ScaleState {
            scale_mode: !record.scale.scale_mode,
            scale_factor: self.config.zoom.clamp(record.scale.scale_factor),
        };
        self.rescale(path, scale).is_some()
    }

    /// Set the zoom of an image in scaling mode, clamped into the
    /// configured range. Returns the applied factor.
    ///
    /// The crop box must stay covered, so the applied factor never drops
    /// below the cover floor (1.0 in scaling mode) even when the
    /// configured minimum is lower.
    pub fn set_zoom(&mut self, path: &str, factor: f64) -> Option<f64> {
        let record = self.ledger.get(path)?;
        if !record.scale.scale_mode {
            return None;
        }
        let scale = ScaleState {
            scale_mode: true,
            scale_factor: self.config.zoom.clamp(factor),
        };
        self.rescale(path, scale).map(|s| s.scale_factor)
    }

    pub fn zoom_in(&mut self, path: &str) -> Option<f64> {
        let current = self.ledger.get(path)?.scale.scale_factor;
        self.set_zoom(path, step_zoom(current, self.config.zoom.step))
    }

    pub fn zoom_out(&mut self, path: &str) -> Option<f64> {
        let current = self.ledger.get(path)?.scale.scale_factor;
        self.set_zoom(path, step_zoom(current, -self.config.zoom.step))
    }

    /// Move an image to another bucket, restarting its crop.
    pub fn move_to_bucket(&mut self, path: &str, id: BucketId) -> bool {
        let Some(bucket) = self.registry.get(id).cloned() else {
            return false;
        };
        if !self.ledger.reassign(path, &bucket) {
            return false;
        }
        self.reset_card(path);
        self.notify(
            NoticeLevel::Success,
            NoticeKind::MovedToBucket {
                path: path.to_string(),
                bucket: id,
                name: bucket.name,
            },
        );
        true
    }

    /// Save one image's crop. Returns true if it was newly locked.
    pub fn save(&mut self, path: &str) -> bool {
        if !self.ledger.commit(path) {
            return false;
        }
        // The pan stays so the locked card keeps showing its crop
        self.release_drag(path);
        self.notify(
            NoticeLevel::Success,
            NoticeKind::CropSaved {
                path: path.to_string(),
            },
        );
        true
    }

    /// Save every unlocked image in a bucket. Returns how many were locked.
    pub fn save_all(&mut self, id: BucketId) -> usize {
        if !self.registry.contains(id) {
            return 0;
        }
        let committed = self.ledger.commit_all(id);
        let drag_locked = self
            .drag
            .as_ref()
            .and_then(|d| self.ledger.get(&d.path))
            .is_some_and(|r| r.is_locked());
        if drag_locked {
            self.drag = None;
        }
        self.notify(NoticeLevel::Success, NoticeKind::BucketSaved { bucket: id, committed });
        committed
    }

    /// Export hand-off: every image plus the current bucket sizes.
    pub fn export_request(&self, output_dir: impl Into<PathBuf>, copy_companions: bool) -> ExportRequest {
        ExportRequest {
            images: self.ledger.export_images(),
            buckets: self.registry.dimension_map(),
            output_dir: output_dir.into(),
            copy_companions,
        }
    }
}

fn step_zoom(current: f64, step: f64) -> f64 {
    // Keep button steps free of float drift (1.1 + 0.1 != 1.2)
    ((current + step) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::centered_crop;
    use crate::ledger::CropState;
    use crate::scan::ScannedImage;

    fn scanned(name: &str, width: u32, height: u32, bucket: BucketId) -> ScannedImage {
        let orientation = match bucket {
            BucketId::A => Orientation::Landscape,
            BucketId::B => Orientation::Square,
            BucketId::C => Orientation::Portrait,
        };
        ScannedImage {
            path: format!("/d/{name}"),
            filename: name.to_string(),
            width,
            height,
            orientation,
            assigned_bucket: bucket,
        }
    }

    fn session() -> Session {
        let seed = ScanResult {
            images: vec![
                scanned("wide.png", 1000, 500, BucketId::A),
                scanned("sq1.png", 1000, 500, BucketId::B),
                scanned("sq2.png", 800, 800, BucketId::B),
                scanned("sq3.png", 500, 1000, BucketId::B),
                scanned("tall.png", 500, 1000, BucketId::C),
            ],
            buckets: vec![
                Bucket::for_orientation(Orientation::Landscape, 1024, 576),
                Bucket::for_orientation(Orientation::Square, 1024, 1024),
                Bucket::for_orientation(Orientation::Portrait, 768, 1024),
            ],
        };
        Session::new(seed, SessionConfig::default())
    }

    #[test]
    fn test_seeded_defaults() {
        let s = session();
        assert_eq!(s.image("/d/sq1.png").unwrap().default_crop, CropRect::new(250, 0, 500, 500));
        let summaries = s.bucket_summaries();
        assert_eq!(summaries.iter().map(|b| b.image_count).collect::<Vec<_>>(), vec![1, 3, 1]);
    }

    #[test]
    fn test_seed_without_buckets_uses_fallback() {
        let seed = ScanResult {
            images: vec![scanned("a.png", 100, 100, BucketId::B), scanned("z.png", 0, 100, BucketId::B)],
            buckets: vec![],
        };
        let s = Session::new(seed, SessionConfig::default());
        assert_eq!(s.registry().len(), 3);
        assert_eq!(s.ledger().len(), 1);
    }

    #[test]
    fn test_seed_unknown_bucket_falls_back() {
        let seed = ScanResult {
            images: vec![scanned("a.png", 1000, 500, BucketId::A)],
            buckets: vec![Bucket::for_orientation(Orientation::Square, 512, 512)],
        };
        let s = Session::new(seed, SessionConfig::default());
        assert_eq!(s.image("/d/a.png").unwrap().bucket, BucketId::B);
    }

    #[test]
    fn test_resize_notifies_on_adjustment() {
        let mut s = session();
        let outcome = s.resize_bucket(BucketId::B, 100.0, 100.0).unwrap();
        assert_eq!((outcome.applied_width, outcome.applied_height), (128, 128));
        assert!(outcome.was_adjusted);

        let notices = s.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert!(s.take_notices().is_empty());
    }

    #[test]
    fn test_resize_aligned_is_silent() {
        let mut s = session();
        s.resize_bucket(BucketId::B, 1024.0, 512.0).unwrap();
        assert!(s.take_notices().is_empty());
    }

    #[test]
    fn test_resize_unknown_bucket() {
        let seed = ScanResult {
            images: vec![],
            buckets: vec![Bucket::for_orientation(Orientation::Square, 512, 512)],
        };
        let mut s = Session::new(seed, SessionConfig::default());
        assert!(s.resize_bucket(BucketId::A, 512.0, 512.0).is_none());
    }

    #[test]
    fn test_resize_refreshes_unlocked_only() {
        let mut s = session();
        s.save("/d/sq1.png");
        s.resize_bucket(BucketId::B, 1024.0, 512.0).unwrap();

        assert_eq!(s.image("/d/sq1.png").unwrap().crop, Some(CropRect::new(250, 0, 500, 500)));
        assert_eq!(s.image("/d/sq2.png").unwrap().default_crop, CropRect::new(0, 200, 800, 400));
    }

    #[test]
    fn test_drag_produces_pending_crop() {
        let mut s = session();
        assert!(s.begin_drag("/d/sq1.png", PointerPosition::new(100.0, 100.0)));
        s.drag_to(PointerPosition::new(1000.0, 100.0)).unwrap();
        let crop = s.end_drag().unwrap();

        let record = s.image("/d/sq1.png").unwrap();
        assert_eq!(record.state, CropState::Pending);
        assert_eq!(record.crop, Some(crop));
        assert_eq!(crop.x, 0);
        assert!(crop.fits_within(1000, 500));
        assert!(crop.matches_ratio(1.0));
        assert_eq!(record.saved_at, None);
    }

    #[test]
    fn test_card_remembers_pan_after_drag() {
        let mut s = session();
        s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0));
        let pan = s.drag_to(PointerPosition::new(-30.0, 0.0)).unwrap();
        assert!(s.card("/d/sq1.png").unwrap().dragging);
        s.end_drag();
        let card = s.card("/d/sq1.png").unwrap();
        assert!(!card.dragging);
        assert_eq!(card.pan, pan);
    }

    #[test]
    fn test_drag_rejected_when_locked() {
        let mut s = session();
        s.save("/d/sq1.png");
        let before = s.image("/d/sq1.png").unwrap().clone();
        assert!(!s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0)));
        assert!(s.drag_to(PointerPosition::new(50.0, 0.0)).is_none());
        assert!(s.end_drag().is_none());
        assert_eq!(s.image("/d/sq1.png").unwrap(), &before);
    }

    #[test]
    fn test_drag_released_when_saved_mid_drag() {
        let mut s = session();
        s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0));
        s.save("/d/sq1.png");
        assert!(s.end_drag().is_none());
        assert!(!s.cancel_drag());
    }

    #[test]
    fn test_close_card_releases_drag() {
        let mut s = session();
        s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0));
        s.close_card("/d/sq2.png");
        assert!(s.drag_to(PointerPosition::new(1.0, 1.0)).is_some());
        s.close_card("/d/sq1.png");
        assert!(s.drag_to(PointerPosition::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_toggle_scaling_recenters() {
        let mut s = session();
        s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0));
        s.drag_to(PointerPosition::new(500.0, 0.0));
        s.end_drag();

        assert!(s.toggle_scaling("/d/sq1.png"));
        let record = s.image("/d/sq1.png").unwrap();
        assert!(record.scale.scale_mode);
        // Scaling mode at 1.0: the box spans the full height, centered
        assert_eq!(record.crop, Some(CropRect::new(250, 0, 500, 500)));
        let card = s.card("/d/sq1.png").unwrap();
        assert_eq!(card.layout.crop_for_pan(card.pan), CropRect::new(250, 0, 500, 500));
    }

    #[test]
    fn test_locked_scaling_card_shows_saved_crop() {
        let mut s = session();
        s.toggle_scaling("/d/sq1.png");
        s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0));
        s.drag_to(PointerPosition::new(1000.0, 0.0));
        let framed = s.end_drag().unwrap();
        assert_eq!(framed, CropRect::new(0, 0, 500, 500));
        let before = s.card("/d/sq1.png").unwrap().pan;

        assert!(s.save("/d/sq1.png"));
        let card = s.card("/d/sq1.png").unwrap();
        assert!(card.locked);
        assert_eq!(card.pan, before);
        assert_eq!(card.layout.crop_for_pan(card.pan), framed);

        // Rebuilt from the crop once the card is reopened
        s.close_card("/d/sq1.png");
        let card = s.card("/d/sq1.png").unwrap();
        assert_eq!(card.layout.crop_for_pan(card.pan), framed);
    }

    #[test]
    fn test_save_all_keeps_card_positions() {
        let mut s = session();
        s.toggle_scaling("/d/sq1.png");
        s.set_zoom("/d/sq1.png", 2.0);
        s.begin_drag("/d/sq1.png", PointerPosition::new(0.0, 0.0));
        s.drag_to(PointerPosition::new(0.0, -1000.0));
        let framed = s.end_drag().unwrap();

        s.save_all(BucketId::B);
        let card = s.card("/d/sq1.png").unwrap();
        assert_eq!(s.image("/d/sq1.png").unwrap().crop, Some(framed));
        assert_eq!(card.layout.crop_for_pan(card.pan), framed);
    }

    #[test]
    fn test_zoom_requires_scaling_mode() {
        let mut s = session();
        assert!(s.zoom_in("/d/sq1.png").is_none());
        s.toggle_scaling("/d/sq1.png");
        assert_eq!(s.zoom_in("/d/sq1.png"), Some(1.1));
        assert_eq!(s.zoom_in("/d/sq1.png"), Some(1.2));
        assert_eq!(s.zoom_out("/d/sq1.png"), Some(1.1));
    }

    #[test]
    fn test_zoom_clamped_and_recropped() {
        let mut s = session();
        s.toggle_scaling("/d/sq1.png");
        assert_eq!(s.set_zoom("/d/sq1.png", 10.0), Some(3.0));
        let crop = s.image("/d/sq1.png").unwrap().crop.unwrap();
        // 500 / 3 = 166.67
        assert_eq!((crop.width, crop.height), (167, 167));
        // Floored at cover: the crop cannot exceed the image height
        assert_eq!(s.set_zoom("/d/sq1.png", 0.0), Some(1.0));
        let record = s.image("/d/sq1.png").unwrap();
        assert_eq!(record.scale.scale_factor, 1.0);
        assert_eq!(record.crop.unwrap().height, 500);
    }

    #[test]
    fn test_zoom_in_from_floor_takes_effect() {
        let mut s = session();
        s.toggle_scaling("/d/sq1.png");
        assert_eq!(s.zoom_out("/d/sq1.png"), Some(1.0));
        assert_eq!(s.zoom_out("/d/sq1.png"), Some(1.0));
        assert_eq!(s.zoom_in("/d/sq1.png"), Some(1.1));
        let card = s.card("/d/sq1.png").unwrap();
        assert_eq!(card.layout.effective_scale, 1.1);
    }

    #[test]
    fn test_toggle_on_locked_is_noop() {
        let mut s = session();
        s.save("/d/sq1.png");
        assert!(!s.toggle_scaling("/d/sq1.png"));
        assert!(!s.image("/d/sq1.png").unwrap().scale.scale_mode);
    }

    #[test]
    fn test_move_to_bucket() {
        let mut s = session();
        s.begin_drag("/d/sq3.png", PointerPosition::new(0.0, 0.0));
        s.drag_to(PointerPosition::new(0.0, 40.0));
        s.end_drag();

        assert!(s.move_to_bucket("/d/sq3.png", BucketId::A));
        let record = s.image("/d/sq3.png").unwrap();
        assert_eq!(record.bucket, BucketId::A);
        assert_eq!(record.state, CropState::Unset);
        assert_eq!(record.default_crop, centered_crop(500, 1000, 1024.0 / 576.0));
        assert_eq!(record.default_crop, CropRect::new(0, 359, 500, 281));

        let notices = s.take_notices();
        assert!(matches!(notices[0].kind, NoticeKind::MovedToBucket { bucket: BucketId::A, .. }));
        assert_eq!(notices[0].message(), "Moved to Landscape");
        assert_eq!(s.bucket_summaries()[0].image_count, 2);
    }

    #[test]
    fn test_move_locked_is_noop() {
        let mut s = session();
        s.save("/d/sq1.png");
        s.take_notices();
        assert!(!s.move_to_bucket("/d/sq1.png", BucketId::A));
        assert_eq!(s.image("/d/sq1.png").unwrap().bucket, BucketId::B);
        assert!(s.take_notices().is_empty());
    }

    #[test]
    fn test_save_all_scenario() {
        let mut s = session();
        s.save("/d/sq2.png");
        let pre = s.image("/d/sq2.png").unwrap().saved_at;
        s.insert_for_test("/d/sq4.png", 640, 480, BucketId::B);

        assert_eq!(s.save_all(BucketId::B), 3);
        assert_eq!(s.image("/d/sq2.png").unwrap().saved_at, pre);
        assert_eq!(s.image("/d/wide.png").unwrap().state, CropState::Unset);
        assert_eq!(s.progress(BucketId::B), BucketProgress { unsaved: 0, saved: 4 });

        let order: Vec<&str> = s
            .sorted_images(BucketId::B)
            .iter()
            .map(|r| r.filename.as_str())
            .collect();
        assert_eq!(order, vec!["sq2.png", "sq1.png", "sq3.png", "sq4.png"]);
    }

    #[test]
    fn test_save_all_unknown_bucket() {
        let seed = ScanResult {
            images: vec![],
            buckets: vec![Bucket::for_orientation(Orientation::Square, 512, 512)],
        };
        let mut s = Session::new(seed, SessionConfig::default());
        assert_eq!(s.save_all(BucketId::C), 0);
        assert!(s.take_notices().is_empty());
    }

    #[test]
    fn test_export_request() {
        let mut s = session();
        s.save("/d/sq1.png");
        let request = s.export_request("/out", true);
        assert_eq!(request.images.len(), 5);
        assert_eq!(request.images.iter().filter(|i| i.cropped).count(), 1);
        assert_eq!(request.buckets.len(), 3);
        assert_eq!(request.output_dir, PathBuf::from("/out"));

        for image in request.images.iter().filter(|i| i.cropped) {
            let bucket = s.bucket(image.assigned_bucket).unwrap();
            assert!(image.crop_params.unwrap().matches_ratio(bucket.aspect_ratio()));
        }
    }

    #[test]
    fn test_notice_wire_shape() {
        let notice = Notice {
            level: NoticeLevel::Success,
            kind: NoticeKind::CropSaved { path: "/d/a.png".into() },
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["kind"], "crop_saved");
        assert_eq!(json["path"], "/d/a.png");
    }

    impl Session {
        fn insert_for_test(&mut self, path: &str, width: u32, height: u32, bucket: BucketId) {
            let bucket = self.registry.get(bucket).unwrap().clone();
            self.ledger.insert(ImageRecord::new(path, path.trim_start_matches("/d/"), width, height, &bucket));
        }
    }
}
