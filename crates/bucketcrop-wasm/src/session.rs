//! Session bindings.
//!
//! `JsSession` owns one core [`Session`] and forwards UI events to it.
//! Actions return plain booleans or numbers; views come back as JS objects.

use bucketcrop_core::scan::ScanResult;
use bucketcrop_core::{Notice, PointerPosition, Session, SessionConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{parse_bucket, to_js, JsCropRect};

/// A notice as delivered to JavaScript, with its display message.
#[derive(Serialize)]
struct NoticeJs {
    #[serde(flatten)]
    notice: Notice,
    message: String,
}

/// JavaScript handle to an editing session.
///
/// # Example (TypeScript)
/// ```typescript
/// const session = new JsSession(scanResult, undefined);
/// session.begin_drag(path, e.offsetX, e.offsetY);
/// session.drag_to(e.offsetX, e.offsetY);
/// const crop = session.end_drag();
/// session.save(path);
/// for (const n of session.take_notices()) toast(n.level, n.message);
/// ```
#[wasm_bindgen]
pub struct JsSession {
    inner: Session,
}

#[wasm_bindgen]
impl JsSession {
    /// Start a session from a scan result and an optional config object.
    ///
    /// # Errors
    /// Returns error if either argument cannot be deserialized
    #[wasm_bindgen(constructor)]
    pub fn new(scan: JsValue, config: JsValue) -> Result<JsSession, JsValue> {
        let scan: ScanResult = serde_wasm_bindgen::from_value(scan)
            .map_err(|e| JsValue::from_str(&format!("Invalid scan result: {}", e)))?;
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Ok(Self::from_core(Session::new(scan, config)))
    }

    /// Resize a bucket. Returns the applied outcome, or null for an
    /// unknown bucket.
    pub fn resize_bucket(&mut self, bucket: &str, width: f64, height: f64) -> Result<JsValue, JsValue> {
        let id = parse_bucket(bucket)?;
        match self.inner.resize_bucket(id, width, height) {
            Some(outcome) => to_js(&outcome),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn begin_drag(&mut self, path: &str, x: f64, y: f64) -> bool {
        self.inner.begin_drag(path, PointerPosition::new(x, y))
    }

    /// Follow the pointer. Returns the clamped pan, or null when no drag
    /// is active.
    pub fn drag_to(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        match self.inner.drag_to(PointerPosition::new(x, y)) {
            Some(pan) => to_js(&pan),
            None => Ok(JsValue::NULL),
        }
    }

    /// Finish the drag and return the stored crop, if any.
    pub fn end_drag(&mut self) -> Option<JsCropRect> {
        self.inner.end_drag().map(JsCropRect::from)
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.inner.cancel_drag()
    }

    /// Call when a card is removed from the page.
    pub fn close_card(&mut self, path: &str) {
        self.inner.close_card(path);
    }

    pub fn toggle_scaling(&mut self, path: &str) -> bool {
        self.inner.toggle_scaling(path)
    }

    pub fn set_zoom(&mut self, path: &str, factor: f64) -> Option<f64> {
        self.inner.set_zoom(path, factor)
    }

    pub fn zoom_in(&mut self, path: &str) -> Option<f64> {
        self.inner.zoom_in(path)
    }

    pub fn zoom_out(&mut self, path: &str) -> Option<f64> {
        self.inner.zoom_out(path)
    }

    pub fn move_to_bucket(&mut self, path: &str, bucket: &str) -> Result<bool, JsValue> {
        Ok(self.inner.move_to_bucket(path, parse_bucket(bucket)?))
    }

    pub fn save(&mut self, path: &str) -> bool {
        self.inner.save(path)
    }

    pub fn save_all(&mut self, bucket: &str) -> Result<usize, JsValue> {
        Ok(self.inner.save_all(parse_bucket(bucket)?))
    }

    /// Buckets with their sizes, image counts and save progress.
    pub fn buckets(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.bucket_summaries())
    }

    /// Images of a bucket in display order.
    pub fn sorted_images(&self, bucket: &str) -> Result<JsValue, JsValue> {
        let id = parse_bucket(bucket)?;
        to_js(&self.inner.sorted_images(id))
    }

    /// Geometry for drawing one card, or null for an unknown image.
    pub fn card(&self, path: &str) -> Result<JsValue, JsValue> {
        match self.inner.card(path) {
            Some(card) => to_js(&card),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn cropped_count(&self) -> usize {
        self.inner.ledger().cropped_count()
    }

    /// Drain pending notices as `{ level, kind, message, ... }` objects.
    pub fn take_notices(&mut self) -> Result<JsValue, JsValue> {
        let notices: Vec<NoticeJs> = self
            .inner
            .take_notices()
            .into_iter()
            .map(|notice| NoticeJs {
                message: notice.message(),
                notice,
            })
            .collect();
        to_js(&notices)
    }

    /// The hand-off for the export collaborator.
    pub fn export_request(&self, output_dir: &str, copy_companions: bool) -> Result<JsValue, JsValue> {
        to_js(&self.inner.export_request(output_dir, copy_companions))
    }
}

impl JsSession {
    pub(crate) fn from_core(inner: Session) -> Self {
        Self { inner }
    }

    #[cfg(test)]
    pub(crate) fn core(&self) -> &Session {
        &self.inner
    }
}
