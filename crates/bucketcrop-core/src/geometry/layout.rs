//! Card viewport geometry for interactive cropping.
//!
//! Each image card shows a fixed viewport. A crop box with the bucket's
//! aspect ratio sits centered in that viewport and never moves; the image
//! is panned (and in scaling mode, zoomed) underneath it.
//!
//! # Coordinate System
//!
//! - All layout values are display pixels relative to the viewport's
//!   top-left corner
//! - A [`Pan`] is the position of the displayed image's top-left corner
//! - Crop rectangles produced from a layout are in source-image pixels

use serde::{Deserialize, Serialize};

use super::rect::CropRect;
use crate::config::ViewportConfig;

/// Position of the displayed image's top-left corner in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

impl Pan {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Inclusive pan limits keeping the crop box covered by the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanRange {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PanRange {
    /// Clamp a pan into range. NaN components collapse to the upper bound.
    pub fn clamp(&self, pan: Pan) -> Pan {
        Pan {
            x: clamp_axis(pan.x, self.min_x, self.max_x),
            y: clamp_axis(pan.y, self.min_y, self.max_y),
        }
    }

    pub fn contains(&self, pan: Pan) -> bool {
        (self.min_x..=self.max_x).contains(&pan.x) && (self.min_y..=self.max_y).contains(&pan.y)
    }
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return max;
    }
    // min > max only from float noise when display == crop box
    value.min(max).max(min.min(max))
}

/// Interaction state that decides how the image is sized in its card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    /// Independent zoom beneath the crop box.
    pub scale_mode: bool,
    /// Zoom multiplier, only honored in scaling mode.
    pub scale_factor: f64,
}

impl Default for ScaleState {
    fn default() -> Self {
        Self {
            scale_mode: false,
            scale_factor: 1.0,
        }
    }
}

/// Resolved geometry of one image card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    /// Native image size in source pixels.
    pub image_width: u32,
    pub image_height: u32,
    /// Viewport size in display pixels.
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Fixed crop frame, centered in the viewport.
    pub crop_box: DisplayBox,
    /// Image size before zoom.
    pub base_width: f64,
    pub base_height: f64,
    /// Zoom actually applied (1.0 outside scaling mode).
    pub effective_scale: f64,
    /// Image size after zoom.
    pub display_width: f64,
    pub display_height: f64,
}

impl CardLayout {
    /// Lay out an image of native size `image_width x image_height` for a
    /// bucket of aspect ratio `ratio`.
    ///
    /// Base size depends on the mode:
    /// - scaling mode: the image fills the crop box on its constraining axis
    /// - otherwise: the image fills the whole viewport on its constraining axis
    ///
    /// The requested zoom is floored at whatever keeps the crop box covered,
    /// so no pan position can expose background.
    pub fn compute(
        viewport: &ViewportConfig,
        image_width: u32,
        image_height: u32,
        ratio: f64,
        scale: ScaleState,
    ) -> Self {
        let vw = viewport.width.max(1.0);
        let vh = viewport.height.max(1.0);
        let ratio = if ratio > 0.0 && ratio.is_finite() { ratio } else { 1.0 };
        let image_ratio = if image_width > 0 && image_height > 0 {
            image_width as f64 / image_height as f64
        } else {
            1.0
        };

        let (box_width, box_height) = if vw / vh > ratio {
            let h = (vh - viewport.inset).max(1.0);
            (h * ratio, h)
        } else {
            let w = (vw - viewport.inset).max(1.0);
            (w, w / ratio)
        };
        let crop_box = DisplayBox {
            left: (vw - box_width) / 2.0,
            top: (vh - box_height) / 2.0,
            width: box_width,
            height: box_height,
        };

        let (base_width, base_height) = if scale.scale_mode {
            if image_ratio > ratio {
                (box_height * image_ratio, box_height)
            } else {
                (box_width, box_width / image_ratio)
            }
        } else if image_ratio > vw / vh {
            // Cover rather than fit the viewport, so the crop box never shows background
            (vh * image_ratio, vh)
        } else {
            (vw, vw / image_ratio)
        };

        let requested = if scale.scale_mode && scale.scale_factor.is_finite() && scale.scale_factor > 0.0 {
            scale.scale_factor
        } else {
            1.0
        };
        let cover_floor = (box_width / base_width).max(box_height / base_height);
        let effective_scale = requested.max(cover_floor);

        Self {
            image_width,
            image_height,
            viewport_width: vw,
            viewport_height: vh,
            crop_box,
            base_width,
            base_height,
            effective_scale,
            display_width: base_width * effective_scale,
            display_height: base_height * effective_scale,
        }
    }

    /// Pan limits: the image may slide until one of its edges meets the
    /// opposite edge of the crop box.
    pub fn pan_range(&self) -> PanRange {
        let b = &self.crop_box;
        PanRange {
            min_x: b.left + b.width - self.display_width,
            max_x: b.left,
            min_y: b.top + b.height - self.display_height,
            max_y: b.top,
        }
    }

    /// Pan that centers the image behind the crop box.
    pub fn centered_pan(&self) -> Pan {
        let b = &self.crop_box;
        Pan {
            x: b.left - (self.display_width - b.width) / 2.0,
            y: b.top - (self.display_height - b.height) / 2.0,
        }
    }

    pub fn clamp_pan(&self, pan: Pan) -> Pan {
        self.pan_range().clamp(pan)
    }

    /// Source pixels per display pixel on each axis.
    pub fn source_scale(&self) -> (f64, f64) {
        (
            self.image_width as f64 / self.display_width,
            self.image_height as f64 / self.display_height,
        )
    }

    /// Convert a pan position into the crop rectangle the box frames.
    ///
    /// The pan is clamped first; offsets and sides are rounded to whole
    /// source pixels and the result is kept inside the image.
    pub fn crop_for_pan(&self, pan: Pan) -> CropRect {
        let pan = self.clamp_pan(pan);
        let (scale_x, scale_y) = self.source_scale();
        let b = &self.crop_box;

        let width = to_pixels(b.width * scale_x).min(self.image_width);
        let height = to_pixels(b.height * scale_y).min(self.image_height);
        let x = to_pixels((b.left - pan.x) * scale_x);
        let y = to_pixels((b.top - pan.y) * scale_y);

        CropRect {
            x: x.min(self.image_width - width),
            y: y.min(self.image_height - height),
            width,
            height,
        }
    }

    /// Pan that shows an existing crop's origin at the box corner, clamped.
    pub fn pan_for_crop(&self, crop: &CropRect) -> Pan {
        let b = &self.crop_box;
        let to_display_x = self.display_width / self.image_width.max(1) as f64;
        let to_display_y = self.display_height / self.image_height.max(1) as f64;
        self.clamp_pan(Pan {
            x: b.left - crop.x as f64 * to_display_x,
            y: b.top - crop.y as f64 * to_display_y,
        })
    }

    /// Crop for the centered pan.
    pub fn centered_crop(&self) -> CropRect {
        self.crop_for_pan(self.centered_pan())
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round().min(u32::MAX as f64) as u32
    }
}
