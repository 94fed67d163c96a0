//! Pointer drag tracking for a single card.
//!
//! A [`DragSession`] exists only between pointer-down and pointer-up. It is
//! consumed by [`DragSession::finish`], so a finished drag cannot keep
//! producing pan updates; dropping it without finishing is a cancel.

use super::layout::{CardLayout, Pan};
use super::rect::CropRect;

/// Pointer position in viewport-space display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An in-progress drag of one image beneath its crop box.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    layout: CardLayout,
    /// Pointer minus pan at pointer-down.
    grab_offset: Pan,
    pan: Pan,
}

impl DragSession {
    /// Start dragging from `pan` with the pointer at `pointer`.
    pub fn begin(layout: CardLayout, pan: Pan, pointer: PointerPosition) -> Self {
        let pan = layout.clamp_pan(pan);
        Self {
            layout,
            grab_offset: Pan::new(pointer.x - pan.x, pointer.y - pan.y),
            pan,
        }
    }

    /// Follow the pointer, clamping so the crop box stays covered.
    pub fn update(&mut self, pointer: PointerPosition) -> Pan {
        let wanted = Pan::new(pointer.x - self.grab_offset.x, pointer.y - self.grab_offset.y);
        self.pan = self.layout.clamp_pan(wanted);
        self.pan
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// End the drag, returning the final pan and the crop it frames.
    pub fn finish(self) -> (Pan, CropRect) {
        let crop = self.layout.crop_for_pan(self.pan);
        (self.pan, crop)
    }
}
