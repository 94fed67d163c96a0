//! Crop geometry: default crops, card layout and drag tracking.
//!
//! This module turns image sizes, bucket ratios and viewport interaction
//! into crop rectangles in source-image pixels. It holds no session state.
//!
//! # Rounding
//!
//! - Default crops floor their derived side and their centering offset
//! - Interactive crops round display-to-source conversions to the nearest pixel
//!
//! Switching either operation to the other mode shifts crop boundaries by a
//! pixel.

mod drag;
mod layout;
mod rect;

pub use drag::{DragSession, PointerPosition};
pub use layout::{CardLayout, DisplayBox, Pan, PanRange, ScaleState};
pub use rect::{centered_crop, CropRect};
