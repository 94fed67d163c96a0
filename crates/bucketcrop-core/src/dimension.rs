//! Bucket dimension alignment.
//!
//! Training pipelines batch images per bucket, and every bucket side must be
//! a multiple of [`ALIGNMENT`] so latents tile cleanly. This module is the
//! single rounding policy used both when a bucket is resized and when a
//! front end asks for a proposed size to be validated.

use serde::{Deserialize, Serialize};

/// Alignment unit for all bucket dimensions, in pixels.
pub const ALIGNMENT: u32 = 64;

/// Snap a value to the nearest multiple of [`ALIGNMENT`], never below it.
///
/// Halfway values round away from zero (`96 -> 128`, `160 -> 192`).
/// Non-finite input maps to [`ALIGNMENT`].
///
/// # Example
///
/// ```ignore
/// assert_eq!(normalize(100.0), 128);
/// assert_eq!(normalize(1080.0), 1088);
/// assert_eq!(normalize(10.0), 64);
/// ```
pub fn normalize(value: f64) -> u32 {
    if !value.is_finite() {
        return ALIGNMENT;
    }
    let unit = ALIGNMENT as f64;
    let snapped = (value / unit).round() * unit;
    if snapped < unit {
        ALIGNMENT
    } else if snapped >= u32::MAX as f64 {
        // Largest aligned u32
        u32::MAX - (u32::MAX % ALIGNMENT)
    } else {
        snapped as u32
    }
}

/// Result of aligning a proposed width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedDimensions {
    pub width: u32,
    pub height: u32,
    /// True when either side differs from what the caller asked for.
    pub was_adjusted: bool,
}

/// Align both sides of a proposed bucket size.
///
/// This is also the validation path a front end calls before committing a
/// resize, so the two can never disagree about the rounding policy.
pub fn validate_dimensions(width: f64, height: f64) -> AlignedDimensions {
    let aligned_width = normalize(width);
    let aligned_height = normalize(height);
    AlignedDimensions {
        width: aligned_width,
        height: aligned_height,
        was_adjusted: aligned_width as f64 != width || aligned_height as f64 != height,
    }
}

/// Whether a dimension already satisfies the alignment invariant.
#[inline]
pub fn is_aligned(value: u32) -> bool {
    value >= ALIGNMENT && value % ALIGNMENT == 0
}
