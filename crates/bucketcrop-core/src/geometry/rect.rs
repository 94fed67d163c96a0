//! Crop rectangles in source-pixel coordinates and the centered default crop.

use serde::{Deserialize, Serialize};

/// A crop region in an image's native pixel coordinates.
///
/// Origin is the top-left corner of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Width / height, or 0.0 for a degenerate rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Whether the rectangle lies inside `[0, width] x [0, height]`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Whether the rectangle has `ratio` up to one pixel of integer rounding.
    ///
    /// Both sides are checked against the other scaled by `ratio`, so the
    /// tolerance holds whichever side was derived by rounding.
    pub fn matches_ratio(&self, ratio: f64) -> bool {
        if self.width == 0 || self.height == 0 || !(ratio > 0.0) {
            return false;
        }
        let w = self.width as f64;
        let h = self.height as f64;
        (w - h * ratio).abs() <= 1.0_f64.max(ratio) || (h - w / ratio).abs() <= 1.0
    }

    /// Shift (and if needed shrink) the rectangle to fit inside the image.
    pub fn clamped_to(&self, width: u32, height: u32) -> CropRect {
        let w = self.width.min(width);
        let h = self.height.min(height);
        CropRect {
            x: self.x.min(width - w),
            y: self.y.min(height - h),
            width: w,
            height: h,
        }
    }

    /// The largest rectangle of `ratio` centered inside this one.
    pub fn fitted_to_ratio(&self, ratio: f64) -> CropRect {
        let inner = centered_crop(self.width, self.height, ratio);
        CropRect {
            x: self.x + inner.x,
            y: self.y + inner.y,
            ..inner
        }
    }
}

/// The largest rectangle of `ratio` centered inside a `width x height` image.
///
/// Sides and offsets are floored. An image wider than the target keeps its
/// full height; otherwise it keeps its full width.
///
/// # Example
///
/// ```ignore
/// // 2:1 image into a square bucket
/// assert_eq!(centered_crop(1000, 500, 1.0), CropRect::new(250, 0, 500, 500));
/// ```
pub fn centered_crop(width: u32, height: u32, ratio: f64) -> CropRect {
    if width == 0 || height == 0 || !(ratio > 0.0) || !ratio.is_finite() {
        return CropRect::new(0, 0, width, height);
    }

    let image_ratio = width as f64 / height as f64;

    if image_ratio > ratio {
        // Too wide: trim left and right
        let crop_width = ((height as f64 * ratio).floor() as u32).min(width);
        CropRect {
            x: (width - crop_width) / 2,
            y: 0,
            width: crop_width,
            height,
        }
    } else {
        // Too tall: trim top and bottom
        let crop_height = ((width as f64 / ratio).floor() as u32).min(height);
        CropRect {
            x: 0,
            y: (height - crop_height) / 2,
            width,
            height: crop_height,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ratio_strategy() -> impl Strategy<Value = f64> {
        (1u32..=64, 1u32..=64).prop_map(|(w, h)| (w * 64) as f64 / (h * 64) as f64)
    }

    proptest! {
        /// Property: the default crop always lies inside the image.
        #[test]
        fn prop_default_crop_inside_image(
            width in 1u32..=8000,
            height in 1u32..=8000,
            ratio in ratio_strategy(),
        ) {
            let rect = centered_crop(width, height, ratio);
            prop_assert!(rect.fits_within(width, height));
        }

        /// Property: the default crop keeps one full side of the image.
        #[test]
        fn prop_default_crop_is_maximal(
            width in 1u32..=8000,
            height in 1u32..=8000,
            ratio in ratio_strategy(),
        ) {
            let rect = centered_crop(width, height, ratio);
            prop_assert!(rect.width == width || rect.height == height);
        }

        /// Property: the floored side is within one pixel of the exact value.
        #[test]
        fn prop_default_crop_ratio(
            width in 64u32..=8000,
            height in 64u32..=8000,
            ratio in ratio_strategy(),
        ) {
            let rect = centered_crop(width, height, ratio);
            if rect.width > 0 && rect.height > 0 {
                prop_assert!(rect.matches_ratio(ratio), "{:?} vs ratio {}", rect, ratio);
            }
        }

        /// Property: the crop is centered up to one pixel of flooring.
        #[test]
        fn prop_default_crop_centered(
            width in 1u32..=8000,
            height in 1u32..=8000,
            ratio in ratio_strategy(),
        ) {
            let rect = centered_crop(width, height, ratio);
            let left = rect.x;
            let right = width - rect.right() as u32;
            let top = rect.y;
            let bottom = height - rect.bottom() as u32;
            prop_assert!(right.abs_diff(left) <= 1);
            prop_assert!(bottom.abs_diff(top) <= 1);
        }
    }
}
