//! Stateless sizing helpers for the bucket editor UI.

use bucketcrop_core::{centered_crop, dimension};
use wasm_bindgen::prelude::*;

use crate::types::{JsAlignedDimensions, JsCropRect};

/// Snap a requested side to the nearest multiple of 64 (minimum 64).
#[wasm_bindgen]
pub fn normalize_dimension(value: f64) -> u32 {
    dimension::normalize(value)
}

/// Align a requested bucket size and report whether it changed.
///
/// # Example (TypeScript)
/// ```typescript
/// const dims = validate_bucket_size(1000, 700);
/// if (dims.was_adjusted) {
///   showNotice(`Aligned to ${dims.width}x${dims.height}`);
/// }
/// ```
#[wasm_bindgen]
pub fn validate_bucket_size(width: f64, height: f64) -> JsAlignedDimensions {
    dimension::validate_dimensions(width, height).into()
}

/// Largest centered crop of an image at the bucket's aspect ratio.
#[wasm_bindgen]
pub fn default_crop(image_width: u32, image_height: u32, bucket_width: u32, bucket_height: u32) -> JsCropRect {
    let ratio = bucket_width as f64 / bucket_height.max(1) as f64;
    centered_crop(image_width, image_height, ratio).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dimension() {
        assert_eq!(normalize_dimension(100.0), 128);
        assert_eq!(normalize_dimension(10.0), 64);
        assert_eq!(normalize_dimension(f64::NAN), 64);
    }

    #[test]
    fn test_validate_bucket_size() {
        let dims = validate_bucket_size(1024.0, 700.0);
        assert_eq!((dims.width(), dims.height()), (1024, 704));
        assert!(dims.was_adjusted());
        assert!(!validate_bucket_size(512.0, 512.0).was_adjusted());
    }

    #[test]
    fn test_default_crop() {
        let crop = default_crop(1000, 500, 1024, 1024);
        assert_eq!((crop.x(), crop.y(), crop.width(), crop.height()), (250, 0, 500, 500));
    }
}
