//! WASM-compatible wrapper types and conversions.
//!
//! Small value types are exposed as classes with getters; larger views are
//! handed to JavaScript as plain objects through `serde-wasm-bindgen`.

use bucketcrop_core::{AlignedDimensions, BucketId, CropRect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A crop rectangle in source-image pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsCropRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u32 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u32 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<CropRect> for JsCropRect {
    fn from(crop: CropRect) -> Self {
        Self {
            x: crop.x,
            y: crop.y,
            width: crop.width,
            height: crop.height,
        }
    }
}

/// Result of aligning a requested bucket size.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsAlignedDimensions {
    width: u32,
    height: u32,
    was_adjusted: bool,
}

#[wasm_bindgen]
impl JsAlignedDimensions {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True if either side differed from the request.
    #[wasm_bindgen(getter)]
    pub fn was_adjusted(&self) -> bool {
        self.was_adjusted
    }
}

impl From<AlignedDimensions> for JsAlignedDimensions {
    fn from(dims: AlignedDimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            was_adjusted: dims.was_adjusted,
        }
    }
}

/// Parse a bucket id ("A", "B", "C") coming from JavaScript.
pub(crate) fn parse_bucket(id: &str) -> Result<BucketId, JsValue> {
    id.parse::<BucketId>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Serialize a value into a plain JS object.
///
/// Maps become objects rather than `Map`s so bucket-keyed tables read
/// naturally on the JS side.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}
