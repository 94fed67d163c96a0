//! Bucketcrop WASM - WebAssembly bindings for the bucketcrop session engine
//!
//! This crate exposes the bucketcrop-core session to a browser front end.
//! Folder scanning and export run natively; the browser receives a scan
//! result, drives the session with UI events and hands the export request
//! back.
//!
//! # Module Structure
//!
//! - `session` - `JsSession`, the stateful editing session
//! - `dimension` - Stateless sizing helpers (alignment, default crops)
//! - `types` - WASM-compatible wrapper types and conversions
//! - `logging` - Console sink for `log` records
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession, validate_bucket_size } from '@bucketcrop/wasm';
//!
//! await init();
//!
//! const session = new JsSession(scanResult, undefined);
//! session.resize_bucket('A', 1000, 700);
//! console.log(session.take_notices());
//! ```

use wasm_bindgen::prelude::*;

mod dimension;
mod logging;
mod session;
mod types;

pub use dimension::{default_crop, normalize_dimension, validate_bucket_size};
pub use logging::set_log_level;
pub use session::JsSession;
pub use types::{JsAlignedDimensions, JsCropRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
