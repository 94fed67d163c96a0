//! Session configuration.
//!
//! Every tunable of the engine lives here with its default. All structs
//! deserialize with `#[serde(default)]`, so a front end may pass a partial
//! object (or nothing) and get the stock behavior for the rest.

use serde::{Deserialize, Serialize};

/// Top-level configuration for an editing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Geometry of each image card's viewport.
    pub viewport: ViewportConfig,
    /// Limits for independent zoom in scaling mode.
    pub zoom: ZoomLimits,
    /// Aspect ratio thresholds used when classifying scanned images.
    pub classification: ClassificationThresholds,
    /// Bucket sizes used when a class has no images to take a median from.
    pub fallback: FallbackDimensions,
}

/// Fixed display viewport of an image card, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    /// Gap between the viewport edge and the crop box on the constraining axis.
    pub inset: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 280.0,
            height: 180.0,
            inset: 20.0,
        }
    }
}

/// Zoom range and button step for scaling mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.1,
        }
    }
}

impl ZoomLimits {
    /// Clamp a requested zoom factor into range. NaN maps to 1.0.
    pub fn clamp(&self, factor: f64) -> f64 {
        if factor.is_nan() {
            return 1.0_f64.clamp(self.min, self.max);
        }
        factor.clamp(self.min, self.max)
    }
}

/// Width/height ratio thresholds separating landscape, square and portrait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    /// Ratios strictly above this are landscape.
    pub landscape_above: f64,
    /// Ratios strictly below this are portrait.
    pub portrait_below: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            landscape_above: 1.1,
            portrait_below: 0.9,
        }
    }
}

/// Default bucket sizes for empty classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackDimensions {
    pub landscape: (u32, u32),
    pub square: (u32, u32),
    pub portrait: (u32, u32),
}

impl Default for FallbackDimensions {
    fn default() -> Self {
        Self {
            landscape: (1024, 768),
            square: (1024, 1024),
            portrait: (768, 1024),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let config = SessionConfig::default();
        assert_eq!(config.viewport.width, 280.0);
        assert_eq!(config.viewport.height, 180.0);
        assert_eq!(config.viewport.inset, 20.0);
    }

    #[test]
    fn test_zoom_clamp() {
        let zoom = ZoomLimits::default();
        assert_eq!(zoom.clamp(0.1), 0.5);
        assert_eq!(zoom.clamp(5.0), 3.0);
        assert_eq!(zoom.clamp(1.3), 1.3);
        assert_eq!(zoom.clamp(f64::NAN), 1.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"zoom": {"max": 2.0}}"#).unwrap();
        assert_eq!(config.zoom.max, 2.0);
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}
