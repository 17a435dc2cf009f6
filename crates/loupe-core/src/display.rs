//! Display metrics and the DPI-derived gesture thresholds.

use serde::{Deserialize, Serialize};

/// Metrics of the display the gesture engines run against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Screen width in pixels
    pub width: f32,
    /// Screen height in pixels
    pub height: f32,
    /// Dots per inch
    pub dpi: f32,
    /// Virtual pixel ratio (density)
    pub density: f32,
}

const MM_PER_INCH: f32 = 25.4;
const DOUBLE_TAP_SLOP_DP: f32 = 100.0;
const SLOP_DELTA: f32 = 0.5;

impl DisplayMetrics {
    /// Create display metrics.
    #[must_use]
    pub const fn new(width: f32, height: f32, dpi: f32, density: f32) -> Self {
        Self {
            width,
            height,
            dpi,
            density,
        }
    }

    /// Displacement (pixels, 10 mm) after which a single-finger stream is
    /// reclassified as a directional gesture.
    #[must_use]
    pub fn gesture_threshold(&self) -> f32 {
        self.dpi / MM_PER_INCH * 10.0
    }

    /// Minimum per-axis delta (pixels) recorded into a gesture route.
    #[must_use]
    pub fn route_min_pixels(&self) -> f32 {
        self.dpi * 0.1
    }

    /// Density-scaled slop distance for matching consecutive tap positions.
    #[must_use]
    pub fn double_tap_slop(&self) -> f32 {
        self.density * DOUBLE_TAP_SLOP_DP + SLOP_DELTA
    }

    /// `double_tap_slop` squared, for squared-distance comparisons.
    #[must_use]
    pub fn double_tap_slop_squared(&self) -> f32 {
        let slop = self.double_tap_slop();
        slop * slop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: DisplayMetrics = DisplayMetrics::new(1080.0, 2340.0, 160.0, 1.0);

    #[test]
    fn test_gesture_threshold_is_ten_millimetres() {
        // 160 dpi / 25.4 mm ~ 6.3 px per mm
        assert!((METRICS.gesture_threshold() - 62.992).abs() < 0.01);
    }

    #[test]
    fn test_route_min_pixels() {
        assert!((METRICS.route_min_pixels() - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_double_tap_slop_scales_with_density() {
        let dense = DisplayMetrics::new(1080.0, 2340.0, 160.0, 3.0);
        assert!(dense.double_tap_slop() > METRICS.double_tap_slop());
        assert!((METRICS.double_tap_slop_squared() - 100.5 * 100.5).abs() < 0.01);
    }
}
