//! The opaque window-system collaborator that draws the magnifier.

use loupe_core::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Everything the window system needs to draw one magnifier frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// On-screen rectangle occupied by the magnifier's displayed surface
    pub window: Rect,
    /// Region of real screen content currently being magnified
    pub source: Rect,
    /// Source origin relative to the window origin, clamped into
    /// `[0, window.size - source.size]` on both axes
    pub relative_source_origin: Point,
    /// Magnification factor
    pub scale: f32,
}

impl Viewport {
    /// Build a viewport, deriving the clamped relative source origin.
    #[must_use]
    pub fn new(window: Rect, source: Rect, scale: f32) -> Self {
        let rel = source.origin() - window.origin();
        let max_x = (window.width - source.width).max(0.0);
        let max_y = (window.height - source.height).max(0.0);
        Self {
            window,
            source,
            relative_source_origin: Point::new(rel.x.clamp(0.0, max_x), rel.y.clamp(0.0, max_y)),
            scale,
        }
    }
}

/// Rendering handle for a magnifier surface.
///
/// Implementations own the platform window; the managers never touch
/// rendering handles directly and never hold their geometry lock across a
/// call into this trait.
pub trait MagnifierSurface: Send {
    /// Create/show the surface for the given viewport.
    fn show(&mut self, viewport: Viewport);
    /// Redraw an already-visible surface.
    fn update(&mut self, viewport: Viewport);
    /// Hide the surface; `clear` additionally destroys cached resources.
    fn hide(&mut self, clear: bool);
}

/// A surface that draws nothing. Useful for headless operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl MagnifierSurface for NullSurface {
    fn show(&mut self, _viewport: Viewport) {}
    fn update(&mut self, _viewport: Viewport) {}
    fn hide(&mut self, _clear: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_origin_clamped_to_window() {
        let window = Rect::new(100.0, 100.0, 200.0, 200.0);
        let source = Rect::new(90.0, 150.0, 100.0, 100.0);
        let viewport = Viewport::new(window, source, 2.0);
        // x underflows (source left of window), y inside
        assert_eq!(viewport.relative_source_origin, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_relative_origin_upper_bound() {
        let window = Rect::new(0.0, 0.0, 200.0, 200.0);
        let source = Rect::new(150.0, 150.0, 100.0, 100.0);
        let viewport = Viewport::new(window, source, 2.0);
        assert_eq!(viewport.relative_source_origin, Point::new(100.0, 100.0));
    }
}
