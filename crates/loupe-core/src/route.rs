//! The recorded path of one in-progress gesture.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// An ordered, append-only sequence of points recorded during a single
/// gesture, cleared on completion or cancellation.
///
/// Consecutive recorded points differ by at least `min_delta` pixels on one
/// axis, so sensor jitter does not inflate the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureRoute {
    points: Vec<Point>,
    min_delta_x: f32,
    min_delta_y: f32,
}

impl GestureRoute {
    /// Create an empty route with per-axis jitter thresholds.
    #[must_use]
    pub const fn new(min_delta_x: f32, min_delta_y: f32) -> Self {
        Self {
            points: Vec::new(),
            min_delta_x,
            min_delta_y,
        }
    }

    /// Record the gesture's starting point unconditionally.
    pub fn start(&mut self, point: Point) {
        self.points.clear();
        self.points.push(point);
    }

    /// Record a point if it moved at least the minimum delta away from the
    /// previously recorded point. Returns whether the point was recorded.
    pub fn push(&mut self, point: Point) -> bool {
        let Some(last) = self.points.last() else {
            self.points.push(point);
            return true;
        };
        if (point.x - last.x).abs() >= self.min_delta_x
            || (point.y - last.y).abs() >= self.min_delta_y
        {
            self.points.push(point);
            return true;
        }
        false
    }

    /// Discard all recorded points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no point has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The recorded points, in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
