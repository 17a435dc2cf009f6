//! The window magnification manager: geometry authority for the movable
//! magnifier window.
//!
//! Invariants enforced on every mutation:
//! - `source` stays fully inside the screen,
//! - the window's on-screen position is independently clamped to the screen,
//! - `scale` stays within `[DEFAULT_SCALE, MAX_SCALE]`,
//! - a `set_scale` whose implied source rectangle would leave the screen is
//!   rejected with geometry unchanged.

use crate::surface::{MagnifierSurface, Viewport};
use crate::{DEFAULT_SCALE, HOT_AREA_WIDTH, MAX_SCALE, SCALE_EPSILON, SCALE_SPAN_FACTOR, WINDOW_SIZE_RATIO};
use log::{debug, warn};
use loupe_core::{Announcement, Announcer, Point, Rect, SettingsStore, Size};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
struct WindowState {
    screen: Rect,
    window: Rect,
    source: Rect,
    scale: f32,
    shown: bool,
    fixed_center: Option<Point>,
}

impl WindowState {
    fn new(screen: Rect) -> Self {
        let window = Rect::centered_at(
            screen.center(),
            Size::new(
                screen.width * WINDOW_SIZE_RATIO,
                screen.height * WINDOW_SIZE_RATIO,
            ),
        );
        let source = Rect::centered_at(screen.center(), window.size().scale(1.0 / DEFAULT_SCALE));
        Self {
            screen,
            window,
            source,
            scale: DEFAULT_SCALE,
            shown: false,
            fixed_center: None,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.window, self.source, self.scale)
    }

    /// Recenter window and source on a point, clamping both to the screen.
    fn recenter(&mut self, center: Point) {
        self.window = Rect::centered_at(center, self.window.size()).clamped_within(&self.screen);
        self.source = Rect::centered_at(self.window.center(), self.window.size().scale(1.0 / self.scale))
            .clamped_within(&self.screen);
    }
}

/// Owns the magnifier window geometry and coordinate conversion between
/// screen space and magnified space.
///
/// Geometry is guarded by a mutex because it is also queried from the
/// settings/IPC thread; the lock is never held across a call into the
/// magnifier surface.
pub struct WindowMagnificationManager {
    state: Mutex<WindowState>,
    surface: Mutex<Box<dyn MagnifierSurface>>,
    settings: Arc<dyn SettingsStore>,
    announcer: Arc<dyn Announcer>,
}

impl std::fmt::Debug for WindowMagnificationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowMagnificationManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl WindowMagnificationManager {
    /// Create a manager for a screen, with its surface and collaborators.
    #[must_use]
    pub fn new(
        screen: Rect,
        surface: Box<dyn MagnifierSurface>,
        settings: Arc<dyn SettingsStore>,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        Self {
            state: Mutex::new(WindowState::new(screen)),
            surface: Mutex::new(surface),
            settings,
            announcer,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WindowState> {
        self.state.lock().expect("window geometry lock poisoned")
    }

    fn surface_show(&self, viewport: Viewport) {
        self.surface
            .lock()
            .expect("surface lock poisoned")
            .show(viewport);
    }

    fn surface_update(&self, viewport: Viewport) {
        self.surface
            .lock()
            .expect("surface lock poisoned")
            .update(viewport);
    }

    fn surface_hide(&self, clear: bool) {
        self.surface
            .lock()
            .expect("surface lock poisoned")
            .hide(clear);
    }

    /// Enable magnification with the window centered on the given point.
    ///
    /// The scale is taken from the settings store, clamped into the
    /// interactive range.
    pub fn enable_window_magnification(&self, center_x: f32, center_y: f32) {
        let viewport = {
            let mut state = self.lock();
            state.scale = self
                .settings
                .magnification_scale()
                .clamp(DEFAULT_SCALE, MAX_SCALE);
            state.fixed_center = None;
            state.recenter(Point::new(center_x, center_y));
            state.shown = true;
            state.viewport()
        };
        self.surface_show(viewport);
    }

    /// Re-show the magnifier with its current geometry.
    pub fn show_window_magnification(&self) {
        let viewport = {
            let mut state = self.lock();
            state.shown = true;
            state.viewport()
        };
        self.surface_show(viewport);
    }

    /// Show at a position; the (0, 0) origin means "wherever it was".
    pub fn show_window_magnification_with_position(&self, pos: Point) {
        if pos == Point::ORIGIN {
            self.show_window_magnification();
        } else {
            self.enable_window_magnification(pos.x, pos.y);
        }
    }

    /// Hide the magnifier window.
    pub fn disable_window_magnification(&self, need_clear: bool) {
        {
            let mut state = self.lock();
            state.shown = false;
            state.fixed_center = None;
        }
        self.surface_hide(need_clear);
    }

    /// Adjust the scale by a two-finger span delta (pixels).
    ///
    /// Rejected (geometry unchanged) when the implied source rectangle would
    /// fall outside the screen; the pinch simply stops having an effect there
    /// instead of producing a visible jump.
    pub fn set_scale(&self, delta_span: f32) {
        let viewport = {
            let mut state = self.lock();
            if !state.shown {
                debug!("set_scale ignored: magnifier not shown");
                return;
            }
            let new_scale =
                (state.scale + delta_span / SCALE_SPAN_FACTOR).clamp(DEFAULT_SCALE, MAX_SCALE);
            if (new_scale - state.scale).abs() < SCALE_EPSILON {
                return;
            }
            let center = state.fixed_center.unwrap_or_else(|| state.source.center());
            let candidate =
                Rect::centered_at(center, state.window.size().scale(1.0 / new_scale));
            if !state.screen.contains_rect(&candidate) {
                debug!("set_scale rejected: source would leave the screen");
                return;
            }
            state.scale = new_scale;
            state.source = candidate;
            if (new_scale - DEFAULT_SCALE).abs() < SCALE_EPSILON {
                state.fixed_center = None;
            }
            state.viewport()
        };
        self.surface_update(viewport);
    }

    /// Move the magnifier window by a delta; the magnified content pans with
    /// the drag. Window and source positions are clamped to the screen
    /// independently.
    pub fn move_magnification_window(&self, delta_x: f32, delta_y: f32) {
        let viewport = {
            let mut state = self.lock();
            if !state.shown {
                debug!("move ignored: magnifier not shown");
                return;
            }
            state.window = state
                .window
                .translated(delta_x, delta_y)
                .clamped_within(&state.screen);
            state.source = state
                .source
                .translated(delta_x, delta_y)
                .clamped_within(&state.screen);
            state.viewport()
        };
        self.surface_update(viewport);
    }

    /// Pin (or release) the source center used while an interactive pinch is
    /// scaling. Released automatically when the scale returns to the default.
    pub fn fix_source_center(&self, need_fix: bool) {
        let mut state = self.lock();
        state.fixed_center = if need_fix {
            Some(state.source.center())
        } else {
            None
        };
    }

    /// Write the current scale to the settings store and announce it.
    ///
    /// Deliberately separate from `set_scale`: the pinch gesture is far too
    /// chatty to persist every sample.
    pub fn persist_scale(&self) {
        let scale = self.lock().scale;
        self.settings.set_magnification_scale(scale);
        self.announcer.announce(Announcement::ScaleChanged);
    }

    /// Convert a screen-space point over the magnifier window into the
    /// corresponding source-content position. Points outside the window (or
    /// with the magnifier hidden) pass through unchanged.
    #[must_use]
    pub fn convert_coordinates(&self, pos: Point) -> Point {
        let state = self.lock();
        if !state.shown || !state.window.contains_point(&pos) {
            return pos;
        }
        Point::new(
            state.source.x + (pos.x - state.window.x) / state.scale,
            state.source.y + (pos.y - state.window.y) / state.scale,
        )
    }

    /// Whether the point lies on the visible magnifier window.
    #[must_use]
    pub fn is_tap_on_magnification_window(&self, pos: Point) -> bool {
        let state = self.lock();
        state.shown && state.window.contains_point(&pos)
    }

    /// Whether the point lies in the hot-area band straddling the window
    /// edge, used to distinguish window-dragging from content interaction.
    #[must_use]
    pub fn is_tap_on_hot_area(&self, pos: Point) -> bool {
        let state = self.lock();
        if !state.shown {
            return false;
        }
        let outer = state.window.inflate(HOT_AREA_WIDTH / 2.0);
        let inner = state.window.inset(HOT_AREA_WIDTH / 2.0);
        outer.contains_point(&pos) && !inner.contains_point(&pos)
    }

    /// Recenter the magnifier on an externally focused element.
    pub fn follow_focus_element(&self, center_x: f32, center_y: f32) {
        let viewport = {
            let mut state = self.lock();
            if !state.shown {
                debug!("follow focus ignored: magnifier not shown");
                return;
            }
            state.recenter(Point::new(center_x, center_y));
            state.viewport()
        };
        self.surface_update(viewport);
    }

    /// Re-derive geometry for new screen bounds (rotation), preserving the
    /// window center and scale.
    pub fn refresh_window_param(&self, screen: Rect) {
        let update = {
            let mut state = self.lock();
            if screen.width <= 0.0 || screen.height <= 0.0 {
                warn!("refresh ignored: degenerate screen rect");
                return;
            }
            state.screen = screen;
            state.window = Rect::centered_at(
                state.window.center(),
                Size::new(
                    screen.width * WINDOW_SIZE_RATIO,
                    screen.height * WINDOW_SIZE_RATIO,
                ),
            )
            .clamped_within(&screen);
            let scale = state.scale;
            state.source =
                Rect::centered_at(state.window.center(), state.window.size().scale(1.0 / scale))
                    .clamped_within(&screen);
            state.shown.then(|| state.viewport())
        };
        if let Some(viewport) = update {
            self.surface_update(viewport);
        }
    }

    /// Whether the magnifier window is currently shown.
    #[must_use]
    pub fn is_magnification_window_show(&self) -> bool {
        self.lock().shown
    }

    /// Current scale factor.
    #[must_use]
    pub fn get_scale(&self) -> f32 {
        self.lock().scale
    }

    /// Center of the source region.
    #[must_use]
    pub fn get_source_center(&self) -> Point {
        self.lock().source.center()
    }

    /// Current source rectangle.
    #[must_use]
    pub fn source_rect(&self) -> Rect {
        self.lock().source
    }

    /// Current window rectangle.
    #[must_use]
    pub fn window_rect(&self) -> Rect {
        self.lock().window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NullSurface;
    use loupe_core::{MemorySettings, NullAnnouncer};
    use proptest::prelude::*;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    fn manager() -> WindowMagnificationManager {
        manager_with_scale(DEFAULT_SCALE)
    }

    fn manager_with_scale(scale: f32) -> WindowMagnificationManager {
        WindowMagnificationManager::new(
            SCREEN,
            Box::new(NullSurface),
            Arc::new(MemorySettings::new(scale)),
            Arc::new(NullAnnouncer),
        )
    }

    #[test]
    fn test_enable_centers_window_and_source() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        assert!(mgr.is_magnification_window_show());
        assert_eq!(mgr.window_rect().center(), Point::new(500.0, 400.0));
        assert_eq!(mgr.get_source_center(), Point::new(500.0, 400.0));
        // source = window / scale
        assert_eq!(mgr.source_rect().size(), Size::new(250.0, 200.0));
    }

    #[test]
    fn test_enable_near_edge_clamps_inside_screen() {
        let mgr = manager();
        mgr.enable_window_magnification(0.0, 0.0);
        assert!(SCREEN.contains_rect(&mgr.window_rect()));
        assert!(SCREEN.contains_rect(&mgr.source_rect()));
    }

    #[test]
    fn test_enable_clamps_persisted_scale_into_range() {
        let mgr = manager_with_scale(100.0);
        mgr.enable_window_magnification(500.0, 400.0);
        assert!((mgr.get_scale() - MAX_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_scale_moves_with_span_sign_and_stays_bounded() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        let before = mgr.get_scale();
        mgr.set_scale(400.0);
        assert!(mgr.get_scale() > before);
        // grind it far past the bound
        for _ in 0..100 {
            mgr.set_scale(400.0);
        }
        assert!(mgr.get_scale() <= MAX_SCALE);
        for _ in 0..100 {
            mgr.set_scale(-400.0);
        }
        assert!(mgr.get_scale() >= DEFAULT_SCALE);
    }

    #[test]
    fn test_set_scale_noop_when_hidden() {
        let mgr = manager();
        mgr.set_scale(400.0);
        assert!((mgr.get_scale() - DEFAULT_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_scale_rejects_source_leaving_screen() {
        let mgr = manager_with_scale(MAX_SCALE);
        mgr.enable_window_magnification(500.0, 400.0);
        // drag everything into the top-left corner: the small high-zoom
        // source ends up hugging the corner
        mgr.move_magnification_window(-10_000.0, -10_000.0);
        let before = mgr.source_rect();
        // zooming far out implies a bigger source rect centered near the
        // corner, which would leave the screen: must be rejected, not clamped
        mgr.set_scale(-SCALE_SPAN_FACTOR * (MAX_SCALE - DEFAULT_SCALE));
        assert_eq!(mgr.source_rect(), before);
        assert!((mgr.get_scale() - MAX_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_scale_releases_anchor_at_default_scale() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        mgr.set_scale(SCALE_SPAN_FACTOR); // scale 3.0
        mgr.fix_source_center(true);
        mgr.set_scale(-SCALE_SPAN_FACTOR); // back to exactly 2.0
        assert!((mgr.get_scale() - DEFAULT_SCALE).abs() < SCALE_EPSILON);
        // anchor released: the next scale-up recenters on the live source
        mgr.move_magnification_window(50.0, 0.0);
        let center = mgr.get_source_center();
        mgr.set_scale(SCALE_SPAN_FACTOR);
        assert!((mgr.get_source_center().x - center.x).abs() < 1.0);
    }

    #[test]
    fn test_move_clamps_window_and_source() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        mgr.move_magnification_window(10_000.0, 10_000.0);
        assert!(SCREEN.contains_rect(&mgr.window_rect()));
        assert!(SCREEN.contains_rect(&mgr.source_rect()));
        // window rides the bottom-right corner
        let w = mgr.window_rect();
        assert!((w.x + w.width - SCREEN.width).abs() < f32::EPSILON);
        assert!((w.y + w.height - SCREEN.height).abs() < f32::EPSILON);
    }

    #[test]
    fn test_convert_coordinates_identity_outside_window() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        let outside = Point::new(10.0, 10.0);
        assert_eq!(mgr.convert_coordinates(outside), outside);
    }

    #[test]
    fn test_convert_coordinates_maps_into_source() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        let window = mgr.window_rect();
        let source = mgr.source_rect();
        // window origin maps to source origin
        assert_eq!(mgr.convert_coordinates(window.origin()), source.origin());
        // window center maps to source center
        let center = mgr.convert_coordinates(window.center());
        assert!((center.x - source.center().x).abs() < 0.001);
        assert!((center.y - source.center().y).abs() < 0.001);
    }

    #[test]
    fn test_hot_area_band() {
        let mgr = manager();
        mgr.enable_window_magnification(500.0, 400.0);
        let window = mgr.window_rect();
        let on_edge = Point::new(window.x, window.center().y);
        let deep_inside = window.center();
        let far_outside = Point::new(window.x - HOT_AREA_WIDTH, window.center().y);
        assert!(mgr.is_tap_on_hot_area(on_edge));
        assert!(!mgr.is_tap_on_hot_area(deep_inside));
        assert!(!mgr.is_tap_on_hot_area(far_outside));
        assert!(mgr.is_tap_on_magnification_window(deep_inside));
    }

    #[test]
    fn test_tap_queries_false_when_hidden() {
        let mgr = manager();
        assert!(!mgr.is_tap_on_magnification_window(Point::new(500.0, 400.0)));
        assert!(!mgr.is_tap_on_hot_area(Point::new(500.0, 400.0)));
    }

    #[test]
    fn test_persist_scale_writes_settings_store() {
        let settings = Arc::new(MemorySettings::new(DEFAULT_SCALE));
        let mgr = WindowMagnificationManager::new(
            SCREEN,
            Box::new(NullSurface),
            settings.clone(),
            Arc::new(NullAnnouncer),
        );
        mgr.enable_window_magnification(500.0, 400.0);
        mgr.set_scale(SCALE_SPAN_FACTOR);
        mgr.persist_scale();
        assert!((settings.magnification_scale() - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_refresh_window_param_keeps_invariants() {
        let mgr = manager();
        mgr.enable_window_magnification(900.0, 700.0);
        let rotated = Rect::new(0.0, 0.0, 800.0, 1000.0);
        mgr.refresh_window_param(rotated);
        assert!(rotated.contains_rect(&mgr.window_rect()));
        assert!(rotated.contains_rect(&mgr.source_rect()));
        assert_eq!(mgr.window_rect().size(), Size::new(400.0, 500.0));
    }

    proptest! {
        #[test]
        fn prop_source_contained_after_any_mutation(
            cx in 0.0f32..1000.0,
            cy in 0.0f32..800.0,
            spans in proptest::collection::vec(-300.0f32..300.0, 1..12),
            dx in -2000.0f32..2000.0,
            dy in -2000.0f32..2000.0,
        ) {
            let mgr = manager();
            mgr.enable_window_magnification(cx, cy);
            for span in spans {
                mgr.set_scale(span);
                prop_assert!(SCREEN.contains_rect(&mgr.source_rect()));
                prop_assert!(mgr.get_scale() >= DEFAULT_SCALE && mgr.get_scale() <= MAX_SCALE);
            }
            mgr.move_magnification_window(dx, dy);
            prop_assert!(SCREEN.contains_rect(&mgr.source_rect()));
            prop_assert!(SCREEN.contains_rect(&mgr.window_rect()));
        }

        #[test]
        fn prop_convert_coordinates_lands_in_source(
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            spans in proptest::collection::vec(-150.0f32..150.0, 0..6),
        ) {
            let mgr = manager();
            mgr.enable_window_magnification(500.0, 400.0);
            for span in spans {
                mgr.set_scale(span);
            }
            let window = mgr.window_rect();
            let p = Point::new(window.x + window.width * fx, window.y + window.height * fy);
            let mapped = mgr.convert_coordinates(p);
            let source = mgr.source_rect();
            prop_assert!(source.contains_point(&mapped));
            // inverse of the projection: offset ratio is preserved
            let expected_x = source.x + (p.x - window.x) / mgr.get_scale();
            prop_assert!((mapped.x - expected_x).abs() < 0.001);
        }
    }
}
