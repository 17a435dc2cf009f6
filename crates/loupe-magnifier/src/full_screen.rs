//! The full-screen magnification manager: the whole display is the magnifier
//! window, and only the source region moves.

use crate::surface::{MagnifierSurface, Viewport};
use crate::{DEFAULT_SCALE, HOT_AREA_WIDTH, MAX_SCALE, SCALE_EPSILON, SCALE_SPAN_FACTOR};
use log::{debug, warn};
use loupe_core::{Announcement, Announcer, Point, Rect, SettingsStore};
use std::sync::{Arc, Mutex};

/// Which screen-edge band a tap landed on while full-screen magnified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeZone {
    /// Left edge band
    Left,
    /// Right edge band
    Right,
    /// Top edge band
    Top,
    /// Bottom edge band
    Bottom,
}

#[derive(Debug, Clone, Copy)]
struct FullScreenState {
    screen: Rect,
    source: Rect,
    scale: f32,
    shown: bool,
    fixed_center: Option<Point>,
}

impl FullScreenState {
    fn new(screen: Rect) -> Self {
        Self {
            screen,
            source: Rect::centered_at(screen.center(), screen.size().scale(1.0 / DEFAULT_SCALE)),
            scale: DEFAULT_SCALE,
            shown: false,
            fixed_center: None,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.screen, self.source, self.scale)
    }
}

/// Geometry authority for the full-screen magnification mode.
///
/// Same locking discipline as the window manager: geometry behind a mutex,
/// no lock held across surface calls.
pub struct FullScreenMagnificationManager {
    state: Mutex<FullScreenState>,
    surface: Mutex<Box<dyn MagnifierSurface>>,
    settings: Arc<dyn SettingsStore>,
    announcer: Arc<dyn Announcer>,
}

impl std::fmt::Debug for FullScreenMagnificationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullScreenMagnificationManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FullScreenMagnificationManager {
    /// Create a manager for a screen, with its surface and collaborators.
    #[must_use]
    pub fn new(
        screen: Rect,
        surface: Box<dyn MagnifierSurface>,
        settings: Arc<dyn SettingsStore>,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        Self {
            state: Mutex::new(FullScreenState::new(screen)),
            surface: Mutex::new(surface),
            settings,
            announcer,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FullScreenState> {
        self.state
            .lock()
            .expect("full-screen geometry lock poisoned")
    }

    fn with_surface(&self, f: impl FnOnce(&mut dyn MagnifierSurface)) {
        f(&mut **self.surface.lock().expect("surface lock poisoned"));
    }

    /// Enable full-screen magnification around the given point; scale comes
    /// from the settings store, clamped into the interactive range.
    pub fn enable_magnification(&self, center_x: f32, center_y: f32) {
        let viewport = {
            let mut state = self.lock();
            state.scale = self
                .settings
                .magnification_scale()
                .clamp(DEFAULT_SCALE, MAX_SCALE);
            state.fixed_center = None;
            let scale = state.scale;
            state.source = Rect::centered_at(
                Point::new(center_x, center_y),
                state.screen.size().scale(1.0 / scale),
            )
            .clamped_within(&state.screen);
            state.shown = true;
            state.viewport()
        };
        self.with_surface(|s| s.show(viewport));
    }

    /// Re-show with the current geometry.
    pub fn show_magnification(&self) {
        let viewport = {
            let mut state = self.lock();
            state.shown = true;
            state.viewport()
        };
        self.with_surface(|s| s.show(viewport));
    }

    /// Show at a position; the (0, 0) origin means "wherever it was".
    pub fn show_magnification_with_position(&self, pos: Point) {
        if pos == Point::ORIGIN {
            self.show_magnification();
        } else {
            self.enable_magnification(pos.x, pos.y);
        }
    }

    /// Turn full-screen magnification off.
    pub fn disable_magnification(&self, need_clear: bool) {
        {
            let mut state = self.lock();
            state.shown = false;
            state.fixed_center = None;
        }
        self.with_surface(|s| s.hide(need_clear));
    }

    /// Adjust the scale by a two-finger span delta (pixels). Same rejection
    /// policy as the window manager: an implied source rectangle outside the
    /// screen leaves geometry unchanged.
    pub fn set_scale(&self, delta_span: f32) {
        let viewport = {
            let mut state = self.lock();
            if !state.shown {
                debug!("set_scale ignored: magnification not shown");
                return;
            }
            let new_scale =
                (state.scale + delta_span / SCALE_SPAN_FACTOR).clamp(DEFAULT_SCALE, MAX_SCALE);
            if (new_scale - state.scale).abs() < SCALE_EPSILON {
                return;
            }
            let center = state.fixed_center.unwrap_or_else(|| state.source.center());
            let candidate =
                Rect::centered_at(center, state.screen.size().scale(1.0 / new_scale));
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
        self.with_surface(|s| s.update(viewport));
    }

    /// Pan the magnified content: dragging right moves the content right,
    /// i.e. the source region moves the opposite way, scaled down.
    pub fn move_magnification(&self, delta_x: f32, delta_y: f32) {
        let viewport = {
            let mut state = self.lock();
            if !state.shown {
                debug!("move ignored: magnification not shown");
                return;
            }
            let scale = state.scale;
            state.source = state
                .source
                .translated(-delta_x / scale, -delta_y / scale)
                .clamped_within(&state.screen);
            state.viewport()
        };
        self.with_surface(|s| s.update(viewport));
    }

    /// Pin (or release) the source center used while a pinch is scaling.
    pub fn fix_source_center(&self, need_fix: bool) {
        let mut state = self.lock();
        state.fixed_center = if need_fix {
            Some(state.source.center())
        } else {
            None
        };
    }

    /// Write the current scale to the settings store and announce it.
    pub fn persist_scale(&self) {
        let scale = self.lock().scale;
        self.settings.set_magnification_scale(scale);
        self.announcer.announce(Announcement::ScaleChanged);
    }

    /// Map a screen point to the source-content position under it. Identity
    /// while magnification is hidden.
    #[must_use]
    pub fn convert_coordinates(&self, pos: Point) -> Point {
        let state = self.lock();
        if !state.shown {
            return pos;
        }
        Point::new(
            state.source.x + (pos.x - state.screen.x) / state.scale,
            state.source.y + (pos.y - state.screen.y) / state.scale,
        )
    }

    /// Classify a point against the screen-edge hot bands.
    #[must_use]
    pub fn check_tap_on_hot_area(&self, pos: Point) -> Option<EdgeZone> {
        let state = self.lock();
        if !state.shown || !state.screen.contains_point(&pos) {
            return None;
        }
        let screen = state.screen;
        if pos.x <= screen.x + HOT_AREA_WIDTH {
            Some(EdgeZone::Left)
        } else if pos.x >= screen.x + screen.width - HOT_AREA_WIDTH {
            Some(EdgeZone::Right)
        } else if pos.y <= screen.y + HOT_AREA_WIDTH {
            Some(EdgeZone::Top)
        } else if pos.y >= screen.y + screen.height - HOT_AREA_WIDTH {
            Some(EdgeZone::Bottom)
        } else {
            None
        }
    }

    /// Whether a point lands on any edge hot band.
    #[must_use]
    pub fn is_tap_on_hot_area(&self, pos: Point) -> bool {
        self.check_tap_on_hot_area(pos).is_some()
    }

    /// Recenter the source on an externally focused element.
    pub fn follow_focus_element(&self, center_x: f32, center_y: f32) {
        let viewport = {
            let mut state = self.lock();
            if !state.shown {
                debug!("follow focus ignored: magnification not shown");
                return;
            }
            let size = state.source.size();
            state.source = Rect::centered_at(Point::new(center_x, center_y), size)
                .clamped_within(&state.screen);
            state.viewport()
        };
        self.with_surface(|s| s.update(viewport));
    }

    /// Re-derive geometry for new screen bounds (rotation), preserving the
    /// source center and scale.
    pub fn refresh_window_param(&self, screen: Rect) {
        let update = {
            let mut state = self.lock();
            if screen.width <= 0.0 || screen.height <= 0.0 {
                warn!("refresh ignored: degenerate screen rect");
                return;
            }
            let center = state.source.center();
            let scale = state.scale;
            state.screen = screen;
            state.source = Rect::centered_at(center, screen.size().scale(1.0 / scale))
                .clamped_within(&screen);
            state.shown.then(|| state.viewport())
        };
        if let Some(viewport) = update {
            self.with_surface(|s| s.update(viewport));
        }
    }

    /// Whether full-screen magnification is currently shown.
    #[must_use]
    pub fn is_magnification_show(&self) -> bool {
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
}
