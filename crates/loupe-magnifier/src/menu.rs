//! The always-on-top mode menu shown in "switch" magnification mode.

use crate::{MENU_MARGIN, MENU_SIZE};
use log::{debug, warn};
use loupe_core::{MagnificationMode, Point, Rect};
use std::sync::{Mutex, Weak};

/// Capability interface for the single thing a menu tap does: pick the other
/// magnification mode.
pub trait ModeSwitchObserver: Send + Sync {
    /// The user selected a magnification mode via the menu.
    fn on_mode_selected(&self, mode: MagnificationMode);
}

/// Rendering handle for the menu window.
pub trait MenuSurface: Send {
    /// Create/show the menu at a rect, themed for the given mode.
    fn show(&mut self, rect: Rect, mode: MagnificationMode);
    /// Move the visible menu.
    fn move_to(&mut self, origin: Point);
    /// Hide and destroy the menu window.
    fn hide(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct MenuState {
    screen: Rect,
    rect: Rect,
    shown: bool,
    menu_mode: MagnificationMode,
    current_type: Option<MagnificationMode>,
}

impl MenuState {
    fn new(screen: Rect) -> Self {
        Self {
            screen,
            rect: Self::default_rect(screen),
            shown: false,
            menu_mode: MagnificationMode::Window,
            current_type: None,
        }
    }

    /// Bottom-right corner inside the margins.
    fn default_rect(screen: Rect) -> Rect {
        Rect::new(
            screen.x + screen.width - MENU_SIZE - MENU_MARGIN,
            screen.y + screen.height - MENU_SIZE - MENU_MARGIN,
            MENU_SIZE,
            MENU_SIZE,
        )
    }

    /// Keep the menu inside `[margin, screen - menu - margin]` on both axes.
    fn adjust_position(&mut self) {
        let bounds = self.screen.inset(MENU_MARGIN);
        self.rect = self.rect.clamped_within(&bounds);
    }
}

/// Owns the menu window geometry and its drag/tap behavior.
pub struct MenuManager {
    state: Mutex<MenuState>,
    surface: Mutex<Box<dyn MenuSurface>>,
    observer: Mutex<Option<Weak<dyn ModeSwitchObserver>>>,
}

impl std::fmt::Debug for MenuManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MenuManager {
    /// Create a menu manager for a screen.
    #[must_use]
    pub fn new(screen: Rect, surface: Box<dyn MenuSurface>) -> Self {
        Self {
            state: Mutex::new(MenuState::new(screen)),
            surface: Mutex::new(surface),
            observer: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MenuState> {
        self.state.lock().expect("menu state lock poisoned")
    }

    fn with_surface(&self, f: impl FnOnce(&mut dyn MenuSurface)) {
        f(&mut **self.surface.lock().expect("menu surface lock poisoned"));
    }

    /// Register the receiver of menu mode selections.
    pub fn set_mode_observer(&self, observer: Weak<dyn ModeSwitchObserver>) {
        *self.observer.lock().expect("observer lock poisoned") = Some(observer);
    }

    /// Show the menu themed for `mode`. Only the switch magnification type
    /// displays a menu.
    pub fn show_menu_window(&self, mode: MagnificationMode) {
        let shown = {
            let mut state = self.lock();
            state.menu_mode = mode;
            if state.current_type != Some(MagnificationMode::Switch) {
                warn!("no need to show menu: type is not switch");
                return;
            }
            state.rect = MenuState::default_rect(state.screen);
            state.shown = true;
            state.rect
        };
        self.with_surface(|s| s.show(shown, mode));
    }

    /// Hide the menu window.
    pub fn disable_menu_window(&self) {
        {
            let mut state = self.lock();
            if !state.shown {
                debug!("menu not shown");
                return;
            }
            state.shown = false;
        }
        self.with_surface(|s| s.hide());
    }

    /// Drag the menu by a delta, kept inside the screen margins.
    pub fn move_menu_window(&self, delta_x: f32, delta_y: f32) {
        let origin = {
            let mut state = self.lock();
            if !state.shown {
                debug!("menu move ignored: not shown");
                return;
            }
            state.rect = state.rect.translated(delta_x, delta_y);
            state.adjust_position();
            state.rect.origin()
        };
        self.with_surface(|s| s.move_to(origin));
    }

    /// Snap the menu to the nearest vertical screen edge.
    pub fn attach_to_edge(&self) {
        let origin = {
            let mut state = self.lock();
            if !state.shown {
                debug!("menu attach ignored: not shown");
                return;
            }
            let screen = state.screen;
            state.rect.x = if state.rect.center().x < screen.x + screen.width / 2.0 {
                screen.x + MENU_MARGIN
            } else {
                screen.x + screen.width - MENU_SIZE - MENU_MARGIN
            };
            state.rect.origin()
        };
        self.with_surface(|s| s.move_to(origin));
    }

    /// Whether a point lands on the visible menu.
    #[must_use]
    pub fn is_tap_on_menu(&self, pos: Point) -> bool {
        let state = self.lock();
        state.shown && state.rect.contains_point(&pos)
    }

    /// Handle a tap on the menu: flip between window and full-screen
    /// magnification and notify the mode observer. Returns the new mode.
    pub fn on_menu_tap(&self) -> MagnificationMode {
        let new_mode = {
            let mut state = self.lock();
            state.menu_mode = match state.menu_mode {
                MagnificationMode::Window => MagnificationMode::FullScreen,
                _ => MagnificationMode::Window,
            };
            state.menu_mode
        };
        let observer = self
            .observer
            .lock()
            .expect("observer lock poisoned")
            .clone();
        match observer.and_then(|weak| weak.upgrade()) {
            Some(observer) => observer.on_mode_selected(new_mode),
            None => warn!("menu tap dropped: no mode observer registered"),
        }
        new_mode
    }

    /// Record the magnification type selected in settings.
    pub fn set_current_type(&self, current_type: MagnificationMode) {
        self.lock().current_type = Some(current_type);
    }

    /// Re-derive geometry for new screen bounds; a visible menu is re-shown
    /// at its default position.
    pub fn refresh_window_param(&self, screen: Rect) {
        let reshow = {
            let mut state = self.lock();
            state.screen = screen;
            state.rect = MenuState::default_rect(screen);
            state.shown.then_some((state.rect, state.menu_mode))
        };
        if let Some((rect, mode)) = reshow {
            self.with_surface(|s| {
                s.hide();
                s.show(rect, mode);
            });
        }
    }

    /// Whether the menu is currently shown.
    #[must_use]
    pub fn is_menu_shown(&self) -> bool {
        self.lock().shown
    }

    /// Current menu rectangle.
    #[must_use]
    pub fn menu_rect(&self) -> Rect {
        self.lock().rect
    }

    /// The mode the menu is currently themed for.
    #[must_use]
    pub fn menu_mode(&self) -> MagnificationMode {
        self.lock().menu_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct RecordingMenuSurface {
        moves: Vec<Point>,
        shows: u32,
        hides: u32,
    }

    impl MenuSurface for Arc<Mutex<RecordingMenuSurface>> {
        fn show(&mut self, _rect: Rect, _mode: MagnificationMode) {
            self.lock().expect("lock").shows += 1;
        }
        fn move_to(&mut self, origin: Point) {
            self.lock().expect("lock").moves.push(origin);
        }
        fn hide(&mut self) {
            self.lock().expect("lock").hides += 1;
        }
    }

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    fn shown_menu() -> (MenuManager, Arc<Mutex<RecordingMenuSurface>>) {
        let log = Arc::new(Mutex::new(RecordingMenuSurface::default()));
        let menu = MenuManager::new(SCREEN, Box::new(log.clone()));
        menu.set_current_type(MagnificationMode::Switch);
        menu.show_menu_window(MagnificationMode::Window);
        (menu, log)
    }

    #[test]
    fn test_show_requires_switch_type() {
        let log = Arc::new(Mutex::new(RecordingMenuSurface::default()));
        let menu = MenuManager::new(SCREEN, Box::new(log.clone()));
        menu.show_menu_window(MagnificationMode::Window);
        assert!(!menu.is_menu_shown());
        menu.set_current_type(MagnificationMode::Switch);
        menu.show_menu_window(MagnificationMode::Window);
        assert!(menu.is_menu_shown());
        assert_eq!(log.lock().expect("lock").shows, 1);
    }

    #[test]
    fn test_default_position_bottom_right() {
        let (menu, _log) = shown_menu();
        let rect = menu.menu_rect();
        assert_eq!(
            rect.origin(),
            Point::new(
                1000.0 - MENU_SIZE - MENU_MARGIN,
                800.0 - MENU_SIZE - MENU_MARGIN
            )
        );
    }

    #[test]
    fn test_move_respects_margins() {
        let (menu, _log) = shown_menu();
        menu.move_menu_window(10_000.0, 10_000.0);
        let rect = menu.menu_rect();
        assert_eq!(
            rect.origin(),
            Point::new(
                1000.0 - MENU_SIZE - MENU_MARGIN,
                800.0 - MENU_SIZE - MENU_MARGIN
            )
        );
        menu.move_menu_window(-10_000.0, -10_000.0);
        assert_eq!(menu.menu_rect().origin(), Point::new(MENU_MARGIN, MENU_MARGIN));
    }

    #[test]
    fn test_attach_to_edge_snaps_nearest() {
        let (menu, _log) = shown_menu();
        menu.move_menu_window(-600.0, 0.0);
        menu.attach_to_edge();
        assert!((menu.menu_rect().x - MENU_MARGIN).abs() < f32::EPSILON);
        menu.move_menu_window(800.0, 0.0);
        menu.attach_to_edge();
        assert!((menu.menu_rect().x - (1000.0 - MENU_SIZE - MENU_MARGIN)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tap_on_menu_only_when_shown() {
        let (menu, _log) = shown_menu();
        let inside = menu.menu_rect().center();
        assert!(menu.is_tap_on_menu(inside));
        menu.disable_menu_window();
        assert!(!menu.is_tap_on_menu(inside));
    }

    #[test]
    fn test_menu_tap_flips_mode_and_notifies() {
        struct Captor(Mutex<Vec<MagnificationMode>>);
        impl ModeSwitchObserver for Captor {
            fn on_mode_selected(&self, mode: MagnificationMode) {
                self.0.lock().expect("lock").push(mode);
            }
        }
        let (menu, _log) = shown_menu();
        let captor = Arc::new(Captor(Mutex::new(Vec::new())));
        let observer: Arc<dyn ModeSwitchObserver> = captor.clone();
        let weak: Weak<dyn ModeSwitchObserver> = Arc::downgrade(&observer);
        menu.set_mode_observer(weak);
        assert_eq!(menu.on_menu_tap(), MagnificationMode::FullScreen);
        assert_eq!(menu.on_menu_tap(), MagnificationMode::Window);
        assert_eq!(
            *captor.0.lock().expect("lock"),
            vec![MagnificationMode::FullScreen, MagnificationMode::Window]
        );
    }

    #[test]
    fn test_menu_tap_without_observer_is_noop() {
        let (menu, _log) = shown_menu();
        assert_eq!(menu.on_menu_tap(), MagnificationMode::FullScreen);
    }
}
