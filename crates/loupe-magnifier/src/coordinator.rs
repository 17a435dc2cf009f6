//! Coordinates the window and full-screen magnifiers, the menu, and the
//! settings-driven magnification type.
//!
//! The accessibility service constructs one coordinator and owns it; the
//! managers are reached through it rather than through ambient singletons.

use crate::error::MagnifierError;
use crate::full_screen::FullScreenMagnificationManager;
use crate::menu::{MenuManager, ModeSwitchObserver};
use crate::window::WindowMagnificationManager;
use log::{debug, error, info};
use loupe_core::MagnificationMode;
use std::sync::{Arc, Mutex, Weak};

/// Owner of the magnification display modes and the switching logic between
/// them. The menu's mode observer is wired to this type.
pub struct MagnificationCoordinator {
    window: Arc<WindowMagnificationManager>,
    full_screen: Arc<FullScreenMagnificationManager>,
    menu: Arc<MenuManager>,
    current_mode: Mutex<MagnificationMode>,
}

impl std::fmt::Debug for MagnificationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagnificationCoordinator")
            .field("current_mode", &self.current_mode)
            .finish_non_exhaustive()
    }
}

impl MagnificationCoordinator {
    /// Build the coordinator and register it as the menu's mode observer.
    #[must_use]
    pub fn new(
        window: Arc<WindowMagnificationManager>,
        full_screen: Arc<FullScreenMagnificationManager>,
        menu: Arc<MenuManager>,
        initial_mode: MagnificationMode,
    ) -> Arc<Self> {
        let coordinator = Arc::new(Self {
            window,
            full_screen,
            menu: menu.clone(),
            current_mode: Mutex::new(initial_mode),
        });
        let observer: Arc<dyn ModeSwitchObserver> = coordinator.clone();
        let weak: Weak<dyn ModeSwitchObserver> = Arc::downgrade(&observer);
        menu.set_mode_observer(weak);
        coordinator
    }

    /// The window magnification manager.
    #[must_use]
    pub fn window(&self) -> &Arc<WindowMagnificationManager> {
        &self.window
    }

    /// The full-screen magnification manager.
    #[must_use]
    pub fn full_screen(&self) -> &Arc<FullScreenMagnificationManager> {
        &self.full_screen
    }

    /// The menu manager.
    #[must_use]
    pub fn menu(&self) -> &Arc<MenuManager> {
        &self.menu
    }

    /// The currently selected display mode.
    #[must_use]
    pub fn current_mode(&self) -> MagnificationMode {
        *self.current_mode.lock().expect("mode lock poisoned")
    }

    fn set_current_mode(&self, mode: MagnificationMode) {
        *self.current_mode.lock().expect("mode lock poisoned") = mode;
    }

    /// Handle the raw "magnification type changed" notification from the
    /// settings collaborator (1 = full-screen, 2 = window, 3 = switch).
    pub fn on_magnification_type_changed(&self, raw: u32) -> Result<(), MagnifierError> {
        let new_type =
            MagnificationMode::from_raw(raw).ok_or(MagnifierError::InvalidMode(raw))?;
        self.menu.set_current_type(new_type);

        if new_type == MagnificationMode::Switch
            && (self.window.is_magnification_window_show()
                || self.full_screen.is_magnification_show())
        {
            // re-theme the menu for whichever magnifier is visible
            self.menu.disable_menu_window();
            self.menu.show_menu_window(self.current_mode());
            return Ok(());
        }

        self.menu.disable_menu_window();
        if self.current_mode() == new_type {
            debug!("magnification type unchanged");
            return Ok(());
        }
        self.switch_mode(new_type);
        Ok(())
    }

    /// Switch between the window and full-screen display modes. A magnifier
    /// visible in the old mode reappears in the new mode at the preserved
    /// source center.
    pub fn switch_mode(&self, mode: MagnificationMode) {
        info!("switch magnification mode: {mode:?}");
        match mode {
            MagnificationMode::Window => {
                let was_shown = self.full_screen.is_magnification_show();
                let center = self.full_screen.get_source_center();
                self.full_screen.disable_magnification(false);
                if was_shown {
                    self.window.show_window_magnification_with_position(center);
                }
            }
            MagnificationMode::FullScreen => {
                let was_shown = self.window.is_magnification_window_show();
                let center = self.window.get_source_center();
                self.window.disable_window_magnification(false);
                if was_shown {
                    self.full_screen.show_magnification_with_position(center);
                }
            }
            MagnificationMode::Switch => {
                error!("invalid target mode: switch is not a display mode");
                return;
            }
        }
        self.set_current_mode(mode);
    }
}

impl ModeSwitchObserver for MagnificationCoordinator {
    fn on_mode_selected(&self, mode: MagnificationMode) {
        self.switch_mode(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuSurface;
    use crate::surface::NullSurface;
    use crate::DEFAULT_SCALE;
    use loupe_core::{MemorySettings, NullAnnouncer, Point, Rect};

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    #[derive(Debug, Default)]
    struct SilentMenuSurface;
    impl MenuSurface for SilentMenuSurface {
        fn show(&mut self, _rect: Rect, _mode: MagnificationMode) {}
        fn move_to(&mut self, _origin: Point) {}
        fn hide(&mut self) {}
    }

    fn coordinator() -> Arc<MagnificationCoordinator> {
        let settings = Arc::new(MemorySettings::new(DEFAULT_SCALE));
        let announcer = Arc::new(NullAnnouncer);
        let window = Arc::new(WindowMagnificationManager::new(
            SCREEN,
            Box::new(NullSurface),
            settings.clone(),
            announcer.clone(),
        ));
        let full_screen = Arc::new(FullScreenMagnificationManager::new(
            SCREEN,
            Box::new(NullSurface),
            settings,
            announcer,
        ));
        let menu = Arc::new(MenuManager::new(SCREEN, Box::new(SilentMenuSurface)));
        MagnificationCoordinator::new(window, full_screen, menu, MagnificationMode::Window)
    }

    #[test]
    fn test_invalid_raw_mode_is_an_error() {
        let c = coordinator();
        assert_eq!(
            c.on_magnification_type_changed(0),
            Err(MagnifierError::InvalidMode(0))
        );
        assert_eq!(
            c.on_magnification_type_changed(9),
            Err(MagnifierError::InvalidMode(9))
        );
    }

    #[test]
    fn test_switch_mode_moves_visible_magnifier() {
        let c = coordinator();
        c.window().enable_window_magnification(300.0, 300.0);
        c.switch_mode(MagnificationMode::FullScreen);
        assert!(!c.window().is_magnification_window_show());
        assert!(c.full_screen().is_magnification_show());
        assert_eq!(c.current_mode(), MagnificationMode::FullScreen);
        // the full-screen source picks up the window magnifier's center
        let center = c.full_screen().get_source_center();
        assert!((center.x - 300.0).abs() < 1.0);
        assert!((center.y - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_switch_mode_with_nothing_visible_only_flips_mode() {
        let c = coordinator();
        c.switch_mode(MagnificationMode::FullScreen);
        assert!(!c.full_screen().is_magnification_show());
        assert_eq!(c.current_mode(), MagnificationMode::FullScreen);
    }

    #[test]
    fn test_type_changed_to_same_mode_is_noop() {
        let c = coordinator();
        assert_eq!(c.on_magnification_type_changed(2), Ok(()));
        assert_eq!(c.current_mode(), MagnificationMode::Window);
    }

    #[test]
    fn test_menu_tap_round_trips_through_coordinator() {
        let c = coordinator();
        c.menu().set_current_type(MagnificationMode::Switch);
        c.menu().show_menu_window(MagnificationMode::Window);
        c.window().enable_window_magnification(400.0, 400.0);
        let new_mode = c.menu().on_menu_tap();
        assert_eq!(new_mode, MagnificationMode::FullScreen);
        assert_eq!(c.current_mode(), MagnificationMode::FullScreen);
        assert!(c.full_screen().is_magnification_show());
        assert!(!c.window().is_magnification_window_show());
    }

    #[test]
    fn test_switch_type_reshows_menu_when_magnifier_visible() {
        let c = coordinator();
        c.window().enable_window_magnification(400.0, 400.0);
        assert_eq!(c.on_magnification_type_changed(3), Ok(()));
        assert!(c.menu().is_menu_shown());
        // the visible window magnifier is untouched
        assert!(c.window().is_magnification_window_show());
    }
}
