//! Integration tests for loupe-magnifier: the coordinator with both display
//! modes and the menu, driven through the public API.

use loupe_core::{
    Announcement, Announcer, MagnificationMode, MemorySettings, Point, Rect, SettingsStore,
};
use loupe_magnifier::{
    FullScreenMagnificationManager, MagnificationCoordinator, MenuManager, MenuSurface,
    NullSurface, WindowMagnificationManager, DEFAULT_SCALE, MAX_SCALE, SCALE_SPAN_FACTOR,
};
use std::sync::{Arc, Mutex};

const SCREEN: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

#[derive(Debug, Default)]
struct AnnouncementLog(Mutex<Vec<Announcement>>);

impl Announcer for AnnouncementLog {
    fn announce(&self, announcement: Announcement) {
        self.0.lock().expect("lock").push(announcement);
    }
}

#[derive(Debug, Default)]
struct SilentMenuSurface;
impl MenuSurface for SilentMenuSurface {
    fn show(&mut self, _rect: Rect, _mode: MagnificationMode) {}
    fn move_to(&mut self, _origin: Point) {}
    fn hide(&mut self) {}
}

fn build() -> (Arc<MagnificationCoordinator>, Arc<AnnouncementLog>, Arc<MemorySettings>) {
    let settings = Arc::new(MemorySettings::new(DEFAULT_SCALE));
    let log = Arc::new(AnnouncementLog::default());
    let window = Arc::new(WindowMagnificationManager::new(
        SCREEN,
        Box::new(NullSurface),
        settings.clone(),
        log.clone(),
    ));
    let full = Arc::new(FullScreenMagnificationManager::new(
        SCREEN,
        Box::new(NullSurface),
        settings.clone(),
        log.clone(),
    ));
    let menu = Arc::new(MenuManager::new(SCREEN, Box::new(SilentMenuSurface)));
    let coordinator =
        MagnificationCoordinator::new(window, full, menu, MagnificationMode::Window);
    (coordinator, log, settings)
}

#[test]
fn mode_switch_carries_the_viewport_center() {
    let (coordinator, _log, _settings) = build();
    coordinator
        .window()
        .enable_window_magnification(600.0, 500.0);
    coordinator.switch_mode(MagnificationMode::FullScreen);

    assert!(coordinator.full_screen().is_magnification_show());
    let center = coordinator.full_screen().get_source_center();
    assert!((center.x - 600.0).abs() < 1.0);
    assert!((center.y - 500.0).abs() < 1.0);

    coordinator.switch_mode(MagnificationMode::Window);
    assert!(coordinator.window().is_magnification_window_show());
    assert!(!coordinator.full_screen().is_magnification_show());
}

#[test]
fn menu_tap_in_switch_type_flips_modes() {
    let (coordinator, _log, _settings) = build();
    assert_eq!(coordinator.on_magnification_type_changed(3), Ok(()));
    coordinator
        .window()
        .enable_window_magnification(600.0, 500.0);
    coordinator.menu().show_menu_window(MagnificationMode::Window);

    coordinator.menu().on_menu_tap();
    assert_eq!(coordinator.current_mode(), MagnificationMode::FullScreen);
    assert!(coordinator.full_screen().is_magnification_show());
}

#[test]
fn persisted_scale_is_shared_between_modes() {
    let (coordinator, log, settings) = build();
    coordinator
        .window()
        .enable_window_magnification(600.0, 500.0);
    coordinator.window().set_scale(SCALE_SPAN_FACTOR * 2.0); // -> 4.0
    coordinator.window().persist_scale();
    assert!((settings.magnification_scale() - 4.0).abs() < 0.01);
    assert!(log
        .0
        .lock()
        .expect("lock")
        .contains(&Announcement::ScaleChanged));

    // the full-screen mode picks the persisted scale up on enable
    coordinator.full_screen().enable_magnification(100.0, 100.0);
    assert!((coordinator.full_screen().get_scale() - 4.0).abs() < f32::EPSILON);
}

#[test]
fn scale_bounds_hold_across_wild_input() {
    let (coordinator, _log, _settings) = build();
    let window = coordinator.window();
    window.enable_window_magnification(960.0, 540.0);
    for span in [-10_000.0, 10_000.0, -3.0, 99_999.0, -99_999.0] {
        window.set_scale(span);
        let scale = window.get_scale();
        assert!((DEFAULT_SCALE..=MAX_SCALE).contains(&scale));
        assert!(SCREEN.contains_rect(&window.source_rect()));
    }
}
