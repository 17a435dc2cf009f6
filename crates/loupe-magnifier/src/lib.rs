//! Magnifier viewport geometry for the loupe accessibility engine.
//!
//! The managers in this crate are the sole geometry authority for screen
//! magnification: they own the source rectangle (the region of real screen
//! content being magnified), the on-screen magnifier window rectangle, and
//! the scale factor, and they enforce the containment and scale-bound
//! invariants on every mutation. Rendering itself is delegated to the opaque
//! [`MagnifierSurface`] collaborator.

mod coordinator;
mod error;
mod full_screen;
mod menu;
mod surface;
mod window;

pub use coordinator::MagnificationCoordinator;
pub use error::MagnifierError;
pub use loupe_core::MagnificationMode;
pub use full_screen::{EdgeZone, FullScreenMagnificationManager};
pub use menu::{MenuManager, MenuSurface, ModeSwitchObserver};
pub use surface::{MagnifierSurface, NullSurface, Viewport};
pub use window::WindowMagnificationManager;

/// Scale applied when magnification is first enabled, and the lower bound of
/// the interactive range.
pub const DEFAULT_SCALE: f32 = 2.0;

/// Upper bound of the interactive scale range.
pub const MAX_SCALE: f32 = 8.0;

/// Two-finger span change (pixels) that switches a two-finger gesture from
/// panning into scaling.
pub const MIN_SCALE_DISTANCE: f32 = 8.0;

/// Span pixels per 1.0 of scale change during a pinch.
pub const SCALE_SPAN_FACTOR: f32 = 200.0;

/// Width of the hot-area band straddling the magnifier window edge.
pub const HOT_AREA_WIDTH: f32 = 24.0;

/// Side length of the square mode menu.
pub const MENU_SIZE: f32 = 80.0;

/// Minimum distance kept between the menu and the screen edge.
pub const MENU_MARGIN: f32 = 16.0;

/// Tolerance for "scale is back at the default" comparisons.
pub const SCALE_EPSILON: f32 = 1e-4;

/// Fraction of the screen each magnifier-window dimension occupies.
pub const WINDOW_SIZE_RATIO: f32 = 0.5;
