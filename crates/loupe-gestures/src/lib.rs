//! Touch-gesture recognition for the loupe accessibility engine.
//!
//! Three finite-state engines consume the live pointer-event stream:
//! - [`SingleFingerRecognizer`] classifies single-pointer streams into taps,
//!   double-taps, long-presses and directional swipes for non-magnified
//!   navigation.
//! - [`MultiFingerTapRecognizer`] classifies two-finger tap/hold patterns
//!   used as alternate activation gestures.
//! - [`MagnificationGesture`] arbitrates between passthrough, triple-tap
//!   zoom toggling, window dragging, two-finger pinch/pan and menu
//!   interaction while the magnifier is involved, forwarding or withholding
//!   events to the next pipeline stage.
//!
//! All waiting is expressed through [`loupe_core::TimerQueue`]; each engine
//! is driven by exactly one event-processing thread and is fully
//! deterministic given an event/tick sequence.

mod magnification;
mod multi_tap;
mod single_finger;
mod sink;

pub use magnification::{
    GestureMsg, MagnificationGesture, MagnificationGestureState, WindowOracle,
};
pub use multi_tap::{
    MultiFingerGesture, MultiFingerTapRecognizer, MultiTapObserver,
};
pub use single_finger::{GestureKind, GestureObserver, SingleFingerRecognizer, SwipeDirection};
pub use sink::{EventSink, VecSink};

use loupe_core::PointerId;

/// Synthetic pointer id used by scroll-shot capture injection; such events
/// always bypass gesture classification.
pub const SCROLL_SHOT_POINTER_ID: PointerId = PointerId::new(9990);
