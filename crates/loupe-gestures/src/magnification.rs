//! The window-magnification gesture state machine.
//!
//! Arbitrates, in real time, between passthrough, zoom-enable (triple tap),
//! window move/drag, two-finger pinch-to-scale/pan, and menu drag, while
//! forwarding or withholding pointer events to the next pipeline stage.
//! Events withheld during an ambiguous gesture are replayed downstream in
//! their original order with timestamps normalized to "now" when the gesture
//! is abandoned, and dropped when it completes.

use crate::sink::EventSink;
use crate::SCROLL_SHOT_POINTER_ID;
use log::{debug, error, info, warn};
use loupe_core::{
    Announcement, Announcer, DisplayMetrics, Point, PointerAction, PointerEvent, SourceType,
    TimerQueue,
};
use loupe_magnifier::{
    MagnificationMode, MenuManager, WindowMagnificationManager, DEFAULT_SCALE, MIN_SCALE_DISTANCE,
    SCALE_EPSILON,
};
use std::sync::Arc;

/// Movement below this distance still counts as a tap.
const TAP_MIN_DISTANCE: f32 = 8.0;
/// Tap-fail timeout: a finger still down this long is not a tap.
const TAP_TIMEOUT_MS: u64 = 100;
/// Triple-tap-fail timeout: the next tap must start within this window.
const DOUBLE_TAP_TIMEOUT_MS: u64 = 250;
/// Hot-area hold time that starts a window drag.
const LONG_PRESS_TIMEOUT_MS: u64 = 200;
const TAP_COUNT_TWO: u32 = 2;
const TAP_COUNT_THREE: u32 = 3;

/// Phases of the magnification gesture machine. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnificationGestureState {
    /// Catch-all bypass: everything is forwarded
    PassingThrough,
    /// Magnifier hidden, no fingers tracked
    Ready,
    /// Magnifier hidden, one finger down
    ReadyOneFingerDown,
    /// Magnifier hidden, between taps of a multi-tap
    ReadyOneFingerTap,
    /// Magnifier visible, no fingers tracked
    ZoomIn,
    /// Magnifier visible, one finger down
    ZoomInOneFingerDown,
    /// Magnifier visible, between taps of a multi-tap
    ZoomInOneFingerTap,
    /// Magnifier visible, two fingers down (pinch/pan arbitration)
    ZoomInTwoFingersDown,
    /// Dragging the magnifier window by its hot area
    Sliding,
    /// Dragging the mode menu
    MenuSliding,
    /// Drag shortcut: third tap held and moving, magnifier follows
    Dragging,
}

/// Timer messages; the payload names the state to fall back to when the
/// timeout resolves gesture ambiguity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMsg {
    /// The finger stayed down past the tap window.
    SingleTapFail(MagnificationGestureState),
    /// No further tap arrived within the multi-tap window.
    TripleTapFail(MagnificationGestureState),
    /// The finger held still on the hot area or menu.
    LongPress,
}

/// Window-info collaborator: the gesture machine only needs to know whether
/// a point lands on the input-method window.
pub trait WindowOracle: Send {
    /// Whether the point is inside the IME window.
    fn is_point_on_input_method(&self, pos: Point) -> bool;
}

/// The magnification gesture state machine.
///
/// `on_pointer_event` returns `false` (bypass) for non-touchscreen sources,
/// a shielded machine, or synthetic scroll-shot pointer ids; otherwise it
/// returns `true` and fully owns event routing.
pub struct MagnificationGesture<S: EventSink> {
    state: MagnificationGestureState,
    timers: TimerQueue<GestureMsg>,

    magnifier: Option<Arc<WindowMagnificationManager>>,
    menu: Option<Arc<MenuManager>>,
    oracle: Option<Box<dyn WindowOracle>>,
    announcer: Arc<dyn Announcer>,
    sink: S,

    cached_events: Vec<PointerEvent>,
    last_down: Option<PointerEvent>,
    last_sliding: Option<PointerEvent>,

    tap_on_hot_area: bool,
    single_tap_on_window: bool,
    two_fingers_valid: bool,
    start_scale: bool,
    tap_on_menu: bool,
    triple_down: bool,
    shielded: bool,

    tap_count: u32,
    tap_distance: f32,
    multi_tap_distance: f32,
    now_ms: u64,
}

impl<S: EventSink> MagnificationGesture<S> {
    /// Create the state machine with its collaborators. A `None` magnifier
    /// or menu degrades the corresponding behavior to logged no-ops.
    #[must_use]
    pub fn new(
        metrics: &DisplayMetrics,
        magnifier: Option<Arc<WindowMagnificationManager>>,
        menu: Option<Arc<MenuManager>>,
        oracle: Option<Box<dyn WindowOracle>>,
        announcer: Arc<dyn Announcer>,
        sink: S,
    ) -> Self {
        Self {
            state: MagnificationGestureState::Ready,
            timers: TimerQueue::new(),
            magnifier,
            menu,
            oracle,
            announcer,
            sink,
            cached_events: Vec::new(),
            last_down: None,
            last_sliding: None,
            tap_on_hot_area: false,
            single_tap_on_window: false,
            two_fingers_valid: false,
            start_scale: false,
            tap_on_menu: false,
            triple_down: false,
            shielded: false,
            tap_count: 0,
            tap_distance: TAP_MIN_DISTANCE,
            multi_tap_distance: metrics.double_tap_slop(),
            now_ms: 0,
        }
    }

    /// Current state (read by the owning service and by tests).
    #[must_use]
    pub fn state(&self) -> MagnificationGestureState {
        self.state
    }

    /// Taps counted so far in the current multi-tap sequence.
    #[must_use]
    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// The downstream sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Deliver timer firings up to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        for msg in self.timers.drain_due(now_ms) {
            self.on_timer(msg);
        }
    }

    /// Consume one pointer event. Returns `false` when the event bypassed
    /// the machine (and was forwarded verbatim), `true` otherwise.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        self.tick(event.time_ms);
        if self.needs_bypass(&event) {
            self.sink.inject(event);
            return false;
        }
        if self.state == MagnificationGestureState::PassingThrough {
            self.handle_passing_through(event);
            return true;
        }
        use MagnificationGestureState as St;
        use PointerAction as A;
        match (self.state, event.action) {
            (St::Ready, A::Down) => self.handle_ready_down(event),
            (St::Ready, A::Up) => self.handle_ready_up(&event),
            (St::Ready, A::Move) => self.handle_ready_move(event),
            (St::Ready | St::ReadyOneFingerDown, A::Cancel) => self.handle_ready_cancel(event),
            (St::ReadyOneFingerDown, A::Down) => self.handle_ready_one_finger_down_down(event),
            (St::ReadyOneFingerDown, A::Up) => self.handle_ready_one_finger_down_up(event),
            (St::ReadyOneFingerDown, A::Move) => self.handle_ready_one_finger_down_move(event),
            (St::ReadyOneFingerTap, A::Down) => self.handle_ready_one_finger_tap_down(event),
            (St::ZoomIn, A::Down) => self.handle_zoom_in_down(event),
            (St::ZoomIn, A::Up | A::Move) => self.forward(event, true),
            (St::ZoomInOneFingerDown, A::Down) => self.handle_zoom_one_finger_down_down(event),
            (St::ZoomInOneFingerDown, A::Up) => self.handle_zoom_one_finger_down_up(event),
            (St::ZoomInOneFingerDown, A::Move) => self.handle_zoom_one_finger_down_move(event),
            (St::ZoomInOneFingerTap, A::Down) => self.handle_zoom_one_finger_tap_down(event),
            (St::ZoomInTwoFingersDown, A::Up) => self.handle_two_fingers_up(&event),
            (St::ZoomInTwoFingersDown, A::Move) => self.handle_two_fingers_move(event),
            (St::Sliding, A::Down) => debug!("down ignored while sliding"),
            (St::Sliding, A::Up) => self.handle_sliding_up(&event),
            (St::Sliding, A::Move) => self.handle_sliding_move(event),
            (St::MenuSliding, A::Up) => self.handle_menu_sliding_up(&event),
            (St::MenuSliding, A::Move) => self.handle_menu_sliding_move(event),
            (St::Dragging, A::Up) => self.handle_dragging_up(&event),
            (St::Dragging, A::Move) => self.handle_dragging_move(event),
            (state, action) => error!("no way to handle {action:?} in {state:?}"),
        }
        true
    }

    /// Flush withheld events, reset, and turn the magnifier off.
    pub fn destroy_events(&mut self) {
        self.send_cache_events_to_next();
        self.tap_count = 0;
        self.set_state(MagnificationGestureState::Ready);
        if let Some(magnifier) = self.magnifier.clone() {
            if magnifier.is_magnification_window_show() {
                debug!("window gesture disable");
                magnifier.disable_window_magnification(false);
                if let Some(menu) = &self.menu {
                    menu.disable_menu_window();
                }
                self.single_tap_on_window = false;
                self.tap_on_hot_area = false;
                self.announcer
                    .announce(Announcement::MagnificationDisabled);
            }
        }
    }

    /// Shield (or unshield) the machine: while shielded every event
    /// bypasses and magnification is forced off.
    pub fn shield_zoom_gesture(&mut self, shield: bool) {
        info!("shield zoom gesture: {shield}");
        self.shielded = shield;
        if shield {
            self.cached_events.clear();
            if let Some(magnifier) = &self.magnifier {
                magnifier.disable_window_magnification(true);
                self.set_state(MagnificationGestureState::Ready);
                self.announcer
                    .announce(Announcement::MagnificationDisabled);
            }
            if let Some(menu) = &self.menu {
                menu.disable_menu_window();
            }
            self.single_tap_on_window = false;
            self.tap_on_hot_area = false;
        }
    }

    /// The magnifier became visible through an external path (mode switch).
    pub fn start_magnification_interact(&mut self) {
        self.set_state(MagnificationGestureState::ZoomIn);
    }

    /// Gesture detection for this mode was turned off.
    pub fn disable_gesture(&mut self) {
        self.set_state(MagnificationGestureState::Ready);
    }

    /// Cancel a posted timer. Idempotent.
    pub fn cancel_post_event(&mut self, msg: GestureMsg) {
        self.timers.cancel(&msg);
    }

    fn set_state(&mut self, state: MagnificationGestureState) {
        info!("gesture state changed: {:?} -> {state:?}", self.state);
        self.state = state;
    }

    fn needs_bypass(&self, event: &PointerEvent) -> bool {
        if self.shielded {
            return true;
        }
        if event.source != SourceType::Touchscreen {
            return true;
        }
        if event.pointer_id == SCROLL_SHOT_POINTER_ID {
            debug!("scroll-shot injected event");
            return true;
        }
        false
    }

    fn on_timer(&mut self, msg: GestureMsg) {
        debug!("timer fired in {:?}: {msg:?}", self.state);
        match msg {
            GestureMsg::SingleTapFail(fallback) => {
                if self.triple_down {
                    self.on_drag();
                } else {
                    if !self.tap_on_menu {
                        self.send_cache_events_to_next();
                        self.tap_count = 0;
                    }
                    self.set_state(fallback);
                }
            }
            GestureMsg::TripleTapFail(fallback) => {
                self.send_cache_events_to_next();
                self.tap_count = 0;
                self.set_state(fallback);
            }
            GestureMsg::LongPress => {
                let next = if self.tap_on_menu {
                    MagnificationGestureState::MenuSliding
                } else {
                    MagnificationGestureState::Sliding
                };
                self.set_state(next);
            }
        }
    }

    fn cancel_tap_timers(&mut self) {
        self.timers
            .cancel(&GestureMsg::SingleTapFail(MagnificationGestureState::Ready));
        self.timers
            .cancel(&GestureMsg::TripleTapFail(MagnificationGestureState::Ready));
    }

    fn cancel_all_gesture_timers(&mut self) {
        self.cancel_tap_timers();
        self.timers.cancel(&GestureMsg::LongPress);
    }

    /// Forward one event downstream. Suppressed entirely while the gesture
    /// began on the menu; coordinates are remapped through the magnifier
    /// when the gesture began on the magnified window content.
    fn forward(&mut self, mut event: PointerEvent, need_reset_time: bool) {
        if self.tap_on_menu {
            debug!("tap on menu: event not forwarded");
            return;
        }
        if self.single_tap_on_window && !self.tap_on_hot_area {
            if let Some(magnifier) = &self.magnifier {
                let acting = event.pointer_id;
                if let Some(sample) = event.samples.iter_mut().find(|s| s.id == acting) {
                    sample.position = magnifier.convert_coordinates(sample.position);
                }
            } else {
                error!("magnifier manager is absent: coordinates not remapped");
            }
        }
        if need_reset_time {
            event.time_ms = self.now_ms;
        }
        self.sink.inject(event);
    }

    /// Replay withheld events downstream in original order with timestamps
    /// normalized to now, then drop the buffer.
    fn send_cache_events_to_next(&mut self) {
        for event in std::mem::take(&mut self.cached_events) {
            self.forward(event, true);
        }
    }

    fn clear(&mut self) {
        self.cached_events.clear();
    }

    fn is_move(&self, start: &PointerEvent, end: &PointerEvent, slop: f32) -> bool {
        let (Some(a), Some(b)) = (start.acting_position(), end.acting_position()) else {
            warn!("event without a sample for the acting pointer");
            return false;
        };
        a.distance(&b) > slop
    }

    fn is_tap_on_input_method(&self, event: &PointerEvent) -> bool {
        if event.pointer_count() != 1 {
            return false;
        }
        let (Some(oracle), Some(pos)) = (&self.oracle, event.acting_position()) else {
            return false;
        };
        oracle.is_point_on_input_method(pos)
    }

    fn handle_passing_through(&mut self, event: PointerEvent) {
        let last_finger_lifted = event.pointer_count() == 1
            && event.acting_sample().is_some_and(|s| !s.pressed);
        self.forward(event, false);
        if last_finger_lifted {
            let shown = self
                .magnifier
                .as_ref()
                .is_some_and(|m| m.is_magnification_window_show());
            self.set_state(if shown {
                MagnificationGestureState::ZoomIn
            } else {
                MagnificationGestureState::Ready
            });
        }
    }

    fn handle_ready_down(&mut self, event: PointerEvent) {
        if event.is_knuckle() {
            self.forward(event, false);
            return;
        }
        self.last_down = Some(event.clone());
        if event.pointer_count() == 1 {
            self.cancel_tap_timers();
            let time = event.time_ms;
            self.cached_events.push(event);
            self.set_state(MagnificationGestureState::ReadyOneFingerDown);
            self.timers.schedule(
                GestureMsg::SingleTapFail(MagnificationGestureState::Ready),
                time,
                TAP_TIMEOUT_MS,
            );
            return;
        }
        self.cached_events.push(event);
        self.send_cache_events_to_next();
        self.set_state(MagnificationGestureState::PassingThrough);
    }

    fn handle_ready_up(&mut self, event: &PointerEvent) {
        let count = event.pointer_count();
        self.forward(event.clone(), false);
        if count != 1 {
            self.set_state(MagnificationGestureState::PassingThrough);
        }
    }

    fn handle_ready_move(&mut self, event: PointerEvent) {
        self.forward(event, false);
        self.set_state(MagnificationGestureState::PassingThrough);
    }

    fn handle_ready_cancel(&mut self, event: PointerEvent) {
        self.forward(event, false);
        let shown = self
            .magnifier
            .as_ref()
            .is_some_and(|m| m.is_magnification_window_show());
        self.set_state(if shown {
            MagnificationGestureState::ZoomIn
        } else {
            MagnificationGestureState::Ready
        });
    }

    fn handle_ready_one_finger_down_down(&mut self, event: PointerEvent) {
        if event.pointer_count() == 1 {
            warn!("invalid state: second down with a single pointer");
            return;
        }
        self.cached_events.push(event);
        self.send_cache_events_to_next();
        self.set_state(MagnificationGestureState::PassingThrough);
    }

    fn handle_ready_one_finger_down_up(&mut self, event: PointerEvent) {
        self.cached_events.push(event.clone());
        self.cancel_tap_timers();

        let Some(last_down) = self.last_down.clone() else {
            error!("no down event recorded for this up");
            return;
        };
        if self.is_move(&event, &last_down, self.tap_distance) {
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::PassingThrough);
            return;
        }
        if self.is_tap_on_input_method(&event) {
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::Ready);
            return;
        }
        self.tap_count += 1;
        if self.tap_count == TAP_COUNT_THREE {
            self.triple_down = false;
            if let Some(pos) = event.acting_position() {
                self.on_triple_tap(pos);
            }
            self.clear();
            self.set_state(MagnificationGestureState::ZoomIn);
        } else {
            self.timers.schedule(
                GestureMsg::TripleTapFail(MagnificationGestureState::Ready),
                event.time_ms,
                DOUBLE_TAP_TIMEOUT_MS,
            );
            self.set_state(MagnificationGestureState::ReadyOneFingerTap);
        }
    }

    fn handle_ready_one_finger_down_move(&mut self, event: PointerEvent) {
        self.cached_events.push(event.clone());

        let Some(last_down) = self.last_down.clone() else {
            error!("no down event recorded for this move");
            return;
        };
        if !self.triple_down && self.tap_count == TAP_COUNT_TWO {
            // the third tap is being held down: drag shortcut arming
            self.triple_down = true;
        } else if self.is_move(&event, &last_down, self.tap_distance) {
            self.cancel_tap_timers();
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::PassingThrough);
        }
    }

    fn handle_ready_one_finger_tap_down(&mut self, event: PointerEvent) {
        self.cancel_tap_timers();
        self.cached_events.push(event.clone());

        let Some(prev_down) = self.last_down.replace(event.clone()) else {
            error!("no previous down for the multi-tap check");
            return;
        };
        if self.is_move(&prev_down, &event, self.multi_tap_distance) {
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::PassingThrough);
            return;
        }
        self.timers.schedule(
            GestureMsg::SingleTapFail(MagnificationGestureState::Ready),
            event.time_ms,
            TAP_TIMEOUT_MS,
        );
        self.set_state(MagnificationGestureState::ReadyOneFingerDown);
    }

    fn handle_zoom_in_down(&mut self, event: PointerEvent) {
        if event.is_knuckle() {
            self.forward(event, false);
            return;
        }
        let Some(magnifier) = self.magnifier.clone() else {
            error!("magnifier manager is absent");
            self.forward(event, true);
            return;
        };

        self.last_down = Some(event.clone());
        if event.pointer_count() != 1 {
            return;
        }
        let Some(pos) = event.acting_position() else {
            warn!("down event without a sample for the acting pointer");
            return;
        };
        self.tap_on_menu = self
            .menu
            .as_ref()
            .is_some_and(|menu| menu.is_tap_on_menu(pos));
        if self.tap_on_menu {
            self.tap_on_hot_area = false;
            self.single_tap_on_window = false;
        } else {
            self.tap_on_hot_area = magnifier.is_tap_on_hot_area(pos);
            self.single_tap_on_window = magnifier.is_tap_on_magnification_window(pos);
            if self.tap_on_hot_area {
                self.timers
                    .schedule(GestureMsg::LongPress, event.time_ms, LONG_PRESS_TIMEOUT_MS);
            } else {
                self.cached_events.push(event.clone());
            }
        }

        self.set_state(MagnificationGestureState::ZoomInOneFingerDown);
        self.cancel_tap_timers();
        self.timers.schedule(
            GestureMsg::SingleTapFail(MagnificationGestureState::ZoomIn),
            event.time_ms,
            TAP_TIMEOUT_MS,
        );
    }

    fn handle_zoom_one_finger_down_down(&mut self, event: PointerEvent) {
        let Some(magnifier) = self.magnifier.clone() else {
            error!("magnifier manager is absent");
            return;
        };
        if event.pointer_count() != 2 {
            return;
        }
        self.cancel_all_gesture_timers();
        self.tap_on_menu = false;
        self.single_tap_on_window = false;
        self.tap_on_hot_area = false;
        self.last_down = Some(event.clone());

        let finger_one = event
            .samples
            .first()
            .is_some_and(|s| magnifier.is_tap_on_magnification_window(s.position));
        let finger_two = event
            .samples
            .get(1)
            .is_some_and(|s| magnifier.is_tap_on_magnification_window(s.position));
        self.two_fingers_valid = finger_one || finger_two;

        if self.two_fingers_valid {
            self.set_state(MagnificationGestureState::ZoomInTwoFingersDown);
            self.clear();
        } else {
            self.cached_events.push(event);
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::ZoomIn);
        }
    }

    fn handle_zoom_one_finger_down_up(&mut self, event: PointerEvent) {
        if !self.tap_on_hot_area {
            self.cached_events.push(event.clone());
        }
        self.cancel_all_gesture_timers();

        let Some(last_down) = self.last_down.clone() else {
            error!("no down event recorded for this up");
            return;
        };
        if self.is_move(&event, &last_down, self.tap_distance) {
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::PassingThrough);
            return;
        }
        if self.is_tap_on_input_method(&event) {
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::ZoomIn);
            return;
        }
        self.tap_count += 1;
        if self.tap_count == TAP_COUNT_THREE {
            if let Some(pos) = event.acting_position() {
                self.on_triple_tap(pos);
            }
            self.clear();
            self.set_state(MagnificationGestureState::Ready);
        } else if self.tap_on_menu {
            match &self.menu {
                Some(menu) => {
                    menu.on_menu_tap();
                }
                None => error!("menu manager is absent"),
            }
        } else {
            self.timers.schedule(
                GestureMsg::TripleTapFail(MagnificationGestureState::ZoomIn),
                event.time_ms,
                DOUBLE_TAP_TIMEOUT_MS,
            );
            self.set_state(MagnificationGestureState::ZoomInOneFingerTap);
        }
    }

    fn handle_zoom_one_finger_down_move(&mut self, event: PointerEvent) {
        if event.pointer_count() != 1 {
            self.cached_events.push(event);
            return;
        }

        if self.tap_on_menu || self.tap_on_hot_area {
            self.timers
                .cancel(&GestureMsg::SingleTapFail(MagnificationGestureState::Ready));
        } else {
            self.cached_events.push(event.clone());
        }

        let Some(last_down) = self.last_down.clone() else {
            error!("no down event recorded for this move");
            return;
        };
        if self.is_move(&event, &last_down, self.tap_distance) {
            self.cancel_all_gesture_timers();
            self.send_cache_events_to_next();
            let next = if self.tap_on_menu {
                MagnificationGestureState::MenuSliding
            } else if self.tap_on_hot_area {
                MagnificationGestureState::Sliding
            } else {
                MagnificationGestureState::PassingThrough
            };
            self.set_state(next);
        }
    }

    fn handle_zoom_one_finger_tap_down(&mut self, event: PointerEvent) {
        self.cancel_tap_timers();
        self.cached_events.push(event.clone());

        let Some(prev_down) = self.last_down.replace(event.clone()) else {
            error!("no previous down for the multi-tap check");
            return;
        };
        if self.is_move(&prev_down, &event, self.multi_tap_distance) {
            self.send_cache_events_to_next();
            self.set_state(MagnificationGestureState::PassingThrough);
            return;
        }
        self.timers.schedule(
            GestureMsg::SingleTapFail(MagnificationGestureState::ZoomIn),
            event.time_ms,
            TAP_TIMEOUT_MS,
        );
        self.set_state(MagnificationGestureState::ZoomInOneFingerDown);
    }

    fn handle_two_fingers_up(&mut self, event: &PointerEvent) {
        if let Some(magnifier) = &self.magnifier {
            if self.start_scale {
                magnifier.persist_scale();
            }
            self.start_scale = false;
            magnifier.fix_source_center(false);
        }
        self.last_sliding = None;
        let last_finger_lifted = event.pointer_count() == 1
            && event.acting_sample().is_some_and(|s| !s.pressed);
        if last_finger_lifted {
            self.set_state(MagnificationGestureState::ZoomIn);
            self.two_fingers_valid = false;
        }
    }

    fn handle_two_fingers_move(&mut self, event: PointerEvent) {
        let Some(magnifier) = self.magnifier.clone() else {
            error!("magnifier manager is absent");
            return;
        };
        if !self.two_fingers_valid {
            error!("two-finger state is invalid");
            return;
        }
        if event.pointer_count() < 2 {
            self.set_state(MagnificationGestureState::Sliding);
            return;
        }
        let Some(base) = self.last_down.as_ref().and_then(centroid_and_span) else {
            return;
        };
        if self.last_sliding.is_none() {
            self.last_sliding = Some(event.clone());
        }
        let Some(last) = self.last_sliding.as_ref().and_then(centroid_and_span) else {
            return;
        };
        let Some(current) = centroid_and_span(&event) else {
            return;
        };

        if (base.1 - current.1).abs() > MIN_SCALE_DISTANCE {
            self.start_scale = true;
            magnifier.fix_source_center(true);
        }

        if self.start_scale {
            magnifier.set_scale(current.1 - last.1);
        } else {
            magnifier.move_magnification_window(current.0.x - last.0.x, current.0.y - last.0.y);
        }

        if (magnifier.get_scale() - DEFAULT_SCALE).abs() < SCALE_EPSILON {
            self.start_scale = false;
            magnifier.fix_source_center(false);
        }
        self.last_sliding = Some(event);
    }

    fn handle_sliding_up(&mut self, event: &PointerEvent) {
        if event.pointer_count() > 1 && event.pointer_id != loupe_core::PointerId::new(0) {
            return;
        }
        self.last_sliding = None;
        self.clear();
        self.set_state(MagnificationGestureState::ZoomIn);
    }

    fn handle_sliding_move(&mut self, event: PointerEvent) {
        let Some(magnifier) = self.magnifier.clone() else {
            error!("magnifier manager is absent");
            return;
        };
        if event.pointer_count() > 1 && event.pointer_id != loupe_core::PointerId::new(0) {
            return;
        }
        if self.tap_on_hot_area {
            if self.last_sliding.is_none() {
                self.last_sliding = Some(event.clone());
            }
            if let Some((dx, dy)) = self.sliding_delta(&event) {
                magnifier.move_magnification_window(dx, dy);
            }
            self.last_sliding = Some(event);
        } else {
            self.last_sliding = None;
        }
    }

    fn handle_menu_sliding_move(&mut self, event: PointerEvent) {
        if event.pointer_count() > 1 && event.pointer_id != loupe_core::PointerId::new(0) {
            return;
        }
        if self.tap_on_menu && self.menu.is_some() {
            if self.last_sliding.is_none() {
                self.last_sliding = Some(event.clone());
            }
            if let Some((dx, dy)) = self.sliding_delta(&event) {
                if let Some(menu) = &self.menu {
                    menu.move_menu_window(dx, dy);
                }
            }
            self.last_sliding = Some(event);
        } else {
            self.last_sliding = None;
        }
    }

    fn handle_menu_sliding_up(&mut self, event: &PointerEvent) {
        if event.pointer_count() > 1 && event.pointer_id != loupe_core::PointerId::new(0) {
            return;
        }
        self.last_sliding = None;
        self.tap_on_menu = false;
        self.clear();
        if let Some(menu) = &self.menu {
            menu.attach_to_edge();
        }
        self.set_state(MagnificationGestureState::ZoomIn);
    }

    fn handle_dragging_up(&mut self, event: &PointerEvent) {
        if event.pointer_id != loupe_core::PointerId::new(0) {
            return;
        }
        self.set_state(MagnificationGestureState::Ready);
        self.last_sliding = None;
        if let Some(magnifier) = &self.magnifier {
            if magnifier.is_magnification_window_show() {
                magnifier.disable_window_magnification(false);
                self.single_tap_on_window = false;
                self.tap_on_hot_area = false;
                self.announcer
                    .announce(Announcement::MagnificationDisabled);
            }
        }
    }

    fn handle_dragging_move(&mut self, event: PointerEvent) {
        if event.pointer_id != loupe_core::PointerId::new(0) {
            return;
        }
        let Some(magnifier) = self.magnifier.clone() else {
            error!("magnifier manager is absent");
            return;
        };
        if self.last_sliding.is_none() {
            self.last_sliding = Some(event.clone());
        }
        if let Some((dx, dy)) = self.sliding_delta(&event) {
            magnifier.move_magnification_window(dx, dy);
        }
        self.last_sliding = Some(event);
    }

    /// Delta of the acting pointer between the last sliding sample and now.
    fn sliding_delta(&self, event: &PointerEvent) -> Option<(f32, f32)> {
        let last = self.last_sliding.as_ref()?.acting_position()?;
        let current = event.acting_position()?;
        Some((current.x - last.x, current.y - last.y))
    }

    /// A tap-fail fired while the third tap was held down: enter the drag
    /// shortcut, enabling magnification anchored at the held finger.
    fn on_drag(&mut self) {
        info!("drag shortcut");
        self.set_state(MagnificationGestureState::Dragging);
        self.tap_count = 0;
        self.triple_down = false;
        let Some(anchor) = self.last_down.as_ref().and_then(PointerEvent::acting_position)
        else {
            error!("no down event recorded for the drag anchor");
            return;
        };
        let Some(magnifier) = &self.magnifier else {
            error!("magnifier manager is absent");
            return;
        };
        magnifier.enable_window_magnification(anchor.x, anchor.y);
        self.announcer.announce(Announcement::ScaleChanged);
        self.clear();
    }

    /// Toggle magnification: the third tap either enables the magnifier at
    /// the tap position or disables a visible one.
    fn on_triple_tap(&mut self, center: Point) {
        info!("triple tap at ({}, {})", center.x, center.y);
        self.tap_count = 0;
        let Some(magnifier) = &self.magnifier else {
            error!("magnifier manager is absent");
            return;
        };
        if magnifier.is_magnification_window_show() {
            magnifier.disable_window_magnification(false);
            if let Some(menu) = &self.menu {
                menu.disable_menu_window();
            }
            self.announcer
                .announce(Announcement::MagnificationDisabled);
            self.single_tap_on_window = false;
            self.tap_on_hot_area = false;
        } else {
            magnifier.enable_window_magnification(center.x, center.y);
            self.announcer.announce(Announcement::ScaleChanged);
            if let Some(menu) = &self.menu {
                menu.show_menu_window(MagnificationMode::Window);
            }
        }
    }
}

/// Centroid and span of the first two samples of a two-finger event.
fn centroid_and_span(event: &PointerEvent) -> Option<(Point, f32)> {
    let first = event.samples.first()?.position;
    let second = event.samples.get(1)?.position;
    Some((first.midpoint(&second), first.distance(&second)))
}
