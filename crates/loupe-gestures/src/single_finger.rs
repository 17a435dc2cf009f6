//! Single-finger gesture recognition: taps, double-taps, long-presses and
//! directional swipes (straight or two-segment) for non-magnified
//! accessibility navigation.

use log::{debug, warn};
use loupe_core::{
    DisplayMetrics, GestureRoute, Point, PointerAction, PointerEvent, TimerQueue,
};

/// Maximum time a started directional gesture may idle below the movement
/// threshold before it is cancelled.
const GESTURE_STARTED_TIME_THRESHOLD_MS: u64 = 300;
/// Maximum idle time before the stream has been classified as a gesture.
const GESTURE_NOT_STARTED_TIME_THRESHOLD_MS: u64 = 150;
/// Lower bound of the down-to-down double-tap window.
const MIN_DOUBLE_TAP_TIME_MS: u64 = 40;
/// Upper bound of the double-tap window; also the single-tap timeout.
const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;
/// Hold time for a long press.
const LONG_PRESS_TIMEOUT_MS: u64 = 400;
/// Unit-vector dot product at or below which the route is segmented
/// (a turn of 90 degrees or more).
const DEGREES_THRESHOLD: f32 = 0.0;

/// One of the four primary swipe directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Toward smaller y
    Up,
    /// Toward larger y
    Down,
    /// Toward smaller x
    Left,
    /// Toward larger x
    Right,
}

/// A recognized navigation gesture: a straight swipe or one of the twelve
/// two-segment compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Straight swipe up
    SwipeUp,
    /// Straight swipe down
    SwipeDown,
    /// Straight swipe left
    SwipeLeft,
    /// Straight swipe right
    SwipeRight,
    /// Up then down
    SwipeUpThenDown,
    /// Up then left
    SwipeUpThenLeft,
    /// Up then right
    SwipeUpThenRight,
    /// Down then up
    SwipeDownThenUp,
    /// Down then left
    SwipeDownThenLeft,
    /// Down then right
    SwipeDownThenRight,
    /// Left then up
    SwipeLeftThenUp,
    /// Left then down
    SwipeLeftThenDown,
    /// Left then right
    SwipeLeftThenRight,
    /// Right then up
    SwipeRightThenUp,
    /// Right then down
    SwipeRightThenDown,
    /// Right then left
    SwipeRightThenLeft,
}

const fn direction_index(direction: SwipeDirection) -> usize {
    match direction {
        SwipeDirection::Up => 0,
        SwipeDirection::Down => 1,
        SwipeDirection::Left => 2,
        SwipeDirection::Right => 3,
    }
}

/// `DIRECTION_TO_GESTURE[first][second]`; the diagonal keeps the single
/// direction (two collinear segments are one swipe).
const DIRECTION_TO_GESTURE: [[GestureKind; 4]; 4] = [
    [
        GestureKind::SwipeUp,
        GestureKind::SwipeUpThenDown,
        GestureKind::SwipeUpThenLeft,
        GestureKind::SwipeUpThenRight,
    ],
    [
        GestureKind::SwipeDownThenUp,
        GestureKind::SwipeDown,
        GestureKind::SwipeDownThenLeft,
        GestureKind::SwipeDownThenRight,
    ],
    [
        GestureKind::SwipeLeftThenUp,
        GestureKind::SwipeLeftThenDown,
        GestureKind::SwipeLeft,
        GestureKind::SwipeLeftThenRight,
    ],
    [
        GestureKind::SwipeRightThenUp,
        GestureKind::SwipeRightThenDown,
        GestureKind::SwipeRightThenLeft,
        GestureKind::SwipeRight,
    ],
];

/// Capability interface for gesture-recognition results.
///
/// Callbacks returning `bool` report whether the receiver consumed the
/// event/gesture, which becomes the recognizer's own return value.
pub trait GestureObserver {
    /// The stream was classified as a directional gesture.
    fn on_started(&mut self) -> bool;
    /// A directional gesture completed.
    fn on_completed(&mut self, gesture: GestureKind) -> bool;
    /// The stream did not match any known gesture.
    fn on_cancelled(&mut self, event: &PointerEvent) -> bool;
    /// The finger lifted on the second tap of a double tap.
    fn on_double_tap(&mut self, event: &PointerEvent) -> bool;
    /// A double tap was performed and the second tap held down.
    fn on_double_tap_long_press(&mut self, event: &PointerEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SingleFingerMsg {
    SingleTap,
    LongPress,
}

/// Recognizer for single-pointer gesture streams.
///
/// Driven by [`process_event`](Self::process_event); time-based transitions
/// are delivered by draining the owned timer queue, so behavior is fully
/// deterministic given the event timestamps.
#[derive(Debug)]
pub struct SingleFingerRecognizer<O: GestureObserver> {
    observer: O,
    timers: TimerQueue<SingleFingerMsg>,
    route: GestureRoute,

    threshold: f32,
    double_tap_slop_squared: f32,

    recognizing: bool,
    gesture_started: bool,
    first_tap_up: bool,
    double_tap: bool,
    double_tap_detecting: bool,
    tap_down: bool,
    long_press: bool,
    continue_down: bool,

    start_point: Point,
    start_time_ms: u64,
    cur_down: Option<PointerEvent>,
    prev_up: Option<PointerEvent>,
    now_ms: u64,
}

impl<O: GestureObserver> SingleFingerRecognizer<O> {
    /// Create a recognizer with thresholds derived from the display.
    #[must_use]
    pub fn new(metrics: &DisplayMetrics, observer: O) -> Self {
        Self {
            observer,
            timers: TimerQueue::new(),
            route: GestureRoute::new(metrics.route_min_pixels(), metrics.route_min_pixels()),
            threshold: metrics.gesture_threshold(),
            double_tap_slop_squared: metrics.double_tap_slop_squared(),
            recognizing: false,
            gesture_started: false,
            first_tap_up: false,
            double_tap: false,
            double_tap_detecting: false,
            tap_down: false,
            long_press: false,
            continue_down: false,
            start_point: Point::ORIGIN,
            start_time_ms: 0,
            cur_down: None,
            prev_up: None,
            now_ms: 0,
        }
    }

    /// Access the observer (used by owners to read recording doubles back).
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Whether a first tap completed and its double-tap window is open.
    #[must_use]
    pub fn is_first_tap(&self) -> bool {
        self.first_tap_up
    }

    /// Deliver timer firings up to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        for msg in self.timers.drain_due(now_ms) {
            self.on_timer(msg);
        }
    }

    /// Consume one pointer event; returns whether it was consumed as part of
    /// a recognized gesture.
    pub fn process_event(&mut self, event: &PointerEvent) -> bool {
        self.tick(event.time_ms);
        match event.action {
            PointerAction::Down if event.pointer_count() == 1 => {
                self.handle_down(event);
            }
            PointerAction::Down => {
                // another finger joined: this is no longer a single-finger
                // gesture
                self.recognizing = false;
                self.gesture_started = false;
                self.route.clear();
                self.standard_gesture_cancelled();
            }
            PointerAction::Move => return self.handle_move(event),
            PointerAction::Up => return self.handle_up(event),
            PointerAction::Cancel => self.clear(),
        }
        if !self.recognizing {
            return false;
        }
        self.standard_gesture_recognizer(event)
    }

    /// Reset all recognition state and cancel pending timers.
    pub fn clear(&mut self) {
        self.first_tap_up = false;
        self.double_tap = false;
        self.gesture_started = false;
        self.recognizing = false;
        self.route.clear();
        self.continue_down = false;
        self.standard_gesture_cancelled();
    }

    fn on_timer(&mut self, msg: SingleFingerMsg) {
        match msg {
            SingleFingerMsg::LongPress => {
                self.timers.cancel(&SingleFingerMsg::SingleTap);
                self.long_press = true;
                self.maybe_recognize_long_press();
            }
            SingleFingerMsg::SingleTap => {
                if !self.continue_down {
                    self.clear();
                }
            }
        }
    }

    fn maybe_recognize_long_press(&mut self) {
        if !self.double_tap {
            return;
        }
        let down = self.cur_down.clone();
        self.clear();
        if let Some(down) = down {
            self.observer.on_double_tap_long_press(&down);
        }
    }

    fn handle_down(&mut self, event: &PointerEvent) {
        let Some(point) = event.acting_position() else {
            warn!("down event without a sample for the acting pointer");
            return;
        };
        self.double_tap = false;
        self.recognizing = true;
        self.gesture_started = false;
        self.route.start(point);
        self.start_point = point;
        self.start_time_ms = event.time_ms;
    }

    fn handle_move(&mut self, event: &PointerEvent) -> bool {
        let Some(point) = event.acting_position() else {
            warn!("move event without a sample for the acting pointer");
            return false;
        };
        if self.recognizing {
            let displacement = self.start_point.distance(&point);
            if displacement > self.threshold {
                self.start_point = point;
                self.start_time_ms = event.time_ms;
                self.first_tap_up = false;
                self.double_tap = false;
                if !self.gesture_started {
                    self.gesture_started = true;
                    return self.observer.on_started();
                }
            } else if !self.first_tap_up {
                let idle = event.time_ms.saturating_sub(self.start_time_ms);
                let limit = if self.gesture_started {
                    GESTURE_STARTED_TIME_THRESHOLD_MS
                } else {
                    GESTURE_NOT_STARTED_TIME_THRESHOLD_MS
                };
                if idle > limit {
                    self.recognizing = false;
                    self.gesture_started = false;
                    self.route.clear();
                    return self.observer.on_cancelled(event);
                }
            }
            self.route.push(point);
        }
        if !self.recognizing {
            return false;
        }
        self.standard_gesture_recognizer(event)
    }

    fn handle_up(&mut self, event: &PointerEvent) -> bool {
        if self.double_tap {
            self.clear();
            return self.observer.on_double_tap(event);
        }
        if self.gesture_started {
            if let Some(point) = event.acting_position() {
                self.route.push(point);
            }
            return self.recognize_direction_gesture(event);
        }
        if !self.recognizing {
            return false;
        }
        self.standard_gesture_recognizer(event)
    }

    /// Tap/double-tap/long-press tracking shared by every state.
    fn standard_gesture_recognizer(&mut self, event: &PointerEvent) -> bool {
        match event.action {
            PointerAction::Down if event.pointer_count() == 1 => {
                if self.cur_down.is_some() && self.prev_up.is_some() && self.is_double_tap(event) {
                    self.double_tap_detecting = true;
                    self.double_tap = true;
                } else {
                    self.timers
                        .schedule(SingleFingerMsg::SingleTap, event.time_ms, DOUBLE_TAP_TIMEOUT_MS);
                }
                self.cur_down = Some(event.clone());
                self.tap_down = true;
                self.continue_down = true;
                self.long_press = false;
                self.timers
                    .schedule(SingleFingerMsg::LongPress, event.time_ms, LONG_PRESS_TIMEOUT_MS);
            }
            PointerAction::Up => {
                self.continue_down = false;
                if self.long_press {
                    self.timers.cancel(&SingleFingerMsg::SingleTap);
                    self.long_press = false;
                } else if !self.double_tap_detecting && self.tap_down {
                    self.first_tap_up = true;
                }
                self.prev_up = Some(event.clone());
                self.double_tap_detecting = false;
                self.timers.cancel(&SingleFingerMsg::LongPress);
            }
            PointerAction::Down => self.standard_gesture_cancelled(),
            _ => {}
        }
        false
    }

    fn standard_gesture_cancelled(&mut self) {
        self.timers.cancel(&SingleFingerMsg::LongPress);
        self.timers.cancel(&SingleFingerMsg::SingleTap);
        self.long_press = false;
        self.double_tap_detecting = false;
        self.tap_down = false;
    }

    fn is_double_tap(&self, event: &PointerEvent) -> bool {
        let (Some(prev_up), Some(cur_down)) = (&self.prev_up, &self.cur_down) else {
            return false;
        };
        let gap = event.time_ms.saturating_sub(prev_up.time_ms);
        if !(MIN_DOUBLE_TAP_TIME_MS..=DOUBLE_TAP_TIMEOUT_MS).contains(&gap) {
            return false;
        }
        let (Some(first), Some(second)) = (cur_down.acting_position(), event.acting_position())
        else {
            return false;
        };
        let dx = first.x - second.x;
        let dy = first.y - second.y;
        dx * dx + dy * dy < self.double_tap_slop_squared
    }

    fn recognize_direction_gesture(&mut self, event: &PointerEvent) -> bool {
        let result = if self.route.len() < 2 {
            debug!("route too short for a directional gesture");
            self.observer.on_cancelled(event)
        } else {
            // Segment the route where the motion turns by 90 degrees or
            // more; anything with more than two segments is not a gesture.
            let path = pointer_path(self.route.points());
            match path.len() {
                2 => {
                    let direction = swipe_direction(path[0], path[1]);
                    self.observer
                        .on_completed(DIRECTION_TO_GESTURE[direction_index(direction)][direction_index(direction)])
                }
                3 => {
                    let first = swipe_direction(path[0], path[1]);
                    let second = swipe_direction(path[1], path[2]);
                    self.observer.on_completed(
                        DIRECTION_TO_GESTURE[direction_index(first)][direction_index(second)],
                    )
                }
                _ => self.observer.on_cancelled(event),
            }
        };
        self.route.clear();
        self.gesture_started = false;
        self.recognizing = false;
        self.continue_down = false;
        result
    }
}

/// Dominant-axis direction of the segment from `first` to `second`.
fn swipe_direction(first: Point, second: Point) -> SwipeDirection {
    let dx = second.x - first.x;
    let dy = second.y - first.y;
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else if dy > 0.0 {
        SwipeDirection::Down
    } else {
        SwipeDirection::Up
    }
}

/// Reduce a route to its segment endpoints.
///
/// Walks the route keeping a running average of unit motion vectors since the
/// last separation; when the next motion's unit vector turns 90 degrees or
/// more against that average, a new separation point is inserted.
fn pointer_path(route: &[Point]) -> Vec<Point> {
    let mut path = Vec::new();
    let mut first_separation = route[0];
    let mut next_point = route[0];
    let mut x_unit = 0.0f32;
    let mut y_unit = 0.0f32;
    let mut vector_length = 0.0f32;
    let mut num_since_separation = 0u32;

    path.push(first_separation);
    for &point in &route[1..] {
        next_point = point;
        if num_since_separation > 0 {
            let avg_x = x_unit / num_since_separation as f32;
            let avg_y = y_unit / num_since_separation as f32;
            let separation = Point::new(
                vector_length * avg_x + first_separation.x,
                vector_length * avg_y + first_separation.y,
            );
            let nx = next_point.x - separation.x;
            let ny = next_point.y - separation.y;
            let next_length = nx.hypot(ny);
            if next_length > f32::EPSILON
                && (avg_x * (nx / next_length) + avg_y * (ny / next_length)) <= DEGREES_THRESHOLD
            {
                path.push(separation);
                first_separation = separation;
                x_unit = 0.0;
                y_unit = 0.0;
                num_since_separation = 0;
            }
        }
        let vx = next_point.x - first_separation.x;
        let vy = next_point.y - first_separation.y;
        vector_length = vx.hypot(vy);
        num_since_separation += 1;
        if vector_length > f32::EPSILON {
            x_unit += vx / vector_length;
            y_unit += vy / vector_length;
        }
    }
    path.push(next_point);
    path
}
