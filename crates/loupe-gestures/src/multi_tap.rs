//! Two-finger multi-tap recognition: single/double/triple taps and their
//! tap-and-hold variants, used as alternate activation gestures.

use log::{debug, warn};
use loupe_core::{DisplayMetrics, PointerAction, PointerEvent, PointerId, TimerQueue};
use std::collections::HashMap;

const MIN_DOUBLE_TAP_TIME_MS: u64 = 40;
const DOUBLE_TAP_TIMEOUT_MS: u64 = 300;
const LONG_PRESS_TIMEOUT_MS: u64 = 400;
/// Window in which the other finger of a multi-finger tap must land.
const TAP_INTERVAL_TIMEOUT_MS: u64 = 100;
/// Per-finger movement slop; scaled by the finger count.
const TOUCH_SLOP: f32 = 8.0;
const MAX_CONTINUE_TAP_NUM: u32 = 3;

/// A recognized two-finger gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiFingerGesture {
    /// Both fingers tapped once
    TwoFingerSingleTap,
    /// Both fingers held down
    TwoFingerLongPress,
    /// Two taps with both fingers
    TwoFingerDoubleTap,
    /// Two taps, second held down
    TwoFingerDoubleTapAndHold,
    /// Three taps with both fingers
    TwoFingerTripleTap,
    /// Three taps, third held down
    TwoFingerTripleTapAndHold,
}

/// Capability interface for multi-finger recognition results.
pub trait MultiTapObserver {
    /// Two fingers landed; a multi-finger gesture may be forming.
    fn on_started(&mut self);
    /// A multi-finger gesture completed.
    fn on_completed(&mut self, gesture: MultiFingerGesture);
    /// The stream is not a multi-finger tap gesture. `no_delay` asks the
    /// receiver to replay any withheld events immediately.
    fn on_cancelled(&mut self, no_delay: bool);
}

/// Which fingers have lifted since the current tap round began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FingerTouchUpState {
    NotAllUp,
    AllUp,
    DownAfterAllUp,
}

/// Overall progress of the multi-finger gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultiFingerGestureState {
    NotStart,
    Start,
    /// One finger down, waiting to see whether another joins.
    Wait,
    Complete,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultiTapMsg {
    WaitAnotherFingerDown,
    CancelWaitFingerDown,
    CancelGesture,
    TwoFingerSingleTap,
    TwoFingerLongPress,
    TwoFingerDoubleTap,
    TwoFingerDoubleTapAndHold,
    TwoFingerTripleTap,
    TwoFingerTripleTapAndHold,
}

/// Recognizer for two-finger tap patterns.
///
/// Tracks the set of fingers of the *first* touch-down round separately from
/// fingers added afterwards (`target_fingers`), and a tri-state touch-up
/// flag to detect additional taps after all fingers lift.
#[derive(Debug)]
pub struct MultiFingerTapRecognizer<O: MultiTapObserver> {
    observer: O,
    timers: TimerQueue<MultiTapMsg>,

    touch_slop: f32,
    double_tap_slop_squared: f32,

    target_fingers: Option<usize>,
    continue_tap_num: u32,
    is_first_up: bool,
    touch_up_state: FingerTouchUpState,
    gesture_state: MultiFingerGestureState,

    first_down: HashMap<PointerId, PointerEvent>,
    last_up: HashMap<PointerId, PointerEvent>,
    current_down: HashMap<PointerId, PointerEvent>,
    now_ms: u64,
}

impl<O: MultiTapObserver> MultiFingerTapRecognizer<O> {
    /// Create a recognizer with thresholds derived from the display.
    #[must_use]
    pub fn new(metrics: &DisplayMetrics, observer: O) -> Self {
        Self {
            observer,
            timers: TimerQueue::new(),
            touch_slop: TOUCH_SLOP,
            double_tap_slop_squared: metrics.double_tap_slop_squared(),
            target_fingers: None,
            continue_tap_num: 0,
            is_first_up: false,
            touch_up_state: FingerTouchUpState::AllUp,
            gesture_state: MultiFingerGestureState::NotStart,
            first_down: HashMap::new(),
            last_up: HashMap::new(),
            current_down: HashMap::new(),
            now_ms: 0,
        }
    }

    /// Access the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Deliver timer firings up to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        for msg in self.timers.drain_due(now_ms) {
            self.on_timer(msg);
        }
    }

    /// Consume one pointer event. The recognizer never swallows events
    /// itself, so this always returns `false`; completions arrive through
    /// the observer.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        self.tick(event.time_ms);
        match event.action {
            PointerAction::Down => {
                // a fresh down supersedes any pending cancel bookkeeping
                self.cancel_all_pending();
                self.is_first_up = true;
                self.current_down.insert(event.pointer_id, event.clone());
                if self.target_fingers.is_none() {
                    self.handle_first_touch_down(event);
                } else {
                    self.handle_continue_touch_down(event);
                }
            }
            PointerAction::Move => {
                if self.gesture_state != MultiFingerGestureState::Start {
                    return false;
                }
                if event.pointer_count() == 2 {
                    self.handle_two_finger_move(event);
                }
            }
            PointerAction::Up => self.handle_touch_up(event),
            PointerAction::Cancel => self.cancel_gesture(true),
        }
        false
    }

    /// Cancel all pending messages and reset counters. Runs synchronously on
    /// the event-processing thread, so no event interleaves with it.
    pub fn clear(&mut self) {
        self.target_fingers = None;
        self.continue_tap_num = 0;
        self.first_down.clear();
        self.last_up.clear();
        self.current_down.clear();
        self.cancel_all_pending();
    }

    fn cancel_two_finger_timers(&mut self) {
        self.timers.cancel(&MultiTapMsg::TwoFingerSingleTap);
        self.timers.cancel(&MultiTapMsg::TwoFingerLongPress);
        self.timers.cancel(&MultiTapMsg::TwoFingerDoubleTap);
        self.timers.cancel(&MultiTapMsg::TwoFingerDoubleTapAndHold);
        self.timers.cancel(&MultiTapMsg::TwoFingerTripleTap);
        self.timers.cancel(&MultiTapMsg::TwoFingerTripleTapAndHold);
    }

    fn cancel_all_pending(&mut self) {
        self.timers.cancel(&MultiTapMsg::CancelGesture);
        self.timers.cancel(&MultiTapMsg::CancelWaitFingerDown);
        self.cancel_two_finger_timers();
    }

    fn cancel_gesture(&mut self, no_delay: bool) {
        self.gesture_state = MultiFingerGestureState::Cancel;
        if self.touch_up_state != FingerTouchUpState::AllUp {
            self.touch_up_state = FingerTouchUpState::NotAllUp;
        }
        self.observer.on_cancelled(no_delay);
        self.clear();
    }

    fn on_timer(&mut self, msg: MultiTapMsg) {
        match msg {
            MultiTapMsg::WaitAnotherFingerDown => {
                self.touch_up_state = FingerTouchUpState::NotAllUp;
            }
            MultiTapMsg::CancelWaitFingerDown => {
                self.gesture_state = MultiFingerGestureState::NotStart;
            }
            MultiTapMsg::CancelGesture => {
                if self.touch_up_state != FingerTouchUpState::AllUp {
                    self.touch_up_state = FingerTouchUpState::NotAllUp;
                }
                self.observer.on_cancelled(true);
                self.gesture_state = MultiFingerGestureState::Cancel;
                self.clear();
            }
            MultiTapMsg::TwoFingerSingleTap => {
                if self.touch_up_state == FingerTouchUpState::AllUp {
                    self.complete(MultiFingerGesture::TwoFingerSingleTap);
                    self.clear();
                }
            }
            MultiTapMsg::TwoFingerDoubleTap => {
                if self.touch_up_state == FingerTouchUpState::AllUp {
                    self.complete(MultiFingerGesture::TwoFingerDoubleTap);
                    self.clear();
                }
            }
            MultiTapMsg::TwoFingerTripleTap => {
                if self.touch_up_state == FingerTouchUpState::AllUp {
                    self.complete(MultiFingerGesture::TwoFingerTripleTap);
                    self.clear();
                }
            }
            MultiTapMsg::TwoFingerLongPress => {
                if self.touch_up_state != FingerTouchUpState::NotAllUp {
                    self.complete(MultiFingerGesture::TwoFingerLongPress);
                }
                self.clear();
            }
            MultiTapMsg::TwoFingerDoubleTapAndHold => {
                if self.touch_up_state != FingerTouchUpState::NotAllUp {
                    self.complete(MultiFingerGesture::TwoFingerDoubleTapAndHold);
                }
                self.clear();
            }
            MultiTapMsg::TwoFingerTripleTapAndHold => {
                if self.touch_up_state != FingerTouchUpState::NotAllUp {
                    self.complete(MultiFingerGesture::TwoFingerTripleTapAndHold);
                }
                self.clear();
            }
        }
    }

    fn complete(&mut self, gesture: MultiFingerGesture) {
        self.gesture_state = MultiFingerGestureState::Complete;
        self.observer.on_completed(gesture);
    }

    fn handle_first_touch_down(&mut self, event: &PointerEvent) {
        if self.gesture_state == MultiFingerGestureState::Wait {
            if event.pointer_id == PointerId::new(0) {
                // the same first finger came back down: restart
                self.touch_up_state = FingerTouchUpState::NotAllUp;
                self.clear();
                return;
            }
            if !self.timers.is_pending(&MultiTapMsg::WaitAnotherFingerDown) {
                debug!("wait window expired before the second finger landed");
                self.gesture_state = MultiFingerGestureState::NotStart;
            }
        }

        if self.touch_up_state == FingerTouchUpState::NotAllUp {
            self.clear();
            return;
        }

        self.touch_up_state = FingerTouchUpState::DownAfterAllUp;
        self.first_down.insert(event.pointer_id, event.clone());
        self.timers.schedule(
            MultiTapMsg::WaitAnotherFingerDown,
            event.time_ms,
            TAP_INTERVAL_TIMEOUT_MS,
        );
        match event.pointer_count() {
            1 => self.gesture_state = MultiFingerGestureState::Wait,
            2 => {
                self.observer.on_started();
                self.gesture_state = MultiFingerGestureState::Start;
                self.timers.schedule(
                    MultiTapMsg::TwoFingerSingleTap,
                    event.time_ms,
                    DOUBLE_TAP_TIMEOUT_MS,
                );
                self.timers.schedule(
                    MultiTapMsg::TwoFingerLongPress,
                    event.time_ms,
                    LONG_PRESS_TIMEOUT_MS,
                );
            }
            _ => self.cancel_gesture(true),
        }
    }

    fn handle_continue_touch_down(&mut self, event: &PointerEvent) {
        let Some(target) = self.target_fingers else {
            return;
        };
        if target == 1 {
            return;
        }
        if self.gesture_state != MultiFingerGestureState::Start {
            self.cancel_gesture(true);
            return;
        }
        if self.touch_up_state == FingerTouchUpState::NotAllUp {
            self.cancel_gesture(true);
            return;
        }

        self.touch_up_state = FingerTouchUpState::DownAfterAllUp;
        let fingers = event.pointer_count();
        if fingers < target {
            self.timers.schedule(
                MultiTapMsg::CancelGesture,
                event.time_ms,
                TAP_INTERVAL_TIMEOUT_MS,
            );
        } else if fingers == target {
            if self.first_down.len() == 2
                && self.last_up.len() == 2
                && self.is_two_finger_double_tap(event)
            {
                self.continue_tap_num = (self.continue_tap_num + 1) % MAX_CONTINUE_TAP_NUM;
            } else {
                self.continue_tap_num = 0;
            }
            match self.continue_tap_num {
                0 => {
                    self.timers.schedule(
                        MultiTapMsg::TwoFingerSingleTap,
                        event.time_ms,
                        DOUBLE_TAP_TIMEOUT_MS,
                    );
                    self.timers.schedule(
                        MultiTapMsg::TwoFingerLongPress,
                        event.time_ms,
                        LONG_PRESS_TIMEOUT_MS,
                    );
                }
                1 => {
                    self.timers.schedule(
                        MultiTapMsg::TwoFingerDoubleTapAndHold,
                        event.time_ms,
                        LONG_PRESS_TIMEOUT_MS,
                    );
                    self.timers.schedule(
                        MultiTapMsg::TwoFingerDoubleTap,
                        event.time_ms,
                        DOUBLE_TAP_TIMEOUT_MS,
                    );
                }
                _ => {
                    self.timers.schedule(
                        MultiTapMsg::TwoFingerTripleTapAndHold,
                        event.time_ms,
                        LONG_PRESS_TIMEOUT_MS,
                    );
                    self.timers.schedule(
                        MultiTapMsg::TwoFingerTripleTap,
                        event.time_ms,
                        DOUBLE_TAP_TIMEOUT_MS,
                    );
                }
            }
        } else {
            debug!("more fingers than the first tap round");
            self.cancel_gesture(true);
        }
    }

    fn handle_two_finger_move(&mut self, event: &PointerEvent) {
        let Some(sample) = event.acting_sample() else {
            warn!("move event without a sample for the acting pointer");
            return;
        };
        if self.current_down.len() != 2 || !self.current_down.contains_key(&event.pointer_id) {
            self.cancel_gesture(false);
            return;
        }
        let Some(down_position) = self
            .current_down
            .get(&event.pointer_id)
            .and_then(PointerEvent::acting_position)
        else {
            warn!("stored down event is missing its sample");
            return;
        };
        let moved = down_position.distance(&sample.position);
        if moved >= self.touch_slop * event.pointer_count() as f32 {
            debug!("finger moved too far for a multi-tap gesture");
            self.cancel_gesture(false);
        }
    }

    fn handle_touch_up(&mut self, event: &PointerEvent) {
        self.timers.cancel(&MultiTapMsg::WaitAnotherFingerDown);
        self.timers.cancel(&MultiTapMsg::TwoFingerLongPress);
        self.timers.cancel(&MultiTapMsg::TwoFingerDoubleTapAndHold);
        self.timers.cancel(&MultiTapMsg::TwoFingerTripleTapAndHold);

        if self.gesture_state == MultiFingerGestureState::Wait {
            self.timers.schedule(
                MultiTapMsg::CancelWaitFingerDown,
                event.time_ms,
                DOUBLE_TAP_TIMEOUT_MS,
            );
        }

        if event.pointer_count() == 1 {
            self.touch_up_state = FingerTouchUpState::AllUp;
            self.current_down.clear();
        } else {
            self.touch_up_state = FingerTouchUpState::NotAllUp;
        }

        if self.is_first_up {
            self.is_first_up = false;
            if let Some(target) = self.target_fingers {
                if event.pointer_count() != target {
                    self.cancel_gesture(true);
                    return;
                }
            }
        }

        self.last_up.insert(event.pointer_id, event.clone());
        if self.target_fingers.is_none()
            && self.gesture_state == MultiFingerGestureState::Start
        {
            self.target_fingers = Some(event.pointer_count());
        }
    }

    /// Check whether the latest two-finger down continues a two-finger tap:
    /// timing within the double-tap window and both fingers stable within the
    /// slop distance (in either pairing).
    fn is_two_finger_double_tap(&self, event: &PointerEvent) -> bool {
        let (Some(up0), Some(up1)) = (
            self.last_up.get(&PointerId::new(0)),
            self.last_up.get(&PointerId::new(1)),
        ) else {
            warn!("missing last-up events for the double-tap check");
            return false;
        };
        let (Some(down0), Some(down1)) = (
            self.first_down.get(&PointerId::new(0)),
            self.first_down.get(&PointerId::new(1)),
        ) else {
            warn!("missing first-down events for the double-tap check");
            return false;
        };

        let first_up_time = up0.time_ms.min(up1.time_ms);
        let gap = event.time_ms.saturating_sub(first_up_time);
        if !(MIN_DOUBLE_TAP_TIME_MS..=DOUBLE_TAP_TIMEOUT_MS).contains(&gap) {
            debug!("inter-tap gap {gap}ms outside the double-tap window");
            return false;
        }

        if event.pointer_count() != 2 {
            return false;
        }
        let current_f = event.samples[0].position;
        let current_s = event.samples[1].position;
        let (Some(prev_f), Some(prev_s)) =
            (down0.acting_position(), down1.acting_position())
        else {
            return false;
        };

        let sq = |a: loupe_core::Point, b: loupe_core::Point| {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            dx * dx + dy * dy
        };
        (sq(prev_f, current_f) < self.double_tap_slop_squared
            && sq(prev_s, current_s) < self.double_tap_slop_squared)
            || (sq(prev_f, current_s) < self.double_tap_slop_squared
                && sq(prev_s, current_f) < self.double_tap_slop_squared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_core::{Point, PointerSample};

    const METRICS: DisplayMetrics = DisplayMetrics::new(1080.0, 2340.0, 160.0, 1.0);

    #[derive(Debug, Default)]
    struct Recording {
        started: u32,
        completed: Vec<MultiFingerGesture>,
        cancelled: Vec<bool>,
    }

    impl MultiTapObserver for Recording {
        fn on_started(&mut self) {
            self.started += 1;
        }
        fn on_completed(&mut self, gesture: MultiFingerGesture) {
            self.completed.push(gesture);
        }
        fn on_cancelled(&mut self, no_delay: bool) {
            self.cancelled.push(no_delay);
        }
    }

    fn recognizer() -> MultiFingerTapRecognizer<Recording> {
        MultiFingerTapRecognizer::new(&METRICS, Recording::default())
    }

    fn p0() -> PointerId {
        PointerId::new(0)
    }
    fn p1() -> PointerId {
        PointerId::new(1)
    }

    fn first_down(t: u64) -> PointerEvent {
        PointerEvent::new(
            PointerAction::Down,
            p0(),
            vec![PointerSample::finger(p0(), Point::new(100.0, 100.0))],
            t,
        )
    }

    fn second_down(t: u64) -> PointerEvent {
        PointerEvent::new(
            PointerAction::Down,
            p1(),
            vec![
                PointerSample::finger(p0(), Point::new(100.0, 100.0)),
                PointerSample::finger(p1(), Point::new(200.0, 100.0)),
            ],
            t,
        )
    }

    fn first_up(t: u64) -> PointerEvent {
        let mut lifted = PointerSample::finger(p1(), Point::new(200.0, 100.0));
        lifted.pressed = false;
        PointerEvent::new(
            PointerAction::Up,
            p1(),
            vec![
                PointerSample::finger(p0(), Point::new(100.0, 100.0)),
                lifted,
            ],
            t,
        )
    }

    fn last_up(t: u64) -> PointerEvent {
        let mut lifted = PointerSample::finger(p0(), Point::new(100.0, 100.0));
        lifted.pressed = false;
        PointerEvent::new(PointerAction::Up, p0(), vec![lifted], t)
    }

    /// Drive one complete two-finger tap: both down, both up.
    fn tap_round(rec: &mut MultiFingerTapRecognizer<Recording>, t: u64) {
        rec.on_pointer_event(&first_down(t));
        rec.on_pointer_event(&second_down(t + 20));
        rec.on_pointer_event(&first_up(t + 60));
        rec.on_pointer_event(&last_up(t + 70));
    }

    #[test]
    fn test_two_finger_single_tap() {
        let mut rec = recognizer();
        tap_round(&mut rec, 0);
        // nothing yet: the single-tap message is still pending
        assert!(rec.observer().completed.is_empty());
        rec.tick(400);
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerSingleTap]
        );
        assert_eq!(rec.observer().started, 1);
    }

    #[test]
    fn test_two_finger_long_press() {
        let mut rec = recognizer();
        rec.on_pointer_event(&first_down(0));
        rec.on_pointer_event(&second_down(20));
        rec.tick(500); // long-press timer at 20 + 400
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerLongPress]
        );
    }

    #[test]
    fn test_two_finger_double_tap() {
        let mut rec = recognizer();
        tap_round(&mut rec, 0);
        tap_round(&mut rec, 150);
        rec.tick(600);
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerDoubleTap]
        );
    }

    #[test]
    fn test_two_finger_triple_tap() {
        let mut rec = recognizer();
        tap_round(&mut rec, 0);
        tap_round(&mut rec, 150);
        tap_round(&mut rec, 300);
        rec.tick(800);
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerTripleTap]
        );
    }

    #[test]
    fn test_two_finger_double_tap_and_hold() {
        let mut rec = recognizer();
        tap_round(&mut rec, 0);
        rec.on_pointer_event(&first_down(150));
        rec.on_pointer_event(&second_down(170));
        rec.tick(700); // hold through the 400ms and-hold timer
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerDoubleTapAndHold]
        );
    }

    #[test]
    fn test_two_finger_triple_tap_and_hold() {
        let mut rec = recognizer();
        tap_round(&mut rec, 0);
        tap_round(&mut rec, 150);
        rec.on_pointer_event(&first_down(300));
        rec.on_pointer_event(&second_down(320));
        rec.tick(900);
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerTripleTapAndHold]
        );
    }

    #[test]
    fn test_movement_cancels_gesture() {
        let mut rec = recognizer();
        rec.on_pointer_event(&first_down(0));
        rec.on_pointer_event(&second_down(20));
        // move finger 1 well past the 2-finger slop (16 px)
        let moved = PointerEvent::new(
            PointerAction::Move,
            p1(),
            vec![
                PointerSample::finger(p0(), Point::new(100.0, 100.0)),
                PointerSample::finger(p1(), Point::new(260.0, 100.0)),
            ],
            40,
        );
        rec.on_pointer_event(&moved);
        assert_eq!(rec.observer().cancelled, vec![false]);
        rec.tick(800);
        assert!(rec.observer().completed.is_empty());
    }

    #[test]
    fn test_three_fingers_cancel() {
        let mut rec = recognizer();
        rec.on_pointer_event(&first_down(0));
        rec.on_pointer_event(&second_down(20));
        let third = PointerEvent::new(
            PointerAction::Down,
            PointerId::new(2),
            vec![
                PointerSample::finger(p0(), Point::new(100.0, 100.0)),
                PointerSample::finger(p1(), Point::new(200.0, 100.0)),
                PointerSample::finger(PointerId::new(2), Point::new(300.0, 100.0)),
            ],
            40,
        );
        rec.on_pointer_event(&third);
        assert_eq!(rec.observer().cancelled, vec![true]);
    }

    #[test]
    fn test_second_round_with_displaced_fingers_restarts_count() {
        let mut rec = recognizer();
        tap_round(&mut rec, 0);
        // second round lands far away: not a double tap continuation
        let far0 = PointerEvent::new(
            PointerAction::Down,
            p0(),
            vec![PointerSample::finger(p0(), Point::new(700.0, 900.0))],
            150,
        );
        let far1 = PointerEvent::new(
            PointerAction::Down,
            p1(),
            vec![
                PointerSample::finger(p0(), Point::new(700.0, 900.0)),
                PointerSample::finger(p1(), Point::new(800.0, 900.0)),
            ],
            170,
        );
        rec.on_pointer_event(&far0);
        rec.on_pointer_event(&far1);
        let mut lifted1 = PointerSample::finger(p1(), Point::new(800.0, 900.0));
        lifted1.pressed = false;
        rec.on_pointer_event(&PointerEvent::new(
            PointerAction::Up,
            p1(),
            vec![PointerSample::finger(p0(), Point::new(700.0, 900.0)), lifted1],
            210,
        ));
        let mut lifted0 = PointerSample::finger(p0(), Point::new(700.0, 900.0));
        lifted0.pressed = false;
        rec.on_pointer_event(&PointerEvent::new(
            PointerAction::Up,
            p0(),
            vec![lifted0],
            220,
        ));
        rec.tick(600);
        // counted as a fresh single tap, not a double tap
        assert_eq!(
            rec.observer().completed,
            vec![MultiFingerGesture::TwoFingerSingleTap]
        );
    }

    #[test]
    fn test_cancel_action_cancels() {
        let mut rec = recognizer();
        rec.on_pointer_event(&first_down(0));
        rec.on_pointer_event(&second_down(20));
        rec.on_pointer_event(&PointerEvent::new(
            PointerAction::Cancel,
            p0(),
            vec![],
            40,
        ));
        assert_eq!(rec.observer().cancelled, vec![true]);
    }
}
