//! The pointer-event model consumed by the gesture recognizers.
//!
//! A [`PointerEvent`] bundles the current state of every touching slot
//! (one [`PointerSample`] per finger) together with the action that produced
//! the event and a monotonically increasing occurrence time in milliseconds.
//!
//! Conventions, matching the input-dispatch collaborator:
//! - A `Down`/`Move`/`Up` event's `pointer_id` names the acting slot; the
//!   sample for that slot is present in `samples`.
//! - After an `Up`, the lifted slot's sample is still listed with
//!   `pressed == false`; "the last finger lifted" is therefore
//!   `pointer_count() == 1 && !acting.pressed`.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Identifier of one pointer slot (finger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Create a new pointer id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Tool that produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolType {
    /// A finger
    #[default]
    Finger,
    /// A stylus/pen
    Stylus,
    /// A knuckle; knuckle input always bypasses gesture classification
    Knuckle,
}

/// Input device class that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SourceType {
    /// The touchscreen; the only source the gesture engines classify
    #[default]
    Touchscreen,
    /// A mouse
    Mouse,
    /// Anything else (trackpad, joystick, ...)
    Other,
}

/// Pointer action carried by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerAction {
    /// A slot went down
    Down,
    /// One or more slots moved
    Move,
    /// A slot lifted
    Up,
    /// The stream was cancelled by the dispatcher
    Cancel,
}

/// One finger's observed state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Slot id
    pub id: PointerId,
    /// Position in display pixels
    pub position: Point,
    /// Producing tool
    pub tool: ToolType,
    /// Whether the slot is currently pressed
    pub pressed: bool,
}

impl PointerSample {
    /// Create a pressed finger sample.
    #[must_use]
    pub const fn finger(id: PointerId, position: Point) -> Self {
        Self {
            id,
            position,
            tool: ToolType::Finger,
            pressed: true,
        }
    }
}

/// One pointer event as delivered by the input-dispatch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// The action
    pub action: PointerAction,
    /// The acting slot
    pub pointer_id: PointerId,
    /// State of every touching slot
    pub samples: Vec<PointerSample>,
    /// Producing device class
    pub source: SourceType,
    /// Occurrence time in milliseconds, monotonically increasing
    pub time_ms: u64,
}

impl PointerEvent {
    /// Create a new event.
    #[must_use]
    pub fn new(
        action: PointerAction,
        pointer_id: PointerId,
        samples: Vec<PointerSample>,
        time_ms: u64,
    ) -> Self {
        Self {
            action,
            pointer_id,
            samples,
            source: SourceType::Touchscreen,
            time_ms,
        }
    }

    /// Number of touching slots listed in the event.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.samples.len()
    }

    /// Sample for a given slot id.
    #[must_use]
    pub fn sample(&self, id: PointerId) -> Option<&PointerSample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Sample of the acting slot.
    #[must_use]
    pub fn acting_sample(&self) -> Option<&PointerSample> {
        self.sample(self.pointer_id)
    }

    /// Position of the acting slot, if listed.
    #[must_use]
    pub fn acting_position(&self) -> Option<Point> {
        self.acting_sample().map(|s| s.position)
    }

    /// Whether any sample was produced by a stylus or knuckle.
    #[must_use]
    pub fn is_knuckle(&self) -> bool {
        self.samples
            .iter()
            .any(|s| matches!(s.tool, ToolType::Stylus | ToolType::Knuckle))
    }
}
