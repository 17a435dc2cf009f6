//! Core types for the loupe accessibility magnification engine.
//!
//! This crate provides the foundational types shared by the gesture
//! recognizers and the magnification managers:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - The pointer-event model: [`PointerEvent`], [`PointerSample`]
//! - The recorded gesture path: [`GestureRoute`]
//! - Deterministic, clock-injected timers: [`TimerQueue`]
//! - Display metrics and DPI-derived thresholds: [`DisplayMetrics`]
//! - Collaborator traits for announcements and persisted settings

mod display;
mod geometry;
mod pointer;
mod route;
mod settings;
mod timer;

pub use display::DisplayMetrics;
pub use geometry::{Point, Rect, Size};
pub use pointer::{PointerAction, PointerEvent, PointerId, PointerSample, SourceType, ToolType};
pub use route::GestureRoute;
pub use settings::{
    Announcement, Announcer, MagnificationMode, MemorySettings, NullAnnouncer, SettingsStore,
};
pub use timer::{TimerHandle, TimerQueue};
