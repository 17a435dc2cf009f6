//! Error types for loupe-magnifier.

use thiserror::Error;

/// Errors surfaced at the settings/IPC boundary of the magnification engine.
///
/// Failures inside the gesture/geometry pipeline never surface as errors;
/// they degrade to logged no-ops by design.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MagnifierError {
    /// A mode-changed notification carried a value outside the known range.
    #[error("invalid magnification mode value: {0}")]
    InvalidMode(u32),
}
