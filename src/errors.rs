use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FloorweaveError {
    #[error("room dimensions must be positive, got {width}ft x {depth}ft")]
    InvalidDimensions { width: f32, depth: f32 },

    #[error("no room named '{0}'")]
    RoomNotFound(String),

    #[error("placing '{room}' would overlap '{conflict}'")]
    Overlap { room: String, conflict: String },

    #[error("'{room}' would extend outside the footprint")]
    FootprintExceeded { room: String },

    #[error("program needs at least {required} sq ft but the footprint provides {available}")]
    UnsatisfiableRequirement { required: f32, available: f32 },

    #[error("no walkable path from the entry to: {}", rooms.join(", "))]
    Unreachable { rooms: Vec<String> },

    #[error("'{room}' requires direct hallway access but has none")]
    MissingAccess { room: String },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

impl FloorweaveError {
    /// A short actionable suggestion for the caller. Every fatal error
    /// carries one so adapters can surface a fix without pattern matching.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            FloorweaveError::InvalidDimensions { .. } => "use positive width and depth",
            FloorweaveError::RoomNotFound(_) => "check the room name, or place the target room first",
            FloorweaveError::Overlap { .. } => "try a different direction or a larger gap",
            FloorweaveError::FootprintExceeded { .. } => "shrink the room or move it inward",
            FloorweaveError::UnsatisfiableRequirement { .. } => "shrink the program or grow the footprint",
            FloorweaveError::Unreachable { .. } => "add a hallway or door toward the isolated rooms",
            FloorweaveError::MissingAccess { .. } => "route a hallway segment to the room",
            FloorweaveError::Degenerate(_) => "check for zero-length segments or empty polygons",
        }
    }
}

/// An advisory finding produced by a synthesis stage. Stages that are not
/// allowed to fail (§ error policy) report problems through these instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanWarning {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl PlanWarning {
    pub fn warning(category: &'static str, message: impl Into<String>) -> Self {
        PlanWarning { category, severity: Severity::Warning, message: message.into() }
    }

    pub fn error(category: &'static str, message: impl Into<String>) -> Self {
        PlanWarning { category, severity: Severity::Error, message: message.into() }
    }
}
