//! # Error Types
//!
//! Structured error types for frame_core. Every problem the engine can meet
//! is a local, recoverable condition: a bad wall does not stop the other
//! walls from being framed, and a cut that fits no stock length does not
//! stop the rest of the cutting plan. Stages therefore return
//! [`Calculated`] values that carry partial results alongside the flagged
//! problems, while single-input operations return [`FrameResult`].
//!
//! ## Example
//!
//! ```rust
//! use frame_core::errors::{FrameError, FrameResult};
//!
//! fn validate_gap(stud_gap_mm: f64) -> FrameResult<()> {
//!     if stud_gap_mm <= 0.0 {
//!         return Err(FrameError::invalid_input(
//!             "stud_gap_mm",
//!             stud_gap_mm.to_string(),
//!             "Stud gap must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for frame_core operations
pub type FrameResult<T> = Result<T, FrameError>;

/// Structured error type for framing operations.
///
/// Each variant carries enough context for a host to point the user at
/// the offending input without parsing the message.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum FrameError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The build envelope leaves no height for the wall frame
    #[error("Invalid envelope: max frame height is {max_frame_height_mm} mm (must be positive)")]
    InvalidEnvelope { max_frame_height_mm: f64 },

    /// A wall's own dimensions cannot be framed
    #[error("Invalid wall '{wall_id}': {field} = {value} - {reason}")]
    InvalidWallGeometry {
        wall_id: String,
        field: String,
        value: String,
        reason: String,
    },

    /// Door-opening sub-sections do not fit inside the wall
    #[error(
        "Door opening on wall '{wall_id}' leaves {section} at {width_mm} mm, \
         {shortfall_mm} mm short of the {minimum_mm} mm minimum"
    )]
    DoorOpeningTooWide {
        wall_id: String,
        section: String,
        width_mm: f64,
        minimum_mm: f64,
        shortfall_mm: f64,
    },

    /// A required cut is longer than every stock length on offer
    #[error(
        "No stock length for {quantity} x {member_type} {section_name} at {length_mm} mm \
         (longest stock {longest_stock_mm} mm)"
    )]
    UnfulfillableCut {
        member_type: String,
        section_name: String,
        length_mm: f64,
        quantity: u32,
        longest_stock_mm: f64,
    },

    /// A catalogue id was missing and a best-effort substitute was used
    #[error("Catalogue fallback: {kind} '{requested}' not found, using '{substituted}'")]
    CatalogueFallback {
        kind: String,
        requested: String,
        substituted: String,
    },

    /// A catalogue id was missing and nothing could stand in for it
    #[error("Material not found: {material_id}")]
    MaterialNotFound { material_id: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl FrameError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FrameError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidWallGeometry error
    pub fn invalid_wall(
        wall_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FrameError::InvalidWallGeometry {
            wall_id: wall_id.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a CatalogueFallback error
    pub fn catalogue_fallback(
        kind: impl Into<String>,
        requested: impl Into<String>,
        substituted: impl Into<String>,
    ) -> Self {
        FrameError::CatalogueFallback {
            kind: kind.into(),
            requested: requested.into(),
            substituted: substituted.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl Into<String>) -> Self {
        FrameError::MaterialNotFound {
            material_id: material_id.into(),
        }
    }

    /// Whether the engine can keep computing after this problem.
    ///
    /// Everything except a broken project document is recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FrameError::SerializationError { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FrameError::InvalidInput { .. } => "INVALID_INPUT",
            FrameError::InvalidEnvelope { .. } => "INVALID_ENVELOPE",
            FrameError::InvalidWallGeometry { .. } => "INVALID_WALL_GEOMETRY",
            FrameError::DoorOpeningTooWide { .. } => "DOOR_OPENING_TOO_WIDE",
            FrameError::UnfulfillableCut { .. } => "UNFULFILLABLE_CUT",
            FrameError::CatalogueFallback { .. } => "CATALOGUE_FALLBACK",
            FrameError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            FrameError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        FrameError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// A computed value together with the problems flagged while computing it.
///
/// Stages never abort on the conditions above; they skip what they cannot
/// compute and report it here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Calculated<T> {
    /// The (possibly partial) result
    pub value: T,

    /// Problems met along the way
    pub issues: Vec<FrameError>,
}

impl<T> Calculated<T> {
    /// A result with no issues
    pub fn clean(value: T) -> Self {
        Calculated {
            value,
            issues: Vec::new(),
        }
    }

    /// A result with the given issues
    pub fn with_issues(value: T, issues: Vec<FrameError>) -> Self {
        Calculated { value, issues }
    }

    /// True when nothing was flagged
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Move this result's issues into `sink` and return the value
    pub fn drain_into(self, sink: &mut Vec<FrameError>) -> T {
        sink.extend(self.issues);
        self.value
    }

    /// Transform the value, keeping the issues
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Calculated<U> {
        Calculated {
            value: f(self.value),
            issues: self.issues,
        }
    }
}
