//! # Build Envelope
//!
//! Derives the usable wall-frame height from the legal height limit and the
//! foundation, floor and roof allowances, then assigns heights to walls:
//!
//! ```text
//! max_frame_height = max_legal_height - concrete_offset - roof_system - floor_system
//! back_height      = master_height - span * rise / run
//! stud_height(x)   = front - (front - back) * (x / wall_length)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use frame_core::envelope::{BuildEnvelope, FallRatio};
//!
//! let envelope = BuildEnvelope {
//!     max_legal_height_mm: 2500.0,
//!     concrete_offset_mm: 50.0,
//!     roof_system_mm: 200.0,
//!     floor_system_mm: 150.0,
//!     fall_ratio: FallRatio { rise: 1.0, run: 40.0 },
//! };
//! assert_eq!(envelope.max_frame_height_mm(), 2100.0);
//! assert_eq!(envelope.fall_mm(4000.0), 100.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Calculated, FrameError, FrameResult};
use crate::wall::{Wall, WallRole};

/// Roof fall expressed as rise over run (e.g., 1:40)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallRatio {
    pub rise: f64,
    pub run: f64,
}

impl Default for FallRatio {
    fn default() -> Self {
        FallRatio {
            rise: 1.0,
            run: 40.0,
        }
    }
}

impl FallRatio {
    /// Height lost over a horizontal span. A non-positive run means no fall.
    pub fn drop_over(&self, span_mm: f64) -> f64 {
        if self.run <= 0.0 {
            return 0.0;
        }
        span_mm * self.rise / self.run
    }
}

/// Legal and physical height budget for the wall frames.
///
/// ## JSON Example
///
/// ```json
/// {
///   "max_legal_height_mm": 2500.0,
///   "concrete_offset_mm": 100.0,
///   "roof_system_mm": 200.0,
///   "floor_system_mm": 150.0,
///   "fall_ratio": { "rise": 1.0, "run": 40.0 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildEnvelope {
    /// Maximum legal height above ground (mm)
    pub max_legal_height_mm: f64,

    /// Concrete foundation offset (mm)
    pub concrete_offset_mm: f64,

    /// Roof system thickness (mm)
    pub roof_system_mm: f64,

    /// Floor system thickness (mm)
    pub floor_system_mm: f64,

    /// Roof fall for drainage
    #[serde(default)]
    pub fall_ratio: FallRatio,
}

impl Default for BuildEnvelope {
    fn default() -> Self {
        BuildEnvelope {
            max_legal_height_mm: 2500.0,
            concrete_offset_mm: 100.0,
            roof_system_mm: 200.0,
            floor_system_mm: 150.0,
            fall_ratio: FallRatio::default(),
        }
    }
}

impl BuildEnvelope {
    /// Raw maximum wall-frame height; may be zero or negative for a bad envelope
    pub fn max_frame_height_mm(&self) -> f64 {
        self.max_legal_height_mm
            - self.concrete_offset_mm
            - self.roof_system_mm
            - self.floor_system_mm
    }

    /// Height lost across a span at this envelope's fall ratio
    pub fn fall_mm(&self, span_mm: f64) -> f64 {
        self.fall_ratio.drop_over(span_mm)
    }

    /// Validate the envelope and return the usable frame height.
    pub fn validate(&self) -> FrameResult<f64> {
        for (field, value) in [
            ("max_legal_height_mm", self.max_legal_height_mm),
            ("concrete_offset_mm", self.concrete_offset_mm),
            ("roof_system_mm", self.roof_system_mm),
            ("floor_system_mm", self.floor_system_mm),
            ("fall_ratio.rise", self.fall_ratio.rise),
            ("fall_ratio.run", self.fall_ratio.run),
        ] {
            if value < 0.0 {
                return Err(FrameError::invalid_input(
                    field,
                    value.to_string(),
                    "Cannot be negative",
                ));
            }
        }

        let max_frame_height_mm = self.max_frame_height_mm();
        if max_frame_height_mm <= 0.0 {
            return Err(FrameError::InvalidEnvelope {
                max_frame_height_mm,
            });
        }
        Ok(max_frame_height_mm)
    }
}

/// Linear height between the front (`position = 0`) and back (`position = length`)
/// of a sloped wall. Positions outside the wall are clamped to its ends.
pub fn interpolated_height(
    front_mm: f64,
    back_mm: f64,
    position_mm: f64,
    wall_length_mm: f64,
) -> f64 {
    if wall_length_mm <= 0.0 {
        return front_mm;
    }
    let ratio = (position_mm / wall_length_mm).clamp(0.0, 1.0);
    front_mm - (front_mm - back_mm) * ratio
}

/// Heights assigned to one wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallHeights {
    /// Height at the start of the wall (the front end for side walls)
    pub height_mm: f64,

    /// Height at the far end, for sloped walls
    pub end_height_mm: Option<f64>,
}

/// End of the room that carries the full frame height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighSide {
    Front,
    Back,
}

impl HighSide {
    /// High side implied by the master wall's role, if it has one
    pub fn from_role(role: WallRole) -> Option<Self> {
        match role {
            WallRole::Front => Some(HighSide::Front),
            WallRole::Back => Some(HighSide::Back),
            _ => None,
        }
    }
}

/// Height of a single wall given the high side of the room and the fall span.
///
/// The wall on the high side gets the full frame height and the opposite
/// wall falls by `span * rise / run`. Side walls slope between the two
/// (`height_mm` at the front end, `end_height_mm` at the back). Base frames
/// keep their authored depth.
pub fn wall_height(
    wall: &Wall,
    envelope: &BuildEnvelope,
    high_side: HighSide,
    span_mm: f64,
) -> FrameResult<WallHeights> {
    if wall.role == WallRole::BaseFrame {
        return Ok(WallHeights {
            height_mm: wall.height_mm,
            end_height_mm: None,
        });
    }

    let master = envelope.validate()?;
    let low = master - envelope.fall_mm(span_mm);
    let (front, back) = match high_side {
        HighSide::Front => (master, low),
        HighSide::Back => (low, master),
    };

    let heights = match wall.role {
        WallRole::Back => WallHeights {
            height_mm: back,
            end_height_mm: None,
        },
        WallRole::Left | WallRole::Right => WallHeights {
            height_mm: front,
            end_height_mm: Some(back),
        },
        _ => WallHeights {
            height_mm: front,
            end_height_mm: None,
        },
    };
    Ok(heights)
}

/// Stud height on a sloped wall at a stud's position
pub fn stud_height(front_mm: f64, back_mm: f64, position_mm: f64, wall_length_mm: f64) -> f64 {
    interpolated_height(front_mm, back_mm, position_mm, wall_length_mm)
}

/// Check a wall's height against the envelope.
pub fn validate_wall_height(envelope: &BuildEnvelope, wall: &Wall) -> FrameResult<()> {
    let max = envelope.validate()?;
    if wall.height_mm <= 0.0 || wall.height_mm > max {
        return Err(FrameError::invalid_wall(
            &wall.id,
            "height_mm",
            wall.height_mm.to_string(),
            format!("Wall height must be positive and no more than {max} mm"),
        ));
    }
    Ok(())
}

/// Assign heights to every wall.
///
/// The master wall is the one flagged `is_master_height` (falling back to
/// the first front wall); its role picks the high side and its length is
/// the fall span. An invalid envelope is flagged and the walls come back
/// with their heights untouched.
pub fn compute_wall_heights(envelope: &BuildEnvelope, walls: &[Wall]) -> Calculated<Vec<Wall>> {
    let mut issues = Vec::new();

    if let Err(e) = envelope.validate() {
        warn!(error = %e, "build envelope rejected");
        issues.push(e);
        return Calculated::with_issues(walls.to_vec(), issues);
    }

    let master = walls
        .iter()
        .find(|w| w.is_master_height && w.role != WallRole::BaseFrame)
        .or_else(|| walls.iter().find(|w| w.role == WallRole::Front));

    let (high_side, span) = match master {
        Some(w) => match HighSide::from_role(w.role) {
            Some(side) => (side, w.length_mm),
            None => {
                issues.push(FrameError::invalid_input(
                    "is_master_height",
                    w.id.clone(),
                    "Only a front or back wall can set the master height; the front is used",
                ));
                (HighSide::Front, w.length_mm)
            }
        },
        None => {
            if walls.iter().any(|w| w.role != WallRole::BaseFrame) {
                issues.push(FrameError::invalid_input(
                    "walls",
                    "no master-height wall",
                    "No wall is flagged as master height; back and side walls get no fall",
                ));
            }
            (HighSide::Front, 0.0)
        }
    };
    debug!(?high_side, span_mm = span, "fall direction");

    let mut out = Vec::with_capacity(walls.len());
    for wall in walls {
        let mut wall = wall.clone();
        match wall_height(&wall, envelope, high_side, span) {
            Ok(h) => {
                wall.height_mm = h.height_mm;
                wall.end_height_mm = h.end_height_mm;
                debug!(
                    wall = %wall.id,
                    height_mm = h.height_mm,
                    end_height_mm = ?h.end_height_mm,
                    "wall height"
                );
            }
            Err(e) => issues.push(e),
        }
        out.push(wall);
    }

    Calculated::with_issues(out, issues)
}
