//! # Walls
//!
//! A [`Wall`] is the per-wall configuration the host edits: length, stud
//! spacing, decorative studs, an optional door opening and the sheet and
//! insulation selections. Heights of front/back/side walls are derived from
//! the build envelope (see [`crate::envelope`]) and the member list is
//! rebuilt from scratch whenever the wall changes.
//!
//! ## Door Openings
//!
//! A wall with a door opening is split into five sub-sections:
//!
//! ```text
//! | left wall | left pillar | door space | right pillar | right wall |
//! ```
//!
//! The right wall takes whatever length is left over, so it is the section
//! that runs short when the other widths are too large.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::envelope::interpolated_height;
use crate::errors::{FrameError, FrameResult};
use crate::member::Member;

/// Default stud face width (mm)
pub const DEFAULT_STUD_WIDTH_MM: f64 = 45.0;

/// Default combined top + bottom plate allowance (mm)
pub const DEFAULT_WALL_THICKNESS_MM: f64 = 90.0;

/// Which wall of the room this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WallRole {
    /// Tallest wall; usually the master-height wall
    #[default]
    Front,
    /// Falls away from the front by the roof fall
    Back,
    /// Side wall sloping from front height to back height
    Left,
    /// Side wall sloping from front height to back height
    Right,
    /// Perimeter base frame; its height is the authored frame depth
    BaseFrame,
}

impl WallRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            WallRole::Front => "Front",
            WallRole::Back => "Back",
            WallRole::Left => "Left",
            WallRole::Right => "Right",
            WallRole::BaseFrame => "Base frame",
        }
    }
}

/// Which ends of a wall get a decorative stud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecorativeSide {
    #[default]
    Both,
    Left,
    Right,
    None,
}

impl DecorativeSide {
    pub fn allows_left(&self) -> bool {
        matches!(self, DecorativeSide::Both | DecorativeSide::Left)
    }

    pub fn allows_right(&self) -> bool {
        matches!(self, DecorativeSide::Both | DecorativeSide::Right)
    }

    /// Keep only the given outer edge, if this side allows it
    pub fn restrict_to(&self, edge: DecorativeSide) -> DecorativeSide {
        match edge {
            DecorativeSide::Left if self.allows_left() => DecorativeSide::Left,
            DecorativeSide::Right if self.allows_right() => DecorativeSide::Right,
            _ => DecorativeSide::None,
        }
    }
}

/// The five sub-sections of a door-opening wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    LeftWall,
    LeftPillar,
    DoorSpace,
    RightPillar,
    RightWall,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::LeftWall,
        SectionKind::LeftPillar,
        SectionKind::DoorSpace,
        SectionKind::RightPillar,
        SectionKind::RightWall,
    ];

    /// Metadata tag written on members of this section
    pub fn tag(&self) -> &'static str {
        match self {
            SectionKind::LeftWall => "left-wall",
            SectionKind::LeftPillar => "left-pillar",
            SectionKind::DoorSpace => "door-space",
            SectionKind::RightPillar => "right-pillar",
            SectionKind::RightWall => "right-wall",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A span along the wall axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start_mm: f64,
    pub width_mm: f64,
}

impl Span {
    pub fn end_mm(&self) -> f64 {
        self.start_mm + self.width_mm
    }

    /// The span of `width_mm` starting where this one ends
    fn next(&self, width_mm: f64) -> Span {
        Span {
            start_mm: self.end_mm(),
            width_mm,
        }
    }
}

/// Door-opening parameters.
///
/// ## JSON Example
///
/// ```json
/// {
///   "pillar_width_mm": 400.0,
///   "left_wall_width_mm": 800.0,
///   "door_space_width_mm": 1000.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorOpening {
    /// Width of each pillar (left and right are equal)
    pub pillar_width_mm: f64,

    /// Width of the full-height section left of the opening
    pub left_wall_width_mm: f64,

    /// Clear width of the door space
    pub door_space_width_mm: f64,
}

impl Default for DoorOpening {
    fn default() -> Self {
        DoorOpening {
            pillar_width_mm: 400.0,
            left_wall_width_mm: 800.0,
            door_space_width_mm: 1000.0,
        }
    }
}

impl DoorOpening {
    /// Width left over for the right wall section
    pub fn right_wall_width_mm(&self, wall_length_mm: f64) -> f64 {
        wall_length_mm
            - self.left_wall_width_mm
            - 2.0 * self.pillar_width_mm
            - self.door_space_width_mm
    }

    /// Lay the five sub-sections out along a wall.
    ///
    /// Both wall sub-sections must be at least `min_sub_wall_mm` wide; the
    /// error carries the shortfall.
    pub fn sections(
        &self,
        wall_id: &str,
        wall_length_mm: f64,
        min_sub_wall_mm: f64,
    ) -> FrameResult<DoorSections> {
        for (field, value) in [
            ("pillar_width_mm", self.pillar_width_mm),
            ("door_space_width_mm", self.door_space_width_mm),
        ] {
            if value <= 0.0 {
                return Err(FrameError::invalid_wall(
                    wall_id,
                    field,
                    value.to_string(),
                    "Must be positive",
                ));
            }
        }

        let right_wall_width = self.right_wall_width_mm(wall_length_mm);
        for (kind, width) in [
            (SectionKind::LeftWall, self.left_wall_width_mm),
            (SectionKind::RightWall, right_wall_width),
        ] {
            if width < min_sub_wall_mm {
                return Err(FrameError::DoorOpeningTooWide {
                    wall_id: wall_id.to_string(),
                    section: kind.tag().to_string(),
                    width_mm: width,
                    minimum_mm: min_sub_wall_mm,
                    shortfall_mm: min_sub_wall_mm - width,
                });
            }
        }

        let left_wall = Span {
            start_mm: 0.0,
            width_mm: self.left_wall_width_mm,
        };
        let left_pillar = left_wall.next(self.pillar_width_mm);
        let door_space = left_pillar.next(self.door_space_width_mm);
        let right_pillar = door_space.next(self.pillar_width_mm);
        let right_wall = right_pillar.next(right_wall_width);

        Ok(DoorSections {
            left_wall,
            left_pillar,
            door_space,
            right_pillar,
            right_wall,
        })
    }
}

/// Resolved sub-section spans of a door-opening wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorSections {
    pub left_wall: Span,
    pub left_pillar: Span,
    pub door_space: Span,
    pub right_pillar: Span,
    pub right_wall: Span,
}

impl DoorSections {
    pub fn span(&self, kind: SectionKind) -> Span {
        match kind {
            SectionKind::LeftWall => self.left_wall,
            SectionKind::LeftPillar => self.left_pillar,
            SectionKind::DoorSpace => self.door_space,
            SectionKind::RightPillar => self.right_pillar,
            SectionKind::RightWall => self.right_wall,
        }
    }
}

fn default_stud_width() -> f64 {
    DEFAULT_STUD_WIDTH_MM
}

fn default_wall_thickness() -> f64 {
    DEFAULT_WALL_THICKNESS_MM
}

fn default_true() -> bool {
    true
}

/// A single wall of the room.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "front",
///   "name": "Front",
///   "role": "Front",
///   "is_master_height": true,
///   "length_mm": 3000.0,
///   "height_mm": 0.0,
///   "stud_gap_mm": 400.0,
///   "stud_width_mm": 45.0,
///   "wall_thickness_mm": 90.0,
///   "decorative_offset_mm": 0.0,
///   "decorative_side": "both",
///   "has_noggins": true,
///   "include_irregular_last_stud": true,
///   "sheet_material_id": "osb3-18",
///   "insulation_id": "pir-100"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Unique identifier (e.g., "front")
    pub id: String,

    /// Display name (e.g., "Front")
    pub name: String,

    /// Which wall of the room this is
    #[serde(default)]
    pub role: WallRole,

    /// Whether this wall defines the master height
    #[serde(default)]
    pub is_master_height: bool,

    /// Wall length along its axis (mm)
    pub length_mm: f64,

    /// Frame height (mm). Derived for front/back/side walls; authored
    /// frame depth for base frames.
    #[serde(default)]
    pub height_mm: f64,

    /// Height at the far end for sloped side walls (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_height_mm: Option<f64>,

    /// Edge-to-edge clearance between studs (mm)
    pub stud_gap_mm: f64,

    /// Stud face width along the wall axis (mm)
    #[serde(default = "default_stud_width")]
    pub stud_width_mm: f64,

    /// Combined top + bottom plate allowance (mm)
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness_mm: f64,

    /// Offset of decorative studs from each end stud (mm)
    #[serde(default)]
    pub decorative_offset_mm: f64,

    /// Which ends get decorative studs
    #[serde(default)]
    pub decorative_side: DecorativeSide,

    /// Door opening, if the wall has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_opening: Option<DoorOpening>,

    /// Whether to add a mid-height noggin row
    #[serde(default)]
    pub has_noggins: bool,

    /// Whether to add a short-spaced stud before the final stud
    #[serde(default = "default_true")]
    pub include_irregular_last_stud: bool,

    /// Timber section for this wall's members (catalogue key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timber_section_id: Option<String>,

    /// Selected sheet material (catalogue id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_material_id: Option<String>,

    /// Selected insulation board (catalogue id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insulation_id: Option<String>,

    /// Generated members; rebuilt on every change
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Wall {
    /// Create a wall with default framing options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use frame_core::wall::{Wall, WallRole};
    ///
    /// let wall = Wall::new("front", "Front", WallRole::Front, 3000.0).with_stud_gap(400.0);
    /// assert_eq!(wall.stud_width_mm, 45.0);
    /// assert!(wall.validate().is_ok());
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: WallRole,
        length_mm: f64,
    ) -> Self {
        Wall {
            id: id.into(),
            name: name.into(),
            role,
            is_master_height: role == WallRole::Front,
            length_mm,
            height_mm: 0.0,
            end_height_mm: None,
            stud_gap_mm: 600.0,
            stud_width_mm: DEFAULT_STUD_WIDTH_MM,
            wall_thickness_mm: DEFAULT_WALL_THICKNESS_MM,
            decorative_offset_mm: 0.0,
            decorative_side: DecorativeSide::Both,
            door_opening: None,
            has_noggins: false,
            include_irregular_last_stud: true,
            timber_section_id: None,
            sheet_material_id: None,
            insulation_id: None,
            members: Vec::new(),
        }
    }

    pub fn with_stud_gap(mut self, stud_gap_mm: f64) -> Self {
        self.stud_gap_mm = stud_gap_mm;
        self
    }

    pub fn with_stud_width(mut self, stud_width_mm: f64) -> Self {
        self.stud_width_mm = stud_width_mm;
        self
    }

    pub fn with_height(mut self, height_mm: f64) -> Self {
        self.height_mm = height_mm;
        self
    }

    pub fn with_decorative(mut self, offset_mm: f64, side: DecorativeSide) -> Self {
        self.decorative_offset_mm = offset_mm;
        self.decorative_side = side;
        self
    }

    pub fn with_door_opening(mut self, door: DoorOpening) -> Self {
        self.door_opening = Some(door);
        self
    }

    pub fn with_noggins(mut self, has_noggins: bool) -> Self {
        self.has_noggins = has_noggins;
        self
    }

    pub fn with_irregular_last_stud(mut self, include: bool) -> Self {
        self.include_irregular_last_stud = include;
        self
    }

    pub fn with_sheet(mut self, sheet_material_id: impl Into<String>) -> Self {
        self.sheet_material_id = Some(sheet_material_id.into());
        self
    }

    pub fn with_insulation(mut self, insulation_id: impl Into<String>) -> Self {
        self.insulation_id = Some(insulation_id.into());
        self
    }

    pub fn with_section(mut self, timber_section_id: impl Into<String>) -> Self {
        self.timber_section_id = Some(timber_section_id.into());
        self
    }

    /// Validate the wall's own geometry.
    pub fn validate(&self) -> FrameResult<()> {
        if self.length_mm <= 0.0 {
            return Err(FrameError::invalid_wall(
                &self.id,
                "length_mm",
                self.length_mm.to_string(),
                "Wall length must be positive",
            ));
        }
        if self.stud_gap_mm <= 0.0 {
            return Err(FrameError::invalid_wall(
                &self.id,
                "stud_gap_mm",
                self.stud_gap_mm.to_string(),
                "Stud gap must be positive",
            ));
        }
        if self.decorative_offset_mm < 0.0 {
            return Err(FrameError::invalid_wall(
                &self.id,
                "decorative_offset_mm",
                self.decorative_offset_mm.to_string(),
                "Decorative offset cannot be negative",
            ));
        }
        if self.stud_width_mm <= 0.0 || self.stud_width_mm > self.length_mm {
            return Err(FrameError::invalid_wall(
                &self.id,
                "stud_width_mm",
                self.stud_width_mm.to_string(),
                format!(
                    "Stud width must be positive and no more than the wall length ({} mm)",
                    self.length_mm
                ),
            ));
        }
        if self.wall_thickness_mm < 0.0 {
            return Err(FrameError::invalid_wall(
                &self.id,
                "wall_thickness_mm",
                self.wall_thickness_mm.to_string(),
                "Plate allowance cannot be negative",
            ));
        }
        Ok(())
    }

    /// Frame height at a position along the wall.
    ///
    /// Sloped side walls interpolate linearly from `height_mm` at the front
    /// end to `end_height_mm` at the back end.
    pub fn height_at(&self, position_mm: f64) -> f64 {
        match self.end_height_mm {
            Some(end) if self.length_mm > 0.0 => {
                interpolated_height(self.height_mm, end, position_mm, self.length_mm)
            }
            _ => self.height_mm,
        }
    }

    /// Stud cut length at a position (frame height less plates)
    pub fn stud_height_at(&self, position_mm: f64) -> f64 {
        self.height_at(position_mm) - self.wall_thickness_mm
    }

    /// Height of a single plate
    pub fn plate_height_mm(&self) -> f64 {
        self.wall_thickness_mm / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_validation() {
        let wall = Wall::new("w", "W", WallRole::Back, 3000.0);
        assert!(wall.validate().is_ok());

        let bad = Wall::new("w", "W", WallRole::Back, 0.0);
        assert_eq!(bad.validate().unwrap_err().error_code(), "INVALID_WALL_GEOMETRY");

        let bad_gap = Wall::new("w", "W", WallRole::Back, 3000.0).with_stud_gap(0.0);
        assert!(bad_gap.validate().is_err());

        let bad_offset = Wall::new("w", "W", WallRole::Back, 3000.0)
            .with_decorative(-1.0, DecorativeSide::Both);
        assert!(bad_offset.validate().is_err());

        let wide_stud = Wall::new("w", "W", WallRole::Back, 3000.0).with_stud_width(3001.0);
        assert!(wide_stud.validate().is_err());
    }

    #[test]
    fn test_door_sections() {
        let door = DoorOpening::default();
        let sections = door.sections("front", 3600.0, 300.0).unwrap();
        assert_eq!(sections.left_wall.width_mm, 800.0);
        assert_eq!(sections.left_pillar.start_mm, 800.0);
        assert_eq!(sections.door_space.start_mm, 1200.0);
        assert_eq!(sections.right_pillar.start_mm, 2200.0);
        assert_eq!(sections.right_wall.start_mm, 2600.0);
        assert_eq!(sections.right_wall.width_mm, 1000.0);
        assert_eq!(sections.right_wall.end_mm(), 3600.0);
    }

    #[test]
    fn test_door_too_wide_reports_shortfall() {
        let door = DoorOpening::default();
        // 2700 - 800 - 800 - 1000 = 100 left for the right wall
        let err = door.sections("front", 2700.0, 300.0).unwrap_err();
        match err {
            FrameError::DoorOpeningTooWide { section, width_mm, shortfall_mm, .. } => {
                assert_eq!(section, "right-wall");
                assert_eq!(width_mm, 100.0);
                assert_eq!(shortfall_mm, 200.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_restrict_decorative_side() {
        assert_eq!(DecorativeSide::Both.restrict_to(DecorativeSide::Left), DecorativeSide::Left);
        assert_eq!(DecorativeSide::Right.restrict_to(DecorativeSide::Left), DecorativeSide::None);
        assert_eq!(DecorativeSide::Right.restrict_to(DecorativeSide::Right), DecorativeSide::Right);
    }

    #[test]
    fn test_sloped_height() {
        let mut wall = Wall::new("left", "Left", WallRole::Left, 4000.0).with_height(2100.0);
        wall.end_height_mm = Some(2000.0);
        assert_eq!(wall.height_at(0.0), 2100.0);
        assert_eq!(wall.height_at(2000.0), 2050.0);
        assert_eq!(wall.height_at(4000.0), 2000.0);
        assert_eq!(wall.stud_height_at(4000.0), 1910.0);
    }

    #[test]
    fn test_wall_json_defaults() {
        let json = r#"{"id":"back","name":"Back","length_mm":3000.0,"stud_gap_mm":400.0}"#;
        let wall: Wall = serde_json::from_str(json).unwrap();
        assert_eq!(wall.stud_width_mm, DEFAULT_STUD_WIDTH_MM);
        assert!(wall.include_irregular_last_stud);
        assert_eq!(wall.decorative_side, DecorativeSide::Both);
        assert!(wall.members.is_empty());
    }
}
