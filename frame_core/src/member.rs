//! # Structural Members
//!
//! A [`Member`] is one piece of timber in a wall frame. Members are owned by
//! their wall and are regenerated whenever the wall changes; nothing edits
//! them in place.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of framing member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    /// Vertical member (pillars are emitted as studs too)
    Stud,
    /// Horizontal member at the top or bottom of a wall
    Plate,
    /// Short horizontal brace between two studs
    Noggin,
}

impl MemberType {
    pub fn display_name(&self) -> &'static str {
        match self {
            MemberType::Stud => "stud",
            MemberType::Plate => "plate",
            MemberType::Noggin => "noggin",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single framing member with absolute position and size.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "front-stud-3",
///   "type": "stud",
///   "position_mm": 1335.0,
///   "length_mm": 2010.0,
///   "height_mm": 2010.0,
///   "section_name": "47x100-c24",
///   "metadata": {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique within its wall (e.g., "front-left-wall-stud-2")
    pub id: String,

    /// Member kind
    #[serde(rename = "type")]
    pub member_type: MemberType,

    /// Left-edge offset along the wall axis (mm)
    pub position_mm: f64,

    /// Cut length (mm)
    pub length_mm: f64,

    /// Vertical extent in the wall elevation (mm)
    pub height_mm: f64,

    /// Timber section catalogue key
    pub section_name: String,

    /// Free-form tags ("section", "position", "elevation_mm", ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        member_type: MemberType,
        position_mm: f64,
        length_mm: f64,
        height_mm: f64,
        section_name: impl Into<String>,
    ) -> Self {
        Member {
            id: id.into(),
            member_type,
            position_mm,
            length_mm,
            height_mm,
            section_name: section_name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add a metadata tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Look up a metadata tag
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Door-opening sub-section this member belongs to, if any
    pub fn section(&self) -> Option<&str> {
        self.tag("section")
    }
}

/// Member counts by type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCounts {
    pub studs: usize,
    pub plates: usize,
    pub noggins: usize,
}

impl MemberCounts {
    pub fn from_members<'a>(members: impl IntoIterator<Item = &'a Member>) -> Self {
        let mut counts = MemberCounts::default();
        for m in members {
            match m.member_type {
                MemberType::Stud => counts.studs += 1,
                MemberType::Plate => counts.plates += 1,
                MemberType::Noggin => counts.noggins += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.studs + self.plates + self.noggins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_type_serialization() {
        let json = serde_json::to_string(&MemberType::Noggin).unwrap();
        assert_eq!(json, "\"noggin\"");
    }

    #[test]
    fn test_member_json_uses_type_key() {
        let m = Member::new("w-stud-0", MemberType::Stud, 0.0, 2010.0, 2010.0, "47x100-c24")
            .with_tag("section", "left-wall");
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"type\":\"stud\""));
        assert_eq!(m.section(), Some("left-wall"));
    }

    #[test]
    fn test_counts() {
        let members = vec![
            Member::new("a", MemberType::Stud, 0.0, 1.0, 1.0, "s"),
            Member::new("b", MemberType::Stud, 0.0, 1.0, 1.0, "s"),
            Member::new("c", MemberType::Plate, 0.0, 1.0, 1.0, "s"),
        ];
        let counts = MemberCounts::from_members(&members);
        assert_eq!(counts.studs, 2);
        assert_eq!(counts.plates, 1);
        assert_eq!(counts.noggins, 0);
        assert_eq!(counts.total(), 3);
    }
}
