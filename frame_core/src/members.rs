//! # Member Generation
//!
//! Expands a resolved [`StudLayout`] into concrete framing members:
//!
//! - one stud per resolved position, cut to the frame height less plates
//! - a bottom and a top plate spanning the wall (or each door sub-wall)
//! - with noggins enabled, one mid-height noggin per gap between studs,
//!   cut to the clear distance between stud edges
//!
//! Door-opening walls frame their left and right sub-walls independently,
//! add a single full-height member for each pillar, and leave the door
//! space empty. Every member of a door-opening wall is tagged with its
//! sub-section.

use tracing::debug;

use crate::layout::StudLayout;
use crate::materials::DEFAULT_SECTION_ID;
use crate::member::{Member, MemberType};
use crate::wall::{SectionKind, Span, Wall};

/// Generate members using the wall's section or the default section.
pub fn generate_members(wall: &Wall, layout: &StudLayout) -> Vec<Member> {
    generate_members_with(wall, layout, DEFAULT_SECTION_ID)
}

/// Generate members, using `default_section` when the wall names none.
pub fn generate_members_with(
    wall: &Wall,
    layout: &StudLayout,
    default_section: &str,
) -> Vec<Member> {
    let section_name = wall.timber_section_id.as_deref().unwrap_or(default_section);

    let members = if layout.has_door_opening() {
        let mut members = Vec::new();
        for section in &layout.sections {
            match section.kind {
                SectionKind::LeftWall | SectionKind::RightWall => members.extend(frame_span(
                    wall,
                    section.span,
                    &section.resolved_stud_positions_mm,
                    Some(section.kind),
                    section_name,
                )),
                SectionKind::LeftPillar | SectionKind::RightPillar => {
                    members.push(pillar(wall, section.span, section.kind, section_name));
                }
                SectionKind::DoorSpace => {}
            }
        }
        members
    } else {
        let span = Span {
            start_mm: 0.0,
            width_mm: wall.length_mm,
        };
        frame_span(wall, span, &layout.resolved_stud_positions_mm, None, section_name)
    };

    debug!(wall = %wall.id, members = members.len(), "members generated");
    members
}

/// Studs, plates and noggins for one stretch of wall.
fn frame_span(
    wall: &Wall,
    span: Span,
    positions: &[f64],
    section: Option<SectionKind>,
    section_name: &str,
) -> Vec<Member> {
    let prefix = match section {
        Some(kind) => format!("{}-{}", wall.id, kind.tag()),
        None => wall.id.clone(),
    };
    let tag = |m: Member| match section {
        Some(kind) => m.with_tag("section", kind.tag()),
        None => m,
    };

    let mut members = Vec::with_capacity(positions.len() * 2 + 2);

    for (i, &pos) in positions.iter().enumerate() {
        let stud_height = wall.stud_height_at(pos);
        members.push(tag(Member::new(
            format!("{prefix}-stud-{i}"),
            MemberType::Stud,
            pos,
            stud_height,
            stud_height,
            section_name,
        )));
    }

    let plate_height = wall.plate_height_mm();
    for position in ["bottom", "top"] {
        members.push(tag(Member::new(
            format!("{prefix}-plate-{position}"),
            MemberType::Plate,
            span.start_mm,
            span.width_mm,
            plate_height,
            section_name,
        )
        .with_tag("position", position)));
    }

    if wall.has_noggins {
        for (i, pair) in positions.windows(2).enumerate() {
            let (left, right) = (pair[0], pair[1]);
            let clear = right - left - wall.stud_width_mm;
            if clear <= 0.0 {
                continue;
            }
            let start = left + wall.stud_width_mm;
            let elevation = plate_height + wall.stud_height_at(start + clear / 2.0) / 2.0;
            members.push(tag(Member::new(
                format!("{prefix}-noggin-{i}"),
                MemberType::Noggin,
                start,
                clear,
                wall.stud_width_mm,
                section_name,
            )
            .with_tag("between", format!("{left}..{right}"))
            .with_tag("elevation_mm", elevation)));
        }
    }

    members
}

/// A pillar is one full-height member at the start of its section.
fn pillar(wall: &Wall, span: Span, kind: SectionKind, section_name: &str) -> Member {
    let height = wall.stud_height_at(span.start_mm);
    Member::new(
        format!("{}-{}", wall.id, kind.tag()),
        MemberType::Stud,
        span.start_mm,
        height,
        height,
        section_name,
    )
    .with_tag("section", kind.tag())
    .with_tag("width_mm", span.width_mm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_stud_layout;
    use crate::member::MemberCounts;
    use crate::wall::{DoorOpening, WallRole};

    fn wall() -> Wall {
        Wall::new("back", "Back", WallRole::Back, 3000.0)
            .with_stud_gap(400.0)
            .with_height(2100.0)
    }

    #[test]
    fn test_plain_wall_members() {
        let wall = wall();
        let layout = generate_stud_layout(&wall).unwrap();
        let members = generate_members(&wall, &layout);
        let counts = MemberCounts::from_members(&members);

        assert_eq!(counts.studs, 8);
        assert_eq!(counts.plates, 2);
        assert_eq!(counts.noggins, 0);

        let stud = &members[0];
        assert_eq!(stud.id, "back-stud-0");
        assert_eq!(stud.length_mm, 2010.0);
        assert_eq!(stud.height_mm, 2010.0);
        assert_eq!(stud.section_name, DEFAULT_SECTION_ID);

        let plate = members.iter().find(|m| m.member_type == MemberType::Plate).unwrap();
        assert_eq!(plate.length_mm, 3000.0);
        assert_eq!(plate.height_mm, 45.0);
        assert_eq!(plate.tag("position"), Some("bottom"));
    }

    #[test]
    fn test_noggins_fill_clear_gaps() {
        let wall = wall().with_noggins(true);
        let layout = generate_stud_layout(&wall).unwrap();
        let members = generate_members(&wall, &layout);
        let noggins: Vec<_> = members
            .iter()
            .filter(|m| m.member_type == MemberType::Noggin)
            .collect();

        assert_eq!(noggins.len(), 7);
        assert_eq!(noggins[0].position_mm, 45.0);
        assert_eq!(noggins[0].length_mm, 400.0);
        // 2670 -> 2955 leaves a 240 mm clear gap
        assert_eq!(noggins[6].position_mm, 2715.0);
        assert_eq!(noggins[6].length_mm, 240.0);
        // 45 mm plate + half of the 2010 mm stud
        assert_eq!(noggins[0].tag("elevation_mm"), Some("1050"));
    }

    #[test]
    fn test_wall_section_used() {
        let wall = wall().with_section("38x89-c16");
        let layout = generate_stud_layout(&wall).unwrap();
        let members = generate_members(&wall, &layout);
        assert!(members.iter().all(|m| m.section_name == "38x89-c16"));
    }

    #[test]
    fn test_sloped_wall_studs_vary() {
        let mut wall = Wall::new("left", "Left", WallRole::Left, 4000.0)
            .with_stud_gap(600.0)
            .with_height(2100.0);
        wall.end_height_mm = Some(2000.0);
        let layout = generate_stud_layout(&wall).unwrap();
        let members = generate_members(&wall, &layout);
        let studs: Vec<_> = members.iter().filter(|m| m.member_type == MemberType::Stud).collect();

        assert_eq!(studs.first().unwrap().length_mm, 2010.0);
        let last = studs.last().unwrap();
        assert_eq!(last.position_mm, 3955.0);
        assert!(last.length_mm < 1912.0 && last.length_mm > 1911.0);
    }

    #[test]
    fn test_door_opening_members() {
        let wall = Wall::new("front", "Front", WallRole::Front, 3600.0)
            .with_stud_gap(400.0)
            .with_height(2100.0)
            .with_noggins(true)
            .with_door_opening(DoorOpening::default());
        let layout = generate_stud_layout(&wall).unwrap();
        let members = generate_members(&wall, &layout);

        assert!(members.iter().all(|m| m.section().is_some()));
        assert!(members.iter().all(|m| m.section() != Some("door-space")));

        let pillars: Vec<_> = members
            .iter()
            .filter(|m| matches!(m.section(), Some("left-pillar") | Some("right-pillar")))
            .collect();
        assert_eq!(pillars.len(), 2);
        assert_eq!(pillars[0].position_mm, 800.0);
        assert_eq!(pillars[0].length_mm, 2010.0);
        assert_eq!(pillars[1].position_mm, 2200.0);

        let right_plates: Vec<_> = members
            .iter()
            .filter(|m| m.member_type == MemberType::Plate && m.section() == Some("right-wall"))
            .collect();
        assert_eq!(right_plates.len(), 2);
        assert_eq!(right_plates[0].position_mm, 2600.0);
        assert_eq!(right_plates[0].length_mm, 1000.0);

        // No noggin bridges the door opening
        assert!(members
            .iter()
            .filter(|m| m.member_type == MemberType::Noggin)
            .all(|m| m.position_mm + m.length_mm <= 800.0 || m.position_mm >= 2600.0));
    }
}
