//! # Stud Layout
//!
//! Computes where studs go along a wall. All positions are left-edge
//! offsets in millimetres from the start of the wall.
//!
//! ## Algorithm
//!
//! 1. **Decorative studs** sit `stud_width + offset` in from each end, each
//!    kept only if it stays in its own half of the wall and the wall's
//!    decorative side allows it.
//! 2. **Standard studs** always include the start stud (0) and the end stud
//!    (`length - stud_width`). Between them, studs walk at an on-center
//!    spacing of `stud_gap + stud_width` through the span bounded by the
//!    decorative studs (or the wall ends). When less than a full spacing is
//!    left before the end of the span, one irregular stud may be added.
//! 3. **Clash resolution** drops any standard stud within the clash
//!    threshold of a decorative stud. The start and end studs are never
//!    dropped.
//! 4. **Door openings** split the wall into sub-walls that run this same
//!    algorithm and are offset back into the wall's coordinates.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::layout::generate_stud_layout;
//! use frame_core::wall::{Wall, WallRole};
//!
//! let wall = Wall::new("back", "Back", WallRole::Back, 3000.0).with_stud_gap(400.0);
//! let layout = generate_stud_layout(&wall).unwrap();
//! assert_eq!(
//!     layout.resolved_stud_positions_mm,
//!     vec![0.0, 445.0, 890.0, 1335.0, 1780.0, 2225.0, 2670.0, 2955.0]
//! );
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::FrameResult;
use crate::wall::{DecorativeSide, SectionKind, Span, Wall};

/// Standard studs closer than this to a decorative stud are dropped (mm)
pub const CLASH_THRESHOLD_MM: f64 = 50.0;

/// Narrowest left/right sub-wall allowed beside a door opening (mm)
pub const MIN_DOOR_SUB_WALL_MM: f64 = 300.0;

const EPS: f64 = 1e-6;

/// Tunables for layout generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub clash_threshold_mm: f64,
    pub min_door_sub_wall_mm: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            clash_threshold_mm: CLASH_THRESHOLD_MM,
            min_door_sub_wall_mm: MIN_DOOR_SUB_WALL_MM,
        }
    }
}

/// One sub-section of a door-opening wall, in wall coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSection {
    pub kind: SectionKind,
    pub span: Span,

    /// Resolved stud positions inside this section (empty for pillars and
    /// the door space)
    pub resolved_stud_positions_mm: Vec<f64>,
}

/// Stud positions for one wall.
///
/// Transient: always recomputed from the wall, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudLayout {
    /// Structural studs before clash resolution
    pub standard_stud_positions_mm: Vec<f64>,

    /// Decorative studs
    pub decorative_stud_positions_mm: Vec<f64>,

    /// Final positions: sorted, de-duplicated, clashes removed
    pub resolved_stud_positions_mm: Vec<f64>,

    /// Clash threshold used (mm)
    pub clash_threshold_mm: f64,

    /// Door-opening sub-sections; empty for plain walls
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<WallSection>,
}

impl StudLayout {
    pub fn has_door_opening(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&WallSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn stud_count(&self) -> usize {
        self.resolved_stud_positions_mm.len()
    }

    fn offset_by(mut self, offset_mm: f64) -> Self {
        for list in [
            &mut self.standard_stud_positions_mm,
            &mut self.decorative_stud_positions_mm,
            &mut self.resolved_stud_positions_mm,
        ] {
            for p in list.iter_mut() {
                *p += offset_mm;
            }
        }
        self
    }
}

/// Generate the stud layout for a wall with default options.
pub fn generate_stud_layout(wall: &Wall) -> FrameResult<StudLayout> {
    generate_stud_layout_with(wall, &LayoutOptions::default())
}

/// Generate the stud layout for a wall.
///
/// # Returns
///
/// * `Ok(StudLayout)` - The layout
/// * `Err(FrameError)` - Invalid wall geometry or a door opening that does
///   not fit
pub fn generate_stud_layout_with(wall: &Wall, options: &LayoutOptions) -> FrameResult<StudLayout> {
    wall.validate()?;

    let layout = match &wall.door_opening {
        Some(door) => {
            let sections = door.sections(&wall.id, wall.length_mm, options.min_door_sub_wall_mm)?;

            let left = sub_wall(wall, sections.left_wall, DecorativeSide::Left);
            let right = sub_wall(wall, sections.right_wall, DecorativeSide::Right);
            let left_layout =
                generate_stud_layout_with(&left, options)?.offset_by(sections.left_wall.start_mm);
            let right_layout =
                generate_stud_layout_with(&right, options)?.offset_by(sections.right_wall.start_mm);

            let sections = SectionKind::ALL
                .iter()
                .map(|&kind| WallSection {
                    kind,
                    span: sections.span(kind),
                    resolved_stud_positions_mm: match kind {
                        SectionKind::LeftWall => left_layout.resolved_stud_positions_mm.clone(),
                        SectionKind::RightWall => right_layout.resolved_stud_positions_mm.clone(),
                        _ => Vec::new(),
                    },
                })
                .collect();

            StudLayout {
                standard_stud_positions_mm: concat(
                    &left_layout.standard_stud_positions_mm,
                    &right_layout.standard_stud_positions_mm,
                ),
                decorative_stud_positions_mm: concat(
                    &left_layout.decorative_stud_positions_mm,
                    &right_layout.decorative_stud_positions_mm,
                ),
                resolved_stud_positions_mm: concat(
                    &left_layout.resolved_stud_positions_mm,
                    &right_layout.resolved_stud_positions_mm,
                ),
                clash_threshold_mm: options.clash_threshold_mm,
                sections,
            }
        }
        None => layout_plain(wall, options.clash_threshold_mm),
    };

    debug!(
        wall = %wall.id,
        studs = layout.stud_count(),
        decorative = layout.decorative_stud_positions_mm.len(),
        door = layout.has_door_opening(),
        "stud layout"
    );
    Ok(layout)
}

/// A door-opening sub-wall: same framing options, its own length, and
/// decorative studs only on its outer edge.
fn sub_wall(parent: &Wall, span: Span, outer_edge: DecorativeSide) -> Wall {
    let mut wall = parent.clone();
    let edge = if outer_edge == DecorativeSide::Left {
        "left"
    } else {
        "right"
    };
    wall.id = format!("{}/{}", parent.id, edge);
    wall.length_mm = span.width_mm;
    wall.decorative_side = parent.decorative_side.restrict_to(outer_edge);
    wall.door_opening = None;
    wall.members.clear();
    wall
}

fn layout_plain(wall: &Wall, clash_threshold_mm: f64) -> StudLayout {
    let decorative = decorative_positions(
        wall.length_mm,
        wall.stud_width_mm,
        wall.decorative_offset_mm,
        wall.decorative_side,
    );
    let standard = standard_positions(wall, &decorative, clash_threshold_mm);
    let forced = [0.0, wall.length_mm - wall.stud_width_mm];
    let resolved = resolve_clashes(&standard, &decorative, clash_threshold_mm, &forced);

    StudLayout {
        standard_stud_positions_mm: standard,
        decorative_stud_positions_mm: decorative,
        resolved_stud_positions_mm: resolved,
        clash_threshold_mm,
        sections: Vec::new(),
    }
}

/// Decorative stud positions (left edge), left first.
pub fn decorative_positions(
    length_mm: f64,
    stud_width_mm: f64,
    offset_mm: f64,
    side: DecorativeSide,
) -> Vec<f64> {
    let mut positions = Vec::new();
    if offset_mm <= 0.0 || side == DecorativeSide::None {
        return positions;
    }

    let half = length_mm / 2.0;
    let left = stud_width_mm + offset_mm;
    let right = length_mm - stud_width_mm - offset_mm - stud_width_mm;

    if side.allows_left() && left < half {
        positions.push(left);
    }
    if side.allows_right() && right > half {
        positions.push(right);
    }
    positions
}

/// Standard stud positions, sorted and de-duplicated.
///
/// Always contains 0 and `length - stud_width`.
pub fn standard_positions(wall: &Wall, decorative: &[f64], clash_threshold_mm: f64) -> Vec<f64> {
    let end_stud = wall.length_mm - wall.stud_width_mm;
    let half = wall.length_mm / 2.0;

    let span_start = decorative.iter().copied().find(|&p| p < half).unwrap_or(0.0);
    let span_end = decorative.iter().copied().find(|&p| p > half).unwrap_or(end_stud);

    let mut positions = vec![0.0];
    walk_span(
        span_start,
        span_end,
        wall.stud_gap_mm + wall.stud_width_mm,
        wall.stud_width_mm,
        wall.include_irregular_last_stud,
        clash_threshold_mm,
        &mut positions,
    );
    positions.push(end_stud);

    sort_dedup(&mut positions);
    positions
}

/// Walk from the stud at `start` toward the stud at `end`, pushing every
/// intermediate stud. Neither bound is pushed.
fn walk_span(
    start: f64,
    end: f64,
    spacing: f64,
    stud_width: f64,
    include_irregular: bool,
    clash_threshold_mm: f64,
    out: &mut Vec<f64>,
) {
    let mut step = 1u32;
    loop {
        let pos = start + spacing * f64::from(step);
        if pos + stud_width > end + EPS {
            break;
        }
        let remaining = end - pos;
        if remaining + EPS >= spacing {
            out.push(pos);
            step += 1;
            continue;
        }
        // Short of a full spacing before the end stud
        if include_irregular && remaining > clash_threshold_mm {
            out.push(pos);
        }
        break;
    }
}

/// Merge standard and decorative positions.
///
/// A standard stud within `threshold` of a decorative stud is dropped in
/// favour of the decorative one, unless it is listed in `forced`.
pub fn resolve_clashes(
    standard: &[f64],
    decorative: &[f64],
    threshold_mm: f64,
    forced: &[f64],
) -> Vec<f64> {
    let mut resolved: Vec<f64> = decorative.to_vec();

    for &pos in standard {
        let is_forced = forced.iter().any(|&f| (f - pos).abs() < EPS);
        let clashes = decorative.iter().any(|&d| (d - pos).abs() <= threshold_mm);
        if is_forced || !clashes {
            resolved.push(pos);
        }
    }

    sort_dedup(&mut resolved);
    resolved
}

fn sort_dedup(positions: &mut Vec<f64>) {
    positions.sort_by(f64::total_cmp);
    positions.dedup_by(|a, b| (*a - *b).abs() < EPS);
}

fn concat(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    sort_dedup(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall::{DoorOpening, WallRole};

    fn wall_3000() -> Wall {
        Wall::new("back", "Back", WallRole::Back, 3000.0).with_stud_gap(400.0)
    }

    #[test]
    fn test_plain_wall_with_irregular_stud() {
        let layout = generate_stud_layout(&wall_3000()).unwrap();
        assert_eq!(
            layout.standard_stud_positions_mm,
            vec![0.0, 445.0, 890.0, 1335.0, 1780.0, 2225.0, 2670.0, 2955.0]
        );
        assert!(layout.decorative_stud_positions_mm.is_empty());
        assert_eq!(layout.resolved_stud_positions_mm, layout.standard_stud_positions_mm);
        assert_eq!(layout.clash_threshold_mm, 50.0);
    }

    #[test]
    fn test_plain_wall_without_irregular_stud() {
        let wall = wall_3000().with_irregular_last_stud(false);
        let layout = generate_stud_layout(&wall).unwrap();
        assert_eq!(
            layout.resolved_stud_positions_mm,
            vec![0.0, 445.0, 890.0, 1335.0, 1780.0, 2225.0, 2955.0]
        );
    }

    #[test]
    fn test_exact_fit_has_no_irregular_stud() {
        // 0, 445, 890 and the end stud at 1335
        let wall = Wall::new("w", "W", WallRole::Back, 1380.0).with_stud_gap(400.0);
        let layout = generate_stud_layout(&wall).unwrap();
        assert_eq!(layout.resolved_stud_positions_mm, vec![0.0, 445.0, 890.0, 1335.0]);
    }

    #[test]
    fn test_irregular_stud_skipped_when_crowding_end() {
        // After 445 the next step lands at 890, only 48 mm before the end stud at 938
        let wall = Wall::new("w", "W", WallRole::Back, 983.0).with_stud_gap(400.0);
        let layout = generate_stud_layout(&wall).unwrap();
        assert_eq!(layout.resolved_stud_positions_mm, vec![0.0, 445.0, 938.0]);

        // An irregular stud that would overlap the end stud is never placed
        let wall = Wall::new("w", "W", WallRole::Back, 965.0).with_stud_gap(400.0);
        let layout = generate_stud_layout(&wall).unwrap();
        assert_eq!(layout.resolved_stud_positions_mm, vec![0.0, 445.0, 920.0]);
    }

    #[test]
    fn test_decorative_positions() {
        let d = decorative_positions(3000.0, 45.0, 200.0, DecorativeSide::Both);
        assert_eq!(d, vec![245.0, 2710.0]);

        let left_only = decorative_positions(3000.0, 45.0, 200.0, DecorativeSide::Left);
        assert_eq!(left_only, vec![245.0]);

        let none = decorative_positions(3000.0, 45.0, 0.0, DecorativeSide::Both);
        assert!(none.is_empty());
    }

    #[test]
    fn test_decorative_outside_half_dropped() {
        // left decorative would be at 1545, past the middle of a 3000 wall
        let d = decorative_positions(3000.0, 45.0, 1500.0, DecorativeSide::Both);
        assert!(d.is_empty());
    }

    #[test]
    fn test_decorative_layout() {
        let wall = wall_3000().with_decorative(200.0, DecorativeSide::Both);
        let layout = generate_stud_layout(&wall).unwrap();

        assert_eq!(layout.decorative_stud_positions_mm, vec![245.0, 2710.0]);
        // Walk from 245 toward 2710 at 445 spacing
        assert_eq!(
            layout.standard_stud_positions_mm,
            vec![0.0, 690.0, 1135.0, 1580.0, 2025.0, 2470.0, 2955.0]
        );
        assert_eq!(
            layout.resolved_stud_positions_mm,
            vec![0.0, 245.0, 690.0, 1135.0, 1580.0, 2025.0, 2470.0, 2710.0, 2955.0]
        );
    }

    #[test]
    fn test_clash_resolution_prefers_decorative() {
        let resolved =
            resolve_clashes(&[0.0, 440.0, 900.0, 1955.0], &[460.0], 50.0, &[0.0, 1955.0]);
        assert_eq!(resolved, vec![0.0, 460.0, 900.0, 1955.0]);
    }

    #[test]
    fn test_forced_studs_survive_clash() {
        let resolved = resolve_clashes(&[0.0, 2955.0], &[48.0], 50.0, &[0.0, 2955.0]);
        assert_eq!(resolved, vec![0.0, 48.0, 2955.0]);
    }

    #[test]
    fn test_invalid_wall_rejected() {
        let wall = Wall::new("w", "W", WallRole::Back, 3000.0).with_stud_gap(-1.0);
        assert!(generate_stud_layout(&wall).is_err());
    }

    #[test]
    fn test_idempotent() {
        let wall = wall_3000().with_decorative(150.0, DecorativeSide::Right);
        assert_eq!(generate_stud_layout(&wall).unwrap(), generate_stud_layout(&wall).unwrap());
    }

    #[test]
    fn test_door_opening_layout() {
        let wall = Wall::new("front", "Front", WallRole::Front, 3600.0)
            .with_stud_gap(400.0)
            .with_decorative(100.0, DecorativeSide::Both)
            .with_door_opening(DoorOpening::default());
        let layout = generate_stud_layout(&wall).unwrap();

        assert_eq!(layout.sections.len(), 5);
        let left = layout.section(SectionKind::LeftWall).unwrap();
        let right = layout.section(SectionKind::RightWall).unwrap();

        // Left sub-wall is 800 long: decorative only on its outer (left) edge
        assert_eq!(left.resolved_stud_positions_mm, vec![0.0, 145.0, 590.0, 755.0]);
        // Right sub-wall starts at 2600 and is 1000 long: decorative at 2600 + 810
        assert_eq!(
            right.resolved_stud_positions_mm,
            vec![2600.0, 3045.0, 3410.0, 3555.0]
        );
        assert_eq!(layout.decorative_stud_positions_mm, vec![145.0, 3410.0]);

        for kind in [SectionKind::DoorSpace, SectionKind::LeftPillar] {
            let section = layout.section(kind).unwrap();
            assert!(section.resolved_stud_positions_mm.is_empty());
        }
        assert_eq!(layout.resolved_stud_positions_mm.first(), Some(&0.0));
        assert_eq!(layout.resolved_stud_positions_mm.last(), Some(&3555.0));
    }

    #[test]
    fn test_door_opening_too_wide() {
        let wall = Wall::new("front", "Front", WallRole::Front, 2800.0)
            .with_door_opening(DoorOpening::default());
        let err = generate_stud_layout(&wall).unwrap_err();
        assert_eq!(err.error_code(), "DOOR_OPENING_TOO_WIDE");
    }
}
