//! Property-based invariant tests for stud layout and member generation.
//!
//! Verifies:
//! 1. Resolved positions are sorted and include both end studs
//! 2. No two non-decorative studs sit within the clash threshold
//! 3. Zero decorative offset means no decorative studs and no clash removal
//! 4. Layout generation is idempotent
//! 5. Door-opening walls place no studs in the pillars or door space
//! 6. Plain walls get one stud member per resolved position

use frame_core::layout::{generate_stud_layout, CLASH_THRESHOLD_MM};
use frame_core::members::generate_members;
use frame_core::member::{MemberCounts, MemberType};
use frame_core::wall::{DecorativeSide, DoorOpening, Wall, WallRole};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_side() -> impl Strategy<Value = DecorativeSide> {
    prop_oneof![
        Just(DecorativeSide::Both),
        Just(DecorativeSide::Left),
        Just(DecorativeSide::Right),
        Just(DecorativeSide::None),
    ]
}

fn arb_wall() -> impl Strategy<Value = Wall> {
    (
        1000.0f64..8000.0,
        300.0f64..800.0,
        prop_oneof![Just(0.0), 1.0f64..300.0],
        arb_side(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(length, gap, offset, side, irregular, noggins)| {
            Wall::new("w", "Wall", WallRole::Back, length.round())
                .with_stud_gap(gap.round())
                .with_height(2100.0)
                .with_decorative(offset.round(), side)
                .with_irregular_last_stud(irregular)
                .with_noggins(noggins)
        })
}

fn is_decorative(decorative: &[f64], pos: f64) -> bool {
    decorative.iter().any(|&d| (d - pos).abs() < 1e-6)
}

proptest! {
    #[test]
    fn resolved_sorted_with_end_studs(wall in arb_wall()) {
        let layout = generate_stud_layout(&wall).unwrap();
        let resolved = &layout.resolved_stud_positions_mm;

        prop_assert!(resolved.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(resolved.first().copied(), Some(0.0));
        prop_assert_eq!(resolved.last().copied(), Some(wall.length_mm - wall.stud_width_mm));
    }

    #[test]
    fn no_clash_between_standard_studs(wall in arb_wall()) {
        let layout = generate_stud_layout(&wall).unwrap();
        let decorative = &layout.decorative_stud_positions_mm;
        let plain: Vec<f64> = layout
            .resolved_stud_positions_mm
            .iter()
            .copied()
            .filter(|&p| !is_decorative(decorative, p))
            .collect();

        for pair in plain.windows(2) {
            prop_assert!(
                pair[1] - pair[0] > CLASH_THRESHOLD_MM,
                "studs at {} and {} clash", pair[0], pair[1]
            );
        }
    }

    #[test]
    fn zero_offset_means_standard_only(wall in arb_wall()) {
        let wall = wall.with_decorative(0.0, DecorativeSide::Both);
        let layout = generate_stud_layout(&wall).unwrap();

        prop_assert!(layout.decorative_stud_positions_mm.is_empty());
        prop_assert_eq!(&layout.resolved_stud_positions_mm, &layout.standard_stud_positions_mm);
    }

    #[test]
    fn layout_is_idempotent(wall in arb_wall()) {
        let first = generate_stud_layout(&wall).unwrap();
        let second = generate_stud_layout(&wall).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn door_space_stays_clear(wall in arb_wall(), extra in 0.0f64..4000.0) {
        let door = DoorOpening::default();
        let mut wall = wall.with_door_opening(door);
        // Left 800 + pillars 800 + door 1000 + at least 300 on the right
        wall.length_mm = 2900.0 + extra.round();

        let layout = generate_stud_layout(&wall).unwrap();
        let opening_start = door.left_wall_width_mm;
        let opening_end =
            door.left_wall_width_mm + 2.0 * door.pillar_width_mm + door.door_space_width_mm;

        for &pos in &layout.resolved_stud_positions_mm {
            let left_of_opening = pos + wall.stud_width_mm <= opening_start + 1e-6;
            prop_assert!(left_of_opening || pos >= opening_end - 1e-6);
        }
    }

    #[test]
    fn one_stud_member_per_position(wall in arb_wall()) {
        let layout = generate_stud_layout(&wall).unwrap();
        let members = generate_members(&wall, &layout);
        let counts = MemberCounts::from_members(&members);

        prop_assert_eq!(counts.studs, layout.stud_count());
        prop_assert_eq!(counts.plates, 2);
        if wall.has_noggins {
            prop_assert_eq!(counts.noggins, layout.stud_count() - 1);
        } else {
            prop_assert_eq!(counts.noggins, 0);
        }
        prop_assert!(members
            .iter()
            .filter(|m| m.member_type == MemberType::Noggin)
            .all(|m| m.length_mm > 0.0));
    }
}
