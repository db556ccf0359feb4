//! End-to-end tests: project JSON in, buy/cut/hardware lists out.

use approx::assert_relative_eq;
use frame_core::envelope::{compute_wall_heights, BuildEnvelope, FallRatio};
use frame_core::layout::generate_stud_layout;
use frame_core::materials::{MaterialLibrary, TimberLengthOption, DEFAULT_SECTION_ID};
use frame_core::members::generate_members;
use frame_core::optimizer::{aggregate, optimize_cut_plans, CutRequirement};
use frame_core::wall::{DecorativeSide, DoorOpening, Wall, WallRole};
use frame_core::{
    calculate, calculate_hardware, generate_buy_list, FrameError, HardwareRuleSet, ItemType,
    MemberType, Project, Recalculator,
};

fn envelope_2100() -> BuildEnvelope {
    BuildEnvelope {
        max_legal_height_mm: 2500.0,
        concrete_offset_mm: 50.0,
        roof_system_mm: 200.0,
        floor_system_mm: 150.0,
        fall_ratio: FallRatio {
            rise: 1.0,
            run: 40.0,
        },
    }
}

const PROJECT_JSON: &str = r#"{
    "meta": {
        "id": "2b4a8f6e-1c3d-4e5f-8a9b-0c1d2e3f4a5b",
        "version": "0.1.0",
        "name": "Workshop",
        "created": "2026-03-01T09:00:00Z",
        "modified": "2026-03-01T09:00:00Z"
    },
    "envelope": {
        "max_legal_height_mm": 2500,
        "concrete_offset_mm": 50,
        "roof_system_mm": 200,
        "floor_system_mm": 150,
        "fall_ratio": { "rise": 1, "run": 40 }
    },
    "walls": [
        { "id": "front", "name": "Front", "role": "Front", "is_master_height": true,
          "length_mm": 3600, "stud_gap_mm": 400, "decorative_offset_mm": 100,
          "door_opening": { "pillar_width_mm": 400, "left_wall_width_mm": 800,
                            "door_space_width_mm": 1000 },
          "has_noggins": true, "sheet_material_id": "osb3-18", "insulation_id": "pir-100" },
        { "id": "back", "name": "Back", "role": "Back",
          "length_mm": 3600, "stud_gap_mm": 400, "has_noggins": true,
          "sheet_material_id": "osb3-18", "insulation_id": "pir-100" },
        { "id": "left", "name": "Left", "role": "Left",
          "length_mm": 3000, "stud_gap_mm": 400, "sheet_material_id": "osb3-18" },
        { "id": "right", "name": "Right", "role": "Right",
          "length_mm": 3000, "stud_gap_mm": 400, "sheet_material_id": "osb3-18" }
    ]
}"#;

#[test]
fn master_wall_gets_full_frame_height() {
    let walls = vec![
        Wall::new("front", "Front", WallRole::Front, 3000.0),
        Wall::new("back", "Back", WallRole::Back, 3000.0),
    ];
    let result = compute_wall_heights(&envelope_2100(), &walls);
    assert!(result.is_clean());
    assert_relative_eq!(result.value[0].height_mm, 2100.0);
    assert_relative_eq!(result.value[1].height_mm, 2025.0);
}

#[test]
fn host_functions_chain_together() {
    let mut wall = Wall::new("back", "Back", WallRole::Back, 3000.0)
        .with_stud_gap(400.0)
        .with_height(2100.0)
        .with_sheet("osb3-18");
    let layout = generate_stud_layout(&wall).unwrap();
    wall.members = generate_members(&wall, &layout);

    let reqs = aggregate(&wall.members);
    assert_eq!(
        reqs,
        vec![
            CutRequirement::new(MemberType::Plate, DEFAULT_SECTION_ID, 3000.0, 2),
            CutRequirement::new(MemberType::Stud, DEFAULT_SECTION_ID, 2010.0, 8),
        ]
    );

    let plans = optimize_cut_plans(&reqs, MaterialLibrary::standard());
    assert!(plans.is_clean());
    let plans = plans.value;
    assert_eq!(plans.iter().filter(|p| p.stock_length_mm == 3000.0).count(), 2);
    assert_eq!(plans.iter().filter(|p| p.stock_length_mm == 2400.0).count(), 8);

    let buy = generate_buy_list(&plans, MaterialLibrary::standard(), &[wall.clone()]).value;
    let descriptions: Vec<&str> = buy.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec!["47x100 C24 Timber 2400mm", "47x100 C24 Timber 3000mm", "OSB3 18mm Sheet"]
    );
    assert_eq!(buy[2].item_type, ItemType::Sheet);
    // 6.3 m2 over 2.9768 m2 sheets
    assert_eq!(buy[2].quantity, 3);

    // 8 x 2.01 + 2 x 3.0 = 22.08 m
    let hardware = calculate_hardware(&wall.members, &HardwareRuleSet::default());
    assert_eq!(hardware[0].quantity, 177);
    assert_eq!(hardware[1].quantity, 3);
    assert_eq!(hardware[2].quantity, 3);
}

#[test]
fn json_project_end_to_end() {
    let project = Project::from_json(PROJECT_JSON).unwrap();
    let output = calculate(&project);

    assert!(output.issues.is_empty(), "{:?}", output.issues);
    assert_relative_eq!(output.walls[0].height_mm, 2100.0);
    assert_relative_eq!(output.walls[1].height_mm, 2010.0);
    assert_eq!(output.walls[2].end_height_mm, Some(2010.0));

    let front = &output.layouts["front"];
    assert_eq!(front.decorative_stud_positions_mm, vec![145.0, 3410.0]);
    assert_eq!(
        front.resolved_stud_positions_mm,
        vec![0.0, 145.0, 590.0, 755.0, 2600.0, 3045.0, 3410.0, 3555.0]
    );

    // Side walls slope, so their studs shorten towards the back
    let left_studs: Vec<f64> = output.walls[2]
        .members
        .iter()
        .filter(|m| m.member_type == MemberType::Stud)
        .map(|m| m.length_mm)
        .collect();
    assert!(left_studs.windows(2).all(|w| w[0] >= w[1]));

    let insulation: Vec<_> = output
        .buy_list
        .iter()
        .filter(|i| i.item_type == ItemType::Insulation)
        .collect();
    assert_eq!(insulation.len(), 1);

    let sheets = output.buy_list.iter().find(|i| i.item_type == ItemType::Sheet).unwrap();
    assert!(sheets.quantity >= 8);

    let timber_total: f64 = output
        .buy_list
        .iter()
        .filter(|i| i.item_type == ItemType::Timber)
        .filter_map(|i| i.total_price)
        .sum();
    let sheet_total: f64 = output
        .buy_list
        .iter()
        .filter(|i| i.item_type != ItemType::Timber)
        .filter_map(|i| i.total_price)
        .sum();
    assert_relative_eq!(output.cost_totals["GBP"], timber_total + sheet_total, epsilon = 1e-9);
}

#[test]
fn output_bundle_serializes() {
    let project = Project::from_json(PROJECT_JSON).unwrap();
    let output = calculate(&project);
    let json = serde_json::to_value(&output).unwrap();

    assert!(json["buy_list"].is_array());
    assert!(json["cut_list"][0]["stock_length_mm"].is_number());
    assert_eq!(json["hardware_list"][0]["description"], "Wood Screws (50mm)");
    assert_eq!(json["layouts"]["front"]["sections"][2]["kind"], "door-space");
}

#[test]
fn problems_are_collected_not_fatal() {
    let mut project = Project::from_json(PROJECT_JSON).unwrap();
    project.walls[0].length_mm = 2700.0;
    project.walls.push(
        Wall::new("gable", "Gable", WallRole::Back, 7000.0)
            .with_stud_gap(400.0)
            .with_decorative(50.0, DecorativeSide::Both)
            .with_section("38x89-c16"),
    );
    project.materials.timber_sections[0]
        .length_options
        .retain(|o: &TimberLengthOption| o.length_mm < 4000.0);

    let output = calculate(&project);
    let codes: Vec<&str> = output.issues.iter().map(FrameError::error_code).collect();

    assert!(codes.contains(&"DOOR_OPENING_TOO_WIDE"));
    assert!(codes.contains(&"UNFULFILLABLE_CUT"));
    assert!(codes.contains(&"CATALOGUE_FALLBACK"));
    assert!(output.issues.iter().all(FrameError::is_recoverable));

    // The other walls are still framed and bought
    assert!(output.walls[1].members.len() > 2);
    assert!(!output.buy_list.is_empty());
}

#[test]
fn recalculator_tracks_input_changes() {
    let mut project = Project::from_json(PROJECT_JSON).unwrap();
    let mut recalc = Recalculator::new();

    let before = recalc.calculate(&project).clone();
    assert_eq!(recalc.calculate(&project), &before);
    assert_eq!(recalc.runs(), 1);

    project.walls[0].door_opening = Some(DoorOpening {
        door_space_width_mm: 900.0,
        ..DoorOpening::default()
    });
    let after = recalc.calculate(&project);
    assert_ne!(after.layouts["front"], before.layouts["front"]);
    assert_eq!(recalc.runs(), 2);
}
