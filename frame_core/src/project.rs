//! # Project and Pipeline
//!
//! The `Project` struct is the root container for a garden-room frame:
//! envelope, walls, catalogue, hardware rates and settings. Projects
//! serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, name, timestamps)
//! ├── settings: ProjectSettings (default section, currency, thresholds)
//! ├── envelope: BuildEnvelope
//! ├── walls: Vec<Wall>
//! ├── materials: MaterialLibrary
//! └── hardware_rules: HardwareRuleSet
//! ```
//!
//! ## Pipeline
//!
//! [`calculate`] runs every stage in order and collects each stage's
//! flagged problems into [`OutputBundle::issues`]:
//!
//! ```text
//! envelope -> wall heights -> stud layouts -> members
//!          -> cut requirements -> cut plans -> buy list
//!                                           -> hardware
//! ```
//!
//! ## Example
//!
//! ```rust
//! use frame_core::project::{calculate, Project};
//!
//! let project = Project::garden_room("Studio", 4000.0, 3000.0);
//! let output = calculate(&project);
//!
//! assert!(!output.buy_list.is_empty());
//! assert!(output.issues.is_empty());
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::buy_list::{cost_totals, generate_buy_list, BuyListItem};
use crate::envelope::{compute_wall_heights, validate_wall_height, BuildEnvelope};
use crate::errors::{FrameError, FrameResult};
use crate::hardware::{calculate_hardware, HardwareItem, HardwareRuleSet};
use crate::layout::{
    generate_stud_layout_with, LayoutOptions, StudLayout, CLASH_THRESHOLD_MM, MIN_DOOR_SUB_WALL_MM,
};
use crate::materials::{MaterialLibrary, DEFAULT_CURRENCY, DEFAULT_SECTION_ID};
use crate::member::{Member, MemberCounts};
use crate::members::generate_members_with;
use crate::optimizer::{aggregate_with, pack, total_waste_mm, CutPlan, CutRequirement};
use crate::wall::{DecorativeSide, DoorOpening, Wall, WallRole};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Walls a complete room needs (front, back, left, right)
pub const MIN_WALLS: usize = 4;

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, name, timestamps)
    pub meta: ProjectMetadata,

    /// Defaults and thresholds
    #[serde(default)]
    pub settings: ProjectSettings,

    /// Height budget
    #[serde(default)]
    pub envelope: BuildEnvelope,

    /// Walls in authoring order
    #[serde(default)]
    pub walls: Vec<Wall>,

    /// Catalogue; the built-in one when omitted
    #[serde(default = "standard_library")]
    pub materials: MaterialLibrary,

    /// Fixings rates
    #[serde(default)]
    pub hardware_rules: HardwareRuleSet,
}

fn standard_library() -> MaterialLibrary {
    MaterialLibrary::standard().clone()
}

impl Project {
    /// Create an empty project with the built-in catalogue.
    ///
    /// # Example
    ///
    /// ```rust
    /// use frame_core::project::Project;
    ///
    /// let project = Project::new("Studio");
    /// assert_eq!(project.meta.name, "Studio");
    /// assert!(project.walls.is_empty());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            envelope: BuildEnvelope::default(),
            walls: Vec::new(),
            materials: standard_library(),
            hardware_rules: HardwareRuleSet::default(),
        }
    }

    /// A four-wall room with a door in the front wall.
    ///
    /// Front and back walls run `width_mm`, the side walls `depth_mm`.
    /// Every wall is sheathed in OSB and insulated with PIR.
    pub fn garden_room(name: impl Into<String>, width_mm: f64, depth_mm: f64) -> Self {
        let finish = |wall: Wall| {
            wall.with_stud_gap(555.0)
                .with_noggins(true)
                .with_sheet("osb3-18")
                .with_insulation("pir-100")
        };

        let mut project = Project::new(name);
        project.walls = vec![
            finish(Wall::new("front", "Front", WallRole::Front, width_mm))
                .with_decorative(100.0, DecorativeSide::Both)
                .with_door_opening(DoorOpening::default()),
            finish(Wall::new("back", "Back", WallRole::Back, width_mm)),
            finish(Wall::new("left", "Left", WallRole::Left, depth_mm)),
            finish(Wall::new("right", "Right", WallRole::Right, depth_mm)),
        ];
        project
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Add a wall and mark the project modified.
    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
        self.touch();
    }

    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Parse a project from JSON.
    pub fn from_json(json: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> FrameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the project as a whole.
    ///
    /// Problems are returned rather than raised; a project with issues can
    /// still be calculated.
    pub fn validate(&self) -> Vec<FrameError> {
        let mut issues: Vec<FrameError> = check_wall_count(&self.walls).into_iter().collect();

        if let Err(e) = self.envelope.validate() {
            issues.push(e);
        }

        issues.extend(self.walls.iter().filter_map(|w| w.validate().err()));
        issues
    }

    /// The inputs the pipeline depends on
    pub fn inputs(&self) -> PipelineInputs {
        PipelineInputs {
            settings: self.settings.clone(),
            envelope: self.envelope,
            walls: self.walls.clone(),
            materials: self.materials.clone(),
            hardware_rules: self.hardware_rules.clone(),
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub id: Uuid,

    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project name
    pub name: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Project-wide defaults and thresholds.
///
/// ## JSON Example
///
/// ```json
/// {
///   "default_section_id": "47x100-c24",
///   "default_currency": "GBP",
///   "clash_threshold_mm": 50.0,
///   "min_door_sub_wall_mm": 300.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Timber section for walls that name none
    pub default_section_id: String,

    /// Currency for priced items that carry none
    pub default_currency: String,

    /// Standard studs this close to a decorative stud are dropped (mm)
    pub clash_threshold_mm: f64,

    /// Narrowest sub-wall either side of a door (mm)
    pub min_door_sub_wall_mm: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            default_section_id: DEFAULT_SECTION_ID.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            clash_threshold_mm: CLASH_THRESHOLD_MM,
            min_door_sub_wall_mm: MIN_DOOR_SUB_WALL_MM,
        }
    }
}

impl ProjectSettings {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            clash_threshold_mm: self.clash_threshold_mm,
            min_door_sub_wall_mm: self.min_door_sub_wall_mm,
        }
    }
}

/// Everything [`calculate`] reads from a project (metadata excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineInputs {
    pub settings: ProjectSettings,
    pub envelope: BuildEnvelope,
    pub walls: Vec<Wall>,
    pub materials: MaterialLibrary,
    pub hardware_rules: HardwareRuleSet,
}

impl PipelineInputs {
    fn matches(&self, project: &Project) -> bool {
        self.settings == project.settings
            && self.envelope == project.envelope
            && self.walls == project.walls
            && self.materials == project.materials
            && self.hardware_rules == project.hardware_rules
    }
}

/// All pipeline outputs for one set of inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputBundle {
    /// Walls with derived heights and generated members
    pub walls: Vec<Wall>,

    /// Stud layout per framed wall id
    pub layouts: BTreeMap<String, StudLayout>,

    pub cut_requirements: Vec<CutRequirement>,
    pub cut_list: Vec<CutPlan>,
    pub buy_list: Vec<BuyListItem>,
    pub hardware_list: Vec<HardwareItem>,

    /// Sum of plan waste (mm)
    pub total_waste_mm: f64,

    /// Waste over total stock bought (0-100)
    pub waste_percentage: f64,

    /// Buy-list totals per currency
    pub cost_totals: BTreeMap<String, f64>,

    /// Member counts per wall id
    pub member_counts: BTreeMap<String, MemberCounts>,

    /// Everything flagged along the way
    pub issues: Vec<FrameError>,
}

impl OutputBundle {
    /// Member counts summed over all walls
    pub fn total_member_counts(&self) -> MemberCounts {
        self.member_counts.values().fold(MemberCounts::default(), |acc, c| MemberCounts {
            studs: acc.studs + c.studs,
            plates: acc.plates + c.plates,
            noggins: acc.noggins + c.noggins,
        })
    }

    /// Members of every framed wall
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.walls.iter().flat_map(|w| w.members.iter())
    }
}

fn check_wall_count(walls: &[Wall]) -> Option<FrameError> {
    let framed = walls.iter().filter(|w| w.role != WallRole::BaseFrame).count();
    (framed < MIN_WALLS).then(|| {
        FrameError::invalid_input(
            "walls",
            framed.to_string(),
            format!("A room needs at least {MIN_WALLS} walls (front, back, left, right)"),
        )
    })
}

/// A wall can be framed if its height leaves room for studs at both ends.
///
/// Walls that take their height from the envelope are also held to it.
pub fn check_frame_height(wall: &Wall, envelope: &BuildEnvelope) -> FrameResult<()> {
    if wall.role != WallRole::BaseFrame && envelope.validate().is_ok() {
        validate_wall_height(envelope, wall)?;
    }
    let ends = std::iter::once(("height_mm", wall.height_mm))
        .chain(wall.end_height_mm.map(|end| ("end_height_mm", end)));
    for (field, height) in ends {
        if height <= wall.wall_thickness_mm {
            return Err(FrameError::invalid_wall(
                &wall.id,
                field,
                height.to_string(),
                format!("Height must exceed the {} mm plate allowance", wall.wall_thickness_mm),
            ));
        }
    }
    Ok(())
}

/// Lay out and generate the members of one wall whose height is already set.
pub fn frame_wall(
    wall: &Wall,
    envelope: &BuildEnvelope,
    settings: &ProjectSettings,
) -> FrameResult<(StudLayout, Vec<Member>)> {
    check_frame_height(wall, envelope)?;
    let layout = generate_stud_layout_with(wall, &settings.layout_options())?;
    let members = generate_members_with(wall, &layout, &settings.default_section_id);
    Ok((layout, members))
}

/// Run the full pipeline for a project.
///
/// Never fails: walls that cannot be framed are returned without members,
/// cuts that fit no stock are left out of the cut list, and each problem
/// is recorded in `issues`.
pub fn calculate(project: &Project) -> OutputBundle {
    let settings = &project.settings;
    let mut issues = Vec::new();

    if let Some(issue) = check_wall_count(&project.walls) {
        warn!(%issue, "incomplete room");
        issues.push(issue);
    }

    let heighted = compute_wall_heights(&project.envelope, &project.walls).drain_into(&mut issues);

    let mut walls = Vec::with_capacity(heighted.len());
    let mut layouts = BTreeMap::new();
    let mut member_counts = BTreeMap::new();

    for mut wall in heighted {
        wall.members.clear();

        match frame_wall(&wall, &project.envelope, settings) {
            Ok((layout, members)) => {
                wall.members = members;
                member_counts.insert(wall.id.clone(), MemberCounts::from_members(&wall.members));
                layouts.insert(wall.id.clone(), layout);
            }
            Err(e) => {
                warn!(wall = %wall.id, error = %e, "wall not framed");
                issues.push(e);
            }
        }
        walls.push(wall);
    }

    let members: Vec<Member> = walls.iter().flat_map(|w| w.members.iter().cloned()).collect();
    let cut_requirements = aggregate_with(&members, &settings.default_section_id);
    let cut_list = pack(&cut_requirements, &project.materials).drain_into(&mut issues);
    let buy_list = generate_buy_list(&cut_list, &project.materials, &walls).drain_into(&mut issues);
    let hardware_list = calculate_hardware(&members, &project.hardware_rules);

    let total_waste = total_waste_mm(&cut_list);
    let total_stock: f64 = cut_list.iter().map(|p| p.stock_length_mm).sum();
    let waste_percentage = if total_stock > 0.0 {
        total_waste / total_stock * 100.0
    } else {
        0.0
    };

    info!(
        walls = walls.len(),
        members = members.len(),
        plans = cut_list.len(),
        issues = issues.len(),
        "project calculated"
    );

    OutputBundle {
        cost_totals: cost_totals(&buy_list, &settings.default_currency),
        walls,
        layouts,
        cut_requirements,
        cut_list,
        buy_list,
        hardware_list,
        total_waste_mm: total_waste,
        waste_percentage,
        member_counts,
        issues,
    }
}

/// Memoised pipeline.
///
/// Keeps the last inputs and their outputs; [`Recalculator::calculate`]
/// only reruns the pipeline when the project's inputs have changed.
#[derive(Debug, Default)]
pub struct Recalculator {
    cached: Option<(PipelineInputs, OutputBundle)>,
    runs: usize,
}

impl Recalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs for the project, recomputed only when its inputs changed
    pub fn calculate(&mut self, project: &Project) -> &OutputBundle {
        let fresh = matches!(&self.cached, Some((inputs, _)) if inputs.matches(project));
        if !fresh {
            debug!(project = %project.meta.name, "inputs changed, recalculating");
            self.cached = None;
            self.runs += 1;
        }
        let (_, output) = self
            .cached
            .get_or_insert_with(|| (project.inputs(), calculate(project)));
        output
    }

    /// Number of times the pipeline has actually run
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Drop the cached outputs
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
