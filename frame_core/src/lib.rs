//! # frame_core - Timber Wall Framing Engine
//!
//! `frame_core` turns a garden-room style building (a build envelope plus a
//! set of walls) into a stud layout, a member list, an optimized cutting
//! plan, a priced buy list and a hardware estimate. All inputs and outputs
//! are JSON-serializable so a host application can drive it directly.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Keep Going**: Problems are flagged alongside partial results, never fatal
//! - **Explicit Catalogue**: The material library is passed in, never global state
//!
//! ## Quick Start
//!
//! ```rust
//! use frame_core::layout::generate_stud_layout;
//! use frame_core::wall::{Wall, WallRole};
//!
//! let wall = Wall::new("back", "Back", WallRole::Back, 3000.0).with_stud_gap(400.0);
//! let layout = generate_stud_layout(&wall).unwrap();
//!
//! assert_eq!(
//!     layout.resolved_stud_positions_mm,
//!     vec![0.0, 445.0, 890.0, 1335.0, 1780.0, 2225.0, 2670.0, 2955.0]
//! );
//! ```
//!
//! ## Modules
//!
//! - [`envelope`] - Frame heights from the legal height budget and roof fall
//! - [`wall`] - Walls, door openings and decorative studs
//! - [`layout`] - Stud positions, clash resolution, door sub-sections
//! - [`members`] - Studs, plates and noggins from a layout
//! - [`optimizer`] - Cut requirements and First-Fit-Decreasing packing
//! - [`buy_list`] - Priced timber, sheet and insulation quantities
//! - [`hardware`] - Screws, breather tape and membrane
//! - [`materials`] - Material catalogue with fallback lookups
//! - [`project`] - Project container and the full pipeline
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod buy_list;
pub mod envelope;
pub mod errors;
pub mod hardware;
pub mod layout;
pub mod materials;
pub mod member;
pub mod members;
pub mod optimizer;
pub mod project;
pub mod units;
pub mod wall;

// Re-export commonly used types at crate root for convenience
pub use buy_list::{generate_buy_list, BuyListItem, ItemType};
pub use envelope::{compute_wall_heights, BuildEnvelope, FallRatio};
pub use errors::{Calculated, FrameError, FrameResult};
pub use hardware::{calculate_hardware, HardwareItem, HardwareRuleSet};
pub use layout::{generate_stud_layout, StudLayout};
pub use materials::MaterialLibrary;
pub use member::{Member, MemberType};
pub use members::generate_members;
pub use optimizer::{optimize_cut_plans, CutPlan, CutRequirement};
pub use project::{calculate, OutputBundle, Project, ProjectSettings, Recalculator};
pub use wall::{Wall, WallRole};
