//! # Hardware Estimate
//!
//! Coarse fixings and membrane quantities from total member length:
//!
//! ```text
//! linear_m  = sum(member lengths) / 1000
//! area_m2   = linear_m x 0.1
//! screws    = ceil(linear_m x screws_per_linear_meter)
//! tape      = ceil(area_m2 x tape_per_square_meter)
//! membrane  = ceil(area_m2 x membrane_per_square_meter)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::member::Member;
use crate::units::{Meters, Millimeters, SqM};

/// Face width assumed for every member when estimating areas
pub const ASSUMED_MEMBER_WIDTH_M: f64 = 0.1;

/// Hardware rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareRuleSet {
    pub screws_per_linear_meter: f64,
    pub tape_per_square_meter: f64,
    pub membrane_per_square_meter: f64,
}

impl Default for HardwareRuleSet {
    fn default() -> Self {
        HardwareRuleSet {
            screws_per_linear_meter: 8.0,
            tape_per_square_meter: 1.0,
            membrane_per_square_meter: 1.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareItem {
    pub description: String,
    pub quantity: u32,
    pub unit: String,
}

impl HardwareItem {
    fn new(description: &str, quantity: f64, unit: &str) -> Self {
        HardwareItem {
            description: description.to_string(),
            quantity: quantity.max(0.0).ceil() as u32,
            unit: unit.to_string(),
        }
    }
}

/// Estimate screws, breather tape and membrane for a member set.
pub fn calculate_hardware(members: &[Member], rules: &HardwareRuleSet) -> Vec<HardwareItem> {
    let linear: Meters = members
        .iter()
        .map(|m| Millimeters(m.length_mm))
        .sum::<Millimeters>()
        .into();
    let area = SqM::strip(linear, Meters(ASSUMED_MEMBER_WIDTH_M));

    debug!(linear_m = linear.0, area_m2 = area.0, "hardware estimated");

    vec![
        HardwareItem::new(
            "Wood Screws (50mm)",
            linear.0 * rules.screws_per_linear_meter,
            "pieces",
        ),
        HardwareItem::new(
            "Breather Tape",
            area.0 * rules.tape_per_square_meter,
            "linear meters",
        ),
        HardwareItem::new(
            "Breather Membrane",
            area.0 * rules.membrane_per_square_meter,
            "square meters",
        ),
    ]
}
