//! # Buy List
//!
//! Converts cut plans and wall selections into a priced shopping list.
//!
//! ## Timber
//!
//! One item per (section, stock length) across all cut plans. Quantity is
//! the number of plans on that stock; the price comes from the catalogue,
//! falling back to any section selling the same length.
//!
//! ## Sheets and Insulation
//!
//! Areas are accumulated per material id across walls:
//!
//! - sheet area = wall face area, less the door aperture on door walls
//! - insulation area = wall face area less the member footprint; base
//!   frames use `perimeter x stud width` as their footprint
//!
//! Quantity is `ceil(total area / unit area)`.
//!
//! ## Example
//!
//! ```json
//! {
//!   "item_type": "timber",
//!   "description": "47x100 C24 Timber 2400mm",
//!   "quantity": 14,
//!   "unit": "pieces",
//!   "price_per_unit": 6.5,
//!   "total_price": 91.0,
//!   "currency": "GBP"
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::Calculated;
use crate::materials::MaterialLibrary;
use crate::member::{Member, MemberType};
use crate::optimizer::CutPlan;
use crate::units::{Millimeters, SqM, SqMm};
use crate::wall::{Wall, WallRole};

/// Category of purchasable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Timber,
    Sheet,
    Insulation,
}

/// One line of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyListItem {
    pub item_type: ItemType,
    pub description: String,
    pub quantity: u32,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl BuyListItem {
    fn priced(
        item_type: ItemType,
        description: String,
        quantity: u32,
        unit: &str,
        price: Option<(f64, &str)>,
    ) -> Self {
        BuyListItem {
            item_type,
            description,
            quantity,
            unit: unit.to_string(),
            price_per_unit: price.map(|(p, _)| p),
            total_price: price.map(|(p, _)| p * f64::from(quantity)),
            currency: price.map(|(_, c)| c.to_string()),
        }
    }
}

/// Build the buy list for a set of cut plans and walls.
pub fn generate_buy_list(
    plans: &[CutPlan],
    library: &MaterialLibrary,
    walls: &[Wall],
) -> Calculated<Vec<BuyListItem>> {
    let mut issues = Vec::new();
    let mut items = timber_items(plans, library).drain_into(&mut issues);
    items.extend(sheet_items(library, walls).drain_into(&mut issues));
    items.extend(insulation_items(library, walls).drain_into(&mut issues));

    items.sort_by(|a, b| a.description.cmp(&b.description));
    debug!(items = items.len(), issues = issues.len(), "buy list generated");
    Calculated::with_issues(items, issues)
}

fn timber_items(plans: &[CutPlan], library: &MaterialLibrary) -> Calculated<Vec<BuyListItem>> {
    let mut counts: BTreeMap<(String, u64), (f64, u32)> = BTreeMap::new();
    for plan in plans {
        let entry = counts
            .entry((plan.section_name.clone(), plan.stock_length_mm.to_bits()))
            .or_insert((plan.stock_length_mm, 0));
        entry.1 += 1;
    }

    let mut issues = Vec::new();
    let mut items = Vec::with_capacity(counts.len());
    for ((section_id, _), (stock_length_mm, quantity)) in counts {
        let quote = library.price_for(&section_id, stock_length_mm);
        for issue in &quote.issues {
            warn!(%issue, "timber price lookup");
        }
        let quote = quote.drain_into(&mut issues);

        let name = match (&quote, library.timber_section(&section_id)) {
            (_, Some(section)) => section.name.clone(),
            (Some(q), None) => q.section_name.clone(),
            (None, None) => section_id.clone(),
        };
        items.push(BuyListItem::priced(
            ItemType::Timber,
            format!("{name} {stock_length_mm}mm"),
            quantity,
            "pieces",
            quote.as_ref().map(|q| (q.price_per_piece, q.currency.as_str())),
        ));
    }
    Calculated::with_issues(items, issues)
}

/// Face area of a wall; sloped walls use their mean height
pub fn gross_wall_area(wall: &Wall) -> SqM {
    let mean_height = match wall.end_height_mm {
        Some(end) => (wall.height_mm + end) / 2.0,
        None => wall.height_mm,
    };
    SqMm::rect(Millimeters(wall.length_mm), Millimeters(mean_height)).into()
}

/// Area left for sheathing after the door aperture
pub fn sheet_area(wall: &Wall) -> SqM {
    let gross = gross_wall_area(wall);
    let aperture: SqM = match &wall.door_opening {
        Some(door) => {
            SqMm::rect(Millimeters(door.door_space_width_mm), Millimeters(wall.height_mm)).into()
        }
        None => SqM(0.0),
    };
    (gross - aperture).non_negative()
}

/// Cross-sectional footprint of one member on the wall face.
///
/// Pillars carry their own face width in the `width_mm` tag.
pub fn member_footprint(member: &Member, stud_width_mm: f64) -> SqMm {
    match member.member_type {
        MemberType::Stud => {
            let width = member
                .tag("width_mm")
                .and_then(|w| w.parse::<f64>().ok())
                .unwrap_or(stud_width_mm);
            SqMm::rect(Millimeters(member.length_mm), Millimeters(width))
        }
        MemberType::Plate | MemberType::Noggin => {
            SqMm::rect(Millimeters(member.length_mm), Millimeters(member.height_mm))
        }
    }
}

/// Area left for insulation between framing members
pub fn insulation_area(wall: &Wall) -> SqM {
    let footprint: SqM = if wall.role == WallRole::BaseFrame {
        let perimeter = 2.0 * (wall.length_mm + wall.height_mm);
        SqMm::rect(Millimeters(perimeter), Millimeters(wall.stud_width_mm)).into()
    } else {
        wall.members
            .iter()
            .map(|m| member_footprint(m, wall.stud_width_mm))
            .sum::<SqMm>()
            .into()
    };
    (gross_wall_area(wall) - footprint).non_negative()
}

struct AreaTotal<'a> {
    name: &'a str,
    unit_area: SqM,
    price: f64,
    currency: &'a str,
    area: SqM,
}

fn area_items<'a>(
    item_type: ItemType,
    unit: &str,
    totals: BTreeMap<&'a str, AreaTotal<'a>>,
) -> Vec<BuyListItem> {
    totals
        .into_values()
        .map(|t| {
            let quantity = if t.unit_area.0 > 0.0 {
                (t.area.0 / t.unit_area.0).ceil() as u32
            } else {
                0
            };
            let price = Some((t.price, t.currency));
            BuyListItem::priced(item_type, t.name.to_string(), quantity, unit, price)
        })
        .collect()
}

fn sheet_items(library: &MaterialLibrary, walls: &[Wall]) -> Calculated<Vec<BuyListItem>> {
    let mut issues = Vec::new();
    let mut totals: BTreeMap<&str, AreaTotal> = BTreeMap::new();

    for wall in walls {
        let Some(id) = wall.sheet_material_id.as_deref() else {
            continue;
        };
        let resolved = library.resolve_sheet(id);
        for issue in &resolved.issues {
            warn!(wall = %wall.id, %issue, "sheet lookup");
        }
        let Some(sheet) = resolved.drain_into(&mut issues) else {
            continue;
        };
        let total = totals.entry(sheet.id.as_str()).or_insert_with(|| AreaTotal {
            name: &sheet.name,
            unit_area: sheet.unit_area(),
            price: sheet.price_per_sheet,
            currency: &sheet.currency,
            area: SqM(0.0),
        });
        total.area = total.area + sheet_area(wall);
    }

    Calculated::with_issues(area_items(ItemType::Sheet, "sheets", totals), issues)
}

fn insulation_items(library: &MaterialLibrary, walls: &[Wall]) -> Calculated<Vec<BuyListItem>> {
    let mut issues = Vec::new();
    let mut totals: BTreeMap<&str, AreaTotal> = BTreeMap::new();

    for wall in walls {
        let Some(id) = wall.insulation_id.as_deref() else {
            continue;
        };
        let resolved = library.resolve_insulation(id);
        for issue in &resolved.issues {
            warn!(wall = %wall.id, %issue, "insulation lookup");
        }
        let Some(board) = resolved.drain_into(&mut issues) else {
            continue;
        };
        let total = totals.entry(board.id.as_str()).or_insert_with(|| AreaTotal {
            name: &board.name,
            unit_area: board.unit_area(),
            price: board.price_per_board,
            currency: &board.currency,
            area: SqM(0.0),
        });
        total.area = total.area + insulation_area(wall);
    }

    Calculated::with_issues(area_items(ItemType::Insulation, "boards", totals), issues)
}

/// Sum of priced totals per currency.
///
/// Items priced without a currency count towards `default_currency`.
pub fn cost_totals(items: &[BuyListItem], default_currency: &str) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for item in items {
        if let Some(total) = item.total_price {
            let currency = match item.currency.as_deref() {
                Some(c) if !c.is_empty() => c,
                _ => default_currency,
            };
            *totals.entry(currency.to_string()).or_insert(0.0) += total;
        }
    }
    totals
}
