//! # Material Catalogue
//!
//! The catalogue of purchasable timber, sheet goods and insulation boards.
//! It is read-only input to the engine and is passed explicitly into every
//! function that needs it.
//!
//! ## Lookups and Fallbacks
//!
//! A wall or cut can name a catalogue id that does not exist. Lookups then
//! substitute a best-effort default and flag the substitution as a
//! [`FrameError::CatalogueFallback`] rather than swapping silently.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::materials::MaterialLibrary;
//!
//! let library = MaterialLibrary::standard();
//! assert_eq!(library.stock_lengths_mm(), vec![2400.0, 3000.0, 3600.0, 4800.0]);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{Calculated, FrameError};
use crate::units::{Millimeters, SqM, SqMm};

/// Section used when a wall names none
pub const DEFAULT_SECTION_ID: &str = "47x100-c24";

/// Currency used when a price carries none
pub const DEFAULT_CURRENCY: &str = "GBP";

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// One purchasable length of a timber section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimberLengthOption {
    pub length_mm: f64,
    pub price_per_piece: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// A timber section with its stock lengths and prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimberSection {
    /// Catalogue key (e.g., "47x100-c24")
    pub id: String,

    /// Display name (e.g., "47x100 C24 Timber")
    pub name: String,

    /// Cross-section width (mm)
    pub width_mm: f64,

    /// Cross-section height (mm)
    pub height_mm: f64,

    /// Grade (e.g., "C24", "C16", "Treated")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,

    /// Stock lengths with pricing
    pub length_options: Vec<TimberLengthOption>,
}

impl TimberSection {
    /// Available option at exactly this length
    pub fn option_at(&self, length_mm: f64) -> Option<&TimberLengthOption> {
        self.length_options
            .iter()
            .find(|o| o.available && (o.length_mm - length_mm).abs() < 1e-6)
    }
}

/// A sheet material (OSB, plywood, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMaterial {
    pub id: String,
    pub name: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub thickness_mm: f64,
    pub price_per_sheet: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl SheetMaterial {
    /// Face area of one sheet
    pub fn unit_area(&self) -> SqM {
        SqMm::rect(Millimeters(self.width_mm), Millimeters(self.height_mm)).into()
    }
}

/// A rigid insulation board (PIR)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsulationBoard {
    pub id: String,
    pub name: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub thickness_mm: f64,

    /// Thermal conductivity (W/m·K)
    #[serde(default)]
    pub thermal_conductivity: f64,

    pub price_per_board: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl InsulationBoard {
    /// Face area of one board
    pub fn unit_area(&self) -> SqM {
        SqMm::rect(Millimeters(self.width_mm), Millimeters(self.height_mm)).into()
    }
}

/// Price found for a stock length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub section_id: String,
    pub section_name: String,
    pub length_mm: f64,
    pub price_per_piece: f64,
    pub currency: String,
}

/// Everything that can be bought.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLibrary {
    #[serde(default)]
    pub timber_sections: Vec<TimberSection>,
    #[serde(default)]
    pub sheet_materials: Vec<SheetMaterial>,
    #[serde(default)]
    pub insulation_boards: Vec<InsulationBoard>,
}

static STANDARD_LIBRARY: Lazy<MaterialLibrary> = Lazy::new(|| {
    let timber = |length_mm: f64, price: f64| TimberLengthOption {
        length_mm,
        price_per_piece: price,
        currency: default_currency(),
        available: true,
    };

    MaterialLibrary {
        timber_sections: vec![TimberSection {
            id: DEFAULT_SECTION_ID.to_string(),
            name: "47x100 C24 Timber".to_string(),
            width_mm: 47.0,
            height_mm: 100.0,
            grade: Some("C24".to_string()),
            length_options: vec![
                timber(2400.0, 6.50),
                timber(3000.0, 8.10),
                timber(3600.0, 9.70),
                timber(4800.0, 13.20),
            ],
        }],
        sheet_materials: vec![SheetMaterial {
            id: "osb3-18".to_string(),
            name: "OSB3 18mm Sheet".to_string(),
            width_mm: 2440.0,
            height_mm: 1220.0,
            thickness_mm: 18.0,
            price_per_sheet: 24.0,
            currency: default_currency(),
            available: true,
        }],
        insulation_boards: vec![InsulationBoard {
            id: "pir-100".to_string(),
            name: "PIR Board 100mm".to_string(),
            width_mm: 2400.0,
            height_mm: 1200.0,
            thickness_mm: 100.0,
            thermal_conductivity: 0.022,
            price_per_board: 42.0,
            currency: default_currency(),
            available: true,
        }],
    }
});

impl MaterialLibrary {
    /// Built-in catalogue used when the host supplies none
    pub fn standard() -> &'static MaterialLibrary {
        &STANDARD_LIBRARY
    }

    /// Every available stock length across all sections, ascending
    pub fn stock_lengths_mm(&self) -> Vec<f64> {
        let mut lengths: Vec<f64> = self
            .timber_sections
            .iter()
            .flat_map(|s| s.length_options.iter())
            .filter(|o| o.available)
            .map(|o| o.length_mm)
            .collect();
        lengths.sort_by(f64::total_cmp);
        lengths.dedup();
        lengths
    }

    pub fn timber_section(&self, id: &str) -> Option<&TimberSection> {
        self.timber_sections.iter().find(|s| s.id == id)
    }

    pub fn sheet(&self, id: &str) -> Option<&SheetMaterial> {
        self.sheet_materials.iter().find(|s| s.id == id)
    }

    pub fn insulation(&self, id: &str) -> Option<&InsulationBoard> {
        self.insulation_boards.iter().find(|b| b.id == id)
    }

    /// Price a stock length of a section.
    ///
    /// Falls back to any section offering that exact length, flagging the
    /// substitution. `None` when no section sells the length at all.
    pub fn price_for(&self, section_id: &str, length_mm: f64) -> Calculated<Option<PriceQuote>> {
        let quote = |section: &TimberSection, option: &TimberLengthOption| PriceQuote {
            section_id: section.id.clone(),
            section_name: section.name.clone(),
            length_mm: option.length_mm,
            price_per_piece: option.price_per_piece,
            currency: option.currency.clone(),
        };

        if let Some(section) = self.timber_section(section_id) {
            if let Some(option) = section.option_at(length_mm) {
                return Calculated::clean(Some(quote(section, option)));
            }
        }

        let fallback = self
            .timber_sections
            .iter()
            .find_map(|s| s.option_at(length_mm).map(|o| quote(s, o)));

        match fallback {
            Some(q) => {
                let issue = FrameError::catalogue_fallback(
                    "timber section",
                    format!("{section_id} @ {length_mm} mm"),
                    format!("{} @ {} mm", q.section_id, q.length_mm),
                );
                Calculated::with_issues(Some(q), vec![issue])
            }
            None => Calculated::with_issues(
                None,
                vec![FrameError::material_not_found(format!("{section_id} @ {length_mm} mm"))],
            ),
        }
    }

    /// Look up a sheet, substituting the first available sheet if it is
    /// missing or not available.
    pub fn resolve_sheet(&self, id: &str) -> Calculated<Option<&SheetMaterial>> {
        resolve(id, "sheet material", self.sheet(id).filter(|s| s.available), || {
            self.sheet_materials.iter().find(|s| s.available).map(|s| (s, s.id.as_str()))
        })
    }

    /// Look up an insulation board, substituting the first available board
    /// if it is missing or not available.
    pub fn resolve_insulation(&self, id: &str) -> Calculated<Option<&InsulationBoard>> {
        resolve(id, "insulation board", self.insulation(id).filter(|b| b.available), || {
            self.insulation_boards.iter().find(|b| b.available).map(|b| (b, b.id.as_str()))
        })
    }
}

fn resolve<'a, T>(
    id: &str,
    kind: &str,
    found: Option<&'a T>,
    fallback: impl FnOnce() -> Option<(&'a T, &'a str)>,
) -> Calculated<Option<&'a T>> {
    if let Some(item) = found {
        return Calculated::clean(Some(item));
    }
    match fallback() {
        Some((item, substitute_id)) => Calculated::with_issues(
            Some(item),
            vec![FrameError::catalogue_fallback(kind, id, substitute_id)],
        ),
        None => Calculated::with_issues(None, vec![FrameError::material_not_found(id)]),
    }
}
