//! # Cut Optimization
//!
//! Turns members into cut requirements and packs them onto stock lengths
//! with First-Fit-Decreasing:
//!
//! 1. Group members by (type, section, length) and sort longest first.
//! 2. For each piece, place it on the first open plan of the same section
//!    with enough remaining length.
//! 3. Otherwise open a new plan on the shortest stock length that fits.
//! 4. A piece longer than every stock length is skipped and reported once
//!    per requirement.
//!
//! A plan's `waste_mm` is the remaining capacity after the most recent cut
//! placed on it, so `sum(cut lengths) + waste = stock length` always holds.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::optimizer::{pack, CutRequirement};
//! use frame_core::member::MemberType;
//! use frame_core::materials::{MaterialLibrary, DEFAULT_SECTION_ID};
//!
//! let reqs = vec![CutRequirement::new(MemberType::Stud, DEFAULT_SECTION_ID, 1200.0, 3)];
//! let plans = pack(&reqs, MaterialLibrary::standard()).value;
//! assert_eq!(plans.len(), 2);
//! assert_eq!(plans[0].waste_mm, 0.0);
//! assert_eq!(plans[1].waste_mm, 1200.0);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Calculated, FrameError};
use crate::materials::{MaterialLibrary, DEFAULT_SECTION_ID};
use crate::member::{Member, MemberType};

const EPS: f64 = 1e-6;

/// A number of identical pieces to cut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRequirement {
    pub member_type: MemberType,
    pub section_name: String,
    pub length_mm: f64,
    pub quantity: u32,
}

impl CutRequirement {
    pub fn new(
        member_type: MemberType,
        section_name: impl Into<String>,
        length_mm: f64,
        quantity: u32,
    ) -> Self {
        CutRequirement {
            member_type,
            section_name: section_name.into(),
            length_mm,
            quantity,
        }
    }

    /// Grouping key, e.g. "stud-47x100-c24-2010"
    pub fn id(&self) -> String {
        format!("{}-{}-{}", self.member_type, self.section_name, self.length_mm)
    }

    fn same_piece(&self, other: &CutRequirement) -> bool {
        self.member_type == other.member_type
            && self.section_name == other.section_name
            && (self.length_mm - other.length_mm).abs() < EPS
    }

    pub fn total_length_mm(&self) -> f64 {
        self.length_mm * f64::from(self.quantity)
    }
}

/// Cuts taken from one piece of stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutPlan {
    /// Stock length bought (mm)
    pub stock_length_mm: f64,

    /// Section of the cut that opened this plan
    pub section_name: String,

    /// Cuts on this stock piece
    pub cuts: Vec<CutRequirement>,

    /// Remaining capacity after the most recent cut (mm)
    pub waste_mm: f64,
}

impl CutPlan {
    fn open(stock_length_mm: f64, req: &CutRequirement) -> Self {
        CutPlan {
            stock_length_mm,
            section_name: req.section_name.clone(),
            cuts: vec![CutRequirement {
                quantity: 1,
                ..req.clone()
            }],
            waste_mm: stock_length_mm - req.length_mm,
        }
    }

    fn add_cut(&mut self, req: &CutRequirement) {
        let remaining = self.remaining_mm();
        match self.cuts.iter_mut().find(|c| c.same_piece(req)) {
            Some(cut) => cut.quantity += 1,
            None => self.cuts.push(CutRequirement {
                quantity: 1,
                ..req.clone()
            }),
        }
        self.waste_mm = remaining - req.length_mm;
    }

    /// Total length of all cuts (mm)
    pub fn used_mm(&self) -> f64 {
        self.cuts.iter().map(CutRequirement::total_length_mm).sum()
    }

    /// Length still available on this stock piece (mm)
    pub fn remaining_mm(&self) -> f64 {
        self.stock_length_mm - self.used_mm()
    }

    /// Waste as a percentage of the stock length (0-100)
    pub fn waste_percentage(&self) -> f64 {
        if self.stock_length_mm <= 0.0 {
            return 0.0;
        }
        self.waste_mm / self.stock_length_mm * 100.0
    }

    pub fn piece_count(&self) -> u32 {
        self.cuts.iter().map(|c| c.quantity).sum()
    }
}

/// Sum of waste across plans (mm)
pub fn total_waste_mm(plans: &[CutPlan]) -> f64 {
    plans.iter().map(|p| p.waste_mm).sum()
}

/// Group members into cut requirements, longest first.
pub fn aggregate(members: &[Member]) -> Vec<CutRequirement> {
    aggregate_with(members, DEFAULT_SECTION_ID)
}

/// Group members into cut requirements, using `default_section` for
/// members with no section.
///
/// Groups keep first-seen order among equal lengths, so the result is
/// deterministic for a given member order.
pub fn aggregate_with(members: &[Member], default_section: &str) -> Vec<CutRequirement> {
    let mut index: HashMap<(MemberType, String, u64), usize> = HashMap::new();
    let mut requirements: Vec<CutRequirement> = Vec::new();

    for member in members {
        let section = if member.section_name.is_empty() {
            default_section
        } else {
            member.section_name.as_str()
        };
        let key = (member.member_type, section.to_string(), member.length_mm.to_bits());
        match index.get(&key) {
            Some(&i) => requirements[i].quantity += 1,
            None => {
                index.insert(key, requirements.len());
                requirements.push(CutRequirement::new(
                    member.member_type,
                    section,
                    member.length_mm,
                    1,
                ));
            }
        }
    }

    requirements.sort_by(|a, b| b.length_mm.total_cmp(&a.length_mm));
    requirements
}

/// Pack requirements onto stock lengths (First-Fit-Decreasing).
///
/// Requirements are processed longest first; equal lengths keep their
/// given order. Pieces that fit no stock length are skipped and reported
/// as [`FrameError::UnfulfillableCut`]; non-positive lengths are skipped
/// and reported as invalid input.
pub fn pack(
    requirements: &[CutRequirement],
    library: &MaterialLibrary,
) -> Calculated<Vec<CutPlan>> {
    let stock = library.stock_lengths_mm();
    let longest_stock_mm = stock.last().copied().unwrap_or(0.0);

    let mut ordered: Vec<&CutRequirement> = requirements.iter().collect();
    ordered.sort_by(|a, b| b.length_mm.total_cmp(&a.length_mm));

    let mut plans: Vec<CutPlan> = Vec::new();
    let mut issues = Vec::new();

    for req in ordered {
        if req.length_mm <= 0.0 || !req.length_mm.is_finite() {
            warn!(cut = %req.id(), length_mm = req.length_mm, "cut with no length");
            issues.push(FrameError::invalid_input(
                "length_mm",
                req.length_mm.to_string(),
                format!("Cut {} must have a positive length", req.id()),
            ));
            continue;
        }

        let mut skipped = 0u32;
        for _ in 0..req.quantity {
            if let Some(plan) = plans.iter_mut().find(|p| {
                p.section_name == req.section_name && p.remaining_mm() + EPS >= req.length_mm
            }) {
                plan.add_cut(req);
                continue;
            }

            match stock.iter().copied().find(|&s| s + EPS >= req.length_mm) {
                Some(stock_length) => plans.push(CutPlan::open(stock_length, req)),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                member_type = %req.member_type,
                section = %req.section_name,
                length_mm = req.length_mm,
                skipped,
                longest_stock_mm,
                "cut longer than any stock length"
            );
            issues.push(FrameError::UnfulfillableCut {
                member_type: req.member_type.to_string(),
                section_name: req.section_name.clone(),
                length_mm: req.length_mm,
                quantity: skipped,
                longest_stock_mm,
            });
        }
    }

    debug!(plans = plans.len(), waste_mm = total_waste_mm(&plans), "cut plans packed");
    Calculated::with_issues(plans, issues)
}

/// Host-facing name for [`pack`].
pub fn optimize_cut_plans(
    requirements: &[CutRequirement],
    library: &MaterialLibrary,
) -> Calculated<Vec<CutPlan>> {
    pack(requirements, library)
}
