//! # Unit Types
//!
//! Type-safe wrappers for the units the framing engine works in. These are
//! plain f64 newtypes that serialize as bare numbers.
//!
//! ## Metric Units
//!
//! - Length: millimetres (mm) for all geometry, metres (m) for hardware rates
//! - Area: square millimetres (mm²) for member footprints, square metres (m²)
//!   for sheet goods and insulation
//!
//! ## Example
//!
//! ```rust
//! use frame_core::units::{Millimeters, Meters, SqMm, SqM};
//!
//! let stud = Millimeters(2400.0);
//! let metres: Meters = stud.into();
//! assert_eq!(metres.0, 2.4);
//!
//! let face = SqMm::rect(Millimeters(2400.0), Millimeters(1200.0));
//! let area: SqM = face.into();
//! assert!((area.0 - 2.88).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

impl SqMm {
    /// Area of a width x height rectangle
    pub fn rect(width: Millimeters, height: Millimeters) -> Self {
        SqMm(width.0 * height.0)
    }
}

impl SqM {
    /// Area of a length (m) x width (m) strip
    pub fn strip(length: Meters, width: Meters) -> Self {
        SqM(length.0 * width.0)
    }
}

impl From<SqMm> for SqM {
    fn from(mm2: SqMm) -> Self {
        SqM(mm2.0 / 1_000_000.0)
    }
}

impl From<SqM> for SqMm {
    fn from(m2: SqM) -> Self {
        SqMm(m2.0 * 1_000_000.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self(0.0), |acc, x| acc + x)
            }
        }

        impl $type {
            /// Clamp negative values to zero
            pub fn non_negative(self) -> Self {
                Self(self.0.max(0.0))
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SqMm);
impl_arithmetic!(SqM);
