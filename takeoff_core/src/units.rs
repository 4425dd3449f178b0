//! # Unit Types
//!
//! Lightweight newtype wrappers for the few units the takeoff works in.
//! Building dimensions are entered in feet, roof overhang and peak gap in
//! inches, and areas come out in square feet.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Feet, Inches, format_feet_inches};
//!
//! let overhang: Feet = Inches(2.0).into();
//! assert!((overhang.0 - 2.0 / 12.0).abs() < 1e-12);
//!
//! assert_eq!(format_feet_inches(20.75), "20'9\"");
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};
use tracing::warn;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

impl Mul<Feet> for Feet {
    type Output = SqFt;
    fn mul(self, rhs: Feet) -> SqFt {
        SqFt(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations
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

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(SqFt);

// ============================================================================
// Feet-and-inches formatting
// ============================================================================

/// Format decimal feet as feet and whole inches, e.g. `20.6155` -> `20'7"`.
///
/// Inches are rounded to the nearest whole inch; a rounded value of 12"
/// carries into the feet. Whole-foot values omit the inch part (`40'`).
/// Non-finite input renders as `0'`.
pub fn format_feet_inches(decimal_feet: f64) -> String {
    if !decimal_feet.is_finite() {
        warn!(value = decimal_feet, "Invalid length passed to feet-inches formatter");
        return "0'".to_string();
    }

    let mut feet = decimal_feet.floor();
    let mut inches = ((decimal_feet - feet) * 12.0).round();
    if inches >= 12.0 {
        feet += 1.0;
        inches = 0.0;
    }

    if inches == 0.0 {
        format!("{}'", feet as i64)
    } else {
        format!("{}'{}\"", feet as i64, inches as i64)
    }
}
