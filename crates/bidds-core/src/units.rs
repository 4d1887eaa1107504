//! Unit newtypes for the quantities that cross the translation boundary.
//!
//! Device ratings in the component model are per-unit on the system base,
//! cost-curve break points are in natural units (MW), and the system base is
//! an apparent power. Keeping them apart at the type level stops a MW value
//! from being emitted where the target schema expects per-unit.
//!
//! ```
//! use bidds_core::units::{Megawatts, MegavoltAmperes};
//!
//! let base = MegavoltAmperes(100.0);
//! let width = Megawatts(50.0).to_per_unit(base);
//! assert_eq!(width.value(), 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Sub;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }
    };
}

/// Active power in megawatts (MW), the unit of cost-curve break points.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

/// Apparent power in MVA. Used for the system base power.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegavoltAmperes(pub f64);

impl_unit_ops!(MegavoltAmperes, "MVA");

/// Value normalized to the system base.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerUnit(pub f64);

impl_unit_ops!(PerUnit, "pu");

/// Nominal voltage in kilovolts (kV).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

impl Megawatts {
    /// Convert to per-unit on the given base: `P / S_base`
    #[inline]
    pub fn to_per_unit(self, base: MegavoltAmperes) -> PerUnit {
        PerUnit(self.0 / base.0)
    }
}

impl PerUnit {
    /// Convert back to natural units: `P_pu × S_base`
    #[inline]
    pub fn to_megawatts(self, base: MegavoltAmperes) -> Megawatts {
        Megawatts(self.0 * base.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megawatts_difference() {
        assert_eq!((Megawatts(100.0) - Megawatts(50.0)).value(), 50.0);
    }

    #[test]
    fn test_per_unit_roundtrip() {
        let base = MegavoltAmperes(100.0);
        let pu = Megawatts(150.0).to_per_unit(base);
        assert!((pu.value() - 1.5).abs() < 1e-12);
        assert!((pu.to_megawatts(base).value() - 150.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Megawatts(100.0)), "100.0000 MW");
        assert_eq!(format!("{}", PerUnit(1.0)), "1.0000 pu");
        assert_eq!(format!("{}", Kilovolts(230.0)), "230.0000 kV");
    }
}
