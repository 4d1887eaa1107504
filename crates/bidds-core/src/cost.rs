//! Generator operating costs and the cumulative-to-marginal curve conversion.
//!
//! Upstream cost data describes a cumulative piecewise-linear curve: each break
//! point is the total hourly cost of running at that output. The target schema
//! bids in blocks instead, so [`CostCurve::marginal_blocks`] turns the curve
//! into `(incremental cost, segment width)` pairs, widths in per-unit on the
//! system base.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{MegavoltAmperes, Megawatts, PerUnit};

/// Largest gap, relative to the rating, allowed between a curve's last break
/// point and the generator's maximum active power
const RATING_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CostCurveError {
    #[error("cost curve has no break points")]
    Empty,
    /// Two consecutive break points share the same power (or the first sits at zero)
    #[error("zero-width cost segment at break point {index}")]
    ZeroWidthSegment { index: usize },
    #[error("cost curve power decreases at break point {index}")]
    DecreasingPower { index: usize },
    #[error("cost curve ends at {curve_end} but the unit is rated {rating}")]
    RatingMismatch {
        curve_end: Megawatts,
        rating: Megawatts,
    },
}

/// One cumulative `(cost, power)` sample of a cost curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct BreakPoint {
    /// Total cost at this output ($/h)
    pub cost: f64,
    pub power: Megawatts,
}

impl From<(f64, f64)> for BreakPoint {
    fn from((cost, power): (f64, f64)) -> Self {
        Self {
            cost,
            power: Megawatts(power),
        }
    }
}

impl From<BreakPoint> for (f64, f64) {
    fn from(point: BreakPoint) -> Self {
        (point.cost, point.power.value())
    }
}

/// Marginal `[cost, width]` block in the target schema's bid format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct MarginalBlock {
    pub cost: f64,
    pub width: f64,
}

impl From<MarginalBlock> for [f64; 2] {
    fn from(block: MarginalBlock) -> Self {
        [block.cost, block.width]
    }
}

/// Ordered, non-empty cumulative cost curve.
///
/// Only emptiness is rejected on construction. Degenerate segments are left
/// for [`CostCurve::marginal_blocks`] to report, so one bad generator cannot
/// make the whole system unloadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BreakPoint>", into = "Vec<BreakPoint>")]
pub struct CostCurve {
    points: Vec<BreakPoint>,
}

impl TryFrom<Vec<BreakPoint>> for CostCurve {
    type Error = CostCurveError;

    fn try_from(points: Vec<BreakPoint>) -> Result<Self, Self::Error> {
        if points.is_empty() {
            return Err(CostCurveError::Empty);
        }
        Ok(Self { points })
    }
}

impl From<CostCurve> for Vec<BreakPoint> {
    fn from(curve: CostCurve) -> Self {
        curve.points
    }
}

impl CostCurve {
    /// Build a curve from `(cost, power_mw)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, CostCurveError> {
        Self::try_from(pairs.iter().copied().map(BreakPoint::from).collect::<Vec<_>>())
    }

    pub fn points(&self) -> &[BreakPoint] {
        &self.points
    }

    pub fn last(&self) -> BreakPoint {
        // non-empty by construction
        self.points[self.points.len() - 1]
    }

    /// Convert the cumulative curve into marginal blocks.
    ///
    /// With a single break point the result is the average cost over the whole
    /// range in absolute power, `[cost / P, P]` with `P` the rating in MW.
    /// Otherwise block `b` is
    /// `[(cost_b - cost_{b-1}) * B / (power_b - power_{b-1}), (power_b - power_{b-1}) / B]`
    /// with `cost_0 = power_0 = 0`, and the curve must end at the rating so the
    /// widths times `B` add up to it.
    pub fn marginal_blocks(
        &self,
        base_power: MegavoltAmperes,
        max_active_power: PerUnit,
    ) -> Result<Vec<MarginalBlock>, CostCurveError> {
        let rating = max_active_power.to_megawatts(base_power);
        if let [only] = self.points.as_slice() {
            if rating.value() == 0.0 {
                return Err(CostCurveError::ZeroWidthSegment { index: 1 });
            }
            return Ok(vec![MarginalBlock {
                cost: only.cost / rating.value(),
                width: rating.value(),
            }]);
        }

        let base = base_power.value();
        let mut previous = BreakPoint {
            cost: 0.0,
            power: Megawatts(0.0),
        };
        let mut blocks = Vec::with_capacity(self.points.len());
        for (i, point) in self.points.iter().enumerate() {
            let index = i + 1;
            let delta_power = point.power - previous.power;
            if delta_power.value() == 0.0 {
                return Err(CostCurveError::ZeroWidthSegment { index });
            }
            if delta_power.value() < 0.0 {
                return Err(CostCurveError::DecreasingPower { index });
            }
            blocks.push(MarginalBlock {
                cost: (point.cost - previous.cost) * base / delta_power.value(),
                width: delta_power.to_per_unit(base_power).value(),
            });
            previous = *point;
        }

        let gap = previous.power - rating;
        if gap.value().abs() > RATING_TOLERANCE * rating.value().abs().max(1.0) {
            return Err(CostCurveError::RatingMismatch {
                curve_end: previous.power,
                rating,
            });
        }
        Ok(blocks)
    }
}

/// Variable part of an operating cost: a flat $/MWh figure or a full curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableCost {
    Scalar(f64),
    Curve(CostCurve),
}

impl Default for VariableCost {
    fn default() -> Self {
        VariableCost::Scalar(0.0)
    }
}

impl VariableCost {
    /// Average cost used by the two-point `[cost, power]` representation.
    ///
    /// For a curve this is the total cost at the last break point divided by
    /// its power.
    pub fn average(&self) -> Result<f64, CostCurveError> {
        match self {
            VariableCost::Scalar(cost) => Ok(*cost),
            VariableCost::Curve(curve) => {
                let last = curve.last();
                if last.power.value() == 0.0 {
                    return Err(CostCurveError::ZeroWidthSegment {
                        index: curve.points().len(),
                    });
                }
                Ok(last.cost / last.power.value())
            }
        }
    }

    /// Marginal blocks; a scalar $/MWh cost is one block spanning the full
    /// rating, priced per unit like the curve blocks.
    pub fn marginal_blocks(
        &self,
        base_power: MegavoltAmperes,
        max_active_power: PerUnit,
    ) -> Result<Vec<MarginalBlock>, CostCurveError> {
        match self {
            VariableCost::Scalar(cost) => Ok(vec![MarginalBlock {
                cost: cost * base_power.value(),
                width: max_active_power.value(),
            }]),
            VariableCost::Curve(curve) => curve.marginal_blocks(base_power, max_active_power),
        }
    }
}

/// Two-part operating cost plus start/stop costs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalCost {
    #[serde(default)]
    pub variable: VariableCost,
    /// Cost of being committed, independent of output ($/h)
    #[serde(default)]
    pub fixed: f64,
    #[serde(default)]
    pub startup: f64,
    #[serde(default)]
    pub shutdown: f64,
}
