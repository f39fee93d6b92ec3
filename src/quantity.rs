pub mod cost;
pub mod energy;
pub mod rate;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Dimension-typed decimal.
///
/// `ENERGY` and `COST` are the exponents of kilowatt-hours and currency units, so that
/// kilowatt-hours times a per-kilowatt-hour rate yield a cost and nothing else.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const ENERGY: isize, const COST: isize>(pub OrderedFloat<f64>);

impl<const ENERGY: isize, const COST: isize> Quantity<ENERGY, COST> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }

    pub fn is_negative(self) -> bool {
        self.0.0 < 0.0
    }
}

impl<const ENERGY: isize, const COST: isize> Mul<f64> for Quantity<ENERGY, COST> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const ENERGY: isize, const COST: isize> Div<f64> for Quantity<ENERGY, COST> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}
