use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{Quantity, cost::Cost, rate::KilowattHourRate};

pub type KilowattHours = Quantity<1, 0>;

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}kWh", self.0.0)
    }
}

impl Mul<KilowattHourRate> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
