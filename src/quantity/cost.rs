use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;
use serde::Serializer;

use crate::quantity::Quantity;

pub type Cost = Quantity<0, 1>;

impl Cost {
    pub const ONE_CENT: Self = Self(OrderedFloat(0.01));

    /// Round the cost to cents.
    pub fn round_to_cents(self) -> Self {
        // Adding zero turns `-0.0` into `0.0`.
        Self(OrderedFloat((self.0.0 * 100.0).round() / 100.0 + 0.0))
    }

    /// Serialize the cost as a decimal with two fractional digits.
    ///
    /// Monetary values are only rounded on the way out, all arithmetic runs at full precision.
    #[expect(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize_cents<S: Serializer>(cost: &Self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cost.round_to_cents().0.0)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let cents = self.round_to_cents();
        if cents.is_negative() {
            write!(f, "-${:.2}", -cents.0)
        } else {
            write!(f, "${:.2}", cents.0)
        }
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}$", self.0.0)
    }
}
