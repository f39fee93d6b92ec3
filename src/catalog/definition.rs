use bon::Builder;

use crate::{catalog::code::TariffKey, quantity::rate::KilowattHourRate};

/// Single rate plan of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Builder)]
pub struct TariffDefinition {
    /// Code as written in the catalog source, for example `E-TOU-B`.
    #[builder(into)]
    pub code: String,

    #[builder(into, default)]
    pub description: String,

    #[builder(into, default)]
    pub peak_rate: KilowattHourRate,

    #[builder(into, default)]
    pub off_peak_rate: KilowattHourRate,

    /// Code of the canonical tariff when this entry is a known misreading or variant.
    #[builder(into)]
    pub alias_of: Option<String>,
}

impl TariffDefinition {
    pub fn key(&self) -> TariffKey {
        TariffKey::normalize(&self.code)
    }

    pub const fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }
}
