use std::fmt::{Display, Formatter};

/// Normalized tariff code: upper-case, alphanumeric characters only.
///
/// `E-TOU-B`, `etou b` and `E_TOU_B` all normalize to `ETOUB`.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TariffKey(String);

impl TariffKey {
    pub fn normalize(code: &str) -> Self {
        Self(
            code.chars()
                .filter(|character| character.is_alphanumeric())
                .flat_map(char::to_uppercase)
                .collect(),
        )
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Either key contains the other one.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.0.contains(&other.0) || other.0.contains(&self.0)
    }
}

impl Display for TariffKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
