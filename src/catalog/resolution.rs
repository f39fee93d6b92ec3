use std::{
    fmt::{Display, Formatter},
    sync::LazyLock,
};

use serde::Serialize;

use crate::catalog::definition::TariffDefinition;

static UNKNOWN_TARIFF: LazyLock<TariffDefinition> = LazyLock::new(|| {
    TariffDefinition::builder()
        .code("UNKNOWN")
        .description("Unknown tariff: the code matches nothing in the catalog")
        .build()
});

/// How a tariff code was matched against the catalog.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Normalized code matches a canonical tariff.
    Exact,

    /// Normalized code matches an alias, and the alias was redirected.
    Alias,

    /// Loose match tolerating OCR corruption, low confidence.
    Substring,

    /// Nothing matched, the tariff is the zero-rate sentinel.
    Unknown,
}

impl Display for MatchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Substring => "substring",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Resolution<'a> {
    /// Always a canonical tariff, or the unknown tariff sentinel.
    pub tariff: &'a TariffDefinition,

    pub kind: MatchKind,
}

impl Resolution<'_> {
    pub fn unknown() -> Self {
        Self { tariff: &UNKNOWN_TARIFF, kind: MatchKind::Unknown }
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self.kind, MatchKind::Unknown)
    }
}
