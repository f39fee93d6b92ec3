//! On-disk catalog format.
//!
//! Either a bare mapping from tariff code to its entry, or a versioned document
//! with the same mapping under `tariffs`. Entry order is preserved.

use serde::{Deserialize, Serialize};
use serde_with::{Map, serde_as};

use crate::{catalog::definition::TariffDefinition, error::CatalogLoadError};

#[serde_as]
#[derive(Deserialize, Serialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde_as(as = "Map<_, _>")]
    pub tariffs: Vec<(String, Entry)>,
}

#[serde_as]
#[derive(Deserialize)]
#[serde(untagged)]
enum AnyDocument {
    Versioned(Document),
    Bare(#[serde_as(as = "Map<_, _>")] Vec<(String, Entry)>),
}

impl From<AnyDocument> for Document {
    fn from(document: AnyDocument) -> Self {
        match document {
            AnyDocument::Versioned(document) => document,
            AnyDocument::Bare(tariffs) => Self { version: None, tariffs },
        }
    }
}

impl Document {
    pub fn from_json_str(text: &str) -> Result<Self, CatalogLoadError> {
        Ok(serde_json::from_str::<AnyDocument>(text)?.into())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CatalogLoadError> {
        Ok(toml::from_str::<AnyDocument>(text)?.into())
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_peak_rate: Option<f64>,

    #[serde(default, alias = "alias", skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

impl Entry {
    /// Convert the entry into a definition, canonical entries must specify both rates.
    pub fn try_into_definition(self, code: String) -> Result<TariffDefinition, CatalogLoadError> {
        let (peak_rate, off_peak_rate) = if self.alias_of.is_some() {
            (self.peak_rate.unwrap_or_default(), self.off_peak_rate.unwrap_or_default())
        } else {
            let peak_rate = self.peak_rate.ok_or_else(|| CatalogLoadError::MissingRate {
                code: code.clone(),
                field: "peakRate",
            })?;
            let off_peak_rate = self.off_peak_rate.ok_or_else(|| CatalogLoadError::MissingRate {
                code: code.clone(),
                field: "offPeakRate",
            })?;
            (peak_rate, off_peak_rate)
        };
        Ok(TariffDefinition::builder()
            .code(code)
            .description(self.description)
            .peak_rate(peak_rate)
            .off_peak_rate(off_peak_rate)
            .maybe_alias_of(self.alias_of)
            .build())
    }
}

impl From<&TariffDefinition> for Entry {
    fn from(tariff: &TariffDefinition) -> Self {
        if tariff.is_alias() {
            Self {
                description: tariff.description.clone(),
                peak_rate: None,
                off_peak_rate: None,
                alias_of: tariff.alias_of.clone(),
            }
        } else {
            Self {
                description: tariff.description.clone(),
                peak_rate: Some(tariff.peak_rate.0.0),
                off_peak_rate: Some(tariff.off_peak_rate.0.0),
                alias_of: None,
            }
        }
    }
}
