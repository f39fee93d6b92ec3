mod builtin;
mod code;
mod definition;
mod document;
mod resolution;
mod shared;

use std::{collections::HashMap, fs, io, path::Path};

pub use self::{
    code::TariffKey,
    definition::TariffDefinition,
    document::Document,
    resolution::{MatchKind, Resolution},
    shared::SharedCatalog,
};
use crate::{error::CatalogLoadError, prelude::*};

/// Read-only table of tariff definitions in the source order.
#[must_use]
#[derive(Debug)]
pub struct Catalog {
    version: Option<String>,
    tariffs: Vec<TariffDefinition>,

    /// Normalized code to the index in [`Catalog::tariffs`].
    index: HashMap<TariffKey, usize>,
}

impl Catalog {
    /// Build the catalog and check its invariants:
    ///
    /// - normalized codes are non-empty and unique;
    /// - canonical rates are finite and non-negative;
    /// - an alias never points to another alias.
    ///
    /// Aliases pointing to absent codes are tolerated and resolve to the unknown tariff.
    pub fn try_new(
        version: Option<String>,
        tariffs: Vec<TariffDefinition>,
    ) -> Result<Self, CatalogLoadError> {
        let mut index = HashMap::with_capacity(tariffs.len());
        for (i, tariff) in tariffs.iter().enumerate() {
            let key = tariff.key();
            if key.is_empty() {
                return Err(CatalogLoadError::EmptyCode { code: tariff.code.clone() });
            }
            if let Some(existing) = index.insert(key, i) {
                return Err(CatalogLoadError::DuplicateCode {
                    code: tariff.code.clone(),
                    existing: tariffs[existing].code.clone(),
                });
            }
            if !tariff.is_alias() {
                let rates = [("peakRate", tariff.peak_rate), ("offPeakRate", tariff.off_peak_rate)];
                for (field, rate) in rates {
                    if !rate.is_finite() || rate.is_negative() {
                        return Err(CatalogLoadError::InvalidRate {
                            code: tariff.code.clone(),
                            field,
                            value: rate.0.0,
                        });
                    }
                }
            }
        }

        let this = Self { version, tariffs, index };
        for tariff in &this.tariffs {
            let Some(target_code) = &tariff.alias_of else { continue };
            match this.get(&TariffKey::normalize(target_code)) {
                Some(target) if target.is_alias() => {
                    return Err(CatalogLoadError::AliasChain {
                        code: tariff.code.clone(),
                        target: target.code.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    warn!(code = %tariff.code, %target_code, "alias points to an absent tariff");
                }
            }
        }
        Ok(this)
    }

    /// Load the catalog from a JSON or TOML file, depending on the extension.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let text = fs::read_to_string(path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => CatalogLoadError::Missing { path: path.to_path_buf() },
            _ => CatalogLoadError::Read { path: path.to_path_buf(), source: error },
        })?;
        let document = match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => {
                Document::from_json_str(&text)?
            }
            Some(extension) if extension.eq_ignore_ascii_case("toml") => {
                Document::from_toml_str(&text)?
            }
            _ => return Err(CatalogLoadError::UnsupportedFormat { path: path.to_path_buf() }),
        };
        let this = Self::try_from(document)?;
        info!(version = ?this.version, n_tariffs = this.tariffs.len(), "loaded the catalog");
        Ok(this)
    }

    /// Load the catalog, or fall back to the built-in one when the source is absent or broken.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("no catalog source configured, using the built-in catalog");
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(error) => {
                let error = Error::from(error);
                warn!("falling back to the built-in catalog: {error:#}");
                Self::builtin()
            }
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// All entries, including aliases, in the source order.
    pub fn iter(&self) -> impl Iterator<Item = &TariffDefinition> {
        self.tariffs.iter()
    }

    /// Non-alias entries in the source order.
    pub fn canonical(&self) -> impl Iterator<Item = &TariffDefinition> {
        self.tariffs.iter().filter(|tariff| !tariff.is_alias())
    }

    pub fn get(&self, key: &TariffKey) -> Option<&TariffDefinition> {
        self.index.get(key).map(|i| &self.tariffs[*i])
    }

    /// Follow the alias, if any. Returns [`None`] for dangling aliases.
    fn canonicalize<'a>(&'a self, tariff: &'a TariffDefinition) -> Option<&'a TariffDefinition> {
        match &tariff.alias_of {
            Some(target_code) => self.get(&TariffKey::normalize(target_code)),
            None => Some(tariff),
        }
    }

    /// Resolve a possibly corrupted tariff code.
    ///
    /// Tries, in order: exact normalized match, alias redirection, and substring match
    /// in either direction (first match in the source order wins). Gives up with
    /// the [unknown tariff][Resolution::unknown], which is not an error.
    pub fn resolve(&self, code: &str) -> Resolution<'_> {
        let key = TariffKey::normalize(code);
        if key.is_empty() {
            return Resolution::unknown();
        }

        if let Some(tariff) = self.get(&key) {
            if !tariff.is_alias() {
                return Resolution { tariff, kind: MatchKind::Exact };
            }
            if let Some(canonical) = self.canonicalize(tariff) {
                return Resolution { tariff: canonical, kind: MatchKind::Alias };
            }
        }

        self.tariffs
            .iter()
            .filter(|tariff| tariff.key().overlaps(&key))
            .find_map(|tariff| self.canonicalize(tariff))
            .map_or_else(Resolution::unknown, |tariff| Resolution {
                tariff,
                kind: MatchKind::Substring,
            })
    }

    pub fn to_document(&self) -> Document {
        Document {
            version: self.version.clone(),
            tariffs: self
                .tariffs
                .iter()
                .map(|tariff| (tariff.code.clone(), tariff.into()))
                .collect(),
        }
    }
}

impl TryFrom<Document> for Catalog {
    type Error = CatalogLoadError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let tariffs = document
            .tariffs
            .into_iter()
            .map(|(code, entry)| entry.try_into_definition(code))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(document.version, tariffs)
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::quantity::rate::KilowattHourRate;

    fn catalog() -> Catalog {
        Catalog::try_new(
            None,
            vec![
                TariffDefinition::builder()
                    .code("E1")
                    .description("Flat")
                    .peak_rate(0.31)
                    .off_peak_rate(0.31)
                    .build(),
                TariffDefinition::builder()
                    .code("ETOUB")
                    .description("Time-of-Use")
                    .peak_rate(0.42)
                    .off_peak_rate(0.33)
                    .build(),
                TariffDefinition::builder().code("ETOIJ3").alias_of("ETOUB").build(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_exact() {
        let catalog = catalog();
        let resolution = catalog.resolve("e-tou-b");
        assert_eq!(resolution.kind, MatchKind::Exact);
        assert_eq!(resolution.tariff.code, "ETOUB");
    }

    #[test]
    fn test_resolve_alias() {
        let catalog = catalog();
        let resolution = catalog.resolve("ETOIJ3");
        assert_eq!(resolution.kind, MatchKind::Alias);
        assert_eq!(resolution.tariff, catalog.resolve("ETOUB").tariff);
        assert_eq!(resolution.tariff.peak_rate, KilowattHourRate::from(0.42));
    }

    #[test]
    fn test_resolve_substring() {
        let catalog = catalog();

        // Candidate contains the catalog code:
        let resolution = catalog.resolve("ETOUB3");
        assert_eq!(resolution.kind, MatchKind::Substring);
        assert_eq!(resolution.tariff.code, "ETOUB");

        // Candidate is contained in the catalog code:
        let resolution = catalog.resolve("TOU");
        assert_eq!(resolution.kind, MatchKind::Substring);
        assert_eq!(resolution.tariff.code, "ETOUB");

        // Alias found by substring redirects to the canonical tariff:
        let resolution = catalog.resolve("ETOIJ");
        assert_eq!(resolution.kind, MatchKind::Substring);
        assert_eq!(resolution.tariff.code, "ETOUB");
    }

    #[test]
    fn test_resolve_substring_first_in_source_order() {
        let catalog = Catalog::try_new(
            None,
            vec![
                TariffDefinition::builder().code("EV2A").peak_rate(0.35).off_peak_rate(0.27).build(),
                TariffDefinition::builder().code("EV2B").peak_rate(0.1).off_peak_rate(0.1).build(),
            ],
        )
        .unwrap();
        assert_eq!(catalog.resolve("EV2").tariff.code, "EV2A");
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = catalog();
        for code in ["XYZ", "", "---"] {
            let resolution = catalog.resolve(code);
            assert_eq!(resolution.kind, MatchKind::Unknown, "{code:?}");
            assert!(resolution.is_unknown());
            assert_eq!(resolution.tariff.peak_rate, KilowattHourRate::ZERO);
        }
    }

    #[test]
    fn test_dangling_alias_resolves_to_unknown() {
        let catalog = Catalog::try_new(
            None,
            vec![TariffDefinition::builder().code("ETOIJ3").alias_of("ETOUB").build()],
        )
        .unwrap();
        assert!(catalog.resolve("ETOIJ3").is_unknown());
        assert_eq!(catalog.canonical().count(), 0);
    }

    #[test]
    fn test_alias_chain_rejected() {
        let result = Catalog::try_new(
            None,
            vec![
                TariffDefinition::builder().code("A").peak_rate(0.1).off_peak_rate(0.1).build(),
                TariffDefinition::builder().code("B").alias_of("A").build(),
                TariffDefinition::builder().code("C").alias_of("B").build(),
            ],
        );
        assert!(matches!(result, Err(CatalogLoadError::AliasChain { .. })));
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let result = Catalog::try_new(
            None,
            vec![
                TariffDefinition::builder().code("A").alias_of("B").build(),
                TariffDefinition::builder().code("B").alias_of("A").build(),
            ],
        );
        assert!(matches!(result, Err(CatalogLoadError::AliasChain { .. })));

        let result =
            Catalog::try_new(None, vec![TariffDefinition::builder().code("A").alias_of("a").build()]);
        assert!(matches!(result, Err(CatalogLoadError::AliasChain { .. })));
    }

    #[test]
    fn test_duplicate_normalized_code_rejected() {
        let result = Catalog::try_new(
            None,
            vec![
                TariffDefinition::builder().code("E-TOU-B").peak_rate(0.1).off_peak_rate(0.1).build(),
                TariffDefinition::builder().code("ETOUB").peak_rate(0.2).off_peak_rate(0.2).build(),
            ],
        );
        assert!(matches!(result, Err(CatalogLoadError::DuplicateCode { .. })));
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let result = Catalog::try_new(
            None,
            vec![TariffDefinition::builder().code("E1").peak_rate(-0.1).off_peak_rate(0.1).build()],
        );
        assert!(matches!(result, Err(CatalogLoadError::InvalidRate { field: "peakRate", .. })));

        let result = Catalog::try_new(
            None,
            vec![
                TariffDefinition::builder().code("E1").peak_rate(0.1).off_peak_rate(f64::NAN).build(),
            ],
        );
        assert!(matches!(result, Err(CatalogLoadError::InvalidRate { field: "offPeakRate", .. })));
    }

    #[test]
    fn test_load_missing() {
        let path = env::temp_dir().join("rate-scout-definitely-missing-catalog.json");
        assert!(matches!(Catalog::load(&path), Err(CatalogLoadError::Missing { .. })));
    }

    #[test]
    fn test_load_unsupported_format() -> Result {
        let path = env::temp_dir().join(format!("rate-scout-{}.yaml", std::process::id()));
        fs::write(&path, "E1: {}")?;
        let result = Catalog::load(&path);
        fs::remove_file(&path)?;
        assert!(matches!(result, Err(CatalogLoadError::UnsupportedFormat { .. })));
        Ok(())
    }

    #[test]
    fn test_load_or_builtin_falls_back() {
        let path = env::temp_dir().join("rate-scout-definitely-missing-catalog.toml");
        let catalog = Catalog::load_or_builtin(Some(&path));
        assert_eq!(catalog.iter().count(), Catalog::builtin().iter().count());
        assert!(Catalog::load_or_builtin(None).canonical().count() >= 1);
    }

    #[test]
    fn test_document_round_trip_keeps_aliases() -> Result {
        let catalog = catalog();
        let text = serde_json::to_string(&catalog.to_document())?;
        let reloaded = Catalog::try_from(Document::from_json_str(&text)?)?;
        assert_eq!(reloaded.iter().collect::<Vec<_>>(), catalog.iter().collect::<Vec<_>>());
        Ok(())
    }
}
