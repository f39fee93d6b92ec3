use std::{io, path::PathBuf};

use thiserror::Error;

/// Tariff catalog could not be loaded.
///
/// Callers are expected to fall back to [`crate::catalog::Catalog::builtin`].
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("catalog source `{path}` does not exist")]
    Missing { path: PathBuf },

    #[error("failed to read catalog source `{path}`")]
    Read {
        path: PathBuf,

        #[source]
        source: io::Error,
    },

    #[error("unsupported catalog format `{path}`, expected a `.json` or `.toml` file")]
    UnsupportedFormat { path: PathBuf },

    #[error("malformed JSON catalog")]
    Json(#[from] serde_json::Error),

    #[error("malformed TOML catalog")]
    Toml(#[from] toml::de::Error),

    #[error("tariff code `{code}` has no alphanumeric characters")]
    EmptyCode { code: String },

    #[error("tariff code `{code}` collides with `{existing}`")]
    DuplicateCode { code: String, existing: String },

    #[error("tariff `{code}` has no {field}")]
    MissingRate { code: String, field: &'static str },

    #[error("tariff `{code}` has an invalid {field}: {value}")]
    InvalidRate { code: String, field: &'static str, value: f64 },

    #[error("alias `{code}` points to `{target}`, which is an alias itself")]
    AliasChain { code: String, target: String },
}

/// Usage record is not fit for cost computation.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidUsageError {
    #[error("`{field}` is missing")]
    Missing { field: &'static str },

    #[error("`{field}` is negative: {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("`{field}` is not a finite number")]
    NotFinite { field: &'static str },
}

#[derive(Debug, Error, PartialEq)]
pub enum CompareError {
    #[error("invalid usage record")]
    InvalidUsage(#[from] InvalidUsageError),

    #[error("the catalog has no canonical tariffs to compare")]
    EmptyCatalog,
}
