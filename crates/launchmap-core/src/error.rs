//! # Error Types
//!
//! Structural failures only. Lookup misses are never errors: queries return
//! `Option` or a default instead.

use thiserror::Error;

/// Why a raw feature document was rejected.
///
/// Rejection is fail-closed: one bad entry rejects the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("missing or non-string `name`")]
    MissingName,

    #[error("`name` is empty")]
    EmptyName,

    #[error("missing or non-object `countries`")]
    MissingCountries,

    /// Key is neither a country code nor a region known to the catalog.
    #[error("invalid key {0:?}: not a country code or known region")]
    InvalidKey(String),

    /// Value is not an object with a boolean `launched` field.
    #[error("invalid entry for {0:?}: expected an object with boolean `launched`")]
    InvalidEntry(String),
}

/// A region catalog document, or one of its entries, could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog has no `regions` object")]
    MissingRegions,

    /// Region ids must never be shaped like country codes.
    #[error("region id {0:?} collides with the country code pattern")]
    RegionShapedLikeCountry(String),

    #[error("region {0:?} has no `countries` list")]
    MissingMembers(String),

    #[error("region {region:?} lists invalid country code {code:?}")]
    InvalidMember { region: String, code: String },
}

/// Cohort membership or id documents, or one of their entries, could not be loaded.
#[derive(Debug, Error)]
pub enum CohortError {
    #[error("cohort document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cohort membership document has no `countries` list")]
    MissingCountries,

    #[error("invalid cohort country code {0:?}")]
    InvalidCode(String),

    #[error("cohort id document is not a JSON object")]
    IdsNotAnObject,

    #[error("cohort sub-group {group:?} has an invalid entry for {key:?}")]
    InvalidId { group: String, key: String },
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum LaunchMapError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("cohort error: {0}")]
    Cohort(#[from] CohortError),

    #[error("feature {0:?} not found")]
    UnknownFeature(String),
}

pub type Result<T> = std::result::Result<T, LaunchMapError>;
