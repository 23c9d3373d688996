//! # Loader
//!
//! Reads the source documents from disk and hands parsed values to the
//! engine. Failures degrade instead of aborting:
//! - a missing or broken catalog leaves an empty catalog, so region keys
//!   fail validation while country-only features keep working
//! - bad catalog and cohort entries are skipped with a warning
//! - missing cohort documents leave an empty cohort
//! - each bad feature document is skipped with a warning
//!
//! Only an unreadable features index is fatal.

use crate::config::DataLayout;
use launchmap_core::{
    CatalogError, CohortError, CohortIndex, FeatureRegistry, FeaturesIndex, RegionCatalog,
};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while reading source documents.
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, error: std::io::Error },
    Json { path: PathBuf, error: serde_json::Error },
    Catalog { path: PathBuf, error: CatalogError },
    Cohort { path: PathBuf, error: CohortError },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, error } => {
                write!(f, "failed to read '{}': {}", path.display(), error)
            }
            LoadError::Json { path, error } => {
                write!(f, "invalid JSON in '{}': {}", path.display(), error)
            }
            LoadError::Catalog { path, error } => {
                write!(f, "invalid region catalog '{}': {}", path.display(), error)
            }
            LoadError::Cohort { path, error } => {
                write!(f, "invalid cohort document '{}': {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { error, .. } => Some(error),
            LoadError::Json { error, .. } => Some(error),
            LoadError::Catalog { error, .. } => Some(error),
            LoadError::Cohort { error, .. } => Some(error),
        }
    }
}

/// Read and parse one JSON document.
pub fn read_json(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|error| LoadError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    serde_json::from_str(&text).map_err(|error| LoadError::Json {
        path: path.to_path_buf(),
        error,
    })
}

// =============================================================================
// INDIVIDUAL DOCUMENTS
// =============================================================================

/// Log entries a source document had to drop.
fn warn_skipped<E: fmt::Display>(path: &Path, skipped: &[E]) {
    for entry in skipped {
        tracing::warn!(file = %path.display(), "skipping entry: {entry}");
    }
}

pub fn load_catalog(path: &Path) -> Result<RegionCatalog, LoadError> {
    let doc = read_json(path)?;
    let (catalog, skipped) =
        RegionCatalog::from_value(&doc).map_err(|error| LoadError::Catalog {
            path: path.to_path_buf(),
            error,
        })?;
    warn_skipped(path, &skipped);
    Ok(catalog)
}

/// Load the catalog, falling back to an empty one on failure.
pub fn load_catalog_or_empty(path: &Path) -> RegionCatalog {
    match load_catalog(path) {
        Ok(catalog) => {
            tracing::info!(regions = catalog.len(), "loaded region catalog");
            catalog
        }
        Err(e) => {
            tracing::error!(
                "{e}; region keys will be rejected until the catalog is available"
            );
            RegionCatalog::empty()
        }
    }
}

/// Load the cohort. Bad entries are skipped; an unreadable membership
/// document leaves the cohort empty and unreadable ids leave it without ids.
pub fn load_cohort_or_empty(members: &Path, ids: &Path) -> CohortIndex {
    let membership = read_json(members).and_then(|doc| {
        CohortIndex::from_membership_value(&doc).map_err(|error| LoadError::Cohort {
            path: members.to_path_buf(),
            error,
        })
    });
    let index = match membership {
        Ok((index, skipped)) => {
            warn_skipped(members, &skipped);
            index
        }
        Err(e) => {
            tracing::warn!("{e}; cohort membership is empty");
            CohortIndex::empty()
        }
    };

    match read_json(ids) {
        Ok(doc) => {
            let (index, skipped) = index.with_ids_value(&doc);
            warn_skipped(ids, &skipped);
            tracing::info!(members = index.member_count(), "loaded cohort");
            index
        }
        Err(e) => {
            tracing::warn!("{e}; cohort ids unavailable");
            index
        }
    }
}

pub fn load_features_index(path: &Path) -> Result<FeaturesIndex, LoadError> {
    let doc = read_json(path)?;
    serde_json::from_value(doc).map_err(|error| LoadError::Json {
        path: path.to_path_buf(),
        error,
    })
}

/// Fetch every indexed feature document and validate it against the catalog.
///
/// Bad documents are logged and skipped.
pub fn discover_features(
    layout: &DataLayout,
    catalog: &RegionCatalog,
) -> Result<FeatureRegistry, LoadError> {
    let index = load_features_index(&layout.features_index())?;

    let documents = index.features.into_iter().map(|filename| {
        let fetched =
            read_json(&layout.feature_document(&filename)).map_err(|e| e.to_string());
        (filename, fetched)
    });
    let (registry, rejected) = FeatureRegistry::discover(documents, catalog);

    for rejection in &rejected {
        tracing::warn!(
            file = %rejection.filename,
            "skipping feature: {}",
            rejection.reason
        );
    }
    if registry.is_empty() {
        tracing::warn!("no valid features found");
    }
    tracing::info!(
        valid = registry.len(),
        skipped = rejected.len(),
        "feature discovery complete"
    );

    Ok(registry)
}

// =============================================================================
// EVERYTHING
// =============================================================================

/// Immutable inputs for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub catalog: RegionCatalog,
    pub cohort: CohortIndex,
    pub registry: FeatureRegistry,
}

/// Load catalog first (validation needs it), then features, then cohort.
pub fn load_all(layout: &DataLayout) -> Result<LoadedData, LoadError> {
    let catalog = load_catalog_or_empty(&layout.catalog);
    let registry = discover_features(layout, &catalog)?;
    let cohort = load_cohort_or_empty(&layout.cohort, &layout.cohort_ids);

    Ok(LoadedData {
        catalog,
        cohort,
        registry,
    })
}
