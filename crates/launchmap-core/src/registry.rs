//! # Feature Registry
//!
//! Discovery of the selectable features.
//!
//! The features index (`{ "features": ["dark-mode.json", ...] }`) names the
//! documents; the caller fetches them and hands the results over. Each
//! document is validated independently. Failures are collected as
//! [`Rejection`]s and never abort discovery of the others.

use crate::catalog::RegionCatalog;
use crate::error::SchemaError;
use crate::schema::FeatureDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The features index document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesIndex {
    pub features: Vec<String>,
}

/// Derive a feature id from its document filename (`dark-mode.json` -> `dark-mode`).
#[must_use]
pub fn feature_id_from_filename(filename: &str) -> String {
    filename
        .strip_suffix(".json")
        .unwrap_or(filename)
        .to_string()
}

/// One validated, selectable feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub id: String,
    pub filename: String,
    pub document: FeatureDocument,
}

impl FeatureRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.document.name
    }

    /// Public summary of the feature.
    #[must_use]
    pub fn summary(&self) -> FeatureSummary {
        FeatureSummary {
            id: self.id.clone(),
            name: self.document.name.clone(),
            description: self.document.description.clone(),
        }
    }
}

/// Id, name and description of a feature, as listed to a UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Why a listed document did not become a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The document could not be fetched or parsed by the caller.
    Unavailable(String),
    Schema(SchemaError),
    /// Another document already produced the same feature id.
    DuplicateId(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "unavailable: {msg}"),
            Self::Schema(err) => write!(f, "invalid schema: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate feature id {id:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub filename: String,
    pub reason: RejectReason,
}

/// Validated features in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRegistry {
    features: Vec<FeatureRecord>,
    by_id: BTreeMap<String, usize>,
}

impl FeatureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate fetched documents into a registry.
    ///
    /// `documents` yields `(filename, fetch result)` pairs in index order.
    /// Returns the registry plus one rejection per skipped document.
    pub fn discover<I>(documents: I, catalog: &RegionCatalog) -> (Self, Vec<Rejection>)
    where
        I: IntoIterator<Item = (String, Result<Value, String>)>,
    {
        let mut registry = Self::new();
        let mut rejected = Vec::new();

        for (filename, fetched) in documents {
            let reason = match fetched {
                Err(msg) => RejectReason::Unavailable(msg),
                Ok(doc) => match FeatureDocument::parse(&doc, catalog) {
                    Err(err) => RejectReason::Schema(err),
                    Ok(document) => {
                        let id = feature_id_from_filename(&filename);
                        if registry.by_id.contains_key(&id) {
                            RejectReason::DuplicateId(id)
                        } else {
                            registry.push(FeatureRecord {
                                id,
                                filename,
                                document,
                            });
                            continue;
                        }
                    }
                },
            };
            rejected.push(Rejection { filename, reason });
        }

        (registry, rejected)
    }

    fn push(&mut self, record: FeatureRecord) {
        self.by_id.insert(record.id.clone(), self.features.len());
        self.features.push(record);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FeatureRecord> {
        self.by_id.get(id).and_then(|&idx| self.features.get(idx))
    }

    /// Features in index order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.features.iter()
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<FeatureSummary> {
        self.features.iter().map(FeatureRecord::summary).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
