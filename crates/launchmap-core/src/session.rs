//! # Session
//!
//! The current feature selection as an immutable value.
//!
//! A selection change builds a brand-new `Session` (fresh resolution from
//! the immutable source document) instead of mutating the old one. Holders
//! that share a session across threads swap the whole value, so readers see
//! either the previous or the next selection, never a partial map.

use crate::catalog::RegionCatalog;
use crate::cohort::CohortIndex;
use crate::error::{LaunchMapError, Result};
use crate::primitives::{CountryCode, LaunchState};
use crate::query::{self, CohortStats, CountryReport, FeatureStats};
use crate::registry::FeatureRegistry;
use crate::resolver::{resolve_document, ResolvedStatusMap};
use serde::Serialize;

/// The selected feature and its resolved map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFeature {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip)]
    pub resolved: ResolvedStatusMap,
}

/// Selection state. `Session::default()` is the "nothing selected" state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    active: Option<ActiveFeature>,
    empty: ResolvedStatusMap,
}

impl Session {
    /// The deselected state: no feature, empty map.
    #[must_use]
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Build the session for a newly selected feature.
    pub fn select(
        registry: &FeatureRegistry,
        catalog: &RegionCatalog,
        feature_id: &str,
    ) -> Result<Self> {
        let record = registry
            .get(feature_id)
            .ok_or_else(|| LaunchMapError::UnknownFeature(feature_id.to_string()))?;

        Ok(Self {
            active: Some(ActiveFeature {
                id: record.id.clone(),
                name: record.document.name.clone(),
                description: record.document.description.clone(),
                resolved: resolve_document(&record.document, catalog),
            }),
            empty: ResolvedStatusMap::new(),
        })
    }

    /// Select a feature by id, or clear the selection for `None` / `""`.
    pub fn from_selection(
        registry: &FeatureRegistry,
        catalog: &RegionCatalog,
        selection: Option<&str>,
    ) -> Result<Self> {
        match selection.filter(|id| !id.is_empty()) {
            Some(id) => Self::select(registry, catalog, id),
            None => Ok(Self::cleared()),
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveFeature> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn active_feature_id(&self) -> Option<&str> {
        self.active.as_ref().map(|f| f.id.as_str())
    }

    #[must_use]
    pub fn feature_name(&self) -> Option<&str> {
        self.active.as_ref().map(|f| f.name.as_str())
    }

    /// The resolved map, empty when nothing is selected.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedStatusMap {
        self.active.as_ref().map_or(&self.empty, |f| &f.resolved)
    }

    #[must_use]
    pub fn status_of(&self, code: &CountryCode) -> bool {
        query::status_of(self.resolved(), code)
    }

    #[must_use]
    pub fn launch_state_of(&self, code: &CountryCode) -> LaunchState {
        query::launch_state_of(self.resolved(), code)
    }

    /// Cohort progress; all zeros when nothing is selected.
    #[must_use]
    pub fn cohort_stats(&self, cohort: &CohortIndex) -> CohortStats {
        if self.active.is_none() {
            return CohortStats::default();
        }
        query::cohort_stats_for(self.resolved(), cohort)
    }

    #[must_use]
    pub fn feature_stats(&self) -> FeatureStats {
        query::feature_stats(self.resolved())
    }

    #[must_use]
    pub fn country_report(&self, cohort: &CohortIndex, code: &CountryCode) -> CountryReport {
        query::country_report(self.resolved(), cohort, self.feature_name(), code)
    }
}

// =============================================================================
// TESTS
// =============================================================================
