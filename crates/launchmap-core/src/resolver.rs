//! # Status Resolver
//!
//! Flattens a feature's country and region declarations into a
//! country-only status map.
//!
//! Two passes over the validated entries:
//! 1. Region pass: every region entry is expanded to its catalog members.
//! 2. Country pass: every direct country entry is written, unconditionally
//!    overwriting whatever the region pass produced for that code.
//!
//! Direct declarations therefore always beat region-derived ones, whatever
//! order the source document listed them in. Regions are expanded in
//! lexicographic `RegionId` order, so when two overlapping regions disagree
//! the lexicographically last region wins.

use crate::catalog::RegionCatalog;
use crate::primitives::{CountryCode, LaunchState, StatusEntry};
use crate::schema::{FeatureDocument, FeatureKey};
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// RESOLVED STATUS MAP
// =============================================================================

/// Country code to status, derived from one feature document.
///
/// Keys are always country codes; region ids never survive resolution.
/// The map is rebuilt from scratch on each selection, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedStatusMap {
    entries: BTreeMap<CountryCode, StatusEntry>,
}

impl ResolvedStatusMap {
    /// An empty map (no feature selected).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status for a country, if resolved.
    #[must_use]
    pub fn get(&self, code: &CountryCode) -> Option<StatusEntry> {
        self.entries.get(code).copied()
    }

    /// Tri-state status for a country.
    #[must_use]
    pub fn state_of(&self, code: &CountryCode) -> LaunchState {
        self.get(code).map_or(LaunchState::Unknown, LaunchState::from)
    }

    #[must_use]
    pub fn contains(&self, code: &CountryCode) -> bool {
        self.entries.contains_key(code)
    }

    /// Entries in country code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &StatusEntry)> {
        self.entries.iter()
    }

    /// Country codes in order.
    pub fn codes(&self) -> impl Iterator<Item = &CountryCode> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CountryCode, StatusEntry)> for ResolvedStatusMap {
    fn from_iter<T: IntoIterator<Item = (CountryCode, StatusEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve validated entries against the catalog.
///
/// Assumes validated input: a region with no catalog entry cannot occur
/// after validation and contributes nothing if it does.
#[must_use]
pub fn resolve(
    entries: &BTreeMap<FeatureKey, StatusEntry>,
    catalog: &RegionCatalog,
) -> ResolvedStatusMap {
    let mut working = BTreeMap::new();

    // Region pass
    for (key, entry) in entries {
        if let FeatureKey::Region(region) = key {
            for code in catalog.members_of(region.as_str()).unwrap_or_default() {
                working.insert(*code, StatusEntry::new(entry.launched));
            }
        }
    }

    // Country pass: direct declarations overwrite region-derived values
    for (key, entry) in entries {
        if let FeatureKey::Country(code) = key {
            working.insert(*code, *entry);
        }
    }

    ResolvedStatusMap { entries: working }
}

/// Resolve a whole validated document.
#[must_use]
pub fn resolve_document(doc: &FeatureDocument, catalog: &RegionCatalog) -> ResolvedStatusMap {
    resolve(&doc.entries, catalog)
}

// =============================================================================
// TESTS
// =============================================================================
