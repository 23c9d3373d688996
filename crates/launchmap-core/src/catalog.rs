//! # Region Catalog
//!
//! Read-only mapping from `RegionId` to its ordered member country codes.
//!
//! Loaded once from a document of the form
//! `{ "regions": { "<RegionId>": { "countries": ["BR", "AR", ...] } } }`.
//! Bad entries are dropped one by one and reported to the caller; only a
//! document without a `regions` object fails as a whole.
//! There are no mutation operations after load. When loading fails the
//! caller falls back to [`RegionCatalog::empty`], which makes every region
//! key invalid at validation time (fail-closed) while country-only documents
//! stay usable.

use crate::error::CatalogError;
use crate::primitives::{CountryCode, RegionId};
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::BTreeMap;

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Region membership table.
///
/// `BTreeMap` keeps iteration in lexicographic `RegionId` order, which is
/// the order the resolver expands regions in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: BTreeMap<RegionId, Vec<CountryCode>>,
}

impl RegionCatalog {
    /// A catalog with no regions.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog document from JSON text.
    pub fn from_json_str(text: &str) -> Result<(Self, Vec<CatalogError>), CatalogError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Build a catalog from an already-parsed document.
    ///
    /// Only a missing `regions` object fails the document. A region without
    /// a `countries` list, or whose id is shaped like a country code, is
    /// dropped; an invalid member code is dropped from its region. Every
    /// dropped entry is returned alongside the catalog.
    pub fn from_value(doc: &Value) -> Result<(Self, Vec<CatalogError>), CatalogError> {
        let regions = doc
            .get("regions")
            .and_then(Value::as_object)
            .ok_or(CatalogError::MissingRegions)?;

        let mut catalog = Self::empty();
        let mut skipped = Vec::new();
        for (id, region) in regions {
            let Some(members) = region.get("countries").and_then(Value::as_array) else {
                skipped.push(CatalogError::MissingMembers(id.clone()));
                continue;
            };

            let codes = members.iter().map(|member| match member {
                Value::String(raw) => raw.clone(),
                other => other.to_string(),
            });
            match catalog.insert_region(id, codes) {
                Ok(dropped) => skipped.extend(dropped),
                Err(err) => skipped.push(err),
            }
        }
        Ok((catalog, skipped))
    }

    /// Build a catalog from `(region, members)` pairs.
    ///
    /// Strict: the first invalid region id or member code is an error.
    pub fn from_regions<I, R, M, C>(regions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (R, M)>,
        R: AsRef<str>,
        M: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut catalog = Self::empty();
        for (id, members) in regions {
            let codes = members.into_iter().map(|c| c.as_ref().to_string());
            let dropped = catalog.insert_region(id.as_ref(), codes)?;
            if let Some(err) = dropped.into_iter().next() {
                return Err(err);
            }
        }
        Ok(catalog)
    }

    /// Insert one region, returning the member codes that were dropped.
    fn insert_region(
        &mut self,
        id: &str,
        members: impl Iterator<Item = String>,
    ) -> Result<Vec<CatalogError>, CatalogError> {
        if CountryCode::is_valid(id) {
            return Err(CatalogError::RegionShapedLikeCountry(id.to_string()));
        }

        let mut codes = Vec::new();
        let mut dropped = Vec::new();
        for raw in members {
            match CountryCode::parse(&raw) {
                Some(code) => codes.push(code),
                None => dropped.push(CatalogError::InvalidMember {
                    region: id.to_string(),
                    code: raw,
                }),
            }
        }

        self.regions.insert(RegionId::new(id), codes);
        Ok(dropped)
    }

    /// Ordered members of a region, or `None` for an unknown region.
    #[must_use]
    pub fn members_of(&self, region: &str) -> Option<&[CountryCode]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    /// Check whether a region id is known.
    #[must_use]
    pub fn contains(&self, region: &str) -> bool {
        self.regions.contains_key(region)
    }

    /// All regions in lexicographic id order.
    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &[CountryCode])> {
        self.regions.iter().map(|(id, members)| (id, members.as_slice()))
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
