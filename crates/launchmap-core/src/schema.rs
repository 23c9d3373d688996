//! # Schema Validator
//!
//! Decides whether a raw feature document can be trusted.
//!
//! A document is accepted only when ALL of these hold:
//! - it is a JSON object with a non-empty string `name`
//! - it has an object `countries`
//! - every key of `countries` is a country code or a region known to the catalog
//! - every value is an object carrying a boolean `launched`
//!
//! Any violation rejects the whole document. Validation is a pure predicate
//! with no side effects; callers decide how to report rejections.

use crate::catalog::RegionCatalog;
use crate::error::SchemaError;
use crate::primitives::{CountryCode, RegionId, StatusEntry};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// =============================================================================
// TYPES
// =============================================================================

/// A classified key of the `countries` object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeatureKey {
    Country(CountryCode),
    Region(RegionId),
}

impl FeatureKey {
    /// Classify a raw key against the catalog.
    ///
    /// Catalog regions are checked first; region ids never take the shape of
    /// a country code, so the two spaces cannot overlap.
    #[must_use]
    pub fn classify(raw: &str, catalog: &RegionCatalog) -> Option<Self> {
        if catalog.contains(raw) {
            Some(Self::Region(RegionId::new(raw)))
        } else {
            CountryCode::parse(raw).map(Self::Country)
        }
    }
}

/// A validated feature document.
///
/// Immutable once built. Entries are keyed by classified keys so the
/// resolver never has to re-interpret raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDocument {
    pub name: String,
    pub description: Option<String>,
    pub entries: BTreeMap<FeatureKey, StatusEntry>,
}

impl FeatureDocument {
    /// Validate and convert a raw document.
    pub fn parse(doc: &Value, catalog: &RegionCatalog) -> Result<Self, SchemaError> {
        let object = doc.as_object().ok_or(SchemaError::NotAnObject)?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or(SchemaError::MissingName)?;
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let countries = object
            .get("countries")
            .and_then(Value::as_object)
            .ok_or(SchemaError::MissingCountries)?;

        // Non-string descriptions are ignored rather than rejected.
        let description = object
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            description,
            entries: parse_entries(countries, catalog)?,
        })
    }

    /// Number of declared keys (countries plus regions).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Check whether any declaration references a region.
    #[must_use]
    pub fn has_regions(&self) -> bool {
        self.entries
            .keys()
            .any(|key| matches!(key, FeatureKey::Region(_)))
    }
}

fn parse_entries(
    countries: &Map<String, Value>,
    catalog: &RegionCatalog,
) -> Result<BTreeMap<FeatureKey, StatusEntry>, SchemaError> {
    let mut entries = BTreeMap::new();
    for (raw_key, value) in countries {
        let key = FeatureKey::classify(raw_key, catalog)
            .ok_or_else(|| SchemaError::InvalidKey(raw_key.clone()))?;

        let launched = value
            .as_object()
            .and_then(|entry| entry.get("launched"))
            .and_then(Value::as_bool)
            .ok_or_else(|| SchemaError::InvalidEntry(raw_key.clone()))?;

        entries.insert(key, StatusEntry::new(launched));
    }
    Ok(entries)
}

// =============================================================================
// PREDICATES
// =============================================================================

/// Explain why a document would be rejected, or `Ok(())` when it is valid.
pub fn check(doc: &Value, catalog: &RegionCatalog) -> Result<(), SchemaError> {
    FeatureDocument::parse(doc, catalog).map(|_| ())
}

/// Pure acceptance predicate.
#[must_use]
pub fn validate(doc: &Value, catalog: &RegionCatalog) -> bool {
    check(doc, catalog).is_ok()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn latam() -> RegionCatalog {
        RegionCatalog::from_regions([("LATAM", vec!["BR", "AR", "CL"])]).unwrap_or_default()
    }

    #[test]
    fn accepts_country_and_region_keys() {
        let doc = json!({
            "name": "Dark Mode",
            "description": "Night theme",
            "countries": {
                "LATAM": { "launched": true },
                "BR": { "launched": false }
            }
        });
        assert!(validate(&doc, &latam()));

        let parsed = FeatureDocument::parse(&doc, &latam());
        assert!(parsed.is_ok());
        let parsed = parsed.ok();
        assert_eq!(parsed.as_ref().map(|d| d.entry_count()), Some(2));
        assert_eq!(parsed.as_ref().map(|d| d.has_regions()), Some(true));
        assert_eq!(
            parsed.and_then(|d| d.description),
            Some("Night theme".to_string())
        );
    }

    #[test]
    fn accepts_empty_countries_object() {
        let doc = json!({ "name": "Nothing yet", "countries": {} });
        assert!(validate(&doc, &RegionCatalog::empty()));
    }

    #[test]
    fn rejects_non_objects() {
        for doc in [json!(null), json!([]), json!("feature"), json!(3)] {
            assert_eq!(check(&doc, &latam()), Err(SchemaError::NotAnObject));
        }
    }

    #[test]
    fn rejects_missing_or_empty_name() {
        let missing = json!({ "countries": {} });
        let wrong_type = json!({ "name": 7, "countries": {} });
        let empty = json!({ "name": "", "countries": {} });

        assert_eq!(check(&missing, &latam()), Err(SchemaError::MissingName));
        assert_eq!(check(&wrong_type, &latam()), Err(SchemaError::MissingName));
        assert_eq!(check(&empty, &latam()), Err(SchemaError::EmptyName));
    }

    #[test]
    fn rejects_missing_countries() {
        let missing = json!({ "name": "X" });
        let wrong_type = json!({ "name": "X", "countries": ["BR"] });

        assert_eq!(check(&missing, &latam()), Err(SchemaError::MissingCountries));
        assert_eq!(check(&wrong_type, &latam()), Err(SchemaError::MissingCountries));
    }

    #[test]
    fn rejects_unknown_key_for_whole_document() {
        let doc = json!({
            "name": "X",
            "countries": {
                "BR": { "launched": true },
                "Brazil": { "launched": true }
            }
        });
        assert_eq!(
            check(&doc, &latam()),
            Err(SchemaError::InvalidKey("Brazil".to_string()))
        );
    }

    #[test]
    fn rejects_lowercase_country_code() {
        let doc = json!({ "name": "X", "countries": { "br": { "launched": true } } });
        assert!(!validate(&doc, &latam()));
    }

    #[test]
    fn region_keys_fail_closed_without_catalog() {
        let doc = json!({ "name": "X", "countries": { "LATAM": { "launched": true } } });
        assert!(validate(&doc, &latam()));
        assert_eq!(
            check(&doc, &RegionCatalog::empty()),
            Err(SchemaError::InvalidKey("LATAM".to_string()))
        );
    }

    #[test]
    fn rejects_non_boolean_launched() {
        for entry in [
            json!({ "launched": "yes" }),
            json!({ "launched": 1 }),
            json!({ "launched": null }),
            json!({}),
            json!(true),
        ] {
            let doc = json!({ "name": "X", "countries": { "US": entry } });
            assert_eq!(
                check(&doc, &latam()),
                Err(SchemaError::InvalidEntry("US".to_string()))
            );
        }
    }

    #[test]
    fn non_string_description_is_ignored() {
        let doc = json!({ "name": "X", "description": 5, "countries": {} });
        let parsed = FeatureDocument::parse(&doc, &latam()).ok();
        assert_eq!(parsed.map(|d| d.description), Some(None));
    }

    #[test]
    fn extra_entry_fields_are_tolerated() {
        let doc = json!({
            "name": "X",
            "countries": { "US": { "launched": true, "note": "GA" } }
        });
        assert!(validate(&doc, &latam()));
    }
}
