//! # Cohort Index
//!
//! Membership of the privileged "MyAlpha" cohort plus the member-id lookup
//! across its named sub-groups.
//!
//! Two source documents:
//! - membership: `{ "countries": ["US", "CA", ...] }`
//! - ids: `{ "<sub-group>": { "<CountryCode>": <id>, ... }, ... }`
//!
//! Sub-groups are searched in [`SUBGROUP_ORDER`] and the first match wins.
//! The order is part of the contract: sub-groups may overlap in malformed
//! data and lookups must stay reproducible.

use crate::error::CohortError;
use crate::primitives::CountryCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Fixed search order for cohort id sub-groups.
pub const SUBGROUP_ORDER: [&str; 6] = [
    "individual_countries",
    "latam_countries",
    "africa_countries",
    "europe_countries",
    "aap_countries",
    "mena_countries",
];

/// Identifier of a country inside the cohort program.
///
/// Source documents carry either strings or numbers; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CohortMemberId(String);

impl CohortMemberId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for CohortMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only cohort membership and id index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortIndex {
    members: BTreeSet<CountryCode>,
    /// One id table per sub-group, stored in `SUBGROUP_ORDER`.
    id_groups: Vec<(String, BTreeMap<CountryCode, CohortMemberId>)>,
}

impl CohortIndex {
    /// An index with no members and no ids.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from membership codes only.
    pub fn from_members<I, C>(codes: I) -> Result<Self, CohortError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut members = BTreeSet::new();
        for raw in codes {
            let raw = raw.as_ref();
            let code =
                CountryCode::parse(raw).ok_or_else(|| CohortError::InvalidCode(raw.to_string()))?;
            members.insert(code);
        }
        Ok(Self {
            members,
            id_groups: Vec::new(),
        })
    }

    /// Parse the membership document.
    ///
    /// Only a missing `countries` list fails the document. Entries that are
    /// not country codes are skipped and returned alongside the index.
    pub fn from_membership_value(doc: &Value) -> Result<(Self, Vec<CohortError>), CohortError> {
        let countries = doc
            .get("countries")
            .and_then(Value::as_array)
            .ok_or(CohortError::MissingCountries)?;

        let mut members = BTreeSet::new();
        let mut skipped = Vec::new();
        for entry in countries {
            match entry.as_str().and_then(CountryCode::parse) {
                Some(code) => {
                    members.insert(code);
                }
                None => skipped.push(CohortError::InvalidCode(match entry {
                    Value::String(raw) => raw.clone(),
                    other => other.to_string(),
                })),
            }
        }

        let index = Self {
            members,
            id_groups: Vec::new(),
        };
        Ok((index, skipped))
    }

    pub fn from_membership_str(text: &str) -> Result<(Self, Vec<CohortError>), CohortError> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_membership_value(&doc)
    }

    /// Attach the id document.
    ///
    /// Missing sub-groups are empty and sub-groups outside `SUBGROUP_ORDER`
    /// are ignored. An entry with a bad key or an empty or non-scalar id is
    /// skipped, so lookups for that country fall through to later
    /// sub-groups. Skipped entries are returned with the index.
    pub fn with_ids_value(mut self, doc: &Value) -> (Self, Vec<CohortError>) {
        let mut skipped = Vec::new();
        if !doc.is_object() {
            skipped.push(CohortError::IdsNotAnObject);
        }

        let mut id_groups = Vec::with_capacity(SUBGROUP_ORDER.len());
        for group in SUBGROUP_ORDER {
            let mut table = BTreeMap::new();
            if let Some(entries) = doc.get(group).and_then(Value::as_object) {
                for (key, value) in entries {
                    let parsed = CountryCode::parse(key)
                        .zip(CohortMemberId::from_value(value));
                    match parsed {
                        Some((code, id)) => {
                            table.insert(code, id);
                        }
                        None => skipped.push(CohortError::InvalidId {
                            group: group.to_string(),
                            key: key.clone(),
                        }),
                    }
                }
            }
            id_groups.push((group.to_string(), table));
        }
        self.id_groups = id_groups;
        (self, skipped)
    }

    /// Check whether a country belongs to the cohort.
    #[must_use]
    pub fn is_member(&self, code: &CountryCode) -> bool {
        self.members.contains(code)
    }

    /// First id found for a country across sub-groups in priority order.
    #[must_use]
    pub fn lookup_id(&self, code: &CountryCode) -> Option<&CohortMemberId> {
        self.id_groups.iter().find_map(|(_, table)| table.get(code))
    }

    /// Name of the sub-group that answers `lookup_id` for a country.
    #[must_use]
    pub fn subgroup_of(&self, code: &CountryCode) -> Option<&str> {
        self.id_groups
            .iter()
            .find(|(_, table)| table.contains_key(code))
            .map(|(name, _)| name.as_str())
    }

    /// Cohort members in code order.
    pub fn members(&self) -> impl Iterator<Item = &CountryCode> {
        self.members.iter()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
