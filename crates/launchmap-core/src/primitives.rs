//! # Primitives
//!
//! Key and value types shared by every engine module.
//!
//! - `CountryCode`: two uppercase ASCII letters, validated on construction.
//! - `RegionId`: opaque catalog key, never shaped like a `CountryCode`.
//! - `StatusEntry`: the `{ launched: bool }` payload of a declaration.
//! - `LaunchState`: tri-state view that keeps "unknown" apart from "not launched".

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// COUNTRY CODE
// =============================================================================

/// A two-letter uppercase country identifier (`^[A-Z]{2}$`).
///
/// The inner bytes are private so an invalid code can never be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a country code, returning `None` unless it matches `^[A-Z]{2}$`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.as_bytes() {
            [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Some(Self([*a, *b])),
            _ => None,
        }
    }

    /// Check whether a string has the shape of a country code.
    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_some()
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII uppercase by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_string()
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid country code: {raw:?}")))
    }
}

// =============================================================================
// REGION ID
// =============================================================================

/// An opaque region key resolved only through the `RegionCatalog`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Wrap a region key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Declared rollout status for one key of a feature document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub launched: bool,
}

impl StatusEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(launched: bool) -> Self {
        Self { launched }
    }

    #[must_use]
    pub fn launched() -> Self {
        Self::new(true)
    }

    #[must_use]
    pub fn not_launched() -> Self {
        Self::new(false)
    }
}

/// Tri-state status of a country under the active feature.
///
/// `Unknown` means the country has no resolved entry at all, which is a
/// coverage gap rather than an explicit "not launched".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchState {
    Launched,
    NotLaunched,
    Unknown,
}

impl LaunchState {
    /// Collapse to the binary view, counting `Unknown` as not launched.
    #[must_use]
    pub fn is_launched(self) -> bool {
        matches!(self, Self::Launched)
    }

    /// Human-readable label used by reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Launched => "Launched",
            Self::NotLaunched => "Not Launched",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<StatusEntry> for LaunchState {
    fn from(entry: StatusEntry) -> Self {
        if entry.launched {
            Self::Launched
        } else {
            Self::NotLaunched
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_accepts_two_uppercase_letters() {
        let code = CountryCode::parse("BR");
        assert_eq!(code.map(|c| c.to_string()), Some("BR".to_string()));
    }

    #[test]
    fn country_code_rejects_other_shapes() {
        for raw in ["", "B", "br", "Br", "BRA", "B1", "ÄB", "LATAM"] {
            assert!(CountryCode::parse(raw).is_none(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn country_code_orders_lexicographically() {
        let ar = CountryCode::parse("AR");
        let br = CountryCode::parse("BR");
        assert!(ar < br);
    }

    #[test]
    fn country_code_serde_uses_plain_string() {
        let code = CountryCode::parse("CL");
        let json = serde_json::to_string(&code).ok();
        assert_eq!(json.as_deref(), Some("\"CL\""));

        let back: Result<CountryCode, _> = serde_json::from_str("\"CL\"");
        assert_eq!(back.ok(), code);

        let bad: Result<CountryCode, _> = serde_json::from_str("\"cl\"");
        assert!(bad.is_err());
    }

    #[test]
    fn launch_state_from_entry() {
        assert_eq!(LaunchState::from(StatusEntry::launched()), LaunchState::Launched);
        assert_eq!(
            LaunchState::from(StatusEntry::not_launched()),
            LaunchState::NotLaunched
        );
        assert!(!LaunchState::Unknown.is_launched());
        assert_eq!(LaunchState::NotLaunched.label(), "Not Launched");
    }
}
