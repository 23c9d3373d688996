//! # Query Engine
//!
//! Stateless, total functions over a resolved status map and the cohort
//! index. Every function is safe on an empty map and never fails.
//!
//! Percentages use integer round-half-up; no floating point.

use crate::cohort::{CohortIndex, CohortMemberId};
use crate::primitives::{CountryCode, LaunchState};
use crate::resolver::ResolvedStatusMap;
use serde::Serialize;

// =============================================================================
// POINT LOOKUPS
// =============================================================================

/// Binary launch status. A country absent from the map reads as `false`.
#[must_use]
pub fn status_of(map: &ResolvedStatusMap, code: &CountryCode) -> bool {
    map.get(code).is_some_and(|entry| entry.launched)
}

/// Tri-state launch status, keeping absence distinct from "not launched".
#[must_use]
pub fn launch_state_of(map: &ResolvedStatusMap, code: &CountryCode) -> LaunchState {
    map.state_of(code)
}

// =============================================================================
// AGGREGATES
// =============================================================================

/// `numerator / denominator * scale`, rounded half up. Zero when the
/// denominator is zero.
fn rounded_ratio(numerator: u64, denominator: u64, scale: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let doubled = numerator.saturating_mul(scale).saturating_mul(2);
    doubled.saturating_add(denominator) / denominator.saturating_mul(2)
}

/// Cohort launch progress for one feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CohortStats {
    /// Cohort members that have a resolved entry.
    pub total: u32,
    /// Of those, members that are launched.
    pub launched: u32,
    /// `round(launched / total * 100)`, 0 when `total` is 0.
    pub percentage: u8,
}

/// Compute cohort progress.
///
/// Members with no resolved entry do not count toward `total`.
#[must_use]
pub fn cohort_stats<'a, I>(map: &ResolvedStatusMap, members: I) -> CohortStats
where
    I: IntoIterator<Item = &'a CountryCode>,
{
    let mut total: u32 = 0;
    let mut launched: u32 = 0;
    for code in members {
        if let Some(entry) = map.get(code) {
            total = total.saturating_add(1);
            if entry.launched {
                launched = launched.saturating_add(1);
            }
        }
    }

    CohortStats {
        total,
        launched,
        percentage: rounded_ratio(launched as u64, total as u64, 100).min(100) as u8,
    }
}

/// Cohort progress using the members of a cohort index.
#[must_use]
pub fn cohort_stats_for(map: &ResolvedStatusMap, cohort: &CohortIndex) -> CohortStats {
    cohort_stats(map, cohort.members())
}

/// Feature-wide coverage over every resolved country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureStats {
    pub total_countries: u32,
    pub launched_countries: u32,
    pub not_launched_countries: u32,
    /// Launch rate in tenths of a percent (`625` means 62.5%).
    pub launch_rate_tenths: u16,
}

impl FeatureStats {
    /// Launch rate formatted with one decimal place, e.g. `"62.5"`.
    #[must_use]
    pub fn launch_rate_display(&self) -> String {
        format!(
            "{}.{}",
            self.launch_rate_tenths / 10,
            self.launch_rate_tenths % 10
        )
    }
}

#[must_use]
pub fn feature_stats(map: &ResolvedStatusMap) -> FeatureStats {
    let total = map.len() as u32;
    let launched = map.iter().filter(|(_, entry)| entry.launched).count() as u32;

    FeatureStats {
        total_countries: total,
        launched_countries: launched,
        not_launched_countries: total.saturating_sub(launched),
        launch_rate_tenths: rounded_ratio(launched as u64, total as u64, 1000).min(1000) as u16,
    }
}

// =============================================================================
// MAP SHADING
// =============================================================================

/// Fill category a map renderer paints a country with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shade {
    Launched,
    /// Cohort member that is not launched (or not covered).
    CohortPending,
    Pending,
}

impl Shade {
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Launched => "#16A34A",
            Self::CohortPending => "#DC2626",
            Self::Pending => "#D1D5DB",
        }
    }
}

/// Fill for a country. Uses the binary view: a country with no entry
/// shades the same as one declared not launched.
#[must_use]
pub fn shade_of(map: &ResolvedStatusMap, cohort: &CohortIndex, code: &CountryCode) -> Shade {
    if status_of(map, code) {
        Shade::Launched
    } else if cohort.is_member(code) {
        Shade::CohortPending
    } else {
        Shade::Pending
    }
}

// =============================================================================
// COUNTRY REPORT
// =============================================================================

/// Everything a hover tooltip shows for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryReport {
    pub code: CountryCode,
    pub cohort_member: bool,
    pub cohort_id: Option<CohortMemberId>,
    /// `None` when no feature is selected.
    pub feature: Option<String>,
    pub state: LaunchState,
    pub shade: Shade,
    /// `"<feature>: Launched"`, `"<feature>: Not Launched"`, or a hint to
    /// select a feature.
    pub summary: String,
}

/// Build the report for a country under the given (optional) feature.
///
/// The summary uses the binary view so uncovered countries read as
/// "Not Launched"; `state` keeps the distinction.
#[must_use]
pub fn country_report(
    map: &ResolvedStatusMap,
    cohort: &CohortIndex,
    feature_name: Option<&str>,
    code: &CountryCode,
) -> CountryReport {
    let feature = feature_name.filter(|name| !name.is_empty());
    let summary = match feature {
        Some(name) => {
            let label = if status_of(map, code) {
                LaunchState::Launched.label()
            } else {
                LaunchState::NotLaunched.label()
            };
            format!("{name}: {label}")
        }
        None => String::from("Select a feature to view launch status"),
    };

    CountryReport {
        code: *code,
        cohort_member: cohort.is_member(code),
        cohort_id: cohort.lookup_id(code).cloned(),
        feature: feature.map(str::to_string),
        state: launch_state_of(map, code),
        shade: shade_of(map, cohort, code),
        summary,
    }
}

// =============================================================================
// TESTS
// =============================================================================
