//! # launchmap-core
//!
//! Deterministic rollout status resolution.
//!
//! Resolves, per country, a binary launch status plus membership in the
//! "MyAlpha" cohort from loosely structured feature documents that mix
//! per-country and per-region declarations.
//!
//! ```text
//! raw JSON ──► schema ──► resolver (+ catalog) ──► ResolvedStatusMap ──► query (+ cohort)
//! ```
//!
//! ## Guarantees
//!
//! - Deterministic: `BTreeMap`/`BTreeSet` only, integer arithmetic only.
//! - Order-independent: direct country entries always override region
//!   expansion, whatever order the source object lists them in.
//! - Total queries: missing keys produce defaults, never errors.
//! - No I/O: documents arrive already parsed; loading is the caller's job.

pub mod catalog;
pub mod cohort;
pub mod error;
pub mod names;
pub mod primitives;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod session;

pub use catalog::RegionCatalog;
pub use cohort::{CohortIndex, CohortMemberId, SUBGROUP_ORDER};
pub use error::{CatalogError, CohortError, LaunchMapError, Result, SchemaError};
pub use names::resolve_display_name_to_code;
pub use primitives::{CountryCode, LaunchState, RegionId, StatusEntry};
pub use query::{
    cohort_stats, cohort_stats_for, country_report, feature_stats, launch_state_of, shade_of,
    status_of, CohortStats, CountryReport, FeatureStats, Shade,
};
pub use registry::{
    FeatureRecord, FeatureRegistry, FeatureSummary, FeaturesIndex, RejectReason, Rejection,
};
pub use resolver::{resolve, resolve_document, ResolvedStatusMap};
pub use schema::{check, validate, FeatureDocument, FeatureKey};
pub use session::{ActiveFeature, Session};
