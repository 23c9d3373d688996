//! Integration tests for launchmap CLI commands.
//!
//! Uses tempfile for a throwaway data directory per test.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use launchmap::cli::{
    cmd_country, cmd_features, cmd_resolve, cmd_stats, cmd_status, cmd_validate, parse_country,
};
use launchmap::config::DataLayout;
use launchmap::loader::load_all;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Create a data directory with two valid features, two invalid ones and
/// one index entry that has no file behind it.
fn create_data_dir() -> (TempDir, DataLayout) {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let layout = DataLayout::new(temp.path());

    write(
        &layout.features_index(),
        r#"{"features": ["dark-mode.json", "beta-search.json", "broken.json",
                         "bogus-region.json", "missing.json"]}"#,
    );
    write(
        &layout.feature_document("dark-mode.json"),
        r#"{
            "name": "Dark Mode",
            "description": "Night theme",
            "countries": {
                "LATAM": {"launched": true},
                "BR": {"launched": false},
                "US": {"launched": true}
            }
        }"#,
    );
    write(
        &layout.feature_document("beta-search.json"),
        r#"{"name": "Beta Search", "countries": {"FR": {"launched": true}}}"#,
    );
    write(
        &layout.feature_document("broken.json"),
        r#"{"countries": {"FR": {"launched": true}}}"#,
    );
    write(
        &layout.feature_document("bogus-region.json"),
        r#"{"name": "Bogus", "countries": {"NOWHERE": {"launched": true}}}"#,
    );
    write(
        &layout.catalog,
        r#"{"regions": {
            "LATAM": {"countries": ["BR", "AR", "MX"]},
            "EU_CORE": {"countries": ["FR", "DE"]}
        }}"#,
    );
    write(&layout.cohort, r#"{"countries": ["BR", "AR", "FR", "JP"]}"#);
    write(
        &layout.cohort_ids,
        r#"{
            "individual_countries": {"BR": "101"},
            "latam_countries": {"AR": 7, "BR": "999"}
        }"#,
    );

    (temp, layout)
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_all_skips_bad_documents() {
    let (_temp, layout) = create_data_dir();
    let data = load_all(&layout).unwrap();

    let ids: Vec<&str> = data.registry.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["dark-mode", "beta-search"]);
    assert_eq!(data.catalog.len(), 2);
    assert_eq!(data.cohort.member_count(), 4);
}

#[test]
fn test_load_all_fails_without_index() {
    let (_temp, layout) = create_data_dir();
    std::fs::remove_file(layout.features_index()).unwrap();

    assert!(load_all(&layout).is_err());
}

#[test]
fn test_missing_catalog_rejects_region_features() {
    let (_temp, layout) = create_data_dir();
    std::fs::remove_file(&layout.catalog).unwrap();

    let data = load_all(&layout).unwrap();
    assert!(data.catalog.is_empty());
    assert!(data.registry.get("dark-mode").is_none());
    assert!(data.registry.get("beta-search").is_some());
}

#[test]
fn test_missing_cohort_degrades_to_empty() {
    let (_temp, layout) = create_data_dir();
    std::fs::remove_file(&layout.cohort).unwrap();
    std::fs::remove_file(&layout.cohort_ids).unwrap();

    let data = load_all(&layout).unwrap();
    assert!(data.cohort.is_empty());
    assert_eq!(data.registry.len(), 2);
}

#[test]
fn test_bad_cohort_entries_keep_valid_ones() {
    let (_temp, layout) = create_data_dir();
    write(&layout.cohort, r#"{"countries": ["BR", "AR", "usa", "FR", "JP"]}"#);
    write(
        &layout.cohort_ids,
        r#"{
            "individual_countries": {"BR": "", "FR": {"id": 3}},
            "latam_countries": {"AR": 7, "BR": "999"}
        }"#,
    );

    let data = load_all(&layout).unwrap();
    let br = parse_country("BR").unwrap();
    let ar = parse_country("AR").unwrap();
    let fr = parse_country("FR").unwrap();

    assert_eq!(data.cohort.member_count(), 4);
    assert_eq!(data.cohort.lookup_id(&br).unwrap().as_str(), "999");
    assert_eq!(data.cohort.lookup_id(&ar).unwrap().as_str(), "7");
    assert!(data.cohort.is_member(&fr));
    assert!(data.cohort.lookup_id(&fr).is_none());
}

#[test]
fn test_bad_catalog_member_keeps_region() {
    let (_temp, layout) = create_data_dir();
    write(
        &layout.catalog,
        r#"{"regions": {
            "LATAM": {"countries": ["BR", "arg", "MX"]},
            "EU_CORE": {"countries": ["FR", "DE"]}
        }}"#,
    );

    let data = load_all(&layout).unwrap();
    assert_eq!(data.catalog.members_of("LATAM").unwrap().len(), 2);
    assert!(data.registry.get("dark-mode").is_some());

    let output = cmd_resolve(&layout, "dark-mode", false).unwrap();
    assert_eq!(output, "BR not launched\nMX launched\nUS launched");
}

// =============================================================================
// FEATURES COMMAND TESTS
// =============================================================================

#[test]
fn test_features_lists_only_valid_documents() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_features(&layout, false).unwrap();

    assert!(output.contains("dark-mode"));
    assert!(output.contains("Dark Mode - Night theme"));
    assert!(output.contains("beta-search"));
    assert!(!output.contains("broken"));
    assert!(!output.contains("Bogus"));
}

#[test]
fn test_features_json_keeps_index_order() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_features(&layout, true).unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();

    let features = parsed.as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["id"], "dark-mode");
    assert_eq!(features[0]["description"], "Night theme");
    assert_eq!(features[1]["name"], "Beta Search");
}

#[test]
fn test_features_with_nothing_valid() {
    let (_temp, layout) = create_data_dir();
    write(&layout.features_index(), r#"{"features": ["broken.json"]}"#);

    let output = cmd_features(&layout, false).unwrap();
    assert_eq!(output, "No valid features found");
}

// =============================================================================
// RESOLVE / STATUS COMMAND TESTS
// =============================================================================

#[test]
fn test_resolve_country_overrides_region() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_resolve(&layout, "dark-mode", true).unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["BR"]["launched"], false);
    assert_eq!(parsed["AR"]["launched"], true);
    assert_eq!(parsed["MX"]["launched"], true);
    assert_eq!(parsed["US"]["launched"], true);
    assert_eq!(parsed.as_object().unwrap().len(), 4);
}

#[test]
fn test_resolve_text_output() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_resolve(&layout, "dark-mode", false).unwrap();

    assert_eq!(
        output,
        "AR launched\nBR not launched\nMX launched\nUS launched"
    );
}

#[test]
fn test_resolve_unknown_feature() {
    let (_temp, layout) = create_data_dir();
    let result = cmd_resolve(&layout, "broken", false);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[test]
fn test_status_by_code_and_display_name() {
    let (_temp, layout) = create_data_dir();

    assert_eq!(
        cmd_status(&layout, "dark-mode", "BR", false).unwrap(),
        "BR: Not Launched"
    );
    assert_eq!(
        cmd_status(&layout, "dark-mode", "Japan", false).unwrap(),
        "JP: Unknown"
    );
}

#[test]
fn test_status_json_coerces_unknown_to_false() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_status(&layout, "dark-mode", "JP", true).unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["country"], "JP");
    assert_eq!(parsed["launched"], false);
    assert_eq!(parsed["state"], "unknown");
}

#[test]
fn test_status_rejects_bad_country() {
    let (_temp, layout) = create_data_dir();
    assert!(cmd_status(&layout, "dark-mode", "Atlantis", false).is_err());
}

#[test]
fn test_parse_country_forms() {
    assert_eq!(parse_country("FR").unwrap().as_str(), "FR");
    assert_eq!(parse_country("France").unwrap().as_str(), "FR");
    assert!(parse_country("fr").is_err());
    assert!(parse_country("").is_err());
}

// =============================================================================
// STATS / COUNTRY COMMAND TESTS
// =============================================================================

#[test]
fn test_stats_counts_only_covered_cohort_members() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_stats(&layout, "dark-mode", true).unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();

    // BR and AR are covered; FR and JP have no entry.
    assert_eq!(parsed["cohort"]["total"], 2);
    assert_eq!(parsed["cohort"]["launched"], 1);
    assert_eq!(parsed["cohort"]["percentage"], 50);
    assert_eq!(parsed["coverage"]["total_countries"], 4);
    assert_eq!(parsed["coverage"]["launch_rate_tenths"], 750);
}

#[test]
fn test_stats_text_output() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_stats(&layout, "dark-mode", false).unwrap();

    assert!(output.starts_with("Dark Mode\n"));
    assert!(output.contains("1/2 MyAlpha countries launched (50%)"));
    assert!(output.contains("3 of 4 countries launched (75.0%)"));
}

#[test]
fn test_stats_without_cohort_coverage() {
    let (_temp, layout) = create_data_dir();
    write(&layout.cohort, r#"{"countries": ["JP"]}"#);

    let output = cmd_stats(&layout, "dark-mode", false).unwrap();
    assert!(output.contains("No MyAlpha countries found in data"));
}

#[test]
fn test_country_uses_first_subgroup_id() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_country(&layout, "BR", Some("dark-mode"), false).unwrap();

    assert_eq!(
        output,
        "BR\nMyAlpha Country (ID: 101)\nDark Mode: Not Launched"
    );
}

#[test]
fn test_country_without_feature() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_country(&layout, "Argentina", None, true).unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["code"], "AR");
    assert_eq!(parsed["cohort_member"], true);
    assert_eq!(parsed["cohort_id"], "7");
    assert_eq!(parsed["feature"], Value::Null);
    assert_eq!(parsed["summary"], "Select a feature to view launch status");
}

#[test]
fn test_country_outside_cohort() {
    let (_temp, layout) = create_data_dir();
    let output = cmd_country(&layout, "US", Some("dark-mode"), false).unwrap();

    assert_eq!(output, "US\nDark Mode: Launched");
}

// =============================================================================
// VALIDATE COMMAND TESTS
// =============================================================================

#[test]
fn test_validate_accepts_region_document() {
    let (_temp, layout) = create_data_dir();
    let file = layout.feature_document("dark-mode.json");

    let output = cmd_validate(&layout, &file).unwrap();
    assert!(output.ends_with(": valid"));
}

#[test]
fn test_validate_rejects_unknown_region() {
    let (_temp, layout) = create_data_dir();
    let file = layout.feature_document("bogus-region.json");

    let err = cmd_validate(&layout, &file).unwrap_err();
    assert!(err.to_string().contains("NOWHERE"));
}

#[test]
fn test_validate_rejects_non_boolean_launched() {
    let (temp, layout) = create_data_dir();
    let file = temp.path().join("draft.json");
    write(
        &file,
        r#"{"name": "Draft", "countries": {"FR": {"launched": "yes"}}}"#,
    );

    assert!(cmd_validate(&layout, &file).is_err());
}

#[test]
fn test_validate_missing_file() {
    let (temp, layout) = create_data_dir();
    let file = temp.path().join("nope.json");

    assert!(cmd_validate(&layout, &file).is_err());
}
