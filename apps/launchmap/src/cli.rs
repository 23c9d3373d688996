//! # CLI
//!
//! Command definitions and handlers. Each `cmd_*` function loads what it
//! needs, runs the engine, and returns the rendered output (plain text or
//! JSON) for `main` to print.

use crate::config::{DataArgs, DataLayout};
use crate::loader::{self, LoadedData};
use clap::{Parser, Subcommand};
use launchmap_core::{
    check, resolve_display_name_to_code, CountryCode, CountryReport, LaunchMapError, Session,
};
use serde::Serialize;
use std::path::Path;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "launchmap", version, about = "Feature rollout status by country")]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List valid features
    Features,

    /// Print the resolved country status map of a feature
    Resolve {
        feature: String,
    },

    /// Launch status of one country under a feature
    Status {
        feature: String,
        /// Country code or map display name
        country: String,
    },

    /// Cohort progress and coverage of a feature
    Stats {
        feature: String,
    },

    /// Cohort membership, id and (optionally) status of a country
    Country {
        /// Country code or map display name
        country: String,
        #[arg(long)]
        feature: Option<String>,
    },

    /// Validate a feature document against the region catalog
    Validate {
        file: std::path::PathBuf,
    },

    /// Serve the query API over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

// =============================================================================
// HELPERS
// =============================================================================

fn render<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Accept `"BR"` or a map display name like `"Brazil"`.
pub fn parse_country(raw: &str) -> CliResult<CountryCode> {
    CountryCode::parse(raw)
        .or_else(|| resolve_display_name_to_code(raw))
        .ok_or_else(|| {
            format!("unknown country {raw:?}: expected a code like \"BR\" or a map name").into()
        })
}

fn select(data: &LoadedData, feature: &str) -> CliResult<Session> {
    Ok(Session::select(&data.registry, &data.catalog, feature)?)
}

// =============================================================================
// COMMANDS
// =============================================================================

pub fn cmd_features(layout: &DataLayout, json: bool) -> CliResult<String> {
    let data = loader::load_all(layout)?;
    let summaries = data.registry.summaries();
    if json {
        return render(&summaries);
    }

    if summaries.is_empty() {
        return Ok(String::from("No valid features found"));
    }
    let mut out = String::new();
    for feature in &summaries {
        out.push_str(&format!("{:<24} {}", feature.id, feature.name));
        if let Some(description) = &feature.description {
            out.push_str(&format!(" - {description}"));
        }
        out.push('\n');
    }
    Ok(out.trim_end().to_string())
}

pub fn cmd_resolve(layout: &DataLayout, feature: &str, json: bool) -> CliResult<String> {
    let data = loader::load_all(layout)?;
    let session = select(&data, feature)?;
    tracing::debug!(feature, countries = session.resolved().len(), "resolved feature");

    if json {
        return render(session.resolved());
    }
    let lines: Vec<String> = session
        .resolved()
        .iter()
        .map(|(code, entry)| {
            let label = if entry.launched { "launched" } else { "not launched" };
            format!("{code} {label}")
        })
        .collect();
    Ok(lines.join("\n"))
}

pub fn cmd_status(
    layout: &DataLayout,
    feature: &str,
    country: &str,
    json: bool,
) -> CliResult<String> {
    let code = parse_country(country)?;
    let data = loader::load_all(layout)?;
    let session = select(&data, feature)?;

    let launched = session.status_of(&code);
    let state = session.launch_state_of(&code);
    if json {
        return render(&serde_json::json!({
            "feature": feature,
            "country": code,
            "launched": launched,
            "state": state,
        }));
    }
    Ok(format!("{code}: {}", state.label()))
}

#[derive(Debug, Serialize)]
struct StatsOutput<'a> {
    feature: &'a str,
    name: &'a str,
    cohort: launchmap_core::CohortStats,
    coverage: launchmap_core::FeatureStats,
}

pub fn cmd_stats(layout: &DataLayout, feature: &str, json: bool) -> CliResult<String> {
    let data = loader::load_all(layout)?;
    let session = select(&data, feature)?;
    let output = StatsOutput {
        feature,
        name: session.feature_name().unwrap_or(feature),
        cohort: session.cohort_stats(&data.cohort),
        coverage: session.feature_stats(),
    };
    if json {
        return render(&output);
    }

    let cohort_line = if output.cohort.total == 0 {
        String::from("No MyAlpha countries found in data")
    } else {
        format!(
            "{}/{} MyAlpha countries launched ({}%)",
            output.cohort.launched, output.cohort.total, output.cohort.percentage
        )
    };
    Ok(format!(
        "{}\n{}\n{} of {} countries launched ({}%)",
        output.name,
        cohort_line,
        output.coverage.launched_countries,
        output.coverage.total_countries,
        output.coverage.launch_rate_display()
    ))
}

fn describe(report: &CountryReport) -> String {
    let mut out = report.code.to_string();
    match (report.cohort_member, &report.cohort_id) {
        (true, Some(id)) => out.push_str(&format!("\nMyAlpha Country (ID: {id})")),
        (true, None) => out.push_str("\nMyAlpha Country"),
        (false, _) => {}
    }
    out.push('\n');
    out.push_str(&report.summary);
    out
}

pub fn cmd_country(
    layout: &DataLayout,
    country: &str,
    feature: Option<&str>,
    json: bool,
) -> CliResult<String> {
    let code = parse_country(country)?;
    let data = loader::load_all(layout)?;
    let session = Session::from_selection(&data.registry, &data.catalog, feature)?;
    let report = session.country_report(&data.cohort, &code);
    if json {
        return render(&report);
    }
    Ok(describe(&report))
}

pub fn cmd_validate(layout: &DataLayout, file: &Path) -> CliResult<String> {
    let catalog = loader::load_catalog_or_empty(&layout.catalog);
    let doc = loader::read_json(file)?;
    check(&doc, &catalog).map_err(LaunchMapError::from)?;
    Ok(format!("{}: valid", file.display()))
}

pub async fn cmd_serve(layout: &DataLayout, bind: &str) -> CliResult<()> {
    let data = loader::load_all(layout)?;
    let app = crate::api::router(crate::api::AppState::new(data));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
