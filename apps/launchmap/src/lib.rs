//! # launchmap
//!
//! This library exposes the launchmap app modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod loader;

// Re-export launchmap_core for convenience
pub use launchmap_core;
