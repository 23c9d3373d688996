//! # Configuration
//!
//! Where the source documents live. Defaults mirror the published data
//! layout; every path can be overridden from the command line.
//!
//! ```text
//! <data-dir>/
//! ├── features/
//! │   ├── index.json            { "features": ["dark-mode.json", ...] }
//! │   └── dark-mode.json
//! ├── regional-mappings.json    region catalog
//! ├── MyAlpha-countries.json    cohort membership
//! └── myalpha-ids.json          cohort ids by sub-group
//! ```

use clap::Args;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const FEATURES_DIR: &str = "features";
pub const FEATURES_INDEX: &str = "index.json";
pub const CATALOG_FILE: &str = "regional-mappings.json";
pub const COHORT_FILE: &str = "MyAlpha-countries.json";
pub const COHORT_IDS_FILE: &str = "myalpha-ids.json";

/// Data location flags shared by every command.
#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Root directory holding the source documents
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory with the features index and feature documents
    #[arg(long, global = true)]
    pub features_dir: Option<PathBuf>,

    /// Region catalog document
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Cohort membership document
    #[arg(long, global = true)]
    pub cohort: Option<PathBuf>,

    /// Cohort id document
    #[arg(long, global = true)]
    pub cohort_ids: Option<PathBuf>,
}

impl DataArgs {
    #[must_use]
    pub fn layout(&self) -> DataLayout {
        let mut layout = DataLayout::new(&self.data_dir);
        if let Some(dir) = &self.features_dir {
            layout.features_dir.clone_from(dir);
        }
        if let Some(path) = &self.catalog {
            layout.catalog.clone_from(path);
        }
        if let Some(path) = &self.cohort {
            layout.cohort.clone_from(path);
        }
        if let Some(path) = &self.cohort_ids {
            layout.cohort_ids.clone_from(path);
        }
        layout
    }
}

/// Resolved document paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub features_dir: PathBuf,
    pub catalog: PathBuf,
    pub cohort: PathBuf,
    pub cohort_ids: PathBuf,
}

impl DataLayout {
    /// Default layout under a data directory.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let root = data_dir.as_ref();
        Self {
            features_dir: root.join(FEATURES_DIR),
            catalog: root.join(CATALOG_FILE),
            cohort: root.join(COHORT_FILE),
            cohort_ids: root.join(COHORT_IDS_FILE),
        }
    }

    #[must_use]
    pub fn features_index(&self) -> PathBuf {
        self.features_dir.join(FEATURES_INDEX)
    }

    #[must_use]
    pub fn feature_document(&self, filename: &str) -> PathBuf {
        self.features_dir.join(filename)
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}
