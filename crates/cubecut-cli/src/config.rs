//! TOML configuration for the `cubecut` binary.
//!
//! ```toml
//! seed = 42
//!
//! [partition]
//! size = 6
//! piece_count = 14
//! max_piece_size = 24
//! strategy = "random-runs"
//! absorb = "smallest"
//!
//! [export]
//! unit_mm = 10.0
//! out_dir = "pieces"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cubecut_partition::PartitionSettings;
use serde::{Deserialize, Serialize};

/// Everything a `split` run needs, before command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Random seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Partitioning parameters.
    pub partition: PartitionSettings,
    /// Output parameters.
    pub export: ExportSettings,
}

/// Where and how finished pieces are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Edge length of one voxel in the exported documents (mm).
    pub unit_mm: f64,
    /// Directory receiving one document per piece.
    pub out_dir: Option<PathBuf>,
    /// File receiving the partition manifest.
    pub manifest: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            unit_mm: 10.0,
            out_dir: None,
            manifest: None,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("invalid configuration")?;
        let unit = config.export.unit_mm;
        if unit.is_nan() || unit <= 0.0 {
            anyhow::bail!("export.unit_mm must be positive");
        }
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}
