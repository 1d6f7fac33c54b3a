//! Optional `.pvaccompare.toml` configuration.
//!
//! The file lets a lab pin its own default column selections and output
//! directory instead of repeating them on every invocation:
//!
//! ```toml
//! output_dir = "comparisons"
//!
//! [columns]
//! aggregated = ["Best Peptide", "Tier"]
//! reference_match = ["Peptide", "Hit Definition"]
//! ```
//!
//! Precedence is command line, then this file, then the built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::columns::ColumnConfig;
use crate::errors::{CompareError, Result};

pub const CONFIG_FILE_NAME: &str = ".pvaccompare.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub columns: ColumnsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnsSection {
    #[serde(default)]
    pub aggregated: Option<Vec<String>>,
    #[serde(default)]
    pub unaggregated: Option<Vec<String>>,
    #[serde(default)]
    pub reference_match: Option<Vec<String>>,
}

impl CompareConfig {
    /// Combine command-line selections with this file and the defaults
    pub fn resolve_columns(
        &self,
        aggregated: Option<Vec<String>>,
        unaggregated: Option<Vec<String>>,
        reference_match: Option<Vec<String>>,
    ) -> ColumnConfig {
        let defaults = ColumnConfig::default();
        ColumnConfig {
            aggregated: aggregated
                .or_else(|| self.columns.aggregated.clone())
                .unwrap_or(defaults.aggregated),
            unaggregated: unaggregated
                .or_else(|| self.columns.unaggregated.clone())
                .unwrap_or(defaults.unaggregated),
            reference_match: reference_match
                .or_else(|| self.columns.reference_match.clone())
                .unwrap_or(defaults.reference_match),
        }
    }
}

/// Parse configuration from a TOML string
pub fn parse_config(contents: &str) -> std::result::Result<CompareConfig, String> {
    toml::from_str::<CompareConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load an explicitly requested configuration file; any failure is fatal
pub fn load_config_from(path: &Path) -> Result<CompareConfig> {
    let contents =
        fs::read_to_string(path).map_err(|e| CompareError::config(path, e.to_string()))?;
    let config = parse_config(&contents).map_err(|e| CompareError::config(path, e))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(path: &Path) -> Option<CompareConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Search `start` and its ancestors for a config file.
///
/// Unreadable or invalid files are warned about and skipped.
pub fn discover_config(start: &Path) -> CompareConfig {
    start
        .ancestors()
        .take(MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No {} found after checking {} directories. Using defaults.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            CompareConfig::default()
        })
}

/// Load the configuration for this invocation: the explicit file if given,
/// otherwise whatever is discovered from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<CompareConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => Ok(std::env::current_dir()
            .map(|dir| discover_config(&dir))
            .unwrap_or_else(|e| {
                log::warn!(
                    "Failed to get current directory: {}. Using default config.",
                    e
                );
                CompareConfig::default()
            })),
    }
}
