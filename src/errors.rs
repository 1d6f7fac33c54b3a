//! Fatal error types for a comparison run.
//!
//! Everything in here aborts the whole run. Per-artifact problems (a file
//! missing on one side, a comparator rejecting malformed content) are not
//! errors at this level; they are recorded as
//! [`ComparisonOutcome`](crate::dispatch::ComparisonOutcome) values and the
//! run carries on.

use std::path::PathBuf;
use thiserror::Error;

use crate::artifacts::ArtifactKind;
use crate::layout::ReleaseLayout;

/// Main error type for pvaccompare runs
#[derive(Debug, Error)]
pub enum CompareError {
    /// A column selection contains names outside the kind's whitelist
    #[error(
        "Invalid {} columns: {}. Valid choices: {}",
        .kind.label(),
        .invalid.join(", "),
        .valid.join(", ")
    )]
    InvalidColumns {
        kind: ArtifactKind,
        invalid: Vec<String>,
        valid: Vec<&'static str>,
    },

    /// A column selection was given but contained no names
    #[error("No columns selected for the {}", .0.label())]
    EmptyColumns(ArtifactKind),

    /// Neither known directory signature exists in a results folder
    #[error(
        "Could not determine the release layout of {}: expected MHC_Class_I/MHC_Class_II \
         or pVACseq/mhc_i/pVACseq/mhc_ii",
        .path.display()
    )]
    LayoutUndetermined { path: PathBuf },

    /// The two results folders come from different release layouts
    #[error(
        "Results folders are not comparable: {} is a {left} release but {} is a {right} release",
        .left_path.display(),
        .right_path.display()
    )]
    LayoutMismatch {
        left: ReleaseLayout,
        right: ReleaseLayout,
        left_path: PathBuf,
        right_path: PathBuf,
    },

    /// The timestamped output tree could not be created
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file exists but could not be read or parsed
    #[error("Configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl CompareError {
    /// Create a configuration error with path context
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using CompareError
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_columns_message_lists_offenders_and_choices() {
        let err = CompareError::InvalidColumns {
            kind: ArtifactKind::ReferenceMatchTable,
            invalid: vec!["Bogus".into(), "Nope".into()],
            valid: vec!["Peptide", "Match Window"],
        };
        let msg = err.to_string();
        assert!(msg.contains("Bogus, Nope"));
        assert!(msg.contains("Peptide, Match Window"));
        assert!(msg.contains("reference match TSV file"));
    }

    #[test]
    fn test_layout_mismatch_names_both_layouts() {
        let err = CompareError::LayoutMismatch {
            left: ReleaseLayout::ImmunoRelease,
            right: ReleaseLayout::PVacToolsRelease,
            left_path: "a".into(),
            right_path: "b".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("immuno"));
        assert!(msg.contains("pVACtools"));
    }
}
