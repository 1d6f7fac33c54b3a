//! Format-specific comparators.
//!
//! The dispatcher only knows the [`Comparator`] trait: it hands over two
//! located files plus the class context and expects a report to appear in the
//! class output folder. [`ReportComparator`] is the implementation used by the
//! binary; tests drive the dispatcher with recording doubles instead.
//!
//! - **yaml**: echoed `inputs.yml` run configuration
//! - **metrics**: `*.aggregated.metrics.json`
//! - **tsv**: aggregated, unaggregated and reference-match tables
//! - **report**: key-path flattening, value diffing and report output

pub mod metrics;
pub mod report;
pub mod tsv;
pub mod yaml;

use anyhow::Result;
use std::path::Path;

use crate::artifacts::ArtifactKind;
use crate::layout::MhcClass;

pub use report::{ChangedValue, ComparisonReport, KeyedDiff};
pub use tsv::TableDiff;

/// Everything a comparator gets for one matched pair of files
#[derive(Debug, Clone, Copy)]
pub struct ComparisonRequest<'a> {
    /// File from the first results folder
    pub left: &'a Path,
    /// File from the second results folder
    pub right: &'a Path,
    /// Column selection, for tabular kinds only
    pub columns: Option<&'a [String]>,
    /// Per-class output folder the report goes into
    pub output_dir: &'a Path,
    pub class: MhcClass,
}

/// A comparison routine for located artifact pairs.
///
/// Returning `Err` means the input could not be compared (unreadable or
/// malformed); the caller records it and moves on to the next kind.
pub trait Comparator {
    fn compare(&self, kind: ArtifactKind, request: &ComparisonRequest<'_>) -> Result<()>;
}

/// Comparator that writes one JSON report per artifact kind
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportComparator;

impl Comparator for ReportComparator {
    fn compare(&self, kind: ArtifactKind, request: &ComparisonRequest<'_>) -> Result<()> {
        match kind {
            ArtifactKind::InputConfig => yaml::compare_input_yml(request),
            ArtifactKind::AggregatedMetrics => metrics::compare_metrics_json(request),
            ArtifactKind::AggregatedTable
            | ArtifactKind::UnaggregatedTable
            | ArtifactKind::ReferenceMatchTable => tsv::compare_tsv(kind, request),
        }
    }
}
