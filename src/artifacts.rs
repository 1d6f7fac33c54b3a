//! The five artifact kinds and where each one lives under a class prefix.

use std::fmt;

/// Category of pipeline output file that can be located and compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `log/inputs.yml`, the echoed run configuration
    InputConfig,
    /// `*all_epitopes.aggregated.metrics.json`
    AggregatedMetrics,
    /// `*all_epitopes.aggregated.tsv`
    AggregatedTable,
    /// `*all_epitopes.tsv`
    UnaggregatedTable,
    /// `*.reference_matches`
    ReferenceMatchTable,
}

impl ArtifactKind {
    /// Dispatch order. Operators read the log top to bottom, so this is fixed.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::InputConfig,
        ArtifactKind::AggregatedMetrics,
        ArtifactKind::AggregatedTable,
        ArtifactKind::UnaggregatedTable,
        ArtifactKind::ReferenceMatchTable,
    ];

    /// Directory to search, relative to the results folder
    pub fn subpath(self, prefix: &str) -> String {
        match self {
            Self::InputConfig => format!("{}/log", prefix),
            _ => format!("{}/", prefix),
        }
    }

    /// Filename glob, relative to [`ArtifactKind::subpath`]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::InputConfig => "inputs.yml",
            Self::AggregatedMetrics => "*all_epitopes.aggregated.metrics.json",
            Self::AggregatedTable => "*all_epitopes.aggregated.tsv",
            Self::UnaggregatedTable => "*all_epitopes.tsv",
            Self::ReferenceMatchTable => "*.reference_matches",
        }
    }

    /// Human-readable name used in log diagnostics
    pub fn label(self) -> &'static str {
        match self {
            Self::InputConfig => "input YML file",
            Self::AggregatedMetrics => "metrics JSON file",
            Self::AggregatedTable => "aggregated TSV file",
            Self::UnaggregatedTable => "unaggregated TSV file",
            Self::ReferenceMatchTable => "reference match TSV file",
        }
    }

    /// Name of the comparison tool announced before it runs
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::InputConfig => "input YML comparison tool",
            Self::AggregatedMetrics => "metrics JSON comparison tool",
            Self::AggregatedTable => "aggregated TSV comparison tool",
            Self::UnaggregatedTable => "unaggregated TSV comparison tool",
            Self::ReferenceMatchTable => "reference match TSV comparison tool",
        }
    }

    /// File name of the report a comparator writes for this kind
    pub fn report_file_name(self) -> &'static str {
        match self {
            Self::InputConfig => "input_yml_comparison.json",
            Self::AggregatedMetrics => "metrics_json_comparison.json",
            Self::AggregatedTable => "aggregated_tsv_comparison.json",
            Self::UnaggregatedTable => "unaggregated_tsv_comparison.json",
            Self::ReferenceMatchTable => "reference_matches_comparison.json",
        }
    }

    /// Whether the comparator for this kind takes a column selection
    pub fn is_tabular(self) -> bool {
        matches!(
            self,
            Self::AggregatedTable | Self::UnaggregatedTable | Self::ReferenceMatchTable
        )
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
