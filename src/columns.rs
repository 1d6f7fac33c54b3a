//! Column catalogs for the tabular comparisons.
//!
//! Each tabular artifact kind has a fixed whitelist of columns that may be
//! compared and a default selection used when the operator does not pick one.


use crate::artifacts::ArtifactKind;
use crate::errors::{CompareError, Result};

pub const VALID_AGGREGATED_COLUMNS: &[&str] = &[
    "Gene",
    "AA Change",
    "Num Passing Transcripts",
    "Best Peptide",
    "Best Transcript",
    "Num Passing Peptides",
    "IC50 MT",
    "IC50 WT",
    "%ile MT",
    "%ile WT",
    "RNA Expr",
    "RNA VAF",
    "DNA VAF",
    "Tier",
];

pub const VALID_UNAGGREGATED_COLUMNS: &[&str] = &[
    "Biotype",
    "Median MT IC50 Score",
    "Median WT IC50 Score",
    "Median MT Percentile",
    "Median WT Percentile",
    "WT Epitope Seq",
    "Tumor DNA VAF",
    "Tumor RNA Depth",
    "Tumor RNA VAF",
    "Gene Expression",
    "BigMHC_EL WT Score",
    "BigMHC_EL MT Score",
    "BigMHC_IM WT Score",
    "BigMHC_IM MT Score",
    "MHCflurryEL Processing WT Score",
    "MHCflurryEL Processing MT Score",
    "MHCflurryEL Presentation WT Score",
    "MHCflurryEL Presentation MT Score",
    "MHCflurryEL Presentation WT Percentile",
    "MHCflurryEL Presentation MT Percentile",
    "MHCflurry WT IC50 Score",
    "MHCflurry MT IC50 Score",
    "MHCflurry WT Percentile",
    "MHCflurry MT Percentile",
    "MHCnuggetsI WT IC50 Score",
    "MHCnuggetsI MT IC50 Score",
    "MHCnuggetsI WT Percentile",
    "MHCnuggetsI MT Percentile",
    "NetMHC WT IC50 Score",
    "NetMHC MT IC50 Score",
    "NetMHC WT Percentile",
    "NetMHC MT Percentile",
    "NetMHCcons WT IC50 Score",
    "NetMHCcons MT IC50 Score",
    "NetMHCcons WT Percentile",
    "NetMHCcons MT Percentile",
    "NetMHCpan WT IC50 Score",
    "NetMHCpan MT IC50 Score",
    "NetMHCpan WT Percentile",
    "NetMHCpan MT Percentile",
    "NetMHCpanEL WT Score",
    "NetMHCpanEL MT Score",
    "NetMHCpanEL WT Percentile",
    "NetMHCpanEL MT Percentile",
    "PickPocket WT IC50 Score",
    "PickPocket MT IC50 Score",
    "PickPocket WT Percentile",
    "PickPocket MT Percentile",
    "SMM WT IC50 Score",
    "SMM MT IC50 Score",
    "SMM WT Percentile",
    "SMM MT Percentile",
    "SMMPMBEC WT IC50 Score",
    "SMMPMBEC MT IC50 Score",
    "SMMPMBEC WT Percentile",
    "SMMPMBEC MT Percentile",
    "DeepImmuno WT Score",
    "DeepImmuno MT Score",
    "Problematic Positions",
];

pub const VALID_REFERENCE_MATCH_COLUMNS: &[&str] =
    &["Peptide", "Hit Definition", "Match Window", "Match Sequence"];

pub const DEFAULT_AGGREGATED_COLUMNS: &[&str] = &[
    "Num Passing Transcripts",
    "Best Peptide",
    "Best Transcript",
    "Num Passing Peptides",
    "Tier",
];

pub const DEFAULT_UNAGGREGATED_COLUMNS: &[&str] = &[
    "Biotype",
    "Median MT IC50 Score",
    "Median WT IC50 Score",
    "Median MT Percentile",
    "Median WT Percentile",
    "WT Epitope Seq",
    "Tumor DNA VAF",
    "Tumor RNA Depth",
    "Tumor RNA VAF",
    "Gene Expression",
];

pub const DEFAULT_REFERENCE_MATCH_COLUMNS: &[&str] = &["Peptide", "Match Window"];

/// Whitelist for a tabular kind; empty for the non-tabular ones
pub fn valid_columns(kind: ArtifactKind) -> &'static [&'static str] {
    match kind {
        ArtifactKind::AggregatedTable => VALID_AGGREGATED_COLUMNS,
        ArtifactKind::UnaggregatedTable => VALID_UNAGGREGATED_COLUMNS,
        ArtifactKind::ReferenceMatchTable => VALID_REFERENCE_MATCH_COLUMNS,
        ArtifactKind::InputConfig | ArtifactKind::AggregatedMetrics => &[],
    }
}

/// Default selection for a tabular kind; empty for the non-tabular ones
pub fn default_columns(kind: ArtifactKind) -> &'static [&'static str] {
    match kind {
        ArtifactKind::AggregatedTable => DEFAULT_AGGREGATED_COLUMNS,
        ArtifactKind::UnaggregatedTable => DEFAULT_UNAGGREGATED_COLUMNS,
        ArtifactKind::ReferenceMatchTable => DEFAULT_REFERENCE_MATCH_COLUMNS,
        ArtifactKind::InputConfig | ArtifactKind::AggregatedMetrics => &[],
    }
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// The three column selections handed to the tabular comparators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    pub aggregated: Vec<String>,
    pub unaggregated: Vec<String>,
    pub reference_match: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            aggregated: owned(DEFAULT_AGGREGATED_COLUMNS),
            unaggregated: owned(DEFAULT_UNAGGREGATED_COLUMNS),
            reference_match: owned(DEFAULT_REFERENCE_MATCH_COLUMNS),
        }
    }
}

impl ColumnConfig {
    /// Selection for a kind, or `None` if the kind takes no columns
    pub fn for_kind(&self, kind: ArtifactKind) -> Option<&[String]> {
        match kind {
            ArtifactKind::AggregatedTable => Some(&self.aggregated),
            ArtifactKind::UnaggregatedTable => Some(&self.unaggregated),
            ArtifactKind::ReferenceMatchTable => Some(&self.reference_match),
            ArtifactKind::InputConfig | ArtifactKind::AggregatedMetrics => None,
        }
    }

    /// Check all three selections, stopping at the first bad one
    pub fn validate(&self) -> Result<()> {
        validate_selection(ArtifactKind::AggregatedTable, &self.aggregated)?;
        validate_selection(ArtifactKind::UnaggregatedTable, &self.unaggregated)?;
        validate_selection(ArtifactKind::ReferenceMatchTable, &self.reference_match)
    }
}

/// Check that `selection` is a non-empty subset of the kind's whitelist.
///
/// Every offending name is reported, not only the first one.
pub fn validate_selection(kind: ArtifactKind, selection: &[String]) -> Result<()> {
    if selection.is_empty() {
        return Err(CompareError::EmptyColumns(kind));
    }

    let valid = valid_columns(kind);
    let invalid: Vec<String> = selection
        .iter()
        .filter(|column| !valid.contains(&column.as_str()))
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(CompareError::InvalidColumns {
            kind,
            invalid,
            valid: valid.to_vec(),
        })
    }
}
