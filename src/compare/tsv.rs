//! Comparison of the tab-separated result tables.
//!
//! Rows are matched between the two files by an identity built from key
//! columns (variant coordinates, transcript, allele, peptide). Only the
//! operator-selected columns are compared cell by cell.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::report::{numbers_equal, ComparisonReport};
use super::ComparisonRequest;
use crate::artifacts::ArtifactKind;

/// One identity slot per entry; the first alternative present in both files
/// is used for that slot.
type KeySlots = &'static [&'static [&'static str]];

const AGGREGATED_KEYS: KeySlots = &[&["ID"]];

const UNAGGREGATED_KEYS: KeySlots = &[
    &["Chromosome"],
    &["Start"],
    &["Stop"],
    &["Reference"],
    &["Variant"],
    &["Transcript"],
    &["HLA Allele"],
    &["MT Epitope Seq"],
];

// Older reference match files name the peptide column "Query Sequence"
const REFERENCE_MATCH_KEYS: KeySlots = &[
    &["ID"],
    &["HLA Allele"],
    &["Peptide", "Query Sequence"],
];

/// Identity columns for a tabular kind
pub fn key_slots(kind: ArtifactKind) -> KeySlots {
    match kind {
        ArtifactKind::AggregatedTable => AGGREGATED_KEYS,
        ArtifactKind::UnaggregatedTable => UNAGGREGATED_KEYS,
        ArtifactKind::ReferenceMatchTable => REFERENCE_MATCH_KEYS,
        ArtifactKind::InputConfig | ArtifactKind::AggregatedMetrics => &[],
    }
}

/// Pick the key column for every identity slot, failing on the first slot
/// that neither file can fill.
fn resolve_key_columns(kind: ArtifactKind, left: &Table, right: &Table) -> Result<Vec<String>> {
    key_slots(kind)
        .iter()
        .map(|alternatives| {
            alternatives
                .iter()
                .find(|name| {
                    left.column_index(name).is_some() && right.column_index(name).is_some()
                })
                .map(|name| name.to_string())
                .with_context(|| {
                    format!(
                        "Identity column {} is missing from the {}",
                        alternatives.join(" or "),
                        kind.label()
                    )
                })
        })
        .collect()
}

/// An in-memory TSV file
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .from_path(path)
            .with_context(|| format!("Failed to open TSV file: {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Failed to read TSV header from: {}", path.display()))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("Malformed TSV row {} in: {}", i + 2, path.display())
            })?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rows keyed by their identity; repeated identities get a `#n` suffix
    fn keyed_rows(&self, keys: &[String]) -> BTreeMap<String, &[String]> {
        let indices: Vec<usize> = keys.iter().filter_map(|k| self.column_index(k)).collect();
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let mut out = BTreeMap::new();

        for row in &self.rows {
            let identity = indices
                .iter()
                .map(|&i| row.get(i).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(" | ");
            let n = seen.entry(identity.clone()).or_insert(0);
            *n += 1;
            let key = if *n == 1 {
                identity
            } else {
                format!("{} #{}", identity, n)
            };
            out.insert(key, row.as_slice());
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellDifference {
    pub row: String,
    pub column: String,
    pub results_folder1: String,
    pub results_folder2: String,
}

/// Differences between two tables of the same kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableDiff {
    pub key_columns: Vec<String>,
    pub compared_columns: Vec<String>,
    pub columns_missing_in_results_folder1: Vec<String>,
    pub columns_missing_in_results_folder2: Vec<String>,
    pub results_folder1_row_count: usize,
    pub results_folder2_row_count: usize,
    pub rows_only_in_results_folder1: Vec<String>,
    pub rows_only_in_results_folder2: Vec<String>,
    pub changed_cells: Vec<CellDifference>,
}

impl TableDiff {
    pub fn difference_count(&self) -> usize {
        self.columns_missing_in_results_folder1.len()
            + self.columns_missing_in_results_folder2.len()
            + self.rows_only_in_results_folder1.len()
            + self.rows_only_in_results_folder2.len()
            + self.changed_cells.len()
    }
}

/// Compare two tables on the selected columns.
///
/// Fails when either file lacks one of the kind's identity columns, since rows
/// cannot be matched in that case.
pub fn diff_tables(
    kind: ArtifactKind,
    left: &Table,
    right: &Table,
    selected: &[String],
) -> Result<TableDiff> {
    let key_columns = resolve_key_columns(kind, left, right)?;

    let mut diff = TableDiff {
        key_columns,
        results_folder1_row_count: left.rows.len(),
        results_folder2_row_count: right.rows.len(),
        ..TableDiff::default()
    };

    let mut comparable = Vec::new();
    for column in selected {
        match (left.column_index(column), right.column_index(column)) {
            (Some(l), Some(r)) => {
                diff.compared_columns.push(column.clone());
                comparable.push((column, l, r));
            }
            (None, Some(_)) => diff.columns_missing_in_results_folder1.push(column.clone()),
            (Some(_), None) => diff.columns_missing_in_results_folder2.push(column.clone()),
            (None, None) => {
                diff.columns_missing_in_results_folder1.push(column.clone());
                diff.columns_missing_in_results_folder2.push(column.clone());
            }
        }
    }

    let left_rows = left.keyed_rows(&diff.key_columns);
    let right_rows = right.keyed_rows(&diff.key_columns);
    let all_keys: BTreeSet<&String> = left_rows.keys().chain(right_rows.keys()).collect();

    for key in all_keys {
        match (left_rows.get(key), right_rows.get(key)) {
            (Some(l), Some(r)) => {
                for &(column, li, ri) in &comparable {
                    let lv = l.get(li).map(String::as_str).unwrap_or("");
                    let rv = r.get(ri).map(String::as_str).unwrap_or("");
                    if !cells_equal(lv, rv) {
                        diff.changed_cells.push(CellDifference {
                            row: key.clone(),
                            column: column.clone(),
                            results_folder1: lv.to_string(),
                            results_folder2: rv.to_string(),
                        });
                    }
                }
            }
            (Some(_), None) => diff.rows_only_in_results_folder1.push(key.clone()),
            (None, Some(_)) => diff.rows_only_in_results_folder2.push(key.clone()),
            (None, None) => {}
        }
    }

    Ok(diff)
}

fn cells_equal(left: &str, right: &str) -> bool {
    if left == right {
        return true;
    }
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => numbers_equal(a, b),
        _ => left.trim() == right.trim(),
    }
}

pub fn compare_tsv(kind: ArtifactKind, request: &ComparisonRequest<'_>) -> Result<()> {
    let left = Table::read(request.left)?;
    let right = Table::read(request.right)?;
    let selected = request.columns.unwrap_or(&[]);

    let diff = diff_tables(kind, &left, &right, selected).with_context(|| {
        format!(
            "Cannot compare {} and {}",
            request.left.display(),
            request.right.display()
        )
    })?;

    log::info!(
        "{}: {} rows only in results folder 1, {} rows only in results folder 2, {} differing cells",
        kind.label(),
        diff.rows_only_in_results_folder1.len(),
        diff.rows_only_in_results_folder2.len(),
        diff.changed_cells.len()
    );
    if !diff.columns_missing_in_results_folder1.is_empty()
        || !diff.columns_missing_in_results_folder2.is_empty()
    {
        log::warn!(
            "Selected columns missing from results folder 1: [{}], from results folder 2: [{}]",
            diff.columns_missing_in_results_folder1.join(", "),
            diff.columns_missing_in_results_folder2.join(", ")
        );
    }

    let count = diff.difference_count();
    ComparisonReport::new(kind, request, count, diff).write(kind, request.output_dir)?;
    Ok(())
}
