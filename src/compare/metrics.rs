//! Comparison of the aggregated metrics JSON.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::report::{diff_flattened, flatten_json, ComparisonReport};
use super::ComparisonRequest;
use crate::artifacts::ArtifactKind;

pub fn compare_metrics_json(request: &ComparisonRequest<'_>) -> Result<()> {
    let left = load_json(request.left)?;
    let right = load_json(request.right)?;
    let diff = diff_flattened(&flatten_json(&left), &flatten_json(&right));

    log::info!(
        "Metrics JSON: {} differing values ({} only in results folder 1, {} only in results folder 2)",
        diff.changed.len(),
        diff.only_in_results_folder1.len(),
        diff.only_in_results_folder2.len()
    );

    let kind = ArtifactKind::AggregatedMetrics;
    ComparisonReport::new(kind, request, diff.len(), diff).write(kind, request.output_dir)?;
    Ok(())
}

fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read metrics JSON file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metrics JSON from: {}", path.display()))
}
