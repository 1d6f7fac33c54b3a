//! Shared report plumbing for the comparators.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::ComparisonRequest;
use crate::artifacts::ArtifactKind;

/// Relative tolerance for numeric equality
const NUMERIC_TOLERANCE: f64 = 1e-9;

/// A report file as written to the class output folder
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport<D> {
    pub artifact: &'static str,
    pub mhc_class: &'static str,
    pub results_folder1_file: PathBuf,
    pub results_folder2_file: PathBuf,
    pub generated_at: DateTime<Local>,
    pub difference_count: usize,
    pub differences: D,
}

impl<D: Serialize> ComparisonReport<D> {
    pub fn new(
        kind: ArtifactKind,
        request: &ComparisonRequest<'_>,
        difference_count: usize,
        differences: D,
    ) -> Self {
        Self {
            artifact: kind.label(),
            mhc_class: request.class.id(),
            results_folder1_file: request.left.to_path_buf(),
            results_folder2_file: request.right.to_path_buf(),
            generated_at: Local::now(),
            difference_count,
            differences,
        }
    }

    /// Serialize into `output_dir/{kind report name}` and return the path
    pub fn write(&self, kind: ArtifactKind, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(kind.report_file_name());
        let json = serde_json::to_string_pretty(self)
            .with_context(|| format!("Failed to serialize {} report", kind.label()))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(path)
    }
}

/// A value present on both sides with different content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedValue {
    pub key: String,
    pub results_folder1: Value,
    pub results_folder2: Value,
}

/// Differences between two flattened key/value documents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyedDiff {
    pub only_in_results_folder1: BTreeMap<String, Value>,
    pub only_in_results_folder2: BTreeMap<String, Value>,
    pub changed: Vec<ChangedValue>,
}

impl KeyedDiff {
    pub fn len(&self) -> usize {
        self.only_in_results_folder1.len() + self.only_in_results_folder2.len() + self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compare two flattened documents key by key
pub fn diff_flattened(left: &BTreeMap<String, Value>, right: &BTreeMap<String, Value>) -> KeyedDiff {
    let mut diff = KeyedDiff::default();

    for (key, left_value) in left {
        match right.get(key) {
            None => {
                diff.only_in_results_folder1
                    .insert(key.clone(), left_value.clone());
            }
            Some(right_value) if !values_equal(left_value, right_value) => {
                diff.changed.push(ChangedValue {
                    key: key.clone(),
                    results_folder1: left_value.clone(),
                    results_folder2: right_value.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for (key, right_value) in right {
        if !left.contains_key(key) {
            diff.only_in_results_folder2
                .insert(key.clone(), right_value.clone());
        }
    }

    diff
}

/// Flatten nested objects and arrays into `a.b[0].c` style keys.
///
/// Empty containers are kept as leaves so that `{}` vs missing is visible.
pub fn flatten_json(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, path: String, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                flatten_into(child, child_path, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, format!("{}[{}]", path, i), out);
            }
        }
        leaf => {
            out.insert(path, leaf.clone());
        }
    }
}

/// Equality that treats `1` and `1.0` as the same number
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => numbers_equal(a, b),
            _ => a == b,
        },
        _ => left == right,
    }
}

pub fn numbers_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= NUMERIC_TOLERANCE * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_document() {
        let flat = flatten_json(&json!({
            "a": {"b": 1, "c": [true, {"d": "x"}]},
            "empty": {},
        }));
        let keys: Vec<_> = flat.keys().cloned().collect();
        assert_eq!(keys, vec!["a.b", "a.c[0]", "a.c[1].d", "empty"]);
        assert_eq!(flat["empty"], json!({}));
    }

    #[test]
    fn test_diff_buckets() {
        let left = flatten_json(&json!({"same": 1, "gone": 2, "moved": "a"}));
        let right = flatten_json(&json!({"same": 1.0, "new": 3, "moved": "b"}));
        let diff = diff_flattened(&left, &right);

        assert_eq!(diff.only_in_results_folder1.keys().collect::<Vec<_>>(), vec!["gone"]);
        assert_eq!(diff.only_in_results_folder2.keys().collect::<Vec<_>>(), vec!["new"]);
        assert_eq!(
            diff.changed,
            vec![ChangedValue {
                key: "moved".into(),
                results_folder1: json!("a"),
                results_folder2: json!("b"),
            }]
        );
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn test_identical_documents_have_empty_diff() {
        let doc = flatten_json(&json!({"x": [1, 2, 3]}));
        assert!(diff_flattened(&doc, &doc).is_empty());
    }

    #[test]
    fn test_numbers_equal_is_relative() {
        assert!(numbers_equal(1e12, 1e12 + 1e-4));
        assert!(!numbers_equal(0.5, 0.6));
    }
}
