//! Comparison of the echoed `inputs.yml` run configuration.

use anyhow::{Context, Result};
use serde_json::Value;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::report::{diff_flattened, flatten_json, ComparisonReport, KeyedDiff};
use super::ComparisonRequest;
use crate::artifacts::ArtifactKind;

pub fn compare_input_yml(request: &ComparisonRequest<'_>) -> Result<()> {
    let left = load_yaml(request.left)?;
    let right = load_yaml(request.right)?;
    let diff = diff_yaml(&left, &right);

    log::info!(
        "Input YML: {} differing parameters ({} only in results folder 1, {} only in results folder 2)",
        diff.changed.len(),
        diff.only_in_results_folder1.len(),
        diff.only_in_results_folder2.len()
    );

    let kind = ArtifactKind::InputConfig;
    ComparisonReport::new(kind, request, diff.len(), diff).write(kind, request.output_dir)?;
    Ok(())
}

fn load_yaml(path: &Path) -> Result<YamlValue> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input YML file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse input YML from: {}", path.display()))
}

pub fn diff_yaml(left: &YamlValue, right: &YamlValue) -> KeyedDiff {
    diff_flattened(&flatten_yaml(left), &flatten_yaml(right))
}

/// Flatten a YAML document into the same key space as JSON documents.
///
/// Non-string mapping keys are rendered as plain scalars; tags are dropped.
pub fn flatten_yaml(value: &YamlValue) -> BTreeMap<String, Value> {
    flatten_json(&yaml_to_json(value))
}

fn yaml_to_json(value: &YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn yaml_key(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(text: &str) -> YamlValue {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_diff_of_run_parameters() {
        let left = parse(indoc! {"
            sample_name: HCC1395
            alleles:
              - HLA-A*02:01
              - HLA-B*08:01
            binding_threshold: 500
            netmhc_stab: false
        "});
        let right = parse(indoc! {"
            sample_name: HCC1395
            alleles:
              - HLA-A*02:01
              - HLA-B*07:02
            binding_threshold: 500.0
            top_score_metric: median
        "});

        let diff = diff_yaml(&left, &right);
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].key, "alleles[1]");
        assert_eq!(
            diff.only_in_results_folder1.get("netmhc_stab"),
            Some(&json!(false))
        );
        assert_eq!(
            diff.only_in_results_folder2.get("top_score_metric"),
            Some(&json!("median"))
        );
    }

    #[test]
    fn test_numeric_keys_are_stringified() {
        let flat = flatten_yaml(&parse("1: one\ntrue: yes\n"));
        assert_eq!(flat.get("1"), Some(&json!("one")));
        assert_eq!(flat.get("true"), Some(&json!("yes")));
    }

    #[test]
    fn test_compare_writes_report() {
        let temp = tempfile::TempDir::new().unwrap();
        let left = temp.path().join("left.yml");
        let right = temp.path().join("right.yml");
        fs::write(&left, "a: 1\n").unwrap();
        fs::write(&right, "a: 2\n").unwrap();

        let request = ComparisonRequest {
            left: &left,
            right: &right,
            columns: None,
            output_dir: temp.path(),
            class: crate::layout::MhcClass::ClassI,
        };
        compare_input_yml(&request).unwrap();

        let report: Value = serde_json::from_str(
            &fs::read_to_string(temp.path().join("input_yml_comparison.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["difference_count"], json!(1));
        assert_eq!(report["mhc_class"], json!("1"));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let bad = temp.path().join("inputs.yml");
        fs::write(&bad, "a: [unclosed\n").unwrap();
        let err = load_yaml(&bad).unwrap_err();
        assert!(err.to_string().contains("Failed to parse input YML"));
    }
}
