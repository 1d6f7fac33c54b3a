//! Per-class comparison dispatch.
//!
//! For one MHC class the dispatcher walks the five artifact kinds in a fixed
//! order, locates each on both sides, and either hands the pair to the
//! comparator or logs which side is missing the file. Nothing here returns an
//! error: every kind ends in a [`ComparisonOutcome`], and a failing comparator
//! only affects its own kind.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::artifacts::ArtifactKind;
use crate::columns::ColumnConfig;
use crate::compare::{Comparator, ComparisonRequest};
use crate::layout::MhcClass;
use crate::locator::locate;
use crate::output::class_output_dir;

const RULE_WIDTH: usize = 55;

/// Where an artifact was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Both { left: PathBuf, right: PathBuf },
    LeftOnly(PathBuf),
    RightOnly(PathBuf),
    Neither,
}

impl Availability {
    pub fn classify(left: Option<PathBuf>, right: Option<PathBuf>) -> Self {
        match (left, right) {
            (Some(left), Some(right)) => Self::Both { left, right },
            (Some(left), None) => Self::LeftOnly(left),
            (None, Some(right)) => Self::RightOnly(right),
            (None, None) => Self::Neither,
        }
    }

    /// The located pair, or the outcome naming the side that lacks the file
    pub fn into_pair(self) -> Result<(PathBuf, PathBuf), ComparisonOutcome> {
        match self {
            Self::Both { left, right } => Ok((left, right)),
            Self::LeftOnly(_) => Err(ComparisonOutcome::RightMissing),
            Self::RightOnly(_) => Err(ComparisonOutcome::LeftMissing),
            Self::Neither => Err(ComparisonOutcome::BothMissing),
        }
    }
}

/// Result of processing one artifact kind for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// Found on both sides and compared
    Completed,
    /// The layout never produces this artifact
    NotApplicable,
    /// Absent from results folder 1
    LeftMissing,
    /// Absent from results folder 2
    RightMissing,
    /// Absent from both results folders
    BothMissing,
    /// Found on both sides but the comparator rejected the input
    Failed(String),
}

impl ComparisonOutcome {
    /// Diagnostic for the missing-file cases, naming the side that lacks it
    pub fn diagnostic(&self, kind: ArtifactKind, prefix: &str) -> Option<String> {
        let location = match self {
            Self::LeftMissing => "in results folder 1",
            Self::RightMissing => "in results folder 2",
            Self::BothMissing => "in either results folder",
            _ => return None,
        };
        Some(format!(
            "Could not locate the {} {} for {}.",
            kind.label(),
            location,
            prefix
        ))
    }

    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::LeftMissing | Self::RightMissing | Self::BothMissing
        )
    }
}

impl fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::NotApplicable => write!(f, "not applicable"),
            Self::LeftMissing => write!(f, "missing in results folder 1"),
            Self::RightMissing => write!(f, "missing in results folder 2"),
            Self::BothMissing => write!(f, "missing in both results folders"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcomes for every artifact kind of one class, in dispatch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    pub class: MhcClass,
    pub prefix: String,
    pub entries: Vec<(ArtifactKind, ComparisonOutcome)>,
}

impl ClassSummary {
    pub fn outcome(&self, kind: ArtifactKind) -> Option<&ComparisonOutcome> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, ComparisonOutcome::Completed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ComparisonOutcome::Failed(_)))
    }

    pub fn missing(&self) -> usize {
        self.count(ComparisonOutcome::is_missing)
    }

    fn count(&self, pred: impl Fn(&ComparisonOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Runs the comparisons for one class at a time against a fixed output root
pub struct Dispatcher<'a> {
    comparator: &'a dyn Comparator,
    columns: &'a ColumnConfig,
    output_root: &'a Path,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        comparator: &'a dyn Comparator,
        columns: &'a ColumnConfig,
        output_root: &'a Path,
    ) -> Self {
        Self {
            comparator,
            columns,
            output_root,
        }
    }

    /// Process all artifact kinds for `class` under `prefix`.
    ///
    /// The class output folder must already exist.
    pub fn dispatch(
        &self,
        class: MhcClass,
        prefix: &str,
        left: &Path,
        right: &Path,
    ) -> ClassSummary {
        let output_dir = class_output_dir(self.output_root, class);

        let entries = ArtifactKind::ALL
            .into_iter()
            .map(|kind| {
                let outcome = self.dispatch_kind(kind, class, prefix, left, right, &output_dir);
                (kind, outcome)
            })
            .collect();

        log::info!("\n{}", "\u{2500}".repeat(RULE_WIDTH));
        log::info!("Successfully generated {} comparison report.", prefix);
        log::info!("{}", "\u{2500}".repeat(RULE_WIDTH));

        ClassSummary {
            class,
            prefix: prefix.to_string(),
            entries,
        }
    }

    fn dispatch_kind(
        &self,
        kind: ArtifactKind,
        class: MhcClass,
        prefix: &str,
        left: &Path,
        right: &Path,
        output_dir: &Path,
    ) -> ComparisonOutcome {
        if kind == ArtifactKind::InputConfig && !emits_input_config(prefix) {
            log::info!("Input YML files are not included in {} results", prefix);
            log::info!("\u{2716} Comparison skipped.");
            return ComparisonOutcome::NotApplicable;
        }

        let subpath = kind.subpath(prefix);
        let availability = Availability::classify(
            locate(left, &subpath, kind.pattern()),
            locate(right, &subpath, kind.pattern()),
        );

        let (left, right) = match availability.into_pair() {
            Ok(pair) => pair,
            Err(outcome) => {
                if let Some(message) = outcome.diagnostic(kind, prefix) {
                    log::error!("{}", message);
                }
                log::info!("\u{2716} Comparison skipped.");
                return outcome;
            }
        };

        log::info!("\nRunning the {}...", kind.tool_name());
        log::debug!("  results folder 1: {}", left.display());
        log::debug!("  results folder 2: {}", right.display());

        let request = ComparisonRequest {
            left: &left,
            right: &right,
            columns: self.columns.for_kind(kind),
            output_dir,
            class,
        };

        match self.comparator.compare(kind, &request) {
            Ok(()) => {
                log::info!("\u{2713} Comparison completed successfully.");
                ComparisonOutcome::Completed
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                log::error!("The {} failed: {}", kind.tool_name(), reason);
                log::info!("\u{2716} Comparison failed.");
                ComparisonOutcome::Failed(reason)
            }
        }
    }
}

/// pVACtools-layout runs do not echo their input configuration
fn emits_input_config(prefix: &str) -> bool {
    !prefix.contains("pVACseq")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(ArtifactKind, Option<Vec<String>>)>>,
    }

    impl Comparator for Recorder {
        fn compare(
            &self,
            kind: ArtifactKind,
            request: &ComparisonRequest<'_>,
        ) -> anyhow::Result<()> {
            self.calls
                .borrow_mut()
                .push((kind, request.columns.map(|c| c.to_vec())));
            Ok(())
        }
    }

    struct FailOn(ArtifactKind, Recorder);

    impl Comparator for FailOn {
        fn compare(
            &self,
            kind: ArtifactKind,
            request: &ComparisonRequest<'_>,
        ) -> anyhow::Result<()> {
            self.1.compare(kind, request)?;
            if kind == self.0 {
                anyhow::bail!("malformed content");
            }
            Ok(())
        }
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn full_tree(root: &Path, prefix: &str) {
        touch(root, &format!("{prefix}/log/inputs.yml"));
        touch(root, &format!("{prefix}/s.all_epitopes.aggregated.metrics.json"));
        touch(root, &format!("{prefix}/s.all_epitopes.aggregated.tsv"));
        touch(root, &format!("{prefix}/s.all_epitopes.tsv"));
        touch(root, &format!("{prefix}/s.reference_matches"));
    }

    #[test]
    fn test_classify_covers_four_states() {
        let p = PathBuf::from("x");
        assert!(matches!(
            Availability::classify(Some(p.clone()), Some(p.clone())),
            Availability::Both { .. }
        ));
        assert_eq!(
            Availability::classify(Some(p.clone()), None),
            Availability::LeftOnly(p.clone())
        );
        assert_eq!(
            Availability::classify(None, Some(p.clone())),
            Availability::RightOnly(p)
        );
        assert_eq!(Availability::classify(None, None), Availability::Neither);
    }

    #[test]
    fn test_missing_diagnostics_are_distinct() {
        let kind = ArtifactKind::AggregatedTable;
        let left = ComparisonOutcome::LeftMissing.diagnostic(kind, "MHC_Class_I").unwrap();
        let right = ComparisonOutcome::RightMissing.diagnostic(kind, "MHC_Class_I").unwrap();
        let both = ComparisonOutcome::BothMissing.diagnostic(kind, "MHC_Class_I").unwrap();

        assert_ne!(left, right);
        assert_ne!(left, both);
        assert_ne!(right, both);
        assert_eq!(
            right,
            "Could not locate the aggregated TSV file in results folder 2 for MHC_Class_I."
        );
        assert!(ComparisonOutcome::Completed.diagnostic(kind, "x").is_none());
    }

    #[test]
    fn test_all_kinds_compared_when_both_present() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        full_tree(left.path(), "MHC_Class_I");
        full_tree(right.path(), "MHC_Class_I");

        let recorder = Recorder::default();
        let columns = ColumnConfig::default();
        let summary = Dispatcher::new(&recorder, &columns, out.path()).dispatch(
            MhcClass::ClassI,
            "MHC_Class_I",
            left.path(),
            right.path(),
        );

        assert_eq!(summary.completed(), 5);
        let calls = recorder.calls.borrow();
        let kinds: Vec<_> = calls.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, ArtifactKind::ALL.to_vec());
        assert_eq!(calls[2].1.as_deref(), Some(columns.aggregated.as_slice()));
        assert_eq!(calls[1].1, None);
    }

    #[test]
    fn test_pvacseq_prefix_skips_input_config() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        full_tree(left.path(), "pVACseq/mhc_ii");
        full_tree(right.path(), "pVACseq/mhc_ii");

        let recorder = Recorder::default();
        let columns = ColumnConfig::default();
        let summary = Dispatcher::new(&recorder, &columns, out.path()).dispatch(
            MhcClass::ClassII,
            "pVACseq/mhc_ii",
            left.path(),
            right.path(),
        );

        assert_eq!(
            summary.outcome(ArtifactKind::InputConfig),
            Some(&ComparisonOutcome::NotApplicable)
        );
        assert_eq!(recorder.calls.borrow().len(), 4);
    }

    #[test]
    fn test_one_sided_artifacts_are_classified() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(left.path(), "MHC_Class_I/s.all_epitopes.aggregated.tsv");
        touch(right.path(), "MHC_Class_I/s.all_epitopes.tsv");

        let recorder = Recorder::default();
        let columns = ColumnConfig::default();
        let summary = Dispatcher::new(&recorder, &columns, out.path()).dispatch(
            MhcClass::ClassI,
            "MHC_Class_I",
            left.path(),
            right.path(),
        );

        use ComparisonOutcome::*;
        assert_eq!(
            summary.entries,
            vec![
                (ArtifactKind::InputConfig, BothMissing),
                (ArtifactKind::AggregatedMetrics, BothMissing),
                (ArtifactKind::AggregatedTable, RightMissing),
                (ArtifactKind::UnaggregatedTable, LeftMissing),
                (ArtifactKind::ReferenceMatchTable, BothMissing),
            ]
        );
        assert!(recorder.calls.borrow().is_empty());
        assert_eq!(summary.missing(), 5);
    }

    #[test]
    fn test_comparator_failure_does_not_stop_later_kinds() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        full_tree(left.path(), "MHC_Class_II");
        full_tree(right.path(), "MHC_Class_II");

        let comparator = FailOn(ArtifactKind::AggregatedMetrics, Recorder::default());
        let columns = ColumnConfig::default();
        let summary = Dispatcher::new(&comparator, &columns, out.path()).dispatch(
            MhcClass::ClassII,
            "MHC_Class_II",
            left.path(),
            right.path(),
        );

        assert_eq!(
            summary.outcome(ArtifactKind::AggregatedMetrics),
            Some(&ComparisonOutcome::Failed("malformed content".into()))
        );
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.completed(), 4);
        assert_eq!(comparator.1.calls.borrow().len(), 5);
    }
}
