// Test utility module for pvaccompare integration tests
#![allow(dead_code)]

use pvaccompare::{ArtifactKind, Comparator, ComparisonRequest, MhcClass};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const AGGREGATED_TSV: &str = "ID\tGene\tAA Change\tNum Passing Transcripts\tBest Peptide\tBest Transcript\tNum Passing Peptides\tTier
chr17-7675088-7675089-C-T\tTP53\tR175H\t2\tHMTEVVRHC\tENST00000269305\t4\tPass
chr12-25245350-25245351-C-A\tKRAS\tG12V\t1\tVVVGAVGVGK\tENST00000256078\t2\tAnchor
";

pub const UNAGGREGATED_TSV: &str = "Chromosome\tStart\tStop\tReference\tVariant\tTranscript\tHLA Allele\tMT Epitope Seq\tBiotype\tMedian MT IC50 Score
chr17\t7675088\t7675089\tC\tT\tENST00000269305\tHLA-A*02:01\tHMTEVVRHC\tprotein_coding\t120.5
chr12\t25245350\t25245351\tC\tA\tENST00000256078\tHLA-A*11:01\tVVVGAVGVGK\tprotein_coding\t42.0
";

pub const REFERENCE_MATCHES_TSV: &str = "ID\tHLA Allele\tMT Epitope Seq\tPeptide\tHit ID\tHit Definition\tMatch Window\tMatch Sequence
chr17-7675088-7675089-C-T\tHLA-A*02:01\tHMTEVVRHC\tHMTEVVRHC\tNP_000537\tcellular tumor antigen p53\tEVVRHC\tEVVRHC
";

pub const METRICS_JSON: &str = r#"{"chr17-7675088-7675089-C-T": {"good_binders": {"ENST00000269305": ["HMTEVVRHC"]}}}"#;

pub const INPUTS_YML: &str = "sample_name: HCC1395\nalleles:\n  - HLA-A*02:01\nbinding_threshold: 500\n";

/// A results folder laid out like a pipeline run
pub struct ResultTree {
    pub dir: TempDir,
}

impl ResultTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.path().join(relative)).unwrap();
        self
    }

    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Every artifact kind under `prefix`, with realistic content
    pub fn with_all_artifacts(self, prefix: &str) -> Self {
        self.with_file(&format!("{prefix}/log/inputs.yml"), INPUTS_YML)
            .with_file(
                &format!("{prefix}/HCC1395.all_epitopes.aggregated.metrics.json"),
                METRICS_JSON,
            )
            .with_file(
                &format!("{prefix}/HCC1395.all_epitopes.aggregated.tsv"),
                AGGREGATED_TSV,
            )
            .with_file(
                &format!("{prefix}/HCC1395.all_epitopes.tsv"),
                UNAGGREGATED_TSV,
            )
            .with_file(
                &format!("{prefix}/HCC1395.all_epitopes.aggregated.tsv.reference_matches"),
                REFERENCE_MATCHES_TSV,
            )
    }
}

/// A comparator invocation as seen by [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: ArtifactKind,
    pub class: MhcClass,
    pub left: PathBuf,
    pub right: PathBuf,
    pub columns: Option<Vec<String>>,
    pub output_dir: PathBuf,
}

/// Comparator double that records every call and writes nothing
#[derive(Default)]
pub struct Recorder {
    pub calls: RefCell<Vec<RecordedCall>>,
}

impl Comparator for Recorder {
    fn compare(&self, kind: ArtifactKind, request: &ComparisonRequest<'_>) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(RecordedCall {
            kind,
            class: request.class,
            left: request.left.to_path_buf(),
            right: request.right.to_path_buf(),
            columns: request.columns.map(<[String]>::to_vec),
            output_dir: request.output_dir.to_path_buf(),
        });
        Ok(())
    }
}
