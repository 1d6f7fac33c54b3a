//! The run controller: validation, layout cross-check, output preparation,
//! then one dispatch per requested class.

use std::path::PathBuf;

use crate::columns::ColumnConfig;
use crate::compare::Comparator;
use crate::dispatch::{ClassSummary, Dispatcher};
use crate::errors::{CompareError, Result};
use crate::layout::{detect, MhcClass, ReleaseLayout};
use crate::output::prepare_output_root;

/// Everything one invocation needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub results_folder1: PathBuf,
    pub results_folder2: PathBuf,
    /// Base directory; the timestamped run folder is created inside it
    pub output_dir: PathBuf,
    /// Restrict to one class; `None` runs both
    pub mhc_class: Option<MhcClass>,
    pub columns: ColumnConfig,
}

impl RunConfig {
    pub fn classes(&self) -> Vec<MhcClass> {
        match self.mhc_class {
            Some(class) => vec![class],
            None => MhcClass::ALL.to_vec(),
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub layout: ReleaseLayout,
    pub output_root: PathBuf,
    pub classes: Vec<ClassSummary>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.classes.iter().map(ClassSummary::failed).sum()
    }

    pub fn completed(&self) -> usize {
        self.classes.iter().map(ClassSummary::completed).sum()
    }

    pub fn missing(&self) -> usize {
        self.classes.iter().map(ClassSummary::missing).sum()
    }
}

/// Detect both layouts and insist they agree
pub fn resolve_layout(config: &RunConfig) -> Result<ReleaseLayout> {
    let left = detect(&config.results_folder1)?;
    let right = detect(&config.results_folder2)?;

    if left != right {
        return Err(CompareError::LayoutMismatch {
            left,
            right,
            left_path: config.results_folder1.clone(),
            right_path: config.results_folder2.clone(),
        });
    }
    Ok(left)
}

/// Run every requested comparison.
///
/// Fatal problems (bad column selection, unknown or mismatched layouts) are
/// reported before anything is written. Once the output tree exists, the run
/// always goes through every requested class.
pub fn run(config: &RunConfig, comparator: &dyn Comparator) -> Result<RunSummary> {
    config.columns.validate()?;

    let layout = resolve_layout(config)?;
    log::debug!("Comparing two {} releases", layout);

    let classes = config.classes();
    let output_root = prepare_output_root(&config.output_dir, &classes)?;

    let dispatcher = Dispatcher::new(comparator, &config.columns, &output_root);
    let summaries = classes
        .into_iter()
        .map(|class| {
            let prefix = layout.prefix(class);
            log::info!("Comparing {} results under {}", class, prefix);
            dispatcher.dispatch(
                class,
                prefix,
                &config.results_folder1,
                &config.results_folder2,
            )
        })
        .collect();

    Ok(RunSummary {
        layout,
        output_root,
        classes: summaries,
    })
}
