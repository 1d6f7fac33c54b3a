//! Creation of the timestamped output tree.

use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{CompareError, Result};
use crate::layout::MhcClass;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_SUFFIX: usize = 100;

/// Create `{base}/results_{YYYYMMDD_HHMMSS}` and one subdirectory per class.
pub fn prepare_output_root(base: &Path, classes: &[MhcClass]) -> Result<PathBuf> {
    prepare_output_root_at(base, classes, Local::now())
}

/// Same as [`prepare_output_root`] with an explicit timestamp.
///
/// The run directory is never reused. If a directory with the same timestamp
/// already exists, `_1`, `_2`, ... is appended until a fresh name is found.
pub fn prepare_output_root_at(
    base: &Path,
    classes: &[MhcClass],
    now: DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(base).map_err(|source| CompareError::OutputRoot {
        path: base.to_path_buf(),
        source,
    })?;

    let stem = format!("results_{}", now.format(TIMESTAMP_FORMAT));
    let root = create_unique_dir(base, &stem)?;

    for class in classes {
        let dir = root.join(class.output_dir_name());
        fs::create_dir(&dir).map_err(|source| CompareError::OutputRoot { path: dir, source })?;
    }

    log::debug!("Writing comparison reports to {}", root.display());
    Ok(root)
}

fn create_unique_dir(base: &Path, stem: &str) -> Result<PathBuf> {
    let mut last_error = None;
    for attempt in 0..=MAX_SUFFIX {
        let name = match attempt {
            0 => stem.to_string(),
            n => format!("{}_{}", stem, n),
        };
        let candidate = base.join(name);
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("{} already exists", candidate.display());
                last_error = Some((candidate, e));
            }
            Err(source) => {
                return Err(CompareError::OutputRoot {
                    path: candidate,
                    source,
                })
            }
        }
    }

    let (path, source) = last_error.unwrap_or_else(|| {
        (
            base.join(stem),
            std::io::Error::from(ErrorKind::AlreadyExists),
        )
    });
    Err(CompareError::OutputRoot { path, source })
}

/// Path of the per-class folder inside an output root
pub fn class_output_dir(root: &Path, class: MhcClass) -> PathBuf {
    root.join(class.output_dir_name())
}
