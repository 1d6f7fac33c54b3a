//! Release layout detection and MHC class naming.
//!
//! Pipeline distributions put the per-class results in one of two directory
//! layouts. The immuno workflow writes `MHC_Class_I` / `MHC_Class_II` at the
//! top of the results folder, while a standalone pVACtools run nests them as
//! `pVACseq/mhc_i` / `pVACseq/mhc_ii`. Everything downstream derives its
//! search prefix from the pair ([`ReleaseLayout`], [`MhcClass`]).

use std::fmt;
use std::path::Path;

use crate::errors::{CompareError, Result};

/// One of the two known results-folder layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseLayout {
    /// `MHC_Class_I` / `MHC_Class_II` at the top level
    ImmunoRelease,
    /// `pVACseq/mhc_i` / `pVACseq/mhc_ii`
    PVacToolsRelease,
}

const IMMUNO_SIGNATURE: [&str; 2] = ["MHC_Class_I", "MHC_Class_II"];
const PVACTOOLS_SIGNATURE: [&str; 2] = ["pVACseq/mhc_i", "pVACseq/mhc_ii"];

impl ReleaseLayout {
    /// Artifact prefix, relative to the results folder, for one class
    pub fn prefix(self, class: MhcClass) -> &'static str {
        let signature = match self {
            Self::ImmunoRelease => &IMMUNO_SIGNATURE,
            Self::PVacToolsRelease => &PVACTOOLS_SIGNATURE,
        };
        match class {
            MhcClass::ClassI => signature[0],
            MhcClass::ClassII => signature[1],
        }
    }
}

impl fmt::Display for ReleaseLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImmunoRelease => write!(f, "immuno"),
            Self::PVacToolsRelease => write!(f, "pVACtools"),
        }
    }
}

/// Classify a results folder by probing for the known class directories.
///
/// The immuno signature is checked first. Either class directory is enough,
/// since a run may have been restricted to one class.
pub fn detect(tree: &Path) -> Result<ReleaseLayout> {
    let has_any = |signature: &[&str]| signature.iter().any(|dir| tree.join(dir).is_dir());

    if has_any(&IMMUNO_SIGNATURE[..]) {
        log::debug!("{} looks like an immuno release", tree.display());
        Ok(ReleaseLayout::ImmunoRelease)
    } else if has_any(&PVACTOOLS_SIGNATURE[..]) {
        log::debug!("{} looks like a pVACtools release", tree.display());
        Ok(ReleaseLayout::PVacToolsRelease)
    } else {
        Err(CompareError::LayoutUndetermined {
            path: tree.to_path_buf(),
        })
    }
}

/// MHC class prediction track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MhcClass {
    ClassI,
    ClassII,
}

impl MhcClass {
    pub const ALL: [MhcClass; 2] = [MhcClass::ClassI, MhcClass::ClassII];

    /// Name of the per-class folder inside the output root
    pub fn output_dir_name(self) -> &'static str {
        match self {
            Self::ClassI => "mhc_class_i",
            Self::ClassII => "mhc_class_ii",
        }
    }

    /// Class identifier as used on the command line and in reports ("1" / "2")
    pub fn id(self) -> &'static str {
        match self {
            Self::ClassI => "1",
            Self::ClassII => "2",
        }
    }

    /// Parse the command-line form ("1" or "2")
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "1" => Some(Self::ClassI),
            "2" => Some(Self::ClassII),
            _ => None,
        }
    }
}

impl fmt::Display for MhcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassI => write!(f, "MHC class I"),
            Self::ClassII => write!(f, "MHC class II"),
        }
    }
}
