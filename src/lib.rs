// Export modules for library usage
pub mod artifacts;
pub mod cli;
pub mod columns;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod layout;
pub mod locator;
pub mod output;
pub mod run;

// Re-export commonly used types
pub use crate::artifacts::ArtifactKind;
pub use crate::columns::ColumnConfig;
pub use crate::compare::{Comparator, ComparisonRequest, ReportComparator};
pub use crate::dispatch::{Availability, ClassSummary, ComparisonOutcome, Dispatcher};
pub use crate::errors::CompareError;
pub use crate::layout::{detect, MhcClass, ReleaseLayout};
pub use crate::locator::locate;
pub use crate::output::prepare_output_root;
pub use crate::run::{run, RunConfig, RunSummary};
