use clap::Parser;
use std::path::PathBuf;

use crate::columns::{
    VALID_AGGREGATED_COLUMNS, VALID_REFERENCE_MATCH_COLUMNS, VALID_UNAGGREGATED_COLUMNS,
};
use crate::config::CompareConfig;
use crate::layout::MhcClass;
use crate::run::RunConfig;

const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Parser, Debug)]
#[command(name = "pvaccompare")]
#[command(
    about = "Compare the results of two pVACtools / immuno pipeline runs",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Path to first results input folder
    pub results_folder1: PathBuf,

    /// Path to second results input folder
    pub results_folder2: PathBuf,

    /// Where the timestamped output directory should be generated [default: output]
    #[arg(long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// Compare only MHC class 1 or class 2
    #[arg(long = "mhc_class", value_parser = parse_mhc_class)]
    pub mhc_class: Option<MhcClass>,

    /// Comma-separated columns to include in the aggregated TSV comparison
    #[arg(
        long = "aggregated_columns",
        value_delimiter = ',',
        long_help = column_help("aggregated", VALID_AGGREGATED_COLUMNS)
    )]
    pub aggregated_columns: Option<Vec<String>>,

    /// Comma-separated columns to include in the unaggregated TSV comparison
    #[arg(
        long = "unaggregated_columns",
        value_delimiter = ',',
        long_help = column_help("unaggregated", VALID_UNAGGREGATED_COLUMNS)
    )]
    pub unaggregated_columns: Option<Vec<String>>,

    /// Comma-separated columns to include in the reference match TSV comparison
    #[arg(
        long = "reference_match_columns",
        value_delimiter = ',',
        long_help = column_help("reference match", VALID_REFERENCE_MATCH_COLUMNS)
    )]
    pub reference_match_columns: Option<Vec<String>>,

    /// Configuration file (defaults to the nearest .pvaccompare.toml)
    #[arg(long, env = "PVACCOMPARE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

fn parse_mhc_class(value: &str) -> Result<MhcClass, String> {
    MhcClass::from_id(value).ok_or_else(|| format!("invalid MHC class '{}': expected 1 or 2", value))
}

fn column_help(name: &str, valid: &[&str]) -> String {
    format!(
        "Comma-separated columns to include in the {} TSV comparison, choices: {}",
        name,
        valid.join(", ")
    )
}

impl Cli {
    /// Merge the command line with a loaded configuration file
    pub fn into_run_config(self, file: &CompareConfig) -> RunConfig {
        let columns = file.resolve_columns(
            self.aggregated_columns,
            self.unaggregated_columns,
            self.reference_match_columns,
        );
        let output_dir = self
            .output_dir
            .or_else(|| file.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        RunConfig {
            results_folder1: self.results_folder1,
            results_folder2: self.results_folder2,
            output_dir,
            mhc_class: self.mhc_class,
            columns,
        }
    }
}
