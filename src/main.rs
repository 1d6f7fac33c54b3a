use anyhow::Result;
use clap::Parser;
use log::{Level, LevelFilter};
use pvaccompare::cli::Cli;
use pvaccompare::compare::ReportComparator;
use pvaccompare::config::load_config;
use pvaccompare::run::{run, RunSummary};
use std::io::Write;
use std::process::ExitCode;

/// Exit status when the run finished but some comparator rejected its input
const EXIT_COMPARATOR_FAILED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match execute(cli) {
        Ok(summary) if summary.failed() > 0 => ExitCode::from(EXIT_COMPARATOR_FAILED),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<RunSummary> {
    let file_config = load_config(cli.config.as_deref())?;
    let config = cli.into_run_config(&file_config);

    let summary = run(&config, &ReportComparator)?;

    log::info!(
        "\nFinished: {} comparisons completed, {} skipped for missing files, {} failed.",
        summary.completed(),
        summary.missing(),
        summary.failed()
    );
    log::info!("Reports written to {}", summary.output_root.display());
    Ok(summary)
}

// The log is the report operators read, so only errors and warnings get a tag
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(buf, "ERROR: {}", record.args()),
            Level::Warn => writeln!(buf, "WARNING: {}", record.args()),
            _ => writeln!(buf, "{}", record.args()),
        })
        .init();
}
