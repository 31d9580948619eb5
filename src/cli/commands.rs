//! Command implementations for the ISF catalogue importer CLI

use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::app::services::catalogue::MemoryCatalogue;
use crate::app::services::isf_parser::{ImportOptions, ImportSummary, Importer};
use crate::cli::args::{Args, Commands, ImportArgs, OutputFormat};
use crate::{Error, Result};

/// Main command runner
pub fn run(args: Args) -> Result<ImportSummary> {
    match args.command {
        Some(Commands::Import(import_args)) => run_import(&import_args),
        None => Err(Error::configuration("no command given")),
    }
}

/// Execute the import command: parse the bulletin into a fresh in-memory
/// catalogue and report the summary
fn run_import(args: &ImportArgs) -> Result<ImportSummary> {
    setup_logging(args);

    info!("importing ISF bulletin {}", args.input.display());
    args.validate()?;

    let start_time = Instant::now();
    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);

    let progress_bar = if args.show_progress() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} lines {msg}")
                .unwrap(),
        );
        pb.set_message(format!("parsing {}", args.input.display()));
        Some(pb)
    } else {
        None
    };

    let options = ImportOptions {
        allow_junk: !args.no_junk,
    };
    let mut catalogue = MemoryCatalogue::new();
    let summary = Importer::new(&mut catalogue)
        .import_with_progress(reader, &options, |line_num| {
            if let Some(pb) = &progress_bar {
                pb.set_position(line_num as u64);
            }
        })?;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("done");
    }
    debug!(elapsed = ?start_time.elapsed(), "import finished");

    match args.format {
        OutputFormat::Human => report_human(args, &summary, start_time),
        OutputFormat::Json => report_json(&summary)?,
    }

    Ok(summary)
}

/// Set up tracing output according to the verbosity flags
fn setup_logging(args: &ImportArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("isf_catalogue={}", args.get_log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Print a human-readable summary of the run
fn report_human(args: &ImportArgs, summary: &ImportSummary, start_time: Instant) {
    if args.quiet {
        return;
    }

    println!();
    println!(
        "{} {} in {}",
        "Imported".green().bold(),
        args.input.display(),
        HumanDuration(start_time.elapsed())
    );
    println!("  event sources created: {}", summary.event_sources_created);
    println!("  events created:        {}", summary.events_created);
    println!("  agencies created:      {}", summary.agencies_created);
    println!("  origins created:       {}", summary.origins_created);
    println!("  measures created:      {}", summary.measures_created);

    if summary.has_errors() {
        println!(
            "  {} {}",
            "parse errors:".yellow().bold(),
            summary.errors.len()
        );
        for error in &summary.errors {
            println!("    {}", error.to_string().yellow());
        }
    } else {
        println!("  parse errors:          0");
    }
}

/// Print the summary as JSON for scripting
fn report_json(summary: &ImportSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|err| Error::configuration(format!("failed to serialize summary: {err}")))?;
    println!("{json}");
    Ok(())
}
