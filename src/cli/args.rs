//! Command-line argument definitions for the ISF catalogue importer

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the ISF catalogue importer
#[derive(Debug, Clone, Parser)]
#[command(
    name = "isf-catalogue",
    version,
    about = "Import seismic event catalogues from ISF bulletin files",
    long_about = "Parses seismic bulletins in the ISC's ISF fixed-width format \
                  (http://www.isc.ac.uk/standards/isf/) into structured catalogue \
                  records: event sources, events, origins, agencies, and magnitude \
                  measures. Malformed blocks are skipped and reported; the rest of \
                  the bulletin is imported."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse an ISF bulletin file and report the import summary
    Import(ImportArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Path to the ISF bulletin file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Reject unexpected lines before the first catalogue header
    ///
    /// By default, banner boilerplate ahead of the "ISC Bulletin" header is
    /// silently skipped. With this flag such lines are recorded as parse
    /// errors instead.
    #[arg(long = "no-junk", help = "Treat leading junk lines as parse errors")]
    pub no_junk: bool,

    /// Output format for the import summary
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the import summary"
    )]
    pub format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Output format options for the import summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl ImportArgs {
    /// Validate the import command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::configuration(format!(
                "input file does not exist: {}",
                self.input.display()
            )));
        }
        if !self.input.is_file() {
            return Err(Error::configuration(format!(
                "input path is not a file: {}",
                self.input.display()
            )));
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show a progress bar (not in quiet or JSON mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Human
    }
}
