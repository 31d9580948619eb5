use clap::Parser;
use isf_catalogue::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(_summary) => {
            // Parse errors are reported in the summary; only fatal failures
            // change the exit code
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {error}");
            process::exit(1);
        }
    }
}

/// Show help information when no subcommand is provided
fn show_help_and_commands() {
    println!("ISF Catalogue - Seismic Bulletin Importer");
    println!("=========================================");
    println!();
    println!("Import seismic event catalogues distributed in the ISC's ISF");
    println!("bulletin format into structured catalogue records.");
    println!();
    println!("USAGE:");
    println!("    isf-catalogue <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import      Parse an ISF bulletin file and report the import summary");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Import a bulletin and print the summary:");
    println!("    isf-catalogue import bulletin.txt");
    println!();
    println!("    # Machine-readable summary, strict about leading junk:");
    println!("    isf-catalogue import bulletin.txt --format json --no-junk");
    println!();
    println!("For detailed help on any command, use:");
    println!("    isf-catalogue <COMMAND> --help");
}
