use anyhow::Context;
use clap::Parser;
use port_receiving::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let result = commands::run(&args).context("port-receiving failed");

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Port Receiving - Supervision Export Cleaner");
    println!("===========================================");
    println!();
    println!("Parse bag identifiers, report duplicate and suspicious bag ids and");
    println!("produce the PRN ingestion CSV for a time window.");
    println!();
    println!("USAGE:");
    println!("    port-receiving <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Run the pipeline and write the reports and PRN export");
    println!("    check       Verify that the required columns resolve");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Process a workbook with the default window (all added dates):");
    println!("    port-receiving process supervision.xlsx -o out/");
    println!();
    println!("    # Export one shift:");
    println!("    port-receiving process supervision.xlsx --start-date 2024-01-02 --start-time 06:00 \\");
    println!("                           --end-date 2024-01-02 --end-time 14:00");
    println!();
    println!("    # Check a CSV export without a title row:");
    println!("    port-receiving check export.csv --header-row 0");
    println!();
    println!("For detailed help on any command, use:");
    println!("    port-receiving <COMMAND> --help");
}
