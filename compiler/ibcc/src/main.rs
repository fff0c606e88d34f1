//! IBC developer CLI.
//!
//! Thin wrapper over the front-end phases for inspecting their output.

use ibcc::commands::{check_file, format_files, lex_file, parse_file};

fn main() {
    ibcc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: ibc lex <file.ibc>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: ibc parse <file.ibc>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "fmt" => {
            format_files(&args[2..]);
        }
        "check" => {
            check_file(&args[2..]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("ibc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("IBC front end - developer tools");
    println!();
    println!("Usage: ibc <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>             Print the token stream");
    println!("  parse <file>           Print the AST as JSON");
    println!("  fmt [--check] <file>.. Print files rebuilt from their AST");
    println!("  check <file> [opts]    Resolve references and report issues");
    println!("      --dep <file>       Dependency source (repeatable)");
    println!("      --root <dir>       Project root for symbol paths (default: current dir)");
    println!("      --layout <json>    Project layout (descriptions, external libraries)");
    println!("      --all              Do not cap the number of reported errors");
    println!("  help                   Show this message");
    println!("  version                Show version");
    println!();
    println!("Set RUST_LOG=debug for phase tracing, IBC_LOG_TREE=1 for span trees.");
}
