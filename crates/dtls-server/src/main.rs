//! Design Tokens Language Server binary.
//!
//! One binary, no subcommands: reads framed JSON-RPC from stdin and writes
//! responses to stdout. Exit code 0 after a clean `shutdown`/`exit`
//! sequence, non-zero on transport error.

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    for arg in &args[1..] {
        match arg.as_str() {
            "--stdio" => {}
            "--version" => {
                println!("design-tokens-language-server {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_help();
                process::exit(1);
            }
        }
    }

    process::exit(dtls_server::run_stdio());
}

fn print_help() {
    eprintln!("Design Tokens Language Server");
    eprintln!();
    eprintln!("Usage: design-tokens-language-server [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --stdio      Use stdio for communication (default)");
    eprintln!("  --version    Show version information");
    eprintln!("  --help       Show this help message");
}
