//! Libris Server Binary
//!
//! Receives lending requests over the session's named pipes.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use libris::{Server, ServerConfig};

/// Libris Server
#[derive(Parser, Debug)]
#[command(name = "libris-server")]
#[command(about = "Library lending server over named pipes")]
#[command(version)]
struct Args {
    /// Receiver token the pipe paths derive from (required)
    #[arg(short = 'p', long = "pipe")]
    pipe: Option<String>,

    /// Catalog data file (required)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Verbose request trace
    #[arg(short = 'v', long)]
    verbose: bool,

    /// End-of-run report snapshot file
    #[arg(short = 's', long = "snapshot")]
    snapshot: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging; -v surfaces the per-request trace
    let default_filter = if args.verbose {
        "info,libris=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let (token, catalog_path) = match (args.pipe, args.file) {
        (Some(token), Some(catalog_path)) => (token, catalog_path),
        _ => {
            eprintln!("Usage: libris-server -p <pipeToken> -f <catalogFile> [-v] [-s <reportFile>]");
            eprintln!("Error: the -p and -f parameters are required.");
            std::process::exit(-1);
        }
    };

    tracing::info!("Libris server v{}", libris::VERSION);

    let config = ServerConfig::builder()
        .token(token)
        .catalog_path(catalog_path)
        .report_path(args.snapshot)
        .build();

    let mut server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("setup failed: {e}");
            std::process::exit(1);
        }
    };

    println!("Welcome to the library request receiver\n");

    if let Err(e) = server.run() {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }

    tracing::info!("server stopped");
}
