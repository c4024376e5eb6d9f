//! Libris Client Binary
//!
//! Interactive menu and scripted replay over the session's named pipes.

use std::path::PathBuf;

use clap::Parser;

use libris::client::ClientSession;

/// Libris Client
#[derive(Parser, Debug)]
#[command(name = "libris-client")]
#[command(about = "Library lending client over named pipes")]
#[command(version)]
struct Args {
    /// Receiver token the pipe paths derive from (required)
    #[arg(short = 'p', long = "pipe")]
    pipe: Option<String>,

    /// Scripted request file replayed before the menu
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let Some(token) = args.pipe else {
        eprintln!("Usage: libris-client -p <pipeToken> [-i <replayFile>]");
        eprintln!("Error: the -p parameter is required.");
        std::process::exit(-1);
    };

    let mut session = match ClientSession::connect(&std::env::temp_dir(), &token) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error connecting to server: {e}");
            std::process::exit(1);
        }
    };

    println!("Welcome to the library lending system\n");

    if let Some(script) = args.input {
        match session.replay(&script) {
            Ok(true) => return, // the script quit the session
            Ok(false) => {}
            Err(e) => {
                eprintln!("Error replaying {}: {e}", script.display());
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = session.interactive() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
