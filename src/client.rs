//! Client session
//!
//! Thin I/O loops over the wire contract: a scripted replay mode and an
//! interactive menu. Every request gets exactly one reply, except Quit,
//! which gets none.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::channel::ClientChannel;
use crate::error::{LibrisError, Result};
use crate::protocol::{OpKind, Request};

/// One client session over a connected channel
pub struct ClientSession {
    channel: ClientChannel,
}

impl ClientSession {
    /// Connect to the server session for `token`
    pub fn connect(pipe_dir: &Path, token: &str) -> Result<Self> {
        let channel = ClientChannel::connect(pipe_dir, token)?;
        Ok(Self { channel })
    }

    /// Send one request and read its reply
    pub fn request(&mut self, request: &Request) -> Result<String> {
        self.channel.send(request)?;
        self.channel.receive_reply()
    }

    /// Send Quit; the server never replies to it
    pub fn quit(&mut self) -> Result<()> {
        self.channel.send(&Request::quit())
    }

    // =========================================================================
    // Replay Mode
    // =========================================================================

    /// Feed a scripted request file through the session
    ///
    /// Lines read `op, title, isbn` with `op ∈ D|R|P|Q`; lines that do not
    /// parse are skipped, the way an interactive typo would be. Returns
    /// `true` when the script itself quit the session.
    pub fn replay(&mut self, path: &Path) -> Result<bool> {
        let script = fs::read_to_string(path)
            .map_err(|e| LibrisError::Setup(format!("reading {}: {e}", path.display())))?;

        for line in script.lines() {
            let Some(request) = parse_script_line(line) else {
                continue;
            };

            println!(
                "Operation: {:?}, Title: {}, ISBN: {}",
                request.op, request.title, request.isbn
            );

            if request.op == OpKind::Quit {
                self.quit()?;
                println!("\nThanks for using our system");
                return Ok(true);
            }

            let reply = self.request(&request)?;
            println!("\nReply: {reply}\n");
        }

        Ok(false)
    }

    // =========================================================================
    // Interactive Menu
    // =========================================================================

    /// Menu loop on stdin; returns after the user quits (or on EOF)
    pub fn interactive(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();

        loop {
            println!("Choose an option to file your request:\n");
            println!("1. Return a book");
            println!("2. Renew a book");
            println!("3. Borrow a book");
            println!("0. Exit\n");

            let Some(choice) = prompt(&mut input, "Option: ")? else {
                // EOF: leave cleanly, the server still needs its Quit
                self.quit()?;
                return Ok(());
            };

            let op = match choice.as_str() {
                "1" => OpKind::Return,
                "2" => OpKind::Renew,
                "3" => OpKind::Borrow,
                "0" => {
                    self.quit()?;
                    println!("\nThanks for using our system");
                    return Ok(());
                }
                _ => {
                    println!("Invalid input\n");
                    continue;
                }
            };

            let Some(title) = prompt(&mut input, "What is the title of the book?\n")? else {
                self.quit()?;
                return Ok(());
            };
            let Some(isbn) = prompt(&mut input, "What is the ISBN of the book?\n")? else {
                self.quit()?;
                return Ok(());
            };

            let request = match Request::new(op, title, isbn) {
                Ok(request) => request,
                Err(e) => {
                    println!("Invalid request: {e}\n");
                    continue;
                }
            };

            let reply = self.request(&request)?;
            println!("\nReply: {reply}\n");

            loop {
                let Some(again) = prompt(&mut input, "Submit another request? (y/n)\n")? else {
                    self.quit()?;
                    return Ok(());
                };
                match again.as_str() {
                    "n" => {
                        self.quit()?;
                        println!("\nThanks for using our system");
                        return Ok(());
                    }
                    "y" => {
                        println!();
                        break;
                    }
                    _ => println!("Invalid input, please enter 'y' or 'n'\n"),
                }
            }
        }
    }
}

/// Print a prompt and read one trimmed line; `None` on EOF
fn prompt<R: BufRead>(input: &mut R, text: &str) -> Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Parse a replay line: `op, title, isbn`
///
/// Returns `None` for blank or malformed lines.
pub fn parse_script_line(line: &str) -> Option<Request> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = line.splitn(3, ',');
    let op = fields.next()?.trim();
    let title = fields.next()?.trim();
    let isbn = fields.next()?.trim();

    if op.len() != 1 {
        return None;
    }
    let op = OpKind::from_wire(op.as_bytes()[0])?;

    Request::new(op, title, isbn).ok()
}
