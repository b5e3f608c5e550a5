//! blockfs CLI Client
//!
//! Talks the line protocol to a running blockfs server: either one-shot
//! subcommands or an interactive session reading commands from stdin.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// blockfs CLI
#[derive(Parser, Debug)]
#[command(name = "blockfs-cli")]
#[command(about = "CLI for the blockfs file server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7070")]
    server: String,

    /// One-shot command; omit for an interactive session
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty file
    Create {
        /// File name (max 11 bytes)
        name: String,
    },

    /// Read a file's content
    Read {
        /// The file to read
        name: String,
    },

    /// Replace a file's content
    Write {
        /// The file to write
        name: String,

        /// The new content
        content: String,
    },

    /// List all file names
    List,

    /// Delete a file
    Delete {
        /// The file to delete
        name: String,
    },
}

impl Commands {
    /// The request line this subcommand sends
    fn request_line(&self) -> String {
        match self {
            Commands::Create { name } => format!("CREATE {}", name),
            Commands::Read { name } => format!("READ {}", name),
            Commands::Write { name, content } => format!("WRITE {} {}", name, content),
            Commands::List => "LIST".to_string(),
            Commands::Delete { name } => format!("DELETE {}", name),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let stream = match TcpStream::connect(&args.server) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to connect to {}: {}", args.server, e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Some(command) => one_shot(stream, &command),
        None => interactive(stream),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Connection error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Send one command, print the response, then quit cleanly
fn one_shot(stream: TcpStream, command: &Commands) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    let response = round_trip(&mut reader, &mut writer, &command.request_line())?;
    println!("{}", response);

    let _ = round_trip(&mut reader, &mut writer, "QUIT");
    Ok(())
}

/// Forward stdin lines to the server until QUIT or EOF
fn interactive(stream: TcpStream) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = round_trip(&mut reader, &mut writer, &line)?;
        println!("{}", response);

        if line.trim().eq_ignore_ascii_case("QUIT") {
            break;
        }
    }
    Ok(())
}

/// Send one request line and read the single response line
fn round_trip(
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    request: &str,
) -> io::Result<String> {
    writeln!(writer, "{}", request)?;
    writer.flush()?;

    let mut response = String::new();
    reader.read_line(&mut response)?;
    Ok(response.trim_end_matches(['\r', '\n']).to_string())
}
