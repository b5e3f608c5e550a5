//! Command parsing
//!
//! Turns a raw request line into a [`Command`]. The verb is
//! case-insensitive; arguments are whitespace-separated tokens, and WRITE
//! content is the remaining tokens re-joined with single spaces.

use crate::error::{FsError, Result};

/// A parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty file
    Create { name: String },

    /// Read a file's content
    Read { name: String },

    /// Replace a file's content
    Write { name: String, content: String },

    /// List all file names
    List,

    /// Delete a file
    Delete { name: String },

    /// Close the connection
    Quit,
}

impl Command {
    /// Parse one request line
    ///
    /// Arity violations and unknown verbs produce the exact error messages
    /// clients see after the `ERROR: ` prefix.
    pub fn parse(line: &str) -> Result<Command> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let verb = tokens.first().map(|t| t.to_ascii_uppercase());

        match verb.as_deref() {
            Some("CREATE") => {
                if tokens.len() != 2 {
                    return Err(FsError::Protocol(
                        "CREATE command requires exactly 1 argument.".to_string(),
                    ));
                }
                Ok(Command::Create {
                    name: tokens[1].to_string(),
                })
            }
            Some("READ") => {
                if tokens.len() != 2 {
                    return Err(FsError::Protocol(
                        "READ command requires exactly 1 argument.".to_string(),
                    ));
                }
                Ok(Command::Read {
                    name: tokens[1].to_string(),
                })
            }
            Some("WRITE") => {
                if tokens.len() < 3 {
                    return Err(FsError::Protocol(
                        "WRITE command requires at least 2 arguments.".to_string(),
                    ));
                }
                Ok(Command::Write {
                    name: tokens[1].to_string(),
                    content: tokens[2..].join(" "),
                })
            }
            Some("LIST") => {
                if tokens.len() != 1 {
                    return Err(FsError::Protocol(
                        "LIST command does not take any arguments.".to_string(),
                    ));
                }
                Ok(Command::List)
            }
            Some("DELETE") => {
                if tokens.len() != 2 {
                    return Err(FsError::Protocol(
                        "DELETE command requires exactly 1 argument.".to_string(),
                    ));
                }
                Ok(Command::Delete {
                    name: tokens[1].to_string(),
                })
            }
            Some("QUIT") => Ok(Command::Quit),
            _ => Err(FsError::Protocol("Unknown command.".to_string())),
        }
    }
}
