//! Protocol Module
//!
//! The line protocol spoken between clients and the server: one
//! newline-delimited ASCII request per line over a persistent connection.
//!
//! ## Requests
//! ```text
//! CREATE <name>
//! READ   <name>
//! WRITE  <name> <content...>
//! LIST
//! DELETE <name>
//! QUIT
//! ```
//!
//! ## Responses
//! One line per request: `SUCCESS: <detail>` or `ERROR: <message>`. A
//! malformed or failing request never terminates the connection; only QUIT
//! (or the client hanging up) does.

mod command;
mod response;

pub use command::Command;
pub use response::Response;
