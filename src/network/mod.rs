//! Network Module
//!
//! TCP front end for the engine: a listener that hands each accepted
//! connection to its own thread, and a per-connection loop that reads one
//! request line at a time, forwards it to the engine, and writes back one
//! response line. Operation failures become `ERROR:` lines; they never take
//! down the connection loop or the server process.

mod connection;
mod server;

pub use connection::Connection;
pub use server::Server;
