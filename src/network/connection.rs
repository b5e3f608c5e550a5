//! Connection Handler
//!
//! Handles individual client connections: the line-in/line-out command loop.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::Engine;
use crate::error::{FsError, Result};
use crate::protocol::{Command, Response};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered, line-oriented)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the storage engine
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O on cloned read/write handles.
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency on one-line responses
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 disables)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads request lines in a loop and sends one response line each.
    /// Returns when the client quits, disconnects, or an unrecoverable
    /// stream error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                // EOF: client hung up
                Ok(0) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Ok(_) => {}
                Err(ref e) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} dropped: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            }

            let line = line.trim_end_matches(['\r', '\n']);
            tracing::trace!("Received from {}: {:?}", self.peer_addr, line);

            let response = match Command::parse(line) {
                Ok(command) => self.execute_command(command),
                Err(e) => Response::error(e),
            };

            if let Err(e) = self.send_response(&response) {
                if let FsError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }

            if matches!(response, Response::Disconnecting) {
                tracing::debug!("Client {} quit", self.peer_addr);
                return Ok(());
            }
        }
    }

    /// Execute a command against the engine and build the response line
    ///
    /// Every engine failure maps to an `ERROR:` line; the loop keeps going.
    fn execute_command(&self, command: Command) -> Response {
        let result = match command {
            Command::Create { name } => self
                .engine
                .create(&name)
                .map(|_| Response::Created { name }),
            Command::Read { name } => self.engine.read(&name).map(Response::Content),
            Command::Write { name, content } => self
                .engine
                .write(&name, content.as_bytes())
                .map(|_| Response::Written { name }),
            Command::List => Ok(Response::Listing(self.engine.list())),
            Command::Delete { name } => self
                .engine
                .delete(&name)
                .map(|_| Response::Deleted { name }),
            Command::Quit => Ok(Response::Disconnecting),
        };

        result.unwrap_or_else(Response::error)
    }

    /// Send one response line to the client
    fn send_response(&mut self, response: &Response) -> Result<()> {
        writeln!(self.writer, "{}", response)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// ErrorKinds that mean "the client went away", not "the server broke"
fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::WouldBlock
            | std::io::ErrorKind::TimedOut
    )
}
