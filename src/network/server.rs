//! TCP Server
//!
//! Accepts connections and dispatches each to its own handler thread.

use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::network::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_IDLE: Duration = Duration::from_millis(50);

/// TCP server for blockfs
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the listener for the configured address
    ///
    /// The listener is non-blocking so the accept loop can observe the
    /// shutdown flag between connections.
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// A flag that stops the accept loop when set
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run the accept loop (blocking)
    ///
    /// Each accepted connection gets its own thread; connections beyond
    /// `max_connections` are refused with an `ERROR:` line. Per-connection
    /// failures are logged and never stop the loop.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown requested, stopping accept loop");
                return Ok(());
            }

            let (stream, addr) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_IDLE);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    continue;
                }
            };

            if self.active.load(Ordering::Relaxed) >= self.config.max_connections {
                tracing::warn!("Refusing {}: connection limit reached", addr);
                Self::refuse(stream);
                continue;
            }

            self.spawn_handler(stream, addr);
        }
    }

    /// Hand one accepted stream to its own handler thread
    fn spawn_handler(&self, stream: TcpStream, addr: SocketAddr) {
        let engine = Arc::clone(&self.engine);
        let active = Arc::clone(&self.active);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        active.fetch_add(1, Ordering::Relaxed);

        thread::spawn(move || {
            let outcome = (|| -> Result<()> {
                // The accepted stream must block; only the listener is
                // non-blocking.
                stream.set_nonblocking(false)?;

                let mut connection = Connection::new(stream, engine)?;
                connection.set_timeouts(read_ms, write_ms)?;
                connection.handle()
            })();

            if let Err(e) = outcome {
                tracing::warn!("Connection from {} ended with error: {}", addr, e);
            }

            active.fetch_sub(1, Ordering::Relaxed);
        });
    }

    /// Tell a refused client why before hanging up
    fn refuse(stream: TcpStream) {
        let mut stream = stream;
        let _ = stream.write_all(b"ERROR: Too many connections.\n");
    }
}
