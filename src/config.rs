//! Configuration for blockfs
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Size of one data-region block in bytes (fixed by the on-disk format)
pub const BLOCK_SIZE: usize = 128;

/// Main configuration for a blockfs instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the flat backing-store file ("virtual disk").
    /// Layout:
    ///   [ metadata region | block 0 | block 1 | ... | block max_blocks-1 ]
    pub disk_path: PathBuf,

    /// Directory capacity: maximum number of stored files
    pub max_files: usize,

    /// Data-region capacity in blocks (must fit in an i16 on disk)
    pub max_blocks: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = no timeout)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = no timeout)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disk_path: PathBuf::from("./blockfs.img"),
            max_files: 16,
            max_blocks: 256,
            listen_addr: "127.0.0.1:7070".to_string(),
            max_connections: 64,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing-store file path
    pub fn disk_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.disk_path = path.into();
        self
    }

    /// Set the directory capacity (maximum number of files)
    pub fn max_files(mut self, count: usize) -> Self {
        self.config.max_files = count;
        self
    }

    /// Set the data-region capacity in blocks
    pub fn max_blocks(mut self, count: usize) -> Self {
        self.config.max_blocks = count;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds, 0 disables)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 disables)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
