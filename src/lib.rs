//! # blockfs
//!
//! A miniature networked filesystem:
//! - Fixed-capacity directory of named files over a flat block store
//! - Contiguous first-fit block allocation with a free-block bitmap
//! - Metadata (directory + bitmap) persisted at offset 0 of the store
//! - Line-based TCP protocol (CREATE / READ / WRITE / LIST / DELETE / QUIT)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (thread per client connection)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one text command per line
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Engine                                  │
//! │          (single global lock around all state)               │
//! └──────┬──────────────┬───────────────────────┬───────────────┘
//!        │              │                       │
//!        ▼              ▼                       ▼
//! ┌─────────────┐ ┌─────────────┐       ┌─────────────┐
//! │  Directory  │ │ Free-Block  │       │   Backing   │
//! │    Table    │ │   Bitmap    │       │    Store    │
//! └─────────────┘ └─────────────┘       └─────────────┘
//! ```
//!
//! Every mutating operation updates the in-memory directory table and bitmap
//! in lock-step with the data region, then re-serializes the metadata region
//! and flushes it, so the last successfully persisted metadata image wins
//! after a crash.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod disk;
pub mod metadata;
pub mod engine;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FsError, Result};
pub use config::{Config, BLOCK_SIZE};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of blockfs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
