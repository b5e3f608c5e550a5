//! Disk Module
//!
//! The backing store: a fixed-size, byte-addressable persistent region with
//! positioned reads/writes and a durable flush. Leaf dependency of everything
//! else in the engine.

mod store;

pub use store::BackingStore;
