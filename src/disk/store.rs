//! Backing Store
//!
//! A flat file of fixed total size, accessed with seek + read/write. The
//! engine relies on `flush` after metadata writes so a metadata update is
//! either fully visible or not at all. No partial-write recovery is
//! attempted: a failure mid-write can leave the store inconsistent (accepted
//! limitation).

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{FsError, Result};

/// Fixed-size persistent region backing the filesystem
#[derive(Debug)]
pub struct BackingStore {
    /// Underlying store file, kept open for the engine's lifetime
    file: File,

    /// Total store size in bytes (metadata region + data region)
    total_size: u64,

    /// Whether open() created/extended a brand-new store
    fresh: bool,
}

impl BackingStore {
    /// Open or create a store of the given total size
    ///
    /// A zero-length (or absent) file is extended to `total_size` and
    /// reported as fresh, meaning the caller must initialize the metadata
    /// region. An existing file whose length does not match `total_size`
    /// was formatted with different geometry and is refused.
    pub fn open(path: &Path, total_size: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let existing_len = file.metadata()?.len();
        let fresh = existing_len == 0;

        if fresh {
            file.set_len(total_size)?;
        } else if existing_len != total_size {
            return Err(FsError::Config(format!(
                "Store {} is {} bytes, expected {} (geometry mismatch)",
                path.display(),
                existing_len,
                total_size
            )));
        }

        Ok(Self {
            file,
            total_size,
            fresh,
        })
    }

    /// Whether this store was created empty by `open`
    ///
    /// A fresh store has no metadata image to load; the engine initializes
    /// "all slots empty / all blocks free" and persists it.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Total store size in bytes
    pub fn len(&self) -> u64 {
        self.total_size
    }

    /// Read exactly `length` bytes starting at `offset`
    pub fn read_at(&mut self, offset: u64, length: usize) -> Result<Vec<u8>> {
        self.check_bounds(offset, length, "read")?;

        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; length];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Write `data` starting at `offset`
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        self.check_bounds(offset, data.len(), "write")?;

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;
        Ok(())
    }

    /// Force previously written bytes to durable storage
    pub fn flush(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Reject access past the end of the fixed-size region
    fn check_bounds(&self, offset: u64, length: usize, op: &str) -> Result<()> {
        let end = offset
            .checked_add(length as u64)
            .filter(|&end| end <= self.total_size);
        if end.is_none() {
            return Err(FsError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "{} of {} bytes at offset {} exceeds store size {}",
                    op, length, offset, self.total_size
                ),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fresh_store_is_zero_filled_and_sized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        let mut store = BackingStore::open(&path, 1024).unwrap();
        assert!(store.is_fresh());
        assert_eq!(store.len(), 1024);
        assert_eq!(store.read_at(0, 1024).unwrap(), vec![0u8; 1024]);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        let mut store = BackingStore::open(&path, 256).unwrap();
        store.write_at(100, b"hello").unwrap();
        store.flush().unwrap();
        assert_eq!(store.read_at(100, 5).unwrap(), b"hello");
    }

    #[test]
    fn reopen_is_not_fresh_and_keeps_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        {
            let mut store = BackingStore::open(&path, 256).unwrap();
            store.write_at(0, b"persisted").unwrap();
            store.flush().unwrap();
        }

        let mut store = BackingStore::open(&path, 256).unwrap();
        assert!(!store.is_fresh());
        assert_eq!(store.read_at(0, 9).unwrap(), b"persisted");
    }

    #[test]
    fn mismatched_size_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        BackingStore::open(&path, 256).unwrap();
        let err = BackingStore::open(&path, 512).unwrap_err();
        assert!(matches!(err, FsError::Config(_)));
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("disk.img");

        let mut store = BackingStore::open(&path, 256).unwrap();
        assert!(store.read_at(250, 10).is_err());
        assert!(store.write_at(256, b"x").is_err());
        assert!(store.read_at(u64::MAX, 1).is_err());
    }
}
