//! Engine Module
//!
//! The storage engine that coordinates all components.
//!
//! ## Responsibilities
//! - Own the backing store, directory table, and free-block bitmap
//! - Serialize every operation under one global lock
//! - Keep in-memory state and the persisted metadata region in lock-step
//! - Load existing metadata on startup, initialize a fresh store otherwise
//!
//! ## Concurrency Model: Single Global Lock
//!
//! All mutable state lives in one struct behind one `parking_lot::Mutex`,
//! held for the full duration of each public operation including the backing
//! store I/O and the metadata flush. Callers observe the engine as strictly
//! sequential; the guard releases the lock on every exit path. This trades
//! throughput for correctness on a single shared disk image, so there is no
//! per-file locking.

use std::fs;
use std::path::Path;

use parking_lot::Mutex;

use crate::config::{Config, BLOCK_SIZE};
use crate::disk::BackingStore;
use crate::error::{FsError, Result};
use crate::metadata::{codec, DirectoryTable, FileRecord, FreeBlockBitmap, MAX_FILE_SIZE, NAME_LEN};

/// The directory table, bitmap, and disk handle, guarded as one unit
#[derive(Debug)]
struct EngineState {
    disk: BackingStore,
    table: DirectoryTable,
    bitmap: FreeBlockBitmap,
}

/// The main storage engine
///
/// One owned instance per backing-store path: construct with
/// [`Engine::open`], tear down with [`Engine::close`]. There is no hidden
/// process-wide instance.
#[derive(Debug)]
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Metadata region size in bytes; data block 0 starts right after
    meta_region_size: u64,

    /// All mutable state under the single global lock
    state: Mutex<EngineState>,
}

impl Engine {
    /// Open or create an engine over the configured backing store
    ///
    /// On startup:
    /// 1. Validate the configured geometry
    /// 2. Open/create the flat store file at its fixed total size
    /// 3. Fresh store: initialize all-empty/all-free and persist it
    /// 4. Existing store: decode the metadata region at offset 0
    pub fn open(config: Config) -> Result<Self> {
        validate_geometry(&config)?;

        // The metadata region is rounded up to a block boundary so the data
        // region is block-aligned and can never overlap the serialized bytes.
        let encoded_len = codec::encoded_len(config.max_files, config.max_blocks);
        let meta_region_size = (encoded_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE) as u64;
        let total_size = meta_region_size + (config.max_blocks * BLOCK_SIZE) as u64;

        if let Some(parent) = config.disk_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut disk = BackingStore::open(&config.disk_path, total_size)?;

        let (table, bitmap) = if disk.is_fresh() {
            let table = DirectoryTable::new(config.max_files);
            let bitmap = FreeBlockBitmap::new(config.max_blocks);

            // Persist the initial image so a crash before the first mutation
            // still leaves a decodable store.
            disk.write_at(0, &codec::encode(&table, &bitmap))?;
            disk.flush()?;

            tracing::info!(
                path = %config.disk_path.display(),
                total_size,
                "initialized fresh store"
            );
            (table, bitmap)
        } else {
            let image = disk.read_at(0, encoded_len)?;
            let (table, bitmap) = codec::decode(&image, config.max_files, config.max_blocks)?;
            validate_image(&table, &bitmap)?;

            tracing::info!(
                path = %config.disk_path.display(),
                files = table.file_count(),
                free_blocks = bitmap.free_count(),
                "loaded existing store"
            );
            (table, bitmap)
        };

        Ok(Self {
            config,
            meta_region_size,
            state: Mutex::new(EngineState {
                disk,
                table,
                bitmap,
            }),
        })
    }

    /// Open with a store path (convenience method)
    ///
    /// Uses default config with the specified backing-store file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().disk_path(path).build();
        Self::open(config)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create an empty file
    ///
    /// Fails with a ValidationError on an empty, overlong, or duplicate
    /// name and a CapacityError when the directory is full.
    pub fn create(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let mut state = self.state.lock();
        state.table.insert(FileRecord::empty(name))?;
        self.persist(&mut state)?;

        tracing::debug!(name, "file created");
        Ok(())
    }

    /// Delete a file, freeing and scrubbing its blocks
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let mut state = self.state.lock();
        let index = state
            .table
            .find(name)
            .ok_or_else(|| FsError::validation(format!("File not found: {}", name)))?;

        let record = state
            .table
            .clear(index)
            .ok_or_else(|| FsError::validation(format!("File not found: {}", name)))?;

        if let Some(start) = record.first_block {
            let blocks = record.blocks_needed();

            // Best-effort scrub: a fault here loses the zeroing, not the
            // delete itself.
            let zeros = vec![0u8; blocks * BLOCK_SIZE];
            if let Err(e) = state.disk.write_at(self.block_offset(start), &zeros) {
                tracing::warn!(name, error = %e, "failed to scrub freed blocks");
            }

            state.bitmap.mark_free(start, blocks);
        }

        self.persist(&mut state)?;

        tracing::debug!(name, "file deleted");
        Ok(())
    }

    /// Write content to an existing file, replacing what was there
    ///
    /// The file's current run is freed before the new allocation, so every
    /// write re-evaluates placement for the new size. When no contiguous run
    /// is long enough the old blocks stay freed and the record is reset to
    /// empty before the CapacityError is returned: a failed write discards
    /// the previous content.
    pub fn write(&self, name: &str, data: &[u8]) -> Result<()> {
        validate_name(name)?;
        if data.len() > MAX_FILE_SIZE {
            return Err(FsError::validation(format!(
                "File content too large: {} bytes (max {})",
                data.len(),
                MAX_FILE_SIZE
            )));
        }

        let mut state = self.state.lock();
        let index = state
            .table
            .find(name)
            .ok_or_else(|| FsError::validation(format!("File not found: {}", name)))?;

        // Free the old run first (observed source behavior, kept on purpose).
        let old_extent = state
            .table
            .record_at(index)
            .and_then(|old| old.first_block.map(|start| (start, old.blocks_needed())));
        if let Some((old_start, old_blocks)) = old_extent {
            state.bitmap.mark_free(old_start, old_blocks);
        }

        let blocks_needed = data.len().div_ceil(BLOCK_SIZE);
        if blocks_needed == 0 {
            state.table.replace(index, FileRecord::empty(name));
            self.persist(&mut state)?;
            return Ok(());
        }

        let start = match state.bitmap.first_fit(blocks_needed) {
            Some(start) => start,
            None => {
                // The old blocks are gone; record that explicitly so the
                // metadata invariants hold and readers see an empty file.
                state.table.replace(index, FileRecord::empty(name));
                self.persist(&mut state)?;
                return Err(FsError::capacity("Not enough free blocks."));
            }
        };

        state.bitmap.mark_allocated(start, blocks_needed);
        state.disk.write_at(self.block_offset(start), data)?;
        state
            .table
            .replace(index, FileRecord::with_extent(name, data.len(), start));
        self.persist(&mut state)?;

        tracing::debug!(name, bytes = data.len(), start, blocks_needed, "file written");
        Ok(())
    }

    /// Read a file's current content verbatim
    ///
    /// A file with no allocated blocks (never written, or emptied by a
    /// failed write) reads as an empty byte sequence.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        validate_name(name)?;

        let mut state = self.state.lock();
        let record = state
            .table
            .get(name)
            .cloned()
            .ok_or_else(|| FsError::validation(format!("File not found: {}", name)))?;

        match record.first_block {
            Some(start) if record.size > 0 => {
                state.disk.read_at(self.block_offset(start), record.size)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Names of all stored files, in slot order (no I/O)
    pub fn list(&self) -> Vec<String> {
        self.state.lock().table.names()
    }

    /// Close the engine, forcing any buffered bytes to disk
    pub fn close(self) -> Result<()> {
        let mut state = self.state.lock();
        state.disk.flush()?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Serialize and durably flush the metadata region
    ///
    /// Called after every mutation while the lock is held, so the persisted
    /// image always matches the in-memory table and bitmap. A flush failure
    /// leaves memory ahead of disk until the next successful persist.
    fn persist(&self, state: &mut EngineState) -> Result<()> {
        let image = codec::encode(&state.table, &state.bitmap);
        state.disk.write_at(0, &image)?;
        state.disk.flush()
    }

    /// Byte offset of data block `block` within the backing store
    fn block_offset(&self, block: usize) -> u64 {
        self.meta_region_size + (block * BLOCK_SIZE) as u64
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        self.state.lock().table.file_count()
    }

    /// Number of free data blocks
    pub fn free_blocks(&self) -> usize {
        self.state.lock().bitmap.free_count()
    }

    /// Sum of blocks owned by live records (bitmap accounting check)
    pub fn allocated_blocks(&self) -> usize {
        self.state
            .lock()
            .table
            .records()
            .map(|rec| rec.blocks_needed())
            .sum()
    }

    /// Metadata region size in bytes
    pub fn meta_region_size(&self) -> u64 {
        self.meta_region_size
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Reject geometry the on-disk format cannot represent
fn validate_geometry(config: &Config) -> Result<()> {
    if config.max_files == 0 {
        return Err(FsError::Config("max_files must be at least 1".to_string()));
    }
    if config.max_blocks == 0 {
        return Err(FsError::Config("max_blocks must be at least 1".to_string()));
    }
    if config.max_blocks > i16::MAX as usize {
        return Err(FsError::Config(format!(
            "max_blocks {} exceeds the on-disk limit of {}",
            config.max_blocks,
            i16::MAX
        )));
    }
    Ok(())
}

/// Cross-record invariants the codec leaves to the engine
///
/// The codec only checks field shape, so a torn metadata write can decode
/// into records whose runs point past the data region (or into a
/// size/first-block mismatch). Catching that here turns a later
/// out-of-range bitmap access into a typed open failure.
fn validate_image(table: &DirectoryTable, bitmap: &FreeBlockBitmap) -> Result<()> {
    for record in table.records() {
        match record.first_block {
            Some(start) => {
                if record.size == 0 {
                    return Err(FsError::Metadata(format!(
                        "file '{}' has blocks allocated but size 0",
                        record.name
                    )));
                }
                let end = start + record.blocks_needed();
                if end > bitmap.block_count() {
                    return Err(FsError::Metadata(format!(
                        "file '{}' occupies blocks [{}, {}) but the store has {}",
                        record.name,
                        start,
                        end,
                        bitmap.block_count()
                    )));
                }
            }
            None => {
                if record.size > 0 {
                    return Err(FsError::Metadata(format!(
                        "file '{}' has size {} but no blocks",
                        record.name, record.size
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Names must be non-empty and fit the fixed 11-byte field
///
/// Rejecting overlong names here (instead of letting the codec truncate)
/// keeps a file's name stable across a reopen.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FsError::validation("Filename cannot be empty."));
    }
    if name.len() > NAME_LEN {
        return Err(FsError::validation(format!(
            "Filename too long: {} bytes (max {})",
            name.len(),
            NAME_LEN
        )));
    }
    Ok(())
}
