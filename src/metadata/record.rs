//! File records
//!
//! One record describes one stored file. Records are replaced wholesale on
//! every write, never mutated in place.

use crate::config::BLOCK_SIZE;

/// Maximum encoded file-name length in bytes
pub const NAME_LEN: usize = 11;

/// Maximum file size in bytes (the on-disk size field is a signed 2-byte int)
pub const MAX_FILE_SIZE: usize = i16::MAX as usize;

/// Metadata for one stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// File name, 1..=NAME_LEN bytes
    pub name: String,

    /// Byte length of the current content (0 if nothing written yet)
    pub size: usize,

    /// First block of the file's contiguous run, None if no blocks allocated
    pub first_block: Option<usize>,
}

impl FileRecord {
    /// A freshly created file: no content, no blocks
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            first_block: None,
        }
    }

    /// A file whose content occupies `size` bytes starting at block `start`
    pub fn with_extent(name: impl Into<String>, size: usize, start: usize) -> Self {
        Self {
            name: name.into(),
            size,
            first_block: Some(start),
        }
    }

    /// Number of blocks the current content occupies
    pub fn blocks_needed(&self) -> usize {
        blocks_for(self.size)
    }
}

/// Blocks required to hold `size` bytes
pub fn blocks_for(size: usize) -> usize {
    size.div_ceil(BLOCK_SIZE)
}
