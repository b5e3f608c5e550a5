//! Metadata Module
//!
//! The in-memory metadata model and its on-disk form:
//! - [`FileRecord`]: one stored file (name, size, first block of its run)
//! - [`DirectoryTable`]: fixed-capacity array of optional records
//! - [`FreeBlockBitmap`]: per-block free flags + first-fit allocator
//! - [`codec`]: fixed-layout serialization of table + bitmap
//!
//! ## Metadata Region Layout
//! ```text
//! ┌──────────────────────────────────────────────┬──────────────────┐
//! │ max_files records, 16 bytes each             │ max_blocks bytes │
//! │ ┌─────────┬──────────┬─────────┬───────────┐ │ 1 = free         │
//! │ │used (1) │ name (11)│ size (2)│ block (2) │ │ 0 = allocated    │
//! │ └─────────┴──────────┴─────────┴───────────┘ │                  │
//! └──────────────────────────────────────────────┴──────────────────┘
//! ```
//! Size and first-block fields are big-endian `i16`; first block −1 means
//! "no blocks allocated".

mod bitmap;
mod record;
mod table;

pub mod codec;

pub use bitmap::FreeBlockBitmap;
pub use record::{FileRecord, MAX_FILE_SIZE, NAME_LEN};
pub use table::DirectoryTable;
