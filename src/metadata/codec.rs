//! Metadata codec
//!
//! Serializes the directory table and free-block bitmap to the fixed-layout
//! metadata region at offset 0 of the backing store, and back.
//!
//! Per slot (16 bytes): 1 presence byte (0 = empty, 1 = occupied), 11 name
//! bytes (zero-padded, truncated if longer), big-endian `i16` size,
//! big-endian `i16` first block (−1 = no blocks). Then one byte per block
//! (1 = free, 0 = allocated).
//!
//! The codec validates field shape only; cross-record invariants (name
//! uniqueness, disjoint runs) are the engine's responsibility.

use crate::error::{FsError, Result};

use super::bitmap::FreeBlockBitmap;
use super::record::{FileRecord, NAME_LEN};
use super::table::DirectoryTable;

/// Encoded size of one directory slot
pub const RECORD_SIZE: usize = 1 + NAME_LEN + 2 + 2;

/// Encoded size of the whole metadata image for the given geometry
pub fn encoded_len(max_files: usize, max_blocks: usize) -> usize {
    max_files * RECORD_SIZE + max_blocks
}

/// Serialize the table and bitmap into one metadata image
pub fn encode(table: &DirectoryTable, bitmap: &FreeBlockBitmap) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(table.capacity(), bitmap.block_count()));

    for slot in table.slots() {
        match slot {
            Some(record) => {
                buf.push(1);

                let mut name = [0u8; NAME_LEN];
                let raw = record.name.as_bytes();
                let n = raw.len().min(NAME_LEN);
                name[..n].copy_from_slice(&raw[..n]);
                buf.extend_from_slice(&name);

                buf.extend_from_slice(&(record.size as i16).to_be_bytes());
                let first_block = record.first_block.map(|b| b as i16).unwrap_or(-1);
                buf.extend_from_slice(&first_block.to_be_bytes());
            }
            None => {
                buf.push(0);
                buf.extend_from_slice(&[0u8; NAME_LEN]);
                buf.extend_from_slice(&0i16.to_be_bytes());
                buf.extend_from_slice(&(-1i16).to_be_bytes());
            }
        }
    }

    for &free in bitmap.flags() {
        buf.push(free as u8);
    }

    buf
}

/// Deserialize a metadata image back into a table and bitmap
pub fn decode(
    bytes: &[u8],
    max_files: usize,
    max_blocks: usize,
) -> Result<(DirectoryTable, FreeBlockBitmap)> {
    let expected = encoded_len(max_files, max_blocks);
    if bytes.len() < expected {
        return Err(FsError::Metadata(format!(
            "metadata region truncated: expected {} bytes, got {}",
            expected,
            bytes.len()
        )));
    }

    let mut slots = Vec::with_capacity(max_files);
    for i in 0..max_files {
        let rec = &bytes[i * RECORD_SIZE..(i + 1) * RECORD_SIZE];
        slots.push(decode_record(i, rec)?);
    }

    let flags = bytes[max_files * RECORD_SIZE..expected]
        .iter()
        .map(|&b| b != 0)
        .collect();

    Ok((
        DirectoryTable::from_slots(slots),
        FreeBlockBitmap::from_flags(flags),
    ))
}

/// Decode one 16-byte slot; payload bytes of an empty slot are ignored
fn decode_record(slot: usize, rec: &[u8]) -> Result<Option<FileRecord>> {
    match rec[0] {
        0 => Ok(None),
        1 => {
            let name_bytes = &rec[1..1 + NAME_LEN];
            let name_end = name_bytes
                .iter()
                .position(|&b| b == 0)
                .unwrap_or(NAME_LEN);
            let name = std::str::from_utf8(&name_bytes[..name_end])
                .map_err(|_| {
                    FsError::Metadata(format!("slot {}: file name is not valid UTF-8", slot))
                })?
                .to_string();

            let size = i16::from_be_bytes([rec[12], rec[13]]);
            if size < 0 {
                return Err(FsError::Metadata(format!(
                    "slot {}: negative file size {}",
                    slot, size
                )));
            }

            let first_block = match i16::from_be_bytes([rec[14], rec[15]]) {
                -1 => None,
                b if b >= 0 => Some(b as usize),
                b => {
                    return Err(FsError::Metadata(format!(
                        "slot {}: invalid first block {}",
                        slot, b
                    )))
                }
            };

            Ok(Some(FileRecord {
                name,
                size: size as usize,
                first_block,
            }))
        }
        p => Err(FsError::Metadata(format!(
            "slot {}: invalid presence byte {}",
            slot, p
        ))),
    }
}
