//! Directory Table
//!
//! Fixed-capacity array of optional file records. The slot index is the
//! addressing key (iteration order = listing order); it carries no other
//! meaning. The table enforces name uniqueness and the capacity limit;
//! everything block-related belongs to the engine and the bitmap.

use crate::error::{FsError, Result};

use super::record::FileRecord;

/// Fixed-capacity directory of optional file records
#[derive(Debug, Clone)]
pub struct DirectoryTable {
    slots: Vec<Option<FileRecord>>,
}

impl DirectoryTable {
    /// An all-empty table with `max_files` slots
    pub fn new(max_files: usize) -> Self {
        Self {
            slots: vec![None; max_files],
        }
    }

    /// Rebuild a table from decoded slots (codec use only)
    pub(crate) fn from_slots(slots: Vec<Option<FileRecord>>) -> Self {
        Self { slots }
    }

    /// Total slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn file_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Slot index of the record with the given name, if present
    pub fn find(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|rec| rec.name == name))
    }

    /// The record with the given name, if present
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.find(name).and_then(|i| self.slots[i].as_ref())
    }

    /// Insert a record into the first empty slot
    ///
    /// Fails with a ValidationError on a duplicate name and a CapacityError
    /// when every slot is occupied. Returns the slot index on success.
    pub fn insert(&mut self, record: FileRecord) -> Result<usize> {
        if self.find(&record.name).is_some() {
            return Err(FsError::validation(format!(
                "File already exists: {}",
                record.name
            )));
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.is_none())
            .ok_or_else(|| FsError::capacity("No free filespace."))?;

        self.slots[index] = Some(record);
        Ok(index)
    }

    /// Replace the record at `index` wholesale
    pub fn replace(&mut self, index: usize, record: FileRecord) {
        self.slots[index] = Some(record);
    }

    /// Clear the slot at `index`, returning the removed record
    pub fn clear(&mut self, index: usize) -> Option<FileRecord> {
        self.slots[index].take()
    }

    /// Record at `index`, if occupied
    pub fn record_at(&self, index: usize) -> Option<&FileRecord> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    /// Names of all occupied slots, in slot order
    pub fn names(&self) -> Vec<String> {
        self.slots
            .iter()
            .flatten()
            .map(|rec| rec.name.clone())
            .collect()
    }

    /// Iterate over occupied records in slot order
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.slots.iter().flatten()
    }

    /// Raw slots in order (codec use only)
    pub(crate) fn slots(&self) -> &[Option<FileRecord>] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_fills_first_empty_slot() {
        let mut table = DirectoryTable::new(3);
        assert_eq!(table.insert(FileRecord::empty("a")).unwrap(), 0);
        assert_eq!(table.insert(FileRecord::empty("b")).unwrap(), 1);

        table.clear(0);
        // The freed slot is reused before the tail slot.
        assert_eq!(table.insert(FileRecord::empty("c")).unwrap(), 0);
        assert_eq!(table.names(), vec!["c", "b"]);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut table = DirectoryTable::new(3);
        table.insert(FileRecord::empty("a")).unwrap();
        let err = table.insert(FileRecord::empty("a")).unwrap_err();
        assert!(matches!(err, FsError::Validation(_)));
    }

    #[test]
    fn full_table_is_rejected() {
        let mut table = DirectoryTable::new(2);
        table.insert(FileRecord::empty("a")).unwrap();
        table.insert(FileRecord::empty("b")).unwrap();
        let err = table.insert(FileRecord::empty("c")).unwrap_err();
        assert!(matches!(err, FsError::Capacity(_)));
    }

    #[test]
    fn names_follow_slot_order_after_delete() {
        let mut table = DirectoryTable::new(4);
        table.insert(FileRecord::empty("a")).unwrap();
        table.insert(FileRecord::empty("b")).unwrap();
        table.insert(FileRecord::empty("c")).unwrap();

        let index = table.find("b").unwrap();
        table.clear(index);

        assert_eq!(table.names(), vec!["a", "c"]);
        assert_eq!(table.file_count(), 2);
    }
}
