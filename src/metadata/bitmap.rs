//! Free-block bitmap and first-fit allocator
//!
//! One boolean per data-region block, `true` = free. Allocation scans for
//! the lowest-indexed contiguous run of free blocks long enough for the
//! request (first-fit). There is no compaction: a store with enough total
//! free blocks can still fail an allocation when no single run is long
//! enough, and that is intended behavior.

/// Per-block occupancy flags for the data region
#[derive(Debug, Clone)]
pub struct FreeBlockBitmap {
    free: Vec<bool>,
}

impl FreeBlockBitmap {
    /// An all-free bitmap tracking `max_blocks` blocks
    pub fn new(max_blocks: usize) -> Self {
        Self {
            free: vec![true; max_blocks],
        }
    }

    /// Rebuild a bitmap from decoded flags (codec use only)
    pub(crate) fn from_flags(free: Vec<bool>) -> Self {
        Self { free }
    }

    /// Number of tracked blocks
    pub fn block_count(&self) -> usize {
        self.free.len()
    }

    /// Whether block `index` is free
    pub fn is_free(&self, index: usize) -> bool {
        self.free[index]
    }

    /// Number of free blocks (not necessarily contiguous)
    pub fn free_count(&self) -> usize {
        self.free.iter().filter(|&&f| f).count()
    }

    /// First-fit search for a contiguous run of `blocks_needed` free blocks
    ///
    /// Scans candidate starts in ascending order; a run may end exactly at
    /// the last block. Returns None when no run is long enough, even if the
    /// total free count would suffice (fragmentation).
    pub fn first_fit(&self, blocks_needed: usize) -> Option<usize> {
        debug_assert!(blocks_needed > 0, "zero-block allocations never reach the bitmap");

        let last_start = self.free.len().checked_sub(blocks_needed)?;
        (0..=last_start).find(|&start| self.free[start..start + blocks_needed].iter().all(|&f| f))
    }

    /// Mark the run `[start, start + count)` as allocated
    pub fn mark_allocated(&mut self, start: usize, count: usize) {
        self.set_range(start, count, false);
    }

    /// Mark the run `[start, start + count)` as free
    pub fn mark_free(&mut self, start: usize, count: usize) {
        self.set_range(start, count, true);
    }

    /// Per-block flags in block order (codec use only)
    pub(crate) fn flags(&self) -> &[bool] {
        &self.free
    }

    fn set_range(&mut self, start: usize, count: usize, free: bool) {
        for flag in &mut self.free[start..start + count] {
            *flag = free;
        }
    }
}
