//! Data-cache family.
//!
//! A write-through, write-allocate cache layered over a lower data-memory
//! device. One geometry covers all three schemes: direct-mapped (one way),
//! fully associative (one set, LRU), and k-way set-associative (per-set
//! LRU). The cache owns its line storage and the lower device; width
//! semantics are delegated entirely to the little-endian pack/unpack
//! helpers.

/// Least-recently-used replacement order.
pub mod lru;

use self::lru::LruList;
use crate::common::{pack_le, unpack_le, AccessSize};
use crate::mem::DataMemory;

/// One cache line: valid bit, tag, and `line_size` data bytes.
struct CacheLine {
    valid: bool,
    tag: u32,
    data: Vec<u8>,
}

impl CacheLine {
    fn new(line_size: usize) -> Self {
        Self {
            valid: false,
            tag: 0,
            data: vec![0; line_size],
        }
    }
}

/// Write-through, write-allocate data cache.
///
/// `total_size` and `line_size` must be powers of two, as must the derived
/// set count. Hit and miss counters are monotonic and reflect access
/// attempts, not success.
pub struct Cache {
    lower: Box<dyn DataMemory>,
    lines: Vec<CacheLine>,
    lru: LruList,
    num_sets: usize,
    ways: usize,
    line_size: u32,
    hits: u64,
    misses: u64,
}

impl Cache {
    /// Creates a direct-mapped cache (one way per set).
    pub fn direct_mapped(lower: Box<dyn DataMemory>, total_size: u32, line_size: u32) -> Self {
        Self::with_geometry(lower, total_size, line_size, 1)
    }

    /// Creates a fully associative cache (one set, LRU across all lines).
    pub fn fully_associative(lower: Box<dyn DataMemory>, total_size: u32, line_size: u32) -> Self {
        let ways = total_size / line_size;
        Self::with_geometry(lower, total_size, line_size, ways as usize)
    }

    /// Creates a k-way set-associative cache with per-set LRU.
    pub fn set_associative(
        lower: Box<dyn DataMemory>,
        total_size: u32,
        line_size: u32,
        ways: usize,
    ) -> Self {
        Self::with_geometry(lower, total_size, line_size, ways)
    }

    fn with_geometry(
        lower: Box<dyn DataMemory>,
        total_size: u32,
        line_size: u32,
        ways: usize,
    ) -> Self {
        assert!(total_size.is_power_of_two(), "total size must be a power of two");
        assert!(line_size.is_power_of_two(), "line size must be a power of two");
        let num_lines = (total_size / line_size) as usize;
        assert!(ways >= 1 && ways <= num_lines);
        let num_sets = num_lines / ways;
        assert!(num_sets.is_power_of_two(), "set count must be a power of two");

        let lines = (0..num_lines)
            .map(|_| CacheLine::new(line_size as usize))
            .collect();
        Self {
            lower,
            lines,
            lru: LruList::new(num_sets, ways),
            num_sets,
            ways,
            line_size,
            hits: 0,
            misses: 0,
        }
    }

    /// Total hit count.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Total miss count.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Decomposes an address into (line base, set index, tag).
    fn decompose(&self, addr: u32) -> (u32, usize, u32) {
        let line_base = addr & !(self.line_size - 1);
        let set = (line_base / self.line_size) as usize % self.num_sets;
        let tag = line_base / self.line_size / self.num_sets as u32;
        (line_base, set, tag)
    }

    /// Searches the ways of `set` for `tag`. Returns the hit way index.
    fn probe(&self, set: usize, tag: u32) -> Option<usize> {
        let base = set * self.ways;
        (0..self.ways).find(|&way| {
            let line = &self.lines[base + way];
            line.valid && line.tag == tag
        })
    }

    /// Fills the LRU victim way of `set` with the line at `line_base`.
    ///
    /// The line is read from the lower device one word at a time in
    /// ascending address order. If any word load fails the line is not
    /// installed and `None` is returned.
    fn fill_line(&mut self, set: usize, tag: u32, line_base: u32) -> Option<usize> {
        let way = self.lru.victim(set);
        let mut buf = vec![0u8; self.line_size as usize];
        for offset in (0..self.line_size).step_by(4) {
            let word = self.lower.load(line_base + offset, AccessSize::Word)?;
            unpack_le(word, &mut buf[offset as usize..], AccessSize::Word);
        }

        let line = &mut self.lines[set * self.ways + way];
        line.data.copy_from_slice(&buf);
        line.tag = tag;
        line.valid = true;
        Some(way)
    }
}

impl DataMemory for Cache {
    fn load(&mut self, addr: u32, size: AccessSize) -> Option<u32> {
        let (line_base, set, tag) = self.decompose(addr);
        let offset = (addr - line_base) as usize;

        if let Some(way) = self.probe(set, tag) {
            self.hits += 1;
            self.lru.touch(set, way);
            let line = &self.lines[set * self.ways + way];
            return Some(pack_le(&line.data[offset..], size));
        }

        self.misses += 1;
        let way = self.fill_line(set, tag, line_base)?;
        self.lru.touch(set, way);
        let line = &self.lines[set * self.ways + way];
        Some(pack_le(&line.data[offset..], size))
    }

    fn store(&mut self, addr: u32, data: u32, size: AccessSize) -> bool {
        let (line_base, set, tag) = self.decompose(addr);
        let offset = (addr - line_base) as usize;

        let way = match self.probe(set, tag) {
            Some(way) => {
                self.hits += 1;
                way
            }
            None => {
                // Write-allocate: bring the line in before updating it.
                self.misses += 1;
                match self.fill_line(set, tag, line_base) {
                    Some(way) => way,
                    None => return false,
                }
            }
        };
        self.lru.touch(set, way);

        let line = &mut self.lines[set * self.ways + way];
        unpack_le(data, &mut line.data[offset..], size);

        // Write-through with the original width; the store's success is the
        // lower device's success.
        self.lower.store(addr, data, size)
    }

    fn cache_stats(&self) -> Option<(u64, u64)> {
        Some((self.hits, self.misses))
    }

    fn reset_state(&mut self) {
        for line in &mut self.lines {
            line.valid = false;
            line.tag = 0;
            line.data.fill(0);
        }
        self.lru = LruList::new(self.num_sets, self.ways);
        self.hits = 0;
        self.misses = 0;
        self.lower.reset_state();
    }
}
