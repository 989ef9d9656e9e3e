use std::{fmt, io, iter, ops::Range};

use log::{debug, trace};
use serde::Serialize;

use crate::{
    config::{Associativity, Policy},
    replace::{AccessResult, Replace},
    sim::Sim,
};

/// Addressable units held by every simulated cache.
pub const CACHE_SIZE: u32 = 32;
/// Addressable units per line.
pub const BLOCK_SIZE: u32 = 4;
/// Lines per cache. Every geometry splits these into `n_sets * n_ways`.
pub const NUM_BLOCKS: u32 = CACHE_SIZE / BLOCK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr {
    pub tag: u32,
    pub set: usize,
}

/// Tag of `address`.
///
/// Divides by the block count of the whole cache, not by the set count of a
/// particular geometry. Because every configuration has the same capacity the
/// tags stay comparable across all of them.
pub fn tag_of(address: u32, total_blocks: u32) -> u32 {
    address / total_blocks
}

/// Set that `address` maps to.
pub fn set_index_of(address: u32, block_size: u32, n_sets: usize) -> usize {
    (address / block_size) as usize % n_sets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub name: String,
    pub kind: Associativity,
    pub policy: Policy,
    pub hits: u64,
    pub misses: u64,
    pub accesses: u64,
    /// `None` when nothing was accessed.
    pub hit_rate: Option<f64>,
    pub miss_rate: Option<f64>,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type = {}, Policy = {}", self.kind, self.policy)?;
        writeln!(f, "Number of Hits: {}", self.hits)?;
        writeln!(f, "Number of Total Accesses: {}", self.accesses)?;
        match self.hit_rate {
            Some(rate) => write!(f, "Hit Rate: {:.2}%", rate * 100.0),
            None => write!(f, "Hit Rate: undefined"),
        }
    }
}

/// Writes the text report, one numbered block per cache.
pub fn write_report(stats: &[CacheStats], out: &mut impl io::Write) -> io::Result<()> {
    for (i, cache_stats) in stats.iter().enumerate() {
        writeln!(out, "Cache Config {} ({}): {}\n", i + 1, cache_stats.name, cache_stats)?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct Cache<R: Replace> {
    name: String,
    kind: Associativity,
    /// Row-major `[set][way]` table, see [`IsCache::get_set`].
    pub blocks: Vec<Block<R::BlockData>>,
    pub n_ways: usize,
    pub n_sets: usize,
    pub repl: R,
    hits: u64,
    misses: u64,
}

impl<R: Replace> Cache<R> {
    pub fn new(name: String, kind: Associativity, repl: R) -> Self {
        Self::with_geometry(name, kind, kind.n_sets(), kind.n_ways(), repl)
    }

    fn with_geometry(
        name: String,
        kind: Associativity,
        n_sets: usize,
        n_ways: usize,
        repl: R,
    ) -> Self {
        assert!(n_sets * n_ways > 0, "{name}: cache must hold at least one line");
        assert_eq!(
            n_sets * n_ways,
            NUM_BLOCKS as usize,
            "{name}: every cache holds exactly {NUM_BLOCKS} lines"
        );
        debug!(
            "{name}: {kind}, {} replacement, {n_sets} sets x {n_ways} ways",
            R::POLICY
        );

        Cache {
            name,
            kind,
            blocks: iter::repeat_with(Block::default)
                .take(n_sets * n_ways)
                .collect(),
            n_ways,
            n_sets,
            repl,
            hits: 0,
            misses: 0,
        }
    }
}

/// Object-safe view of a cache, so caches with different policies can share
/// one collection.
pub trait IsCache {
    fn access(&mut self, sim: &mut Sim, addr: Addr) -> AccessResult;
    fn split_addr(&self, address: u32) -> Addr;
    fn get_set(&self, set: usize) -> Range<usize>;
    fn hit(&mut self);
    fn miss(&mut self);
    fn clear_stats(&mut self);
    fn make_stats(&self) -> CacheStats;
    fn name(&self) -> &str;
}

impl<R: Replace> IsCache for Cache<R> {
    fn access(&mut self, sim: &mut Sim, addr: Addr) -> AccessResult {
        let set_range = self.get_set(addr.set);
        let set_slice = &mut self.blocks[set_range];

        let hit = set_slice
            .iter()
            .position(|b| b.valid && b.tag == addr.tag);

        if let Some(way) = hit {
            self.repl.touch(set_slice, way);
            AccessResult::Hit
        } else {
            let way = self.repl.victim(sim, set_slice);
            trace!(
                "{}: miss on tag {:#x}, set {} way {} replaced",
                self.name,
                addr.tag,
                addr.set,
                way
            );
            set_slice[way].apply(addr);
            self.repl.touch(set_slice, way);
            AccessResult::Miss
        }
    }

    fn split_addr(&self, address: u32) -> Addr {
        Addr {
            tag: tag_of(address, NUM_BLOCKS),
            set: set_index_of(address, BLOCK_SIZE, self.n_sets),
        }
    }

    /// Lines of `set` live at `set * n_ways .. (set + 1) * n_ways`.
    fn get_set(&self, set: usize) -> Range<usize> {
        set * self.n_ways..(set + 1) * self.n_ways
    }

    fn hit(&mut self) {
        self.hits += 1;
    }

    fn miss(&mut self) {
        self.misses += 1;
    }

    fn clear_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    fn make_stats(&self) -> CacheStats {
        let accesses = self.hits + self.misses;
        let rate = |n: u64| (accesses > 0).then(|| n as f64 / accesses as f64);

        CacheStats {
            name: self.name.clone(),
            kind: self.kind,
            policy: R::POLICY,
            hits: self.hits,
            misses: self.misses,
            accesses,
            hit_rate: rate(self.hits),
            miss_rate: rate(self.misses),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default, Clone)]
pub struct Block<B: Default> {
    pub valid: bool,
    pub tag: u32,

    // Replace Data
    pub repl_block: B,
}

impl<B: Default> Block<B> {
    pub fn apply(&mut self, addr: Addr) {
        self.valid = true;
        self.tag = addr.tag;
    }
}
