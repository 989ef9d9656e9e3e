use log::trace;

use crate::{cache::Block, config::Policy, sim::Sim};

use super::Replace;

/// Least recently used, tracked with one recency counter per line.
#[derive(Debug, Default)]
pub struct Lru {}

impl Lru {
    pub fn new() -> Self {
        Lru {}
    }
}

impl Replace for Lru {
    const POLICY: Policy = Policy::Lru;
    type BlockData = LruBlockData;

    fn touch(&mut self, set: &mut [Block<LruBlockData>], way: usize) {
        // Increment first, then zero, so the touched line ends at 0.
        for block in set.iter_mut() {
            block.repl_block.counter = block.repl_block.counter.saturating_add(1);
        }
        set[way].repl_block.counter = 0;
    }

    fn victim(&mut self, _sim: &mut Sim, set: &[Block<LruBlockData>]) -> usize {
        // Empty Block, YAY
        if let Some(way) = set.iter().position(|b| !b.valid) {
            return way;
        }

        // Oldest line, lowest way on ties
        let mut lru_way = 0;
        for (way, block) in set.iter().enumerate().skip(1) {
            if block.repl_block.counter > set[lru_way].repl_block.counter {
                lru_way = way;
            }
        }
        trace!(
            "lru: evicting way {lru_way} (untouched for {} accesses)",
            set[lru_way].repl_block.counter
        );
        lru_way
    }
}

/// Accesses to the set since this line was last touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruBlockData {
    pub counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(lines: &[(bool, u64)]) -> Vec<Block<LruBlockData>> {
        lines
            .iter()
            .enumerate()
            .map(|(way, &(valid, counter))| Block {
                valid,
                tag: way as u32,
                repl_block: LruBlockData { counter },
            })
            .collect()
    }

    fn counters(set: &[Block<LruBlockData>]) -> Vec<u64> {
        set.iter().map(|b| b.repl_block.counter).collect()
    }

    #[test]
    fn touch_increments_then_zeroes() {
        let mut set = set_of(&[(true, 0), (true, 3), (true, 1), (true, 2)]);
        Lru::new().touch(&mut set, 1);
        assert_eq!(counters(&set), vec![1, 0, 2, 3]);
    }

    #[test]
    fn invalid_line_beats_oldest_line() {
        let set = set_of(&[(true, 9), (false, 0), (false, 0), (true, 1)]);
        assert_eq!(Lru::new().victim(&mut Sim::new(0), &set), 1);
    }

    #[test]
    fn evicts_greatest_counter() {
        let set = set_of(&[(true, 2), (true, 5), (true, 0), (true, 4)]);
        assert_eq!(Lru::new().victim(&mut Sim::new(0), &set), 1);
    }

    #[test]
    fn ties_go_to_lowest_way() {
        let set = set_of(&[(true, 1), (true, 6), (true, 6), (true, 0)]);
        assert_eq!(Lru::new().victim(&mut Sim::new(0), &set), 1);
    }

    #[test]
    fn single_way_always_evicts_way_zero() {
        let set = set_of(&[(true, 0)]);
        assert_eq!(Lru::new().victim(&mut Sim::new(0), &set), 0);
    }
}
