//! Property tests checking the caches against straightforward reference models.

use cache_sim::{
    cache::{Cache, IsCache, NUM_BLOCKS},
    config::{Associativity, Config},
    replace::{lru::Lru, random::Random, AccessResult},
    sim::Sim,
};
use proptest::prelude::*;

/// Per-set recency lists, most recent first.
struct ReferenceLru {
    sets: Vec<Vec<u32>>,
    ways: usize,
}

impl ReferenceLru {
    fn new(kind: Associativity) -> Self {
        ReferenceLru {
            sets: vec![Vec::new(); kind.n_sets()],
            ways: kind.n_ways(),
        }
    }

    fn access(&mut self, tag: u32, set: usize) -> AccessResult {
        let order = &mut self.sets[set];
        let result = match order.iter().position(|&t| t == tag) {
            Some(pos) => {
                order.remove(pos);
                AccessResult::Hit
            }
            None => AccessResult::Miss,
        };
        order.insert(0, tag);
        order.truncate(self.ways);
        result
    }
}

fn trace() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..512, 0..400)
}

proptest! {
    #[test]
    fn lru_matches_reference(addresses in trace()) {
        for kind in Associativity::ALL {
            let mut sim = Sim::new(0);
            let mut cache = Cache::new(kind.to_string(), kind, Lru::new());
            let mut reference = ReferenceLru::new(kind);
            for &address in &addresses {
                let addr = cache.split_addr(address);
                let expected = reference.access(addr.tag, addr.set);
                prop_assert_eq!(
                    cache.access(&mut sim, addr),
                    expected,
                    "{} at {:#x}",
                    kind,
                    address
                );
            }
        }
    }

    #[test]
    fn hit_requires_residency(addresses in trace(), seed in any::<u64>()) {
        let mut sim = Sim::new(seed);
        for kind in Associativity::ALL {
            let mut cache = Cache::new(kind.to_string(), kind, Random::new());
            for &address in &addresses {
                let addr = cache.split_addr(address);
                let resident = cache.blocks[cache.get_set(addr.set)]
                    .iter()
                    .any(|b| b.valid && b.tag == addr.tag);
                let result = cache.access(&mut sim, addr);
                prop_assert_eq!(result == AccessResult::Hit, resident);
            }
        }
    }

    #[test]
    fn replay_is_reproducible(addresses in trace(), seed in any::<u64>()) {
        let run = || {
            let mut caches = Config::standard().to_caches();
            let mut sim = Sim::new(seed);
            sim.replay(&mut caches, addresses.iter().copied());
            caches.iter().map(|c| c.make_stats()).collect::<Vec<_>>()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn hits_never_exceed_accesses(addresses in trace(), seed in any::<u64>()) {
        let mut caches = Config::standard().to_caches();
        let mut sim = Sim::new(seed);
        sim.replay(&mut caches, addresses.iter().copied());
        for cache in &caches {
            let stats = cache.make_stats();
            prop_assert_eq!(stats.accesses, addresses.len() as u64);
            prop_assert_eq!(stats.hits + stats.misses, stats.accesses);
        }
    }
}

#[test]
fn every_standard_config_has_same_capacity() {
    for cc in Config::standard().caches {
        assert_eq!(cc.kind.n_sets() * cc.kind.n_ways(), NUM_BLOCKS as usize);
    }
}
