use log::info;

use crate::{cache::IsCache, replace::AccessResult};

/// State of one replay run, shared by every cache in it.
#[derive(Debug)]
pub struct Sim {
    /// Single random stream for the whole run. Each cache draws from it in
    /// turn, so one seed reproduces every random-policy cache at once.
    pub rng: fastrand::Rng,
    seed: u64,
    pub accesses: u64,
    n_warm: u64,
    heartbeat_int: u64,
    next_heartbeat: u64,
}

impl Sim {
    pub fn new(seed: u64) -> Self {
        Sim {
            rng: fastrand::Rng::with_seed(seed),
            seed,
            accesses: 0,
            n_warm: 0,
            heartbeat_int: 0,
            next_heartbeat: 0,
        }
    }

    pub fn from_entropy() -> Self {
        Sim::new(fastrand::u64(..))
    }

    /// Drops the first `n_warm` accesses from every cache's statistics. The
    /// lines they filled stay resident.
    pub fn with_warmup(mut self, n_warm: u64) -> Self {
        self.n_warm = n_warm;
        self
    }

    /// Logs progress every `heartbeat_int` accesses, 0 turns it off.
    pub fn with_heartbeat(mut self, heartbeat_int: u64) -> Self {
        self.heartbeat_int = heartbeat_int;
        self.next_heartbeat = heartbeat_int;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// True once the warm-up accesses have been replayed.
    pub fn warmed_up(&self) -> bool {
        self.accesses >= self.n_warm
    }

    /// Feeds `address` to every cache and tallies each outcome.
    pub fn operate(&mut self, caches: &mut [Box<dyn IsCache>], address: u32) {
        for cache in caches.iter_mut() {
            let addr = cache.split_addr(address);
            match cache.access(self, addr) {
                AccessResult::Hit => cache.hit(),
                AccessResult::Miss => cache.miss(),
            }
        }
        self.accesses += 1;

        if self.n_warm != 0 && self.accesses == self.n_warm {
            caches.iter_mut().for_each(|c| c.clear_stats());
            info!("Finished warm-up after {} accesses", self.n_warm);
        }
        if self.heartbeat_int != 0 && self.accesses >= self.next_heartbeat {
            info!("Accesses: {}", self.accesses);
            self.next_heartbeat += self.heartbeat_int;
        }
    }

    pub fn replay(
        &mut self,
        caches: &mut [Box<dyn IsCache>],
        addresses: impl IntoIterator<Item = u32>,
    ) {
        for address in addresses {
            self.operate(caches, address);
        }
    }
}
