use log::trace;

use crate::{cache::Block, config::Policy, sim::Sim};

use super::Replace;

/// Uniform random victim within the set. Keeps no per-line state and does
/// not prefer empty lines.
#[derive(Debug, Default)]
pub struct Random {}

impl Random {
    pub fn new() -> Self {
        Random {}
    }
}

impl Replace for Random {
    const POLICY: Policy = Policy::Random;
    type BlockData = ();

    fn touch(&mut self, _set: &mut [Block<()>], _way: usize) {}

    fn victim(&mut self, sim: &mut Sim, set: &[Block<()>]) -> usize {
        let way = sim.rng.usize(0..set.len());
        trace!("random: picked way {way} of {}", set.len());
        way
    }
}
