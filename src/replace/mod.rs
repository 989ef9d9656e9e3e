pub mod lru;
pub mod random;

use std::fmt;

use crate::{cache::Block, config::Policy, sim::Sim};

/// A replacement policy.
///
/// Both methods receive only the lines of the set being accessed, so a policy
/// can never reach into another set.
pub trait Replace {
    const POLICY: Policy;

    /// State the policy keeps next to each block.
    type BlockData: Default + Clone + fmt::Debug;

    /// Called after every hit and every fill of `way`.
    fn touch(&mut self, set: &mut [Block<Self::BlockData>], way: usize);

    /// Picks the way to fill on a miss.
    fn victim(&mut self, sim: &mut Sim, set: &[Block<Self::BlockData>]) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    Miss,
}
