//! Trace-driven cache simulator.
//!
//! Replays a stream of addresses against several caches of identical
//! capacity but different associativity and replacement policy, and counts
//! hits for each of them.

pub mod cache;
pub mod config;
pub mod replace;
pub mod sim;
pub mod trace;
