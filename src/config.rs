use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    cache::{Cache, IsCache, NUM_BLOCKS},
    replace::{lru::Lru, random::Random},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Associativity {
    #[serde(alias = "direct")]
    DirectMapped,
    #[serde(alias = "2way")]
    TwoWay,
    #[serde(alias = "4way")]
    FourWay,
    #[serde(alias = "full")]
    FullyAssociative,
}

impl Associativity {
    pub const ALL: [Associativity; 4] = [
        Associativity::DirectMapped,
        Associativity::TwoWay,
        Associativity::FourWay,
        Associativity::FullyAssociative,
    ];

    pub fn n_ways(self) -> usize {
        match self {
            Associativity::DirectMapped => 1,
            Associativity::TwoWay => 2,
            Associativity::FourWay => 4,
            Associativity::FullyAssociative => NUM_BLOCKS as usize,
        }
    }

    pub fn n_sets(self) -> usize {
        NUM_BLOCKS as usize / self.n_ways()
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Associativity::DirectMapped => "Direct Mapped",
            Associativity::TwoWay => "2-Way",
            Associativity::FourWay => "4-Way",
            Associativity::FullyAssociative => "Fully Associative",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Policy {
    #[serde(alias = "lru")]
    Lru,
    #[serde(alias = "random")]
    Random,
}

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::Lru, Policy::Random];
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Policy::Lru => "LRU",
            Policy::Random => "Random",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    pub name: String,
    pub kind: Associativity,
    pub repl: Policy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub caches: Vec<CacheConfig>,
}

impl Config {
    /// Every associativity paired with every policy.
    pub fn standard() -> Self {
        let caches = Associativity::ALL
            .into_iter()
            .flat_map(|kind| {
                Policy::ALL.into_iter().map(move |repl| CacheConfig {
                    name: format!("{kind} {repl}"),
                    kind,
                    repl,
                })
            })
            .collect();
        Config { caches }
    }

    pub fn to_caches(self) -> Vec<Box<dyn IsCache>> {
        self.caches
            .into_iter()
            .map(|cc| match cc.repl {
                Policy::Lru => {
                    Box::new(Cache::new(cc.name, cc.kind, Lru::new())) as Box<dyn IsCache>
                }
                Policy::Random => {
                    Box::new(Cache::new(cc.name, cc.kind, Random::new())) as Box<dyn IsCache>
                }
            })
            .collect()
    }
}
