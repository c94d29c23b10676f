// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

use agg_types::{Instance, ShadowInstance};
use serde::{Deserialize, Serialize};

/// A verified aggregate proof. Existence of the entry is the verified flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub shadow: ShadowInstance,
    /// Aggregate instance derived from `shadow` and `targets`.
    pub instance: Instance,
    pub targets: Vec<Instance>,
}

/// A verified path from a top-level shadow instance down to claimed leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lineage {
    /// Rounds of the traversed entries, top first. Leaves are round 1 and an
    /// entry sits one above its highest registered target.
    pub rounds: Vec<u32>,
}

impl Lineage {
    pub fn depth(&self) -> usize {
        self.rounds.len()
    }
}
