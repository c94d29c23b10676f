// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Proof registry linking verified aggregate proofs across rounds.
//!
//! A shadow instance becomes registered only through a successful
//! [`ProofTracker::register_proofs`]; round-1 instances are trusted only
//! when the admin seeds them. Entries are never mutated or removed.

pub mod db;
pub mod error;
pub mod tracker;
pub mod types;

pub use db::Db;
pub use error::TrackError;
pub use tracker::ProofTracker;
pub use types::{Lineage, RegistryEntry};
