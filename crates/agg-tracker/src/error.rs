// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

use agg_types::DecodeError;
use agg_verifier::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error("shadow instance is not registered")]
    NotFound,

    /// Chain element `i` sits at depth `i + 1`; the claimed leaves sit one
    /// below the last chain element.
    #[error("lineage is inconsistent at depth {depth}")]
    Inconsistent { depth: usize },

    #[error("leaf {index} is neither seeded nor a verified instance")]
    UntrustedLeaf { index: usize },

    #[error("caller is not the registry admin")]
    Unauthorized,

    #[error("registry store is not initialized")]
    Uninitialized,

    #[error("store was created for config {stored}, loaded config is {loaded}")]
    ConfigMismatch { stored: String, loaded: String },

    #[error("store: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("stored record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored record: {0}")]
    Decode(#[from] DecodeError),
}
