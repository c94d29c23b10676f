use std::path::Path;

use agg_tracker::ProofTracker;
use agg_verifier::AggregateVerifier;
use anyhow::{Context, Result};

use crate::files;

pub mod check;
pub mod init;
pub mod register;
pub mod sample;
pub mod seed;
pub mod verify;

pub(crate) fn load_verifier(config: &Path) -> Result<AggregateVerifier> {
    Ok(AggregateVerifier::new(files::read_config(config)?))
}

pub(crate) fn open_tracker(config: &Path, db: &Path) -> Result<ProofTracker> {
    let verifier = load_verifier(config)?;
    ProofTracker::open(verifier, db).with_context(|| {
        format!("failed to open registry {} (create it with `aggtrack init`)", db.display())
    })
}
