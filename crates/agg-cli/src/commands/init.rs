use std::path::Path;

use agg_tracker::ProofTracker;
use anyhow::{Context, Result};
use serde_json::json;

use crate::commands::load_verifier;
use crate::output;

pub fn run(config: &Path, db: &Path, admin: &str) -> Result<()> {
    let verifier = load_verifier(config)?;
    let config_id = verifier.config().config_id_hex();
    let tracker = ProofTracker::create(verifier, admin, db)
        .with_context(|| format!("failed to create registry {}", db.display()))?;

    output::report(
        json!({
            "db": db.display().to_string(),
            "admin": tracker.admin(),
            "config_id": config_id,
            "entries": tracker.len(),
        }),
        || {
            output::verdict("registry", "ready", true);
            output::field("db", db.display());
            output::field("admin", tracker.admin());
            output::field("config_id", &config_id);
        },
    );
    Ok(())
}
