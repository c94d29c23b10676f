use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use crate::commands::open_tracker;
use crate::files;
use crate::output;

pub fn run(config: &Path, db: &Path, caller: &str, instances: &[PathBuf]) -> Result<()> {
    let tracker = open_tracker(config, db)?;
    let instances = files::read_instances(instances)?;
    tracker
        .set_round1_verifier_instances(caller, &instances)
        .map_err(|e| output::refused(caller, e, "only the admin given to `aggtrack init` may seed"))?;

    let seeded = format!("{} instance(s) seeded", instances.len());
    output::report(
        json!({ "seeded": instances.len(), "db": db.display().to_string() }),
        || output::verdict("round 1", &seeded, true),
    );
    Ok(())
}
