use std::path::{Path, PathBuf};

use agg_tracker::TrackError;
use anyhow::Result;
use serde_json::json;

use crate::commands::open_tracker;
use crate::files;
use crate::output;

pub fn run(
    config: &Path,
    db: &Path,
    shadow: &Path,
    chain: &[PathBuf],
    targets: &[PathBuf],
) -> Result<()> {
    let tracker = open_tracker(config, db)?;
    let top = files::read_shadow(shadow)?;
    let chain = chain
        .iter()
        .map(|p| files::read_shadow(p))
        .collect::<Result<Vec<_>>>()?;
    let targets = files::read_instances(targets)?;

    let (rounds, reason) = match tracker.trace_lineage(&top, &chain, &targets) {
        Ok(lineage) => (lineage.rounds, None),
        Err(TrackError::NotFound) => {
            return Err(output::refused(
                &top.short_id(),
                TrackError::NotFound,
                "register the round first with `aggtrack register`",
            ));
        }
        Err(e) => (Vec::new(), Some(e.to_string())),
    };
    let verified = reason.is_none();

    output::report(
        json!({
            "shadow": top.short_id(),
            "verified": verified,
            "rounds": rounds,
            "reason": reason,
        }),
        || {
            output::shadow(&top);
            if let Some(reason) = &reason {
                output::verdict("lineage", "not verified", false);
                output::field("reason", reason);
            } else {
                output::verdict("lineage", "verified", true);
                output::rounds(&rounds);
            }
        },
    );
    Ok(())
}
