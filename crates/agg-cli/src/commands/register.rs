use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use crate::commands::open_tracker;
use crate::files;
use crate::output;

pub fn run(config: &Path, db: &Path, dir: &Path, name: &str, targets: &[PathBuf]) -> Result<()> {
    let tracker = open_tracker(config, db)?;
    let round = files::read_round(dir, name)?;
    let targets = files::read_instances(targets)?;

    if tracker.verifier().instance_for(&round.shadow, &targets) != round.instance {
        output::notice(&format!(
            "{name}: instance file differs from the one derived from its shadow and targets"
        ));
    }

    let already = tracker.is_registered(&round.shadow);
    let pb = output::busy(&format!("verifying {name}"));
    let result = tracker.register_proofs(&round.proof, &round.shadow, &round.aux, &targets);
    pb.finish_and_clear();
    let shadow = result.map_err(|e| output::refused(name, e, "nothing was recorded"))?;
    let level = tracker.round(&shadow).unwrap_or(0);

    output::report(
        json!({
            "round": name,
            "shadow": shadow.short_id(),
            "level": level,
            "new": !already,
        }),
        || {
            let outcome = if already { "already registered" } else { "registered" };
            output::verdict(name, outcome, !already);
            output::shadow(&shadow);
            output::field("level", level);
            output::field("entries", tracker.len());
        },
    );
    Ok(())
}
