use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use crate::commands::load_verifier;
use crate::files;
use crate::output;

pub fn run(config: &Path, dir: &Path, name: &str, targets: &[PathBuf]) -> Result<()> {
    let verifier = load_verifier(config)?;
    let round = files::read_round(dir, name)?;
    let targets = files::read_instances(targets)?;

    let pb = output::busy(&format!("verifying {name}"));
    let result = verifier.verify(&round.proof, &round.instance, &round.shadow, &round.aux, &targets);
    pb.finish_and_clear();

    let err = match result {
        Ok(()) => {
            output::report(
                json!({ "round": name, "valid": true, "shadow": round.shadow.short_id() }),
                || {
                    output::verdict(name, "valid", true);
                    output::shadow(&round.shadow);
                    output::field("steps", verifier.config().num_steps());
                },
            );
            return Ok(());
        }
        Err(e) => e,
    };

    output::report(
        json!({
            "round": name,
            "valid": false,
            "malformed": err.is_malformed(),
            "error": err.to_string(),
        }),
        || {},
    );
    let next = if err.is_malformed() {
        "check the round files against --config"
    } else {
        "the proof does not verify for these targets"
    };
    Err(output::refused(name, err, next))
}
