use std::fs;
use std::path::PathBuf;

use agg_types::Instance;
use agg_verifier::prover::{SampleProver, SampleRound};
use anyhow::{Context, Result};
use ark_bn254::Fr;
use ark_ff::UniformRand;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use serde_json::json;

use crate::files::{self, RoundFiles, CONFIG_FILE};
use crate::output;

pub struct SampleArgs {
    pub out: PathBuf,
    pub seed: u64,
    pub domain_log_size: u32,
    pub advice: usize,
    pub instance_len: usize,
    pub max_targets: usize,
}

fn round_files(round: SampleRound) -> RoundFiles {
    RoundFiles {
        proof: round.proof,
        instance: round.instance,
        shadow: round.shadow,
        aux: round.aux,
    }
}

/// Round 1 is a leaf instance; round 2 aggregates it; round 3 aggregates round 2.
pub fn run(args: &SampleArgs) -> Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let pb = output::busy("setting up circuit");
    let prover = SampleProver::setup(
        args.domain_log_size,
        args.advice,
        args.instance_len,
        args.max_targets,
        &mut rng,
    )?;
    let config_path = args.out.join(CONFIG_FILE);
    files::write_file(&config_path, prover.params().to_json().as_bytes())?;

    let r1 = Instance::new((0..args.instance_len).map(|_| Fr::rand(&mut rng)).collect());
    files::write_file(&files::artifact_path(&args.out, "r1.0", "instance"), &r1.to_bytes())?;

    pb.set_message("proving round 2");
    let r2 = round_files(prover.prove_aggregate(&[r1], &mut rng)?);
    files::write_round(&args.out, "r2.0", &r2)?;

    pb.set_message("proving round 3");
    let r3 = round_files(prover.prove_aggregate(&[r2.instance.clone()], &mut rng)?);
    files::write_round(&args.out, "r3.0", &r3)?;
    pb.finish_and_clear();

    let config_id = prover.config()?.config_id_hex();
    output::report(
        json!({
            "out": args.out.display().to_string(),
            "config_id": config_id,
            "rounds": ["r1.0", "r2.0", "r3.0"],
            "r2_shadow": r2.shadow.short_id(),
            "r3_shadow": r3.shadow.short_id(),
        }),
        || {
            output::verdict("sample", "written", true);
            output::field("config", config_path.display());
            output::field("config_id", &config_id);
            output::field("r2.0", r2.shadow.short_id());
            output::field("r3.0", r3.shadow.short_id());
        },
    );
    Ok(())
}
