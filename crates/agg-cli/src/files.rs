//! Round data on disk: concatenated 32-byte little-endian words, one file
//! per artifact, named `<round>.<artifact>.data`.

use std::fs;
use std::path::{Path, PathBuf};

use agg_types::{AuxData, Instance, ProofTranscript, ShadowInstance};
use agg_verifier::VerifierConfig;
use anyhow::{Context, Result};

pub const CONFIG_FILE: &str = "config.json";

/// All artifacts of one aggregation round.
pub struct RoundFiles {
    pub proof: ProofTranscript,
    pub instance: Instance,
    pub shadow: ShadowInstance,
    pub aux: AuxData,
}

pub fn artifact_path(dir: &Path, name: &str, artifact: &str) -> PathBuf {
    dir.join(format!("{name}.{artifact}.data"))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn read_config(path: &Path) -> Result<VerifierConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    VerifierConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

pub fn read_instance(path: &Path) -> Result<Instance> {
    Instance::from_bytes(&read_bytes(path)?)
        .with_context(|| format!("malformed instance {}", path.display()))
}

pub fn read_instances(paths: &[PathBuf]) -> Result<Vec<Instance>> {
    paths.iter().map(|p| read_instance(p)).collect()
}

pub fn read_shadow(path: &Path) -> Result<ShadowInstance> {
    ShadowInstance::from_bytes(&read_bytes(path)?)
        .with_context(|| format!("malformed shadow instance {}", path.display()))
}

pub fn read_round(dir: &Path, name: &str) -> Result<RoundFiles> {
    let path = artifact_path(dir, name, "transcript");
    let proof = ProofTranscript::from_bytes(&read_bytes(&path)?)
        .with_context(|| format!("malformed transcript {}", path.display()))?;
    let instance = read_instance(&artifact_path(dir, name, "instance"))?;
    let shadow = read_shadow(&artifact_path(dir, name, "shadowinstance"))?;
    let path = artifact_path(dir, name, "aux");
    let aux = AuxData::from_bytes(&read_bytes(&path)?)
        .with_context(|| format!("malformed aux data {}", path.display()))?;
    Ok(RoundFiles {
        proof,
        instance,
        shadow,
        aux,
    })
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_round(dir: &Path, name: &str, round: &RoundFiles) -> Result<()> {
    write_file(&artifact_path(dir, name, "transcript"), &round.proof.to_bytes())?;
    write_file(&artifact_path(dir, name, "instance"), &round.instance.to_bytes())?;
    write_file(&artifact_path(dir, name, "shadowinstance"), &round.shadow.to_bytes())?;
    write_file(&artifact_path(dir, name, "aux"), &round.aux.to_bytes())?;
    Ok(())
}
