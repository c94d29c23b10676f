// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Circuit-specific verification parameters.
//!
//! [`ConfigParams`] is the serialized form supplied by the deployment;
//! [`VerifierConfig::load`] validates it once and produces the immutable
//! configuration every verification call reads.

use std::ops::Range;

use agg_types::{Word, SHADOW_WORDS};
use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ff::{FftField, Field};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::arith::{self, G1_WORDS};
use crate::error::ConfigError;

/// Largest power-of-two domain supported by BN254 `Fr`.
pub const MAX_DOMAIN_LOG: u32 = 28;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Commit,
    Evaluate,
    Check,
    Open,
    Finalize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Commitments,
    Evaluations,
    Lagrange,
    Gate,
    Opening,
    Pairing,
}

impl StepKind {
    /// Position in the mandatory ordering; kinds with equal rank may repeat.
    fn rank(self) -> u8 {
        match self {
            StepKind::Commitments => 0,
            StepKind::Evaluations => 1,
            StepKind::Lagrange => 2,
            StepKind::Gate => 3,
            StepKind::Opening => 4,
            StepKind::Pairing => 5,
        }
    }

    fn repeatable(self) -> bool {
        matches!(self, StepKind::Commitments | StepKind::Evaluations)
    }

    pub fn phase(self) -> Phase {
        match self {
            StepKind::Commitments => Phase::Commit,
            StepKind::Evaluations => Phase::Evaluate,
            StepKind::Lagrange | StepKind::Gate => Phase::Check,
            StepKind::Opening => Phase::Open,
            StepKind::Pairing => Phase::Finalize,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLayout {
    pub kind: StepKind,
    #[serde(default)]
    pub proof_words: usize,
    #[serde(default)]
    pub aux_words: usize,
}

impl StepLayout {
    pub fn new(kind: StepKind, proof_words: usize, aux_words: usize) -> Self {
        Self {
            kind,
            proof_words,
            aux_words,
        }
    }
}

/// Serialized verification parameters (JSON on disk, words as hex).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigParams {
    pub domain_log_size: u32,
    pub num_advice: usize,
    pub instance_len: usize,
    pub max_targets: usize,
    pub g1: Vec<Word>,
    pub g2: Vec<Word>,
    pub s_g2: Vec<Word>,
    pub fixed_commitments: Vec<Vec<Word>>,
    pub steps: Vec<StepLayout>,
}

impl ConfigParams {
    /// Proof words for all commitments: advice columns plus the quotient.
    pub fn commitment_words(num_advice: usize) -> usize {
        (num_advice + 1) * G1_WORDS
    }

    /// Evaluation words: advice, quotient and fixed columns at `z`.
    pub fn evaluation_words(num_advice: usize) -> usize {
        2 * num_advice + 1
    }

    /// One step per kind, the coarsest valid partition.
    pub fn default_steps(num_advice: usize, instance_len: usize) -> Vec<StepLayout> {
        vec![
            StepLayout::new(StepKind::Commitments, Self::commitment_words(num_advice), 0),
            StepLayout::new(StepKind::Evaluations, Self::evaluation_words(num_advice), 0),
            StepLayout::new(StepKind::Lagrange, 0, instance_len),
            StepLayout::new(StepKind::Gate, 0, 0),
            StepLayout::new(StepKind::Opening, G1_WORDS, 0),
            StepLayout::new(StepKind::Pairing, 0, 0),
        ]
    }

    /// One commitment per step and one evaluation per step, the finest partition.
    pub fn fine_steps(num_advice: usize, instance_len: usize) -> Vec<StepLayout> {
        let mut steps = Vec::new();
        for _ in 0..num_advice + 1 {
            steps.push(StepLayout::new(StepKind::Commitments, G1_WORDS, 0));
        }
        for _ in 0..Self::evaluation_words(num_advice) {
            steps.push(StepLayout::new(StepKind::Evaluations, 1, 0));
        }
        steps.extend(Self::default_steps(num_advice, instance_len).into_iter().skip(2));
        steps
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Validated, immutable verification configuration.
#[derive(Clone, Debug)]
pub struct VerifierConfig {
    domain_size: usize,
    omega: Fr,
    omega_powers: Vec<Fr>,
    domain_size_inv: Fr,
    num_advice: usize,
    instance_len: usize,
    max_targets: usize,
    g1: G1Affine,
    g2: G2Affine,
    s_g2: G2Affine,
    fixed: Vec<G1Affine>,
    steps: Vec<StepLayout>,
    proof_ranges: Vec<Range<usize>>,
    aux_ranges: Vec<Range<usize>>,
    config_id: [u8; 32],
}

fn point_err(name: &str) -> impl FnOnce(crate::error::ArithmeticError) -> ConfigError + '_ {
    move |source| ConfigError::InvalidPoint {
        name: name.to_string(),
        source,
    }
}

fn ranges(steps: &[StepLayout], width: impl Fn(&StepLayout) -> usize) -> Vec<Range<usize>> {
    let mut offset = 0;
    steps
        .iter()
        .map(|s| {
            let r = offset..offset + width(s);
            offset = r.end;
            r
        })
        .collect()
}

impl VerifierConfig {
    pub fn load(params: ConfigParams) -> Result<Self, ConfigError> {
        if params.domain_log_size == 0 || params.domain_log_size > MAX_DOMAIN_LOG {
            return Err(ConfigError::Domain(params.domain_log_size));
        }
        let domain_size = 1usize << params.domain_log_size;
        if params.num_advice == 0 {
            return Err(ConfigError::NoAdvice);
        }
        if params.instance_len == 0 || params.instance_len > domain_size {
            return Err(ConfigError::InstanceLen {
                len: params.instance_len,
                domain_size,
            });
        }
        if params.max_targets == 0 {
            return Err(ConfigError::NoTargets);
        }
        if params.fixed_commitments.len() != params.num_advice {
            return Err(ConfigError::GeneratorCount {
                expected: params.num_advice,
                actual: params.fixed_commitments.len(),
            });
        }

        let g1 = arith::decode_g1(&params.g1).map_err(point_err("g1"))?;
        let g2 = arith::decode_g2(&params.g2).map_err(point_err("g2"))?;
        let s_g2 = arith::decode_g2(&params.s_g2).map_err(point_err("s_g2"))?;
        let fixed = params
            .fixed_commitments
            .iter()
            .enumerate()
            .map(|(i, words)| {
                arith::decode_g1(words).map_err(|source| ConfigError::InvalidPoint {
                    name: format!("fixed_commitments[{i}]"),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        validate_steps(&params)?;

        let omega = Fr::get_root_of_unity(domain_size as u64)
            .ok_or(ConfigError::Domain(params.domain_log_size))?;
        let domain_size_inv = Fr::from(domain_size as u64)
            .inverse()
            .ok_or(ConfigError::Domain(params.domain_log_size))?;
        let omega_powers = arith::powers(omega, params.instance_len);

        let config_id: [u8; 32] = Sha256::digest(serde_json::to_vec(&params)?).into();

        Ok(Self {
            domain_size,
            omega,
            omega_powers,
            domain_size_inv,
            num_advice: params.num_advice,
            instance_len: params.instance_len,
            max_targets: params.max_targets,
            g1,
            g2,
            s_g2,
            fixed,
            proof_ranges: ranges(&params.steps, |s| s.proof_words),
            aux_ranges: ranges(&params.steps, |s| s.aux_words),
            steps: params.steps,
            config_id,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::load(ConfigParams::from_json(json)?)
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepLayout] {
        &self.steps
    }

    /// Layout of step `i` (0-based).
    pub fn step(&self, i: usize) -> Option<&StepLayout> {
        self.steps.get(i)
    }

    pub fn proof_range(&self, i: usize) -> Range<usize> {
        self.proof_ranges[i].clone()
    }

    pub fn aux_range(&self, i: usize) -> Range<usize> {
        self.aux_ranges[i].clone()
    }

    pub fn expected_proof_words(&self, i: usize) -> usize {
        self.steps[i].proof_words
    }

    pub fn expected_aux_words(&self, i: usize) -> usize {
        self.steps[i].aux_words
    }

    pub fn total_proof_words(&self) -> usize {
        self.proof_ranges.last().map_or(0, |r| r.end)
    }

    pub fn total_aux_words(&self) -> usize {
        self.aux_ranges.last().map_or(0, |r| r.end)
    }

    /// Group generators read by step `i` (0-based).
    pub fn generators(&self, i: usize) -> (Vec<G1Affine>, Vec<G2Affine>) {
        match self.steps.get(i).map(|s| s.kind) {
            Some(StepKind::Opening) => {
                let mut g1s = vec![self.g1];
                g1s.extend_from_slice(&self.fixed);
                (g1s, vec![])
            }
            Some(StepKind::Pairing) => (vec![], vec![self.g2, self.s_g2]),
            _ => (vec![], vec![]),
        }
    }

    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    pub fn omega(&self) -> Fr {
        self.omega
    }

    /// `ω^j` for `j < instance_len`.
    pub fn omega_powers(&self) -> &[Fr] {
        &self.omega_powers
    }

    pub fn domain_size_inv(&self) -> Fr {
        self.domain_size_inv
    }

    pub fn num_advice(&self) -> usize {
        self.num_advice
    }

    pub fn instance_len(&self) -> usize {
        self.instance_len
    }

    pub fn max_targets(&self) -> usize {
        self.max_targets
    }

    pub fn shadow_words(&self) -> usize {
        SHADOW_WORDS
    }

    pub fn g1(&self) -> &G1Affine {
        &self.g1
    }

    pub fn g2(&self) -> &G2Affine {
        &self.g2
    }

    pub fn s_g2(&self) -> &G2Affine {
        &self.s_g2
    }

    pub fn fixed_commitments(&self) -> &[G1Affine] {
        &self.fixed
    }

    /// Content address: sha256 of the canonical JSON parameters.
    pub fn config_id(&self) -> [u8; 32] {
        self.config_id
    }

    pub fn config_id_hex(&self) -> String {
        hex::encode(self.config_id)
    }
}

fn validate_steps(params: &ConfigParams) -> Result<(), ConfigError> {
    let steps = &params.steps;
    if steps.is_empty() {
        return Err(ConfigError::EmptyPipeline);
    }

    let mut last_rank = 0u8;
    let mut commitment_words = 0;
    let mut evaluation_words = 0;
    for (i, layout) in steps.iter().enumerate() {
        let step = i + 1;
        let kind = layout.kind;
        if kind.rank() < last_rank {
            return Err(ConfigError::StepOrder { step, kind });
        }
        if kind.rank() == last_rank && i > 0 && !kind.repeatable() {
            return Err(ConfigError::DuplicateStep { step, kind });
        }
        last_rank = kind.rank();

        let operand = |operand: &'static str, expected: usize, actual: usize| {
            if expected == actual {
                Ok(())
            } else {
                Err(ConfigError::OperandCount {
                    step,
                    kind,
                    operand,
                    expected,
                    actual,
                })
            }
        };

        match kind {
            StepKind::Commitments => {
                if layout.proof_words == 0 || layout.proof_words % G1_WORDS != 0 {
                    return Err(ConfigError::OperandCount {
                        step,
                        kind,
                        operand: "proof",
                        expected: layout.proof_words.max(1).next_multiple_of(G1_WORDS),
                        actual: layout.proof_words,
                    });
                }
                operand("aux", 0, layout.aux_words)?;
                commitment_words += layout.proof_words;
            }
            StepKind::Evaluations => {
                if layout.proof_words == 0 {
                    return Err(ConfigError::OperandCount {
                        step,
                        kind,
                        operand: "proof",
                        expected: 1,
                        actual: 0,
                    });
                }
                operand("aux", 0, layout.aux_words)?;
                evaluation_words += layout.proof_words;
            }
            StepKind::Lagrange => {
                operand("proof", 0, layout.proof_words)?;
                operand("aux", params.instance_len, layout.aux_words)?;
            }
            StepKind::Gate | StepKind::Pairing => {
                operand("proof", 0, layout.proof_words)?;
                operand("aux", 0, layout.aux_words)?;
            }
            StepKind::Opening => {
                operand("proof", G1_WORDS, layout.proof_words)?;
                operand("aux", 0, layout.aux_words)?;
            }
        }
    }

    for kind in [
        StepKind::Commitments,
        StepKind::Evaluations,
        StepKind::Lagrange,
        StepKind::Gate,
        StepKind::Opening,
        StepKind::Pairing,
    ] {
        if !steps.iter().any(|s| s.kind == kind) {
            return Err(ConfigError::MissingStep(kind));
        }
    }

    let expected = ConfigParams::commitment_words(params.num_advice);
    if commitment_words != expected {
        return Err(ConfigError::PhaseTotal {
            kind: StepKind::Commitments,
            expected,
            actual: commitment_words,
        });
    }
    let expected = ConfigParams::evaluation_words(params.num_advice);
    if evaluation_words != expected {
        return Err(ConfigError::PhaseTotal {
            kind: StepKind::Evaluations,
            expected,
            actual: evaluation_words,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::{encode_g1, encode_g2, scalar_mul};
    use ark_ec::{AffineRepr, CurveGroup};

    fn params(num_advice: usize, instance_len: usize) -> ConfigParams {
        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        let s_g2 = (g2 * Fr::from(5u64)).into_affine();
        ConfigParams {
            domain_log_size: 3,
            num_advice,
            instance_len,
            max_targets: 4,
            g1: encode_g1(&g1).to_vec(),
            g2: encode_g2(&g2).to_vec(),
            s_g2: encode_g2(&s_g2).to_vec(),
            fixed_commitments: (0..num_advice)
                .map(|i| encode_g1(&scalar_mul(&g1, &Fr::from(i as u64 + 2))).to_vec())
                .collect(),
            steps: ConfigParams::default_steps(num_advice, instance_len),
        }
    }

    #[test]
    fn loads_default_layout() {
        let cfg = VerifierConfig::load(params(2, 1)).unwrap();
        assert_eq!(cfg.num_steps(), 6);
        assert_eq!(cfg.total_proof_words(), 6 + 5 + 2);
        assert_eq!(cfg.total_aux_words(), 1);
        assert_eq!(cfg.proof_range(1), 6..11);
        assert_eq!(cfg.domain_size(), 8);
        assert_eq!(cfg.omega().pow([8u64]), Fr::ONE);
        assert_eq!(cfg.generators(4).0.len(), 3);
        assert_eq!(cfg.generators(5).1.len(), 2);
    }

    #[test]
    fn fine_layout_covers_same_words() {
        let mut p = params(2, 2);
        p.steps = ConfigParams::fine_steps(2, 2);
        let cfg = VerifierConfig::load(p).unwrap();
        assert_eq!(cfg.num_steps(), 3 + 5 + 4);
        assert_eq!(cfg.total_proof_words(), 13);
        assert_eq!(cfg.total_aux_words(), 2);
    }

    #[test]
    fn config_id_tracks_params() {
        let a = VerifierConfig::load(params(2, 1)).unwrap();
        let b = VerifierConfig::load(params(2, 1)).unwrap();
        let c = VerifierConfig::load(params(3, 1)).unwrap();
        assert_eq!(a.config_id(), b.config_id());
        assert_ne!(a.config_id(), c.config_id());
        assert_eq!(a.config_id_hex().len(), 64);
    }

    #[test]
    fn wrong_generator_count() {
        let mut p = params(2, 1);
        p.fixed_commitments.pop();
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::GeneratorCount { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn bad_point_named() {
        let mut p = params(2, 1);
        p.fixed_commitments[1][1] = Word::from_fr(&Fr::from(3u64));
        match VerifierConfig::load(p) {
            Err(ConfigError::InvalidPoint { name, .. }) => assert_eq!(name, "fixed_commitments[1]"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn steps_out_of_order() {
        let mut p = params(1, 1);
        p.steps.swap(3, 4);
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::StepOrder { step: 5, kind: StepKind::Gate })
        ));
    }

    #[test]
    fn duplicate_pairing() {
        let mut p = params(1, 1);
        p.steps.push(StepLayout::new(StepKind::Pairing, 0, 0));
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::DuplicateStep { step: 7, .. })
        ));
    }

    #[test]
    fn missing_pairing() {
        let mut p = params(1, 1);
        p.steps.pop();
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::MissingStep(StepKind::Pairing))
        ));
    }

    #[test]
    fn operand_count_mismatch() {
        let mut p = params(1, 2);
        p.steps[2].aux_words = 1;
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::OperandCount { step: 3, operand: "aux", expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn commitment_total_mismatch() {
        let mut p = params(2, 1);
        p.steps[0].proof_words = 4;
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::PhaseTotal { kind: StepKind::Commitments, expected: 6, actual: 4 })
        ));
    }

    #[test]
    fn odd_commitment_step_rejected() {
        let mut p = params(1, 1);
        p.steps[0].proof_words = 3;
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::OperandCount { step: 1, operand: "proof", .. })
        ));
    }

    #[test]
    fn domain_bounds() {
        let mut p = params(1, 1);
        p.domain_log_size = 0;
        assert!(matches!(VerifierConfig::load(p), Err(ConfigError::Domain(0))));
        let mut p = params(1, 9);
        p.steps = ConfigParams::default_steps(1, 9);
        assert!(matches!(
            VerifierConfig::load(p),
            Err(ConfigError::InstanceLen { len: 9, domain_size: 8 })
        ));
    }

    #[test]
    fn json_roundtrip_loads() {
        let p = params(2, 1);
        let cfg = VerifierConfig::from_json(&p.to_json()).unwrap();
        assert_eq!(cfg.config_id(), VerifierConfig::load(p).unwrap().config_id());
    }
}
