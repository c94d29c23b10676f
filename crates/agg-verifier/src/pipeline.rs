// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Ordered step driver.
//!
//! Steps run in configuration order over one [`Accumulator`]. A step either
//! returns the updated accumulator or a typed error carrying its 1-based
//! index; nothing runs after a failed step.

use agg_poseidon::Transcript;
use agg_types::{Instance, ShadowInstance, Word};
use ark_bn254::{Fr, G1Affine};
use ark_ff::AdditiveGroup;
use tracing::debug;

use crate::config::{Phase, StepKind, StepLayout, VerifierConfig};
use crate::error::{ShapeError, VerifyError};
use crate::steps;

/// Verifier state threaded through the steps.
#[derive(Clone)]
pub struct Accumulator {
    pub transcript: Transcript,
    pub phase: Phase,
    /// Advice commitments followed by the quotient commitment.
    pub commitments: Vec<G1Affine>,
    /// `a_1(z)..a_m(z), t(z), q_1(z)..q_m(z)`
    pub evaluations: Vec<Fr>,
    pub z: Fr,
    pub v: Fr,
    pub u: Fr,
    /// `z^n - 1`
    pub vanishing: Fr,
    /// Instance polynomial at `z`.
    pub instance_eval: Fr,
    /// Opening witness and the folded opening point `P`.
    pub opening: Option<(G1Affine, G1Affine)>,
    pub verdict: Option<bool>,
}

impl Accumulator {
    pub fn new(instance: &Instance, shadow: &ShadowInstance) -> Self {
        Self {
            transcript: Transcript::for_statement(instance, shadow),
            phase: Phase::Commit,
            commitments: Vec::new(),
            evaluations: Vec::new(),
            z: Fr::ZERO,
            v: Fr::ZERO,
            u: Fr::ZERO,
            vanishing: Fr::ZERO,
            instance_eval: Fr::ZERO,
            opening: None,
            verdict: None,
        }
    }

    /// Move to `phase`, squeezing the challenge that opens it.
    fn enter(&mut self, phase: Phase) {
        if phase <= self.phase {
            return;
        }
        match phase {
            Phase::Evaluate => self.z = self.transcript.challenge(),
            Phase::Open => self.v = self.transcript.challenge(),
            Phase::Finalize => self.u = self.transcript.challenge(),
            Phase::Commit | Phase::Check => {}
        }
        self.phase = phase;
    }
}

/// Operands of a single step.
pub struct StepInput<'a> {
    /// 1-based position in the pipeline.
    pub step: usize,
    pub layout: &'a StepLayout,
    pub proof: &'a [Word],
    pub aux: &'a [Word],
    pub instance: &'a Instance,
    pub shadow: &'a ShadowInstance,
    pub config: &'a VerifierConfig,
}

pub fn apply(acc: &mut Accumulator, input: &StepInput<'_>) -> Result<(), VerifyError> {
    acc.enter(input.layout.kind.phase());
    match input.layout.kind {
        StepKind::Commitments => steps::commitments(acc, input),
        StepKind::Evaluations => steps::evaluations(acc, input),
        StepKind::Lagrange => steps::lagrange(acc, input),
        StepKind::Gate => steps::gate(acc, input),
        StepKind::Opening => steps::opening(acc, input),
        StepKind::Pairing => steps::pairing(acc, input),
    }
}

/// Run every configured step; `Ok` only when the terminal check passes.
pub fn run(
    config: &VerifierConfig,
    proof: &[Word],
    instance: &Instance,
    shadow: &ShadowInstance,
    aux: &[Word],
) -> Result<(), VerifyError> {
    let mut acc = Accumulator::new(instance, shadow);
    for (i, layout) in config.steps().iter().enumerate() {
        let step = i + 1;
        let proof_range = config.proof_range(i);
        let aux_range = config.aux_range(i);
        let proof_slice = proof.get(proof_range.clone()).ok_or(ShapeError::ProofTruncated {
            step,
            expected: layout.proof_words,
            actual: proof.len().saturating_sub(proof_range.start),
        })?;
        let aux_slice = aux.get(aux_range.clone()).ok_or(ShapeError::AuxTruncated {
            step,
            expected: layout.aux_words,
            actual: aux.len().saturating_sub(aux_range.start),
        })?;

        let input = StepInput {
            step,
            layout,
            proof: proof_slice,
            aux: aux_slice,
            instance,
            shadow,
            config,
        };
        apply(&mut acc, &input)?;
        debug!(step, kind = ?layout.kind, "step passed");
    }

    match acc.verdict {
        Some(true) => Ok(()),
        _ => Err(VerifyError::VerificationFailed {
            step: config.num_steps(),
        }),
    }
}
