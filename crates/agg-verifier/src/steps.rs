// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Pipeline steps. Each reads its slice of the proof and aux data and
//! updates the accumulator in place.

use agg_types::SHADOW_WORDS;
use ark_bn254::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{AdditiveGroup, Field};

use crate::arith::{self, G1_WORDS};
use crate::error::{ArithmeticError, VerifyError};
use crate::pipeline::{Accumulator, StepInput};

type StepResult = Result<(), VerifyError>;

/// Decode advice/quotient commitments and absorb them.
pub fn commitments(acc: &mut Accumulator, input: &StepInput<'_>) -> StepResult {
    let points = arith::decode_g1_points(input.proof).map_err(VerifyError::at(input.step))?;
    acc.transcript.absorb_words(input.proof);
    acc.commitments.extend(points);
    Ok(())
}

/// Decode claimed evaluations at `z` and absorb them.
pub fn evaluations(acc: &mut Accumulator, input: &StepInput<'_>) -> StepResult {
    let values = arith::scalars(input.proof).map_err(VerifyError::at(input.step))?;
    acc.transcript.absorb_words(input.proof);
    acc.evaluations.extend(values);
    Ok(())
}

/// Check the supplied inverses `1/(z - ω^j)` and evaluate the instance
/// polynomial at `z` in the Lagrange basis.
pub fn lagrange(acc: &mut Accumulator, input: &StepInput<'_>) -> StepResult {
    let step = input.step;
    let config = input.config;
    let inverses = arith::scalars(input.aux).map_err(VerifyError::at(step))?;

    let z = acc.z;
    let vanishing = z.pow([config.domain_size() as u64]) - Fr::ONE;
    let scale = vanishing * config.domain_size_inv();

    let mut sum = Fr::ZERO;
    for ((value, omega_j), inv) in input
        .instance
        .as_slice()
        .iter()
        .zip(config.omega_powers())
        .zip(&inverses)
    {
        if (z - omega_j) * inv != Fr::ONE {
            return Err(VerifyError::VerificationFailed { step });
        }
        sum += *value * omega_j * inv;
    }

    acc.vanishing = vanishing;
    acc.instance_eval = sum * scale;
    Ok(())
}

/// `Σ q_k(z)·a_k(z) + I(z) = t(z)·(z^n - 1)`
pub fn gate(acc: &mut Accumulator, input: &StepInput<'_>) -> StepResult {
    let m = input.config.num_advice();
    let evals = &acc.evaluations;
    let (advice, rest) = evals.split_at(m);
    let (quotient, fixed) = (rest[0], &rest[1..]);

    let lhs = advice
        .iter()
        .zip(fixed)
        .fold(acc.instance_eval, |sum, (a, q)| sum + *a * q);
    if lhs != quotient * acc.vanishing {
        return Err(VerifyError::VerificationFailed { step: input.step });
    }
    Ok(())
}

/// Fold every commitment and evaluation with powers of `v` into one
/// opening at `z`: `P = F - E·g1 + z·W`.
pub fn opening(acc: &mut Accumulator, input: &StepInput<'_>) -> StepResult {
    let step = input.step;
    let config = input.config;
    let witness = arith::decode_g1(input.proof).map_err(VerifyError::at(step))?;
    acc.transcript.absorb_words(input.proof);

    let mut bases = acc.commitments.clone();
    bases.extend_from_slice(config.fixed_commitments());
    let coeffs = arith::powers(acc.v, bases.len());

    let folded = arith::msm(&bases, &coeffs).map_err(VerifyError::at(step))?;
    let eval: Fr = coeffs
        .iter()
        .zip(&acc.evaluations)
        .map(|(c, y)| *c * y)
        .sum();

    let p = (folded.into_group() - *config.g1() * eval + witness * acc.z).into_affine();
    acc.opening = Some((witness, p));
    Ok(())
}

/// Terminal check, batching the proof's opening with the deferred
/// accumulator carried by the shadow instance:
/// `e(W + u·S_lhs, [τ]g2) = e(P + u·S_rhs, g2)`.
pub fn pairing(acc: &mut Accumulator, input: &StepInput<'_>) -> StepResult {
    let step = input.step;
    let config = input.config;
    let words = input.shadow.words();
    if words.len() != SHADOW_WORDS {
        return Err(VerifyError::at(step)(ArithmeticError::Encoding {
            expected: SHADOW_WORDS,
            actual: words.len(),
        }));
    }
    let s_lhs = arith::decode_g1(&words[..G1_WORDS]).map_err(VerifyError::at(step))?;
    let s_rhs = arith::decode_g1(&words[G1_WORDS..]).map_err(VerifyError::at(step))?;

    let Some((witness, p)) = acc.opening else {
        return Err(VerifyError::VerificationFailed { step });
    };
    let u = acc.u;
    let lhs: G1Affine = (s_lhs * u + witness).into_affine();
    let rhs: G1Affine = (s_rhs * u + p).into_affine();

    let ok = arith::pairing_check(&[(lhs, *config.s_g2()), (-rhs, *config.g2())]);
    acc.verdict = Some(ok);
    if !ok {
        return Err(VerifyError::VerificationFailed { step });
    }
    Ok(())
}
