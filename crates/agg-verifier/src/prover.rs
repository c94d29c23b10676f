// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Trapdoor sample prover.
//!
//! Knows the SRS secret `τ`, so commitments are plain scalar multiples of
//! `g1`. Produces configurations, shadow accumulators and proofs that the
//! verifier accepts; used for tests and for generating sample round data.

use agg_poseidon::{aggregate_instance, Transcript};
use agg_types::{AuxData, Instance, ProofTranscript, ShadowInstance, Word};
use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{AdditiveGroup, Field, UniformRand};
use ark_poly::univariate::DensePolynomial;
use ark_poly::{DenseUVPolynomial, EvaluationDomain, Polynomial, Radix2EvaluationDomain};
use ark_std::rand::Rng;

use crate::arith::{self, encode_g1, encode_g2};
use crate::config::{ConfigParams, StepLayout, VerifierConfig};
use crate::error::{ArithmeticError, ConfigError};
use crate::verifier::AggregateVerifier;

type Poly = DensePolynomial<Fr>;

pub struct SampleProver {
    tau: Fr,
    domain: Radix2EvaluationDomain<Fr>,
    /// Fixed columns in coefficient form; `q_1 = 1`.
    fixed: Vec<Poly>,
    params: ConfigParams,
}

/// Output of [`SampleProver::prove_aggregate`].
pub struct SampleRound {
    pub instance: Instance,
    pub shadow: ShadowInstance,
    pub proof: ProofTranscript,
    pub aux: AuxData,
}

impl SampleProver {
    pub fn setup<R: Rng>(
        domain_log_size: u32,
        num_advice: usize,
        instance_len: usize,
        max_targets: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let n = 1usize
            .checked_shl(domain_log_size)
            .ok_or(ConfigError::Domain(domain_log_size))?;
        let domain =
            Radix2EvaluationDomain::<Fr>::new(n).ok_or(ConfigError::Domain(domain_log_size))?;
        let tau = Fr::rand(rng);

        let fixed: Vec<Poly> = (0..num_advice)
            .map(|k| {
                let evals: Vec<Fr> = if k == 0 {
                    vec![Fr::ONE; n]
                } else {
                    (0..n).map(|_| Fr::rand(rng)).collect()
                };
                Poly::from_coefficients_vec(domain.ifft(&evals))
            })
            .collect();

        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        let s_g2 = (g2 * tau).into_affine();
        let params = ConfigParams {
            domain_log_size,
            num_advice,
            instance_len,
            max_targets,
            g1: encode_g1(&g1).to_vec(),
            g2: encode_g2(&g2).to_vec(),
            s_g2: encode_g2(&s_g2).to_vec(),
            fixed_commitments: fixed
                .iter()
                .map(|q| encode_g1(&commit(&tau, q)).to_vec())
                .collect(),
            steps: ConfigParams::default_steps(num_advice, instance_len),
        };
        VerifierConfig::load(params.clone())?;

        Ok(Self {
            tau,
            domain,
            fixed,
            params,
        })
    }

    pub fn params(&self) -> &ConfigParams {
        &self.params
    }

    /// Same circuit with a different step partition.
    pub fn set_steps(&mut self, steps: Vec<StepLayout>) -> Result<(), ConfigError> {
        let mut params = self.params.clone();
        params.steps = steps;
        VerifierConfig::load(params.clone())?;
        self.params = params;
        Ok(())
    }

    pub fn config(&self) -> Result<VerifierConfig, ConfigError> {
        VerifierConfig::load(self.params.clone())
    }

    pub fn verifier(&self) -> Result<AggregateVerifier, ConfigError> {
        Ok(AggregateVerifier::new(self.config()?))
    }

    /// A fresh valid deferred accumulator `(a·g1, a·τ·g1)`.
    pub fn random_shadow<R: Rng>(&self, rng: &mut R) -> ShadowInstance {
        let a = Fr::rand(rng);
        let g1 = G1Affine::generator();
        let lhs = arith::scalar_mul(&g1, &a);
        let rhs = arith::scalar_mul(&g1, &(a * self.tau));
        let mut words = encode_g1(&lhs).to_vec();
        words.extend_from_slice(&encode_g1(&rhs));
        ShadowInstance::new(words)
    }

    /// Draw a shadow, derive the aggregate instance for `targets`, and prove it.
    pub fn prove_aggregate<R: Rng>(
        &self,
        targets: &[Instance],
        rng: &mut R,
    ) -> Result<SampleRound, ArithmeticError> {
        let shadow = self.random_shadow(rng);
        let instance = aggregate_instance(&shadow, targets, self.params.instance_len);
        let (proof, aux) = self.prove(&instance, &shadow, rng)?;
        Ok(SampleRound {
            instance,
            shadow,
            proof,
            aux,
        })
    }

    pub fn prove<R: Rng>(
        &self,
        instance: &Instance,
        shadow: &ShadowInstance,
        rng: &mut R,
    ) -> Result<(ProofTranscript, AuxData), ArithmeticError> {
        let n = self.domain.size();
        let m = self.params.num_advice;
        if instance.len() != self.params.instance_len {
            return Err(ArithmeticError::Encoding {
                expected: self.params.instance_len,
                actual: instance.len(),
            });
        }

        let mut instance_evals = vec![Fr::ZERO; n];
        instance_evals[..instance.len()].copy_from_slice(instance.as_slice());
        let instance_poly = Poly::from_coefficients_vec(self.domain.ifft(&instance_evals));

        // Free advice columns are random; a_1 is solved so the gate vanishes
        // on the domain (q_1 is one everywhere).
        let fixed_evals: Vec<Vec<Fr>> = self
            .fixed
            .iter()
            .map(|q| self.domain.fft(&q.coeffs))
            .collect();
        let mut advice_evals: Vec<Vec<Fr>> = vec![vec![Fr::ZERO; n]];
        for _ in 1..m {
            advice_evals.push((0..n).map(|_| Fr::rand(rng)).collect());
        }
        for i in 0..n {
            let mut acc = instance_evals[i];
            for k in 1..m {
                acc += fixed_evals[k][i] * advice_evals[k][i];
            }
            advice_evals[0][i] = -acc;
        }
        let advice: Vec<Poly> = advice_evals
            .iter()
            .map(|e| Poly::from_coefficients_vec(self.domain.ifft(e)))
            .collect();

        let mut numerator = instance_poly;
        for (a, q) in advice.iter().zip(&self.fixed) {
            numerator = &numerator + &(a * q);
        }
        let quotient = divide_by_vanishing(&numerator, n);

        let mut transcript = Transcript::for_statement(instance, shadow);
        let mut proof: Vec<Word> = Vec::new();
        for p in advice.iter().chain(std::iter::once(&quotient)) {
            proof.extend_from_slice(&encode_g1(&commit(&self.tau, p)));
        }
        transcript.absorb_words(&proof);
        let z = transcript.challenge();

        let opened: Vec<&Poly> = advice
            .iter()
            .chain(std::iter::once(&quotient))
            .chain(&self.fixed)
            .collect();
        let evals: Vec<Word> = opened.iter().map(|p| Word::from_fr(&p.evaluate(&z))).collect();
        transcript.absorb_words(&evals);
        proof.extend_from_slice(&evals);
        let v = transcript.challenge();

        let mut folded = vec![Fr::ZERO; opened.iter().map(|p| p.coeffs.len()).max().unwrap_or(0)];
        for (p, coeff) in opened.iter().zip(arith::powers(v, opened.len())) {
            for (acc, c) in folded.iter_mut().zip(&p.coeffs) {
                *acc += coeff * c;
            }
        }
        let witness = divide_by_linear(&folded, z);
        proof.extend_from_slice(&encode_g1(&commit(&self.tau, &witness)));

        let aux = (0..instance.len())
            .map(|j| arith::inverse(&(z - self.domain.element(j))).map(|inv| Word::from_fr(&inv)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((ProofTranscript(proof), AuxData(aux)))
    }
}

fn commit(tau: &Fr, p: &Poly) -> G1Affine {
    arith::scalar_mul(&G1Affine::generator(), &p.evaluate(tau))
}

/// Exact quotient of `p` by `X^n - 1`; the remainder is zero for a
/// satisfied gate.
fn divide_by_vanishing(p: &Poly, n: usize) -> Poly {
    let mut rem = p.coeffs.clone();
    if rem.len() <= n {
        return Poly::from_coefficients_vec(vec![]);
    }
    let mut out = vec![Fr::ZERO; rem.len() - n];
    for i in (n..rem.len()).rev() {
        let c = rem[i];
        out[i - n] = c;
        rem[i - n] += c;
        rem[i] = Fr::ZERO;
    }
    Poly::from_coefficients_vec(out)
}

/// `(f(X) - f(z)) / (X - z)` by synthetic division.
fn divide_by_linear(coeffs: &[Fr], z: Fr) -> Poly {
    if coeffs.len() < 2 {
        return Poly::from_coefficients_vec(vec![]);
    }
    let mut out = vec![Fr::ZERO; coeffs.len() - 1];
    let mut carry = Fr::ZERO;
    for i in (1..coeffs.len()).rev() {
        carry = coeffs[i] + carry * z;
        out[i - 1] = carry;
    }
    Poly::from_coefficients_vec(out)
}
