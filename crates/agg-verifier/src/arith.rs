// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! BN254 arithmetic primitives used by every verification step.
//!
//! Encodings (little-endian 32-byte words):
//! - scalar: one word, must be below the `Fr` modulus
//! - G1: `(x, y)`, two `Fq` words; `(0, 0)` is the identity
//! - G2: `(x.c0, x.c1, y.c0, y.c1)`, four `Fq` words; all zero is the identity

use agg_types::Word;
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_ff::Field;
use ark_std::Zero;

use crate::error::ArithmeticError;

pub const G1_WORDS: usize = 2;
pub const G2_WORDS: usize = 4;

pub fn scalar(word: &Word) -> Result<Fr, ArithmeticError> {
    word.to_fr().ok_or(ArithmeticError::ScalarOutOfRange)
}

pub fn scalars(words: &[Word]) -> Result<Vec<Fr>, ArithmeticError> {
    words.iter().map(scalar).collect()
}

fn coordinate(word: &Word) -> Result<Fq, ArithmeticError> {
    word.to_field::<Fq>()
        .ok_or(ArithmeticError::CoordinateOutOfRange)
}

fn expect_len(words: &[Word], expected: usize) -> Result<(), ArithmeticError> {
    if words.len() != expected {
        return Err(ArithmeticError::Encoding {
            expected,
            actual: words.len(),
        });
    }
    Ok(())
}

pub fn decode_g1(words: &[Word]) -> Result<G1Affine, ArithmeticError> {
    expect_len(words, G1_WORDS)?;
    if words.iter().all(Word::is_zero) {
        return Ok(G1Affine::identity());
    }
    let p = G1Affine::new_unchecked(coordinate(&words[0])?, coordinate(&words[1])?);
    if !p.is_on_curve() {
        return Err(ArithmeticError::NotOnCurve);
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ArithmeticError::NotInSubgroup);
    }
    Ok(p)
}

pub fn decode_g1_points(words: &[Word]) -> Result<Vec<G1Affine>, ArithmeticError> {
    if words.len() % G1_WORDS != 0 {
        return Err(ArithmeticError::Encoding {
            expected: words.len().next_multiple_of(G1_WORDS),
            actual: words.len(),
        });
    }
    words.chunks_exact(G1_WORDS).map(decode_g1).collect()
}

pub fn encode_g1(p: &G1Affine) -> [Word; G1_WORDS] {
    if p.infinity {
        return [Word::ZERO; G1_WORDS];
    }
    [Word::from_field(&p.x), Word::from_field(&p.y)]
}

pub fn decode_g2(words: &[Word]) -> Result<G2Affine, ArithmeticError> {
    expect_len(words, G2_WORDS)?;
    if words.iter().all(Word::is_zero) {
        return Ok(G2Affine::identity());
    }
    let x = Fq2::new(coordinate(&words[0])?, coordinate(&words[1])?);
    let y = Fq2::new(coordinate(&words[2])?, coordinate(&words[3])?);
    let p = G2Affine::new_unchecked(x, y);
    if !p.is_on_curve() {
        return Err(ArithmeticError::NotOnCurve);
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ArithmeticError::NotInSubgroup);
    }
    Ok(p)
}

pub fn encode_g2(p: &G2Affine) -> [Word; G2_WORDS] {
    if p.infinity {
        return [Word::ZERO; G2_WORDS];
    }
    [
        Word::from_field(&p.x.c0),
        Word::from_field(&p.x.c1),
        Word::from_field(&p.y.c0),
        Word::from_field(&p.y.c1),
    ]
}

pub fn inverse(x: &Fr) -> Result<Fr, ArithmeticError> {
    x.inverse().ok_or(ArithmeticError::NotInvertible)
}

/// `[1, base, base^2, ..., base^(n-1)]`
pub fn powers(base: Fr, n: usize) -> Vec<Fr> {
    let mut out = Vec::with_capacity(n);
    let mut acc = Fr::ONE;
    for _ in 0..n {
        out.push(acc);
        acc *= base;
    }
    out
}

pub fn scalar_mul(p: &G1Affine, s: &Fr) -> G1Affine {
    (*p * s).into_affine()
}

pub fn msm(bases: &[G1Affine], scalars: &[Fr]) -> Result<G1Affine, ArithmeticError> {
    G1Projective::msm(bases, scalars)
        .map(|p| p.into_affine())
        .map_err(|_| ArithmeticError::MsmLength {
            bases: bases.len(),
            scalars: scalars.len(),
        })
}

/// True when `prod e(g1_i, g2_i)` is the identity of the target group.
pub fn pairing_check(pairs: &[(G1Affine, G2Affine)]) -> bool {
    let g1: Vec<G1Affine> = pairs.iter().map(|(a, _)| *a).collect();
    let g2: Vec<G2Affine> = pairs.iter().map(|(_, b)| *b).collect();
    Bn254::multi_pairing(g1, g2).is_zero()
}
