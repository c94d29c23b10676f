// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Typed errors for configuration loading and proof verification.
//!
//! Step numbers are 1-based, matching the order of `VerifierConfig::steps`.

use crate::config::StepKind;

/// Malformed field or group element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("scalar is not below the field modulus")]
    ScalarOutOfRange,

    #[error("coordinate is not below the base field modulus")]
    CoordinateOutOfRange,

    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,

    #[error("zero has no inverse")]
    NotInvertible,

    #[error("msm over {bases} bases and {scalars} scalars")]
    MsmLength { bases: usize, scalars: usize },

    #[error("expected {expected} words for encoding, got {actual}")]
    Encoding { expected: usize, actual: usize },
}

/// Input length or count mismatch, detected before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("proof ends inside step {step}: expected {expected} words, got {actual}")]
    ProofTruncated { step: usize, expected: usize, actual: usize },

    #[error("proof has trailing words: expected {expected}, got {actual}")]
    ProofTrailing { expected: usize, actual: usize },

    #[error("aux data ends inside step {step}: expected {expected} words, got {actual}")]
    AuxTruncated { step: usize, expected: usize, actual: usize },

    #[error("aux data has trailing words: expected {expected}, got {actual}")]
    AuxTrailing { expected: usize, actual: usize },

    #[error("instance has {actual} elements, expected {expected}")]
    Instance { expected: usize, actual: usize },

    #[error("shadow instance has {actual} words, expected {expected}")]
    Shadow { expected: usize, actual: usize },

    #[error("no target instances")]
    NoTargets,

    #[error("{actual} target instances exceed the maximum of {max}")]
    TooManyTargets { max: usize, actual: usize },

    #[error("target instance {index} is empty")]
    EmptyTarget { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("step {step}: {source}")]
    Arithmetic {
        step: usize,
        #[source]
        source: ArithmeticError,
    },

    #[error("shadow instance is inconsistent with the instance")]
    ShadowMismatch,

    #[error("verification failed at step {step}")]
    VerificationFailed { step: usize },
}

impl VerifyError {
    pub(crate) fn at(step: usize) -> impl FnOnce(ArithmeticError) -> VerifyError {
        move |source| VerifyError::Arithmetic { step, source }
    }

    /// True for errors caused by malformed input rather than an invalid proof.
    pub fn is_malformed(&self) -> bool {
        matches!(self, VerifyError::Shape(_) | VerifyError::Arithmetic { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("domain log size {0} is outside 1..=28")]
    Domain(u32),

    #[error("num_advice must be positive")]
    NoAdvice,

    #[error("instance length {len} must be in 1..={domain_size}")]
    InstanceLen { len: usize, domain_size: usize },

    #[error("max_targets must be positive")]
    NoTargets,

    #[error("{expected} fixed commitments required, got {actual}")]
    GeneratorCount { expected: usize, actual: usize },

    #[error("invalid point `{name}`: {source}")]
    InvalidPoint {
        name: String,
        #[source]
        source: ArithmeticError,
    },

    #[error("pipeline has no steps")]
    EmptyPipeline,

    #[error("step {step} ({kind:?}) is out of order")]
    StepOrder { step: usize, kind: StepKind },

    #[error("step {step} ({kind:?}) may appear only once")]
    DuplicateStep { step: usize, kind: StepKind },

    #[error("pipeline is missing a {0:?} step")]
    MissingStep(StepKind),

    #[error("step {step} ({kind:?}) expects {expected} {operand} words, got {actual}")]
    OperandCount {
        step: usize,
        kind: StepKind,
        operand: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{kind:?} steps cover {actual} words, expected {expected}")]
    PhaseTotal {
        kind: StepKind,
        expected: usize,
        actual: usize,
    },

    #[error("params json: {0}")]
    Json(#[from] serde_json::Error),
}
