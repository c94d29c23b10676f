// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! # agg-verifier
//!
//! Verifier for proofs produced by a multi-round recursive aggregation
//! pipeline. A single aggregate proof is checked by an ordered pipeline of
//! steps whose partition is described by [`VerifierConfig`]; the last step
//! folds the proof's own KZG opening together with the deferred accumulator
//! carried by its shadow instance into one pairing check.
//!
//! | Module | Purpose |
//! |---|---|
//! | [`arith`] | BN254 field/group primitives and strict word decoding |
//! | [`config`] | Circuit parameters, validated once into an immutable config |
//! | [`pipeline`] | Verifier accumulator and the ordered step driver |
//! | [`steps`] | Individual step implementations |
//! | [`verifier`] | [`AggregateVerifier`], the public entry point |
//! | `prover` | Sample prover (feature `prove`) |

pub mod arith;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod steps;
pub mod verifier;

#[cfg(feature = "prove")]
pub mod prover;

pub use config::{ConfigParams, StepKind, StepLayout, VerifierConfig};
pub use error::{ArithmeticError, ConfigError, ShapeError, VerifyError};
pub use verifier::{AggregateVerifier, VerifyRequest};
