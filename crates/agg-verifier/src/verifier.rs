// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;

use agg_poseidon::aggregate_instance;
use agg_types::{AuxData, Instance, ProofTranscript, ShadowInstance, SHADOW_WORDS};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::VerifierConfig;
use crate::error::{ShapeError, VerifyError};
use crate::pipeline;

/// Public entry point for aggregate proof verification.
///
/// Stateless apart from the shared configuration; clones are cheap and
/// may be used from any number of threads.
#[derive(Clone, Debug)]
pub struct AggregateVerifier {
    config: Arc<VerifierConfig>,
}

/// One independent verification, as submitted to [`AggregateVerifier::verify_batch`].
#[derive(Clone, Debug)]
pub struct VerifyRequest {
    pub proof: ProofTranscript,
    pub instance: Instance,
    pub shadow: ShadowInstance,
    pub aux: AuxData,
    pub targets: Vec<Instance>,
}

impl AggregateVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn with_shared(config: Arc<VerifierConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// The instance an aggregate proof over `targets` with this shadow must carry.
    pub fn instance_for(&self, shadow: &ShadowInstance, targets: &[Instance]) -> Instance {
        aggregate_instance(shadow, targets, self.config.instance_len())
    }

    /// Length and count checks against the configuration. Runs no arithmetic.
    pub fn check_shape(
        &self,
        proof: &ProofTranscript,
        instance: &Instance,
        shadow: &ShadowInstance,
        aux: &AuxData,
        targets: &[Instance],
    ) -> Result<(), ShapeError> {
        let config = &self.config;
        for i in 0..config.num_steps() {
            let range = config.proof_range(i);
            if proof.len() < range.end {
                return Err(ShapeError::ProofTruncated {
                    step: i + 1,
                    expected: range.len(),
                    actual: proof.len().saturating_sub(range.start),
                });
            }
            let range = config.aux_range(i);
            if aux.len() < range.end {
                return Err(ShapeError::AuxTruncated {
                    step: i + 1,
                    expected: range.len(),
                    actual: aux.len().saturating_sub(range.start),
                });
            }
        }
        if proof.len() != config.total_proof_words() {
            return Err(ShapeError::ProofTrailing {
                expected: config.total_proof_words(),
                actual: proof.len(),
            });
        }
        if aux.len() != config.total_aux_words() {
            return Err(ShapeError::AuxTrailing {
                expected: config.total_aux_words(),
                actual: aux.len(),
            });
        }
        if instance.len() != config.instance_len() {
            return Err(ShapeError::Instance {
                expected: config.instance_len(),
                actual: instance.len(),
            });
        }
        if shadow.words().len() != SHADOW_WORDS {
            return Err(ShapeError::Shadow {
                expected: SHADOW_WORDS,
                actual: shadow.words().len(),
            });
        }
        if targets.is_empty() {
            return Err(ShapeError::NoTargets);
        }
        if targets.len() > config.max_targets() {
            return Err(ShapeError::TooManyTargets {
                max: config.max_targets(),
                actual: targets.len(),
            });
        }
        if let Some(index) = targets.iter().position(Instance::is_empty) {
            return Err(ShapeError::EmptyTarget { index });
        }
        Ok(())
    }

    pub fn verify(
        &self,
        proof: &ProofTranscript,
        instance: &Instance,
        shadow: &ShadowInstance,
        aux: &AuxData,
        targets: &[Instance],
    ) -> Result<(), VerifyError> {
        self.check_shape(proof, instance, shadow, aux, targets)?;

        if self.instance_for(shadow, targets) != *instance {
            warn!(shadow = %shadow.short_id(), "shadow does not match instance");
            return Err(VerifyError::ShadowMismatch);
        }

        let result = pipeline::run(&self.config, proof.words(), instance, shadow, aux.words());
        match &result {
            Ok(()) => info!(shadow = %shadow.short_id(), targets = targets.len(), "proof verified"),
            Err(e) => warn!(shadow = %shadow.short_id(), error = %e, "proof rejected"),
        }
        result
    }

    pub fn verify_request(&self, req: &VerifyRequest) -> Result<(), VerifyError> {
        self.verify(&req.proof, &req.instance, &req.shadow, &req.aux, &req.targets)
    }

    /// Verify independent proofs in parallel. Results keep input order.
    pub fn verify_batch(&self, requests: &[VerifyRequest]) -> Vec<Result<(), VerifyError>> {
        requests
            .par_iter()
            .map(|req| self.verify_request(req))
            .collect()
    }
}
