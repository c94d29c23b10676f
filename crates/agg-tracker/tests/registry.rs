// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Registry tests over real proofs: multi-round lineage, idempotent
//! registration, seeding access control, persistence, concurrency.

use std::sync::Arc;
use std::thread;

use agg_tracker::{ProofTracker, TrackError};
use agg_types::Instance;
use agg_verifier::prover::{SampleProver, SampleRound};
use agg_verifier::{AggregateVerifier, VerifyError};
use ark_bn254::Fr;
use ark_ff::UniformRand;
use ark_std::rand::{rngs::StdRng, SeedableRng};

const ADMIN: &str = "admin";

fn test_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Three-round fixture ──

struct Rounds {
    prover: SampleProver,
    verifier: AggregateVerifier,
    /// Round-1 leaf instance.
    i1: Instance,
    r2: SampleRound,
    r3: SampleRound,
}

fn rounds() -> Rounds {
    let mut rng = test_rng();
    let prover = SampleProver::setup(3, 2, 2, 2, &mut rng).unwrap();
    let verifier = prover.verifier().unwrap();
    let i1 = Instance::new((0..4).map(|_| Fr::rand(&mut rng)).collect());
    let r2 = prover.prove_aggregate(&[i1.clone()], &mut rng).unwrap();
    let r3 = prover
        .prove_aggregate(&[r2.instance.clone()], &mut rng)
        .unwrap();
    Rounds {
        prover,
        verifier,
        i1,
        r2,
        r3,
    }
}

fn register(tracker: &ProofTracker, round: &SampleRound, targets: &[Instance]) -> Result<(), TrackError> {
    let shadow = tracker.register_proofs(&round.proof, &round.shadow, &round.aux, targets)?;
    assert_eq!(shadow, round.shadow);
    Ok(())
}

// ── Lineage ──

#[test]
fn three_round_lineage() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);

    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    assert!(tracker.is_registered(&r.r2.shadow));
    register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();

    assert!(tracker
        .check_verified_proof(&r.r3.shadow, &[r.r2.shadow.clone()], &[r.i1.clone()])
        .unwrap());
    // Skipping the round-2 link.
    assert!(!tracker
        .check_verified_proof(&r.r3.shadow, &[], &[r.i1.clone()])
        .unwrap());
    // Round 3 directly vouches for the round-2 instance.
    assert!(tracker
        .check_verified_proof(&r.r3.shadow, &[], &[r.r2.instance.clone()])
        .unwrap());

    let lineage = tracker
        .trace_lineage(&r.r3.shadow, &[r.r2.shadow.clone()], &[r.i1.clone()])
        .unwrap();
    assert_eq!(lineage.rounds, vec![3, 2]);
    assert_eq!(tracker.round(&r.r2.shadow), Some(2));
    assert_eq!(tracker.round(&r.r3.shadow), Some(3));
}

#[test]
fn rounds_settle_after_out_of_order_registration() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();

    register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();
    assert_eq!(tracker.round(&r.r3.shadow), Some(2));
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();

    assert_eq!(tracker.round(&r.r3.shadow), Some(3));
    assert_eq!(tracker.round(&r.r2.shadow), Some(2));
    let lineage = tracker
        .trace_lineage(&r.r3.shadow, &[r.r2.shadow.clone()], &[r.i1.clone()])
        .unwrap();
    assert_eq!(lineage.rounds, vec![3, 2]);
}

#[test]
fn wrong_chain_order_is_false() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();

    assert!(!tracker
        .check_verified_proof(&r.r2.shadow, &[r.r3.shadow.clone()], &[r.i1.clone()])
        .unwrap());
    assert!(matches!(
        tracker.trace_lineage(&r.r3.shadow, &[r.r3.shadow.clone()], &[r.i1.clone()]),
        Err(TrackError::Inconsistent { depth: 1 })
    ));
}

#[test]
fn unknown_shadow_is_not_found() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    assert!(matches!(
        tracker.check_verified_proof(&r.r3.shadow, &[], &[r.i1.clone()]),
        Err(TrackError::NotFound)
    ));
}

#[test]
fn unregistered_link_is_false_not_error() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();
    register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();

    // Round 2 was never registered, so its shadow cannot serve as a link.
    assert!(!tracker
        .check_verified_proof(&r.r3.shadow, &[r.r2.shadow.clone()], &[r.i1.clone()])
        .unwrap());
    // Nor is its instance a trusted leaf.
    assert!(matches!(
        tracker.trace_lineage(&r.r3.shadow, &[], &[r.r2.instance.clone()]),
        Err(TrackError::UntrustedLeaf { index: 0 })
    ));
}

#[test]
fn unseeded_leaf_is_false() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    assert!(!tracker
        .check_verified_proof(&r.r2.shadow, &[], &[r.i1.clone()])
        .unwrap());

    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();
    assert!(tracker
        .check_verified_proof(&r.r2.shadow, &[], &[r.i1.clone()])
        .unwrap());
}

// ── Registration ──

#[test]
fn registration_is_idempotent() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    let before = tracker.entry(&r.r2.shadow).unwrap();
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.entry(&r.r2.shadow).unwrap(), before);
}

#[test]
fn failed_verification_leaves_no_entry() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);

    let mut proof = r.r2.proof.clone();
    proof.0.pop();
    let err = tracker
        .register_proofs(&proof, &r.r2.shadow, &r.r2.aux, &[r.i1.clone()])
        .unwrap_err();
    assert!(matches!(err, TrackError::Verify(VerifyError::Shape(_))));

    // Claiming a different child set than the proof was made for.
    let other = Instance::new(vec![Fr::from(3u64)]);
    assert!(tracker
        .register_proofs(&r.r2.proof, &r.r2.shadow, &r.r2.aux, &[other])
        .is_err());

    assert!(tracker.is_empty());
    assert!(!tracker.is_registered(&r.r2.shadow));
}

#[test]
fn no_forgery_without_registration() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();

    // A fresh shadow never registered: every query shape fails.
    let forged = r.prover.random_shadow(&mut StdRng::seed_from_u64(1));
    assert!(tracker.check_verified_proof(&forged, &[], &[r.i1.clone()]).is_err());
    assert!(!tracker
        .check_verified_proof(&r.r2.shadow, &[forged.clone()], &[r.i1.clone()])
        .unwrap());
    assert!(!tracker.is_registered(&forged));
}

// ── Seeding ──

#[test]
fn seeding_is_admin_only() {
    let r = rounds();
    let tracker = ProofTracker::new(r.verifier.clone(), ADMIN);
    assert!(matches!(
        tracker.set_round1_verifier_instances("mallory", &[r.i1.clone()]),
        Err(TrackError::Unauthorized)
    ));
    assert!(!tracker.is_seeded(&r.i1));

    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone(), r.i1.clone()])
        .unwrap();
    assert!(tracker.is_seeded(&r.i1));
}

// ── Persistence ──

#[test]
fn registry_survives_reopen() {
    let r = rounds();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("registry.db");

    {
        let tracker = ProofTracker::create(r.verifier.clone(), ADMIN, &path).unwrap();
        tracker
            .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
            .unwrap();
        register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
        register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();
    }

    let tracker = ProofTracker::open(r.verifier.clone(), &path).unwrap();
    assert_eq!(tracker.admin(), ADMIN);
    assert_eq!(tracker.len(), 2);
    assert!(tracker.is_seeded(&r.i1));
    assert_eq!(tracker.round(&r.r3.shadow), Some(3));
    assert!(tracker
        .check_verified_proof(&r.r3.shadow, &[r.r2.shadow.clone()], &[r.i1.clone()])
        .unwrap());
    // Re-registering after reload is still a no-op.
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    assert_eq!(tracker.len(), 2);
}

#[test]
fn anyone_registers_and_checks_on_opened_store() {
    let r = rounds();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("registry.db");
    ProofTracker::create(r.verifier.clone(), ADMIN, &path)
        .unwrap()
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();

    let tracker = ProofTracker::open(r.verifier.clone(), &path).unwrap();
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();
    register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();
    assert!(tracker
        .check_verified_proof(&r.r3.shadow, &[r.r2.shadow.clone()], &[r.i1.clone()])
        .unwrap());

    let leaf = Instance::new(vec![Fr::from(7u64)]);
    assert!(matches!(
        tracker.set_round1_verifier_instances("alice", &[leaf.clone()]),
        Err(TrackError::Unauthorized)
    ));
    assert!(!tracker.is_seeded(&leaf));
}

#[test]
fn store_is_bound_to_config_and_admin() {
    let r = rounds();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("registry.db");

    assert!(matches!(
        ProofTracker::open(r.verifier.clone(), &path),
        Err(TrackError::Uninitialized)
    ));
    drop(ProofTracker::create(r.verifier.clone(), ADMIN, &path).unwrap());
    assert!(ProofTracker::create(r.verifier.clone(), ADMIN, &path).is_ok());
    assert!(matches!(
        ProofTracker::create(r.verifier.clone(), "mallory", &path),
        Err(TrackError::Unauthorized)
    ));

    let other = SampleProver::setup(3, 1, 2, 2, &mut StdRng::seed_from_u64(8))
        .unwrap()
        .verifier()
        .unwrap();
    assert!(matches!(
        ProofTracker::open(other, &path),
        Err(TrackError::ConfigMismatch { .. })
    ));
}

#[test]
fn second_handle_keeps_the_stored_entry() {
    let r = rounds();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("registry.db");
    let first = ProofTracker::create(r.verifier.clone(), ADMIN, &path).unwrap();
    let second = ProofTracker::open(r.verifier.clone(), &path).unwrap();

    register(&first, &r.r2, &[r.i1.clone()]).unwrap();

    // Same shadow proven for another child set through the stale handle.
    let other = Instance::new(vec![Fr::from(3u64)]);
    let instance = r.verifier.instance_for(&r.r2.shadow, &[other.clone()]);
    let (proof, aux) = r.prover.prove(&instance, &r.r2.shadow, &mut test_rng()).unwrap();
    second
        .register_proofs(&proof, &r.r2.shadow, &aux, &[other])
        .unwrap();

    assert_eq!(second.entry(&r.r2.shadow), first.entry(&r.r2.shadow));
    assert_eq!(second.entry(&r.r2.shadow).unwrap().targets, vec![r.i1.clone()]);
}

// ── Concurrency ──

#[test]
fn concurrent_registration_has_one_entry() {
    let r = rounds();
    let tracker = Arc::new(ProofTracker::new(r.verifier.clone(), ADMIN));
    let round = Arc::new(r.r2);
    let targets = vec![r.i1.clone()];

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            let round = Arc::clone(&round);
            let targets = targets.clone();
            thread::spawn(move || {
                tracker
                    .register_proofs(&round.proof, &round.shadow, &round.aux, &targets)
                    .unwrap()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), round.shadow);
    }
    assert_eq!(tracker.len(), 1);
}

#[test]
fn concurrent_reads_during_registration() {
    let r = rounds();
    let tracker = Arc::new(ProofTracker::new(r.verifier.clone(), ADMIN));
    tracker
        .set_round1_verifier_instances(ADMIN, &[r.i1.clone()])
        .unwrap();
    register(&tracker, &r.r2, &[r.i1.clone()]).unwrap();

    let reader = {
        let tracker = Arc::clone(&tracker);
        let shadow = r.r2.shadow.clone();
        let leaf = r.i1.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                assert!(tracker.check_verified_proof(&shadow, &[], &[leaf.clone()]).unwrap());
            }
        })
    };
    register(&tracker, &r.r3, &[r.r2.instance.clone()]).unwrap();
    reader.join().unwrap();
    assert_eq!(tracker.len(), 2);
}
