// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use agg_types::{AuxData, Instance, ProofTranscript, ShadowInstance};
use agg_verifier::AggregateVerifier;
use tracing::{debug, info, warn};

use crate::db::{Db, StoreMeta};
use crate::error::TrackError;
use crate::types::{Lineage, RegistryEntry};

#[derive(Default)]
struct Registry {
    entries: HashMap<ShadowInstance, RegistryEntry>,
    /// Aggregate instance -> first entry that carries it.
    by_instance: HashMap<Instance, ShadowInstance>,
    seeds: HashSet<Instance>,
}

impl Registry {
    fn insert(&mut self, entry: RegistryEntry) {
        self.by_instance
            .entry(entry.instance.clone())
            .or_insert_with(|| entry.shadow.clone());
        self.entries.insert(entry.shadow.clone(), entry);
    }

    fn carrier(&self, instance: &Instance) -> Option<&RegistryEntry> {
        self.by_instance
            .get(instance)
            .and_then(|shadow| self.entries.get(shadow))
    }

    /// Rounds are derived from the current entries, so an entry registered
    /// before its targets' entries still reports its final round.
    fn round(&self, entry: &RegistryEntry) -> u32 {
        self.round_in(entry, &mut HashMap::new(), self.entries.len())
    }

    fn round_in<'a>(
        &'a self,
        entry: &'a RegistryEntry,
        memo: &mut HashMap<&'a Instance, u32>,
        budget: usize,
    ) -> u32 {
        1 + entry
            .targets
            .iter()
            .map(|t| self.level_in(t, memo, budget))
            .max()
            .unwrap_or(1)
    }

    /// Round of the proof that produced `instance`; seeds and unknown leaves
    /// are round 1. `budget` bounds the descent by the number of entries.
    fn level_in<'a>(
        &'a self,
        instance: &'a Instance,
        memo: &mut HashMap<&'a Instance, u32>,
        budget: usize,
    ) -> u32 {
        if let Some(level) = memo.get(instance) {
            return *level;
        }
        let level = match self.carrier(instance) {
            Some(entry) if budget > 0 => self.round_in(entry, memo, budget - 1),
            _ => 1,
        };
        memo.insert(instance, level);
        level
    }

    fn is_trusted(&self, instance: &Instance) -> bool {
        self.seeds.contains(instance) || self.by_instance.contains_key(instance)
    }

    fn trace(
        &self,
        shadow: &ShadowInstance,
        chain: &[ShadowInstance],
        targets: &[Instance],
    ) -> Result<Lineage, TrackError> {
        let mut current = self.entries.get(shadow).ok_or(TrackError::NotFound)?;
        let mut memo = HashMap::new();
        let budget = self.entries.len();
        let mut rounds = vec![self.round_in(current, &mut memo, budget)];

        for (i, link) in chain.iter().enumerate() {
            let depth = i + 1;
            let next = self
                .entries
                .get(link)
                .ok_or(TrackError::Inconsistent { depth })?;
            if !current.targets.contains(&next.instance) {
                return Err(TrackError::Inconsistent { depth });
            }
            rounds.push(self.round_in(next, &mut memo, budget));
            current = next;
        }

        let leaf_depth = chain.len() + 1;
        if targets.is_empty() || targets.iter().any(|t| !current.targets.contains(t)) {
            return Err(TrackError::Inconsistent { depth: leaf_depth });
        }
        if let Some(index) = targets.iter().position(|t| !self.is_trusted(t)) {
            return Err(TrackError::UntrustedLeaf { index });
        }
        Ok(Lineage { rounds })
    }
}

/// Registry of verified aggregate proofs.
///
/// Registration verifies outside the lock and then inserts if absent under
/// the write lock; lineage queries hold the read lock for the whole walk.
/// Only seeding checks the caller against the admin.
pub struct ProofTracker {
    verifier: AggregateVerifier,
    admin: String,
    registry: RwLock<Registry>,
    db: Option<Db>,
}

impl ProofTracker {
    /// In-memory registry administered by `admin`.
    pub fn new(verifier: AggregateVerifier, admin: impl Into<String>) -> Self {
        Self {
            verifier,
            admin: admin.into(),
            registry: RwLock::new(Registry::default()),
            db: None,
        }
    }

    /// Initialize a persisted registry at `path` administered by `admin`.
    ///
    /// Creating an existing store again is allowed only with the same admin
    /// and configuration.
    pub fn create(
        verifier: AggregateVerifier,
        admin: impl Into<String>,
        path: &Path,
    ) -> Result<Self, TrackError> {
        let admin = admin.into();
        let db = Db::open(path)?;
        let loaded = verifier.config().config_id_hex();

        match db.load_meta()? {
            Some(meta) => {
                check_config(&meta, &loaded)?;
                if meta.admin != admin {
                    warn!(path = %path.display(), "store already has another admin");
                    return Err(TrackError::Unauthorized);
                }
            }
            None => {
                db.save_meta(&StoreMeta {
                    admin: admin.clone(),
                    config_id: loaded,
                })?;
                info!(path = %path.display(), admin = %admin, "registry store created");
            }
        }
        Self::load(verifier, admin, db, path)
    }

    /// Open a registry created with [`Self::create`]. The admin is the one
    /// recorded in the store; anyone may open it to register and query.
    pub fn open(verifier: AggregateVerifier, path: &Path) -> Result<Self, TrackError> {
        if !path.exists() {
            return Err(TrackError::Uninitialized);
        }
        let db = Db::open(path)?;
        let meta = db.load_meta()?.ok_or(TrackError::Uninitialized)?;
        check_config(&meta, &verifier.config().config_id_hex())?;
        Self::load(verifier, meta.admin, db, path)
    }

    fn load(
        verifier: AggregateVerifier,
        admin: String,
        db: Db,
        path: &Path,
    ) -> Result<Self, TrackError> {
        let mut registry = Registry::default();
        registry.seeds.extend(db.load_seeds()?);
        for entry in db.load_entries()? {
            registry.insert(entry);
        }
        info!(
            path = %path.display(),
            entries = registry.entries.len(),
            seeds = registry.seeds.len(),
            "registry loaded"
        );

        Ok(Self {
            verifier,
            admin,
            registry: RwLock::new(registry),
            db: Some(db),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn verifier(&self) -> &AggregateVerifier {
        &self.verifier
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    /// Verify an aggregate proof and record its shadow instance.
    ///
    /// Registering an already-registered shadow instance is a no-op that
    /// returns the same handle. Failed verifications leave no trace.
    pub fn register_proofs(
        &self,
        proof: &ProofTranscript,
        shadow: &ShadowInstance,
        aux: &AuxData,
        targets: &[Instance],
    ) -> Result<ShadowInstance, TrackError> {
        let instance = self.verifier.instance_for(shadow, targets);
        self.verifier.verify(proof, &instance, shadow, aux, targets)?;

        let mut registry = self.write();
        if registry.entries.contains_key(shadow) {
            debug!(shadow = %shadow.short_id(), "already registered");
            return Ok(shadow.clone());
        }

        let mut entry = RegistryEntry {
            shadow: shadow.clone(),
            instance,
            targets: targets.to_vec(),
        };
        if let Some(db) = &self.db {
            if !db.insert_entry(&entry)? {
                // Stored through another handle on the same file; that row wins.
                debug!(shadow = %shadow.short_id(), "already stored, reloading");
                if let Some(stored) = db.load_entry(shadow)? {
                    entry = stored;
                }
            }
        }
        registry.insert(entry);
        let round = registry.entries.get(shadow).map_or(1, |e| registry.round(e));
        info!(shadow = %shadow.short_id(), round, targets = targets.len(), "proof registered");
        Ok(shadow.clone())
    }

    /// True when `shadow` reaches every claimed leaf in `targets` through
    /// the verified entries named by `chain`, top first.
    ///
    /// Only an unregistered top-level shadow is an error; a missing or
    /// mismatched link is `Ok(false)`.
    pub fn check_verified_proof(
        &self,
        shadow: &ShadowInstance,
        chain: &[ShadowInstance],
        targets: &[Instance],
    ) -> Result<bool, TrackError> {
        match self.trace_lineage(shadow, chain, targets) {
            Ok(_) => Ok(true),
            Err(TrackError::NotFound) => Err(TrackError::NotFound),
            Err(e) => {
                debug!(shadow = %shadow.short_id(), reason = %e, "lineage rejected");
                Ok(false)
            }
        }
    }

    /// Like [`Self::check_verified_proof`], with the reason a lineage is rejected.
    pub fn trace_lineage(
        &self,
        shadow: &ShadowInstance,
        chain: &[ShadowInstance],
        targets: &[Instance],
    ) -> Result<Lineage, TrackError> {
        self.read().trace(shadow, chain, targets)
    }

    /// Seed trusted round-1 instances. Admin only; seeds are never removed.
    pub fn set_round1_verifier_instances(
        &self,
        caller: &str,
        instances: &[Instance],
    ) -> Result<(), TrackError> {
        if caller != self.admin {
            warn!(caller, "unauthorized seeding attempt");
            return Err(TrackError::Unauthorized);
        }

        let mut registry = self.write();
        let mut added = 0;
        for instance in instances {
            if registry.seeds.contains(instance) {
                continue;
            }
            if let Some(db) = &self.db {
                db.insert_seed(instance)?;
            }
            registry.seeds.insert(instance.clone());
            added += 1;
        }
        info!(added, total = registry.seeds.len(), "round-1 instances seeded");
        Ok(())
    }

    pub fn is_registered(&self, shadow: &ShadowInstance) -> bool {
        self.read().entries.contains_key(shadow)
    }

    pub fn entry(&self, shadow: &ShadowInstance) -> Option<RegistryEntry> {
        self.read().entries.get(shadow).cloned()
    }

    /// Current round of a registered shadow instance.
    pub fn round(&self, shadow: &ShadowInstance) -> Option<u32> {
        let registry = self.read();
        registry.entries.get(shadow).map(|e| registry.round(e))
    }

    pub fn is_seeded(&self, instance: &Instance) -> bool {
        self.read().seeds.contains(instance)
    }

    /// Registered entries.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_config(meta: &StoreMeta, loaded: &str) -> Result<(), TrackError> {
    if meta.config_id != loaded {
        return Err(TrackError::ConfigMismatch {
            stored: meta.config_id.clone(),
            loaded: loaded.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn inst(v: u64) -> Instance {
        Instance::new(vec![Fr::from(v)])
    }

    fn shadow(v: u64) -> ShadowInstance {
        ShadowInstance::new(vec![Fr::from(v).into(); 4])
    }

    fn entry(s: u64, instance: u64, targets: &[u64]) -> RegistryEntry {
        RegistryEntry {
            shadow: shadow(s),
            instance: inst(instance),
            targets: targets.iter().map(|t| inst(*t)).collect(),
        }
    }

    fn level(r: &Registry, instance: &Instance) -> u32 {
        r.level_in(instance, &mut HashMap::new(), r.entries.len())
    }

    fn registry() -> Registry {
        // seed 1; S2 -> [1] carries 20; S3 -> [20, 5] carries 30
        let mut r = Registry::default();
        r.seeds.insert(inst(1));
        r.insert(entry(2, 20, &[1]));
        r.insert(entry(3, 30, &[20, 5]));
        r
    }

    #[test]
    fn levels_follow_registered_instances() {
        let r = registry();
        assert_eq!(level(&r, &inst(1)), 1);
        assert_eq!(level(&r, &inst(20)), 2);
        assert_eq!(level(&r, &inst(30)), 3);
        assert_eq!(level(&r, &inst(99)), 1);
    }

    #[test]
    fn rounds_follow_late_registrations() {
        let mut r = Registry::default();
        r.insert(entry(3, 30, &[20]));
        assert_eq!(level(&r, &inst(30)), 2);

        r.insert(entry(2, 20, &[1]));
        assert_eq!(level(&r, &inst(30)), 3);
        assert_eq!(r.round(&entry(3, 30, &[20])), 3);
        assert_eq!(
            r.trace(&shadow(3), &[shadow(2)], &[inst(1)]).unwrap().rounds,
            vec![3, 2]
        );
    }

    #[test]
    fn trace_reports_depth_of_broken_link() {
        let r = registry();
        assert_eq!(
            r.trace(&shadow(3), &[shadow(2)], &[inst(1)]).unwrap().rounds,
            vec![3, 2]
        );
        assert!(matches!(
            r.trace(&shadow(3), &[shadow(3)], &[inst(1)]),
            Err(TrackError::Inconsistent { depth: 1 })
        ));
        assert!(matches!(
            r.trace(&shadow(3), &[shadow(7)], &[inst(1)]),
            Err(TrackError::Inconsistent { depth: 1 })
        ));
        assert!(matches!(
            r.trace(&shadow(3), &[], &[inst(1)]),
            Err(TrackError::Inconsistent { depth: 1 })
        ));
        assert!(matches!(
            r.trace(&shadow(3), &[shadow(2)], &[]),
            Err(TrackError::Inconsistent { depth: 2 })
        ));
        assert!(matches!(r.trace(&shadow(9), &[], &[inst(1)]), Err(TrackError::NotFound)));
    }

    #[test]
    fn unseeded_leaf_is_untrusted() {
        let r = registry();
        assert!(r.trace(&shadow(3), &[], &[inst(20)]).is_ok());
        assert!(matches!(
            r.trace(&shadow(3), &[], &[inst(20), inst(5)]),
            Err(TrackError::UntrustedLeaf { index: 1 })
        ));
    }
}
