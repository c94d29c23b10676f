// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Append-only SQLite store backing a [`crate::ProofTracker`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use agg_types::{Instance, ShadowInstance};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::TrackError;
use crate::types::RegistryEntry;

pub struct Db {
    conn: Mutex<Connection>,
}

/// Identity the store was created for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreMeta {
    pub admin: String,
    pub config_id: String,
}

type EntryRow = (Vec<u8>, Vec<u8>, String);

fn entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn decode_entry((shadow, instance, targets): EntryRow) -> Result<RegistryEntry, TrackError> {
    Ok(RegistryEntry {
        shadow: ShadowInstance::from_bytes(&shadow)?,
        instance: Instance::from_bytes(&instance)?,
        targets: serde_json::from_str(&targets)?,
    })
}

impl Db {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                admin TEXT NOT NULL,
                config_id TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                shadow BLOB NOT NULL UNIQUE,
                instance BLOB NOT NULL,
                targets TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS seeds (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                instance BLOB NOT NULL UNIQUE
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load_meta(&self) -> rusqlite::Result<Option<StoreMeta>> {
        self.conn()
            .query_row("SELECT admin, config_id FROM meta WHERE id = 1", [], |row| {
                Ok(StoreMeta {
                    admin: row.get(0)?,
                    config_id: row.get(1)?,
                })
            })
            .optional()
    }

    pub fn save_meta(&self, meta: &StoreMeta) -> rusqlite::Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO meta (id, admin, config_id) VALUES (1, ?1, ?2)",
            params![meta.admin, meta.config_id],
        )?;
        Ok(())
    }

    /// Returns false when the shadow instance was already stored.
    pub fn insert_entry(&self, entry: &RegistryEntry) -> Result<bool, TrackError> {
        let targets = serde_json::to_string(&entry.targets)?;
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO entries (shadow, instance, targets) VALUES (?1, ?2, ?3)",
            params![entry.shadow.to_bytes(), entry.instance.to_bytes(), targets],
        )?;
        Ok(changed > 0)
    }

    pub fn load_entry(&self, shadow: &ShadowInstance) -> Result<Option<RegistryEntry>, TrackError> {
        let row = self
            .conn()
            .query_row(
                "SELECT shadow, instance, targets FROM entries WHERE shadow = ?1",
                params![shadow.to_bytes()],
                entry_row,
            )
            .optional()?;
        row.map(decode_entry).transpose()
    }

    /// Entries in registration order.
    pub fn load_entries(&self) -> Result<Vec<RegistryEntry>, TrackError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT shadow, instance, targets FROM entries ORDER BY seq")?;
        let rows = stmt
            .query_map([], entry_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(decode_entry).collect()
    }

    pub fn insert_seed(&self, instance: &Instance) -> rusqlite::Result<bool> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO seeds (instance) VALUES (?1)",
            params![instance.to_bytes()],
        )?;
        Ok(changed > 0)
    }

    pub fn load_seeds(&self) -> Result<Vec<Instance>, TrackError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT instance FROM seeds ORDER BY seq")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Vec<u8>>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.iter()
            .map(|bytes| Instance::from_bytes(bytes).map_err(TrackError::from))
            .collect()
    }
}
