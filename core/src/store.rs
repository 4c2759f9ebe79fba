//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches the store; callers persist inputs and
//! record finished evaluations through these methods.

use crate::{
    config::ScenarioSet,
    error::{ModelError, ModelResult},
    merge::merge_over_default,
    metrics::ComputedMetrics,
    types::{RunId, ScenarioId},
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// Bump the suffix when a record changes shape incompatibly; old rows
// are then ignored instead of merged.
pub const GLOBAL_KEY: &str = "assumptions.global.v2";
pub const RULES_KEY: &str = "assumptions.rules.v3";
pub const HR_KEY: &str = "assumptions.hr.v1";
pub const SCENARIOS_KEY: &str = "scenarios.v1";
pub const TOGGLES_KEY: &str = "toggles.v1";

pub struct ModelStore {
    conn: Connection,
}

impl ModelStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> ModelResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ModelResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ModelResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_kv_cache.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_evaluation.sql"))?;
        Ok(())
    }

    // ── Key-value cache ────────────────────────────────────────

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> ModelResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO kv_cache (key, value_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json,
                                            updated_at = excluded.updated_at",
            params![key, json, now()],
        )?;
        Ok(())
    }

    pub fn get_raw(&self, key: &str) -> ModelResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value_json FROM kv_cache WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Persisted value deep-merged over `default`.
    ///
    /// Missing keys yield the default. A payload that no longer parses
    /// is logged and replaced by the default; it is not an error.
    pub fn load_or_default<T>(&self, key: &str, default: &T) -> ModelResult<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let Some(persisted) = self.get_value(key)? else {
            return Ok(default.clone());
        };

        match merge_over_default(default, persisted) {
            Ok(merged) => Ok(merged),
            Err(e) => {
                log::warn!("Cache entry '{key}' does not fit current schema: {e}");
                Ok(default.clone())
            }
        }
    }

    /// Like `load_or_default`, but merges scenarios entry by entry so one
    /// undecodable scenario cannot take the rest of the set down with it.
    pub fn load_scenario_set(&self, key: &str, default: &ScenarioSet) -> ModelResult<ScenarioSet> {
        Ok(match self.get_value(key)? {
            Some(persisted) => default.merge_persisted(persisted),
            None => default.clone(),
        })
    }

    /// Stored JSON for `key`; an unparseable payload counts as absent.
    fn get_value(&self, key: &str) -> ModelResult<Option<Value>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                log::warn!("Discarding unparseable cache entry '{key}': {e}");
                Ok(None)
            }
        }
    }

    // ── Evaluations ────────────────────────────────────────────

    pub fn new_run_id() -> RunId {
        format!("eval-{}", uuid::Uuid::new_v4())
    }

    pub fn record_evaluation(
        &self,
        run_id: &str,
        metrics: &BTreeMap<ScenarioId, ComputedMetrics>,
    ) -> ModelResult<()> {
        let created_at = now();
        for (scenario_id, m) in metrics {
            self.conn.execute(
                "INSERT INTO evaluation (run_id, scenario_id, metrics_json, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![run_id, scenario_id, serde_json::to_string(m)?, created_at],
            )?;
        }
        Ok(())
    }

    pub fn evaluation(&self, run_id: &str) -> ModelResult<BTreeMap<ScenarioId, ComputedMetrics>> {
        let mut stmt = self.conn.prepare(
            "SELECT scenario_id, metrics_json FROM evaluation
             WHERE run_id = ?1 ORDER BY scenario_id ASC",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, json)| {
                let metrics: ComputedMetrics = serde_json::from_str(&json)?;
                Ok::<_, ModelError>((id, metrics))
            })
            .collect()
    }

    pub fn evaluation_count(&self) -> ModelResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(DISTINCT run_id) FROM evaluation",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
