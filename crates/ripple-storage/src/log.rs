//! `DecisionLog` — single-owner SQLite connection behind a mutex.
//!
//! Writes are short and infrequent (one row per simulation), so one
//! connection suffices; callers in async contexts wrap calls in
//! `spawn_blocking`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Failure,
    Scaling,
}

impl DecisionKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Scaling => "scaling",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "failure" => Some(Self::Failure),
            "scaling" => Some(Self::Scaling),
            _ => None,
        }
    }
}

/// A decision to be recorded.
#[derive(Debug, Clone)]
pub struct NewDecision {
    pub kind: DecisionKind,
    pub target: String,
    pub confidence: String,
    pub summary: String,
    pub result_json: serde_json::Value,
}

/// A recorded decision, newest first from [`DecisionLog::recent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub id: i64,
    pub kind: DecisionKind,
    pub target: String,
    pub confidence: String,
    pub summary: String,
    pub result_json: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

pub struct DecisionLog {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl DecisionLog {
    /// Open a file-backed log, running migrations and enabling WAL.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let mut conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        schema::apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory log (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let mut conn = Connection::open_in_memory()?;
        schema::apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a decision; returns its row id.
    pub fn record(&self, decision: &NewDecision) -> Result<i64, StorageError> {
        let payload = serde_json::to_string(&decision.result_json)?;
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.execute(
            "INSERT INTO decisions (kind, target, confidence, summary, result_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                decision.kind.as_str(),
                decision.target,
                decision.confidence,
                decision.summary,
                payload,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The most recent decisions, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<DecisionRecord>, StorageError> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, kind, target, confidence, summary, result_json, created_at
             FROM decisions ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, kind, target, confidence, summary, payload, created_at) = row?;
            let Some(kind) = DecisionKind::parse(&kind) else {
                tracing::warn!(id, kind, "skipping decision row with unknown kind");
                continue;
            };
            records.push(DecisionRecord {
                id,
                kind,
                target,
                confidence,
                summary,
                result_json: serde_json::from_str(&payload)?,
                created_at: created_at
                    .parse::<DateTime<Utc>>()
                    .unwrap_or_else(|_| Utc::now()),
            });
        }
        Ok(records)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Sqlite {
        message: "decision log mutex poisoned".to_string(),
    }
}
