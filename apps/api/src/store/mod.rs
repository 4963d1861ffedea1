//! Result persistence. Append-only: each save inserts the next version for its
//! `(user_id, task kind)` pair and existing rows are never updated.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::result::StoredResult;
use crate::orchestrator::{ResultSource, TaskKind};

/// Everything needed to persist one finished call.
pub struct NewResult<'a> {
    pub user_id: &'a str,
    pub kind: TaskKind,
    pub payload: &'a Value,
    pub result: &'a Value,
    pub source: &'a ResultSource,
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, new: NewResult<'_>) -> Result<StoredResult>;

    async fn latest(&self, user_id: &str, kind: TaskKind) -> Result<Option<StoredResult>>;

    /// Every stored version, oldest first.
    async fn history(&self, user_id: &str, kind: TaskKind) -> Result<Vec<StoredResult>>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_next_version(&self, new: &NewResult<'_>) -> Result<StoredResult, sqlx::Error> {
        // next version and INSERT in one statement; UNIQUE(user_id, task_kind, version)
        // rejects a concurrent writer that computed the same version
        sqlx::query_as::<_, StoredResult>(
            r#"
            INSERT INTO career_results
                (id, user_id, task_kind, version, payload, result, source, model)
            SELECT $1, $2, $3, COALESCE(MAX(version), 0) + 1, $4, $5, $6, $7
            FROM career_results
            WHERE user_id = $2 AND task_kind = $3
            RETURNING id, user_id, task_kind, version, payload, result, source, model, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.kind.as_str())
        .bind(new.payload)
        .bind(new.result)
        .bind(new.source.label())
        .bind(new.source.model())
        .fetch_one(&self.pool)
        .await
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn save(&self, new: NewResult<'_>) -> Result<StoredResult> {
        let row = match self.insert_next_version(&new).await {
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                warn!(
                    user_id = %new.user_id,
                    task = %new.kind,
                    "version taken by a concurrent save, retrying"
                );
                self.insert_next_version(&new).await
            }
            other => other,
        }
        .with_context(|| format!("saving {} result for user {}", new.kind, new.user_id))?;

        info!(
            user_id = %row.user_id,
            task = %row.task_kind,
            version = row.version,
            "result saved"
        );
        Ok(row)
    }

    async fn latest(&self, user_id: &str, kind: TaskKind) -> Result<Option<StoredResult>> {
        let row = sqlx::query_as::<_, StoredResult>(
            r#"
            SELECT id, user_id, task_kind, version, payload, result, source, model, created_at
            FROM career_results
            WHERE user_id = $1 AND task_kind = $2
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn history(&self, user_id: &str, kind: TaskKind) -> Result<Vec<StoredResult>> {
        let rows = sqlx::query_as::<_, StoredResult>(
            r#"
            SELECT id, user_id, task_kind, version, payload, result, source, model, created_at
            FROM career_results
            WHERE user_id = $1 AND task_kind = $2
            ORDER BY version ASC
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store used when no database is configured. Lost on restart.
#[derive(Default)]
pub struct MemoryResultStore {
    rows: RwLock<HashMap<(String, TaskKind), Vec<StoredResult>>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn save(&self, new: NewResult<'_>) -> Result<StoredResult> {
        let mut rows = self.rows.write().await;
        let versions = rows
            .entry((new.user_id.to_string(), new.kind))
            .or_default();
        let row = StoredResult {
            id: Uuid::new_v4(),
            user_id: new.user_id.to_string(),
            task_kind: new.kind.as_str().to_string(),
            version: versions.last().map_or(1, |r| r.version + 1),
            payload: new.payload.clone(),
            result: new.result.clone(),
            source: new.source.label().to_string(),
            model: new.source.model().map(String::from),
            created_at: Utc::now(),
        };
        versions.push(row.clone());
        Ok(row)
    }

    async fn latest(&self, user_id: &str, kind: TaskKind) -> Result<Option<StoredResult>> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&(user_id.to_string(), kind))
            .and_then(|versions| versions.last().cloned()))
    }

    async fn history(&self, user_id: &str, kind: TaskKind) -> Result<Vec<StoredResult>> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&(user_id.to_string(), kind))
            .cloned()
            .unwrap_or_default())
    }
}
