use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted task result. Rows are append-only; `version` counts saves per
/// `(user_id, task_kind)` starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub id: Uuid,
    pub user_id: String,
    pub task_kind: String,
    pub version: i32,
    pub payload: Value,
    pub result: Value,
    /// "model" or "fallback".
    pub source: String,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}
