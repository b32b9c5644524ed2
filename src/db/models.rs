use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A persisted caption request. Rows are only ever inserted and read.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HistoryRecord {
    pub id: i64,
    pub image_data: Vec<u8>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied columns for a new row; `id` and `created_at` come from storage.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub image_data: Vec<u8>,
    pub description: String,
}

/// Listing projection. Image bytes are never selected.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct HistorySummary {
    pub id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<HistoryRecord> for HistorySummary {
    fn from(r: HistoryRecord) -> Self {
        Self {
            id: r.id,
            description: r.description,
            created_at: r.created_at,
        }
    }
}
