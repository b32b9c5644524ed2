use crate::db::HistoryRecord;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

/// Body of `POST /generate_caption/`.
#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub description: String,
}

/// Body of `POST /generate_caption_with_history/`.
#[derive(Debug, Serialize)]
pub struct CaptionWithHistoryResponse {
    pub id: i64,
    pub description: String,
}

/// Full record as returned by `GET /histories/{id}`, image bytes base64-encoded.
#[derive(Debug, Serialize)]
pub struct HistoryDetailResponse {
    pub id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub image_data: String,
}

impl From<HistoryRecord> for HistoryDetailResponse {
    fn from(r: HistoryRecord) -> Self {
        Self {
            id: r.id,
            description: r.description,
            created_at: r.created_at,
            image_data: base64::engine::general_purpose::STANDARD.encode(&r.image_data),
        }
    }
}
