use axum::{Json, extract::State};
use futures::FutureExt;
use tracing::info;

use crate::db::NewHistoryRecord;
use crate::middleware::ImageUpload;
use crate::types::caption::{CaptionResponse, CaptionWithHistoryResponse, WelcomeResponse};
use crate::{PicturaError, router::PicturaState};

/// GET / -> liveness and welcome message.
pub async fn home() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the image captioning service!",
    })
}

/// POST /generate_caption/ -> caption only, nothing persisted.
pub async fn generate_caption(
    State(state): State<PicturaState>,
    upload: ImageUpload,
) -> Result<Json<CaptionResponse>, PicturaError> {
    info!(file = upload.display_name(), "caption requested");

    let description = state.captioner.generate(upload.bytes).await?;
    Ok(Json(CaptionResponse { description }))
}

/// POST /generate_caption_with_history/ -> caption, then persist image and caption.
///
/// Inference runs before a session is opened so no pooled connection is held
/// while the model works.
pub async fn generate_caption_with_history(
    State(state): State<PicturaState>,
    upload: ImageUpload,
) -> Result<Json<CaptionWithHistoryResponse>, PicturaError> {
    info!(file = upload.display_name(), "caption with history requested");

    let description = state.captioner.generate(upload.bytes.clone()).await?;

    let input = NewHistoryRecord {
        image_data: upload.bytes.to_vec(),
        description,
    };
    let record = state
        .store
        .with_commit(|session| session.create(input).boxed())
        .await?;

    info!(id = record.id, "history record stored");
    Ok(Json(CaptionWithHistoryResponse {
        id: record.id,
        description: record.description,
    }))
}
