use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use tracing::info;

use crate::db::HistorySummary;
use crate::error::ApiErrorResponse;
use crate::types::caption::HistoryDetailResponse;
use crate::{PicturaError, router::PicturaState};

/// GET /histories/ -> every record without its image bytes.
pub async fn list_histories(
    State(state): State<PicturaState>,
) -> Result<Json<Vec<HistorySummary>>, PicturaError> {
    let rows = state
        .store
        .read_only(|session| session.list_all().boxed())
        .await?;

    info!(count = rows.len(), "history listed");
    Ok(Json(rows))
}

/// GET /histories/{id} -> one record with its image, or 404.
pub async fn get_history(
    State(state): State<PicturaState>,
    Path(id): Path<i64>,
) -> Result<Response, PicturaError> {
    let record = state
        .store
        .read_only(|session| session.get_by_id(id).boxed())
        .await?;

    Ok(match record {
        Some(record) => Json(HistoryDetailResponse::from(record)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiErrorResponse {
                error: format!("history record {id} not found"),
            }),
        )
            .into_response(),
    })
}
