use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::HistoryStore;
use crate::handlers::caption::{generate_caption, generate_caption_with_history, home};
use crate::handlers::history::{get_history, list_histories};
use crate::service::CaptionService;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct PicturaState {
    pub captioner: CaptionService,
    pub store: HistoryStore,
}

impl PicturaState {
    pub fn new(captioner: CaptionService, store: HistoryStore) -> Self {
        Self { captioner, store }
    }
}

pub fn pictura_router(state: PicturaState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/generate_caption/", post(generate_caption))
        .route(
            "/generate_caption_with_history/",
            post(generate_caption_with_history),
        )
        .route("/histories/", get(list_histories))
        .route("/histories/{id}", get(get_history))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
