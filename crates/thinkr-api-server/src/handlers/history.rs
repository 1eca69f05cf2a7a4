use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::history::{FileHistoryStore, HistoryEntry};
use crate::models::chat::StatusResponse;

pub async fn get_history_handler(
    State(history): State<Arc<FileHistoryStore>>,
) -> Json<Vec<HistoryEntry>> {
    Json(history.read_all().await)
}

pub async fn delete_history_handler(
    State(history): State<Arc<FileHistoryStore>>,
) -> Json<StatusResponse> {
    history.clear().await;
    info!("History deleted");

    Json(StatusResponse {
        status: "success".to_string(),
    })
}
