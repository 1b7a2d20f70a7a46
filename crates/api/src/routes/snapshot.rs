//! Whole-store export and import.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use domain::InventorySnapshot;
use record_store::RecordStore;
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ImportResponse {
    pub records: usize,
}

/// GET /export
#[tracing::instrument(skip(state))]
pub async fn export<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<InventorySnapshot>, ApiError> {
    Ok(Json(state.inventory.export().await?))
}

/// POST /import: replaces every collection, or nothing when the document is invalid.
#[tracing::instrument(skip(state, body))]
pub async fn import<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ImportResponse>, ApiError> {
    let Json(document) = body?;
    let records = state.inventory.import_json(document).await?;
    Ok(Json(ImportResponse { records }))
}
