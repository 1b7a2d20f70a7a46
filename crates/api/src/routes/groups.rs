//! Process group management.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{CreateGroup, ProcessGroup, UpdateGroup};
use record_store::RecordStore;
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub process_ids: Option<Vec<String>>,
}

/// GET /groups
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProcessGroup>>, ApiError> {
    Ok(Json(state.inventory.list_groups().await?))
}

/// POST /groups
#[tracing::instrument(skip(state, body))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<CreateGroup>, JsonRejection>,
) -> Result<(StatusCode, Json<ProcessGroup>), ApiError> {
    let Json(cmd) = body?;
    let group = state.inventory.create_group(cmd).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// PUT /groups/{id}: rename a group or replace its members.
#[tracing::instrument(skip(state, body))]
pub async fn update<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> Result<Json<ProcessGroup>, ApiError> {
    let Json(req) = body?;
    let mut cmd = UpdateGroup::new(id);
    if let Some(name) = req.name {
        cmd = cmd.name(name);
    }
    if let Some(ids) = req.process_ids {
        cmd = cmd.process_ids(ids);
    }
    Ok(Json(state.inventory.update_group(cmd).await?))
}

/// DELETE /groups/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.inventory.delete_group(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
