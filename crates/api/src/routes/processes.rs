//! Process lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{
    FinalizeProcess, FinishedGood, LeftoverMaterial, NewProcess, NonConformingItem, Process,
    ProcessOutputs, ProcessStatus, ProcessSummary, Reconciliation, RejectedItem, WeightLossItem,
};
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<ProcessStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    #[serde(flatten)]
    pub outputs: ProcessOutputs,
    #[serde(default, alias = "addRemainingToStock")]
    pub add_leftover_to_stock: bool,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub process: Process,
    pub reconciliation: Reconciliation,
    pub summary: ProcessSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_good: Option<FinishedGood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_conforming: Option<NonConformingItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<RejectedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_loss: Option<WeightLossItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leftover: Option<LeftoverMaterial>,
}

// -- Handlers --

/// POST /processes: reserve stock and start a process.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<NewProcess>, JsonRejection>,
) -> Result<(StatusCode, Json<Process>), ApiError> {
    let Json(input) = body?;
    let process = state.inventory.create_process(input).await?;
    Ok((StatusCode::CREATED, Json(process)))
}

/// GET /processes?status=
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Process>>, ApiError> {
    let Query(query) = query?;
    let processes = match query.status {
        Some(ProcessStatus::InProgress) => state.inventory.in_progress_processes().await?,
        Some(status) => state
            .inventory
            .list_processes()
            .await?
            .into_iter()
            .filter(|p| p.status == status)
            .collect(),
        None => state.inventory.list_processes().await?,
    };
    Ok(Json(processes))
}

/// GET /processes/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Process>, ApiError> {
    Ok(Json(state.inventory.get_process(&id).await?))
}

/// POST /processes/{id}/preview: reconcile outputs without writing.
#[tracing::instrument(skip(state, body))]
pub async fn preview<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    body: Result<Json<ProcessOutputs>, JsonRejection>,
) -> Result<Json<Reconciliation>, ApiError> {
    let Json(outputs) = body?;
    Ok(Json(state.inventory.preview(&id, &outputs).await?))
}

/// POST /processes/{id}/finalize: record outputs and complete the process.
#[tracing::instrument(skip(state, body))]
pub async fn finalize<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    body: Result<Json<FinalizeRequest>, JsonRejection>,
) -> Result<Json<FinalizeResponse>, ApiError> {
    let Json(req) = body?;
    let cmd = FinalizeProcess::new(id, req.outputs).add_leftover_to_stock(req.add_leftover_to_stock);
    let outcome = state.inventory.finalize(cmd).await?;
    let records = outcome.records;

    Ok(Json(FinalizeResponse {
        process: outcome.process,
        reconciliation: outcome.reconciliation,
        summary: records.summary,
        finished_good: records.finished_good,
        non_conforming: records.non_conforming,
        rejected: records.rejected,
        weight_loss: records.weight_loss,
        leftover: records.leftover,
    }))
}
