//! Stock deposit, withdrawal and availability endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use common::{Diameter, Weight};
use domain::{DepositStock, InventoryTransaction, RodStockEntry, WithdrawStock};
use record_store::RecordStore;
use reporting::StockStats;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    /// Diameter in millimetres.
    pub diameter: f64,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositResponse {
    pub entry: RodStockEntry,
    pub transaction: InventoryTransaction,
    pub available_weight: Weight,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    pub transaction: InventoryTransaction,
    pub consumed_entries: Vec<String>,
    pub available_weight: Weight,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableResponse {
    pub diameter: Diameter,
    pub available_weight: Weight,
}

// -- Handlers --

/// POST /stock: add a batch of rods.
#[tracing::instrument(skip(state, body))]
pub async fn deposit<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<DepositStock>, JsonRejection>,
) -> Result<(StatusCode, Json<DepositResponse>), ApiError> {
    let Json(cmd) = body?;
    let outcome = state.inventory.deposit(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(DepositResponse {
            entry: outcome.entry,
            transaction: outcome.transaction,
            available_weight: outcome.available_weight,
        }),
    ))
}

/// POST /stock/withdrawals: take weight out of stock, oldest entries first.
#[tracing::instrument(skip(state, body))]
pub async fn withdraw<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<WithdrawStock>, JsonRejection>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    let Json(cmd) = body?;
    let outcome = state.inventory.withdraw(cmd).await?;

    Ok(Json(WithdrawResponse {
        transaction: outcome.transaction,
        consumed_entries: outcome.consumed_entries,
        available_weight: outcome.available_weight,
    }))
}

/// GET /stock: stock grouped by diameter.
#[tracing::instrument(skip(state))]
pub async fn stats<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<StockStats>, ApiError> {
    Ok(Json(state.reporter.stock_stats().await?))
}

/// GET /stock/available?diameter=
#[tracing::instrument(skip(state))]
pub async fn available<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<AvailableQuery>, QueryRejection>,
) -> Result<Json<AvailableResponse>, ApiError> {
    let Query(query) = query?;
    let diameter = Diameter::from_mm(query.diameter)?;
    let available_weight = state.inventory.available_weight(diameter).await?;

    Ok(Json(AvailableResponse {
        diameter,
        available_weight,
    }))
}
