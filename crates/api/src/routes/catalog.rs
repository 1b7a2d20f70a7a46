//! Rod and blade diameter catalogs.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use common::Diameter;
use record_store::RecordStore;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterDiameterRequest {
    pub diameter: Diameter,
}

#[derive(Serialize)]
pub struct RegisterDiameterResponse {
    pub diameter: Diameter,
    pub created: bool,
}

fn registered(diameter: Diameter, created: bool) -> (StatusCode, Json<RegisterDiameterResponse>) {
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(RegisterDiameterResponse { diameter, created }))
}

/// GET /diameters
#[tracing::instrument(skip(state))]
pub async fn list_diameters<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Diameter>>, ApiError> {
    Ok(Json(state.inventory.diameters().await?))
}

/// POST /diameters: registers a rod diameter. Known diameters answer 200.
#[tracing::instrument(skip(state, body))]
pub async fn register_diameter<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<RegisterDiameterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterDiameterResponse>), ApiError> {
    let Json(req) = body?;
    let created = state.inventory.register_diameter(req.diameter).await?;
    Ok(registered(req.diameter, created))
}

/// GET /blade-diameters
#[tracing::instrument(skip(state))]
pub async fn list_blade_diameters<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Diameter>>, ApiError> {
    Ok(Json(state.inventory.blade_diameters().await?))
}

/// POST /blade-diameters
#[tracing::instrument(skip(state, body))]
pub async fn register_blade_diameter<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<RegisterDiameterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterDiameterResponse>), ApiError> {
    let Json(req) = body?;
    let created = state
        .inventory
        .register_blade_diameter(req.diameter)
        .await?;
    Ok(registered(req.diameter, created))
}
