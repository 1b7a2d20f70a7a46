//! Inventory history endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use common::Diameter;
use domain::{DomainError, HistoryFilter, InventoryTransaction, TransactionKind};
use record_store::RecordStore;
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub diameter: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl HistoryQuery {
    fn into_filter(self) -> Result<HistoryFilter, ApiError> {
        let mut filter = HistoryFilter::new();
        if let Some(mm) = self.diameter {
            filter = filter.diameter(Diameter::from_mm(mm)?);
        }
        if let Some(kind) = self.kind.filter(|k| !k.is_empty() && k != "all") {
            let kind: TransactionKind = kind.parse().map_err(DomainError::from)?;
            filter = filter.kind(kind);
        }
        Ok(filter)
    }
}

/// GET /history?diameter=&type=
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<InventoryTransaction>>, ApiError> {
    let Query(query) = query?;
    let lines = state.inventory.history(query.into_filter()?).await?;
    Ok(Json(lines))
}
