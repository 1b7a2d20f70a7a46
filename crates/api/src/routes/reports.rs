//! Fixed-schema reports.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use record_store::RecordStore;
use reporting::{Report, ReportFilter, ReportKind};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub process: Option<String>,
    pub group: Option<String>,
}

/// GET /reports
pub async fn kinds() -> Json<Vec<&'static str>> {
    Json(ReportKind::ALL.iter().map(ReportKind::as_str).collect())
}

/// GET /reports/{kind}?process=&group=
///
/// A process filter takes precedence over a group filter.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(kind): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Report>, ApiError> {
    let Query(query) = query?;
    let kind: ReportKind = kind.parse()?;
    let filter = ReportFilter::from_params(query.process, query.group);

    Ok(Json(state.reporter.report(kind, &filter).await?))
}
