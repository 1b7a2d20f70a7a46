//! API error types with HTTP response mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::UnitError;
use domain::{DomainError, GroupError, LedgerError, ProcessError};
use reporting::ReportError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Report building error.
    Report(ReportError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Report(err) => report_error_to_response(err),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    let status = match &err {
        DomainError::Ledger(ledger_err) => match ledger_err {
            LedgerError::InsufficientStock { .. } => StatusCode::CONFLICT,
            LedgerError::InvalidQuantity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        },
        DomainError::Process(process_err) => match process_err {
            ProcessError::ProcessNotFound(_) => StatusCode::NOT_FOUND,
            ProcessError::InvalidState { .. } | ProcessError::DuplicateProcessNumber(_) => {
                StatusCode::CONFLICT
            }
            ProcessError::InvalidQuantity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        },
        DomainError::Group(group_err) => match group_err {
            GroupError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            GroupError::InvalidGroup(_) => StatusCode::BAD_REQUEST,
        },
        DomainError::Unit(_) | DomainError::InvalidSnapshot(_) => StatusCode::BAD_REQUEST,
        DomainError::Store(_) | DomainError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}

fn report_error_to_response(err: ReportError) -> (StatusCode, String) {
    match err {
        ReportError::Domain(domain_err) => domain_error_to_response(domain_err),
        ReportError::UnknownReport(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ReportError::Store(_) | ReportError::Deserialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Report(err)
    }
}

impl From<UnitError> for ApiError {
    fn from(err: UnitError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use common::{Diameter, Weight};
    use record_store::StoreError;

    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_domain_taxonomy_maps_to_status_codes() {
        let insufficient: DomainError = LedgerError::InsufficientStock {
            diameter: Diameter::from_mm(12.0).unwrap(),
            requested: Weight::from_kg(5.0).unwrap(),
            available: Weight::from_kg(1.0).unwrap(),
        }
        .into();
        assert_eq!(status_of(insufficient), StatusCode::CONFLICT);

        let not_found: DomainError = ProcessError::ProcessNotFound("p".into()).into();
        assert_eq!(status_of(not_found), StatusCode::NOT_FOUND);

        let reused: DomainError = ProcessError::DuplicateProcessNumber("PROC-1".into()).into();
        assert_eq!(status_of(reused), StatusCode::CONFLICT);

        let quantity: DomainError = LedgerError::InvalidQuantity {
            field: "weight",
            value: "0".into(),
        }
        .into();
        assert_eq!(status_of(quantity), StatusCode::UNPROCESSABLE_ENTITY);

        let group: DomainError = GroupError::InvalidGroup("empty".into()).into();
        assert_eq!(status_of(group), StatusCode::BAD_REQUEST);

        let snapshot = DomainError::InvalidSnapshot("bad".into());
        assert_eq!(status_of(snapshot), StatusCode::BAD_REQUEST);

        let store: DomainError = StoreError::InjectedFailure.into();
        assert_eq!(status_of(store), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_report_errors_map_through_domain() {
        let missing_group: ReportError =
            DomainError::from(GroupError::GroupNotFound("g".into())).into();
        assert_eq!(status_of(missing_group), StatusCode::NOT_FOUND);

        let unknown = ReportError::UnknownReport("inventory".into());
        assert_eq!(status_of(unknown), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            status_of(ApiError::BadRequest("nope".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::NotFound("nope".into())),
            StatusCode::NOT_FOUND
        );
    }
}
