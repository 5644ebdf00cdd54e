//! Mapping of dashboard errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gestao_core::GestaoError;
use serde::Serialize;
use thiserror::Error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] GestaoError),

    /// Malformed query parameter.
    #[error("{0}")]
    BadRequest(String),

    /// The blocking render task died.
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dashboard(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Dashboard(err) if err.is_bad_request() => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Dashboard(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        if status.is_server_error() {
            tracing::error!(%status, %error, "request failed");
        } else {
            tracing::debug!(%status, %error, "request rejected");
        }
        (status, Json(ErrorBody { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestao_sheet::SheetError;

    #[test]
    fn test_status_codes() {
        let missing = ApiError::from(GestaoError::from(SheetError::SheetNotFound {
            name: "Analistas EIC²".into(),
            path: "APP Gestão.xlsx".into(),
        }));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::from(GestaoError::InvalidFilter("x".into()));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let column = ApiError::from(GestaoError::MissingColumn("Valor".into()));
        assert_eq!(column.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(column.to_string(), "Coluna obrigatória ausente: Valor");
    }

    #[tokio::test]
    async fn test_panicked_render_is_a_server_error() {
        let join_err = tokio::task::spawn_blocking(|| panic!("boom"))
            .await
            .unwrap_err();
        let err = ApiError::from(join_err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("render task failed"));
    }
}
