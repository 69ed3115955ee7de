//! Mapping of domain errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use exgrip_search::SearchError;

/// Any error a request handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] exgrip_core::Error),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// The request body was not valid JSON or did not fit the payload type.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    /// A handler task was cancelled or panicked.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub detail: String,
    /// One of `no_criteria`, `malformed_input`, `not_found`, `upstream`,
    /// `internal`.
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Catalog(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::Catalog(_) | Self::Search(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Catalog(exgrip_core::Error::NoCriteria) => "no_criteria",
            Self::Catalog(exgrip_core::Error::MalformedLength { .. }) | Self::InvalidBody(_) => {
                "malformed_input"
            }
            Self::Catalog(exgrip_core::Error::NoMatches) => "not_found",
            Self::Catalog(_) | Self::Search(_) => "upstream",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            log::error!("[{}] {}", code, self);
        } else {
            log::warn!("[{}] {}", code, self);
        }

        let body = ErrorBody {
            detail: self.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exgrip_core::Error;

    #[test]
    fn test_catalog_error_mapping() {
        let cases = [
            (Error::NoCriteria, StatusCode::BAD_REQUEST, "no_criteria"),
            (
                Error::MalformedLength {
                    input: "abc".to_string(),
                    reason: "not an integer".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "malformed_input",
            ),
            (Error::NoMatches, StatusCode::NOT_FOUND, "not_found"),
            (
                Error::StoreUnavailable("lock poisoned".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream",
            ),
        ];

        for (error, status, code) in cases {
            let error = ApiError::from(error);
            assert_eq!(error.status(), status, "{error}");
            assert_eq!(error.code(), code, "{error}");
        }
    }

    #[test]
    fn test_search_errors_are_upstream() {
        let error = ApiError::from(SearchError::Http {
            url: "http://img/3.jpg".to_string(),
            status: 404,
        });
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code(), "upstream");
        assert_eq!(error.to_string(), "HTTP 404 fetching http://img/3.jpg");
    }

    #[test]
    fn test_detail_passes_message_through() {
        let error = ApiError::from(Error::NoCriteria);
        assert_eq!(error.to_string(), "No valid fields provided for filtering.");
    }
}
