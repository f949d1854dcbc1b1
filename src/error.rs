use actix_web::http::StatusCode;
use actix_web::{error, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::MealPlanError;
use crate::models::ErrorResponse;
use crate::services::{GeminiError, PostgresError};

/// Errors surfaced by HTTP handlers. Each variant maps to one status code
/// and renders as an [`ErrorResponse`] body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] PostgresError),

    #[error("Generative API error: {0}")]
    Upstream(#[from] GeminiError),

    #[error("Could not read generated meal plan: {0}")]
    MealPlan(#[from] MealPlanError),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::NotFound(_) => "Not found",
            ApiError::Database(_) => "Database error",
            ApiError::Upstream(_) | ApiError::MealPlan(_) => "Upstream error",
        }
    }

    /// Message sent to clients. Server-side failures are described only in
    /// the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_) | ApiError::Unauthorized(_) | ApiError::NotFound(_) => {
                self.to_string()
            }
            ApiError::Upstream(GeminiError::NotConfigured) => {
                "The assistant is not available on this server".to_string()
            }
            ApiError::Database(_) => "An internal error occurred".to_string(),
            ApiError::Upstream(_) | ApiError::MealPlan(_) => {
                "The assistant could not complete the request, please try again".to_string()
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(GeminiError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::MealPlan(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::info!("Request rejected: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.public_message(),
            status_code: status.as_u16(),
        })
    }
}

/// Error body for requests rejected before reaching a handler
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Upstream(GeminiError::EmptyResponse).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Upstream(GeminiError::NotConfigured).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::MealPlan(MealPlanError::Empty).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    async fn body_of(error: ApiError) -> serde_json::Value {
        let body = actix_web::body::to_bytes(error.error_response().into_body())
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_web::test]
    async fn test_server_errors_hide_details() {
        let body = body_of(ApiError::Database(PostgresError::InvalidData(
            "relation \"health_entries\" does not exist".to_string(),
        )))
        .await;
        assert_eq!(body["status_code"], 500);
        assert!(!body["message"].as_str().unwrap().contains("health_entries"));

        let body = body_of(ApiError::Upstream(GeminiError::ApiError {
            status: 403,
            message: "API key not valid".to_string(),
        }))
        .await;
        assert_eq!(body["status_code"], 502);
        assert!(!body["message"].as_str().unwrap().contains("API key"));
    }

    #[actix_web::test]
    async fn test_client_errors_keep_details() {
        let body = body_of(ApiError::NotFound("Hospital hosp-999 not found".to_string())).await;
        assert_eq!(body["message"], "Hospital hosp-999 not found");
    }
}
