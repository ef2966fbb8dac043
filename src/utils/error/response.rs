//! HTTP response handling for errors

use super::ServiceError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Provider(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Database(_) | ServiceError::Storage(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Storage and internal details stay in the logs
        let details = match self {
            ServiceError::Validation(msg) | ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Provider(err) => err.to_string(),
            _ => {
                error!(error = %self, "Request failed");
                "Internal error, see service logs".to_string()
            }
        };

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.code(),
            "details": details,
        }))
    }
}
