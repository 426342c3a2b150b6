//! api.rs
//!
//! the json envelope every endpoint answers with: `{ success, data }` or `{ success, error }`

use std::fmt;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, ResponseError};
use common_lib::error::MarketError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok()
            .append_header(("Cache-Control", "no-store"))
            .json(ApiResponse { success: true, data })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, PartialEq)]
pub enum ApiError {
    InvalidArgument(String),
    NotFound,
    MethodNotAllowed,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidArgument(msg) => write!(f, "{}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::MethodNotAllowed => write!(f, "Method not allowed. Use GET."),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<MarketError> for ApiError {
    fn from(e: MarketError) -> Self {
        match e {
            MarketError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiErrorBody {
            success: false,
            error: self.to_string(),
        })
    }
}

/// Replace whatever a 500 carries with the generic envelope.
///
/// The original error is logged here and never reaches the client.
pub fn internal_error_envelope<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if let Some(e) = res.response().error() {
        tracing::error!("[internal_error_envelope] {} {}: {}", res.request().method(), res.request().path(), e);
    }
    let (req, _) = res.into_parts();
    let body = HttpResponse::InternalServerError().json(ApiErrorBody {
        success: false,
        error: "Internal server error".to_string(),
    });
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, body).map_into_right_body()))
}
