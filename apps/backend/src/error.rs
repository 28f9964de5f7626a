use actix_web::error::ResponseError;
use actix_web::http::header::{RETRY_AFTER, WWW_AUTHENTICATE};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::errors::{DomainError, ErrorCode};
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Service unavailable: {detail}")]
    Unavailable { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::Unauthorized { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Unavailable { code, .. } => *code,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing detail. Internal and configuration details stay in logs.
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::Unauthorized { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::Unavailable { detail, .. } => detail.clone(),
            AppError::Internal { .. } | AppError::Config { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn invalid(code: ErrorCode, detail: String) -> Self {
        Self::Validation { code, detail }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedMissingBearer,
            detail: "Missing or malformed Bearer token".to_string(),
        }
    }

    pub fn unauthorized_invalid_token() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedInvalidToken,
            detail: "Invalid token".to_string(),
        }
    }

    pub fn unauthorized_expired_token() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedExpiredToken,
            detail: "Token expired".to_string(),
        }
    }

    pub fn unauthorized_principal_not_found() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedPrincipalNotFound,
            detail: "Principal not found".to_string(),
        }
    }

    pub fn forbidden_role(required: crate::auth::Role) -> Self {
        Self::Forbidden {
            code: ErrorCode::ForbiddenRole,
            detail: format!("Access denied - {required} role required"),
        }
    }

    pub fn principal_lookup_failed() -> Self {
        Self::Unavailable {
            code: ErrorCode::PrincipalLookupFailed,
            detail: "Unable to verify principal, try again later".to_string(),
        }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MalformedToken | AuthError::InvalidSignature => {
                AppError::unauthorized_invalid_token()
            }
            AuthError::TokenExpired => AppError::unauthorized_expired_token(),
            AuthError::PrincipalNotFound | AuthError::PrincipalInactive => {
                AppError::unauthorized_principal_not_found()
            }
            AuthError::RoleMismatch { required, .. } => AppError::forbidden_role(required),
            AuthError::InvalidPrincipal => AppError::invalid(
                ErrorCode::InvalidPrincipal,
                "Principal id must not be empty".to_string(),
            ),
            AuthError::PrincipalLookup(_) => AppError::principal_lookup_failed(),
            AuthError::Encoding(detail) => AppError::internal(detail),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Infra(_, detail) => AppError::internal(detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(%trace_id, code, error = %self, "request failed");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://thappy.app/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));

        match status {
            StatusCode::UNAUTHORIZED => {
                builder.insert_header((WWW_AUTHENTICATE, "Bearer"));
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                builder.insert_header((RETRY_AFTER, "1"));
            }
            _ => {}
        }

        builder.json(problem_details)
    }
}
