use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use derive_more::Display;
use serde_json::json;

/// Crate-wide error kinds. Guard failures resolve as redirects to the
/// login page; everything else renders a JSON message body.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "Invalid credentials")]
    InvalidCredentials,

    #[display(fmt = "Authentication required")]
    Unauthenticated,

    #[display(fmt = "Insufficient privileges")]
    Forbidden,

    /// Already logged at the call site; the client only sees a generic 500.
    #[display(fmt = "Internal Server Error")]
    Storage,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthenticated | AppError::Forbidden => StatusCode::SEE_OTHER,
            AppError::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated | AppError::Forbidden => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            other => HttpResponse::build(other.status_code()).json(json!({
                "message": other.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_failures_redirect_to_login() {
        for err in [AppError::Unauthenticated, AppError::Forbidden] {
            let resp = err.error_response();
            assert_eq!(resp.status(), StatusCode::SEE_OTHER);
            assert_eq!(
                resp.headers().get(header::LOCATION).unwrap(),
                "/login",
                "{err:?} should redirect to the login page"
            );
        }
    }

    #[test]
    fn validation_is_bad_request_with_message() {
        let resp = AppError::validation("end date must be on or after the start date");
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn credential_failure_is_uniform() {
        // One message regardless of which condition failed.
        assert_eq!(AppError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn storage_failure_stays_generic() {
        assert_eq!(
            AppError::Storage.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Storage.to_string(), "Internal Server Error");
    }
}
