use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::mail::MailError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "All fields are required";

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    StoreAccess(String),
    Delivery(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::StoreAccess(msg) => write!(f, "Store access error: {}", msg),
            AppError::Delivery(msg) => write!(f, "Mail delivery error: {}", msg),
        }
    }
}

impl AppError {
    /// Message safe to hand to the caller. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => REQUIRED_FIELDS_MESSAGE,
            AppError::StoreAccess(_) => "Server error accessing records",
            AppError::Delivery(_) => "Failed to send message",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "success": false,
                    "error": self.public_message(),
                    "details": errors
                })
            }
            _ => {
                serde_json::json!({
                    "success": false,
                    "error": self.public_message()
                })
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::StoreAccess(_) | AppError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StoreAccess(format!("Database error: {}", err))
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Delivery(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[actix_rt::test]
    async fn delivery_errors_do_not_leak_details() {
        let err = AppError::Delivery("535 5.7.8 bad credentials for smtp.example.com".into());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to send message");
        assert!(!String::from_utf8_lossy(&body).contains("smtp.example.com"));
    }

    #[test]
    fn store_errors_map_to_generic_server_error() {
        let err = AppError::StoreAccess("connection refused on 5432".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Server error accessing records");
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = AppError::ValidationError(vec![FieldError {
            field: "name".into(),
            message: REQUIRED_FIELDS_MESSAGE.into(),
        }]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
