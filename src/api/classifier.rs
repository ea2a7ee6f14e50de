//! Maps application errors to HTTP responses.
//!
//! [`classify`] is a pure function of the error and a message catalog. The
//! `IntoResponse` implementation for [`AppError`] delegates to it using the
//! process-wide catalog.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::validation::BODY_MESSAGE_KEY;
use crate::domain::{
    AppError, ConfigError, ErrorDetails, ErrorKind, ErrorResponse, ValidationError,
};
use crate::infra::MessageCatalog;

/// Status and optional body for one failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    /// `None` for access errors, which answer with an empty body
    pub body: Option<ErrorResponse>,
}

impl IntoResponse for Classification {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::FieldValidation
        | ErrorKind::NotUnique
        | ErrorKind::EmptyCollection
        | ErrorKind::NotEmptyCollection
        | ErrorKind::MoreThanOneAccountClient
        | ErrorKind::MoreThanOneAccountOwnership
        | ErrorKind::NoAccountOwnership => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Classify an error against a catalog.
///
/// Fails only when the catalog lacks a message the error needs.
pub fn classify(error: &AppError, catalog: &MessageCatalog) -> Result<Classification, ConfigError> {
    let kind = error.kind();
    let status = status_for(kind);

    let Some(cause_key) = kind.cause_key() else {
        return Ok(Classification { status, body: None });
    };

    let details = match error {
        AppError::Validation(ValidationError::Fields(errors)) => {
            Some(ErrorDetails::List(field_messages(errors, catalog)?))
        }
        AppError::Validation(ValidationError::Body { path, .. }) => Some(ErrorDetails::List(
            vec![format!("{}: {}", path, catalog.get(BODY_MESSAGE_KEY)?)],
        )),
        AppError::Domain(domain) => domain.detail().map(|d| ErrorDetails::Single(d.to_string())),
        _ => None,
    };

    Ok(Classification {
        status,
        body: Some(ErrorResponse {
            status: status.as_u16(),
            cause: catalog.get(cause_key)?.to_string(),
            details,
        }),
    })
}

/// Flatten field failures into `"field: message"` lines, ordered by field
/// path and then by constraint declaration order.
pub fn field_messages(
    errors: &ValidationErrors,
    catalog: &MessageCatalog,
) -> Result<Vec<String>, ConfigError> {
    let mut failures = Vec::new();
    collect_failures(errors, "", &mut failures);
    failures.sort_by(|a, b| a.0.cmp(&b.0));

    failures
        .into_iter()
        .map(|(path, key)| Ok(format!("{}: {}", path, catalog.get(&key)?)))
        .collect()
}

fn collect_failures(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for failure in list {
                    let key = failure
                        .message
                        .as_ref()
                        .unwrap_or(&failure.code)
                        .to_string();
                    out.push((path.clone(), key));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_failures(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_failures(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match MessageCatalog::installed() {
            Ok(catalog) => error_response(&self, catalog),
            Err(config_error) => unclassified(&self, &config_error),
        }
    }
}

/// Build the HTTP response for an error against a given catalog.
///
/// A catalog missing the needed messages yields a bare 500.
pub fn error_response(error: &AppError, catalog: &MessageCatalog) -> Response {
    match classify(error, catalog) {
        Ok(classification) => {
            if classification.status.is_server_error() {
                error!(kind = %error.kind(), error = %error, "Server error");
            } else {
                debug!(kind = %error.kind(), error = %error, "Request rejected");
            }
            classification.into_response()
        }
        Err(config_error) => unclassified(error, &config_error),
    }
}

fn unclassified(error: &AppError, config_error: &ConfigError) -> Response {
    error!(
        error = %config_error,
        original = %error,
        "Failed to classify error"
    );
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
