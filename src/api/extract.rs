//! Request body extraction.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::domain::{AppError, BODY_PATH, ValidationError};

/// JSON body whose binding failures are classified like field errors.
///
/// A value of the wrong type answers 422 with the usual `ErrorResponse`
/// instead of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidationError::Body {
                path: BODY_PATH.to_string(),
                reason: e.body_text(),
            })?;
        Ok(Self(bind(&bytes)?))
    }
}

/// Deserialize a JSON body, reporting the dotted path of the offending field
pub fn bind<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ValidationError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        let path = match e.inner().classify() {
            Category::Data if path != "." => path,
            _ => BODY_PATH.to_string(),
        };
        ValidationError::Body {
            path,
            reason: e.into_inner().to_string(),
        }
    })?;
    deserializer.end().map_err(|e| ValidationError::Body {
        path: BODY_PATH.to_string(),
        reason: e.to_string(),
    })?;
    Ok(value)
}
