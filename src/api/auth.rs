//! Access control middleware for the `token` request header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::app::AppState;
use crate::domain::{AppError, DomainError, Role};

/// Header carrying the access token
pub const TOKEN_HEADER: &str = "token";

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Role, AppError> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            warn!("Missing access token");
            AppError::from(DomainError::Unauthorized)
        })?;

    state.token_verifier.verify(token).ok_or_else(|| {
        warn!("Unknown access token");
        AppError::from(DomainError::Unauthorized)
    })
}

/// Accept any known token. The resolved [`Role`] is stored in the request
/// extensions.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let role = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(role);
    Ok(next.run(request).await)
}

/// Accept only tokens bound to [`Role::Admin`]
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let role = authenticate(&state, request.headers())?;
    if role != Role::Admin {
        warn!(role = %role, path = %request.uri().path(), "Role not allowed");
        return Err(DomainError::Forbidden.into());
    }
    request.extensions_mut().insert(role);
    Ok(next.run(request).await)
}
