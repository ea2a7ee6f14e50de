//! Bank endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::JsonBody;
use crate::app::AppState;
use crate::domain::{AppError, Banco, BancoRequest, ErrorResponse};

/// List banks ordered by name
#[utoipa::path(
    get,
    path = "/banco/list",
    tag = "banco",
    params(("token" = String, Header, description = "Access token")),
    responses(
        (status = 200, description = "Banks found", body = Vec<Banco>),
        (status = 401, description = "Missing or unknown token")
    )
)]
pub async fn list_bancos_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Banco>>, AppError> {
    Ok(Json(state.service.list_bancos().await?))
}

/// Get a bank by id
#[utoipa::path(
    get,
    path = "/banco/show/{id}",
    tag = "banco",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Bank id")
    ),
    responses(
        (status = 200, description = "Bank found", body = Banco),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Bank not found", body = ErrorResponse)
    )
)]
pub async fn show_banco_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Banco>, AppError> {
    Ok(Json(state.service.get_banco(id).await?))
}

/// Create a bank (ADMIN only)
#[utoipa::path(
    post,
    path = "/banco/save",
    tag = "banco",
    params(("token" = String, Header, description = "Access token")),
    request_body = BancoRequest,
    responses(
        (status = 201, description = "Bank created", body = Banco),
        (status = 401, description = "Missing or unknown token"),
        (status = 403, description = "Role not allowed"),
        (status = 422, description = "Invalid or duplicate data", body = ErrorResponse)
    )
)]
pub async fn save_banco_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<BancoRequest>,
) -> Result<(StatusCode, Json<Banco>), AppError> {
    let banco = state.service.create_banco(payload).await?;
    Ok((StatusCode::CREATED, Json(banco)))
}

/// Replace a bank's data (ADMIN only)
#[utoipa::path(
    put,
    path = "/banco/update/{id}",
    tag = "banco",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Bank id")
    ),
    request_body = BancoRequest,
    responses(
        (status = 200, description = "Bank updated", body = Banco),
        (status = 401, description = "Missing or unknown token"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Bank not found", body = ErrorResponse),
        (status = 422, description = "Invalid or duplicate data", body = ErrorResponse)
    )
)]
pub async fn update_banco_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<BancoRequest>,
) -> Result<Json<Banco>, AppError> {
    Ok(Json(state.service.update_banco(id, payload).await?))
}

/// Delete a bank without accounts (ADMIN only)
#[utoipa::path(
    delete,
    path = "/banco/delete/{id}",
    tag = "banco",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Bank id")
    ),
    responses(
        (status = 204, description = "Bank deleted"),
        (status = 401, description = "Missing or unknown token"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Bank not found", body = ErrorResponse),
        (status = 422, description = "Bank still has accounts", body = ErrorResponse)
    )
)]
pub async fn delete_banco_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_banco(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
