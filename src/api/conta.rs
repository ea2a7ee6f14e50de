//! Account endpoints.
//!
//! Checking and savings accounts share these handlers; the router mounts them
//! twice and injects the account kind as a request extension.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::JsonBody;
use crate::app::AppState;
use crate::domain::{AppError, Conta, ContaRequest, ErrorResponse, TipoConta};

/// List accounts of one kind ordered by number
#[utoipa::path(
    get,
    path = "/conta-{tipo}/list",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind")
    ),
    responses(
        (status = 200, description = "Accounts found", body = Vec<Conta>),
        (status = 401, description = "Missing or unknown token")
    )
)]
pub async fn list_contas_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
) -> Result<Json<Vec<Conta>>, AppError> {
    Ok(Json(state.service.list_contas(tipo).await?))
}

/// Get an account by id
#[utoipa::path(
    get,
    path = "/conta-{tipo}/show/{id}",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind"),
        ("id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Account found", body = Conta),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn show_conta_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
    Path(id): Path<i64>,
) -> Result<Json<Conta>, AppError> {
    Ok(Json(state.service.get_conta(tipo, id).await?))
}

/// Open an account
#[utoipa::path(
    post,
    path = "/conta-{tipo}/save",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind")
    ),
    request_body = ContaRequest,
    responses(
        (status = 201, description = "Account created", body = Conta),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Bank or client not found", body = ErrorResponse),
        (status = 422, description = "Invalid data or account rule violated", body = ErrorResponse)
    )
)]
pub async fn save_conta_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
    JsonBody(payload): JsonBody<ContaRequest>,
) -> Result<(StatusCode, Json<Conta>), AppError> {
    let conta = state.service.create_conta(tipo, payload).await?;
    Ok((StatusCode::CREATED, Json(conta)))
}

/// Replace an account's data and holders
#[utoipa::path(
    put,
    path = "/conta-{tipo}/update/{id}",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind"),
        ("id" = i64, Path, description = "Account id")
    ),
    request_body = ContaRequest,
    responses(
        (status = 200, description = "Account updated", body = Conta),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Account, bank or client not found", body = ErrorResponse),
        (status = 422, description = "Invalid data or account rule violated", body = ErrorResponse)
    )
)]
pub async fn update_conta_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ContaRequest>,
) -> Result<Json<Conta>, AppError> {
    Ok(Json(state.service.update_conta(tipo, id, payload).await?))
}

/// Close an account
#[utoipa::path(
    delete,
    path = "/conta-{tipo}/delete/{id}",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind"),
        ("id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn delete_conta_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.service.delete_conta(tipo, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a holder to an account
#[utoipa::path(
    post,
    path = "/conta-{tipo}/{id}/cliente/{cliente_id}",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind"),
        ("id" = i64, Path, description = "Account id"),
        ("cliente_id" = i64, Path, description = "Client id")
    ),
    responses(
        (status = 200, description = "Holder added", body = Conta),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Account or client not found", body = ErrorResponse),
        (status = 422, description = "Client already a holder or account rule violated", body = ErrorResponse)
    )
)]
pub async fn add_titular_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
    Path((id, cliente_id)): Path<(i64, i64)>,
) -> Result<Json<Conta>, AppError> {
    Ok(Json(state.service.add_titular(tipo, id, cliente_id).await?))
}

/// Remove a holder from an account
#[utoipa::path(
    delete,
    path = "/conta-{tipo}/{id}/cliente/{cliente_id}",
    tag = "conta",
    params(
        ("token" = String, Header, description = "Access token"),
        ("tipo" = TipoConta, Path, description = "Account kind"),
        ("id" = i64, Path, description = "Account id"),
        ("cliente_id" = i64, Path, description = "Client id")
    ),
    responses(
        (status = 200, description = "Holder removed", body = Conta),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 422, description = "Client is not a holder or is the last one", body = ErrorResponse)
    )
)]
pub async fn remove_titular_handler(
    State(state): State<Arc<AppState>>,
    Extension(tipo): Extension<TipoConta>,
    Path((id, cliente_id)): Path<(i64, i64)>,
) -> Result<Json<Conta>, AppError> {
    Ok(Json(state.service.remove_titular(tipo, id, cliente_id).await?))
}
