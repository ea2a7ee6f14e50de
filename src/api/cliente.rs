//! Client endpoints, one route group per client kind.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::JsonBody;
use crate::app::AppState;
use crate::domain::{
    AppError, Cliente, ClientePessoaFisicaRequest, ClientePessoaJuridicaRequest, ErrorResponse,
    TipoCliente,
};

/// List individual clients ordered by name
#[utoipa::path(
    get,
    path = "/cliente-pessoa-fisica/list",
    tag = "cliente-pessoa-fisica",
    params(("token" = String, Header, description = "Access token")),
    responses(
        (status = 200, description = "Clients found", body = Vec<Cliente>),
        (status = 401, description = "Missing or unknown token")
    )
)]
pub async fn list_pessoa_fisica_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = state.service.list_clientes(TipoCliente::PessoaFisica).await?;
    Ok(Json(clientes))
}

/// Get an individual client by id
#[utoipa::path(
    get,
    path = "/cliente-pessoa-fisica/show/{id}",
    tag = "cliente-pessoa-fisica",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Client id")
    ),
    responses(
        (status = 200, description = "Client found", body = Cliente),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
pub async fn show_pessoa_fisica_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = state
        .service
        .get_cliente(TipoCliente::PessoaFisica, id)
        .await?;
    Ok(Json(cliente))
}

/// Create an individual client
#[utoipa::path(
    post,
    path = "/cliente-pessoa-fisica/save",
    tag = "cliente-pessoa-fisica",
    params(("token" = String, Header, description = "Access token")),
    request_body = ClientePessoaFisicaRequest,
    responses(
        (status = 201, description = "Client created", body = Cliente),
        (status = 401, description = "Missing or unknown token"),
        (status = 422, description = "Invalid or duplicate data", body = ErrorResponse)
    )
)]
pub async fn save_pessoa_fisica_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<ClientePessoaFisicaRequest>,
) -> Result<(StatusCode, Json<Cliente>), AppError> {
    let cliente = state.service.create_cliente(payload).await?;
    Ok((StatusCode::CREATED, Json(cliente)))
}

/// Replace an individual client's data
#[utoipa::path(
    put,
    path = "/cliente-pessoa-fisica/update/{id}",
    tag = "cliente-pessoa-fisica",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Client id")
    ),
    request_body = ClientePessoaFisicaRequest,
    responses(
        (status = 200, description = "Client updated", body = Cliente),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Invalid or duplicate data", body = ErrorResponse)
    )
)]
pub async fn update_pessoa_fisica_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ClientePessoaFisicaRequest>,
) -> Result<Json<Cliente>, AppError> {
    Ok(Json(state.service.update_cliente(id, payload).await?))
}

/// Delete an individual client that holds no accounts
#[utoipa::path(
    delete,
    path = "/cliente-pessoa-fisica/delete/{id}",
    tag = "cliente-pessoa-fisica",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Client id")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Client still holds accounts", body = ErrorResponse)
    )
)]
pub async fn delete_pessoa_fisica_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_cliente(TipoCliente::PessoaFisica, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List company clients ordered by name
#[utoipa::path(
    get,
    path = "/cliente-pessoa-juridica/list",
    tag = "cliente-pessoa-juridica",
    params(("token" = String, Header, description = "Access token")),
    responses(
        (status = 200, description = "Clients found", body = Vec<Cliente>),
        (status = 401, description = "Missing or unknown token")
    )
)]
pub async fn list_pessoa_juridica_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = state
        .service
        .list_clientes(TipoCliente::PessoaJuridica)
        .await?;
    Ok(Json(clientes))
}

/// Get a company client by id
#[utoipa::path(
    get,
    path = "/cliente-pessoa-juridica/show/{id}",
    tag = "cliente-pessoa-juridica",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Client id")
    ),
    responses(
        (status = 200, description = "Client found", body = Cliente),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Client not found", body = ErrorResponse)
    )
)]
pub async fn show_pessoa_juridica_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = state
        .service
        .get_cliente(TipoCliente::PessoaJuridica, id)
        .await?;
    Ok(Json(cliente))
}

/// Create a company client
#[utoipa::path(
    post,
    path = "/cliente-pessoa-juridica/save",
    tag = "cliente-pessoa-juridica",
    params(("token" = String, Header, description = "Access token")),
    request_body = ClientePessoaJuridicaRequest,
    responses(
        (status = 201, description = "Client created", body = Cliente),
        (status = 401, description = "Missing or unknown token"),
        (status = 422, description = "Invalid or duplicate data", body = ErrorResponse)
    )
)]
pub async fn save_pessoa_juridica_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<ClientePessoaJuridicaRequest>,
) -> Result<(StatusCode, Json<Cliente>), AppError> {
    let cliente = state.service.create_cliente(payload).await?;
    Ok((StatusCode::CREATED, Json(cliente)))
}

/// Replace a company client's data
#[utoipa::path(
    put,
    path = "/cliente-pessoa-juridica/update/{id}",
    tag = "cliente-pessoa-juridica",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Client id")
    ),
    request_body = ClientePessoaJuridicaRequest,
    responses(
        (status = 200, description = "Client updated", body = Cliente),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Invalid or duplicate data", body = ErrorResponse)
    )
)]
pub async fn update_pessoa_juridica_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<ClientePessoaJuridicaRequest>,
) -> Result<Json<Cliente>, AppError> {
    Ok(Json(state.service.update_cliente(id, payload).await?))
}

/// Delete a company client that holds no accounts
#[utoipa::path(
    delete,
    path = "/cliente-pessoa-juridica/delete/{id}",
    tag = "cliente-pessoa-juridica",
    params(
        ("token" = String, Header, description = "Access token"),
        ("id" = i64, Path, description = "Client id")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 401, description = "Missing or unknown token"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 422, description = "Client still holds accounts", body = ErrorResponse)
    )
)]
pub async fn delete_pessoa_juridica_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .service
        .delete_cliente(TipoCliente::PessoaJuridica, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
