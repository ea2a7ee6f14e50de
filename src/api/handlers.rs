//! OpenAPI document and health endpoints.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    Banco, BancoRequest, Cliente, ClientePessoaFisicaRequest, ClientePessoaJuridicaRequest,
    ClienteStatus, Conta, ContaRequest, Endereco, EnderecoRequest, ErrorDetails, ErrorResponse,
    HealthResponse, HealthStatus, TipoCliente, TipoConta,
};

use super::{banco, cliente, conta};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aplicação Financeira API",
        version = "0.1.0",
        description = "Banks, individual and company clients, checking and savings accounts",
        license(
            name = "MIT"
        )
    ),
    paths(
        banco::list_bancos_handler,
        banco::show_banco_handler,
        banco::save_banco_handler,
        banco::update_banco_handler,
        banco::delete_banco_handler,
        cliente::list_pessoa_fisica_handler,
        cliente::show_pessoa_fisica_handler,
        cliente::save_pessoa_fisica_handler,
        cliente::update_pessoa_fisica_handler,
        cliente::delete_pessoa_fisica_handler,
        cliente::list_pessoa_juridica_handler,
        cliente::show_pessoa_juridica_handler,
        cliente::save_pessoa_juridica_handler,
        cliente::update_pessoa_juridica_handler,
        cliente::delete_pessoa_juridica_handler,
        conta::list_contas_handler,
        conta::show_conta_handler,
        conta::save_conta_handler,
        conta::update_conta_handler,
        conta::delete_conta_handler,
        conta::add_titular_handler,
        conta::remove_titular_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            Banco,
            BancoRequest,
            Cliente,
            ClienteStatus,
            ClientePessoaFisicaRequest,
            ClientePessoaJuridicaRequest,
            Conta,
            ContaRequest,
            Endereco,
            EnderecoRequest,
            ErrorDetails,
            ErrorResponse,
            HealthResponse,
            HealthStatus,
            TipoCliente,
            TipoConta,
        )
    ),
    tags(
        (name = "banco", description = "Bank management; changes require the ADMIN role"),
        (name = "cliente-pessoa-fisica", description = "Individual clients"),
        (name = "cliente-pessoa-juridica", description = "Company clients"),
        (name = "conta", description = "Checking and savings accounts"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.service.health_check().await;
    match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}
