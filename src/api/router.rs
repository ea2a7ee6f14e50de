//! Router construction.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension, Router,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app::AppState;
use crate::domain::TipoConta;

use super::auth::{require_admin, require_token};
use super::handlers::{ApiDoc, health_check_handler, liveness_handler, readiness_handler};
use super::{banco, cliente, conta};

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the application router with the default request timeout
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

/// Create the application router
pub fn create_router_with_timeout(state: Arc<AppState>, timeout: Duration) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health_check_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/banco", banco_routes(&state))
        .nest("/cliente-pessoa-fisica", pessoa_fisica_routes(&state))
        .nest("/cliente-pessoa-juridica", pessoa_juridica_routes(&state))
        .nest(
            "/conta-corrente",
            conta_routes(&state).layer(Extension(TipoConta::Corrente)),
        )
        .nest(
            "/conta-poupanca",
            conta_routes(&state).layer(Extension(TipoConta::Poupanca)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn banco_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let read = Router::new()
        .route("/list", get(banco::list_bancos_handler))
        .route("/show/{id}", get(banco::show_banco_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(state),
            require_token,
        ));

    let write = Router::new()
        .route("/save", post(banco::save_banco_handler))
        .route("/update/{id}", put(banco::update_banco_handler))
        .route("/delete/{id}", delete(banco::delete_banco_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(state),
            require_admin,
        ));

    read.merge(write)
}

fn pessoa_fisica_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(cliente::list_pessoa_fisica_handler))
        .route("/show/{id}", get(cliente::show_pessoa_fisica_handler))
        .route("/save", post(cliente::save_pessoa_fisica_handler))
        .route("/update/{id}", put(cliente::update_pessoa_fisica_handler))
        .route("/delete/{id}", delete(cliente::delete_pessoa_fisica_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(state),
            require_token,
        ))
}

fn pessoa_juridica_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(cliente::list_pessoa_juridica_handler))
        .route("/show/{id}", get(cliente::show_pessoa_juridica_handler))
        .route("/save", post(cliente::save_pessoa_juridica_handler))
        .route("/update/{id}", put(cliente::update_pessoa_juridica_handler))
        .route(
            "/delete/{id}",
            delete(cliente::delete_pessoa_juridica_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(state),
            require_token,
        ))
}

fn conta_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(conta::list_contas_handler))
        .route("/show/{id}", get(conta::show_conta_handler))
        .route("/save", post(conta::save_conta_handler))
        .route("/update/{id}", put(conta::update_conta_handler))
        .route("/delete/{id}", delete(conta::delete_conta_handler))
        .route(
            "/{id}/cliente/{cliente_id}",
            post(conta::add_titular_handler).delete(conta::remove_titular_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(state),
            require_token,
        ))
}
