//! Integration tests for the API: health, access control, banks and error
//! responses.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use aplicacao_financeira::api::create_router;
use aplicacao_financeira::app::AppState;
use aplicacao_financeira::domain::{Banco, ErrorResponse, HealthResponse, HealthStatus};
use aplicacao_financeira::test_utils::{
    ADMIN_TOKEN, FUNCIONARIO_TOKEN, MockDatabaseClient, install_test_catalog, test_verifier,
};

fn create_test_state() -> Arc<AppState> {
    install_test_catalog();
    let db = Arc::new(MockDatabaseClient::new());
    Arc::new(AppState::new(db as _, Arc::new(test_verifier()) as _))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes)
}

fn banco_body(numero: i32, cnpj: &str, nome: &str) -> Value {
    json!({ "numero": numero, "cnpj": cnpj, "nome": nome })
}

#[tokio::test]
async fn test_health_check() {
    let router = create_router(create_test_state());

    let (status, body) = send(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.database, HealthStatus::Healthy);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let db = Arc::new(MockDatabaseClient::new());
    install_test_catalog();
    let state = Arc::new(AppState::new(
        Arc::clone(&db) as _,
        Arc::new(test_verifier()) as _,
    ));
    let router = create_router(state);

    assert_eq!(send(&router, "GET", "/health/live", None, None).await.0, StatusCode::OK);
    assert_eq!(send(&router, "GET", "/health/ready", None, None).await.0, StatusCode::OK);

    db.set_healthy(false);
    assert_eq!(
        send(&router, "GET", "/health/ready", None, None).await.0,
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(send(&router, "GET", "/health/live", None, None).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized_with_empty_body() {
    let router = create_router(create_test_state());

    let (status, body) = send(&router, "GET", "/banco/list", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let router = create_router(create_test_state());

    let (status, body) = send(&router, "GET", "/banco/list", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());

    let (status, _) = send(
        &router,
        "POST",
        "/banco/save",
        Some("nope"),
        Some(banco_body(10, "00000000000191", "Banco do Brasil")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_funcionario_cannot_change_banks() {
    let router = create_router(create_test_state());

    let (status, body) = send(
        &router,
        "POST",
        "/banco/save",
        Some(FUNCIONARIO_TOKEN),
        Some(banco_body(10, "00000000000191", "Banco do Brasil")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.is_empty());

    let (status, _) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(banco_body(10, "00000000000191", "Banco do Brasil")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&router, "DELETE", "/banco/delete/1", Some(FUNCIONARIO_TOKEN), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, "GET", "/banco/list", Some(FUNCIONARIO_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_banco_crud() {
    let router = create_router(create_test_state());

    let (status, body) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(banco_body(10, "00000000000191", "Banco do Brasil")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let banco: Banco = serde_json::from_slice(&body).unwrap();
    assert_eq!(banco.numero, 10);

    let (status, body) = send(
        &router,
        "GET",
        &format!("/banco/show/{}", banco.id),
        Some(FUNCIONARIO_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Banco = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched.id, banco.id);

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/banco/update/{}", banco.id),
        Some(ADMIN_TOKEN),
        Some(banco_body(10, "00000000000191", "BB")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Banco = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated.nome, "BB");

    let (status, body) = send(
        &router,
        "DELETE",
        &format!("/banco/delete/{}", banco.id),
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = send(&router, "GET", "/banco/list", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let bancos: Vec<Banco> = serde_json::from_slice(&body).unwrap();
    assert!(bancos.is_empty());
}

#[tokio::test]
async fn test_unknown_banco_is_not_found() {
    let catalog = install_test_catalog();
    let router = create_router(create_test_state());

    let (status, body) = send(&router, "GET", "/banco/show/999", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.status, 404);
    assert_eq!(error.cause, catalog.get("cause.not_found").unwrap());
    assert!(error.details.is_some());
}

#[tokio::test]
async fn test_duplicate_banco_is_not_unique() {
    let catalog = install_test_catalog();
    let router = create_router(create_test_state());

    let (status, _) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(banco_body(10, "00000000000191", "Banco do Brasil")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(banco_body(10, "00360305000104", "Caixa Econômica Federal")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["status"], 422);
    assert_eq!(error["cause"], catalog.get("cause.not_unique").unwrap());
    assert!(error["details"].is_string());
}

#[tokio::test]
async fn test_banco_field_errors() {
    let catalog = install_test_catalog();
    let router = create_router(create_test_state());

    let (status, body) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(json!({ "numero": 10, "cnpj": "12345678901234" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["cause"], catalog.get("cause.field_validation").unwrap());
    let details: Vec<&str> = error["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(
        details,
        vec![
            format!("cnpj: {}", catalog.get("banco.cnpj.invalido").unwrap()),
            format!("nome: {}", catalog.get("banco.nome.obrigatorio").unwrap()),
        ]
    );
}

fn details(body: &[u8]) -> Vec<String> {
    let error: Value = serde_json::from_slice(body).unwrap();
    error["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_wrong_typed_field_is_field_validation_error() {
    let catalog = install_test_catalog();
    let router = create_router(create_test_state());

    let (status, body) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(json!({ "numero": "dez", "cnpj": "00000000000191", "nome": "BB" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.status, 422);
    assert_eq!(error.cause, catalog.get("cause.field_validation").unwrap());
    assert_eq!(
        details(&body),
        vec![format!("numero: {}", catalog.get("requisicao.valor.invalido").unwrap())]
    );

    let (status, body) = send(
        &router,
        "POST",
        "/cliente-pessoa-fisica/save",
        Some(FUNCIONARIO_TOKEN),
        Some(json!({ "nome": "Maria", "endereco": { "cep": 1310100 } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(details(&body)[0].starts_with("endereco.cep: "));
}

#[tokio::test]
async fn test_malformed_body_is_field_validation_error() {
    let catalog = install_test_catalog();
    let router = create_router(create_test_state());

    let request = Request::builder()
        .method("PUT")
        .uri("/banco/update/1")
        .header("token", ADMIN_TOKEN)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"numero": 10,"#))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        details(&body),
        vec![format!("corpo: {}", catalog.get("requisicao.valor.invalido").unwrap())]
    );
}

#[tokio::test]
async fn test_empty_cnpj_is_required() {
    let catalog = install_test_catalog();
    let router = create_router(create_test_state());

    let (status, body) = send(
        &router,
        "POST",
        "/banco/save",
        Some(ADMIN_TOKEN),
        Some(banco_body(10, "", "Banco do Brasil")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        details(&body),
        vec![format!("cnpj: {}", catalog.get("banco.cnpj.obrigatorio").unwrap())]
    );
}

#[tokio::test]
async fn test_database_failure_is_internal_error_without_details() {
    install_test_catalog();
    let db = Arc::new(MockDatabaseClient::failing("connection string with password"));
    let state = Arc::new(AppState::new(db as _, Arc::new(test_verifier()) as _));
    let router = create_router(state);

    let (status, body) = send(&router, "GET", "/banco/list", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["status"], 500);
    assert!(error.get("details").is_none());
    assert!(!String::from_utf8_lossy(&body).contains("password"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let router = create_router(create_test_state());

    let (status, body) = send(&router, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"].get("/banco/list").is_some());
    assert!(doc["paths"].get("/health").is_some());
}
