//! Request flows for clients and accounts.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use aplicacao_financeira::api::create_router;
use aplicacao_financeira::app::AppState;
use aplicacao_financeira::domain::{Cliente, Conta};
use aplicacao_financeira::infra::MessageCatalog;
use aplicacao_financeira::test_utils::{
    ADMIN_TOKEN, FUNCIONARIO_TOKEN, MockDatabaseClient, install_test_catalog, test_verifier,
};

fn create_test_router() -> Router {
    install_test_catalog();
    let db = Arc::new(MockDatabaseClient::new());
    create_router(Arc::new(AppState::new(
        db as _,
        Arc::new(test_verifier()) as _,
    )))
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("token", FUNCIONARIO_TOKEN);
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
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn endereco() -> Value {
    json!({
        "logradouro": "Rodovia Washington Luís",
        "numero": "km 235",
        "bairro": "Monjolinho",
        "cep": "13565-905",
        "cidade": "São Carlos",
        "estado": "SP"
    })
}

fn pessoa_fisica(nome: &str, cpf: &str) -> Value {
    json!({
        "nome": nome,
        "status": "A",
        "rg": "123456789",
        "cpf": cpf,
        "endereco": endereco()
    })
}

async fn create_banco(router: &Router, numero: i32, cnpj: &str) -> i64 {
    let request = Request::builder()
        .method("POST")
        .uri("/banco/save")
        .header("token", ADMIN_TOKEN)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({ "numero": numero, "cnpj": cnpj, "nome": format!("Banco {}", numero) })
                .to_string(),
        ))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let banco: Value = serde_json::from_slice(&bytes).unwrap();
    banco["id"].as_i64().unwrap()
}

async fn create_pessoa_fisica(router: &Router, nome: &str, cpf: &str) -> Cliente {
    let (status, body) = call(
        router,
        "POST",
        "/cliente-pessoa-fisica/save",
        Some(pessoa_fisica(nome, cpf)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    serde_json::from_value(body).unwrap()
}

fn catalog() -> &'static MessageCatalog {
    install_test_catalog()
}

fn cause(key: &str) -> String {
    catalog().get(key).unwrap().to_string()
}

#[tokio::test]
async fn test_invalid_cpf_reports_cpf_detail() {
    let router = create_test_router();

    let (status, body) = call(
        &router,
        "POST",
        "/cliente-pessoa-fisica/save",
        Some(pessoa_fisica("Maria", "00000000000")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert_eq!(body["cause"], cause("cause.field_validation"));

    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(
        details[0],
        format!("cpf: {}", cause("cliente_pessoa_fisica.cpf.invalido"))
    );
}

#[tokio::test]
async fn test_nested_address_errors_are_prefixed() {
    let router = create_test_router();

    let mut payload = pessoa_fisica("Maria", "11144477735");
    payload["endereco"]["cep"] = json!("0131100");
    payload["endereco"]["estado"] = json!("SAO");

    let (status, body) = call(&router, "POST", "/cliente-pessoa-fisica/save", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["details"],
        json!([
            format!("endereco.cep: {}", cause("endereco.cep.invalido")),
            format!("endereco.estado: {}", cause("endereco.estado.invalido")),
        ])
    );
}

#[tokio::test]
async fn test_cliente_crud_and_kind_separation() {
    let router = create_test_router();
    let maria = create_pessoa_fisica(&router, "Maria", "11144477735").await;
    assert_eq!(maria.cpf.as_deref(), Some("11144477735"));

    let (status, body) = call(
        &router,
        "GET",
        &format!("/cliente-pessoa-fisica/show/{}", maria.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Maria");
    assert_eq!(body["status"], "A");
    assert!(body.get("cnpj").is_none());

    let (status, _) = call(
        &router,
        "GET",
        &format!("/cliente-pessoa-juridica/show/{}", maria.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut changed = pessoa_fisica("Maria Souza", "11144477735");
    changed["status"] = json!("I");
    let (status, body) = call(
        &router,
        "PUT",
        &format!("/cliente-pessoa-fisica/update/{}", maria.id),
        Some(changed),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Maria Souza");
    assert_eq!(body["status"], "I");

    let (status, _) = call(
        &router,
        "DELETE",
        &format!("/cliente-pessoa-fisica/delete/{}", maria.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_pessoa_juridica_flow() {
    let router = create_test_router();

    let payload = json!({
        "nome": "Padaria Pão Quente Ltda",
        "status": "A",
        "cnpj": "11222333000181",
        "endereco": endereco()
    });
    let (status, body) = call(&router, "POST", "/cliente-pessoa-juridica/save", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tipo"], "J");

    let (status, body) = call(&router, "POST", "/cliente-pessoa-juridica/save", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.not_unique"));

    let (status, body) = call(&router, "GET", "/cliente-pessoa-juridica/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = call(&router, "GET", "/cliente-pessoa-fisica/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_conta_corrente_flow() {
    let router = create_test_router();
    let banco_id = create_banco(&router, 10, "00000000000191").await;
    let maria = create_pessoa_fisica(&router, "Maria", "11144477735").await;
    let joao = create_pessoa_fisica(&router, "João", "52998224725").await;

    let (status, body) = call(
        &router,
        "POST",
        "/conta-corrente/save",
        Some(json!({ "numero": 1001, "banco_id": banco_id, "saldo": 50.0, "clientes": [maria.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let conta: Conta = serde_json::from_value(body).unwrap();
    assert_eq!(conta.clientes, vec![maria.id]);

    let (status, body) = call(
        &router,
        "POST",
        &format!("/conta-corrente/{}/cliente/{}", conta.id, joao.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientes"], json!([maria.id, joao.id]));

    let (status, body) = call(
        &router,
        "DELETE",
        &format!("/conta-corrente/{}/cliente/{}", conta.id, maria.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientes"], json!([joao.id]));

    let (status, body) = call(
        &router,
        "DELETE",
        &format!("/conta-corrente/{}/cliente/{}", conta.id, maria.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.no_account_ownership"));

    let (status, body) = call(
        &router,
        "DELETE",
        &format!("/conta-corrente/{}/cliente/{}", conta.id, joao.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.empty_collection"));

    let (status, _) = call(
        &router,
        "GET",
        &format!("/conta-poupanca/show/{}", conta.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &router,
        "DELETE",
        &format!("/banco/delete/{}", banco_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_conta_poupanca_rules() {
    let router = create_test_router();
    let banco_id = create_banco(&router, 10, "00000000000191").await;
    let maria = create_pessoa_fisica(&router, "Maria", "11144477735").await;
    let joao = create_pessoa_fisica(&router, "João", "52998224725").await;

    let (status, body) = call(
        &router,
        "POST",
        "/conta-poupanca/save",
        Some(json!({ "numero": 2001, "banco_id": banco_id, "saldo": 0.0, "clientes": [maria.id, joao.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.more_than_one_account_client"));

    let (status, body) = call(
        &router,
        "POST",
        "/conta-poupanca/save",
        Some(json!({ "numero": 2001, "banco_id": banco_id, "saldo": 0.0, "clientes": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.empty_collection"));

    let (status, _) = call(
        &router,
        "POST",
        "/conta-poupanca/save",
        Some(json!({ "numero": 2001, "banco_id": banco_id, "saldo": 0.0, "clientes": [maria.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        &router,
        "POST",
        "/conta-poupanca/save",
        Some(json!({ "numero": 2002, "banco_id": banco_id, "saldo": 0.0, "clientes": [maria.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.more_than_one_account_ownership"));

    let (status, body) = call(
        &router,
        "POST",
        "/conta-poupanca/save",
        Some(json!({ "numero": 2003, "banco_id": 999, "saldo": 0.0, "clientes": [joao.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["cause"], cause("cause.not_found"));

    let (status, body) = call(
        &router,
        "DELETE",
        &format!("/cliente-pessoa-fisica/delete/{}", maria.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["cause"], cause("cause.not_empty_collection"));
}

#[tokio::test]
async fn test_conta_missing_fields() {
    let router = create_test_router();

    let (status, body) = call(&router, "POST", "/conta-corrente/save", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["details"],
        json!([
            format!("banco_id: {}", cause("conta.banco.obrigatorio")),
            format!("numero: {}", cause("conta.numero.obrigatorio")),
            format!("saldo: {}", cause("conta.saldo.obrigatorio")),
        ])
    );
}
