use aplicacao_financeira::api::classify;
use aplicacao_financeira::domain::validation::{is_valid_cep, is_valid_cnpj, is_valid_cpf};
use aplicacao_financeira::domain::{
    AppError, ClientePessoaFisicaRequest, EnderecoRequest, ValidationError,
};
use aplicacao_financeira::infra::MessageCatalog;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use validator::Validate;

fn bench_document_validators(c: &mut Criterion) {
    c.bench_function("is_valid_cpf", |b| {
        b.iter(|| is_valid_cpf(black_box("11144477735")))
    });
    c.bench_function("is_valid_cnpj", |b| {
        b.iter(|| is_valid_cnpj(black_box("11222333000181")))
    });
    c.bench_function("is_valid_cep", |b| {
        b.iter(|| is_valid_cep(black_box("01310-100")))
    });
}

fn bench_request_validation(c: &mut Criterion) {
    let request = ClientePessoaFisicaRequest {
        nome: Some("Maria da Silva".to_string()),
        status: Some("A".to_string()),
        rg: Some("123456789".to_string()),
        cpf: Some("11144477735".to_string()),
        endereco: EnderecoRequest {
            logradouro: Some("Avenida Paulista".to_string()),
            numero: Some("1578".to_string()),
            complemento: None,
            bairro: Some("Bela Vista".to_string()),
            cep: Some("01310-200".to_string()),
            cidade: Some("São Paulo".to_string()),
            estado: Some("SP".to_string()),
        },
    };

    c.bench_function("validate_cliente_pessoa_fisica", |b| {
        b.iter(|| {
            let _ = black_box(&request).validate();
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let catalog = MessageCatalog::for_locale("pt-BR").expect("embedded catalog");
    let errors = ClientePessoaFisicaRequest::default()
        .validate()
        .expect_err("empty request is invalid");
    let error = AppError::Validation(ValidationError::Fields(errors));

    c.bench_function("classify_field_errors", |b| {
        b.iter(|| classify(black_box(&error), &catalog))
    });
}

criterion_group!(
    benches,
    bench_document_validators,
    bench_request_validation,
    bench_classify
);
criterion_main!(benches);
