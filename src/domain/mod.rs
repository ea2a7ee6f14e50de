//! Domain layer containing core business types, traits, validators and
//! error definitions.

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{
    AppError, AppResult, BODY_PATH, ConfigError, DatabaseError, DomainError, ErrorKind,
    ValidationError,
};
pub use traits::{AccessTokenVerifier, DatabaseClient};
pub use types::{
    Banco, BancoRequest, Cliente, ClientePessoaFisicaRequest, ClientePessoaJuridicaRequest,
    ClienteStatus, Conta, ContaRequest, Endereco, EnderecoRequest, ErrorDetails, ErrorResponse,
    HealthResponse, HealthStatus, NovaConta, NovoBanco, NovoCliente, Role, TipoCliente, TipoConta,
};
