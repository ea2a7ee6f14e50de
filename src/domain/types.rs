//! Domain types with validation support.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::ValidationError;
use super::validation::{validate_cep, validate_cliente_status, validate_cnpj, validate_cpf};

/// Client status code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
pub enum ClienteStatus {
    /// Active client
    #[default]
    #[serde(rename = "A")]
    Ativo,
    /// Inactive client
    #[serde(rename = "I")]
    Inativo,
}

impl ClienteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ativo => "A",
            Self::Inativo => "I",
        }
    }
}

impl std::str::FromStr for ClienteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::Ativo),
            "I" => Ok(Self::Inativo),
            _ => Err(format!("Invalid client status: {}", s)),
        }
    }
}

impl std::fmt::Display for ClienteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of client, stored as a single-character discriminator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum TipoCliente {
    /// Individual (pessoa física)
    #[serde(rename = "F")]
    PessoaFisica,
    /// Company (pessoa jurídica)
    #[serde(rename = "J")]
    PessoaJuridica,
}

impl TipoCliente {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PessoaFisica => "F",
            Self::PessoaJuridica => "J",
        }
    }

    /// Human-readable name used in detail messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::PessoaFisica => "Cliente pessoa física",
            Self::PessoaJuridica => "Cliente pessoa jurídica",
        }
    }
}

impl std::str::FromStr for TipoCliente {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(Self::PessoaFisica),
            "J" => Ok(Self::PessoaJuridica),
            _ => Err(format!("Invalid client kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TipoCliente {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of bank account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TipoConta {
    /// Checking account
    Corrente,
    /// Savings account, limited to a single holder
    Poupanca,
}

impl TipoConta {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corrente => "corrente",
            Self::Poupanca => "poupanca",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Corrente => "Conta corrente",
            Self::Poupanca => "Conta poupança",
        }
    }
}

impl std::str::FromStr for TipoConta {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corrente" => Ok(Self::Corrente),
            "poupanca" => Ok(Self::Poupanca),
            _ => Err(format!("Invalid account kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TipoConta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access role resolved from the request token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Funcionario,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Funcionario => "FUNCIONARIO",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "FUNCIONARIO" => Ok(Self::Funcionario),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bank entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Banco {
    #[schema(example = 1)]
    pub id: i64,
    /// Bank code
    #[schema(example = 10)]
    pub numero: i32,
    #[schema(example = "00000000000191")]
    pub cnpj: String,
    #[schema(example = "Banco do Brasil")]
    pub nome: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated bank data ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovoBanco {
    pub numero: i32,
    pub cnpj: String,
    pub nome: String,
}

/// Request body for creating or updating a bank
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BancoRequest {
    #[validate(
        required(message = "banco.numero.obrigatorio"),
        range(min = 1, message = "banco.numero.invalido")
    )]
    #[schema(example = 10)]
    pub numero: Option<i32>,
    #[validate(
        required(message = "banco.cnpj.obrigatorio"),
        length(min = 1, message = "banco.cnpj.obrigatorio"),
        custom(function = "validate_cnpj", message = "banco.cnpj.invalido")
    )]
    #[schema(example = "00000000000191")]
    pub cnpj: Option<String>,
    #[validate(
        required(message = "banco.nome.obrigatorio"),
        length(min = 1, max = 255, message = "banco.nome.tamanho")
    )]
    #[schema(example = "Banco do Brasil")]
    pub nome: Option<String>,
}

impl BancoRequest {
    /// Run the declared field constraints and produce typed data
    pub fn into_validated(self) -> Result<NovoBanco, ValidationError> {
        self.validate()?;
        Ok(NovoBanco {
            numero: self.numero.unwrap_or_default(),
            cnpj: self.cnpj.unwrap_or_default(),
            nome: self.nome.unwrap_or_default(),
        })
    }
}

/// Postal address embedded in a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Endereco {
    #[schema(example = "Rodovia Washington Luís")]
    pub logradouro: String,
    #[schema(example = "km 235")]
    pub numero: String,
    pub complemento: Option<String>,
    #[schema(example = "Monjolinho")]
    pub bairro: String,
    #[schema(example = "13565-905")]
    pub cep: String,
    #[schema(example = "São Carlos")]
    pub cidade: String,
    #[schema(example = "SP")]
    pub estado: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct EnderecoRequest {
    #[validate(required(message = "endereco.logradouro.obrigatorio"))]
    pub logradouro: Option<String>,
    #[validate(required(message = "endereco.numero.obrigatorio"))]
    pub numero: Option<String>,
    pub complemento: Option<String>,
    #[validate(required(message = "endereco.bairro.obrigatorio"))]
    pub bairro: Option<String>,
    #[validate(
        required(message = "endereco.cep.obrigatorio"),
        custom(function = "validate_cep", message = "endereco.cep.invalido")
    )]
    #[schema(example = "13565-905")]
    pub cep: Option<String>,
    #[validate(required(message = "endereco.cidade.obrigatorio"))]
    pub cidade: Option<String>,
    #[validate(
        required(message = "endereco.estado.obrigatorio"),
        length(equal = 2, message = "endereco.estado.invalido")
    )]
    #[schema(example = "SP")]
    pub estado: Option<String>,
}

impl EnderecoRequest {
    fn into_endereco(self) -> Endereco {
        Endereco {
            logradouro: self.logradouro.unwrap_or_default(),
            numero: self.numero.unwrap_or_default(),
            complemento: self.complemento.filter(|c| !c.is_empty()),
            bairro: self.bairro.unwrap_or_default(),
            cep: self.cep.unwrap_or_default(),
            cidade: self.cidade.unwrap_or_default(),
            estado: self.estado.unwrap_or_default(),
        }
    }
}

/// Client entity (both kinds share one table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Cliente {
    #[schema(example = 1)]
    pub id: i64,
    pub tipo: TipoCliente,
    #[schema(example = "Maria da Silva")]
    pub nome: String,
    pub status: ClienteStatus,
    pub endereco: Endereco,
    /// Identity document number (pessoa física only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rg: Option<String>,
    /// Individual taxpayer number (pessoa física only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "11144477735")]
    pub cpf: Option<String>,
    /// Company registry number (pessoa jurídica only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cliente {
    /// CPF or CNPJ depending on the client kind
    pub fn documento(&self) -> Option<&str> {
        match self.tipo {
            TipoCliente::PessoaFisica => self.cpf.as_deref(),
            TipoCliente::PessoaJuridica => self.cnpj.as_deref(),
        }
    }
}

/// Validated client data ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovoCliente {
    pub tipo: TipoCliente,
    pub nome: String,
    pub status: ClienteStatus,
    pub endereco: Endereco,
    pub rg: Option<String>,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
}

impl NovoCliente {
    pub fn documento(&self) -> &str {
        match self.tipo {
            TipoCliente::PessoaFisica => self.cpf.as_deref().unwrap_or_default(),
            TipoCliente::PessoaJuridica => self.cnpj.as_deref().unwrap_or_default(),
        }
    }
}

/// Request body for creating or updating an individual client
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClientePessoaFisicaRequest {
    #[validate(
        required(message = "cliente.nome.obrigatorio"),
        length(min = 1, max = 255, message = "cliente.nome.tamanho")
    )]
    #[schema(example = "Maria da Silva")]
    pub nome: Option<String>,
    #[validate(
        required(message = "cliente.status.obrigatorio"),
        custom(function = "validate_cliente_status", message = "cliente.status.invalido")
    )]
    #[schema(example = "A")]
    pub status: Option<String>,
    #[validate(
        required(message = "cliente_pessoa_fisica.rg.obrigatorio"),
        length(min = 1, max = 20, message = "cliente_pessoa_fisica.rg.tamanho")
    )]
    #[schema(example = "123456789")]
    pub rg: Option<String>,
    #[validate(
        required(message = "cliente_pessoa_fisica.cpf.obrigatorio"),
        length(min = 1, message = "cliente_pessoa_fisica.cpf.obrigatorio"),
        custom(function = "validate_cpf", message = "cliente_pessoa_fisica.cpf.invalido")
    )]
    #[schema(example = "11144477735")]
    pub cpf: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub endereco: EnderecoRequest,
}

impl ClientePessoaFisicaRequest {
    pub fn into_validated(self) -> Result<NovoCliente, ValidationError> {
        self.validate()?;
        Ok(NovoCliente {
            tipo: TipoCliente::PessoaFisica,
            nome: self.nome.unwrap_or_default(),
            status: parse_status(self.status),
            endereco: self.endereco.into_endereco(),
            rg: self.rg,
            cpf: self.cpf,
            cnpj: None,
        })
    }
}

/// Request body for creating or updating a company client
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClientePessoaJuridicaRequest {
    #[validate(
        required(message = "cliente.nome.obrigatorio"),
        length(min = 1, max = 255, message = "cliente.nome.tamanho")
    )]
    #[schema(example = "Padaria Pão Quente Ltda")]
    pub nome: Option<String>,
    #[validate(
        required(message = "cliente.status.obrigatorio"),
        custom(function = "validate_cliente_status", message = "cliente.status.invalido")
    )]
    #[schema(example = "A")]
    pub status: Option<String>,
    #[validate(
        required(message = "cliente_pessoa_juridica.cnpj.obrigatorio"),
        length(min = 1, message = "cliente_pessoa_juridica.cnpj.obrigatorio"),
        custom(function = "validate_cnpj", message = "cliente_pessoa_juridica.cnpj.invalido")
    )]
    #[schema(example = "11222333000181")]
    pub cnpj: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub endereco: EnderecoRequest,
}

impl ClientePessoaJuridicaRequest {
    pub fn into_validated(self) -> Result<NovoCliente, ValidationError> {
        self.validate()?;
        Ok(NovoCliente {
            tipo: TipoCliente::PessoaJuridica,
            nome: self.nome.unwrap_or_default(),
            status: parse_status(self.status),
            endereco: self.endereco.into_endereco(),
            rg: None,
            cpf: None,
            cnpj: self.cnpj,
        })
    }
}

impl TryFrom<ClientePessoaFisicaRequest> for NovoCliente {
    type Error = ValidationError;

    fn try_from(request: ClientePessoaFisicaRequest) -> Result<Self, Self::Error> {
        request.into_validated()
    }
}

impl TryFrom<ClientePessoaJuridicaRequest> for NovoCliente {
    type Error = ValidationError;

    fn try_from(request: ClientePessoaJuridicaRequest) -> Result<Self, Self::Error> {
        request.into_validated()
    }
}

// Only called after the status constraint has passed.
fn parse_status(status: Option<String>) -> ClienteStatus {
    status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Bank account entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Conta {
    #[schema(example = 1)]
    pub id: i64,
    pub tipo: TipoConta,
    #[schema(example = 12345)]
    pub numero: i32,
    #[schema(example = 1)]
    pub banco_id: i64,
    #[schema(example = 1500.0)]
    pub saldo: f64,
    /// Ids of the account holders
    pub clientes: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conta {
    pub fn is_titular(&self, cliente_id: i64) -> bool {
        self.clientes.contains(&cliente_id)
    }
}

/// Validated account data ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NovaConta {
    pub tipo: TipoConta,
    pub numero: i32,
    pub banco_id: i64,
    pub saldo: f64,
    pub clientes: Vec<i64>,
}

impl NovaConta {
    /// Rebuild persistence data from an existing account with a new holder list
    pub fn from_conta(conta: &Conta, clientes: Vec<i64>) -> Self {
        Self {
            tipo: conta.tipo,
            numero: conta.numero,
            banco_id: conta.banco_id,
            saldo: conta.saldo,
            clientes,
        }
    }
}

/// Request body for creating or updating an account.
///
/// The account kind comes from the route.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContaRequest {
    #[validate(
        required(message = "conta.numero.obrigatorio"),
        range(min = 1, message = "conta.numero.invalido")
    )]
    #[schema(example = 12345)]
    pub numero: Option<i32>,
    #[validate(required(message = "conta.banco.obrigatorio"))]
    #[schema(example = 1)]
    pub banco_id: Option<i64>,
    #[validate(required(message = "conta.saldo.obrigatorio"))]
    #[schema(example = 1500.0)]
    pub saldo: Option<f64>,
    /// Ids of the account holders
    #[serde(default)]
    pub clientes: Vec<i64>,
}

impl ContaRequest {
    pub fn into_validated(self, tipo: TipoConta) -> Result<NovaConta, ValidationError> {
        self.validate()?;
        let mut seen = HashSet::new();
        let mut clientes = self.clientes;
        clientes.retain(|id| seen.insert(*id));
        Ok(NovaConta {
            tipo,
            numero: self.numero.unwrap_or_default(),
            banco_id: self.banco_id.unwrap_or_default(),
            saldo: self.saldo.unwrap_or_default(),
            clientes,
        })
    }
}

/// Health status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems unavailable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system status
    pub status: HealthStatus,
    /// Database health status
    pub database: HealthStatus,
    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database: HealthStatus) -> Self {
        Self {
            status: database,
            database,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error details: a single message or an ordered list of `field: message` lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(untagged)]
pub enum ErrorDetails {
    Single(String),
    List(Vec<String>),
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    #[schema(example = 422)]
    pub status: u16,
    /// Localized cause of the failure
    #[schema(example = "Já existe um registro com os dados fornecidos")]
    pub cause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}
