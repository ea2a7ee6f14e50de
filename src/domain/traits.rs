//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{
    Banco, Cliente, Conta, NovaConta, NovoBanco, NovoCliente, Role, TipoCliente, TipoConta,
};

/// Database client trait for persistence operations.
///
/// Lookups return `Ok(None)` for unknown ids; deciding whether that is an
/// error belongs to the service layer.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// List all banks ordered by name
    async fn list_bancos(&self) -> Result<Vec<Banco>, AppError>;

    async fn get_banco(&self, id: i64) -> Result<Option<Banco>, AppError>;

    async fn find_banco_by_numero(&self, numero: i32) -> Result<Option<Banco>, AppError>;

    async fn find_banco_by_cnpj(&self, cnpj: &str) -> Result<Option<Banco>, AppError>;

    async fn insert_banco(&self, data: &NovoBanco) -> Result<Banco, AppError>;

    /// Replace a bank's data, returning `None` if it does not exist
    async fn update_banco(&self, id: i64, data: &NovoBanco) -> Result<Option<Banco>, AppError>;

    /// Delete a bank, returning whether a row was removed
    async fn delete_banco(&self, id: i64) -> Result<bool, AppError>;

    /// List clients of one kind ordered by name
    async fn list_clientes(&self, tipo: TipoCliente) -> Result<Vec<Cliente>, AppError>;

    async fn get_cliente(&self, id: i64) -> Result<Option<Cliente>, AppError>;

    /// Find a client of the given kind by CPF (pessoa física) or CNPJ (pessoa jurídica)
    async fn find_cliente_by_documento(
        &self,
        tipo: TipoCliente,
        documento: &str,
    ) -> Result<Option<Cliente>, AppError>;

    async fn insert_cliente(&self, data: &NovoCliente) -> Result<Cliente, AppError>;

    async fn update_cliente(
        &self,
        id: i64,
        data: &NovoCliente,
    ) -> Result<Option<Cliente>, AppError>;

    async fn delete_cliente(&self, id: i64) -> Result<bool, AppError>;

    /// List accounts of one kind ordered by number
    async fn list_contas(&self, tipo: TipoConta) -> Result<Vec<Conta>, AppError>;

    async fn get_conta(&self, id: i64) -> Result<Option<Conta>, AppError>;

    async fn find_conta_by_numero(&self, numero: i32) -> Result<Option<Conta>, AppError>;

    /// All accounts of any kind held at a bank
    async fn list_contas_by_banco(&self, banco_id: i64) -> Result<Vec<Conta>, AppError>;

    /// All accounts of any kind a client is a holder of
    async fn list_contas_by_cliente(&self, cliente_id: i64) -> Result<Vec<Conta>, AppError>;

    /// Insert an account together with its holder links
    async fn insert_conta(&self, data: &NovaConta) -> Result<Conta, AppError>;

    /// Replace an account's data and holder links
    async fn update_conta(&self, id: i64, data: &NovaConta) -> Result<Option<Conta>, AppError>;

    async fn delete_conta(&self, id: i64) -> Result<bool, AppError>;
}

/// Resolves the `token` request header to a role.
///
/// Token issuance lives outside this service; implementations only answer
/// whether a presented token is known.
pub trait AccessTokenVerifier: Send + Sync {
    /// Returns the role bound to `token`, or `None` if it is not recognized
    fn verify(&self, token: &str) -> Option<Role>;
}
