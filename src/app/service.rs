//! Application service layer: validation and business rules for banks,
//! clients and accounts.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::domain::{
    AppError, Banco, BancoRequest, Cliente, Conta, ContaRequest, DatabaseClient, DomainError,
    HealthResponse, HealthStatus, NovaConta, NovoBanco, NovoCliente, TipoCliente, TipoConta,
    ValidationError,
};

/// Application service containing business logic
pub struct AppService {
    db_client: Arc<dyn DatabaseClient>,
}

fn rejected_input(e: ValidationError) -> AppError {
    warn!(error = %e, "Validation failed");
    AppError::Validation(e)
}

fn banco_not_found(id: i64) -> AppError {
    DomainError::NotFound(format!("Banco {} não encontrado", id)).into()
}

fn cliente_not_found(tipo: TipoCliente, id: i64) -> AppError {
    DomainError::NotFound(format!("{} {} não encontrado", tipo.label(), id)).into()
}

fn conta_not_found(tipo: TipoConta, id: i64) -> AppError {
    DomainError::NotFound(format!("{} {} não encontrada", tipo.label(), id)).into()
}

impl AppService {
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>) -> Self {
        Self { db_client }
    }

    /// Check database health
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let database = match self.db_client.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                error!(error = %e, "Database health check failed");
                HealthStatus::Unhealthy
            }
        };
        HealthResponse::new(database)
    }

    // ------------------------------------------------------------------
    // Bancos
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_bancos(&self) -> Result<Vec<Banco>, AppError> {
        self.db_client.list_bancos().await
    }

    #[instrument(skip(self))]
    pub async fn get_banco(&self, id: i64) -> Result<Banco, AppError> {
        self.db_client
            .get_banco(id)
            .await?
            .ok_or_else(|| banco_not_found(id))
    }

    #[instrument(skip(self, request))]
    pub async fn create_banco(&self, request: BancoRequest) -> Result<Banco, AppError> {
        let data = request.into_validated().map_err(rejected_input)?;
        self.ensure_banco_unique(&data, None).await?;

        let banco = self.db_client.insert_banco(&data).await?;
        info!(id = banco.id, numero = banco.numero, "Banco created");
        Ok(banco)
    }

    #[instrument(skip(self, request))]
    pub async fn update_banco(&self, id: i64, request: BancoRequest) -> Result<Banco, AppError> {
        let data = request.into_validated().map_err(rejected_input)?;
        self.get_banco(id).await?;
        self.ensure_banco_unique(&data, Some(id)).await?;

        let banco = self
            .db_client
            .update_banco(id, &data)
            .await?
            .ok_or_else(|| banco_not_found(id))?;
        info!(id, "Banco updated");
        Ok(banco)
    }

    #[instrument(skip(self))]
    pub async fn delete_banco(&self, id: i64) -> Result<(), AppError> {
        let banco = self.get_banco(id).await?;

        let contas = self.db_client.list_contas_by_banco(id).await?;
        if !contas.is_empty() {
            warn!(id, contas = contas.len(), "Refusing to delete bank with accounts");
            return Err(DomainError::NotEmptyCollection(format!(
                "O banco {} possui {} conta(s) vinculada(s)",
                banco.nome,
                contas.len()
            ))
            .into());
        }

        if !self.db_client.delete_banco(id).await? {
            return Err(banco_not_found(id));
        }
        info!(id, "Banco deleted");
        Ok(())
    }

    async fn ensure_banco_unique(&self, data: &NovoBanco, id: Option<i64>) -> Result<(), AppError> {
        if let Some(other) = self.db_client.find_banco_by_numero(data.numero).await?
            && Some(other.id) != id
        {
            warn!(numero = data.numero, "Duplicate bank number");
            return Err(DomainError::NotUnique(format!(
                "Já existe um banco com o número {}",
                data.numero
            ))
            .into());
        }
        if let Some(other) = self.db_client.find_banco_by_cnpj(&data.cnpj).await?
            && Some(other.id) != id
        {
            warn!("Duplicate bank CNPJ");
            return Err(DomainError::NotUnique(format!(
                "Já existe um banco com o CNPJ {}",
                data.cnpj
            ))
            .into());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Clientes
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_clientes(&self, tipo: TipoCliente) -> Result<Vec<Cliente>, AppError> {
        self.db_client.list_clientes(tipo).await
    }

    /// Fetch a client, treating a client of the other kind as missing
    #[instrument(skip(self))]
    pub async fn get_cliente(&self, tipo: TipoCliente, id: i64) -> Result<Cliente, AppError> {
        self.db_client
            .get_cliente(id)
            .await?
            .filter(|c| c.tipo == tipo)
            .ok_or_else(|| cliente_not_found(tipo, id))
    }

    #[instrument(skip(self, request))]
    pub async fn create_cliente<R>(&self, request: R) -> Result<Cliente, AppError>
    where
        R: TryInto<NovoCliente, Error = ValidationError> + Send,
    {
        let data: NovoCliente = request.try_into().map_err(rejected_input)?;
        self.ensure_cliente_unique(&data, None).await?;

        let cliente = self.db_client.insert_cliente(&data).await?;
        info!(id = cliente.id, tipo = %cliente.tipo, "Cliente created");
        Ok(cliente)
    }

    #[instrument(skip(self, request))]
    pub async fn update_cliente<R>(&self, id: i64, request: R) -> Result<Cliente, AppError>
    where
        R: TryInto<NovoCliente, Error = ValidationError> + Send,
    {
        let data: NovoCliente = request.try_into().map_err(rejected_input)?;
        self.get_cliente(data.tipo, id).await?;
        self.ensure_cliente_unique(&data, Some(id)).await?;

        let cliente = self
            .db_client
            .update_cliente(id, &data)
            .await?
            .ok_or_else(|| cliente_not_found(data.tipo, id))?;
        info!(id, "Cliente updated");
        Ok(cliente)
    }

    #[instrument(skip(self))]
    pub async fn delete_cliente(&self, tipo: TipoCliente, id: i64) -> Result<(), AppError> {
        let cliente = self.get_cliente(tipo, id).await?;

        let contas = self.db_client.list_contas_by_cliente(id).await?;
        if !contas.is_empty() {
            warn!(id, contas = contas.len(), "Refusing to delete client holding accounts");
            return Err(DomainError::NotEmptyCollection(format!(
                "O cliente {} é titular de {} conta(s)",
                cliente.nome,
                contas.len()
            ))
            .into());
        }

        if !self.db_client.delete_cliente(id).await? {
            return Err(cliente_not_found(tipo, id));
        }
        info!(id, "Cliente deleted");
        Ok(())
    }

    async fn ensure_cliente_unique(
        &self,
        data: &NovoCliente,
        id: Option<i64>,
    ) -> Result<(), AppError> {
        let documento = data.documento();
        if let Some(other) = self
            .db_client
            .find_cliente_by_documento(data.tipo, documento)
            .await?
            && Some(other.id) != id
        {
            warn!(tipo = %data.tipo, "Duplicate client document");
            let nome = match data.tipo {
                TipoCliente::PessoaFisica => "CPF",
                TipoCliente::PessoaJuridica => "CNPJ",
            };
            return Err(DomainError::NotUnique(format!(
                "Já existe um cliente com o {} {}",
                nome, documento
            ))
            .into());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Contas
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_contas(&self, tipo: TipoConta) -> Result<Vec<Conta>, AppError> {
        self.db_client.list_contas(tipo).await
    }

    /// Fetch an account, treating an account of the other kind as missing
    #[instrument(skip(self))]
    pub async fn get_conta(&self, tipo: TipoConta, id: i64) -> Result<Conta, AppError> {
        self.db_client
            .get_conta(id)
            .await?
            .filter(|c| c.tipo == tipo)
            .ok_or_else(|| conta_not_found(tipo, id))
    }

    #[instrument(skip(self, request))]
    pub async fn create_conta(
        &self,
        tipo: TipoConta,
        request: ContaRequest,
    ) -> Result<Conta, AppError> {
        let data = request.into_validated(tipo).map_err(rejected_input)?;
        self.check_conta_rules(&data, None).await?;

        let conta = self.db_client.insert_conta(&data).await?;
        info!(id = conta.id, numero = conta.numero, tipo = %tipo, "Conta created");
        Ok(conta)
    }

    #[instrument(skip(self, request))]
    pub async fn update_conta(
        &self,
        tipo: TipoConta,
        id: i64,
        request: ContaRequest,
    ) -> Result<Conta, AppError> {
        let data = request.into_validated(tipo).map_err(rejected_input)?;
        self.get_conta(tipo, id).await?;
        self.check_conta_rules(&data, Some(id)).await?;

        let conta = self
            .db_client
            .update_conta(id, &data)
            .await?
            .ok_or_else(|| conta_not_found(tipo, id))?;
        info!(id, "Conta updated");
        Ok(conta)
    }

    #[instrument(skip(self))]
    pub async fn delete_conta(&self, tipo: TipoConta, id: i64) -> Result<(), AppError> {
        self.get_conta(tipo, id).await?;
        if !self.db_client.delete_conta(id).await? {
            return Err(conta_not_found(tipo, id));
        }
        info!(id, "Conta deleted");
        Ok(())
    }

    /// Add a holder to an existing account
    #[instrument(skip(self))]
    pub async fn add_titular(
        &self,
        tipo: TipoConta,
        id: i64,
        cliente_id: i64,
    ) -> Result<Conta, AppError> {
        let conta = self.get_conta(tipo, id).await?;
        if conta.is_titular(cliente_id) {
            return Err(DomainError::NotUnique(format!(
                "O cliente {} já é titular da conta {}",
                cliente_id, conta.numero
            ))
            .into());
        }

        let mut clientes = conta.clientes.clone();
        clientes.push(cliente_id);
        let data = NovaConta::from_conta(&conta, clientes);
        self.check_conta_rules(&data, Some(id)).await?;

        let conta = self
            .db_client
            .update_conta(id, &data)
            .await?
            .ok_or_else(|| conta_not_found(tipo, id))?;
        info!(id, cliente_id, "Holder added");
        Ok(conta)
    }

    /// Remove a holder from an existing account; the last holder cannot be removed
    #[instrument(skip(self))]
    pub async fn remove_titular(
        &self,
        tipo: TipoConta,
        id: i64,
        cliente_id: i64,
    ) -> Result<Conta, AppError> {
        let conta = self.get_conta(tipo, id).await?;
        if !conta.is_titular(cliente_id) {
            warn!(id, cliente_id, "Client is not an account holder");
            return Err(DomainError::NoAccountOwnership(format!(
                "O cliente {} não é titular da conta {}",
                cliente_id, conta.numero
            ))
            .into());
        }
        if conta.clientes.len() == 1 {
            return Err(DomainError::EmptyCollection(format!(
                "A conta {} deve possuir ao menos um titular",
                conta.numero
            ))
            .into());
        }

        let clientes = conta
            .clientes
            .iter()
            .copied()
            .filter(|c| *c != cliente_id)
            .collect();
        let data = NovaConta::from_conta(&conta, clientes);

        let conta = self
            .db_client
            .update_conta(id, &data)
            .await?
            .ok_or_else(|| conta_not_found(tipo, id))?;
        info!(id, cliente_id, "Holder removed");
        Ok(conta)
    }

    /// Rules shared by create, update and holder changes. `id` is the account
    /// being modified, excluded from uniqueness and ownership checks.
    async fn check_conta_rules(&self, data: &NovaConta, id: Option<i64>) -> Result<(), AppError> {
        if data.clientes.is_empty() {
            return Err(DomainError::EmptyCollection(
                "A conta deve possuir ao menos um titular".to_string(),
            )
            .into());
        }
        if data.tipo == TipoConta::Poupanca && data.clientes.len() > 1 {
            return Err(DomainError::MoreThanOneAccountClient(
                "Uma conta poupança não pode possuir mais de um titular".to_string(),
            )
            .into());
        }

        let banco = self.get_banco(data.banco_id).await?;

        if let Some(other) = self.db_client.find_conta_by_numero(data.numero).await?
            && Some(other.id) != id
        {
            warn!(numero = data.numero, "Duplicate account number");
            return Err(DomainError::NotUnique(format!(
                "Já existe uma conta com o número {}",
                data.numero
            ))
            .into());
        }

        for cliente_id in &data.clientes {
            let cliente = self
                .db_client
                .get_cliente(*cliente_id)
                .await?
                .ok_or_else(|| {
                    AppError::from(DomainError::NotFound(format!(
                        "Cliente {} não encontrado",
                        cliente_id
                    )))
                })?;

            let owned = self.db_client.list_contas_by_cliente(cliente.id).await?;
            if owned
                .iter()
                .any(|c| c.tipo == data.tipo && c.banco_id == banco.id && Some(c.id) != id)
            {
                warn!(cliente_id, banco_id = banco.id, "Client already owns this kind of account");
                return Err(DomainError::MoreThanOneAccountOwnership(format!(
                    "O cliente {} já possui uma {} no banco {}",
                    cliente.nome,
                    data.tipo.label().to_lowercase(),
                    banco.nome
                ))
                .into());
            }
        }
        Ok(())
    }
}
