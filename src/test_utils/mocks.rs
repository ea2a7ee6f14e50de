//! Mock implementations for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{
    AppError, Banco, Cliente, Conta, DatabaseClient, DatabaseError, NovaConta, NovoBanco,
    NovoCliente, TipoCliente, TipoConta,
};

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub should_fail: bool,
    pub error_message: Option<String>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Default)]
struct MockStore {
    next_id: i64,
    bancos: BTreeMap<i64, Banco>,
    clientes: BTreeMap<i64, Cliente>,
    contas: BTreeMap<i64, Conta>,
}

impl MockStore {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory database client for testing
pub struct MockDatabaseClient {
    storage: Arc<Mutex<MockStore>>,
    config: MockConfig,
    is_healthy: AtomicBool,
}

impl MockDatabaseClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            storage: Arc::new(Mutex::new(MockStore::default())),
            config,
            is_healthy: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Number of stored accounts (for testing)
    pub fn conta_count(&self) -> usize {
        self.storage.lock().unwrap().contas.len()
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Unhealthy".to_string(),
            )));
        }
        self.check_should_fail()
    }

    async fn list_bancos(&self) -> Result<Vec<Banco>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        let bancos = storage.bancos.values().cloned().collect();
        Ok(sorted_by(bancos, |b: &Banco| (b.nome.clone(), b.id)))
    }

    async fn get_banco(&self, id: i64) -> Result<Option<Banco>, AppError> {
        self.check_should_fail()?;
        Ok(self.storage.lock().unwrap().bancos.get(&id).cloned())
    }

    async fn find_banco_by_numero(&self, numero: i32) -> Result<Option<Banco>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        Ok(storage.bancos.values().find(|b| b.numero == numero).cloned())
    }

    async fn find_banco_by_cnpj(&self, cnpj: &str) -> Result<Option<Banco>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        Ok(storage.bancos.values().find(|b| b.cnpj == cnpj).cloned())
    }

    async fn insert_banco(&self, data: &NovoBanco) -> Result<Banco, AppError> {
        self.check_should_fail()?;
        let mut storage = self.storage.lock().unwrap();
        let now = Utc::now();
        let banco = Banco {
            id: storage.next_id(),
            numero: data.numero,
            cnpj: data.cnpj.clone(),
            nome: data.nome.clone(),
            created_at: now,
            updated_at: now,
        };
        storage.bancos.insert(banco.id, banco.clone());
        Ok(banco)
    }

    async fn update_banco(&self, id: i64, data: &NovoBanco) -> Result<Option<Banco>, AppError> {
        self.check_should_fail()?;
        let mut storage = self.storage.lock().unwrap();
        Ok(storage.bancos.get_mut(&id).map(|banco| {
            banco.numero = data.numero;
            banco.cnpj = data.cnpj.clone();
            banco.nome = data.nome.clone();
            banco.updated_at = Utc::now();
            banco.clone()
        }))
    }

    async fn delete_banco(&self, id: i64) -> Result<bool, AppError> {
        self.check_should_fail()?;
        Ok(self.storage.lock().unwrap().bancos.remove(&id).is_some())
    }

    async fn list_clientes(&self, tipo: TipoCliente) -> Result<Vec<Cliente>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        let clientes = storage
            .clientes
            .values()
            .filter(|c| c.tipo == tipo)
            .cloned()
            .collect();
        Ok(sorted_by(clientes, |c: &Cliente| (c.nome.clone(), c.id)))
    }

    async fn get_cliente(&self, id: i64) -> Result<Option<Cliente>, AppError> {
        self.check_should_fail()?;
        Ok(self.storage.lock().unwrap().clientes.get(&id).cloned())
    }

    async fn find_cliente_by_documento(
        &self,
        tipo: TipoCliente,
        documento: &str,
    ) -> Result<Option<Cliente>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        Ok(storage
            .clientes
            .values()
            .find(|c| c.tipo == tipo && c.documento() == Some(documento))
            .cloned())
    }

    async fn insert_cliente(&self, data: &NovoCliente) -> Result<Cliente, AppError> {
        self.check_should_fail()?;
        let mut storage = self.storage.lock().unwrap();
        let now = Utc::now();
        let cliente = Cliente {
            id: storage.next_id(),
            tipo: data.tipo,
            nome: data.nome.clone(),
            status: data.status,
            endereco: data.endereco.clone(),
            rg: data.rg.clone(),
            cpf: data.cpf.clone(),
            cnpj: data.cnpj.clone(),
            created_at: now,
            updated_at: now,
        };
        storage.clientes.insert(cliente.id, cliente.clone());
        Ok(cliente)
    }

    async fn update_cliente(
        &self,
        id: i64,
        data: &NovoCliente,
    ) -> Result<Option<Cliente>, AppError> {
        self.check_should_fail()?;
        let mut storage = self.storage.lock().unwrap();
        Ok(storage
            .clientes
            .get_mut(&id)
            .filter(|c| c.tipo == data.tipo)
            .map(|cliente| {
                cliente.nome = data.nome.clone();
                cliente.status = data.status;
                cliente.endereco = data.endereco.clone();
                cliente.rg = data.rg.clone();
                cliente.cpf = data.cpf.clone();
                cliente.cnpj = data.cnpj.clone();
                cliente.updated_at = Utc::now();
                cliente.clone()
            }))
    }

    async fn delete_cliente(&self, id: i64) -> Result<bool, AppError> {
        self.check_should_fail()?;
        Ok(self.storage.lock().unwrap().clientes.remove(&id).is_some())
    }

    async fn list_contas(&self, tipo: TipoConta) -> Result<Vec<Conta>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        let contas = storage
            .contas
            .values()
            .filter(|c| c.tipo == tipo)
            .cloned()
            .collect();
        Ok(sorted_by(contas, |c: &Conta| c.numero))
    }

    async fn get_conta(&self, id: i64) -> Result<Option<Conta>, AppError> {
        self.check_should_fail()?;
        Ok(self.storage.lock().unwrap().contas.get(&id).cloned())
    }

    async fn find_conta_by_numero(&self, numero: i32) -> Result<Option<Conta>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        Ok(storage.contas.values().find(|c| c.numero == numero).cloned())
    }

    async fn list_contas_by_banco(&self, banco_id: i64) -> Result<Vec<Conta>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        let contas = storage
            .contas
            .values()
            .filter(|c| c.banco_id == banco_id)
            .cloned()
            .collect();
        Ok(sorted_by(contas, |c: &Conta| c.numero))
    }

    async fn list_contas_by_cliente(&self, cliente_id: i64) -> Result<Vec<Conta>, AppError> {
        self.check_should_fail()?;
        let storage = self.storage.lock().unwrap();
        let contas = storage
            .contas
            .values()
            .filter(|c| c.is_titular(cliente_id))
            .cloned()
            .collect();
        Ok(sorted_by(contas, |c: &Conta| c.numero))
    }

    async fn insert_conta(&self, data: &NovaConta) -> Result<Conta, AppError> {
        self.check_should_fail()?;
        let mut storage = self.storage.lock().unwrap();
        let now = Utc::now();
        let conta = Conta {
            id: storage.next_id(),
            tipo: data.tipo,
            numero: data.numero,
            banco_id: data.banco_id,
            saldo: data.saldo,
            clientes: data.clientes.clone(),
            created_at: now,
            updated_at: now,
        };
        storage.contas.insert(conta.id, conta.clone());
        Ok(conta)
    }

    async fn update_conta(&self, id: i64, data: &NovaConta) -> Result<Option<Conta>, AppError> {
        self.check_should_fail()?;
        let mut storage = self.storage.lock().unwrap();
        Ok(storage
            .contas
            .get_mut(&id)
            .filter(|c| c.tipo == data.tipo)
            .map(|conta| {
                conta.numero = data.numero;
                conta.banco_id = data.banco_id;
                conta.saldo = data.saldo;
                conta.clientes = data.clientes.clone();
                conta.updated_at = Utc::now();
                conta.clone()
            }))
    }

    async fn delete_conta(&self, id: i64) -> Result<bool, AppError> {
        self.check_should_fail()?;
        Ok(self.storage.lock().unwrap().contas.remove(&id).is_some())
    }
}
