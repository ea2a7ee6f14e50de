//! PostgreSQL database client implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgPoolOptions, postgres::PgRow};
use tracing::{info, instrument};

use crate::domain::{
    AppError, Banco, Cliente, ClienteStatus, Conta, DatabaseClient, DatabaseError, Endereco,
    NovaConta, NovoBanco, NovoCliente, TipoCliente, TipoConta,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

const SELECT_BANCO: &str = r#"
    SELECT id, numero, cnpj, nome, created_at, updated_at
    FROM bancos
"#;

const SELECT_CLIENTE: &str = r#"
    SELECT id, tipo, nome, status, rg, cpf, cnpj,
           logradouro, numero_endereco, complemento, bairro, cep, cidade, estado,
           created_at, updated_at
    FROM clientes
"#;

const SELECT_CONTA: &str = r#"
    SELECT id, tipo, numero, banco_id, saldo, created_at, updated_at
    FROM contas
"#;

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Migration(e.to_string())))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    fn row_to_banco(row: &PgRow) -> Banco {
        Banco {
            id: row.get("id"),
            numero: row.get("numero"),
            cnpj: row.get("cnpj"),
            nome: row.get("nome"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_cliente(row: &PgRow) -> Result<Cliente, AppError> {
        let tipo: String = row.get("tipo");
        let status: String = row.get("status");

        Ok(Cliente {
            id: row.get("id"),
            tipo: parse_column::<TipoCliente>("tipo", &tipo)?,
            nome: row.get("nome"),
            status: parse_column::<ClienteStatus>("status", &status)?,
            endereco: Endereco {
                logradouro: row.get("logradouro"),
                numero: row.get("numero_endereco"),
                complemento: row.get("complemento"),
                bairro: row.get("bairro"),
                cep: row.get("cep"),
                cidade: row.get("cidade"),
                estado: row.get("estado"),
            },
            rg: row.get("rg"),
            cpf: row.get("cpf"),
            cnpj: row.get("cnpj"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    fn row_to_conta(row: &PgRow, clientes: Vec<i64>) -> Result<Conta, AppError> {
        let tipo: String = row.get("tipo");

        Ok(Conta {
            id: row.get("id"),
            tipo: parse_column::<TipoConta>("tipo", &tipo)?,
            numero: row.get("numero"),
            banco_id: row.get("banco_id"),
            saldo: row.get("saldo"),
            clientes,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// Attach holder ids to account rows with a single link query
    async fn rows_to_contas(&self, rows: Vec<PgRow>) -> Result<Vec<Conta>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();
        let mut holders: HashMap<i64, Vec<i64>> = HashMap::new();

        if !ids.is_empty() {
            let links = sqlx::query(
                r#"
                SELECT conta_id, cliente_id
                FROM conta_clientes
                WHERE conta_id = ANY($1)
                ORDER BY conta_id, posicao
                "#,
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;

            for link in links {
                holders
                    .entry(link.get("conta_id"))
                    .or_default()
                    .push(link.get("cliente_id"));
            }
        }

        rows.iter()
            .map(|row| {
                let id: i64 = row.get("id");
                Self::row_to_conta(row, holders.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn replace_holders(
        tx: &mut Transaction<'_, Postgres>,
        conta_id: i64,
        clientes: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM conta_clientes WHERE conta_id = $1")
            .bind(conta_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;

        for (posicao, cliente_id) in clientes.iter().enumerate() {
            sqlx::query(
                "INSERT INTO conta_clientes (conta_id, cliente_id, posicao) VALUES ($1, $2, $3)",
            )
            .bind(conta_id)
            .bind(cliente_id)
            .bind(posicao as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))
    }
}

fn query_error(e: sqlx::Error) -> AppError {
    AppError::Database(DatabaseError::from(e))
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_bancos(&self) -> Result<Vec<Banco>, AppError> {
        let query = format!("{} ORDER BY nome, id", SELECT_BANCO);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(rows.iter().map(Self::row_to_banco).collect())
    }

    #[instrument(skip(self))]
    async fn get_banco(&self, id: i64) -> Result<Option<Banco>, AppError> {
        let query = format!("{} WHERE id = $1", SELECT_BANCO);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(row.as_ref().map(Self::row_to_banco))
    }

    #[instrument(skip(self))]
    async fn find_banco_by_numero(&self, numero: i32) -> Result<Option<Banco>, AppError> {
        let query = format!("{} WHERE numero = $1", SELECT_BANCO);
        let row = sqlx::query(&query)
            .bind(numero)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(row.as_ref().map(Self::row_to_banco))
    }

    #[instrument(skip(self))]
    async fn find_banco_by_cnpj(&self, cnpj: &str) -> Result<Option<Banco>, AppError> {
        let query = format!("{} WHERE cnpj = $1", SELECT_BANCO);
        let row = sqlx::query(&query)
            .bind(cnpj)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(row.as_ref().map(Self::row_to_banco))
    }

    #[instrument(skip(self, data), fields(numero = %data.numero))]
    async fn insert_banco(&self, data: &NovoBanco) -> Result<Banco, AppError> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO bancos (numero, cnpj, nome, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, numero, cnpj, nome, created_at, updated_at
            "#,
        )
        .bind(data.numero)
        .bind(&data.cnpj)
        .bind(&data.nome)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error)?;
        Ok(Self::row_to_banco(&row))
    }

    #[instrument(skip(self, data))]
    async fn update_banco(&self, id: i64, data: &NovoBanco) -> Result<Option<Banco>, AppError> {
        let row = sqlx::query(
            r#"
            UPDATE bancos
            SET numero = $1, cnpj = $2, nome = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, numero, cnpj, nome, created_at, updated_at
            "#,
        )
        .bind(data.numero)
        .bind(&data.cnpj)
        .bind(&data.nome)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;
        Ok(row.as_ref().map(Self::row_to_banco))
    }

    #[instrument(skip(self))]
    async fn delete_banco(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bancos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_clientes(&self, tipo: TipoCliente) -> Result<Vec<Cliente>, AppError> {
        let query = format!("{} WHERE tipo = $1 ORDER BY nome, id", SELECT_CLIENTE);
        let rows = sqlx::query(&query)
            .bind(tipo.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        rows.iter().map(Self::row_to_cliente).collect()
    }

    #[instrument(skip(self))]
    async fn get_cliente(&self, id: i64) -> Result<Option<Cliente>, AppError> {
        let query = format!("{} WHERE id = $1", SELECT_CLIENTE);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.as_ref().map(Self::row_to_cliente).transpose()
    }

    #[instrument(skip(self, documento))]
    async fn find_cliente_by_documento(
        &self,
        tipo: TipoCliente,
        documento: &str,
    ) -> Result<Option<Cliente>, AppError> {
        let column = match tipo {
            TipoCliente::PessoaFisica => "cpf",
            TipoCliente::PessoaJuridica => "cnpj",
        };
        let query = format!("{} WHERE tipo = $1 AND {} = $2", SELECT_CLIENTE, column);
        let row = sqlx::query(&query)
            .bind(tipo.as_str())
            .bind(documento)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.as_ref().map(Self::row_to_cliente).transpose()
    }

    #[instrument(skip(self, data), fields(tipo = %data.tipo))]
    async fn insert_cliente(&self, data: &NovoCliente) -> Result<Cliente, AppError> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO clientes (
                tipo, nome, status, rg, cpf, cnpj,
                logradouro, numero_endereco, complemento, bairro, cep, cidade, estado,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING {}
            "#,
            CLIENTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(data.tipo.as_str())
            .bind(&data.nome)
            .bind(data.status.as_str())
            .bind(&data.rg)
            .bind(&data.cpf)
            .bind(&data.cnpj)
            .bind(&data.endereco.logradouro)
            .bind(&data.endereco.numero)
            .bind(&data.endereco.complemento)
            .bind(&data.endereco.bairro)
            .bind(&data.endereco.cep)
            .bind(&data.endereco.cidade)
            .bind(&data.endereco.estado)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)?;
        Self::row_to_cliente(&row)
    }

    #[instrument(skip(self, data))]
    async fn update_cliente(
        &self,
        id: i64,
        data: &NovoCliente,
    ) -> Result<Option<Cliente>, AppError> {
        let query = format!(
            r#"
            UPDATE clientes
            SET nome = $1, status = $2, rg = $3, cpf = $4, cnpj = $5,
                logradouro = $6, numero_endereco = $7, complemento = $8, bairro = $9,
                cep = $10, cidade = $11, estado = $12, updated_at = $13
            WHERE id = $14 AND tipo = $15
            RETURNING {}
            "#,
            CLIENTE_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(&data.nome)
            .bind(data.status.as_str())
            .bind(&data.rg)
            .bind(&data.cpf)
            .bind(&data.cnpj)
            .bind(&data.endereco.logradouro)
            .bind(&data.endereco.numero)
            .bind(&data.endereco.complemento)
            .bind(&data.endereco.bairro)
            .bind(&data.endereco.cep)
            .bind(&data.endereco.cidade)
            .bind(&data.endereco.estado)
            .bind(Utc::now())
            .bind(id)
            .bind(data.tipo.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;
        row.as_ref().map(Self::row_to_cliente).transpose()
    }

    #[instrument(skip(self))]
    async fn delete_cliente(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list_contas(&self, tipo: TipoConta) -> Result<Vec<Conta>, AppError> {
        let query = format!("{} WHERE tipo = $1 ORDER BY numero", SELECT_CONTA);
        let rows = sqlx::query(&query)
            .bind(tipo.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        self.rows_to_contas(rows).await
    }

    #[instrument(skip(self))]
    async fn get_conta(&self, id: i64) -> Result<Option<Conta>, AppError> {
        let query = format!("{} WHERE id = $1", SELECT_CONTA);
        let rows = sqlx::query(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(self.rows_to_contas(rows).await?.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn find_conta_by_numero(&self, numero: i32) -> Result<Option<Conta>, AppError> {
        let query = format!("{} WHERE numero = $1", SELECT_CONTA);
        let rows = sqlx::query(&query)
            .bind(numero)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(self.rows_to_contas(rows).await?.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn list_contas_by_banco(&self, banco_id: i64) -> Result<Vec<Conta>, AppError> {
        let query = format!("{} WHERE banco_id = $1 ORDER BY numero", SELECT_CONTA);
        let rows = sqlx::query(&query)
            .bind(banco_id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        self.rows_to_contas(rows).await
    }

    #[instrument(skip(self))]
    async fn list_contas_by_cliente(&self, cliente_id: i64) -> Result<Vec<Conta>, AppError> {
        let query = format!(
            "{} WHERE id IN (SELECT conta_id FROM conta_clientes WHERE cliente_id = $1) ORDER BY numero",
            SELECT_CONTA
        );
        let rows = sqlx::query(&query)
            .bind(cliente_id)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;
        self.rows_to_contas(rows).await
    }

    #[instrument(skip(self, data), fields(tipo = %data.tipo, numero = %data.numero))]
    async fn insert_conta(&self, data: &NovaConta) -> Result<Conta, AppError> {
        let now = Utc::now();
        let mut tx = self.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO contas (tipo, numero, banco_id, saldo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, tipo, numero, banco_id, saldo, created_at, updated_at
            "#,
        )
        .bind(data.tipo.as_str())
        .bind(data.numero)
        .bind(data.banco_id)
        .bind(data.saldo)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;

        let id: i64 = row.get("id");
        Self::replace_holders(&mut tx, id, &data.clientes).await?;
        tx.commit().await.map_err(query_error)?;

        Self::row_to_conta(&row, data.clientes.clone())
    }

    #[instrument(skip(self, data))]
    async fn update_conta(&self, id: i64, data: &NovaConta) -> Result<Option<Conta>, AppError> {
        let mut tx = self.begin().await?;

        let row = sqlx::query(
            r#"
            UPDATE contas
            SET numero = $1, banco_id = $2, saldo = $3, updated_at = $4
            WHERE id = $5 AND tipo = $6
            RETURNING id, tipo, numero, banco_id, saldo, created_at, updated_at
            "#,
        )
        .bind(data.numero)
        .bind(data.banco_id)
        .bind(data.saldo)
        .bind(Utc::now())
        .bind(id)
        .bind(data.tipo.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Self::replace_holders(&mut tx, id, &data.clientes).await?;
        tx.commit().await.map_err(query_error)?;

        Self::row_to_conta(&row, data.clientes.clone()).map(Some)
    }

    #[instrument(skip(self))]
    async fn delete_conta(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM contas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const CLIENTE_COLUMNS: &str = r#"
    id, tipo, nome, status, rg, cpf, cnpj,
    logradouro, numero_endereco, complemento, bairro, cep, cidade, estado,
    created_at, updated_at
"#;

/// Unknown codes in an enum column are reported as query errors
fn parse_column<T>(column: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Database(DatabaseError::Query(format!("column {}: {}", column, e))))
}
