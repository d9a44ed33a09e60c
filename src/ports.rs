//! Repository traits behind the ledger and profile store. The Postgres
//! adapters implement these; tests substitute in-memory doubles.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::db::models::{Client, ClientNote, PaymentProfile, TransactionRecord};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound(e.to_string()),
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Single writer for transaction rows.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, tx: &TransactionRecord) -> RepositoryResult<()>;
    async fn update(&self, tx: &TransactionRecord) -> RepositoryResult<()>;
    async fn get_by_invoice(&self, invoice_id: &str) -> RepositoryResult<TransactionRecord>;
    async fn list_for_client(
        &self,
        client_id: i32,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<TransactionRecord>>;
}

/// Single writer for client, payment-profile, and note rows.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn insert_client(&self, client: &Client) -> RepositoryResult<()>;
    async fn update_client(&self, client: &Client) -> RepositoryResult<()>;
    async fn delete_client(&self, id: Uuid) -> RepositoryResult<()>;
    async fn get_client(&self, client_id: i32) -> RepositoryResult<Client>;
    async fn list_clients(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Client>>;

    async fn insert_profile(&self, profile: &PaymentProfile) -> RepositoryResult<()>;
    async fn update_profile(&self, profile: &PaymentProfile) -> RepositoryResult<()>;
    async fn delete_profile(&self, id: Uuid) -> RepositoryResult<()>;
    async fn get_profile_by_payment_id(
        &self,
        payment_profile_id: &str,
    ) -> RepositoryResult<PaymentProfile>;

    async fn insert_note(&self, note: &ClientNote) -> RepositoryResult<()>;
    async fn list_notes(&self, client_id: i32) -> RepositoryResult<Vec<ClientNote>>;
}
