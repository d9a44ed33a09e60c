//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::TransactionRecord;
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, tx: &TransactionRecord) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, invoice_id, ref_id, client_id, processor, result, amount,
                salesperson, submitted, trans_id, result_status, result_code,
                result_number, result_text, response_code, auth_code,
                avs_result_code, cvv_result_code, cavv_result_code,
                network_trans_id, account_number, account_type, error,
                error_text, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            "#,
        )
        .bind(tx.id)
        .bind(&tx.invoice_id)
        .bind(&tx.ref_id)
        .bind(tx.client_id)
        .bind(&tx.processor)
        .bind(&tx.result)
        .bind(&tx.amount)
        .bind(&tx.salesperson)
        .bind(tx.submitted)
        .bind(&tx.trans_id)
        .bind(&tx.result_status)
        .bind(&tx.result_code)
        .bind(&tx.result_number)
        .bind(&tx.result_text)
        .bind(&tx.response_code)
        .bind(&tx.auth_code)
        .bind(&tx.avs_result_code)
        .bind(&tx.cvv_result_code)
        .bind(&tx.cavv_result_code)
        .bind(&tx.network_trans_id)
        .bind(&tx.account_number)
        .bind(&tx.account_type)
        .bind(&tx.error)
        .bind(&tx.error_text)
        .bind(tx.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn update(&self, tx: &TransactionRecord) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                result = $2, submitted = $3, trans_id = $4, result_status = $5,
                result_code = $6, result_number = $7, result_text = $8,
                response_code = $9, auth_code = $10, avs_result_code = $11,
                cvv_result_code = $12, cavv_result_code = $13,
                network_trans_id = $14, account_number = $15,
                account_type = $16, error = $17, error_text = $18
            WHERE id = $1
            "#,
        )
        .bind(tx.id)
        .bind(&tx.result)
        .bind(tx.submitted)
        .bind(&tx.trans_id)
        .bind(&tx.result_status)
        .bind(&tx.result_code)
        .bind(&tx.result_number)
        .bind(&tx.result_text)
        .bind(&tx.response_code)
        .bind(&tx.auth_code)
        .bind(&tx.avs_result_code)
        .bind(&tx.cvv_result_code)
        .bind(&tx.cavv_result_code)
        .bind(&tx.network_trans_id)
        .bind(&tx.account_number)
        .bind(&tx.account_type)
        .bind(&tx.error)
        .bind(&tx.error_text)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(tx.id.to_string()));
        }

        Ok(())
    }

    async fn get_by_invoice(&self, invoice_id: &str) -> RepositoryResult<TransactionRecord> {
        let row = sqlx::query_as::<_, TransactionRecord>(
            "SELECT * FROM transactions WHERE invoice_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(invoice_id.to_string()))
    }

    async fn list_for_client(
        &self,
        client_id: i32,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT * FROM transactions
            WHERE client_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }
}
