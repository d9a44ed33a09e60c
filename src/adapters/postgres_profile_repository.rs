//! Postgres implementation of ProfileRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Client, ClientNote, PaymentProfile};
use crate::ports::{ProfileRepository, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn insert_client(&self, client: &Client) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (
                id, client_id, company_name, phone, email, salesperson,
                customer_profile_id, default_payment_id, is_parent, is_child,
                parent_client_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(client.id)
        .bind(client.client_id)
        .bind(&client.company_name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.salesperson)
        .bind(&client.customer_profile_id)
        .bind(&client.default_payment_id)
        .bind(client.is_parent)
        .bind(client.is_child)
        .bind(client.parent_client_id)
        .bind(client.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn update_client(&self, client: &Client) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE clients SET
                company_name = $2, phone = $3, email = $4, salesperson = $5,
                customer_profile_id = $6, default_payment_id = $7,
                is_parent = $8, is_child = $9, parent_client_id = $10
            WHERE id = $1
            "#,
        )
        .bind(client.id)
        .bind(&client.company_name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.salesperson)
        .bind(&client.customer_profile_id)
        .bind(&client.default_payment_id)
        .bind(client.is_parent)
        .bind(client.is_child)
        .bind(client.parent_client_id)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(client.id.to_string()));
        }

        Ok(())
    }

    async fn delete_client(&self, id: Uuid) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn get_client(&self, client_id: i32) -> RepositoryResult<Client> {
        let row = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE client_id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(client_id.to_string()))
    }

    async fn list_clients(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Client>> {
        sqlx::query_as::<_, Client>(
            "SELECT * FROM clients ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }

    async fn insert_profile(&self, profile: &PaymentProfile) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_profiles (
                id, client_id, processor, status, created_by, billed_from,
                customer_profile_id, payment_profile_id, first_name, last_name,
                email, street_address, state, zip_code, card_type, last_four,
                is_child_billable, customer_type, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(profile.id)
        .bind(profile.client_id)
        .bind(&profile.processor)
        .bind(&profile.status)
        .bind(&profile.created_by)
        .bind(&profile.billed_from)
        .bind(&profile.customer_profile_id)
        .bind(&profile.payment_profile_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.street_address)
        .bind(&profile.state)
        .bind(&profile.zip_code)
        .bind(&profile.card_type)
        .bind(&profile.last_four)
        .bind(profile.is_child_billable)
        .bind(&profile.customer_type)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn update_profile(&self, profile: &PaymentProfile) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE payment_profiles SET
                status = $2, customer_profile_id = $3, payment_profile_id = $4,
                card_type = $5, last_four = $6
            WHERE id = $1
            "#,
        )
        .bind(profile.id)
        .bind(&profile.status)
        .bind(&profile.customer_profile_id)
        .bind(&profile.payment_profile_id)
        .bind(&profile.card_type)
        .bind(&profile.last_four)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(profile.id.to_string()));
        }

        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM payment_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn get_profile_by_payment_id(
        &self,
        payment_profile_id: &str,
    ) -> RepositoryResult<PaymentProfile> {
        let row = sqlx::query_as::<_, PaymentProfile>(
            "SELECT * FROM payment_profiles WHERE payment_profile_id = $1",
        )
        .bind(payment_profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(payment_profile_id.to_string()))
    }

    async fn insert_note(&self, note: &ClientNote) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO client_notes (id, client_id, created_by, note, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(note.id)
        .bind(note.client_id)
        .bind(&note.created_by)
        .bind(&note.note)
        .bind(note.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn list_notes(&self, client_id: i32) -> RepositoryResult<Vec<ClientNote>> {
        sqlx::query_as::<_, ClientNote>(
            "SELECT * FROM client_notes WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(RepositoryError::from)
    }
}
