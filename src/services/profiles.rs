//! Profile store: local client rows mirrored against gateway customer
//! profiles, with compensating deletes so a failed gateway call never
//! leaves a local row pointing at nothing.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::db::models::{Client, ClientNote, PaymentProfile};
use crate::error::AppError;
use crate::gateway::reconcile::profile_outcome;
use crate::gateway::request::{CardBillingDetails, CardDetails, RequestBuilder};
use crate::gateway::GatewayClient;
use crate::ports::{ProfileRepository, RepositoryError};
use crate::validation;

#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository>,
    gateway: Arc<dyn GatewayClient>,
    builder: RequestBuilder,
}

impl ProfileService {
    pub fn new(
        repo: Arc<dyn ProfileRepository>,
        gateway: Arc<dyn GatewayClient>,
        builder: RequestBuilder,
    ) -> Self {
        Self {
            repo,
            gateway,
            builder,
        }
    }

    /// Creates a local client row and its gateway customer profile. The
    /// local row is rolled back if the gateway call fails in any way.
    pub async fn create_client_profile(
        &self,
        client_id: i32,
        company_name: String,
        phone: String,
        salesperson: String,
        email: String,
    ) -> Result<Client, AppError> {
        let company_name = validation::sanitize_string(&company_name);
        let phone = validation::sanitize_string(&phone);
        let salesperson = validation::sanitize_string(&salesperson);
        let email = validation::sanitize_string(&email);
        validation::validate_required("company_name", &company_name)?;
        validation::validate_required("email", &email)?;
        validation::validate_max_len(
            "salesperson",
            &salesperson,
            validation::SALESPERSON_MAX_LEN,
        )?;

        let mut client = Client::new(client_id, company_name, phone, salesperson, email);
        self.repo
            .insert_client(&client)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        let envelope =
            self.builder
                .build_customer_profile(client.client_id, &client.company_name, &client.email);

        let outcome = self.gateway.create_customer_profile(&envelope).await;
        let response = outcome.as_ref().ok();

        let gateway_profile_id = response
            .and_then(|r| r.customer_profile_id.clone())
            .unwrap_or_default();

        match profile_outcome(response) {
            Ok(()) if !gateway_profile_id.is_empty() => {
                client.customer_profile_id = gateway_profile_id;
                self.repo
                    .update_client(&client)
                    .await
                    .map_err(|e| AppError::Persistence(e.to_string()))?;

                info!(
                    client_id = client.client_id,
                    customer_profile_id = %client.customer_profile_id,
                    "customer profile created"
                );
                Ok(client)
            }
            Ok(()) => {
                // Accepted but no profile id: unusable, roll back.
                self.rollback_client(&client).await?;
                Err(AppError::gateway(
                    "MISSING_PROFILE_ID",
                    "Gateway accepted the profile but returned no profile id",
                ))
            }
            Err((code, text)) => {
                warn!(
                    client_id = client.client_id,
                    code = %code,
                    text = %text,
                    "customer profile creation failed"
                );
                self.rollback_client(&client).await?;
                Err(AppError::gateway(code, text))
            }
        }
    }

    /// Stores a new payment method under an existing customer profile.
    /// The freshly-inserted local row is deleted if the gateway rejects it.
    pub async fn add_payment_method(
        &self,
        client_id: i32,
        card: CardDetails,
        billing: CardBillingDetails,
    ) -> Result<PaymentProfile, AppError> {
        validation::validate_card_number(&card.card_number)?;
        validation::validate_expiration(&card.expiration_date)?;
        validation::validate_cvv(&card.card_code)?;

        let mut client = self.get_client(client_id).await?;
        if client.customer_profile_id.is_empty() {
            return Err(AppError::Validation(format!(
                "client {client_id} has no customer profile"
            )));
        }

        let last_four = card
            .card_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<String>();

        let mut profile = PaymentProfile::new(
            client.client_id,
            client.salesperson.clone(),
            client.customer_profile_id.clone(),
            billing.first_name.clone(),
            billing.last_name.clone(),
            client.email.clone(),
            billing.address.clone(),
            billing.zip_code.clone(),
            last_four,
        );
        self.repo
            .insert_profile(&profile)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        let envelope = self.builder.build_payment_profile(
            &client.customer_profile_id,
            &card,
            &billing,
            None,
        );

        let outcome = self.gateway.create_payment_profile(&envelope).await;
        let response = outcome.as_ref().ok();

        let payment_profile_id = response
            .and_then(|r| r.customer_payment_profile_id.clone())
            .unwrap_or_default();

        match profile_outcome(response) {
            Ok(()) if !payment_profile_id.is_empty() => {
                profile.payment_profile_id = payment_profile_id.clone();
                self.repo
                    .update_profile(&profile)
                    .await
                    .map_err(|e| AppError::Persistence(e.to_string()))?;

                // First stored method becomes the client default.
                if client.default_payment_id.is_empty() {
                    client.default_payment_id = payment_profile_id;
                    self.repo
                        .update_client(&client)
                        .await
                        .map_err(|e| AppError::Persistence(e.to_string()))?;
                    info!(
                        client_id = client.client_id,
                        payment_profile_id = %client.default_payment_id,
                        "payment profile set as client default"
                    );
                }

                Ok(profile)
            }
            Ok(()) => {
                self.rollback_profile(&profile).await?;
                Err(AppError::gateway(
                    "MISSING_PROFILE_ID",
                    "Gateway accepted the payment method but returned no profile id",
                ))
            }
            Err((code, text)) => {
                warn!(
                    client_id = client.client_id,
                    code = %code,
                    text = %text,
                    "payment method creation failed"
                );
                self.rollback_profile(&profile).await?;
                Err(AppError::gateway(code, text))
            }
        }
    }

    pub async fn get_client(&self, client_id: i32) -> Result<Client, AppError> {
        self.repo.get_client(client_id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => {
                AppError::NotFound(format!("client {client_id} not found"))
            }
            other => AppError::Persistence(other.to_string()),
        })
    }

    pub async fn list_clients(&self, limit: i64, offset: i64) -> Result<Vec<Client>, AppError> {
        self.repo
            .list_clients(limit, offset)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    /// Client details with the default payment profile inlined when set.
    pub async fn get_client_details(
        &self,
        client_id: i32,
    ) -> Result<(Client, Option<PaymentProfile>), AppError> {
        let client = self.get_client(client_id).await?;

        let default_payment = if client.default_payment_id.is_empty() {
            None
        } else {
            match self
                .repo
                .get_profile_by_payment_id(&client.default_payment_id)
                .await
            {
                Ok(profile) => Some(profile),
                Err(RepositoryError::NotFound(_)) => None,
                Err(other) => return Err(AppError::Persistence(other.to_string())),
            }
        };

        Ok((client, default_payment))
    }

    pub async fn create_note(
        &self,
        client_id: i32,
        created_by: String,
        note: String,
    ) -> Result<ClientNote, AppError> {
        let created_by = validation::sanitize_string(&created_by);
        let note = validation::sanitize_string(&note);
        validation::validate_note(&note)?;
        let client = self.get_client(client_id).await?;

        let record = ClientNote::new(client.client_id, created_by, note);
        self.repo
            .insert_note(&record)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(record)
    }

    pub async fn list_notes(&self, client_id: i32) -> Result<Vec<ClientNote>, AppError> {
        self.repo
            .list_notes(client_id)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    async fn rollback_client(&self, client: &Client) -> Result<(), AppError> {
        if let Err(e) = self.repo.delete_client(client.id).await {
            // The local row now has no gateway counterpart and could not be
            // removed; this breaks the no-orphan invariant.
            error!(
                client_id = client.client_id,
                row_id = %client.id,
                error = %e,
                "COMPENSATION FAILURE: could not delete client row after gateway failure"
            );
            return Err(AppError::Compensation(format!(
                "failed to roll back client row {}: {e}",
                client.id
            )));
        }
        Ok(())
    }

    async fn rollback_profile(&self, profile: &PaymentProfile) -> Result<(), AppError> {
        if let Err(e) = self.repo.delete_profile(profile.id).await {
            error!(
                client_id = profile.client_id,
                row_id = %profile.id,
                error = %e,
                "COMPENSATION FAILURE: could not delete payment profile row after gateway failure"
            );
            return Err(AppError::Compensation(format!(
                "failed to roll back payment profile row {}: {e}",
                profile.id
            )));
        }
        Ok(())
    }
}
