//! Charge orchestration: build the request, record the attempt, call the
//! gateway, reconcile, persist the outcome.
//!
//! The ordering is fixed for every attempt, including failure paths:
//! ledger write → gateway call → reconciliation → terminal ledger write.
//! Transport failures never escape as raw errors; they become the
//! NO_RESPONSE reconciliation and the caller gets a structured result.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::gateway::request::{
    generate_invoice_id, generate_ref_id, CardDetails, RequestBuilder, INVOICE_ID_LEN,
    PROFILE_INVOICE_ID_LEN,
};
use crate::gateway::{reconcile, GatewayClient};
use crate::ledger::TransactionLedger;
use crate::ports::{ProfileRepository, RepositoryError};
use crate::validation;

#[derive(Debug, Clone)]
pub struct ChargeCardInput {
    pub amount: String,
    pub card: CardDetails,
    pub client_id: Option<i32>,
    pub salesperson: String,
}

#[derive(Debug, Clone)]
pub struct ChargeProfileInput {
    pub client_id: i32,
    pub payment_profile_id: String,
    pub amount: String,
    pub invoice_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct PaymentService {
    ledger: TransactionLedger,
    profiles: Arc<dyn ProfileRepository>,
    gateway: Arc<dyn GatewayClient>,
    builder: RequestBuilder,
}

impl PaymentService {
    pub fn new(
        ledger: TransactionLedger,
        profiles: Arc<dyn ProfileRepository>,
        gateway: Arc<dyn GatewayClient>,
        builder: RequestBuilder,
    ) -> Self {
        Self {
            ledger,
            profiles,
            gateway,
            builder,
        }
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    /// Charges a raw card and returns the flattened transaction record.
    pub async fn charge_card(
        &self,
        input: ChargeCardInput,
    ) -> Result<BTreeMap<String, String>, AppError> {
        validation::validate_amount(&input.amount)?;
        validation::validate_card_number(&input.card.card_number)?;
        validation::validate_expiration(&input.card.expiration_date)?;
        validation::validate_cvv(&input.card.card_code)?;

        let salesperson = validation::sanitize_string(&input.salesperson);
        validation::validate_required("salesperson", &salesperson)?;
        validation::validate_max_len(
            "salesperson",
            &salesperson,
            validation::SALESPERSON_MAX_LEN,
        )?;

        let invoice_id = generate_invoice_id(INVOICE_ID_LEN);
        let ref_id = generate_ref_id();

        let envelope =
            self.builder
                .build_card_transaction(&input.amount, &input.card, &invoice_id, &ref_id);

        // The row must exist before the gateway sees the request.
        let mut record = self
            .ledger
            .begin(
                invoice_id.clone(),
                ref_id,
                input.amount.clone(),
                salesperson,
                input.client_id,
            )
            .await?;

        info!(invoice_id = %invoice_id, amount = %input.amount, "submitting card transaction");

        let outcome = self.gateway.send_transaction(&envelope).await;
        self.ledger.mark_submitted(&mut record).await?;

        if let Err(e) = &outcome {
            warn!(invoice_id = %invoice_id, error = %e, "gateway call failed");
        }

        let reconciled = reconcile(outcome.as_ref().ok());
        self.ledger
            .apply_reconciliation(&mut record, &reconciled)
            .await?;

        if reconciled.is_approved() {
            info!(invoice_id = %invoice_id, trans_id = %record.trans_id, "transaction approved");
        } else {
            warn!(
                invoice_id = %invoice_id,
                result = %record.result,
                error = %record.error,
                "transaction not approved"
            );
        }

        Ok(TransactionLedger::get_results(&record))
    }

    /// Charges a stored payment method. Ownership is validated before any
    /// gateway contact: a mismatched or incomplete profile never leaves
    /// the process.
    pub async fn charge_stored_profile(
        &self,
        input: ChargeProfileInput,
    ) -> Result<BTreeMap<String, String>, AppError> {
        validation::validate_amount(&input.amount)?;

        let client = self
            .profiles
            .get_client(input.client_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => {
                    AppError::NotFound(format!("client {} not found", input.client_id))
                }
                other => AppError::Persistence(other.to_string()),
            })?;

        let profile = self
            .profiles
            .get_profile_by_payment_id(&input.payment_profile_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => AppError::NotFound(format!(
                    "payment profile {} not found",
                    input.payment_profile_id
                )),
                other => AppError::Persistence(other.to_string()),
            })?;

        if profile.customer_profile_id.is_empty() || profile.payment_profile_id.is_empty() {
            return Err(AppError::Validation(
                "Missing customer or payment profile ID".to_string(),
            ));
        }
        if client.customer_profile_id != profile.customer_profile_id {
            return Err(AppError::Validation(
                "Client and payment profile do not match".to_string(),
            ));
        }

        let invoice_id = input
            .invoice_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| generate_invoice_id(PROFILE_INVOICE_ID_LEN));
        let ref_id = generate_ref_id();

        let envelope = self.builder.build_profile_charge(
            &profile.customer_profile_id,
            &profile.payment_profile_id,
            &input.amount,
            &invoice_id,
            &ref_id,
            input.description.as_deref(),
        )?;

        let mut record = self
            .ledger
            .begin(
                invoice_id.clone(),
                ref_id,
                input.amount.clone(),
                client.salesperson.clone(),
                Some(client.client_id),
            )
            .await?;

        info!(
            invoice_id = %invoice_id,
            client_id = client.client_id,
            "submitting stored-profile transaction"
        );

        let outcome = self.gateway.send_transaction(&envelope).await;
        self.ledger.mark_submitted(&mut record).await?;

        if let Err(e) = &outcome {
            warn!(invoice_id = %invoice_id, error = %e, "gateway call failed");
        }

        let reconciled = reconcile(outcome.as_ref().ok());
        self.ledger
            .apply_reconciliation(&mut record, &reconciled)
            .await?;

        Ok(TransactionLedger::get_results(&record))
    }
}
