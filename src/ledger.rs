//! Durable record of every charge attempt.
//!
//! The write ordering is the contract: a NotSubmitted row exists before any
//! network call, `Submitted` is written once the call has been dispatched,
//! and exactly one terminal write follows reconciliation. Terminal states
//! are immutable.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::db::models::TransactionRecord;
use crate::error::AppError;
use crate::gateway::ReconciledResult;
use crate::ports::{RepositoryError, TransactionRepository};

/// Attempt state machine: NotSubmitted → Submitted → {Success, Failed, Error}.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionResult {
    #[default]
    NotSubmitted,
    Submitted,
    Success,
    Failed,
    Error,
}

impl TransactionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionResult::NotSubmitted => "Not Submitted",
            TransactionResult::Submitted => "Submitted",
            TransactionResult::Success => "Success",
            TransactionResult::Failed => "Failed",
            TransactionResult::Error => "Error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionResult::Success | TransactionResult::Failed | TransactionResult::Error
        )
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Not Submitted" => Some(TransactionResult::NotSubmitted),
            "Submitted" => Some(TransactionResult::Submitted),
            "Success" => Some(TransactionResult::Success),
            "Failed" => Some(TransactionResult::Failed),
            "Error" => Some(TransactionResult::Error),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct TransactionLedger {
    repo: Arc<dyn TransactionRepository>,
}

impl TransactionLedger {
    pub fn new(repo: Arc<dyn TransactionRepository>) -> Self {
        Self { repo }
    }

    /// Persists a NotSubmitted record. A storage failure here is fatal to
    /// the attempt: the caller must not contact the gateway without a row.
    pub async fn begin(
        &self,
        invoice_id: String,
        ref_id: String,
        amount: String,
        salesperson: String,
        client_id: Option<i32>,
    ) -> Result<TransactionRecord, AppError> {
        let record = TransactionRecord::new(invoice_id, ref_id, amount, salesperson, client_id);
        self.repo
            .insert(&record)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(record)
    }

    /// Records that the request went out, before the outcome is known.
    pub async fn mark_submitted(&self, record: &mut TransactionRecord) -> Result<(), AppError> {
        record.submitted = true;
        record.result = TransactionResult::Submitted.as_str().to_string();
        self.repo
            .update(record)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Writes the terminal outcome. The only path to Success/Failed/Error;
    /// rejects a second call once a terminal state is in place.
    pub async fn apply_reconciliation(
        &self,
        record: &mut TransactionRecord,
        reconciled: &ReconciledResult,
    ) -> Result<(), AppError> {
        if TransactionResult::parse(&record.result).is_some_and(|r| r.is_terminal()) {
            return Err(AppError::Internal(format!(
                "transaction {} already has terminal result {}",
                record.invoice_id, record.result
            )));
        }

        record.result = reconciled.result.as_str().to_string();
        record.result_status = reconciled.result_status.clone();
        record.result_code = reconciled.result_code.clone();
        record.result_number = reconciled.result_number.clone();
        record.result_text = reconciled.result_text.clone();
        record.response_code = reconciled.response_code.clone();
        record.auth_code = reconciled.auth_code.clone();
        record.avs_result_code = reconciled.avs_result_code.clone();
        record.cvv_result_code = reconciled.cvv_result_code.clone();
        record.cavv_result_code = reconciled.cavv_result_code.clone();
        record.network_trans_id = reconciled.network_trans_id.clone();
        record.account_number = reconciled.account_number.clone();
        record.account_type = reconciled.account_type.clone();
        record.trans_id = reconciled.trans_id.clone();
        record.error = reconciled.error.clone();
        record.error_text = reconciled.error_text.clone();

        self.repo
            .update(record)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(())
    }

    pub async fn get_by_invoice(&self, invoice_id: &str) -> Result<TransactionRecord, AppError> {
        self.repo.get_by_invoice(invoice_id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => {
                AppError::NotFound(format!("transaction {invoice_id} not found"))
            }
            other => AppError::Persistence(other.to_string()),
        })
    }

    pub async fn list_for_client(
        &self,
        client_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        self.repo
            .list_for_client(client_id, limit, offset)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))
    }

    /// Flattens a record into the caller-facing response shape; every field
    /// is stringified so the transport layer can serialize it as-is.
    pub fn get_results(record: &TransactionRecord) -> BTreeMap<String, String> {
        let mut results = BTreeMap::new();
        results.insert("result".to_string(), record.result.clone());
        results.insert("created_at".to_string(), record.created_at.to_rfc3339());
        results.insert("invoiceID".to_string(), record.invoice_id.clone());
        results.insert("refID".to_string(), record.ref_id.clone());
        results.insert("amount".to_string(), record.amount.clone());
        results.insert("salesperson".to_string(), record.salesperson.clone());
        results.insert("submitted".to_string(), record.submitted.to_string());
        results.insert("transId".to_string(), record.trans_id.clone());
        results.insert("resultStatus".to_string(), record.result_status.clone());
        results.insert("resultCode".to_string(), record.result_code.clone());
        results.insert("resultNumber".to_string(), record.result_number.clone());
        results.insert("resultText".to_string(), record.result_text.clone());
        results.insert("responseCode".to_string(), record.response_code.clone());
        results.insert("authCode".to_string(), record.auth_code.clone());
        results.insert("avsResultCode".to_string(), record.avs_result_code.clone());
        results.insert("cvvResultCode".to_string(), record.cvv_result_code.clone());
        results.insert(
            "cavvResultCode".to_string(),
            record.cavv_result_code.clone(),
        );
        results.insert(
            "networkTransId".to_string(),
            record.network_trans_id.clone(),
        );
        results.insert("accountNumber".to_string(), record.account_number.clone());
        results.insert("accountType".to_string(), record.account_type.clone());
        results.insert("error".to_string(), record.error.clone());
        results.insert("errorText".to_string(), record.error_text.clone());
        results
    }
}
