#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use payportal::db::models::{Client, ClientNote, PaymentProfile, TransactionRecord};
use payportal::gateway::request::RequestBuilder;
use payportal::gateway::types::{
    CreateCustomerPaymentProfileEnvelope, CreateCustomerProfileEnvelope,
    CreateTransactionEnvelope, GatewayResponse,
};
use payportal::gateway::{GatewayClient, GatewayError};
use payportal::ledger::TransactionLedger;
use payportal::ports::{
    ProfileRepository, RepositoryError, RepositoryResult, TransactionRepository,
};
use payportal::services::{PaymentService, ProfileService};

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    pub rows: Mutex<Vec<TransactionRecord>>,
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, tx: &TransactionRecord) -> RepositoryResult<()> {
        self.rows.lock().unwrap().push(tx.clone());
        Ok(())
    }

    async fn update(&self, tx: &TransactionRecord) -> RepositoryResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == tx.id)
            .ok_or_else(|| RepositoryError::NotFound(tx.id.to_string()))?;
        *row = tx.clone();
        Ok(())
    }

    async fn get_by_invoice(&self, invoice_id: &str) -> RepositoryResult<TransactionRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.invoice_id == invoice_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(invoice_id.to_string()))
    }

    async fn list_for_client(
        &self,
        client_id: i32,
        _limit: i64,
        _offset: i64,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.client_id == Some(client_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    pub clients: Mutex<Vec<Client>>,
    pub profiles: Mutex<Vec<PaymentProfile>>,
    pub notes: Mutex<Vec<ClientNote>>,
    /// When set, delete calls fail as if the database were unreachable.
    pub fail_deletes: AtomicBool,
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn insert_client(&self, client: &Client) -> RepositoryResult<()> {
        self.clients.lock().unwrap().push(client.clone());
        Ok(())
    }

    async fn update_client(&self, client: &Client) -> RepositoryResult<()> {
        let mut clients = self.clients.lock().unwrap();
        let row = clients
            .iter_mut()
            .find(|row| row.id == client.id)
            .ok_or_else(|| RepositoryError::NotFound(client.id.to_string()))?;
        *row = client.clone();
        Ok(())
    }

    async fn delete_client(&self, id: Uuid) -> RepositoryResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("connection refused".to_string()));
        }
        let mut clients = self.clients.lock().unwrap();
        let before = clients.len();
        clients.retain(|row| row.id != id);
        if clients.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get_client(&self, client_id: i32) -> RepositoryResult<Client> {
        self.clients
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.client_id == client_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(client_id.to_string()))
    }

    async fn list_clients(&self, _limit: i64, _offset: i64) -> RepositoryResult<Vec<Client>> {
        Ok(self.clients.lock().unwrap().clone())
    }

    async fn insert_profile(&self, profile: &PaymentProfile) -> RepositoryResult<()> {
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(())
    }

    async fn update_profile(&self, profile: &PaymentProfile) -> RepositoryResult<()> {
        let mut profiles = self.profiles.lock().unwrap();
        let row = profiles
            .iter_mut()
            .find(|row| row.id == profile.id)
            .ok_or_else(|| RepositoryError::NotFound(profile.id.to_string()))?;
        *row = profile.clone();
        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> RepositoryResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("connection refused".to_string()));
        }
        let mut profiles = self.profiles.lock().unwrap();
        let before = profiles.len();
        profiles.retain(|row| row.id != id);
        if profiles.len() == before {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get_profile_by_payment_id(
        &self,
        payment_profile_id: &str,
    ) -> RepositoryResult<PaymentProfile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.payment_profile_id == payment_profile_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(payment_profile_id.to_string()))
    }

    async fn insert_note(&self, note: &ClientNote) -> RepositoryResult<()> {
        self.notes.lock().unwrap().push(note.clone());
        Ok(())
    }

    async fn list_notes(&self, client_id: i32) -> RepositoryResult<Vec<ClientNote>> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.client_id == client_id)
            .cloned()
            .collect())
    }
}

/// Programmable gateway double. `None` in a slot simulates a transport
/// failure for that request kind.
#[derive(Default)]
pub struct MockGateway {
    pub transaction_response: Mutex<Option<GatewayResponse>>,
    pub profile_response: Mutex<Option<GatewayResponse>>,
    pub payment_profile_response: Mutex<Option<GatewayResponse>>,
    pub calls: AtomicUsize,
}

impl MockGateway {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take(slot: &Mutex<Option<GatewayResponse>>) -> Result<GatewayResponse, GatewayError> {
        slot.lock()
            .unwrap()
            .clone()
            .ok_or_else(|| GatewayError::InvalidResponse("connection refused".to_string()))
    }
}

#[async_trait]
impl GatewayClient for MockGateway {
    async fn send_transaction(
        &self,
        _envelope: &CreateTransactionEnvelope,
    ) -> Result<GatewayResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.transaction_response)
    }

    async fn create_customer_profile(
        &self,
        _envelope: &CreateCustomerProfileEnvelope,
    ) -> Result<GatewayResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.profile_response)
    }

    async fn create_payment_profile(
        &self,
        _envelope: &CreateCustomerPaymentProfileEnvelope,
    ) -> Result<GatewayResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.payment_profile_response)
    }
}

pub struct TestHarness {
    pub transactions: Arc<InMemoryTransactionRepository>,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub gateway: Arc<MockGateway>,
    pub payments: PaymentService,
    pub profile_service: ProfileService,
}

pub fn harness() -> TestHarness {
    let transactions = Arc::new(InMemoryTransactionRepository::default());
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let gateway = Arc::new(MockGateway::default());
    let builder = RequestBuilder::new("login".to_string(), "key".to_string());

    let ledger = TransactionLedger::new(transactions.clone());
    let payments = PaymentService::new(
        ledger,
        profiles.clone(),
        gateway.clone(),
        builder.clone(),
    );
    let profile_service = ProfileService::new(profiles.clone(), gateway.clone(), builder);

    TestHarness {
        transactions,
        profiles,
        gateway,
        payments,
        profile_service,
    }
}

pub fn approved_response() -> GatewayResponse {
    serde_json::from_str(
        r#"{
            "messages": {
                "resultCode": "Ok",
                "message": [{"code": "I00001", "text": "Successful."}]
            },
            "transactionResponse": {
                "responseCode": "1",
                "authCode": "XYZ1",
                "avsResultCode": "Y",
                "cvvResultCode": "P",
                "transId": "60123456789",
                "networkTransId": "NET123",
                "accountNumber": "XXXX1111",
                "accountType": "Visa",
                "messages": {
                    "message": [{"code": "1", "description": "This transaction has been approved."}]
                }
            }
        }"#,
    )
    .unwrap()
}

pub fn declined_response() -> GatewayResponse {
    serde_json::from_str(
        r#"{
            "messages": {
                "resultCode": "Error",
                "message": [{"code": "E00027", "text": "The transaction was unsuccessful."}]
            },
            "transactionResponse": {
                "responseCode": "2",
                "transId": "60123456790",
                "accountNumber": "XXXX1111",
                "errors": {
                    "error": {"errorCode": "27", "errorText": "The transaction has been declined."}
                }
            }
        }"#,
    )
    .unwrap()
}

pub fn profile_created_response(profile_id: &str) -> GatewayResponse {
    serde_json::from_str(&format!(
        r#"{{
            "customerProfileId": "{profile_id}",
            "messages": {{
                "resultCode": "Ok",
                "message": [{{"code": "I00001", "text": "Successful."}}]
            }}
        }}"#
    ))
    .unwrap()
}

pub fn payment_profile_created_response(payment_profile_id: &str) -> GatewayResponse {
    serde_json::from_str(&format!(
        r#"{{
            "customerPaymentProfileId": "{payment_profile_id}",
            "messages": {{
                "resultCode": "Ok",
                "message": [{{"code": "I00001", "text": "Successful."}}]
            }}
        }}"#
    ))
    .unwrap()
}

pub fn profile_rejected_response() -> GatewayResponse {
    serde_json::from_str(
        r#"{
            "messages": {
                "resultCode": "Error",
                "message": [{"code": "E00039", "text": "A duplicate record already exists."}]
            }
        }"#,
    )
    .unwrap()
}
