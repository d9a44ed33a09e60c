use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const PROCESSOR_NAME: &str = "AuthorizeNet";
pub const DEFAULT_BILLED_FROM: &str = "PayPortal";

/// One row per charge attempt. Created before the gateway call so an
/// attempt is never lost, then updated with the reconciled outcome.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub invoice_id: String,
    pub ref_id: String,
    pub client_id: Option<i32>,
    pub processor: String,
    pub result: String,
    /// Decimal-as-string; never a float.
    pub amount: String,
    pub salesperson: String,
    pub submitted: bool,
    pub trans_id: String,
    pub result_status: String,
    pub result_code: String,
    pub result_number: String,
    pub result_text: String,
    pub response_code: String,
    pub auth_code: String,
    pub avs_result_code: String,
    pub cvv_result_code: String,
    pub cavv_result_code: String,
    pub network_trans_id: String,
    pub account_number: String,
    pub account_type: String,
    pub error: String,
    pub error_text: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        invoice_id: String,
        ref_id: String,
        amount: String,
        salesperson: String,
        client_id: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_id,
            ref_id,
            client_id,
            processor: PROCESSOR_NAME.to_string(),
            result: "Not Submitted".to_string(),
            amount,
            salesperson,
            submitted: false,
            trans_id: String::new(),
            result_status: String::new(),
            result_code: String::new(),
            result_number: String::new(),
            result_text: String::new(),
            response_code: String::new(),
            auth_code: String::new(),
            avs_result_code: String::new(),
            cvv_result_code: String::new(),
            cavv_result_code: String::new(),
            network_trans_id: String::new(),
            account_number: String::new(),
            account_type: String::new(),
            error: String::new(),
            error_text: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Local mirror of a gateway customer payment method. `payment_profile_id`
/// is only meaningful once `customer_profile_id` is set.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentProfile {
    pub id: Uuid,
    pub client_id: i32,
    pub processor: String,
    pub status: String,
    pub created_by: String,
    pub billed_from: String,
    pub customer_profile_id: String,
    pub payment_profile_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street_address: String,
    pub state: String,
    pub zip_code: String,
    pub card_type: String,
    pub last_four: String,
    pub is_child_billable: bool,
    pub customer_type: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentProfile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client_id: i32,
        created_by: String,
        customer_profile_id: String,
        first_name: String,
        last_name: String,
        email: String,
        street_address: String,
        zip_code: String,
        last_four: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            processor: PROCESSOR_NAME.to_string(),
            status: "Active".to_string(),
            created_by,
            billed_from: DEFAULT_BILLED_FROM.to_string(),
            customer_profile_id,
            payment_profile_id: String::new(),
            first_name,
            last_name,
            email,
            street_address,
            state: String::new(),
            zip_code,
            card_type: String::new(),
            last_four,
            is_child_billable: false,
            customer_type: "business".to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    /// External business identifier, distinct from the surrogate id.
    pub client_id: i32,
    pub company_name: String,
    pub phone: String,
    pub email: String,
    pub salesperson: String,
    pub customer_profile_id: String,
    pub default_payment_id: String,
    pub is_parent: bool,
    pub is_child: bool,
    pub parent_client_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        client_id: i32,
        company_name: String,
        phone: String,
        salesperson: String,
        email: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            company_name,
            phone,
            email,
            salesperson,
            customer_profile_id: String::new(),
            default_payment_id: String::new(),
            is_parent: false,
            is_child: false,
            parent_client_id: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClientNote {
    pub id: Uuid,
    pub client_id: i32,
    pub created_by: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl ClientNote {
    pub fn new(client_id: i32, created_by: String, note: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            created_by,
            note,
            created_at: Utc::now(),
        }
    }
}
