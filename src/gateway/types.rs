//! Wire types for the payment gateway JSON API.
//!
//! Every response field is optional: the gateway omits whole substructures
//! depending on the request kind and outcome, and the reconciler must never
//! fail on an absent field.

use serde::{Deserialize, Serialize};

/// Transaction type sent on every charge. Auth and capture are combined;
/// auth-only flows are not used by the portal.
pub const TRANSACTION_TYPE_AUTH_CAPTURE: &str = "authCaptureTransaction";

/// All charges are denominated in USD.
pub const CURRENCY_CODE: &str = "USD";

/// Constant order descriptor attached to every charge.
pub const ORDER_DESCRIPTION: &str = "Sales portal card payment";

/// The gateway's success sentinel for a transaction outcome.
pub const RESPONSE_CODE_APPROVED: &str = "1";

/// Top-level coarse status value for a request the gateway accepted.
pub const RESULT_STATUS_OK: &str = "Ok";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantAuthentication {
    pub name: String,
    pub transaction_key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDetails {
    pub card_number: String,
    pub expiration_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub credit_card: CreditCardDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub invoice_number: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub zip: String,
}

/// Reference to a stored payment method, used when charging a profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileToCharge {
    pub customer_profile_id: String,
    pub payment_profile: PaymentProfileRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProfileRef {
    pub payment_profile_id: String,
}

/// Body of a charge request. Exactly one of `payment` (raw card) or
/// `profile` (stored payment method) is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub transaction_type: String,
    pub amount: String,
    pub currency_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileToCharge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderDetails>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub merchant_authentication: MerchantAuthentication,
    pub ref_id: String,
    pub transaction_request: TransactionRequest,
}

/// Envelope the gateway expects: a single top-level key naming the operation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTransactionEnvelope {
    #[serde(rename = "createTransactionRequest")]
    pub create_transaction_request: CreateTransactionRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub merchant_customer_id: String,
    pub description: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerProfileRequest {
    pub merchant_authentication: MerchantAuthentication,
    pub profile: CustomerProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerProfileEnvelope {
    #[serde(rename = "createCustomerProfileRequest")]
    pub create_customer_profile_request: CreateCustomerProfileRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPaymentProfile {
    pub bill_to: BillTo,
    pub payment: PaymentDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPaymentProfileRequest {
    pub merchant_authentication: MerchantAuthentication,
    pub customer_profile_id: String,
    pub payment_profile: CustomerPaymentProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_mode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerPaymentProfileEnvelope {
    #[serde(rename = "createCustomerPaymentProfileRequest")]
    pub create_customer_payment_profile_request: CreateCustomerPaymentProfileRequest,
}

// --- Response shapes ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub code: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessages {
    pub result_code: Option<String>,
    #[serde(default)]
    pub message: Vec<ResponseMessage>,
}

/// Message nested inside the transaction outcome. Distinct from the
/// top-level message list: its text field is named `description`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutcomeMessage {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeMessages {
    #[serde(default)]
    pub message: Vec<OutcomeMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub error_code: Option<String>,
    pub error_text: Option<String>,
}

/// The gateway sometimes returns a single error object and sometimes a
/// list; both normalize to a `Vec<ErrorDetail>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeErrors {
    #[serde(default, deserialize_with = "one_or_many")]
    pub error: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub response_code: Option<String>,
    pub auth_code: Option<String>,
    pub avs_result_code: Option<String>,
    pub cvv_result_code: Option<String>,
    pub cavv_result_code: Option<String>,
    pub trans_id: Option<String>,
    pub network_trans_id: Option<String>,
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub messages: Option<OutcomeMessages>,
    pub errors: Option<OutcomeErrors>,
}

/// One response struct covers every operation; absent substructures stay
/// `None` and the reconciler treats them as "not present".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub ref_id: Option<String>,
    pub messages: Option<ResponseMessages>,
    pub transaction_response: Option<TransactionOutcome>,
    pub customer_profile_id: Option<String>,
    pub customer_payment_profile_id: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<ErrorDetail>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ErrorDetail),
        Many(Vec<ErrorDetail>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(detail) => vec![detail],
        OneOrMany::Many(details) => details,
    })
}
