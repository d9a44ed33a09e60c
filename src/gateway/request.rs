//! Builds gateway request envelopes from typed inputs.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::gateway::types::{
    BillTo, CreateCustomerPaymentProfileEnvelope, CreateCustomerPaymentProfileRequest,
    CreateCustomerProfileEnvelope, CreateCustomerProfileRequest, CreateTransactionEnvelope,
    CreateTransactionRequest, CreditCardDetails, CustomerPaymentProfile, CustomerProfile,
    MerchantAuthentication, OrderDetails, PaymentDetails, PaymentProfileRef, ProfileToCharge,
    TransactionRequest, CURRENCY_CODE, ORDER_DESCRIPTION, TRANSACTION_TYPE_AUTH_CAPTURE,
};

pub const INVOICE_ID_LEN: usize = 16;
pub const PROFILE_INVOICE_ID_LEN: usize = 12;

/// Raw card details supplied by the caller. Never persisted.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub card_number: String,
    pub expiration_date: String,
    pub card_code: String,
}

#[derive(Debug, Clone)]
pub struct CardBillingDetails {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub zip_code: String,
}

/// Externally-visible invoice id: a random token truncated to a short
/// fixed length.
pub fn generate_invoice_id(len: usize) -> String {
    Uuid::new_v4().to_string().chars().take(len).collect()
}

/// Gateway correlation id derived from the current time. Microseconds are
/// included; the source used second resolution, which collides under load.
pub fn generate_ref_id() -> String {
    let now = Utc::now();
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}

/// Constructs request envelopes for one configured merchant.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    login_id: String,
    transaction_key: String,
}

impl RequestBuilder {
    pub fn new(login_id: String, transaction_key: String) -> Self {
        Self {
            login_id,
            transaction_key,
        }
    }

    fn merchant_authentication(&self) -> MerchantAuthentication {
        MerchantAuthentication {
            name: self.login_id.clone(),
            transaction_key: self.transaction_key.clone(),
        }
    }

    /// Charge a raw card: auth+capture, USD, constant order descriptor.
    pub fn build_card_transaction(
        &self,
        amount: &str,
        card: &CardDetails,
        invoice_id: &str,
        ref_id: &str,
    ) -> CreateTransactionEnvelope {
        CreateTransactionEnvelope {
            create_transaction_request: CreateTransactionRequest {
                merchant_authentication: self.merchant_authentication(),
                ref_id: ref_id.to_string(),
                transaction_request: TransactionRequest {
                    transaction_type: TRANSACTION_TYPE_AUTH_CAPTURE.to_string(),
                    amount: amount.to_string(),
                    currency_code: CURRENCY_CODE.to_string(),
                    payment: Some(PaymentDetails {
                        credit_card: CreditCardDetails {
                            card_number: card.card_number.clone(),
                            expiration_date: card.expiration_date.clone(),
                            card_code: Some(card.card_code.clone()),
                        },
                    }),
                    profile: None,
                    order: Some(OrderDetails {
                        invoice_number: invoice_id.to_string(),
                        description: ORDER_DESCRIPTION.to_string(),
                    }),
                },
            },
        }
    }

    /// Charge a stored payment method. Both profile ids must be present;
    /// the caller is responsible for the ownership check against the client.
    pub fn build_profile_charge(
        &self,
        customer_profile_id: &str,
        payment_profile_id: &str,
        amount: &str,
        invoice_id: &str,
        ref_id: &str,
        description: Option<&str>,
    ) -> Result<CreateTransactionEnvelope, AppError> {
        if customer_profile_id.is_empty() || payment_profile_id.is_empty() {
            return Err(AppError::Validation(
                "Missing customer or payment profile ID".to_string(),
            ));
        }

        Ok(CreateTransactionEnvelope {
            create_transaction_request: CreateTransactionRequest {
                merchant_authentication: self.merchant_authentication(),
                ref_id: ref_id.to_string(),
                transaction_request: TransactionRequest {
                    transaction_type: TRANSACTION_TYPE_AUTH_CAPTURE.to_string(),
                    amount: amount.to_string(),
                    currency_code: CURRENCY_CODE.to_string(),
                    payment: None,
                    profile: Some(ProfileToCharge {
                        customer_profile_id: customer_profile_id.to_string(),
                        payment_profile: PaymentProfileRef {
                            payment_profile_id: payment_profile_id.to_string(),
                        },
                    }),
                    order: Some(OrderDetails {
                        invoice_number: invoice_id.to_string(),
                        description: description.unwrap_or(ORDER_DESCRIPTION).to_string(),
                    }),
                },
            },
        })
    }

    pub fn build_customer_profile(
        &self,
        client_id: i32,
        company_name: &str,
        email: &str,
    ) -> CreateCustomerProfileEnvelope {
        CreateCustomerProfileEnvelope {
            create_customer_profile_request: CreateCustomerProfileRequest {
                merchant_authentication: self.merchant_authentication(),
                profile: CustomerProfile {
                    merchant_customer_id: if client_id != 0 {
                        client_id.to_string()
                    } else {
                        company_name.to_string()
                    },
                    description: format!("Profile for {company_name}"),
                    email: email.to_string(),
                },
            },
        }
    }

    pub fn build_payment_profile(
        &self,
        customer_profile_id: &str,
        card: &CardDetails,
        billing: &CardBillingDetails,
        validation_mode: Option<&str>,
    ) -> CreateCustomerPaymentProfileEnvelope {
        CreateCustomerPaymentProfileEnvelope {
            create_customer_payment_profile_request: CreateCustomerPaymentProfileRequest {
                merchant_authentication: self.merchant_authentication(),
                customer_profile_id: customer_profile_id.to_string(),
                payment_profile: CustomerPaymentProfile {
                    bill_to: BillTo {
                        first_name: billing.first_name.clone(),
                        last_name: billing.last_name.clone(),
                        address: billing.address.clone(),
                        zip: billing.zip_code.clone(),
                    },
                    payment: PaymentDetails {
                        credit_card: CreditCardDetails {
                            card_number: card.card_number.clone(),
                            expiration_date: card.expiration_date.clone(),
                            card_code: Some(card.card_code.clone()),
                        },
                    },
                },
                validation_mode: validation_mode.map(str::to_string),
            },
        }
    }
}
