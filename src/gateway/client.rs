//! HTTP client for the payment gateway.

use async_trait::async_trait;
use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error as FailsafeError, StateMachine};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::gateway::types::{
    CreateCustomerPaymentProfileEnvelope, CreateCustomerProfileEnvelope,
    CreateTransactionEnvelope, GatewayResponse,
};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),
    #[error("Circuit breaker open: {0}")]
    CircuitBreakerOpen(String),
}

/// Merchant environment selector. Endpoint URLs are fixed per environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => "https://apitest.authorize.net/xml/v1/request.api",
            GatewayEnvironment::Production => "https://api.authorize.net/xml/v1/request.api",
        }
    }
}

/// Boundary to the payment gateway. One method per request kind; a transport
/// failure surfaces as `Err`, which callers treat as "no response".
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn send_transaction(
        &self,
        envelope: &CreateTransactionEnvelope,
    ) -> Result<GatewayResponse, GatewayError>;

    async fn create_customer_profile(
        &self,
        envelope: &CreateCustomerProfileEnvelope,
    ) -> Result<GatewayResponse, GatewayError>;

    async fn create_payment_profile(
        &self,
        envelope: &CreateCustomerPaymentProfileEnvelope,
    ) -> Result<GatewayResponse, GatewayError>;
}

/// Production client posting JSON to the configured endpoint.
#[derive(Clone)]
pub struct HttpGatewayClient {
    client: Client,
    endpoint: String,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl HttpGatewayClient {
    pub fn new(environment: GatewayEnvironment) -> Self {
        Self::with_endpoint(environment.endpoint().to_string())
    }

    /// Endpoint override, used by tests against a local mock server.
    pub fn with_endpoint(endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(Duration::from_secs(60), Duration::from_secs(120));
        let policy = failure_policy::consecutive_failures(3, backoff);
        let circuit_breaker = Config::new().failure_policy(policy).build();

        HttpGatewayClient {
            client,
            endpoint,
            circuit_breaker,
        }
    }

    pub fn circuit_state(&self) -> String {
        if self.circuit_breaker.is_call_permitted() {
            "closed".to_string()
        } else {
            "open".to_string()
        }
    }

    async fn post<T: Serialize + Sync>(&self, body: &T) -> Result<GatewayResponse, GatewayError> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let payload = serde_json::to_value(body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let result = self
            .circuit_breaker
            .call(async move {
                let response = client.post(&endpoint).json(&payload).send().await?;

                // The gateway replies 200 even for declines; the body carries
                // the outcome.
                let text = response.text().await?;
                // Strip the UTF-8 BOM some gateway responses lead with.
                let trimmed = text.trim_start_matches('\u{feff}');
                serde_json::from_str::<GatewayResponse>(trimmed)
                    .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
            })
            .await;

        match result {
            Ok(response) => Ok(response),
            Err(FailsafeError::Rejected) => Err(GatewayError::CircuitBreakerOpen(
                "gateway circuit breaker is open".to_string(),
            )),
            Err(FailsafeError::Inner(e)) => Err(e),
        }
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn send_transaction(
        &self,
        envelope: &CreateTransactionEnvelope,
    ) -> Result<GatewayResponse, GatewayError> {
        self.post(envelope).await
    }

    async fn create_customer_profile(
        &self,
        envelope: &CreateCustomerProfileEnvelope,
    ) -> Result<GatewayResponse, GatewayError> {
        self.post(envelope).await
    }

    async fn create_payment_profile(
        &self,
        envelope: &CreateCustomerPaymentProfileEnvelope,
    ) -> Result<GatewayResponse, GatewayError> {
        self.post(envelope).await
    }
}
