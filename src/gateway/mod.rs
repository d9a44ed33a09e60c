//! Payment gateway boundary: typed wire structs, request construction,
//! the HTTP client, and response reconciliation.

pub mod client;
pub mod reconcile;
pub mod request;
pub mod types;

pub use client::{GatewayClient, GatewayEnvironment, GatewayError, HttpGatewayClient};
pub use reconcile::{reconcile, ReconciledResult};
pub use request::{CardBillingDetails, CardDetails, RequestBuilder};
pub use types::GatewayResponse;
