pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod ledger;
pub mod ports;
pub mod services;
pub mod startup;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};

use crate::services::{PaymentService, ProfileService};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub payments: PaymentService,
    pub profiles: ProfileService,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/charge", post(handlers::payments::charge_card))
        .route(
            "/transactions/:invoice_id",
            get(handlers::payments::get_transaction),
        )
        .route(
            "/clients",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route("/clients/:client_id", get(handlers::clients::get_client))
        .route(
            "/clients/:client_id/payment-methods",
            post(handlers::clients::add_payment_method),
        )
        .route(
            "/clients/:client_id/charge",
            post(handlers::payments::charge_stored_profile),
        )
        .route(
            "/clients/:client_id/transactions",
            get(handlers::payments::list_client_transactions),
        )
        .route(
            "/clients/:client_id/notes",
            post(handlers::clients::create_note).get(handlers::clients::list_notes),
        )
        .with_state(state)
}
