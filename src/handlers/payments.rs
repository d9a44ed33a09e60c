use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::gateway::request::CardDetails;
use crate::services::{ChargeCardInput, ChargeProfileInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChargeCardPayload {
    pub amount: String,
    pub card_number: String,
    pub expiration: String,
    pub cvv: String,
    pub client_id: Option<i32>,
    pub salesperson: String,
}

#[derive(Debug, Deserialize)]
pub struct ChargeProfilePayload {
    pub payment_profile_id: String,
    pub amount: String,
    pub invoice_id: Option<String>,
    pub description: Option<String>,
}

pub async fn charge_card(
    State(state): State<AppState>,
    Json(payload): Json<ChargeCardPayload>,
) -> Result<impl IntoResponse, AppError> {
    let results = state
        .payments
        .charge_card(ChargeCardInput {
            amount: payload.amount,
            card: CardDetails {
                card_number: payload.card_number,
                expiration_date: payload.expiration,
                card_code: payload.cvv,
            },
            client_id: payload.client_id,
            salesperson: payload.salesperson,
        })
        .await?;

    Ok(Json(results))
}

pub async fn charge_stored_profile(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(payload): Json<ChargeProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    let results = state
        .payments
        .charge_stored_profile(ChargeProfileInput {
            client_id,
            payment_profile_id: payload.payment_profile_id,
            amount: payload.amount,
            invoice_id: payload.invoice_id,
            description: payload.description,
        })
        .await?;

    Ok(Json(results))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.payments.ledger().get_by_invoice(&invoice_id).await?;
    Ok(Json(record))
}

pub async fn list_client_transactions(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let records = state
        .payments
        .ledger()
        .list_for_client(client_id, 50, 0)
        .await?;
    Ok(Json(records))
}
