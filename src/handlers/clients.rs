use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::models::{Client, PaymentProfile};
use crate::error::AppError;
use crate::gateway::request::{CardBillingDetails, CardDetails};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateClientPayload {
    pub client_id: i32,
    pub company_name: String,
    pub phone: String,
    pub salesperson: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct AddPaymentMethodPayload {
    pub card_number: String,
    pub expiration: String,
    pub cvv: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub zip_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotePayload {
    pub created_by: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct ClientDetails {
    #[serde(flatten)]
    pub client: Client,
    pub default_payment: Option<PaymentProfile>,
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = state
        .profiles
        .create_client_profile(
            payload.client_id,
            payload.company_name,
            payload.phone,
            payload.salesperson,
            payload.email,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clients = state.profiles.list_clients(100, 0).await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let (client, default_payment) = state.profiles.get_client_details(client_id).await?;
    Ok(Json(ClientDetails {
        client,
        default_payment,
    }))
}

pub async fn add_payment_method(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(payload): Json<AddPaymentMethodPayload>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .profiles
        .add_payment_method(
            client_id,
            CardDetails {
                card_number: payload.card_number,
                expiration_date: payload.expiration,
                card_code: payload.cvv,
            },
            CardBillingDetails {
                first_name: payload.first_name,
                last_name: payload.last_name,
                address: payload.address,
                zip_code: payload.zip_code,
            },
        )
        .await?;

    // Card data is dropped here; only the token and last four go back out.
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "payment_profile_id": profile.payment_profile_id,
            "last_four": profile.last_four,
            "status": profile.status,
        })),
    ))
}

pub async fn create_note(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(payload): Json<CreateNotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let note = state
        .profiles
        .create_note(client_id, payload.created_by, payload.note)
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn list_notes(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let notes = state.profiles.list_notes(client_id).await?;
    Ok(Json(notes))
}
