use super::error::ApiError;
use crate::application::ledger::Ledger;
use crate::domain::account::AccountSnapshot;
use crate::domain::transfer::TransferOutcome;
use crate::error::LedgerError;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

pub type ApiResult<T> = Result<T, ApiError>;

/// Form fields accepted by `POST /transfer`.
#[derive(Debug, Deserialize)]
pub struct TransferForm {
    #[serde(rename = "fromAccountNo")]
    pub from_account_no: String,
    #[serde(rename = "toAccountNo")]
    pub to_account_no: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub id: Option<String>,
    pub balance: Option<Decimal>,
}

pub async fn forbidden() -> StatusCode {
    StatusCode::FORBIDDEN
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// POST /transfer
///
/// 200 when the money moved, 408 when an account lock could not be taken in time.
pub async fn transfer(
    State(ledger): State<Ledger>,
    Form(form): Form<TransferForm>,
) -> ApiResult<(StatusCode, Json<TransferOutcome>)> {
    let amount = Decimal::from_str(form.amount.trim()).map_err(|e| {
        LedgerError::InvalidArgument(format!("amount '{}' is not a number: {}", form.amount, e))
    })?;

    let outcome = ledger
        .transfer(&form.from_account_no, &form.to_account_no, amount)
        .await?;
    let status = match outcome {
        TransferOutcome::Completed => StatusCode::OK,
        TransferOutcome::TimedOut { .. } => StatusCode::REQUEST_TIMEOUT,
    };
    Ok((status, Json(outcome)))
}

/// POST /accounts
pub async fn create_account(
    State(ledger): State<Ledger>,
    Json(request): Json<CreateAccountRequest>,
) -> ApiResult<Json<AccountSnapshot>> {
    let account = ledger.create_account(request.id, request.balance).await?;
    Ok(Json(account.snapshot().await))
}

/// GET /accounts
pub async fn list_accounts(State(ledger): State<Ledger>) -> Json<Vec<AccountSnapshot>> {
    Json(ledger.accounts().await)
}

/// GET /accounts/{id}
pub async fn get_account(
    State(ledger): State<Ledger>,
    Path(id): Path<String>,
) -> ApiResult<Json<AccountSnapshot>> {
    let account = ledger.get_account(&id).await?;
    Ok(Json(account.snapshot().await))
}
