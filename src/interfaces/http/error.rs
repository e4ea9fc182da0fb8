use crate::error::LedgerError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

/// JSON body returned with every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// A ledger failure on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        Self(error)
    }
}

/// Maps each ledger failure to the status the HTTP boundary reports.
pub fn status_for(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::InsufficientFunds(_) | LedgerError::BalanceOverflow(_) => {
            StatusCode::BAD_REQUEST
        }
        LedgerError::NegativeAmount
        | LedgerError::ZeroAmount
        | LedgerError::SameAccountTransfer => StatusCode::NOT_ACCEPTABLE,
        LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        LedgerError::DuplicateAccount(_) => StatusCode::CONFLICT,
        LedgerError::CsvError(_) | LedgerError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for(error: &LedgerError) -> &'static str {
    match error {
        LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        LedgerError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
        LedgerError::BalanceOverflow(_) => "BALANCE_OVERFLOW",
        LedgerError::NegativeAmount => "NEGATIVE_AMOUNT",
        LedgerError::ZeroAmount => "ZERO_AMOUNT",
        LedgerError::SameAccountTransfer => "SAME_ACCOUNT_TRANSFER",
        LedgerError::InvalidArgument(_) => "INVALID_ARGUMENT",
        LedgerError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
        LedgerError::CsvError(_) | LedgerError::IoError(_) => "INTERNAL_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            "An internal error occurred".to_string()
        } else {
            warn!(error = %self.0, "request rejected");
            self.0.to_string()
        };
        let body = ErrorBody {
            code: code_for(&self.0),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (LedgerError::AccountNotFound("A".into()), 404),
            (LedgerError::InsufficientFunds("A".into()), 400),
            (LedgerError::BalanceOverflow("B".into()), 400),
            (LedgerError::NegativeAmount, 406),
            (LedgerError::ZeroAmount, 406),
            (LedgerError::SameAccountTransfer, 406),
            (LedgerError::InvalidArgument("bad".into()), 400),
            (LedgerError::DuplicateAccount("A".into()), 409),
            (LedgerError::IoError(std::io::Error::other("disk")), 500),
        ];

        for (error, expected) in cases {
            assert_eq!(status_for(&error).as_u16(), expected, "{error}");
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let response = ApiError(LedgerError::IoError(std::io::Error::other("secret"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
