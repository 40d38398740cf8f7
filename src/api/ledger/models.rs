use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire payload for submitting a transfer to the ledger.
///
/// Field names match the service's JSON. `remarks` is built by
/// [`format_transfer_remarks`] and must keep that shape: the history view
/// infers transfer direction from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender_id: i64,
    pub receiver_id: i64,
    /// The receiver's account number, checked server-side.
    pub account_number: i64,
    pub amount: f64,
    pub remarks: String,
    #[serde(rename = "dateTimeStamp")]
    pub timestamp: i64,
}

/// Response from POST /transaction.
///
/// The service reports `updated_balance` on success; a success status
/// without it is a malformed reconciliation and is rejected upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub updated_balance: Option<f64>,
}

impl TransferResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Response envelope from POST /login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<LoginData>,
}

/// Identity fields and opening balance reported on a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub account_number: String,
    pub current_balance: f64,
}

/// Build the remarks string embedded in every transfer request.
///
/// The format is load-bearing: `transaction_service::present` matches on
/// `"Transfer"` and `"from {name}"` to decide the display sign.
pub fn format_transfer_remarks(amount: f64, sender_name: &str, receiver_name: &str) -> String {
    format!(
        "Transfer of ${:.2} from {} to {}",
        amount, sender_name, receiver_name
    )
}

/// Errors from the ledger service HTTP layer
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remarks_format_is_stable() {
        let remarks = format_transfer_remarks(50.0, "Alice", "Bob");
        assert_eq!(remarks, "Transfer of $50.00 from Alice to Bob");
    }

    #[test]
    fn test_transfer_request_wire_field_names() {
        let request = TransferRequest {
            sender_id: 1,
            receiver_id: 7,
            account_number: 42,
            amount: 50.0,
            remarks: format_transfer_remarks(50.0, "Alice", "Bob"),
            timestamp: 1704067200,
        };

        let json = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(json["sender_id"], 1);
        assert_eq!(json["account_number"], 42);
        assert_eq!(json["dateTimeStamp"], 1704067200);
    }

    #[test]
    fn test_success_response_without_balance_still_parses() {
        let response: TransferResponse =
            serde_json::from_str(r#"{"status":"success","message":"ok"}"#)
                .expect("parse response");
        assert!(response.is_success());
        assert!(response.updated_balance.is_none());
    }
}
