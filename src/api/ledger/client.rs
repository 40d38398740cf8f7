use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use tracing::warn;

use super::models::{LedgerError, LoginData, LoginResponse, TransferRequest, TransferResponse};
use super::LedgerApi;
use crate::models::TransactionRecord;

/// HTTP client for the MyBank ledger service, the remote system of record
/// for balances and transactions.
pub struct LedgerClient {
    http_client: HttpClient,
    base_url: String,
}

impl LedgerClient {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8080";

    /// Create a client against the default service address.
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client with a custom base URL (deployments, testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> LedgerError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        // The service wraps errors as {"status":"error","message":...};
        // surface the message alone when it parses.
        let message = serde_json::from_str::<serde_json::Value>(&body_text)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or(body_text);

        match status_code {
            400 => LedgerError::BadRequest(message),
            401 => LedgerError::Unauthorized(message),
            404 => LedgerError::NotFound(message),
            500..=599 => {
                warn!("Ledger server error {}: {}", status_code, message);
                LedgerError::ServerError(status_code, message)
            }
            _ => LedgerError::HttpError(status_code, message),
        }
    }
}

impl Default for LedgerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerApi for LedgerClient {
    /// POST /login
    ///
    /// Authenticates with the service. Credentials pass straight through;
    /// nothing is stored client-side.
    async fn login(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginData, LedgerError> {
        let url = format!("{}/login", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .form(&[("user_id", user_id), ("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| LedgerError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| LedgerError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        if body.status != "success" {
            return Err(LedgerError::Unauthorized(body.message));
        }

        body.data.ok_or_else(|| {
            LedgerError::DeserializationError("Login response carried no user data".to_string())
        })
    }

    /// POST /transaction
    ///
    /// Submits one transfer request. Single attempt; retry policy is the
    /// caller's decision, not this client's.
    async fn submit_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferResponse, LedgerError> {
        let url = format!("{}/transaction", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .headers(Self::create_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| LedgerError::RequestError(format!("Request failed: {}", e)))?;

        // The service reports business failures (insufficient balance,
        // unknown receiver) with non-2xx statuses and the same JSON body.
        // Decode those into a TransferResponse rather than an HTTP error
        // so the pipeline sees the service's own message.
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<TransferResponse>(&body_text) {
                return Ok(body);
            }
            return Err(LedgerError::HttpError(status.as_u16(), body_text));
        }

        response
            .json::<TransferResponse>()
            .await
            .map_err(|e| LedgerError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET /transactions?user_id=<id>[&email=<email>]
    ///
    /// Fetches the user's recent transactions, most recent first.
    async fn fetch_transactions(
        &self,
        user_id: i64,
        email: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        let url = format!("{}/transactions", self.base_url);

        let mut query: Vec<(&str, String)> = vec![("user_id", user_id.to_string())];
        if let Some(email) = email {
            query.push(("email", email.to_string()));
        }

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| LedgerError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<Vec<TransactionRecord>>()
            .await
            .map_err(|e| LedgerError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET /monthdata?user_id=<id>&month=<m>&year=<y>
    ///
    /// Downloads one month of transactions as a CSV document.
    async fn fetch_monthly_statement(
        &self,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<String, LedgerError> {
        let url = format!("{}/monthdata", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("user_id", user_id.to_string()),
                ("month", month.to_string()),
                ("year", year.to_string()),
            ])
            .send()
            .await
            .map_err(|e| LedgerError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .text()
            .await
            .map_err(|e| LedgerError::DeserializationError(format!("Failed to read CSV body: {}", e)))
    }
}
