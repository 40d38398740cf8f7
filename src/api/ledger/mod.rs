pub mod client;
pub mod models;

use async_trait::async_trait;

pub use client::LedgerClient;
pub use models::{LedgerError, LoginData, TransferRequest, TransferResponse};

use crate::models::TransactionRecord;

/// The ledger operations the client core consumes. [`LedgerClient`] is the
/// production implementation; tests drive the pipeline through stubs.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn login(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginData, LedgerError>;

    async fn submit_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferResponse, LedgerError>;

    async fn fetch_transactions(
        &self,
        user_id: i64,
        email: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, LedgerError>;

    async fn fetch_monthly_statement(
        &self,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<String, LedgerError>;
}
