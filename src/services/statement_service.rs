//! Monthly statement download.
//!
//! The ledger renders one month of transactions as a CSV document; this
//! service checks the requested period locally, downloads the document
//! and writes it next to wherever the caller wants it.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::api::ledger::{LedgerApi, LedgerError};
use crate::models::Identity;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("Year must be positive, got {0}")]
    InvalidYear(i32),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Failed to write statement: {0}")]
    Io(#[from] std::io::Error),
}

/// Download the CSV statement for one calendar month and write it to
/// `output_dir`. Returns the path of the written file.
pub async fn download_statement<L: LedgerApi>(
    ledger: &L,
    identity: &Identity,
    month: u32,
    year: i32,
    output_dir: &Path,
) -> Result<PathBuf, StatementError> {
    if !(1..=12).contains(&month) {
        return Err(StatementError::InvalidMonth(month));
    }
    if year < 0 {
        return Err(StatementError::InvalidYear(year));
    }

    let csv = ledger
        .fetch_monthly_statement(identity.user_id, month, year)
        .await?;

    let path = output_dir.join(format!(
        "statement_{}_{:04}_{:02}.csv",
        identity.user_id, year, month
    ));
    tokio::fs::write(&path, csv).await?;

    info!("Wrote monthly statement to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ledger::models::{LoginData, TransferRequest, TransferResponse};
    use crate::models::TransactionRecord;
    use async_trait::async_trait;

    struct CsvLedger;

    #[async_trait]
    impl LedgerApi for CsvLedger {
        async fn login(&self, _: &str, _: &str, _: &str) -> Result<LoginData, LedgerError> {
            Err(LedgerError::RequestError("not stubbed".to_string()))
        }

        async fn submit_transfer(
            &self,
            _: &TransferRequest,
        ) -> Result<TransferResponse, LedgerError> {
            Err(LedgerError::RequestError("not stubbed".to_string()))
        }

        async fn fetch_transactions(
            &self,
            _: i64,
            _: Option<&str>,
        ) -> Result<Vec<TransactionRecord>, LedgerError> {
            Err(LedgerError::RequestError("not stubbed".to_string()))
        }

        async fn fetch_monthly_statement(
            &self,
            _: i64,
            _: u32,
            _: i32,
        ) -> Result<String, LedgerError> {
            Ok("Sender ID,Receiver ID,Amount,Remarks,DateTimeStamp,Status\n1,7,50,Transfer,01 Jan 2024,success\n".to_string())
        }
    }

    fn identity() -> Identity {
        Identity {
            user_id: 1,
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            account_number: "1001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_month() {
        let dir = std::env::temp_dir();
        for month in [0, 13] {
            let error = download_statement(&CsvLedger, &identity(), month, 2024, &dir)
                .await
                .expect_err("month should be rejected");
            assert!(matches!(error, StatementError::InvalidMonth(m) if m == month));
        }
    }

    #[tokio::test]
    async fn test_writes_downloaded_csv() {
        let dir = std::env::temp_dir();
        let path = download_statement(&CsvLedger, &identity(), 1, 2024, &dir)
            .await
            .expect("statement should download");

        let written = tokio::fs::read_to_string(&path)
            .await
            .expect("file should exist");
        assert!(written.starts_with("Sender ID,Receiver ID"));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
