//! The client core as consumed by a UI shell.
//!
//! [`BankClient`] owns the session, the transfer pipeline and the ledger
//! connection, and exposes the handful of operations a shell wires its
//! affordances to. It is generic over [`LedgerApi`] so the whole surface
//! can be driven end to end against a stub ledger.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::ledger::{LedgerApi, LedgerClient, LedgerError};
use crate::models::{DashboardView, TransferDraft, TransferPhase};
use crate::services::statement_service::{self, StatementError};
use crate::services::transaction_service;
use crate::services::transfer_service::{
    SubmitOutcome, TransferError, TransferPipeline, TransferReceipt,
};
use crate::session::Session;

pub struct BankClient<L: LedgerApi = LedgerClient> {
    ledger: L,
    session: Session,
    pipeline: TransferPipeline,
}

impl<L: LedgerApi> BankClient<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            session: Session::new(),
            pipeline: TransferPipeline::new(),
        }
    }

    pub fn with_pipeline(ledger: L, pipeline: TransferPipeline) -> Self {
        Self {
            ledger,
            session: Session::new(),
            pipeline,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transfer_phase(&self) -> TransferPhase {
        self.pipeline.phase()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.identity().is_some()
    }

    /// Authenticate and install the resulting identity, replacing any
    /// previous session wholesale, then render the first dashboard.
    pub async fn login(
        &mut self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<DashboardView, LedgerError> {
        let data = self.ledger.login(user_id, email, password).await?;
        info!("Logged in as {} (user id {})", data.name, data.user_id);

        self.pipeline.reset();
        self.session.set_identity(
            crate::models::Identity {
                user_id: data.user_id,
                name: data.name,
                email: data.email,
                account_number: data.account_number,
            },
            data.current_balance,
        );

        Ok(transaction_service::refresh_dashboard(&self.ledger, &mut self.session).await)
    }

    /// End the session. Discards any in-flight draft along with the
    /// identity; an in-flight submission finds the epoch changed and
    /// drops its response.
    pub fn logout(&mut self) {
        self.pipeline.reset();
        self.session.clear();
        info!("Logged out");
    }

    pub fn open_transfer_form(&mut self) -> Result<(), TransferError> {
        if !self.is_logged_in() {
            return Err(TransferError::NotLoggedIn);
        }
        self.pipeline.open_form()
    }

    pub fn submit_transfer_draft(
        &mut self,
        fields: TransferDraft,
    ) -> Result<SubmitOutcome, TransferError> {
        self.pipeline.submit(&self.session, fields)
    }

    pub async fn confirm_transfer_draft(&mut self) -> Result<TransferReceipt, TransferError> {
        self.pipeline
            .confirm(&mut self.session, &self.ledger)
            .await
    }

    pub fn decline_transfer_draft(&mut self) -> Result<(), TransferError> {
        self.pipeline.decline()
    }

    pub fn cancel_transfer_draft(&mut self) {
        self.pipeline.cancel();
    }

    /// Re-fetch the history and re-derive the display rows from the
    /// current session snapshot.
    pub async fn refresh_dashboard(&mut self) -> Result<DashboardView, TransferError> {
        if !self.is_logged_in() {
            return Err(TransferError::NotLoggedIn);
        }
        Ok(transaction_service::refresh_dashboard(&self.ledger, &mut self.session).await)
    }

    /// Download the CSV statement for one month into `output_dir`.
    pub async fn download_statement(
        &self,
        month: u32,
        year: i32,
        output_dir: &Path,
    ) -> Result<PathBuf, StatementError> {
        let identity = self
            .session
            .identity()
            .ok_or(StatementError::NotLoggedIn)?;
        statement_service::download_statement(&self.ledger, identity, month, year, output_dir)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ledger::models::{LoginData, TransferRequest, TransferResponse};
    use crate::models::TransactionRecord;
    use async_trait::async_trait;

    /// Stub ledger with a single account, canned responses everywhere.
    struct StubLedger {
        accept_transfers: bool,
        history_reachable: bool,
    }

    #[async_trait]
    impl LedgerApi for StubLedger {
        async fn login(
            &self,
            user_id: &str,
            email: &str,
            _password: &str,
        ) -> Result<LoginData, LedgerError> {
            if user_id != "1" {
                return Err(LedgerError::Unauthorized(
                    "Invalid credentials. Please try again.".to_string(),
                ));
            }
            Ok(LoginData {
                user_id: 1,
                name: "Alice".to_string(),
                email: email.to_string(),
                account_number: "1001".to_string(),
                current_balance: 100.0,
            })
        }

        async fn submit_transfer(
            &self,
            request: &TransferRequest,
        ) -> Result<TransferResponse, LedgerError> {
            if !self.accept_transfers {
                return Err(LedgerError::RequestError("connection refused".to_string()));
            }
            Ok(TransferResponse {
                status: "success".to_string(),
                message: "Transaction completed successfully.".to_string(),
                updated_balance: Some(100.0 - request.amount),
            })
        }

        async fn fetch_transactions(
            &self,
            _: i64,
            _: Option<&str>,
        ) -> Result<Vec<TransactionRecord>, LedgerError> {
            if !self.history_reachable {
                return Err(LedgerError::RequestError("connection refused".to_string()));
            }
            Ok(vec![TransactionRecord {
                remarks: "Transfer of $50.00 from Alice to Bob".to_string(),
                amount: 50.0,
                timestamp: Some(1704067200),
                date: None,
                status: "success".to_string(),
            }])
        }

        async fn fetch_monthly_statement(
            &self,
            _: i64,
            _: u32,
            _: i32,
        ) -> Result<String, LedgerError> {
            Err(LedgerError::RequestError("not stubbed".to_string()))
        }
    }

    fn bob_draft() -> TransferDraft {
        TransferDraft {
            receiver_name: "Bob".to_string(),
            receiver_id: "7".to_string(),
            receiver_email: "bob@x.com".to_string(),
            receiver_account: "42".to_string(),
            amount: "50".to_string(),
            confirmed: true,
        }
    }

    async fn logged_in_client(ledger: StubLedger) -> BankClient<StubLedger> {
        let mut client = BankClient::new(ledger);
        client
            .login("1", "alice@x.com", "hunter2")
            .await
            .expect("login should succeed");
        client
    }

    #[tokio::test]
    async fn test_full_transfer_flow() {
        let mut client = logged_in_client(StubLedger {
            accept_transfers: true,
            history_reachable: true,
        })
        .await;

        client.open_transfer_form().expect("form should open");
        let outcome = client
            .submit_transfer_draft(bob_draft())
            .expect("submit should be accepted");
        assert!(matches!(outcome, SubmitOutcome::NeedsConfirmation(_)));

        let receipt = client
            .confirm_transfer_draft()
            .await
            .expect("transfer should reconcile");
        assert_eq!(receipt.new_balance, 50.0);
        assert_eq!(client.session().balance(), 50.0);
        assert_eq!(client.transfer_phase(), TransferPhase::Idle);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_empty() {
        let mut client = BankClient::new(StubLedger {
            accept_transfers: true,
            history_reachable: true,
        });

        let error = client
            .login("2", "mallory@x.com", "hunter2")
            .await
            .expect_err("login should fail");
        assert!(matches!(error, LedgerError::Unauthorized(_)));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_unreachable_history_falls_back_to_placeholder() {
        let mut client = logged_in_client(StubLedger {
            accept_transfers: true,
            history_reachable: false,
        })
        .await;

        let view = client
            .refresh_dashboard()
            .await
            .expect("dashboard should render");

        let expected: Vec<_> = transaction_service::present(
            &transaction_service::placeholder_history(),
            client.session().identity().expect("logged in"),
        );
        assert_eq!(view.rows, expected);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].description, "Deposit");
        assert_eq!(view.rows[0].signed_amount_text, "$500.00");
        assert_eq!(view.rows[1].description, "Withdrawal");
        assert_eq!(view.rows[1].signed_amount_text, "$100.00");
    }

    #[tokio::test]
    async fn test_logout_discards_open_draft() {
        let mut client = logged_in_client(StubLedger {
            accept_transfers: true,
            history_reachable: true,
        })
        .await;

        client.open_transfer_form().expect("form should open");
        client.logout();

        assert!(!client.is_logged_in());
        assert_eq!(client.transfer_phase(), TransferPhase::Idle);
        assert!(matches!(
            client.submit_transfer_draft(bob_draft()),
            Err(TransferError::NoOpenDraft)
        ));
    }

    #[tokio::test]
    async fn test_transfer_requires_login() {
        let mut client = BankClient::new(StubLedger {
            accept_transfers: true,
            history_reachable: true,
        });

        assert!(matches!(
            client.open_transfer_form(),
            Err(TransferError::NotLoggedIn)
        ));
    }
}
