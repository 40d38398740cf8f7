//! The transfer pipeline: one money-transfer intent from draft to
//! reconciliation.
//!
//! Drives `Idle → Drafting → AwaitingConfirmation → Submitting` and back,
//! with validation run synchronously on every submit and an explicit user
//! confirmation before any network effect. At most one draft is open per
//! session; the affordance to open another stays closed until the current
//! one reaches a terminal state.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::api::ledger::models::{format_transfer_remarks, TransferRequest};
use crate::api::ledger::{LedgerApi, LedgerError};
use crate::models::{ConfirmationPrompt, DashboardView, TransferDraft, TransferPhase};
use crate::services::transaction_service;
use crate::services::validation_service::{self, FieldError, ValidatedTransfer};
use crate::session::Session;

const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a submission attempt did not reconcile. The draft survives all of
/// these; the user may correct, retry or cancel.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Ledger call failed: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Ledger rejected the transfer: {0}")]
    Rejected(String),
    #[error("Ledger call timed out")]
    TimedOut,
    #[error("Ledger accepted the transfer but reported no updated balance")]
    MissingBalance,
    #[error("Session ended while the transfer was in flight; response discarded")]
    SessionChanged,
}

/// Pipeline misuse and submission failures, as surfaced to the UI shell.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("A transfer is already in progress")]
    FormAlreadyOpen,
    #[error("No transfer form is open")]
    NoOpenDraft,
    #[error("No transfer is awaiting confirmation")]
    NotAwaitingConfirmation,
    #[error("Not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Result of a submit action: either the full set of field errors, with
/// the form still open for correction, or the prompt the user must
/// approve before anything leaves the client.
#[derive(Debug)]
pub enum SubmitOutcome {
    Rejected(Vec<FieldError>),
    NeedsConfirmation(ConfirmationPrompt),
}

/// What a reconciled transfer hands back to the shell: the server-reported
/// balance and the freshly re-rendered dashboard.
#[derive(Debug)]
pub struct TransferReceipt {
    pub new_balance: f64,
    pub dashboard: DashboardView,
}

/// State machine for a single transfer intent.
#[derive(Debug)]
pub struct TransferPipeline {
    phase: TransferPhase,
    draft: Option<TransferDraft>,
    validated: Option<ValidatedTransfer>,
    submit_timeout: Duration,
}

impl TransferPipeline {
    pub fn new() -> Self {
        Self {
            phase: TransferPhase::Idle,
            draft: None,
            validated: None,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_submit_timeout(submit_timeout: Duration) -> Self {
        Self {
            submit_timeout,
            ..Self::new()
        }
    }

    pub fn phase(&self) -> TransferPhase {
        self.phase
    }

    /// The draft under edit, if any. Failed submissions keep it so the
    /// user can retry without retyping.
    pub fn draft(&self) -> Option<&TransferDraft> {
        self.draft.as_ref()
    }

    /// Whether the "open transfer" affordance is currently available.
    pub fn can_open(&self) -> bool {
        self.phase == TransferPhase::Idle
    }

    /// Open a fresh draft. At most one draft may be open per session.
    pub fn open_form(&mut self) -> Result<(), TransferError> {
        if self.phase != TransferPhase::Idle {
            return Err(TransferError::FormAlreadyOpen);
        }
        self.draft = Some(TransferDraft::default());
        self.phase = TransferPhase::Drafting;
        Ok(())
    }

    /// Validate the submitted field values against the current balance.
    ///
    /// Runs the full rule set every time; earlier results are never
    /// reused. On success the pipeline parks in `AwaitingConfirmation`
    /// until the user decides; on failure it stays open for correction.
    pub fn submit(
        &mut self,
        session: &Session,
        fields: TransferDraft,
    ) -> Result<SubmitOutcome, TransferError> {
        match self.phase {
            TransferPhase::Drafting | TransferPhase::Failed => {}
            TransferPhase::Idle => return Err(TransferError::NoOpenDraft),
            _ => return Err(TransferError::FormAlreadyOpen),
        }
        if session.identity().is_none() {
            return Err(TransferError::NotLoggedIn);
        }

        let checked = validation_service::validate(&fields, session.balance());
        self.draft = Some(fields);

        match checked {
            Ok(validated) => {
                let prompt = ConfirmationPrompt {
                    receiver_name: validated.receiver_name.clone(),
                    amount: validated.amount,
                };
                self.validated = Some(validated);
                self.phase = TransferPhase::AwaitingConfirmation;
                Ok(SubmitOutcome::NeedsConfirmation(prompt))
            }
            Err(errors) => {
                self.validated = None;
                self.phase = TransferPhase::Drafting;
                Ok(SubmitOutcome::Rejected(errors))
            }
        }
    }

    /// The user approved the confirmation prompt: build the wire request
    /// and submit it, single attempt, bounded by the submit timeout.
    ///
    /// On success the session balance is replaced with the server-reported
    /// value, the draft is discarded and the dashboard is re-rendered in
    /// full, unconditionally: the pipeline owns consistency after a
    /// successful transfer. On any failure the draft is preserved and the
    /// session is left untouched.
    pub async fn confirm<L: LedgerApi>(
        &mut self,
        session: &mut Session,
        ledger: &L,
    ) -> Result<TransferReceipt, TransferError> {
        if self.phase != TransferPhase::AwaitingConfirmation {
            return Err(TransferError::NotAwaitingConfirmation);
        }
        let identity = session
            .identity()
            .cloned()
            .ok_or(TransferError::NotLoggedIn)?;
        let validated = self
            .validated
            .clone()
            .ok_or(TransferError::NotAwaitingConfirmation)?;

        let request = TransferRequest {
            sender_id: identity.user_id,
            receiver_id: validated.receiver_id,
            account_number: validated.receiver_account,
            amount: validated.amount,
            remarks: format_transfer_remarks(
                validated.amount,
                &identity.name,
                &validated.receiver_name,
            ),
            timestamp: Utc::now().timestamp(),
        };

        let issued_epoch = session.epoch();
        self.phase = TransferPhase::Submitting;
        info!(
            "Submitting transfer of ${:.2} to {} (receiver id {})",
            validated.amount, validated.receiver_name, validated.receiver_id
        );

        let outcome = match timeout(self.submit_timeout, ledger.submit_transfer(&request)).await {
            Err(_) => Err(SubmissionError::TimedOut),
            Ok(Err(e)) => Err(SubmissionError::Ledger(e)),
            Ok(Ok(response)) if !response.is_success() => {
                Err(SubmissionError::Rejected(response.message))
            }
            Ok(Ok(response)) => response
                .updated_balance
                .ok_or(SubmissionError::MissingBalance),
        };

        // The session the request was issued under may have been cleared
        // while the call was in flight. A stale response must not write
        // into whatever session exists now.
        if session.epoch() != issued_epoch {
            warn!("Session changed during submission, discarding ledger response");
            self.reset();
            return Err(SubmissionError::SessionChanged.into());
        }

        match outcome {
            Ok(new_balance) => {
                session.set_balance(new_balance);
                self.draft = None;
                self.validated = None;
                self.phase = TransferPhase::Idle;
                info!("Transfer reconciled, new balance ${:.2}", new_balance);

                let dashboard = transaction_service::refresh_dashboard(ledger, session).await;
                Ok(TransferReceipt {
                    new_balance,
                    dashboard,
                })
            }
            Err(e) => {
                warn!("Transfer submission failed: {}", e);
                self.validated = None;
                self.phase = TransferPhase::Failed;
                Err(e.into())
            }
        }
    }

    /// The user declined the confirmation prompt. The draft goes back
    /// under edit, preserved as typed.
    pub fn decline(&mut self) -> Result<(), TransferError> {
        if self.phase != TransferPhase::AwaitingConfirmation {
            return Err(TransferError::NotAwaitingConfirmation);
        }
        self.validated = None;
        self.phase = TransferPhase::Drafting;
        Ok(())
    }

    /// Discard the draft and release the transfer affordance. Never
    /// fails and never touches the balance; a cancel while a submission
    /// is in flight is ignored, the completion continuation owns the
    /// draft at that point.
    pub fn cancel(&mut self) {
        if self.phase == TransferPhase::Submitting {
            return;
        }
        self.reset();
    }

    /// Drop all pipeline state. Called on logout so a cleared session
    /// cannot leave a draft behind.
    pub fn reset(&mut self) {
        self.draft = None;
        self.validated = None;
        self.phase = TransferPhase::Idle;
    }
}

impl Default for TransferPipeline {
    fn default() -> Self {
        Self::new()
    }
}
