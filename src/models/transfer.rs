//! Transfer draft models

/// A not-yet-submitted transfer request, holding the raw field values
/// exactly as the UI collected them. Parsing and rule checks happen in
/// the validation service, so a draft can always be handed back for
/// correction without losing what the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferDraft {
    pub receiver_name: String,
    pub receiver_id: String,
    pub receiver_email: String,
    pub receiver_account: String,
    pub amount: String,
    pub confirmed: bool,
}

/// What the user is asked to approve before any network effect occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationPrompt {
    pub receiver_name: String,
    pub amount: f64,
}

/// Phase of the transfer pipeline. Validation runs synchronously inside
/// the submit step, so it has no resting phase of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    /// No draft open; the transfer affordance is available.
    Idle,
    /// A draft is open and editable.
    Drafting,
    /// A validated draft is waiting on the user's yes/no decision.
    AwaitingConfirmation,
    /// The request is in flight; the affordance is closed.
    Submitting,
    /// Submission failed; the draft is retained and may be re-submitted.
    Failed,
}
