//! Data models for the MyBank client
//!
//! This module organizes the plain data types shared across the session,
//! the transfer pipeline and the presentation layer.

pub mod identity;
pub mod transaction;
pub mod transfer;

// Re-export commonly used types for convenience
pub use identity::Identity;
pub use transaction::{DashboardView, DisplayRow, TransactionRecord};
pub use transfer::{ConfirmationPrompt, TransferDraft, TransferPhase};
