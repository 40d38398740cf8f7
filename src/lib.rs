//! Client core for the MyBank ledger service.
//!
//! The heart of the crate is the transaction-intent pipeline: a draft
//! transfer is collected from the user, validated locally, confirmed
//! explicitly, submitted to the ledger and reconciled against the
//! server-reported balance. [`client::BankClient`] wires the pipeline,
//! the session state and the HTTP client together for a UI shell.

pub mod api;
pub mod client;
pub mod models;
pub mod services;
pub mod session;

pub use client::BankClient;
pub use session::Session;
