//! Session state: the authenticated identity, the last-known balance and
//! the cached transaction list.
//!
//! The session is an explicit value owned by [`crate::client::BankClient`]
//! and handed `&mut` into the services that mutate it. Nothing in this
//! crate keeps session data in a global.

use crate::models::{Identity, TransactionRecord};

/// Client-held snapshot of the authenticated session.
///
/// Balance is the single source of truth for "funds available" on the
/// client side, and only a successful transfer submission (or a fresh
/// login) may replace it. The transaction list is a read-only cache of
/// what the ledger last reported.
#[derive(Debug, Default)]
pub struct Session {
    identity: Option<Identity>,
    balance: f64,
    transactions: Vec<TransactionRecord>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Generation counter for this session. Bumped whenever the identity
    /// changes, so an in-flight continuation can detect that the session
    /// it captured no longer exists and drop its response.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Install a freshly authenticated identity with its opening balance.
    /// Replaces the previous session wholesale.
    pub fn set_identity(&mut self, identity: Identity, opening_balance: f64) {
        self.identity = Some(identity);
        self.balance = opening_balance;
        self.transactions.clear();
        self.epoch += 1;
    }

    pub fn set_balance(&mut self, new_balance: f64) {
        self.balance = new_balance;
    }

    pub fn set_transactions(&mut self, list: Vec<TransactionRecord>) {
        self.transactions = list;
    }

    /// Drop the identity and everything derived from it. The only
    /// operation allowed to do so.
    pub fn clear(&mut self) {
        self.identity = None;
        self.balance = 0.0;
        self.transactions.clear();
        self.epoch += 1;
    }
}
