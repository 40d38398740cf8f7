//! Authenticated user identity

use serde::{Deserialize, Serialize};

/// The identity established at login. Immutable for the lifetime of a
/// session; replaced wholesale on login/logout, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub account_number: String,
}
