//! Transaction history models

use serde::{Deserialize, Serialize};

/// One ledger transaction as the service reports it. The client holds a
/// read-only cached copy per dashboard render, replaced wholesale on each
/// fetch, never merged or patched.
///
/// `amount` is an unsigned magnitude; direction is inferred at display
/// time. Records carry either a unix-seconds `dateTimeStamp` or a
/// pre-formatted `date` string, depending on which endpoint produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub remarks: String,
    pub amount: f64,
    #[serde(rename = "dateTimeStamp", default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// A presentation-ready row derived from a [`TransactionRecord`] plus the
/// current identity. Purely derived data; owns no state.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub display_date: String,
    pub description: String,
    pub signed_amount_text: String,
    pub status_glyph: String,
}

/// Balance and history rows captured from the same session snapshot, so a
/// renderer can never pair a fresh balance with a stale list.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub balance: f64,
    pub rows: Vec<DisplayRow>,
}
