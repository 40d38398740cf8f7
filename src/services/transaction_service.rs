//! Transaction history: fetching, the fallback list, and the derivation
//! of display rows from raw ledger records.

use chrono::{Local, TimeZone};
use tracing::{debug, warn};

use crate::api::ledger::LedgerApi;
use crate::models::{DashboardView, DisplayRow, Identity, TransactionRecord};
use crate::session::Session;

/// Built-in history shown when the ledger cannot be reached, so the
/// dashboard is never left empty.
pub fn placeholder_history() -> Vec<TransactionRecord> {
    vec![
        TransactionRecord {
            remarks: "Deposit".to_string(),
            amount: 500.0,
            timestamp: None,
            date: Some("2024-01-01".to_string()),
            status: "completed".to_string(),
        },
        TransactionRecord {
            remarks: "Withdrawal".to_string(),
            amount: 100.0,
            timestamp: None,
            date: Some("2024-01-02".to_string()),
            status: "completed".to_string(),
        },
    ]
}

/// Derive display rows from raw records plus the viewing identity.
///
/// Pure: re-run in full on every new list, never mutates the records.
///
/// A transaction is shown negated when its remarks mark it as a transfer
/// sent by the viewer, via a substring match on the remarks format
/// produced at submission time (`"Transfer of $.. from <name> to .."`).
/// Anything else keeps its unsigned magnitude.
pub fn present(transactions: &[TransactionRecord], identity: &Identity) -> Vec<DisplayRow> {
    let sent_marker = format!("from {}", identity.name);

    transactions
        .iter()
        .map(|record| {
            let outgoing =
                record.remarks.contains("Transfer") && record.remarks.contains(&sent_marker);

            let signed_amount_text = if outgoing {
                format!("-${:.2}", record.amount)
            } else {
                format!("${:.2}", record.amount)
            };

            let status_glyph = match record.status.as_str() {
                "completed" | "success" => "✅",
                _ => "❌",
            }
            .to_string();

            DisplayRow {
                display_date: format_record_date(record),
                description: record.remarks.clone(),
                signed_amount_text,
                status_glyph,
            }
        })
        .collect()
}

/// Unix-seconds timestamps render as the viewer's local calendar date;
/// records without one fall back to their pre-formatted date string.
fn format_record_date(record: &TransactionRecord) -> String {
    if let Some(ts) = record.timestamp {
        if let Some(datetime) = Local.timestamp_opt(ts, 0).single() {
            return datetime.format("%Y-%m-%d").to_string();
        }
    }
    record.date.clone().unwrap_or_default()
}

/// Re-fetch the history and rebuild the dashboard from the resulting
/// session snapshot. On any fetch failure the placeholder list is
/// installed instead; balance and rows always come from the same state.
pub async fn refresh_dashboard<L: LedgerApi>(ledger: &L, session: &mut Session) -> DashboardView {
    let Some(identity) = session.identity().cloned() else {
        return DashboardView {
            balance: session.balance(),
            rows: Vec::new(),
        };
    };

    let transactions = match ledger
        .fetch_transactions(identity.user_id, Some(&identity.email))
        .await
    {
        Ok(list) => {
            debug!("Fetched {} transactions for user {}", list.len(), identity.user_id);
            list
        }
        Err(e) => {
            warn!("Failed to fetch transactions, using placeholder history: {}", e);
            placeholder_history()
        }
    };

    session.set_transactions(transactions);

    DashboardView {
        balance: session.balance(),
        rows: present(session.transactions(), &identity),
    }
}
