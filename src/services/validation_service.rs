//! Local validation of a transfer draft.
//!
//! Pure rule checks only; no I/O. Every rule is evaluated on every call so
//! the caller gets the complete set of violations at once, and results are
//! never cached: the pipeline re-validates whenever the user touches the
//! confirmation checkbox or requests submission.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::TransferDraft;

lazy_static! {
    // local part of letters/digits/._%+-, dot-separated domain labels,
    // TLD of at least two letters
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@([A-Za-z0-9-]+\.)+[A-Za-z]{2,}$").unwrap();
}

/// Draft field a validation error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ReceiverName,
    ReceiverId,
    ReceiverEmail,
    ReceiverAccount,
    Amount,
    Confirmed,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::ReceiverName => "receiver_name",
            Field::ReceiverId => "receiver_id",
            Field::ReceiverEmail => "receiver_email",
            Field::ReceiverAccount => "receiver_account",
            Field::Amount => "amount",
            Field::Confirmed => "confirmed",
        };
        write!(f, "{}", name)
    }
}

/// One violated rule, tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

impl FieldError {
    fn new(field: Field, reason: &str) -> Self {
        Self {
            field,
            reason: reason.to_string(),
        }
    }
}

/// A draft that passed every rule, with numeric fields parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransfer {
    pub receiver_name: String,
    pub receiver_id: i64,
    pub receiver_email: String,
    pub receiver_account: i64,
    pub amount: f64,
}

/// Check a draft against the business rules, in field order.
///
/// Returns the parsed transfer when every rule holds, otherwise the exact
/// set of violated rules (at most one error per field).
pub fn validate(
    draft: &TransferDraft,
    current_balance: f64,
) -> Result<ValidatedTransfer, Vec<FieldError>> {
    let mut errors = Vec::new();

    let receiver_name = draft.receiver_name.trim();
    if receiver_name.is_empty() {
        errors.push(FieldError::new(
            Field::ReceiverName,
            "Receiver name is required.",
        ));
    }

    let receiver_id = match parse_positive_integer(&draft.receiver_id) {
        Ok(id) => Some(id),
        Err(reason) => {
            errors.push(FieldError::new(Field::ReceiverId, reason));
            None
        }
    };

    let receiver_email = draft.receiver_email.trim();
    if receiver_email.is_empty() {
        errors.push(FieldError::new(
            Field::ReceiverEmail,
            "Receiver email is required.",
        ));
    } else if !EMAIL_RE.is_match(receiver_email) {
        errors.push(FieldError::new(
            Field::ReceiverEmail,
            "Receiver email is not a valid address.",
        ));
    }

    let receiver_account = match parse_positive_integer(&draft.receiver_account) {
        Ok(account) => Some(account),
        Err(reason) => {
            errors.push(FieldError::new(Field::ReceiverAccount, reason));
            None
        }
    };

    let amount_text = draft.amount.trim();
    let amount = if amount_text.is_empty() {
        errors.push(FieldError::new(Field::Amount, "Amount is required."));
        None
    } else {
        match amount_text.parse::<f64>() {
            Ok(amount) if amount > 0.0 => {
                if amount <= current_balance {
                    Some(amount)
                } else {
                    errors.push(FieldError::new(
                        Field::Amount,
                        "Amount exceeds your available balance.",
                    ));
                    None
                }
            }
            Ok(_) => {
                errors.push(FieldError::new(
                    Field::Amount,
                    "Amount must be greater than zero.",
                ));
                None
            }
            Err(_) => {
                errors.push(FieldError::new(Field::Amount, "Amount must be a number."));
                None
            }
        }
    };

    if !draft.confirmed {
        errors.push(FieldError::new(
            Field::Confirmed,
            "Please confirm the transfer details.",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedTransfer {
        receiver_name: receiver_name.to_string(),
        receiver_id: receiver_id.expect("checked above"),
        receiver_email: receiver_email.to_string(),
        receiver_account: receiver_account.expect("checked above"),
        amount: amount.expect("checked above"),
    })
}

fn parse_positive_integer(raw: &str) -> Result<i64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("This field is required.");
    }
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        Ok(_) => Err("Value must be greater than zero."),
        Err(_) => Err("Value must be a number."),
    }
}
