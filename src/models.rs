use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TransactionKind::Income => TransactionKind::Expense,
            TransactionKind::Expense => TransactionKind::Income,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// One stored income or expense record.
///
/// Serialized with camelCase keys and the kind under `"type"`, so the stored
/// blob is a plain JSON array of `{id, amount, description, date, type,
/// createdAt, updatedAt}` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    /// Always positive; the kind decides the direction.
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn create(draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: draft.amount,
            description: draft.description.trim().to_string(),
            date: draft.date,
            kind: draft.kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields. `id` and `created_at` never change and
    /// `updated_at` never moves backwards, even if the clock does.
    pub fn apply(&mut self, draft: TransactionDraft, now: DateTime<Utc>) {
        self.amount = draft.amount;
        self.description = draft.description.trim().to_string();
        self.date = draft.date;
        self.kind = draft.kind;
        self.updated_at = now.max(self.updated_at);
    }

    /// Checks the field rules a stored record must still satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(self.amount, &self.description)
    }
}

/// The user-editable part of a transaction, as emitted by the form.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(self.amount, &self.description)
    }
}

fn check_fields(amount: f64, description: &str) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::AmountNotPositive);
    }
    if description.trim().is_empty() {
        return Err(ValidationError::DescriptionRequired);
    }
    Ok(())
}
