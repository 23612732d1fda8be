use thiserror::Error;
use uuid::Uuid;

/// Failures of the key-value store backing the ledger.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading {key:?} failed")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("writing {key:?} failed")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serializing transactions failed")]
    Serialize(#[from] serde_json::Error),
}

/// A field-level problem with user input.
///
/// The display text is what the form shows next to the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be greater than 0")]
    AmountNotPositive,

    #[error("Amount must be a number")]
    AmountNotNumber,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Date is required")]
    DateRequired,

    #[error("Date must be a valid calendar date (YYYY-MM-DD)")]
    DateInvalid,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no transaction with id {0}")]
    NotFound(Uuid),

    #[error("invalid transaction: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
