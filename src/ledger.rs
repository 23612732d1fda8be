use crate::error::{LedgerError, StoreError};
use crate::models::{Transaction, TransactionDraft};
use crate::storage::{KeyValueStore, TRANSACTIONS_KEY};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

/// Sole owner of the transaction list.
///
/// Transactions are kept newest-first by insertion. Every mutation is
/// written through to the backing store before it returns; readers only ever
/// get a shared slice.
pub struct Ledger<S> {
    store: S,
    transactions: Vec<Transaction>,
}

impl<S: KeyValueStore> Ledger<S> {
    /// Read the stored transactions. Missing, unreadable, or malformed data
    /// yields an empty ledger. Records that break a field rule or repeat an
    /// earlier id are dropped.
    pub fn load(store: S) -> Self {
        let transactions = read_transactions(&store);
        Self {
            store,
            transactions,
        }
    }

    pub fn reload(&mut self) {
        self.transactions = read_transactions(&self.store);
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.transactions)?;
        self.store.set(TRANSACTIONS_KEY, &json)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn location(&self) -> String {
        self.store.location(TRANSACTIONS_KEY)
    }

    pub fn add(
        &mut self,
        draft: TransactionDraft,
        now: DateTime<Utc>,
    ) -> Result<&Transaction, LedgerError> {
        draft.validate()?;
        let tx = Transaction::create(draft, now);
        tracing::info!(id = %tx.id, kind = %tx.kind, amount = tx.amount, "adding transaction");
        self.transactions.insert(0, tx);
        self.save()?;
        Ok(&self.transactions[0])
    }

    pub fn update(
        &mut self,
        id: Uuid,
        draft: TransactionDraft,
        now: DateTime<Utc>,
    ) -> Result<&Transaction, LedgerError> {
        draft.validate()?;
        let index = self.position(id)?;
        self.transactions[index].apply(draft, now);
        tracing::info!(%id, "updated transaction");
        self.save()?;
        Ok(&self.transactions[index])
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Transaction, LedgerError> {
        let index = self.position(id)?;
        let removed = self.transactions.remove(index);
        tracing::info!(%id, "removed transaction");
        self.save()?;
        Ok(removed)
    }

    fn position(&self, id: Uuid) -> Result<usize, LedgerError> {
        self.transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(LedgerError::NotFound(id))
    }
}

fn read_transactions<S: KeyValueStore>(store: &S) -> Vec<Transaction> {
    let raw = match store.get(TRANSACTIONS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("no stored transactions, starting empty");
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!(error = %err, "stored transactions unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Transaction>>(&raw) {
        Ok(transactions) => {
            let transactions = retain_valid(transactions);
            tracing::info!(count = transactions.len(), "loaded transactions");
            transactions
        }
        Err(err) => {
            tracing::warn!(error = %err, "stored transactions malformed, starting empty");
            Vec::new()
        }
    }
}

/// Keeps the first record for each id and only records that pass validation.
fn retain_valid(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|tx| {
            if let Err(err) = tx.validate() {
                tracing::warn!(id = %tx.id, error = %err, "dropping invalid stored transaction");
                return false;
            }
            if !seen.insert(tx.id) {
                tracing::warn!(id = %tx.id, "dropping duplicate stored transaction");
                return false;
            }
            true
        })
        .collect()
}
