use crate::models::Transaction;
use uuid::Uuid;

/// What the list asks its owner to do with a row.
#[derive(Debug, Clone, PartialEq)]
pub enum ListIntent {
    Edit(Transaction),
    Delete(Uuid),
}

/// Case-insensitive substring match on the description. An empty term
/// matches everything.
pub fn filter<'a>(transactions: &'a [Transaction], term: &str) -> Vec<&'a Transaction> {
    let needle = term.to_lowercase();
    transactions
        .iter()
        .filter(|tx| tx.description.to_lowercase().contains(&needle))
        .collect()
}

/// Search term and selection cursor. The filter is always applied to the
/// full list handed in, never to a previous result.
#[derive(Debug, Default)]
pub struct TransactionList {
    search: String,
    selected: usize,
}

impl TransactionList {
    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        !self.search.is_empty()
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.selected = 0;
    }

    pub fn visible<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        filter(transactions, &self.search)
    }

    /// Cursor position clamped to `len` rows.
    pub fn selected(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if let Some(current) = self.selected(len) {
            self.selected = (current + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self, len: usize) {
        if let Some(current) = self.selected(len) {
            self.selected = current.saturating_sub(1);
        }
    }

    pub fn request_edit(&self, transactions: &[Transaction]) -> Option<ListIntent> {
        let rows = self.visible(transactions);
        let index = self.selected(rows.len())?;
        Some(ListIntent::Edit(rows[index].clone()))
    }

    pub fn request_delete(&self, transactions: &[Transaction]) -> Option<ListIntent> {
        let rows = self.visible(transactions);
        let index = self.selected(rows.len())?;
        Some(ListIntent::Delete(rows[index].id))
    }

    pub fn empty_message(&self) -> &'static str {
        if self.is_searching() {
            "No transactions match your search."
        } else {
            "No transactions yet. Add your first transaction above!"
        }
    }
}
