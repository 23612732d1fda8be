use crate::error::LedgerError;
use crate::form::{FormField, FormMode, TransactionForm};
use crate::format::format_currency;
use crate::ledger::Ledger;
use crate::list::{ListIntent, TransactionList};
use crate::stats::{self, MonthlyExpense, Summary};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Local, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Form,
    List,
    Search,
}

/// Top-level state. The ledger is only mutated from here, in response to a
/// form submission or a list intent.
pub struct App<S> {
    ledger: Ledger<S>,
    form: TransactionForm,
    list: TransactionList,
    focus: Focus,
    chart_months: usize,
    chart_cursor: usize,
    now: DateTime<Local>,
    status: String,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(ledger: Ledger<S>, chart_months: usize, now: DateTime<Local>) -> Self {
        let status = format!("Loaded {} transactions", ledger.transactions().len());
        Self {
            ledger,
            form: TransactionForm::new(now.date_naive()),
            list: TransactionList::default(),
            focus: Focus::Form,
            chart_months,
            chart_cursor: chart_months.saturating_sub(1),
            now,
            status,
        }
    }

    /// Advance the clock used for "today" and new timestamps.
    pub fn set_now(&mut self, now: DateTime<Local>) {
        self.now = now;
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    pub fn form(&self) -> &TransactionForm {
        &self.form
    }

    pub fn list(&self) -> &TransactionList {
        &self.list
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn chart_cursor(&self) -> usize {
        self.chart_cursor
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(self.ledger.transactions(), self.today())
    }

    pub fn series(&self) -> Vec<MonthlyExpense> {
        stats::monthly_series(self.ledger.transactions(), self.today(), self.chart_months)
    }

    pub fn submit_form(&mut self) {
        let today = self.today();
        let mode = self.form.mode();
        let Some(draft) = self.form.submit(today) else {
            self.status = "Please fix the highlighted fields".into();
            return;
        };
        let now = self.now.with_timezone(&Utc);

        match mode {
            FormMode::Create => {
                let message = format!(
                    "{} of {} has been recorded.",
                    draft.kind.label(),
                    format_currency(draft.amount)
                );
                let result = self.ledger.add(draft, now).map(drop);
                self.status = self.mutation_status(result, "Adding", message);
            }
            FormMode::Edit(id) => {
                let result = self.ledger.update(id, draft, now).map(drop);
                self.status = self.mutation_status(
                    result,
                    "Updating",
                    "Your transaction has been successfully updated.".into(),
                );
                self.form = TransactionForm::new(today);
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.form.cancel(self.today()) {
            self.status = "Edit cancelled".into();
        }
    }

    pub fn apply_intent(&mut self, intent: ListIntent) {
        match intent {
            ListIntent::Edit(tx) => {
                self.status = format!("Editing \"{}\"", tx.description);
                self.form = TransactionForm::edit(&tx);
                self.focus = Focus::Form;
            }
            ListIntent::Delete(id) => {
                let result = self.ledger.remove(id).map(drop);
                self.status = self.mutation_status(
                    result,
                    "Deleting",
                    "The transaction has been removed.".into(),
                );
                if self.form.mode() == FormMode::Edit(id) {
                    self.form = TransactionForm::new(self.today());
                }
            }
        }
    }

    pub fn reload(&mut self) {
        self.ledger.reload();
        if let FormMode::Edit(id) = self.form.mode()
            && self.ledger.get(id).is_none()
        {
            self.form = TransactionForm::new(self.today());
        }
        self.status = format!("Reloaded {} transactions", self.ledger.transactions().len());
    }

    /// A store failure leaves the change applied in memory, so the status
    /// reports the change together with the failed save.
    fn mutation_status(
        &self,
        result: Result<(), LedgerError>,
        action: &str,
        done: String,
    ) -> String {
        match result {
            Ok(()) => done,
            Err(LedgerError::Store(err)) => {
                let location = self.ledger.location();
                tracing::error!(error = %err, %location, "{action} transaction not saved");
                format!(
                    "{}, but saving to {location} failed: {err}",
                    done.trim_end_matches('.')
                )
            }
            Err(err) => {
                tracing::error!(error = %err, "{action} transaction failed");
                format!("{action} transaction failed: {err}")
            }
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        if key.code == KeyCode::F(5) {
            self.reload();
            return false;
        }
        // Chords like Alt-x or Ctrl-s are neither text nor shortcuts here.
        if matches!(key.code, KeyCode::Char(_)) && !is_typed(&key) {
            return false;
        }

        match self.focus {
            Focus::Form => self.handle_form_key(key),
            Focus::List => return self.handle_list_key(key),
            Focus::Search => self.handle_search_key(key),
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.form.is_editing() {
                    self.cancel_edit();
                } else {
                    self.focus = Focus::List;
                }
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Left | KeyCode::Right if self.form.focus() == FormField::Kind => {
                self.form.toggle_kind()
            }
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        let visible = self.list.visible(self.ledger.transactions()).len();
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => self.list.select_prev(visible),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(visible),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(intent) = self.list.request_edit(self.ledger.transactions()) {
                    self.apply_intent(intent);
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(intent) = self.list.request_delete(self.ledger.transactions()) {
                    self.apply_intent(intent);
                }
            }
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Tab | KeyCode::Char('a') => self.focus = Focus::Form,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('[') => self.chart_cursor = self.chart_cursor.saturating_sub(1),
            KeyCode::Char(']') => {
                if self.chart_cursor + 1 < self.chart_months {
                    self.chart_cursor += 1;
                }
            }
            KeyCode::Esc if self.list.is_searching() => self.list.clear_search(),
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.list.clear_search();
                self.focus = Focus::List;
            }
            KeyCode::Enter | KeyCode::Down => self.focus = Focus::List,
            KeyCode::Backspace => self.list.pop_search_char(),
            KeyCode::Char(c) => self.list.push_search_char(c),
            _ => {}
        }
    }
}

fn is_typed(key: &KeyEvent) -> bool {
    key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}
