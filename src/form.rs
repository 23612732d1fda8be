use crate::error::ValidationError;
use crate::models::{Transaction, TransactionDraft, TransactionKind};
use chrono::NaiveDate;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    Kind,
    Description,
    Date,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Amount,
        FormField::Kind,
        FormField::Description,
        FormField::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Amount => "Amount ($)",
            FormField::Kind => "Type",
            FormField::Description => "Description",
            FormField::Date => "Date (YYYY-MM-DD)",
        }
    }

    fn index(self) -> usize {
        match self {
            FormField::Amount => 0,
            FormField::Kind => 1,
            FormField::Description => 2,
            FormField::Date => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// Errors from the last submission attempt, one slot per text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub amount: Option<ValidationError>,
    pub description: Option<ValidationError>,
    pub date: Option<ValidationError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.date.is_none()
    }

    pub fn for_field(&self, field: FormField) -> Option<ValidationError> {
        match field {
            FormField::Amount => self.amount,
            FormField::Kind => None,
            FormField::Description => self.description,
            FormField::Date => self.date,
        }
    }
}

/// Input state for adding a transaction or editing an existing one.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    mode: FormMode,
    amount: String,
    description: String,
    date: String,
    kind: TransactionKind,
    focus: FormField,
    errors: FormErrors,
}

impl TransactionForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            amount: String::new(),
            description: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            kind: TransactionKind::Expense,
            focus: FormField::Amount,
            errors: FormErrors::default(),
        }
    }

    pub fn edit(tx: &Transaction) -> Self {
        Self {
            mode: FormMode::Edit(tx.id),
            amount: tx.amount.to_string(),
            description: tx.description.clone(),
            date: tx.date.format(DATE_FORMAT).to_string(),
            kind: tx.kind,
            focus: FormField::Amount,
            errors: FormErrors::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Amount => &self.amount,
            FormField::Kind => self.kind.label(),
            FormField::Description => &self.description,
            FormField::Date => &self.date,
        }
    }

    pub fn next_field(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    pub fn prev_field(&mut self) {
        let len = FormField::ALL.len();
        let prev = (self.focus.index() + len - 1) % len;
        self.focus = FormField::ALL[prev];
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggle();
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::Amount => self.amount.push(c),
            FormField::Description => self.description.push(c),
            FormField::Date => self.date.push(c),
            FormField::Kind => match c {
                'i' | 'I' => self.kind = TransactionKind::Income,
                'e' | 'E' => self.kind = TransactionKind::Expense,
                ' ' => self.toggle_kind(),
                _ => {}
            },
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Kind => {}
        }
    }

    /// Check every field, record the errors, and return the normalized draft
    /// when all of them pass.
    pub fn validate(&mut self) -> Option<TransactionDraft> {
        let amount = parse_amount(&self.amount);
        let description = self.description.trim();
        let description = if description.is_empty() {
            Err(ValidationError::DescriptionRequired)
        } else {
            Ok(description.to_string())
        };
        let date = parse_date(&self.date);

        self.errors = FormErrors {
            amount: amount.err(),
            description: description.as_ref().err().copied(),
            date: date.err(),
        };

        Some(TransactionDraft {
            amount: amount.ok()?,
            description: description.ok()?,
            date: date.ok()?,
            kind: self.kind,
        })
    }

    /// Validate and emit the draft. A create form starts over afterwards; an
    /// edit form keeps what was submitted until the caller closes it.
    pub fn submit(&mut self, today: NaiveDate) -> Option<TransactionDraft> {
        let draft = self.validate()?;
        if self.mode == FormMode::Create {
            *self = Self::new(today);
        }
        Some(draft)
    }

    /// Drop an edit session without emitting anything. Returns false in
    /// create mode, where there is nothing to cancel.
    pub fn cancel(&mut self, today: NaiveDate) -> bool {
        match self.mode {
            FormMode::Edit(_) => {
                *self = Self::new(today);
                true
            }
            FormMode::Create => false,
        }
    }
}

fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::AmountNotPositive);
    }
    let amount: f64 = input
        .parse()
        .map_err(|_| ValidationError::AmountNotNumber)?;
    if !amount.is_finite() {
        return Err(ValidationError::AmountNotNumber);
    }
    if amount <= 0.0 {
        return Err(ValidationError::AmountNotPositive);
    }
    Ok(amount)
}

fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::DateRequired);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| ValidationError::DateInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn type_into(form: &mut TransactionForm, field: FormField, text: &str) {
        while form.focus() != field {
            form.next_field();
        }
        for c in text.chars() {
            form.push_char(c);
        }
    }

    fn clear(form: &mut TransactionForm, field: FormField) {
        while form.focus() != field {
            form.next_field();
        }
        while !form.value(field).is_empty() {
            form.backspace();
        }
    }

    #[test]
    fn new_form_has_defaults() {
        let form = TransactionForm::new(today());

        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.value(FormField::Amount), "");
        assert_eq!(form.value(FormField::Description), "");
        assert_eq!(form.value(FormField::Date), "2024-03-10");
        assert_eq!(form.kind(), TransactionKind::Expense);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut form = TransactionForm::new(today());
        type_into(&mut form, FormField::Amount, "-5");
        type_into(&mut form, FormField::Description, "Refund");

        assert!(form.submit(today()).is_none());
        assert_eq!(
            form.errors().amount,
            Some(ValidationError::AmountNotPositive)
        );
        assert_eq!(form.errors().description, None);
        assert_eq!(form.value(FormField::Amount), "-5");
    }

    #[test]
    fn all_errors_are_reported_together() {
        let mut form = TransactionForm::new(today());
        type_into(&mut form, FormField::Amount, "abc");
        type_into(&mut form, FormField::Description, "   ");
        clear(&mut form, FormField::Date);

        assert!(form.validate().is_none());
        assert_eq!(
            form.errors(),
            &FormErrors {
                amount: Some(ValidationError::AmountNotNumber),
                description: Some(ValidationError::DescriptionRequired),
                date: Some(ValidationError::DateRequired),
            }
        );
    }

    #[test]
    fn empty_amount_and_impossible_date() {
        let mut form = TransactionForm::new(today());
        type_into(&mut form, FormField::Description, "Rent");
        clear(&mut form, FormField::Date);
        type_into(&mut form, FormField::Date, "2024-02-30");

        assert!(form.validate().is_none());
        assert_eq!(
            form.errors().amount,
            Some(ValidationError::AmountNotPositive)
        );
        assert_eq!(form.errors().date, Some(ValidationError::DateInvalid));
    }

    #[test]
    fn create_submit_emits_normalized_draft_and_resets() {
        let mut form = TransactionForm::new(today());
        type_into(&mut form, FormField::Amount, " 12.50 ");
        type_into(&mut form, FormField::Kind, "i");
        type_into(&mut form, FormField::Description, "  Morning Coffee ");
        clear(&mut form, FormField::Date);
        type_into(&mut form, FormField::Date, "2024-03-01");

        let draft = form.submit(today()).unwrap();

        assert_eq!(
            draft,
            TransactionDraft {
                amount: 12.5,
                description: "Morning Coffee".into(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                kind: TransactionKind::Income,
            }
        );
        assert_eq!(form.value(FormField::Amount), "");
        assert_eq!(form.value(FormField::Description), "");
        assert_eq!(form.value(FormField::Date), "2024-03-10");
        assert_eq!(form.kind(), TransactionKind::Expense);
        assert_eq!(form.focus(), FormField::Amount);
    }

    #[test]
    fn edit_form_is_prefilled_and_keeps_values_after_submit() {
        let tx = Transaction::create(
            TransactionDraft {
                amount: 40.0,
                description: "Groceries".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
                kind: TransactionKind::Expense,
            },
            Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap(),
        );
        let mut form = TransactionForm::edit(&tx);

        assert_eq!(form.mode(), FormMode::Edit(tx.id));
        assert_eq!(form.value(FormField::Amount), "40");
        assert_eq!(form.value(FormField::Description), "Groceries");
        assert_eq!(form.value(FormField::Date), "2024-01-20");

        type_into(&mut form, FormField::Amount, ".5");
        let draft = form.submit(today()).unwrap();

        assert_eq!(draft.amount, 40.5);
        assert!(form.is_editing());
        assert_eq!(form.value(FormField::Amount), "40.5");
    }

    #[test]
    fn cancel_only_applies_to_edit_mode() {
        let mut form = TransactionForm::new(today());
        type_into(&mut form, FormField::Amount, "3");
        assert!(!form.cancel(today()));
        assert_eq!(form.value(FormField::Amount), "3");

        let tx = Transaction::create(
            TransactionDraft {
                amount: 3.0,
                description: "Tea".into(),
                date: today(),
                kind: TransactionKind::Expense,
            },
            Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
        );
        let mut form = TransactionForm::edit(&tx);
        assert!(form.cancel(today()));
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.value(FormField::Description), "");
    }

    #[test]
    fn kind_field_toggles() {
        let mut form = TransactionForm::new(today());
        type_into(&mut form, FormField::Kind, " ");
        assert_eq!(form.kind(), TransactionKind::Income);

        form.push_char('e');
        assert_eq!(form.kind(), TransactionKind::Expense);
        assert_eq!(form.value(FormField::Kind), "Expense");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = TransactionForm::new(today());
        form.prev_field();
        assert_eq!(form.focus(), FormField::Date);

        form.next_field();
        assert_eq!(form.focus(), FormField::Amount);
    }
}
