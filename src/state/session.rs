//! Form session state and input handling

use super::field::FieldView;
use super::record::{Field, FormRecord};
use crate::lookup::{AddressDirectory, AddressLookup, LookupOutcome, LookupRequest, LookupResponse};
use crate::mask::{digits_only, mask_postal_code};
use crate::submit::{submit_on, Submission, SubmissionOutcome, SubmitError};
use crate::validation::{validate_on, ValidationResult};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Digits in a complete postal code
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Editing,
    /// Submission accepted; confirmation view is open
    Confirmed(Submission),
}

/// The single active registration form
pub struct FormSession<D: AddressDirectory + ?Sized> {
    record: FormRecord,
    errors: ValidationResult,
    lookup: AddressLookup<D>,
    /// Postal code already requested while it has stayed at full length
    requested_postal_code: Option<String>,
    state: SubmissionState,
}

impl<D: AddressDirectory + ?Sized> FormSession<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            record: FormRecord::new(),
            errors: ValidationResult::default(),
            lookup: AddressLookup::new(directory),
            requested_postal_code: None,
            state: SubmissionState::Editing,
        }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn lookup(&self) -> &AddressLookup<D> {
        &self.lookup
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Address inputs are locked while a lookup may overwrite them
    pub fn address_locked(&self) -> bool {
        self.lookup.is_loading()
    }

    /// Current value, error and input shape of a field
    pub fn field(&self, field: Field) -> FieldView {
        let mut error = self.errors.get(field).map(str::to_string);
        if field == Field::PostalCode && error.is_none() {
            error = self.lookup.error_message();
        }
        let locked = self.address_locked()
            && matches!(
                field,
                Field::Country | Field::AddressState | Field::City | Field::District
            );

        FieldView::new(field, self.record.get(field))
            .with_error(error.as_deref())
            .with_disabled(locked)
    }

    /// Views of every field in form order
    pub fn fields(&self) -> Vec<FieldView> {
        Field::ALL.into_iter().map(|f| self.field(f)).collect()
    }

    /// Replace a field's value with masked user input.
    ///
    /// Returns a lookup request when the postal code just reached full
    /// length with a value not yet requested.
    pub fn change(&mut self, field: Field, raw: &str) -> Option<LookupRequest> {
        if field == Field::PostalCode {
            return self.change_postal_code(raw);
        }
        let value = match field.kind() {
            Some(kind) => kind.mask(raw),
            None => raw.to_string(),
        };
        self.record.set(field, value);
        None
    }

    /// Append a typed character to a field
    pub fn input_char(&mut self, field: Field, c: char) -> Option<LookupRequest> {
        let mut raw = self.record.get(field).to_string();
        raw.push(c);
        self.change(field, &raw)
    }

    /// Remove the last character of a field
    pub fn backspace(&mut self, field: Field) -> Option<LookupRequest> {
        let mut raw = self.record.get(field).to_string();
        raw.pop();
        self.change(field, &raw)
    }

    fn change_postal_code(&mut self, raw: &str) -> Option<LookupRequest> {
        let masked = mask_postal_code(raw);
        let digits = digits_only(&masked);
        self.record.set(Field::PostalCode, masked.clone());

        if digits.len() != POSTAL_CODE_DIGITS {
            // Leaving full length re-arms the lookup for the next complete code
            self.requested_postal_code = None;
            return None;
        }
        if self.requested_postal_code.as_deref() == Some(digits.as_str()) {
            return None;
        }

        self.requested_postal_code = Some(digits);
        Some(self.lookup.begin(&masked))
    }

    /// Apply a resolved lookup to the record
    pub fn apply_lookup(&mut self, response: LookupResponse) -> LookupOutcome {
        self.lookup.complete(response, &mut self.record)
    }

    /// Send a request to the directory and apply its response
    pub async fn run_lookup(&mut self, request: LookupRequest) -> LookupOutcome {
        let directory = self.lookup.directory();
        let response = request.send(&*directory).await;
        self.apply_lookup(response)
    }

    /// Change a field and run the lookup it triggers, if any
    pub async fn change_and_lookup(&mut self, field: Field, raw: &str) -> Option<LookupOutcome> {
        let request = self.change(field, raw)?;
        Some(self.run_lookup(request).await)
    }

    /// Recompute every field's error, as a real-time form would on each change
    pub fn revalidate(&mut self) -> &ValidationResult {
        self.revalidate_on(Local::now().date_naive())
    }

    pub fn revalidate_on(&mut self, today: NaiveDate) -> &ValidationResult {
        self.errors = validate_on(&self.record, today);
        &self.errors
    }

    pub fn submit(&mut self) -> Result<SubmissionOutcome, SubmitError> {
        self.submit_on(Local::now().date_naive())
    }

    /// Validate and normalize the record.
    ///
    /// On rejection the errors are stored for display and the record is left
    /// as is. On acceptance the session moves to the confirmation state.
    pub fn submit_on(&mut self, today: NaiveDate) -> Result<SubmissionOutcome, SubmitError> {
        let outcome = submit_on(&self.record, today)?;
        match &outcome {
            SubmissionOutcome::Rejected(errors) => {
                self.errors = errors.clone();
            }
            SubmissionOutcome::Accepted(submission) => {
                self.errors = ValidationResult::default();
                self.state = SubmissionState::Confirmed(submission.clone());
            }
        }
        Ok(outcome)
    }

    /// Close the confirmation view and return to editing
    pub fn dismiss_confirmation(&mut self) {
        self.state = SubmissionState::Editing;
    }

    /// Empty every field and forget errors and lookups
    pub fn reset(&mut self) {
        self.record = FormRecord::new();
        self.errors = ValidationResult::default();
        self.lookup.reset();
        self.requested_postal_code = None;
        self.state = SubmissionState::Editing;
    }
}
