//! Form submission: validate, normalize, confirm
//!
//! Nothing past validation happens unless every field passes. The accepted
//! outcome keeps the masked record for the confirmation view next to the
//! normalized payload that leaves the form.

use crate::mask::{unmask_currency, unmask_date, unmask_digits, MaskError};
use crate::state::{Field, FormRecord};
use crate::validation::{validate_on, ValidationResult};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Raised when a validated record still fails to normalize
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot normalize {field:?}: {source}")]
pub struct SubmitError {
    pub field: Field,
    #[source]
    pub source: MaskError,
}

/// Canonical field values handed to delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPayload {
    pub full_name: String,
    /// Digits only
    pub document_number: String,
    pub birthdate: NaiveDate,
    pub email: String,
    /// Digits only
    pub postal_code: String,
    /// Digits only
    pub phone: String,
    pub address_number: String,
    pub address_state: String,
    pub country: String,
    pub city: String,
    pub district: String,
    pub street: String,
    pub complement: String,
    pub education_level: String,
    /// Monthly income in reais
    pub income: f64,
    pub password: String,
    pub confirm_password: String,
}

impl NormalizedPayload {
    /// Unmask every masked field; plain fields pass through
    pub fn from_record(record: &FormRecord) -> Result<Self, SubmitError> {
        let birthdate = unmask_date(&record.birthdate).map_err(|source| SubmitError {
            field: Field::Birthdate,
            source,
        })?;
        let income = unmask_currency(&record.income).map_err(|source| SubmitError {
            field: Field::Income,
            source,
        })?;

        Ok(Self {
            full_name: record.full_name.clone(),
            document_number: unmask_digits(&record.document_number),
            birthdate,
            email: record.email.clone(),
            postal_code: unmask_digits(&record.postal_code),
            phone: unmask_digits(&record.phone),
            address_number: record.address_number.clone(),
            address_state: record.address_state.clone(),
            country: record.country.clone(),
            city: record.city.clone(),
            district: record.district.clone(),
            street: record.street.clone(),
            complement: record.complement.clone(),
            education_level: record.education_level.clone(),
            income,
            password: record.password.clone(),
            confirm_password: record.confirm_password.clone(),
        })
    }

    /// Birthdate as milliseconds since the epoch, at UTC midnight
    pub fn birthdate_timestamp_millis(&self) -> i64 {
        self.birthdate
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
    }
}

impl fmt::Display for NormalizedPayload {
    /// `key: value` lines; secrets are not echoed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hidden = "********";
        let lines: [(&str, String); 17] = [
            (Field::FullName.name(), self.full_name.clone()),
            (Field::DocumentNumber.name(), self.document_number.clone()),
            (Field::Birthdate.name(), self.birthdate.to_string()),
            (Field::Email.name(), self.email.clone()),
            (Field::PostalCode.name(), self.postal_code.clone()),
            (Field::Phone.name(), self.phone.clone()),
            (Field::AddressNumber.name(), self.address_number.clone()),
            (Field::AddressState.name(), self.address_state.clone()),
            (Field::Country.name(), self.country.clone()),
            (Field::City.name(), self.city.clone()),
            (Field::District.name(), self.district.clone()),
            (Field::Street.name(), self.street.clone()),
            (Field::Complement.name(), self.complement.clone()),
            (Field::EducationLevel.name(), self.education_level.clone()),
            (Field::Income.name(), format!("{:.2}", self.income)),
            (Field::Password.name(), hidden.to_string()),
            (Field::ConfirmPassword.name(), hidden.to_string()),
        ];
        for (i, (key, value)) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

/// An accepted submission
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The record as the user typed it, for the confirmation view
    pub record: FormRecord,
    pub payload: NormalizedPayload,
}

impl Submission {
    pub fn summary(&self) -> ConfirmationSummary {
        ConfirmationSummary::from_record(&self.record)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Validation failed; nothing else happened
    Rejected(ValidationResult),
    Accepted(Submission),
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Submit a record, computing ages against today's local date
pub fn submit(record: &FormRecord) -> Result<SubmissionOutcome, SubmitError> {
    submit_on(record, Local::now().date_naive())
}

/// Submit a record, computing ages against `today`
pub fn submit_on(record: &FormRecord, today: NaiveDate) -> Result<SubmissionOutcome, SubmitError> {
    let validation = validate_on(record, today);
    if !validation.is_valid() {
        tracing::info!(invalid_fields = validation.len(), "submission rejected");
        return Ok(SubmissionOutcome::Rejected(validation));
    }

    let payload = NormalizedPayload::from_record(record).inspect_err(|e| {
        tracing::error!(field = e.field.name(), "validated record failed to normalize: {e}");
    })?;

    tracing::info!("submission accepted");
    Ok(SubmissionOutcome::Accepted(Submission {
        record: record.clone(),
        payload,
    }))
}

/// One titled group of the confirmation view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub title: &'static str,
    pub items: Vec<(&'static str, String)>,
}

/// Human-readable recap shown after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSummary {
    pub sections: Vec<SummarySection>,
}

impl ConfirmationSummary {
    pub fn from_record(record: &FormRecord) -> Self {
        let item = |field: Field| (field.label(), record.get(field).to_string());

        let mut full_address = format!("{}, {}", record.street, record.address_number);
        if !record.complement.is_empty() {
            full_address.push_str(", ");
            full_address.push_str(&record.complement);
        }

        Self {
            sections: vec![
                SummarySection {
                    title: "Personal data",
                    items: vec![
                        item(Field::FullName),
                        item(Field::DocumentNumber),
                        item(Field::Birthdate),
                        item(Field::Email),
                        item(Field::Phone),
                    ],
                },
                SummarySection {
                    title: "Address",
                    items: vec![
                        item(Field::PostalCode),
                        item(Field::Country),
                        item(Field::AddressState),
                        item(Field::City),
                        item(Field::District),
                        ("Full address", full_address),
                    ],
                },
                SummarySection {
                    title: "Additional information",
                    items: vec![item(Field::EducationLevel), item(Field::Income)],
                },
            ],
        }
    }
}
