//! Cadastro - registration form core
//!
//! Masks and unmasks Brazilian field formats (CPF, CEP, phone, dates, BRL
//! amounts), validates the registration record, fills address fields from a
//! postal-code directory and assembles the normalized submission payload.

pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod mask;
pub mod state;
pub mod submit;
pub mod validation;

pub use config::FormConfig;
pub use error::{Error, Result};
pub use lookup::{AddressDirectory, AddressLookup, AddressLookupResult, LookupError, ViaCepClient};
pub use mask::{FieldKind, MaskError, NormalizedValue};
pub use state::{EducationLevel, Field, FieldView, FormRecord, FormSession, SubmissionState};
pub use submit::{submit, ConfirmationSummary, NormalizedPayload, Submission, SubmissionOutcome, SubmitError};
pub use validation::{validate, ValidationResult};
