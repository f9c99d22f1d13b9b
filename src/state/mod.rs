//! Form state module

mod field;
mod record;
mod session;

pub use field::FieldView;
pub use record::{EducationLevel, Field, FormRecord};
pub use session::{FormSession, SubmissionState, POSTAL_CODE_DIGITS};
