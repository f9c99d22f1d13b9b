//! Trait abstraction for the postal-code directory to enable mocking in tests

use crate::state::{Field, FormRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a directory lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The directory answered but knows no address for the code
    #[error("postal code not found")]
    NotFound { postal_code: String },
    /// Connection failure
    #[error("address lookup failed: {0}")]
    Transport(String),
    /// The request did not complete within the configured timeout
    #[error("address lookup timed out")]
    Timeout,
    /// The directory returned a non-2xx status
    #[error("address directory returned {status}")]
    Status { status: u16 },
    /// The response body was not a directory record
    #[error("invalid address directory response: {0}")]
    Decode(String),
}

impl LookupError {
    /// Whether the global read policy may retry this failure.
    ///
    /// Only "not found" answers are final.
    pub fn is_retryable(&self) -> bool {
        !self.is_not_found()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Address data returned for a postal code.
///
/// Only ever merged into a [`FormRecord`], never kept on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressLookupResult {
    pub postal_code: String,
    pub street: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl AddressLookupResult {
    /// Overwrite the record's address fields, including user-entered values
    pub fn merge_into(self, record: &mut FormRecord) {
        record.set(Field::PostalCode, self.postal_code);
        record.set(Field::Street, self.street);
        record.set(Field::Complement, self.complement);
        record.set(Field::District, self.district);
        record.set(Field::City, self.city);
        record.set(Field::AddressState, self.state);
    }
}

/// Directory that resolves an 8-digit postal code to an address
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressDirectory: Send + Sync {
    /// Look up the address for a digits-only postal code
    async fn lookup(&self, postal_code: &str) -> Result<AddressLookupResult, LookupError>;
}
