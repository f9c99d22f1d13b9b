//! Fetch state for postal-code address lookups
//!
//! Each request is stamped with a generation number. Only the response to
//! the most recent request may touch the record; anything older is dropped.

use super::directory::{AddressDirectory, AddressLookupResult, LookupError};
use crate::mask::digits_only;
use crate::state::FormRecord;
use std::sync::Arc;

/// A lookup that has been started but not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    generation: u64,
    postal_code: String,
}

impl LookupRequest {
    /// Digits-only lookup key
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Issue the request against a directory
    pub async fn send<D: AddressDirectory + ?Sized>(self, directory: &D) -> LookupResponse {
        let result = directory.lookup(&self.postal_code).await;
        LookupResponse {
            request: self,
            result,
        }
    }
}

/// A resolved lookup, waiting to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    request: LookupRequest,
    result: Result<AddressLookupResult, LookupError>,
}

impl LookupResponse {
    pub fn request(&self) -> &LookupRequest {
        &self.request
    }
}

/// What applying a response did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Address fields were overwritten
    Applied,
    /// The directory knows no such code; record untouched
    NotFound,
    /// Transport failure after retries; record untouched
    Failed,
    /// A newer request was started; response dropped
    Superseded,
}

/// Postal-code lookup adapter
pub struct AddressLookup<D: AddressDirectory + ?Sized> {
    directory: Arc<D>,
    generation: u64,
    current: Option<String>,
    is_loading: bool,
    error: Option<LookupError>,
}

impl<D: AddressDirectory + ?Sized> AddressLookup<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self {
            directory,
            generation: 0,
            current: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn directory(&self) -> Arc<D> {
        Arc::clone(&self.directory)
    }

    /// True while the most recent request is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Last failure, cleared when a new lookup starts
    pub fn error(&self) -> Option<&LookupError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Postal code of the most recent request
    pub fn current_postal_code(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Start a lookup, superseding any request still in flight.
    ///
    /// Callers gate this on the postal code having exactly 8 digits.
    pub fn begin(&mut self, masked_postal_code: &str) -> LookupRequest {
        let postal_code = digits_only(masked_postal_code);
        self.generation += 1;
        self.current = Some(postal_code.clone());
        self.is_loading = true;
        self.error = None;

        tracing::debug!(
            postal_code = %postal_code,
            generation = self.generation,
            "address lookup started"
        );

        LookupRequest {
            generation: self.generation,
            postal_code,
        }
    }

    /// Apply a response to the record if it answers the latest request
    pub fn complete(&mut self, response: LookupResponse, record: &mut FormRecord) -> LookupOutcome {
        let LookupResponse { request, result } = response;

        if request.generation != self.generation {
            tracing::debug!(
                postal_code = %request.postal_code,
                "dropping superseded address lookup"
            );
            return LookupOutcome::Superseded;
        }

        self.is_loading = false;
        match result {
            Ok(address) => {
                tracing::info!(postal_code = %request.postal_code, "address lookup applied");
                address.merge_into(record);
                LookupOutcome::Applied
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(postal_code = %request.postal_code, "postal code not found");
                self.error = Some(e);
                LookupOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(postal_code = %request.postal_code, "address lookup failed: {e}");
                self.error = Some(e);
                LookupOutcome::Failed
            }
        }
    }

    /// Look up a masked postal code and merge the result into `record`
    pub async fn fetch_address(&mut self, masked_postal_code: &str, record: &mut FormRecord) -> LookupOutcome {
        let request = self.begin(masked_postal_code);
        let directory = self.directory();
        let response = request.send(&*directory).await;
        self.complete(response, record)
    }

    /// Forget any in-flight request and error
    pub fn reset(&mut self) {
        // Bumping the generation orphans responses still in flight
        self.generation += 1;
        self.current = None;
        self.is_loading = false;
        self.error = None;
    }
}
