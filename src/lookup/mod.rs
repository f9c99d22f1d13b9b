//! Postal-code address lookup

mod adapter;
mod directory;
mod retry;
mod viacep;

pub use adapter::{AddressLookup, LookupOutcome, LookupRequest, LookupResponse};
pub use directory::{AddressDirectory, AddressLookupResult, LookupError};
pub use retry::{RetryPolicy, MAX_RETRIES};
pub use viacep::ViaCepClient;

#[cfg(test)]
pub use directory::MockAddressDirectory;
