//! Crate-level error type

use crate::lookup::LookupError;
use crate::mask::MaskError;
use crate::submit::SubmitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Mask(#[from] MaskError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

pub type Result<T> = std::result::Result<T, Error>;
