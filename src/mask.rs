//! Display masks for the regional field formats
//!
//! Every mask strips the raw input down to its digits and re-inserts the
//! punctuation at fixed digit-count boundaries. Unmasking recovers the
//! normalized value used for submission.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Currency symbol followed by a no-break space, as the pt-BR locale renders it.
pub const CURRENCY_PREFIX: &str = "R$\u{a0}";

/// Errors raised when a display value cannot be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("malformed date {input:?}, expected DD/MM/YYYY")]
    Date { input: String },
    #[error("malformed currency amount {input:?}")]
    Currency { input: String },
}

/// Field types that carry a display mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `DD/MM/YYYY`
    Date,
    /// CPF, `DDD.DDD.DDD-DD`
    NationalId,
    /// CEP, `DDDDD-DDD`
    PostalCode,
    /// `(DD) DDDDD-DDDD`
    Phone,
    /// `R$ 1.234,56`, entered as cents
    Currency,
}

/// Canonical value recovered from a masked display string
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Digits(String),
    Date(NaiveDate),
    Amount(f64),
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Date,
        FieldKind::NationalId,
        FieldKind::PostalCode,
        FieldKind::Phone,
        FieldKind::Currency,
    ];

    /// Maximum number of digits the mask keeps (None for currency)
    pub fn max_digits(self) -> Option<usize> {
        match self {
            Self::Date => Some(8),
            Self::NationalId => Some(11),
            Self::PostalCode => Some(8),
            Self::Phone => Some(11),
            Self::Currency => None,
        }
    }

    /// Maximum display length, used as the input's max length
    pub fn max_len(self) -> Option<usize> {
        match self {
            Self::Date => Some(10),
            Self::NationalId => Some(14),
            Self::PostalCode => Some(9),
            Self::Phone => Some(15),
            Self::Currency => None,
        }
    }

    /// Input placeholder showing the expected shape
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Date => "DD/MM/YYYY",
            Self::NationalId => "000.000.000-00",
            Self::PostalCode => "00000-000",
            Self::Phone => "(00) 00000-0000",
            Self::Currency => "R$ 0,00",
        }
    }

    /// Format raw user input for display
    pub fn mask(self, raw: &str) -> String {
        match self {
            Self::Date => mask_date(raw),
            Self::NationalId => mask_national_id(raw),
            Self::PostalCode => mask_postal_code(raw),
            Self::Phone => mask_phone(raw),
            Self::Currency => mask_currency(raw),
        }
    }

    /// Recover the normalized value from a display string
    pub fn unmask(self, display: &str) -> Result<NormalizedValue, MaskError> {
        match self {
            Self::Date => unmask_date(display).map(NormalizedValue::Date),
            Self::NationalId | Self::PostalCode | Self::Phone => {
                Ok(NormalizedValue::Digits(digits_only(display)))
            }
            Self::Currency => unmask_currency(display).map(NormalizedValue::Amount),
        }
    }
}

/// Keep only ASCII digits
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Insert `separators` before the digit at each given index, up to `max_digits`.
///
/// A separator is only emitted when a digit follows it, so partial input never
/// ends in punctuation.
fn punctuate(raw: &str, max_digits: usize, separators: &[(usize, &str)]) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(max_digits)
        .collect();

    let mut out = String::with_capacity(digits.len() + 4);
    for (i, d) in digits.iter().enumerate() {
        if let Some((_, sep)) = separators.iter().find(|(at, _)| *at == i) {
            out.push_str(sep);
        }
        out.push(*d);
    }
    out
}

pub fn mask_date(raw: &str) -> String {
    punctuate(raw, 8, &[(2, "/"), (4, "/")])
}

pub fn mask_national_id(raw: &str) -> String {
    punctuate(raw, 11, &[(3, "."), (6, "."), (9, "-")])
}

pub fn mask_postal_code(raw: &str) -> String {
    punctuate(raw, 8, &[(5, "-")])
}

pub fn mask_phone(raw: &str) -> String {
    let body = punctuate(raw, 11, &[(2, ") "), (7, "-")]);
    // Area code gets its parenthesis once the subscriber number starts
    if body.len() > 2 {
        format!("({body}")
    } else {
        body
    }
}

/// Format a digit run as a BRL amount, treating the digits as cents.
///
/// Works on the digit string directly so arbitrarily long input neither
/// overflows nor loses precision.
pub fn mask_currency(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return String::new();
    }

    let significant = digits.trim_start_matches('0');
    let padded = format!("{significant:0>3}");
    let (units, cents) = padded.split_at(padded.len() - 2);

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, d) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(d);
    }

    format!("{CURRENCY_PREFIX}{grouped},{cents}")
}

/// Parse a `DD/MM/YYYY` display string into a calendar date.
///
/// Months are taken as written (1-12); callers must not re-offset them.
pub fn unmask_date(display: &str) -> Result<NaiveDate, MaskError> {
    let malformed = || MaskError::Date {
        input: display.to_string(),
    };

    let mut parts = display.split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let day: u32 = day.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let year: i32 = year.parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

pub fn unmask_digits(display: &str) -> String {
    digits_only(display)
}

/// Amount in currency units: the display's digit run divided by 100
pub fn unmask_currency(display: &str) -> Result<f64, MaskError> {
    let digits = digits_only(display);
    if digits.is_empty() {
        return Err(MaskError::Currency {
            input: display.to_string(),
        });
    }
    digits
        .parse::<f64>()
        .map(|cents| cents / 100.0)
        .map_err(|_| MaskError::Currency {
            input: display.to_string(),
        })
}
