//! Registration form validation
//!
//! Validation is a table of per-field rules followed by cross-field rules.
//! Every field is checked on every pass; a field reports the message of the
//! first rule it fails. Cross-field rules only run once the fields they read
//! are individually valid.

use crate::mask::unmask_date;
use crate::state::{Field, FormRecord};
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const MIN_AGE: i32 = 18;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});

/// Field name to error message; a missing entry means the field is valid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<Field, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Invalid fields in form order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

/// Values a rule may consult besides the field itself
struct RuleContext {
    today: NaiveDate,
}

struct Rule {
    check: fn(&str, &RuleContext) -> bool,
    message: &'static str,
}

/// Rule over the whole record whose error lands on `target`
struct CrossRule {
    reads: &'static [Field],
    target: Field,
    check: fn(&FormRecord) -> bool,
    message: &'static str,
}

const fn rule(check: fn(&str, &RuleContext) -> bool, message: &'static str) -> Rule {
    Rule { check, message }
}

fn len(value: &str) -> usize {
    value.chars().count()
}

fn required(value: &str, _: &RuleContext) -> bool {
    !value.is_empty()
}

static FULL_NAME: [Rule; 2] = [
    rule(required, "Full name is required"),
    rule(|v, _| len(v) <= 100, "Maximum 100 characters"),
];
static DOCUMENT_NUMBER: [Rule; 1] = [rule(
    |v, _| len(v) == 14,
    "CPF must have 14 characters (including symbols)",
)];
static BIRTHDATE: [Rule; 2] = [
    rule(|v, _| len(v) >= 9, "Invalid birthdate"),
    rule(is_adult, "You must be at least 18 years old"),
];
static EMAIL: [Rule; 1] = [rule(|v, _| is_valid_email(v), "Invalid email")];
static POSTAL_CODE: [Rule; 1] = [rule(|v, _| len(v) >= 8, "CEP must have at least 8 characters")];
static PHONE: [Rule; 1] = [rule(
    |v, _| len(v) >= 11,
    "Phone must have at least 11 characters",
)];
static ADDRESS_NUMBER: [Rule; 2] = [
    rule(required, "Number is required"),
    rule(|v, _| len(v) <= 40, "Maximum 40 characters"),
];
static ADDRESS_STATE: [Rule; 1] = [rule(|v, _| len(v) == 2, "State must have 2 characters")];
static COUNTRY: [Rule; 1] = [rule(required, "Country is required")];
static CITY: [Rule; 1] = [rule(required, "City is required")];
static DISTRICT: [Rule; 1] = [rule(required, "District is required")];
static STREET: [Rule; 1] = [rule(required, "Street is required")];
static EDUCATION_LEVEL: [Rule; 1] = [rule(required, "Education level is required")];
static INCOME: [Rule; 1] = [rule(required, "Monthly income is required")];
static PASSWORD: [Rule; 1] = [rule(
    |v, _| len(v) >= 10,
    "Password must have at least 10 characters",
)];
static CONFIRM_PASSWORD: [Rule; 1] = [rule(
    |v, _| len(v) >= 10,
    "Password confirmation must have at least 10 characters",
)];

static CROSS_RULES: [CrossRule; 1] = [CrossRule {
    reads: &[Field::Password, Field::ConfirmPassword],
    target: Field::ConfirmPassword,
    check: |record| record.password == record.confirm_password,
    message: "Passwords do not match",
}];

fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::FullName => &FULL_NAME,
        Field::DocumentNumber => &DOCUMENT_NUMBER,
        Field::Birthdate => &BIRTHDATE,
        Field::Email => &EMAIL,
        Field::PostalCode => &POSTAL_CODE,
        Field::Phone => &PHONE,
        Field::AddressNumber => &ADDRESS_NUMBER,
        Field::AddressState => &ADDRESS_STATE,
        Field::Country => &COUNTRY,
        Field::City => &CITY,
        Field::District => &DISTRICT,
        Field::Street => &STREET,
        Field::Complement => &[],
        Field::EducationLevel => &EDUCATION_LEVEL,
        Field::Income => &INCOME,
        Field::Password => &PASSWORD,
        Field::ConfirmPassword => &CONFIRM_PASSWORD,
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

/// Whole years elapsed between `birth` and `today`.
///
/// A year only counts once today's month/day reaches the birth month/day.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

fn is_adult(birthdate: &str, ctx: &RuleContext) -> bool {
    unmask_date(birthdate).is_ok_and(|birth| age_on(birth, ctx.today) >= MIN_AGE)
}

/// Validate a record against today's local date
pub fn validate(record: &FormRecord) -> ValidationResult {
    validate_on(record, Local::now().date_naive())
}

/// Validate a record, computing ages against `today`
pub fn validate_on(record: &FormRecord, today: NaiveDate) -> ValidationResult {
    let ctx = RuleContext { today };
    let mut result = ValidationResult::default();

    for field in Field::ALL {
        let value = record.get(field);
        if let Some(failed) = rules_for(field).iter().find(|r| !(r.check)(value, &ctx)) {
            result.insert(field, failed.message);
        }
    }

    for cross in &CROSS_RULES {
        let inputs_valid = cross.reads.iter().all(|f| result.get(*f).is_none());
        if inputs_valid && result.get(cross.target).is_none() && !(cross.check)(record) {
            result.insert(cross.target, cross.message);
        }
    }

    result
}
