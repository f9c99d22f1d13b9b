//! The registration record and its fixed field set

use crate::mask::FieldKind;
use serde::{Deserialize, Serialize};

/// Every field the registration form collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    DocumentNumber,
    Birthdate,
    Email,
    PostalCode,
    Phone,
    AddressNumber,
    AddressState,
    Country,
    City,
    District,
    Street,
    Complement,
    EducationLevel,
    Income,
    Password,
    ConfirmPassword,
}

impl Field {
    /// All fields in form order
    pub const ALL: [Field; 17] = [
        Field::FullName,
        Field::DocumentNumber,
        Field::Birthdate,
        Field::Email,
        Field::PostalCode,
        Field::Phone,
        Field::AddressNumber,
        Field::AddressState,
        Field::Country,
        Field::City,
        Field::District,
        Field::Street,
        Field::Complement,
        Field::EducationLevel,
        Field::Income,
        Field::Password,
        Field::ConfirmPassword,
    ];

    /// Fields the address lookup writes back into the record
    pub const ADDRESS_LOOKUP: [Field; 6] = [
        Field::PostalCode,
        Field::Street,
        Field::Complement,
        Field::District,
        Field::City,
        Field::AddressState,
    ];

    /// Stable key used in payloads and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::DocumentNumber => "document_number",
            Self::Birthdate => "birthdate",
            Self::Email => "email",
            Self::PostalCode => "postal_code",
            Self::Phone => "phone",
            Self::AddressNumber => "address_number",
            Self::AddressState => "address_state",
            Self::Country => "country",
            Self::City => "city",
            Self::District => "district",
            Self::Street => "street",
            Self::Complement => "complement",
            Self::EducationLevel => "education_level",
            Self::Income => "income",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::DocumentNumber => "CPF",
            Self::Birthdate => "Birthdate",
            Self::Email => "Email",
            Self::PostalCode => "CEP",
            Self::Phone => "Phone",
            Self::AddressNumber => "Number",
            Self::AddressState => "State",
            Self::Country => "Country",
            Self::City => "City",
            Self::District => "District",
            Self::Street => "Street",
            Self::Complement => "Complement",
            Self::EducationLevel => "Education level",
            Self::Income => "Monthly income",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
        }
    }

    /// Display mask applied to this field's input, if any
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::DocumentNumber => Some(FieldKind::NationalId),
            Self::Birthdate => Some(FieldKind::Date),
            Self::PostalCode => Some(FieldKind::PostalCode),
            Self::Phone => Some(FieldKind::Phone),
            Self::Income => Some(FieldKind::Currency),
            _ => None,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Password | Self::ConfirmPassword)
    }
}

/// Education level options offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationLevel {
    Elementary,
    HighSchool,
    Higher,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 3] = [
        EducationLevel::Elementary,
        EducationLevel::HighSchool,
        EducationLevel::Higher,
    ];

    /// Text stored in the record when this option is picked
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elementary => "Ensino Fundamental Completo",
            Self::HighSchool => "Ensino médio completo",
            Self::Higher => "Ensino superior completo",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }
}

/// Flat record of field values in their display (masked) form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub full_name: String,
    pub document_number: String,
    pub birthdate: String,
    pub email: String,
    pub postal_code: String,
    pub phone: String,
    pub address_number: String,
    pub address_state: String,
    pub country: String,
    pub city: String,
    pub district: String,
    pub street: String,
    pub complement: String,
    pub education_level: String,
    pub income: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::DocumentNumber => &self.document_number,
            Field::Birthdate => &self.birthdate,
            Field::Email => &self.email,
            Field::PostalCode => &self.postal_code,
            Field::Phone => &self.phone,
            Field::AddressNumber => &self.address_number,
            Field::AddressState => &self.address_state,
            Field::Country => &self.country,
            Field::City => &self.city,
            Field::District => &self.district,
            Field::Street => &self.street,
            Field::Complement => &self.complement,
            Field::EducationLevel => &self.education_level,
            Field::Income => &self.income,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FullName => &mut self.full_name,
            Field::DocumentNumber => &mut self.document_number,
            Field::Birthdate => &mut self.birthdate,
            Field::Email => &mut self.email,
            Field::PostalCode => &mut self.postal_code,
            Field::Phone => &mut self.phone,
            Field::AddressNumber => &mut self.address_number,
            Field::AddressState => &mut self.address_state,
            Field::Country => &mut self.country,
            Field::City => &mut self.city,
            Field::District => &mut self.district,
            Field::Street => &mut self.street,
            Field::Complement => &mut self.complement,
            Field::EducationLevel => &mut self.education_level,
            Field::Income => &mut self.income,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        }
    }

    /// Store a value as given, without masking
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Iterate over (field, value) pairs in form order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = FormRecord::new();
        assert!(record.iter().all(|(_, value)| value.is_empty()));
        assert_eq!(record.iter().count(), 17);
    }

    #[test]
    fn test_set_and_get_every_field() {
        let mut record = FormRecord::new();
        for field in Field::ALL {
            record.set(field, field.name());
        }
        for field in Field::ALL {
            assert_eq!(record.get(field), field.name());
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<_> = Field::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Field::ALL.len());
    }

    #[test]
    fn test_masked_fields() {
        let masked: Vec<_> = Field::ALL.into_iter().filter(|f| f.kind().is_some()).collect();
        assert_eq!(
            masked,
            vec![
                Field::DocumentNumber,
                Field::Birthdate,
                Field::PostalCode,
                Field::Phone,
                Field::Income
            ]
        );
    }

    #[test]
    fn test_education_level_labels_round_trip() {
        for level in EducationLevel::ALL {
            assert_eq!(EducationLevel::from_label(level.label()), Some(level));
        }
        assert_eq!(EducationLevel::from_label("Doutorado"), None);
    }

    #[test]
    fn test_record_serializes_with_snake_case_keys() {
        let mut record = FormRecord::new();
        record.set(Field::FullName, "Ana");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["full_name"], "Ana");
        assert_eq!(json["confirm_password"], "");
    }
}
