//! Field value objects exposed to the presentation layer

use super::record::Field;

/// A single form field with its current value and error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
    /// Input max length, for masked fields with a fixed shape
    pub max_len: Option<usize>,
    pub placeholder: Option<&'static str>,
    /// Inputs are disabled while an address lookup may overwrite them
    pub disabled: bool,
}

impl FieldView {
    /// Create a view of a field holding the given value
    pub fn new(field: Field, value: &str) -> Self {
        let kind = field.kind();
        Self {
            field,
            label: field.label(),
            value: value.to_string(),
            error: None,
            max_len: kind.and_then(|k| k.max_len()),
            placeholder: kind.map(|k| k.placeholder()),
            disabled: false,
        }
    }

    pub fn with_error(mut self, error: Option<&str>) -> Self {
        self.error = error.map(str::to_string);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        if self.field.is_secret() {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
