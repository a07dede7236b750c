mod category;
mod rules;

pub(crate) use rules::{parse_date, parse_number, us_phone};

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

use super::domain::{DetectedField, ValidationResult};
use super::format;

/// Validates and normalizes candidate values for detected fields.
///
/// Validation never fails: every problem is reported inside the returned
/// [`ValidationResult`].
#[derive(Clone)]
pub struct FieldValidator {
    clock: Arc<dyn Clock>,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl FieldValidator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Required/empty gate, then input-kind, category, and label-hint checks merged in order.
    pub fn validate_field(&self, field: &DetectedField, value: &str) -> ValidationResult {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return if field.required {
                ValidationResult::invalid(format!("{} is required", display_name(field)))
            } else {
                ValidationResult::valid()
            };
        }

        rules::check_input_kind(field, trimmed, self.clock.today())
            .merge(category::check_category(field, trimmed))
            .merge(category::check_label_hints(field, trimmed))
    }

    pub fn format_value(&self, field: &DetectedField, value: &str) -> String {
        format::format_value(field, value)
    }
}

fn display_name(field: &DetectedField) -> &str {
    if field.label.is_empty() {
        "This field"
    } else {
        &field.label
    }
}
