use super::super::domain::{DetectedField, FieldCategory, InputKind, ValidationResult};
use super::super::format::{format_salary, has_url_scheme, normalize_url};
use super::rules::{check_email, check_phone};

/// Checks keyed by the semantic category rather than the input kind.
pub(crate) fn check_category(field: &DetectedField, value: &str) -> ValidationResult {
    match field.category {
        FieldCategory::Contact => {
            let mut result = ValidationResult::valid();
            if field.label_mentions("phone") && field.input_kind != InputKind::Phone {
                result = result.merge(check_phone(value));
            }
            if field.label_mentions("email") && field.input_kind != InputKind::Email {
                result = result.merge(check_email(value));
            }
            result
        }
        FieldCategory::PersonalInfo if field.label_mentions("name") => check_name(value),
        _ => ValidationResult::valid(),
    }
}

/// Heuristics for person names. Never blocking.
pub(crate) fn check_name(value: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let trimmed = value.trim();

    if trimmed.chars().count() < 2 {
        result.warn("Name seems too short");
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        result.warn("Name contains numbers");
    }
    if trimmed.chars().any(|c| {
        !(c.is_alphabetic() || c.is_whitespace() || c.is_ascii_digit() || matches!(c, '-' | '\'' | '.'))
    }) {
        result.warn("Name contains unusual special characters");
    }

    let proper = title_case(trimmed);
    if proper != trimmed {
        result.suggest(format!("Consider using proper capitalization: {proper}"));
        result.offer_formatted(proper);
    }

    result
}

/// Free-form hints driven by label keywords.
pub(crate) fn check_label_hints(field: &DetectedField, value: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let lowered = value.to_lowercase();

    for (keyword, host, site) in [
        ("linkedin", "linkedin.com", "LinkedIn"),
        ("github", "github.com", "GitHub"),
    ] {
        if !field.label_mentions(keyword) {
            continue;
        }
        if !lowered.contains(host) {
            result.warn(format!("This does not look like a {site} profile URL"));
        } else if !has_url_scheme(value) {
            result.suggest("Include the full URL starting with https://");
            result.offer_formatted(normalize_url(value));
        }
    }

    if field.label_mentions("salary") {
        if !value.chars().any(|c| c.is_ascii_digit()) {
            result.warn("Salary should include a numeric amount");
        } else if let Some(formatted) = format_salary(value) {
            if formatted != value.trim() {
                result.suggest(format!("Consider formatting salary as {formatted}"));
                result.offer_formatted(formatted);
            }
        }
    }

    result
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut capitalize = true;
            word.chars()
                .flat_map(|c| {
                    let mapped: Vec<char> = if capitalize {
                        c.to_uppercase().collect()
                    } else {
                        c.to_lowercase().collect()
                    };
                    capitalize = matches!(c, '-' | '\'');
                    mapped
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
