use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;

use super::super::domain::{DetectedField, InputKind, ValidationResult};

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

const DOMAIN_TYPOS: [(&str, &str); 5] = [
    ("gmial.com", "gmail.com"),
    ("gmai.com", "gmail.com"),
    ("hotmal.com", "hotmail.com"),
    ("yahooo.com", "yahoo.com"),
    ("outlok.com", "outlook.com"),
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;
const MAX_LISTED_OPTIONS: usize = 5;

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

/// Dispatch on the closed input-kind enumeration.
pub(crate) fn check_input_kind(
    field: &DetectedField,
    value: &str,
    today: NaiveDate,
) -> ValidationResult {
    match field.input_kind {
        InputKind::Email => check_email(value),
        InputKind::Phone => check_phone(value),
        InputKind::Date => check_date(value, today),
        InputKind::Number => check_number(value),
        InputKind::Select => check_select(&field.options, value),
        InputKind::Text
        | InputKind::Textarea
        | InputKind::Checkbox
        | InputKind::Radio
        | InputKind::File => ValidationResult::valid(),
    }
}

pub(crate) fn check_email(value: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let value = value.trim();

    if !email_pattern().is_match(value) {
        result.error("Please enter a valid email address");
        return result;
    }

    if let Some((local, domain)) = value.rsplit_once('@') {
        let domain = domain.to_ascii_lowercase();
        if let Some((_, corrected_domain)) = DOMAIN_TYPOS.iter().find(|(typo, _)| *typo == domain)
        {
            let corrected = format!("{local}@{corrected_domain}");
            result.warn(format!("Did you mean {corrected}?"));
            result.offer_formatted(corrected);
        }
    }

    result
}

pub(crate) fn check_phone(value: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    let international = cleaned.starts_with('+');
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        result.error("Phone number contains invalid characters");
        return result;
    }

    if digits.len() < MIN_PHONE_DIGITS {
        result.error(format!(
            "Phone number is too short (minimum {MIN_PHONE_DIGITS} digits)"
        ));
    } else if digits.len() > MAX_PHONE_DIGITS {
        result.error(format!(
            "Phone number is too long (maximum {MAX_PHONE_DIGITS} digits)"
        ));
    } else if digits.len() == 10 && !international {
        result.offer_formatted(us_phone(digits));
    }

    result
}

pub(crate) fn check_date(value: &str, today: NaiveDate) -> ValidationResult {
    let mut result = ValidationResult::valid();

    match parse_date(value) {
        None => result.error("Please enter a valid date"),
        Some(date) => {
            if date > today {
                result.warn("Date is in the future");
            }
            if date.year() < 1900 {
                result.warn("Date is before 1900; please double-check the year");
            }
        }
    }

    result
}

pub(crate) fn check_number(value: &str) -> ValidationResult {
    match parse_number(value) {
        Some(_) => ValidationResult::valid(),
        None => ValidationResult::invalid("Please enter a valid number"),
    }
}

pub(crate) fn check_select(options: &[String], value: &str) -> ValidationResult {
    let mut result = ValidationResult::valid();
    if options.is_empty() {
        return result;
    }

    let needle = value.trim().to_lowercase();
    match options
        .iter()
        .find(|option| option.trim().to_lowercase() == needle)
    {
        Some(option) => {
            if option.trim() != value.trim() {
                result.offer_formatted(option.trim());
            }
        }
        None => {
            result.error("Please select one of the available options");
            let listed = options
                .iter()
                .take(MAX_LISTED_OPTIONS)
                .map(|option| option.trim())
                .collect::<Vec<_>>()
                .join(", ");
            result.suggest(format!("Available options: {listed}"));
        }
    }

    result
}

/// Lenient date parsing shared by validation and formatting.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parse after stripping thousands separators and dollar signs.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

pub(crate) fn us_phone(digits: &str) -> String {
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        for raw in [
            "2024-03-07",
            "2024/03/07",
            "03/07/2024",
            "3/7/2024",
            "03-07-2024",
            "March 7, 2024",
            "Mar 7, 2024",
            "7 March 2024",
            "2024-03-07T10:00:00Z",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "failed to parse {raw}");
        }
        assert_eq!(parse_date("next tuesday"), None);
    }

    #[test]
    fn numbers_ignore_currency_and_grouping() {
        assert_eq!(parse_number("$1,250.50"), Some(1250.5));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("twelve"), None);
    }
}
