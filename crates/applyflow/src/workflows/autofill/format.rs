use super::domain::{DetectedField, InputKind};
use super::validation::{parse_date, parse_number, us_phone};

/// Best-effort normalization for filling. Unparseable input comes back unchanged.
pub fn format_value(field: &DetectedField, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return value.to_string();
    }

    if field.label_mentions("salary") {
        if let Some(formatted) = format_salary(trimmed) {
            return formatted;
        }
    }

    if field.label_mentions("linkedin") {
        return normalize_url(trimmed);
    }

    let formatted = match field.input_kind {
        InputKind::Phone => format_phone(trimmed),
        InputKind::Email => Some(trimmed.to_lowercase()),
        InputKind::Date => parse_date(trimmed).map(|date| date.format("%Y-%m-%d").to_string()),
        InputKind::Number => format_number(trimmed),
        InputKind::Text
        | InputKind::Textarea
        | InputKind::Select
        | InputKind::Checkbox
        | InputKind::Radio
        | InputKind::File => None,
    };

    formatted.unwrap_or_else(|| value.to_string())
}

/// `(XXX) XXX-XXXX` for 10 digits, `+1 (XXX) XXX-XXXX` for 11 digits with a leading 1.
pub fn format_phone(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 => Some(us_phone(&digits)),
        11 if digits.starts_with('1') => Some(format!("+1 {}", us_phone(&digits[1..]))),
        _ => None,
    }
}

/// en-US digit grouping, keeping up to three fractional digits.
pub fn format_number(value: &str) -> Option<String> {
    let number = parse_number(value)?;
    let negative = number < 0.0;
    let rendered = format!("{:.3}", number.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut formatted = String::new();
    if negative {
        formatted.push('-');
    }
    formatted.push_str(&group_thousands(integer));
    if !fraction.is_empty() {
        formatted.push('.');
        formatted.push_str(fraction);
    }
    Some(formatted)
}

pub fn format_salary(value: &str) -> Option<String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    format_number(&compact).map(|number| match number.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${number}"),
    })
}

pub fn normalize_url(value: &str) -> String {
    let trimmed = value.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.starts_with("https://") {
        trimmed.to_string()
    } else if lowered.starts_with("http://") {
        format!("https://{}", &trimmed["http://".len()..])
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}

pub(crate) fn has_url_scheme(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    lowered.starts_with("https://") || lowered.starts_with("http://")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
