use super::common::*;

use crate::workflows::autofill::domain::{FieldCategory, InputKind};
use crate::workflows::autofill::format_value;

#[test]
fn format_value_normalizes_by_kind_and_label() {
    let phone = field("Phone", InputKind::Phone, FieldCategory::Contact);
    let email = field("Email", InputKind::Email, FieldCategory::Contact);
    let date = field("Start Date", InputKind::Date, FieldCategory::Availability);
    let number = field("Years", InputKind::Number, FieldCategory::Experience);
    let salary = field("Expected Salary", InputKind::Text, FieldCategory::Salary);
    let linkedin = field("LinkedIn", InputKind::Text, FieldCategory::Contact);

    assert_eq!(format_value(&phone, "123-456-7890"), "(123) 456-7890");
    assert_eq!(format_value(&phone, "11234567890"), "+1 (123) 456-7890");
    assert_eq!(format_value(&email, " Jane.Doe@Example.COM "), "jane.doe@example.com");
    assert_eq!(format_value(&date, "March 7, 2025"), "2025-03-07");
    assert_eq!(format_value(&number, "1234567"), "1,234,567");
    assert_eq!(format_value(&salary, "95000"), "$95,000");
    assert_eq!(
        format_value(&linkedin, "linkedin.com/in/jane"),
        "https://linkedin.com/in/jane"
    );
}

#[test]
fn unparseable_values_pass_through_unchanged() {
    let phone = field("Phone", InputKind::Phone, FieldCategory::Contact);
    let date = field("Start Date", InputKind::Date, FieldCategory::Availability);
    let text = field("Notes", InputKind::Textarea, FieldCategory::Unknown);

    assert_eq!(format_value(&phone, "ask me"), "ask me");
    assert_eq!(format_value(&date, "soon"), "soon");
    assert_eq!(format_value(&text, "  keep my spacing "), "  keep my spacing ");
}

#[test]
fn formatting_is_idempotent() {
    let cases = [
        (field("Phone", InputKind::Phone, FieldCategory::Contact), "(555) 010-9999 "),
        (field("Phone", InputKind::Phone, FieldCategory::Contact), "1 555 010 9999"),
        (field("Email", InputKind::Email, FieldCategory::Contact), "USER@MAIL.COM"),
        (field("Start", InputKind::Date, FieldCategory::Availability), "07/04/2025"),
        (field("Count", InputKind::Number, FieldCategory::Unknown), "-1234.5"),
        (field("Base Salary", InputKind::Text, FieldCategory::Salary), "$ 130,000"),
        (field("LinkedIn", InputKind::Text, FieldCategory::Contact), "http://linkedin.com/in/x"),
        (field("Notes", InputKind::Text, FieldCategory::Unknown), "free text"),
    ];

    for (field, raw) in cases {
        let once = format_value(&field, raw);
        let twice = format_value(&field, &once);
        assert_eq!(once, twice, "formatting {raw:?} for {} is not stable", field.label);
    }
}

#[test]
fn validator_formatting_matches_free_function() {
    let validator = validator();
    let phone = field("Phone", InputKind::Phone, FieldCategory::Contact);
    assert_eq!(
        validator.format_value(&phone, "5550109999"),
        format_value(&phone, "5550109999")
    );
}
