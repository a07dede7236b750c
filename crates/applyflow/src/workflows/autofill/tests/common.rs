use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::clock::ManualClock;
use crate::workflows::autofill::domain::{
    ControlTag, DetectedField, FieldCategory, FormElement, InputKind,
};
use crate::workflows::autofill::validation::FieldValidator;

pub(super) const APPLICATION_PAGE: &str = r#"
<html>
  <body>
    <form id="apply">
      <input type="hidden" name="csrf" value="token">
      <label for="first_name">First Name *</label>
      <input id="first_name" name="first_name" autocomplete="given-name" required>
      <label for="last_name">Last Name:</label>
      <input id="last_name" name="last_name" required>
      <label>Email <input id="email" name="email" type="email" aria-required="true"></label>
      <div class="row">
        <label>Phone</label><input name="phone" type="tel">
      </div>
      <span>LinkedIn Profile</span>
      <div><input name="linkedin_url" type="text"></div>
      <label for="salary">Desired Salary</label>
      <input id="salary" name="salary" type="text">
      <label for="start">Earliest Start Date</label>
      <input id="start" name="start_date" type="date">
      <label for="sponsorship">Will you require visa sponsorship?</label>
      <select id="sponsorship" name="sponsorship">
        <option>Yes</option>
        <option>No</option>
      </select>
      <label for="resume">Resume</label>
      <input id="resume" name="resume" type="file" required>
      <input type="text">
      <textarea class="cover-notes" placeholder="Anything else?"></textarea>
      <button type="submit">Apply</button>
      <input type="submit" value="Send">
    </form>
  </body>
</html>
"#;

pub(super) fn validator() -> FieldValidator {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
    FieldValidator::new(Arc::new(clock))
}

pub(super) fn element(handle: usize, tag: ControlTag, attributes: &[(&str, &str)]) -> FormElement {
    FormElement {
        handle,
        tag,
        attributes: attributes
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<BTreeMap<_, _>>(),
        options: Vec::new(),
    }
}

pub(super) fn field(label: &str, input_kind: InputKind, category: FieldCategory) -> DetectedField {
    let id = label.to_lowercase().replace(' ', "_");
    DetectedField {
        selector: format!("#{id}"),
        id,
        input_kind,
        label: label.to_string(),
        placeholder: None,
        required: false,
        category,
        confidence: 80,
        options: Vec::new(),
        attributes: BTreeMap::new(),
    }
}

pub(super) fn required(mut field: DetectedField) -> DetectedField {
    field.required = true;
    field
}

pub(super) fn with_options(mut field: DetectedField, options: &[&str]) -> DetectedField {
    field.options = options.iter().map(|option| option.to_string()).collect();
    field
}
