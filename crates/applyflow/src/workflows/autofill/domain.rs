use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag of a raw form control as exposed by the page snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlTag {
    Input,
    Textarea,
    Select,
}

/// Raw control handed over by the browser layer before classification.
///
/// `handle` is opaque to the classifier; only the [`LabelLookup`](super::LabelLookup)
/// implementation that produced the element knows how to navigate from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormElement {
    pub handle: usize,
    pub tag: ControlTag,
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FormElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Closed set of input kinds the validator dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Phone,
    Textarea,
    Select,
    Checkbox,
    Radio,
    File,
    Date,
    Number,
}

impl InputKind {
    /// Map an `<input type="...">` value onto the closed enumeration.
    pub fn from_input_type(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("email") => Self::Email,
            Some("tel") => Self::Phone,
            Some("file") => Self::File,
            Some("checkbox") => Self::Checkbox,
            Some("radio") => Self::Radio,
            Some("date") => Self::Date,
            Some("number") => Self::Number,
            _ => Self::Text,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Phone => "phone",
            InputKind::Textarea => "textarea",
            InputKind::Select => "select",
            InputKind::Checkbox => "checkbox",
            InputKind::Radio => "radio",
            InputKind::File => "file",
            InputKind::Date => "date",
            InputKind::Number => "number",
        }
    }
}

/// Semantic taxonomy assigned to every detected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    PersonalInfo,
    Contact,
    Employment,
    Education,
    Skills,
    Experience,
    Salary,
    Availability,
    Authorization,
    Documents,
    Unknown,
}

impl FieldCategory {
    /// Classification order; earlier categories win ties.
    pub const ORDERED: [FieldCategory; 10] = [
        FieldCategory::PersonalInfo,
        FieldCategory::Contact,
        FieldCategory::Employment,
        FieldCategory::Education,
        FieldCategory::Skills,
        FieldCategory::Experience,
        FieldCategory::Salary,
        FieldCategory::Availability,
        FieldCategory::Authorization,
        FieldCategory::Documents,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FieldCategory::PersonalInfo => "personal_info",
            FieldCategory::Contact => "contact",
            FieldCategory::Employment => "employment",
            FieldCategory::Education => "education",
            FieldCategory::Skills => "skills",
            FieldCategory::Experience => "experience",
            FieldCategory::Salary => "salary",
            FieldCategory::Availability => "availability",
            FieldCategory::Authorization => "authorization",
            FieldCategory::Documents => "documents",
            FieldCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified form control ready for validation and autofill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedField {
    pub id: String,
    pub selector: String,
    pub input_kind: InputKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    pub category: FieldCategory,
    pub confidence: u8,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl DetectedField {
    /// An empty selector means the field cannot be targeted reliably later.
    pub fn is_targetable(&self) -> bool {
        !self.selector.is_empty()
    }

    pub(crate) fn label_mentions(&self, needle: &str) -> bool {
        self.label.to_lowercase().contains(needle)
    }
}

/// Outcome of validating one candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            ..Self::default()
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            errors: vec![error.into()],
            ..Self::default()
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn suggest(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    pub fn offer_formatted(&mut self, value: impl Into<String>) {
        if self.formatted_value.is_none() {
            let value = value.into();
            if !value.is_empty() {
                self.formatted_value = Some(value);
            }
        }
    }

    /// Combine two results; `self` ran first.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggestions.extend(other.suggestions);
        if let Some(value) = other.formatted_value {
            self.offer_formatted(value);
        }
        self
    }
}
