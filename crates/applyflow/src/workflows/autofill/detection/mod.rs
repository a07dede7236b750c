mod labels;
mod patterns;

pub use labels::{resolve_label, LabelHints, LabelLookup, LookupError, PrecomputedLabels};

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::domain::{ControlTag, DetectedField, FieldCategory, FormElement, InputKind};

/// Attributes copied onto a [`DetectedField`]; everything else is ignored.
pub const ATTRIBUTE_ALLOWLIST: [&str; 11] = [
    "id",
    "name",
    "type",
    "placeholder",
    "required",
    "aria-required",
    "aria-label",
    "data-field",
    "class",
    "autocomplete",
    "pattern",
];

const EXCLUDED_INPUT_TYPES: [&str; 3] = ["hidden", "submit", "button"];

const BASE_CONFIDENCE: i32 = 50;

/// Classify every eligible control on a page.
///
/// A lookup failure for one element drops that element only.
pub fn detect_fields<L>(elements: &[FormElement], lookup: &L) -> Vec<DetectedField>
where
    L: LabelLookup + ?Sized,
{
    let mut fields = Vec::new();

    for (index, element) in elements.iter().enumerate() {
        if is_excluded(element) {
            continue;
        }

        match analyze_element(element, index, lookup) {
            Ok(Some(field)) => {
                debug!(
                    field = %field.id,
                    category = %field.category,
                    confidence = field.confidence,
                    "classified form field"
                );
                fields.push(field);
            }
            Ok(None) => {}
            Err(error) => {
                warn!(handle = element.handle, %error, "skipping form element");
            }
        }
    }

    fields
}

/// Classify a single control. Returns `None` when it has no identifying signal.
pub fn analyze_element<L>(
    element: &FormElement,
    index: usize,
    lookup: &L,
) -> Result<Option<DetectedField>, LookupError>
where
    L: LabelLookup + ?Sized,
{
    let attributes: BTreeMap<String, String> = element
        .attributes
        .iter()
        .filter(|(key, _)| ATTRIBUTE_ALLOWLIST.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let id = element.attr("id");
    let name = element.attr("name");
    let placeholder = element.attr("placeholder");
    let label = resolve_label(element, lookup)?;

    if id.is_none() && name.is_none() && label.is_empty() {
        return Ok(None);
    }

    let input_kind = match element.tag {
        ControlTag::Textarea => InputKind::Textarea,
        ControlTag::Select => InputKind::Select,
        ControlTag::Input => InputKind::from_input_type(element.attr("type")),
    };

    let category = if input_kind == InputKind::File {
        FieldCategory::Documents
    } else {
        patterns::category_for(&search_text(&label, name, id, placeholder))
    };

    let required = element.has_attr("required")
        || element
            .attr("aria-required")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

    let options = match input_kind {
        InputKind::Select | InputKind::Radio => element.options.clone(),
        _ => Vec::new(),
    };

    let confidence = confidence_score(element, &label, category);

    Ok(Some(DetectedField {
        id: id
            .or(name)
            .map(str::to_string)
            .unwrap_or_else(|| format!("field-{index}")),
        selector: build_selector(element),
        input_kind,
        label,
        placeholder: placeholder.map(str::to_string),
        required,
        category,
        confidence,
        options,
        attributes,
    }))
}

fn is_excluded(element: &FormElement) -> bool {
    element.tag == ControlTag::Input
        && element
            .attr("type")
            .map(|kind| kind.to_ascii_lowercase())
            .is_some_and(|kind| EXCLUDED_INPUT_TYPES.contains(&kind.as_str()))
}

fn search_text(label: &str, name: Option<&str>, id: Option<&str>, placeholder: Option<&str>) -> String {
    [Some(label), name, id, placeholder]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `#id`, `[name]`, `[data-field]`, first class, else empty.
pub fn build_selector(element: &FormElement) -> String {
    if let Some(id) = element.attr("id") {
        return format!("#{id}");
    }
    if let Some(name) = element.attr("name") {
        return format!("[name=\"{name}\"]");
    }
    if let Some(data_field) = element.attr("data-field") {
        return format!("[data-field=\"{data_field}\"]");
    }
    if let Some(class) = element
        .attr("class")
        .and_then(|classes| classes.split_whitespace().next())
    {
        return format!(".{class}");
    }
    String::new()
}

fn confidence_score(element: &FormElement, label: &str, category: FieldCategory) -> u8 {
    let mut score = BASE_CONFIDENCE;

    if element.attr("id").is_some() {
        score += 15;
    }
    if element.attr("name").is_some() {
        score += 10;
    }
    if label.chars().count() > 2 {
        score += 15;
    }
    if category != FieldCategory::Unknown {
        score += 10;
    }
    if element.attr("autocomplete").is_some() {
        score += 5;
    }
    if element.attr("aria-label").is_some() {
        score += 5;
    }

    score.clamp(0, 100) as u8
}
