//! Form-field detection, value validation, and fill planning.
//!
//! Classification works on [`FormElement`] snapshots and a [`LabelLookup`]
//! capability, so the same rules run against a live browser bridge, a
//! precomputed label map, or a static HTML document parsed by [`HtmlForm`].

pub mod detection;
pub mod domain;
pub mod format;
pub mod html;
pub mod plan;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

use scraper::Html;

pub use detection::{
    analyze_element, build_selector, detect_fields, resolve_label, LabelHints, LabelLookup,
    LookupError, PrecomputedLabels,
};
pub use domain::{
    ControlTag, DetectedField, FieldCategory, FormElement, InputKind, ValidationResult,
};
pub use format::format_value;
pub use html::HtmlForm;
pub use plan::{plan_fill, FillAnswers, FillDecision, PlannedField};
pub use router::autofill_router;
pub use validation::FieldValidator;

/// Parse an HTML snapshot and classify its controls.
///
/// The parsed document never leaves this function, so callers on async
/// executors can use it without holding a non-`Send` DOM across awaits.
pub fn detect_fields_in_html(markup: &str) -> Vec<DetectedField> {
    let document = Html::parse_document(markup);
    let form = HtmlForm::new(&document);
    detect_fields(&form.elements(), &form)
}
