use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::super::domain::FormElement;

/// DOM traversal capability used during label resolution.
///
/// Implementations navigate from the element's opaque handle; the resolution
/// order itself lives in [`resolve_label`].
pub trait LabelLookup {
    /// Text of a `<label for="{id}">` anywhere in the document.
    fn label_for(&self, element: &FormElement, id: &str) -> Result<Option<String>, LookupError>;
    /// Text of the nearest `<label>` ancestor.
    fn enclosing_label(&self, element: &FormElement) -> Result<Option<String>, LookupError>;
    /// Text of the immediately preceding sibling when it is a `<label>`.
    fn preceding_label(&self, element: &FormElement) -> Result<Option<String>, LookupError>;
    /// Text of the parent's preceding sibling when it is a `<label>` or `<span>`.
    fn parent_preceding_text(&self, element: &FormElement)
        -> Result<Option<String>, LookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("element handle {0} is not part of the scanned document")]
    StaleHandle(usize),
    #[error("label lookup unavailable: {0}")]
    Unavailable(String),
}

/// Label context resolved ahead of time by a caller that walks the DOM itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelHints {
    #[serde(default)]
    pub for_label: Option<String>,
    #[serde(default)]
    pub enclosing_label: Option<String>,
    #[serde(default)]
    pub preceding_label: Option<String>,
    #[serde(default)]
    pub parent_preceding: Option<String>,
}

/// Lookup backed by precomputed [`LabelHints`] keyed by element handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecomputedLabels {
    entries: HashMap<usize, LabelHints>,
}

impl PrecomputedLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, handle: usize, hints: LabelHints) -> Self {
        self.entries.insert(handle, hints);
        self
    }

    fn hints(&self, element: &FormElement) -> Option<&LabelHints> {
        self.entries.get(&element.handle)
    }
}

impl FromIterator<(usize, LabelHints)> for PrecomputedLabels {
    fn from_iter<I: IntoIterator<Item = (usize, LabelHints)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl LabelLookup for PrecomputedLabels {
    fn label_for(&self, element: &FormElement, _id: &str) -> Result<Option<String>, LookupError> {
        Ok(self.hints(element).and_then(|hints| hints.for_label.clone()))
    }

    fn enclosing_label(&self, element: &FormElement) -> Result<Option<String>, LookupError> {
        Ok(self
            .hints(element)
            .and_then(|hints| hints.enclosing_label.clone()))
    }

    fn preceding_label(&self, element: &FormElement) -> Result<Option<String>, LookupError> {
        Ok(self
            .hints(element)
            .and_then(|hints| hints.preceding_label.clone()))
    }

    fn parent_preceding_text(
        &self,
        element: &FormElement,
    ) -> Result<Option<String>, LookupError> {
        Ok(self
            .hints(element)
            .and_then(|hints| hints.parent_preceding.clone()))
    }
}

/// Resolve a human-readable label; first non-empty source wins.
///
/// aria-label, `<label for>`, enclosing label, preceding label, parent's
/// preceding label/span, then the `name` and `placeholder` attributes.
pub fn resolve_label<L>(element: &FormElement, lookup: &L) -> Result<String, LookupError>
where
    L: LabelLookup + ?Sized,
{
    if let Some(aria) = element.attr("aria-label").and_then(clean_label) {
        return Ok(aria);
    }

    if let Some(id) = element.attr("id") {
        if let Some(text) = lookup.label_for(element, id)?.as_deref().and_then(clean_label) {
            return Ok(text);
        }
    }

    if let Some(text) = lookup.enclosing_label(element)?.as_deref().and_then(clean_label) {
        return Ok(text);
    }

    if let Some(text) = lookup.preceding_label(element)?.as_deref().and_then(clean_label) {
        return Ok(text);
    }

    if let Some(text) = lookup
        .parent_preceding_text(element)?
        .as_deref()
        .and_then(clean_label)
    {
        return Ok(text);
    }

    Ok(element
        .attr("name")
        .or_else(|| element.attr("placeholder"))
        .and_then(clean_label)
        .unwrap_or_default())
}

/// Collapse whitespace and drop trailing required-markers such as `*` or `:`.
fn clean_label(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed
        .trim_end_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
        .trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
