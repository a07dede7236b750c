use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

use super::detection::{LabelLookup, LookupError};
use super::domain::{ControlTag, FormElement};

static CONTROL_SELECTOR: OnceLock<Selector> = OnceLock::new();
static LABEL_SELECTOR: OnceLock<Selector> = OnceLock::new();
static OPTION_SELECTOR: OnceLock<Selector> = OnceLock::new();

fn control_selector() -> &'static Selector {
    CONTROL_SELECTOR
        .get_or_init(|| Selector::parse("input, textarea, select").expect("static selector"))
}

fn label_selector() -> &'static Selector {
    LABEL_SELECTOR.get_or_init(|| Selector::parse("label").expect("static selector"))
}

fn option_selector() -> &'static Selector {
    OPTION_SELECTOR.get_or_init(|| Selector::parse("option").expect("static selector"))
}

/// Form controls of a parsed HTML snapshot plus DOM traversal for label lookup.
pub struct HtmlForm<'a> {
    document: &'a Html,
    controls: Vec<ElementRef<'a>>,
}

impl<'a> HtmlForm<'a> {
    pub fn new(document: &'a Html) -> Self {
        let controls = document.select(control_selector()).collect();
        Self { document, controls }
    }

    /// Controls in document order; `handle` is the position in that order.
    ///
    /// A named radio group yields one element, its first radio, carrying
    /// every option of the group.
    pub fn elements(&self) -> Vec<FormElement> {
        let mut seen_groups = HashSet::new();
        self.controls
            .iter()
            .enumerate()
            .filter_map(|(handle, control)| {
                if is_radio(control) {
                    if let Some(group) = control.value().attr("name") {
                        if !seen_groups.insert(group) {
                            return None;
                        }
                    }
                }

                let tag = match control.value().name() {
                    "input" => ControlTag::Input,
                    "textarea" => ControlTag::Textarea,
                    "select" => ControlTag::Select,
                    _ => return None,
                };

                let attributes = control
                    .value()
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect::<BTreeMap<_, _>>();

                let options = match tag {
                    ControlTag::Select => select_options(*control),
                    ControlTag::Input if is_radio(control) => self.radio_group(control),
                    _ => Vec::new(),
                };

                Some(FormElement {
                    handle,
                    tag,
                    attributes,
                    options,
                })
            })
            .collect()
    }

    fn control(&self, element: &FormElement) -> Result<ElementRef<'a>, LookupError> {
        self.controls
            .get(element.handle)
            .copied()
            .ok_or(LookupError::StaleHandle(element.handle))
    }

    fn radio_group(&self, control: &ElementRef<'a>) -> Vec<String> {
        let Some(group) = control.value().attr("name") else {
            return control
                .value()
                .attr("value")
                .map(|value| vec![value.to_string()])
                .unwrap_or_default();
        };

        self.controls
            .iter()
            .filter(|candidate| is_radio(candidate) && candidate.value().attr("name") == Some(group))
            .filter_map(|candidate| candidate.value().attr("value"))
            .map(str::to_string)
            .collect()
    }
}

impl LabelLookup for HtmlForm<'_> {
    fn label_for(&self, element: &FormElement, id: &str) -> Result<Option<String>, LookupError> {
        self.control(element)?;
        Ok(self
            .document
            .select(label_selector())
            .find(|label| label.value().attr("for") == Some(id))
            .map(visible_text))
    }

    fn enclosing_label(&self, element: &FormElement) -> Result<Option<String>, LookupError> {
        let control = self.control(element)?;
        Ok(control
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| ancestor.value().name() == "label")
            .map(visible_text))
    }

    fn preceding_label(&self, element: &FormElement) -> Result<Option<String>, LookupError> {
        let control = self.control(element)?;
        Ok(previous_element(control)
            .filter(|sibling| sibling.value().name() == "label")
            .map(visible_text))
    }

    fn parent_preceding_text(
        &self,
        element: &FormElement,
    ) -> Result<Option<String>, LookupError> {
        let control = self.control(element)?;
        Ok(control
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(previous_element)
            .filter(|sibling| matches!(sibling.value().name(), "label" | "span"))
            .map(visible_text))
    }
}

fn is_radio(control: &ElementRef<'_>) -> bool {
    control
        .value()
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("radio"))
}

fn select_options(control: ElementRef<'_>) -> Vec<String> {
    control
        .select(option_selector())
        .map(visible_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn previous_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.prev_siblings().find_map(ElementRef::wrap)
}

/// Text content excluding nested form controls, whitespace collapsed.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !matches!(
                child_element.value().name(),
                "select" | "textarea" | "script" | "style"
            ) {
                collect_text(child_element, out);
            }
        }
    }
}
