use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{DetectedField, FieldCategory, InputKind};
use super::validation::FieldValidator;

/// Candidate answers for a form, looked up by label keyword before category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillAnswers {
    #[serde(default)]
    pub by_keyword: BTreeMap<String, String>,
    #[serde(default)]
    pub by_category: BTreeMap<FieldCategory, String>,
}

impl FillAnswers {
    /// Longest keyword contained in the label wins; category answers are the fallback.
    pub fn answer_for(&self, field: &DetectedField) -> Option<&str> {
        let label = field.label.to_lowercase();
        self.by_keyword
            .iter()
            .filter(|(keyword, _)| {
                let keyword = keyword.trim().to_lowercase();
                !keyword.is_empty() && label.contains(&keyword)
            })
            .max_by_key(|(keyword, _)| keyword.trim().len())
            .map(|(_, value)| value.as_str())
            .or_else(|| self.by_category.get(&field.category).map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum FillDecision {
    Fill { value: String },
    NeedsReview { value: String, errors: Vec<String> },
    NeedsInput,
    Untargetable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedField {
    pub field_id: String,
    pub selector: String,
    pub label: String,
    pub category: FieldCategory,
    pub required: bool,
    #[serde(flatten)]
    pub decision: FillDecision,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Decide what to type into each detected field.
///
/// Answers are filled as typed apart from canonical formatting. Advisory
/// proposals from validation (typo fixes, capitalization) stay in
/// `warnings`/`suggestions` and never replace the answer.
pub fn plan_fill(
    fields: &[DetectedField],
    answers: &FillAnswers,
    validator: &FieldValidator,
) -> Vec<PlannedField> {
    fields
        .iter()
        .map(|field| {
            let mut warnings = Vec::new();
            let mut suggestions = Vec::new();
            let decision = if !field.is_targetable() {
                FillDecision::Untargetable
            } else {
                match answers.answer_for(field) {
                    None => FillDecision::NeedsInput,
                    Some(value) => {
                        let result = validator.validate_field(field, value);
                        warnings = result.warnings;
                        suggestions = result.suggestions;
                        if result.is_valid {
                            let value = match (field.input_kind, result.formatted_value) {
                                (InputKind::Select, Some(option)) => option,
                                _ => validator.format_value(field, value),
                            };
                            FillDecision::Fill { value }
                        } else {
                            FillDecision::NeedsReview {
                                value: value.to_string(),
                                errors: result.errors,
                            }
                        }
                    }
                }
            };

            PlannedField {
                field_id: field.id.clone(),
                selector: field.selector.clone(),
                label: field.label.clone(),
                category: field.category,
                required: field.required,
                decision,
                warnings,
                suggestions,
            }
        })
        .collect()
}
