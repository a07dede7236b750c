use std::sync::OnceLock;

use regex::Regex;

use super::super::domain::FieldCategory;

static CATEGORY_PATTERNS: OnceLock<Vec<(FieldCategory, Vec<Regex>)>> = OnceLock::new();

/// First category in [`FieldCategory::ORDERED`] with a matching pattern.
pub(crate) fn category_for(search_text: &str) -> FieldCategory {
    category_patterns()
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|pattern| pattern.is_match(search_text)))
        .map(|(category, _)| *category)
        .unwrap_or(FieldCategory::Unknown)
}

fn category_patterns() -> &'static Vec<(FieldCategory, Vec<Regex>)> {
    CATEGORY_PATTERNS.get_or_init(|| {
        FieldCategory::ORDERED
            .iter()
            .map(|category| {
                let patterns = raw_patterns(*category)
                    .iter()
                    .map(|source| {
                        Regex::new(&format!("(?i){source}"))
                            .expect("category pattern is a valid regex")
                    })
                    .collect();
                (*category, patterns)
            })
            .collect()
    })
}

fn raw_patterns(category: FieldCategory) -> &'static [&'static str] {
    match category {
        FieldCategory::PersonalInfo => &[
            r"\b(first|last|full|middle|given|family|legal|preferred|sur)[\s_-]*name\b",
            r"\b[fl]name\b",
            r"^name\b",
            r"\b(pronouns?|gender)\b",
            r"date[\s_-]*of[\s_-]*birth|birth[\s_-]*date|\bdob\b",
        ],
        FieldCategory::Contact => &[
            r"e-?mail",
            r"phone|mobile|\btel\b|cell",
            r"address|street|\bcity\b|\bstate\b|\bzip|postal|postcode|country",
            r"linkedin|github|twitter|website|\burl\b|personal[\s_-]*site",
        ],
        FieldCategory::Employment => &[
            r"compan(y|ies)|employer|organi[sz]ation",
            r"job[\s_-]*title|current[\s_-]*(title|role|position)|\bposition\b|\btitle\b",
        ],
        FieldCategory::Education => &[
            r"school|universit|college|degree|education",
            r"\bgpa\b|\bmajor\b|graduat|field[\s_-]*of[\s_-]*study",
        ],
        FieldCategory::Skills => &[
            r"skill|technolog|proficien|programming",
            r"\blanguages?\b|certification|\btools\b",
        ],
        FieldCategory::Experience => &[
            r"experience|years[\s_-]*of|\byoe\b",
            r"work[\s_-]*history|previous[\s_-]*role|responsibilit",
        ],
        FieldCategory::Salary => &[
            r"salary|compensation|\bpay\b|wage|\bctc\b",
            r"desired[\s_-]*(pay|rate)|expected[\s_-]*(pay|rate)",
        ],
        FieldCategory::Availability => &[
            r"start[\s_-]*date|availab|notice[\s_-]*period",
            r"earliest|when[\s_-]*can[\s_-]*you|relocat",
        ],
        FieldCategory::Authorization => &[
            r"authori[sz]|sponsor|\bvisa\b|work[\s_-]*permit",
            r"legally|citizen|clearance|right[\s_-]*to[\s_-]*work",
        ],
        FieldCategory::Documents => &[
            r"r[eé]sum[eé]|\bcv\b|cover[\s_-]*letter",
            r"attach|upload|transcript|portfolio",
        ],
        FieldCategory::Unknown => &[],
    }
}
