use applyflow::clock::SystemClock;
use applyflow::error::AppError;
use applyflow::workflows::autofill::{
    detect_fields_in_html, plan_fill, DetectedField, FieldValidator, FillAnswers, FillDecision,
    PlannedField,
};
use applyflow::workflows::sla::TierTable;
use clap::Args;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::infra::load_tier_table;

#[derive(Args, Debug)]
pub(crate) struct ScanArgs {
    /// Saved application page to classify
    #[arg(long)]
    pub(crate) html: PathBuf,
    /// JSON file of candidate answers (`by_keyword` / `by_category`)
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TiersArgs {
    /// CSV override to validate and print instead of the standard table
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) fn run_scan(args: ScanArgs) -> Result<(), AppError> {
    let markup = fs::read_to_string(&args.html)?;
    let answers = match &args.answers {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<FillAnswers>(&raw).map_err(std::io::Error::from)?
        }
        None => FillAnswers::default(),
    };

    let validator = FieldValidator::new(Arc::new(SystemClock));
    let fields = detect_fields_in_html(&markup);
    let plan = plan_fill(&fields, &answers, &validator);

    print!("{}", render_scan(&fields, &plan));
    Ok(())
}

pub(crate) fn run_tiers(args: TiersArgs) -> Result<(), AppError> {
    let table = load_tier_table(args.csv.as_deref())?;
    print!("{}", render_tiers(&table));
    Ok(())
}

fn render_scan(fields: &[DetectedField], plan: &[PlannedField]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Detected {} field(s)", fields.len());
    for field in fields {
        let _ = writeln!(
            out,
            "  {:<28} {:<14} {:<9} {:>3}%{}  {}",
            truncate(&field.label, 28),
            field.category.label(),
            field.input_kind.label(),
            field.confidence,
            if field.required { " *" } else { "  " },
            if field.selector.is_empty() {
                "(no selector)"
            } else {
                field.selector.as_str()
            },
        );
    }

    let _ = writeln!(out, "\nFill plan");
    for planned in plan {
        let decision = match &planned.decision {
            FillDecision::Fill { value } => format!("fill \"{value}\""),
            FillDecision::NeedsReview { value, errors } => {
                format!("review \"{value}\": {}", errors.join("; "))
            }
            FillDecision::NeedsInput if planned.required => "missing required answer".to_string(),
            FillDecision::NeedsInput => "no answer".to_string(),
            FillDecision::Untargetable => "skip (untargetable)".to_string(),
        };
        let _ = writeln!(out, "  {:<28} {decision}", truncate(&planned.label, 28));
        for warning in &planned.warnings {
            let _ = writeln!(out, "  {:<28}   warning: {warning}", "");
        }
        for suggestion in &planned.suggestions {
            let _ = writeln!(out, "  {:<28}   hint: {suggestion}", "");
        }
    }

    out
}

fn render_tiers(table: &TierTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<11} {:>10} {:>5} {:>6} {:>7} {:>7} {:>10}",
        "TIER", "INTERVIEWS", "DAYS", "DAILY", "WEEKLY", "CREDIT", "PRICE"
    );
    for row in table.rows() {
        let _ = writeln!(
            out,
            "{:<11} {:>10} {:>5} {:>6} {:>7} {:>6}% {:>10}",
            row.tier.label(),
            row.interviews_required,
            row.guarantee_days,
            row.daily_cap,
            row.weekly_cap,
            row.credit_percentage,
            dollars(row.monthly_cost_cents),
        );
    }
    out
}

fn dollars(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const PAGE: &str = r#"
        <form>
          <label for="email">Email *</label>
          <input id="email" type="email" required>
          <label for="why">Why do you want to join our robotics platform team?</label>
          <textarea id="why"></textarea>
        </form>
    "#;

    #[test]
    fn scan_report_lists_fields_and_decisions() {
        let validator = FieldValidator::new(Arc::new(SystemClock));
        let fields = detect_fields_in_html(PAGE);
        let answers = FillAnswers {
            by_keyword: BTreeMap::from([("email".to_string(), "pat@gmial.com".to_string())]),
            by_category: BTreeMap::new(),
        };
        let plan = plan_fill(&fields, &answers, &validator);

        let report = render_scan(&fields, &plan);
        assert!(report.starts_with("Detected 2 field(s)"));
        assert!(report.contains("#email"));
        assert!(report.contains("Why do you want to join o..."));
        assert!(report.contains("fill \"pat@gmial.com\""));
        assert!(report.contains("warning: Did you mean pat@gmail.com?"));
        assert!(report.contains("no answer"));
    }

    #[test]
    fn tier_listing_shows_every_tier() {
        let listing = render_tiers(&TierTable::standard());
        assert_eq!(listing.lines().count(), 7);
        assert!(listing.contains("ENTERPRISE"));
        assert!(listing.contains("$99.99"));
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("A very long label indeed", 10), "A very ...");
    }
}
