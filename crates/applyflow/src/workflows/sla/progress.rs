use chrono::{DateTime, Utc};

use super::domain::{RiskLevel, SlaPeriod, SlaProgress};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub const RECOMMEND_AUTO_APPLY: &str =
    "Enable auto-apply to raise your application volume and get back on pace";
pub const RECOMMEND_BROADEN_TITLES: &str =
    "Broaden your search to adjacent job titles and seniority levels";
pub const RECOMMEND_BROADEN_LOCATIONS: &str =
    "Expand your target locations or include remote roles";
pub const RECOMMEND_SUBMIT_INTERVIEWS: &str =
    "Submit any interviews you have scheduled so they count toward your guarantee";

/// Today's usage against the tier cap, used for the unused-quota hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DailyUsage {
    pub used: u32,
    pub cap: u32,
}

pub(crate) fn compute_progress(
    period: &SlaPeriod,
    usage: DailyUsage,
    now: DateTime<Utc>,
) -> SlaProgress {
    let days_total = ceil_days(period.end_date - period.start_date).max(1);
    let days_remaining = ceil_days(period.end_date - now).clamp(0, days_total);
    let days_elapsed = days_total - days_remaining;

    let expected_interviews =
        (u64::from(period.interviews_required) * days_elapsed as u64 / days_total as u64) as u32;
    let deficit = i64::from(expected_interviews) - i64::from(period.interviews_verified);
    let is_on_track = period.interviews_verified >= expected_interviews;
    let risk_level = risk_level(deficit, days_remaining);

    let progress_percent = if period.interviews_required == 0 {
        100
    } else {
        (u64::from(period.interviews_verified) * 100 / u64::from(period.interviews_required))
            .min(100) as u8
    };

    SlaProgress {
        period_id: period.id.clone(),
        user_id: period.user_id.clone(),
        tier: period.tier,
        interviews_required: period.interviews_required,
        interviews_verified: period.interviews_verified,
        expected_interviews,
        days_total,
        days_elapsed,
        days_remaining,
        progress_percent,
        is_on_track,
        risk_level,
        recommendations: recommendations(is_on_track, risk_level, usage, period.interviews_verified),
        end_date: period.end_date,
    }
}

pub(crate) fn risk_level(deficit: i64, days_remaining: i64) -> RiskLevel {
    if deficit >= 3 && days_remaining < 7 {
        RiskLevel::Critical
    } else if deficit >= 2 && days_remaining < 14 {
        RiskLevel::High
    } else if deficit >= 1 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn recommendations(
    is_on_track: bool,
    risk_level: RiskLevel,
    usage: DailyUsage,
    interviews_verified: u32,
) -> Vec<String> {
    let mut advice = Vec::new();

    if !is_on_track {
        advice.push(RECOMMEND_AUTO_APPLY.to_string());
    }

    if usage.cap > 0 && u64::from(usage.used) * 2 < u64::from(usage.cap) {
        advice.push(format!(
            "You have used {} of {} applications today; apply to more roles to use your remaining quota",
            usage.used, usage.cap
        ));
    }

    if risk_level.requires_escalation() {
        advice.push(RECOMMEND_BROADEN_TITLES.to_string());
        advice.push(RECOMMEND_BROADEN_LOCATIONS.to_string());
    }

    if interviews_verified == 0 {
        advice.push(RECOMMEND_SUBMIT_INTERVIEWS.to_string());
    }

    advice
}

/// Whole days, rounding any partial day up. Negative spans stay negative.
fn ceil_days(span: chrono::Duration) -> i64 {
    let seconds = span.num_seconds();
    if seconds <= 0 {
        seconds / SECONDS_PER_DAY
    } else {
        (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }
}
